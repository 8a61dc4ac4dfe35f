use crate::{
    animation::{
        cursor::{ArcState, SegmentCursor},
        integral::{RadiusIntegralTable, intervals_for_spacing},
        keyframe::{CenterKey, Keyframe, Position, Timeline},
        radius::RadiusCurve,
        settings::{CurveSettings, Retiming},
    },
    foundation::{
        core::Vec2,
        error::{SweepError, SweepResult},
        math::{cubic_hermite, exp_interp, map_range},
    },
};

/// Marching that ends further than this (relative to the segment length) from its target is
/// reported as a precision warning.
const MARCH_TOLERANCE: f64 = 1e-9;

/// Segment lengths at or below this (relative to the endpoint magnitudes) count as zero.
const DEGENERATE_LENGTH: f64 = 1e-12;

/// One Hermite segment of the center curve with everything derived from the keys at build time.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HermiteSegment {
    pub(crate) t0: f64,
    pub(crate) t1: f64,
    p0: Vec2,
    m0: Vec2,
    p1: Vec2,
    m1: Vec2,
    /// `radius(t1) / radius(t0)`.
    ratio: f64,
    /// Polyline length from the segment length table.
    length: f64,
    /// Total length walked by a full march over the segment (arc-length retiming only).
    pub(crate) marched_length: f64,
}

impl HermiteSegment {
    fn point(&self, s: f64) -> Vec2 {
        cubic_hermite(self.p0, self.m0, self.p1, self.m1, s)
    }

    fn step_length(&self, k: u32, steps: u32) -> f64 {
        let a = self.point(f64::from(k) / f64::from(steps));
        let b = self.point(f64::from(k + 1) / f64::from(steps));
        distance(a, b)
    }

    fn polyline_length(&self, samples: u32) -> f64 {
        (0..samples).map(|k| self.step_length(k, samples)).sum()
    }

    /// Length indistinguishable from rounding noise in the endpoint coordinates.
    fn is_degenerate(&self) -> bool {
        let scale = (self.p0.hypot() + self.p1.hypot()).max(1.0);
        self.length <= DEGENERATE_LENGTH * scale
    }
}

fn distance(a: Vec2, b: Vec2) -> f64 {
    let d = b - a;
    d.x.hypot(d.y)
}

#[derive(Clone, Debug)]
struct SegmentTable {
    center_revision: u64,
    radius_revision: u64,
    retiming: Retiming,
    segments: Vec<HermiteSegment>,
}

/// Result of one evaluation inside a segment.
struct SegmentSample {
    point: Vec2,
    local_t: f64,
    /// The measured segment length asks for more than a full march covers.
    short_by: Option<f64>,
}

/// Local parameter of a query before and after re-timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Retimed {
    pub segment: usize,
    /// Raw local time within the segment.
    pub local: f64,
    /// Re-timed fraction of the segment actually travelled.
    pub retimed: f64,
}

/// Camera center over time.
///
/// Keys carry a position and a velocity handle; consecutive keys are joined by cubic Hermite
/// segments whose tangents are the handles scaled by the radius at each key and by
/// [`CurveSettings::tangent_scale`]. Because the view shrinks geometrically during a zoom, the
/// local parameter is re-timed (see [`Retiming`]) so that on-screen motion stays even.
///
/// Two keys with zero handles meet at their midpoint at the segment's half time only when the
/// radius is constant across the segment or retiming is [`Retiming::Linear`]. Under a zoom the
/// default [`Retiming::ExpRatio`] front-loads the motion: with the radius going from 1 to 1e-4,
/// the center is already about 99.97% of the way to the second key at half time.
///
/// Derived tables (per-segment Hermite data, segment lengths, radius integral) are rebuilt lazily
/// whenever the center or radius revision they were built from no longer matches.
#[derive(Clone, Debug)]
pub struct CenterCurve {
    timeline: Timeline<CenterKey>,
    settings: CurveSettings,
    cursor: SegmentCursor,
    table: Option<SegmentTable>,
    integral: Option<RadiusIntegralTable>,
    integral_intervals: usize,
    precision_warnings: u64,
}

impl CenterCurve {
    /// A stationary center with one anchor key at `t = 0`.
    pub fn new(pos: Vec2, settings: CurveSettings) -> SweepResult<Self> {
        let key = CenterKey::anchor(pos);
        validate_key(&key)?;
        Self::with_timeline(Timeline::new(0.0, key)?, settings)
    }

    pub fn from_keys(keys: Vec<Keyframe<CenterKey>>, settings: CurveSettings) -> SweepResult<Self> {
        for k in &keys {
            validate_key(&k.value)?;
        }
        Self::with_timeline(Timeline::from_keys(keys)?, settings)
    }

    fn with_timeline(timeline: Timeline<CenterKey>, settings: CurveSettings) -> SweepResult<Self> {
        settings.validate()?;
        let integral_intervals = settings.integral_samples;
        Ok(Self {
            timeline,
            settings,
            cursor: SegmentCursor::default(),
            table: None,
            integral: None,
            integral_intervals,
            precision_warnings: 0,
        })
    }

    pub fn timeline(&self) -> &Timeline<CenterKey> {
        &self.timeline
    }

    pub fn revision(&self) -> u64 {
        self.timeline.revision()
    }

    pub fn settings(&self) -> &CurveSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: CurveSettings) -> SweepResult<()> {
        settings.validate()?;
        self.integral_intervals = settings.integral_samples;
        self.settings = settings;
        self.invalidate();
        Ok(())
    }

    pub fn cursor(&self) -> &SegmentCursor {
        &self.cursor
    }

    /// How many evaluations ended with arc-length marching short of its target.
    pub fn precision_warnings(&self) -> u64 {
        self.precision_warnings
    }

    pub fn add_keyframe(&mut self, t: f64, pos: Vec2, vel: Vec2) -> SweepResult<usize> {
        let key = CenterKey { pos, vel };
        validate_key(&key)?;
        let index = self.timeline.add(t, key)?;
        self.invalidate_center();
        Ok(index)
    }

    pub fn remove_keyframe(&mut self, index: usize) -> SweepResult<Keyframe<CenterKey>> {
        let key = self.timeline.remove(index)?;
        self.invalidate_center();
        Ok(key)
    }

    pub fn set_keyframe_time(&mut self, index: usize, t: f64) -> SweepResult<usize> {
        let index = self.timeline.set_time(index, t)?;
        self.invalidate_center();
        Ok(index)
    }

    pub fn set_keyframe_value(&mut self, index: usize, pos: Vec2) -> SweepResult<()> {
        let vel = self
            .timeline
            .get(index)
            .map(|k| k.value.vel)
            .unwrap_or(Vec2::ZERO);
        self.set_keyframe(index, CenterKey { pos, vel })
    }

    pub fn set_keyframe_velocity(&mut self, index: usize, vel: Vec2) -> SweepResult<()> {
        let pos = self
            .timeline
            .get(index)
            .map(|k| k.value.pos)
            .unwrap_or(Vec2::ZERO);
        self.set_keyframe(index, CenterKey { pos, vel })
    }

    fn set_keyframe(&mut self, index: usize, key: CenterKey) -> SweepResult<()> {
        validate_key(&key)?;
        self.timeline.set_value(index, key)?;
        self.invalidate_center();
        Ok(())
    }

    /// Park the cursor at the start without touching the tables. Call after a playback jump.
    pub fn reset_cursor(&mut self) {
        self.cursor.reset();
    }

    /// Drop every derived table and park the cursor at the start.
    pub fn invalidate(&mut self) {
        self.table = None;
        self.integral = None;
        self.cursor.reset();
    }

    /// Drop tables derived from the center keys. The radius integral is kept.
    pub fn invalidate_center(&mut self) {
        self.table = None;
        self.cursor.reset();
    }

    /// Rebuild the radius integral table with the given sample spacing, and drop segment data
    /// (tangents and lengths depend on the radius at each key).
    pub fn invalidate_radius(
        &mut self,
        radius: &RadiusCurve,
        sample_spacing: f64,
    ) -> SweepResult<()> {
        self.integral_intervals = intervals_for_spacing(sample_spacing)?;
        self.integral = Some(RadiusIntegralTable::build(radius, self.integral_intervals));
        self.invalidate_center();
        Ok(())
    }

    /// Segment length table: one polyline length per segment.
    pub fn segment_lengths(&mut self, radius: &RadiusCurve) -> Vec<f64> {
        self.ensure_tables(radius);
        self.segments().iter().map(|s| s.length).collect()
    }

    /// Split `t` into its segment and report the local parameter before and after re-timing.
    ///
    /// Returns `None` when `t` falls on a key or outside the key span.
    pub fn retime(&mut self, t: f64, radius: &RadiusCurve) -> Option<Retimed> {
        self.ensure_tables(radius);
        match self.timeline.position(t) {
            Position::Key(_) => None,
            Position::Segment { index, u } => {
                let seg = &self.segments()[index];
                let retimed = match self.settings.retiming {
                    Retiming::Linear => u,
                    Retiming::ExpRatio => exp_interp(seg.ratio, u),
                    Retiming::ArcLength => integral_fraction(self.integral.as_ref(), seg, t, u),
                };
                Some(Retimed {
                    segment: index,
                    local: u,
                    retimed,
                })
            }
        }
    }

    /// Center at `t`, resuming from where the previous query left off.
    ///
    /// Equivalent to [`Self::center_at`]; successive nearby queries cost O(1) amortized.
    #[tracing::instrument(level = "trace", skip(self, radius))]
    pub fn get_center(&mut self, t: f64, radius: &RadiusCurve) -> Vec2 {
        self.ensure_tables(radius);
        if let Some(pos) = self.boundary_value(t) {
            return pos;
        }

        let steps = self.settings.arc_steps();
        let Some(table) = self.table.as_ref() else {
            return self.timeline.first().value.pos;
        };

        self.cursor.walk_to(&table.segments, t, steps);
        let index = self.cursor.segment();
        let seg = &table.segments[index];
        if t <= seg.t0 {
            self.cursor.set_local_t(0.0);
            return seg.p0;
        }
        if t >= seg.t1 {
            self.cursor.set_local_t(1.0);
            return seg.p1;
        }

        let u = map_range(t, seg.t0, seg.t1, 0.0, 1.0);
        let sample = sample_segment(
            seg,
            &self.settings,
            self.integral.as_ref(),
            t,
            u,
            self.cursor.arc_mut(),
        );
        self.cursor.set_local_t(sample.local_t);
        if let Some(short_by) = sample.short_by {
            self.report_short_march(index, t, short_by);
        }
        sample.point
    }

    /// Center at `t` computed from scratch, without reading or moving the cursor.
    pub fn center_at(&mut self, t: f64, radius: &RadiusCurve) -> Vec2 {
        self.ensure_tables(radius);
        if let Some(pos) = self.boundary_value(t) {
            return pos;
        }
        let (index, u) = match self.timeline.position(t) {
            Position::Key(i) => return self.timeline.keys()[i].value.pos,
            Position::Segment { index, u } => (index, u),
        };

        let seg = &self.segments()[index];
        let mut arc = ArcState::default();
        let sample = sample_segment(
            seg,
            &self.settings,
            self.integral.as_ref(),
            t,
            u,
            &mut arc,
        );
        if let Some(short_by) = sample.short_by {
            self.report_short_march(index, t, short_by);
        }
        sample.point
    }

    fn report_short_march(&mut self, segment: usize, t: f64, short_by: f64) {
        self.precision_warnings += 1;
        tracing::warn!(
            segment,
            t,
            short_by,
            arc_step = self.settings.arc_step,
            "arc-length marching ran past the segment end; arc_step is too coarse"
        );
    }

    /// Exact key position for clamped, single-key and on-key queries.
    fn boundary_value(&self, t: f64) -> Option<Vec2> {
        let first = self.timeline.first();
        let last = self.timeline.last();
        if self.timeline.len() == 1 || t.is_nan() || t <= first.t {
            return Some(first.value.pos);
        }
        if t >= last.t {
            return Some(last.value.pos);
        }
        None
    }

    fn segments(&self) -> &[HermiteSegment] {
        self.table.as_ref().map_or(&[], |table| table.segments.as_slice())
    }

    fn ensure_tables(&mut self, radius: &RadiusCurve) {
        let arc_length = self.settings.retiming == Retiming::ArcLength;
        if arc_length && !self.integral.as_ref().is_some_and(|i| i.is_current(radius)) {
            self.integral = Some(RadiusIntegralTable::build(radius, self.integral_intervals));
        }

        let fresh = self.table.as_ref().is_some_and(|table| {
            table.center_revision == self.timeline.revision()
                && table.radius_revision == radius.revision()
                && table.retiming == self.settings.retiming
        });
        if !fresh {
            self.table = Some(self.build_table(radius));
            self.cursor.reset();
        }
    }

    fn build_table(&self, radius: &RadiusCurve) -> SegmentTable {
        let keys = self.timeline.keys();
        let scale = self.settings.tangent_scale;
        let length_samples = u32::try_from(self.settings.length_samples).unwrap_or(u32::MAX);
        let steps = self.settings.arc_steps();
        let arc_length = self.settings.retiming == Retiming::ArcLength;

        let segments: Vec<HermiteSegment> = keys
            .windows(2)
            .map(|w| {
                let (a, b) = (&w[0], &w[1]);
                let ra = radius.get_radius(a.t);
                let rb = radius.get_radius(b.t);
                let mut seg = HermiteSegment {
                    t0: a.t,
                    t1: b.t,
                    p0: a.value.pos,
                    m0: a.value.vel * (ra * scale),
                    p1: b.value.pos,
                    m1: b.value.vel * (rb * scale),
                    ratio: rb / ra,
                    length: 0.0,
                    marched_length: 0.0,
                };
                seg.length = seg.polyline_length(length_samples);
                if seg.is_degenerate() {
                    seg.length = 0.0;
                } else if arc_length {
                    seg.marched_length = seg.polyline_length(steps);
                }
                seg
            })
            .collect();

        tracing::debug!(
            segments = segments.len(),
            retiming = ?self.settings.retiming,
            "rebuilt center segment table"
        );
        SegmentTable {
            center_revision: self.timeline.revision(),
            radius_revision: radius.revision(),
            retiming: self.settings.retiming,
            segments,
        }
    }
}

fn validate_key(key: &CenterKey) -> SweepResult<()> {
    if !key.pos.is_finite() || !key.vel.is_finite() {
        return Err(SweepError::domain(format!(
            "center keyframes must be finite, got pos {:?} vel {:?}",
            key.pos, key.vel
        )));
    }
    Ok(())
}

/// Fraction of the segment's integrated radius covered at `t`.
fn integral_fraction(
    integral: Option<&RadiusIntegralTable>,
    seg: &HermiteSegment,
    t: f64,
    u: f64,
) -> f64 {
    let Some(table) = integral else {
        return u;
    };
    let i0 = table.integral_at(seg.t0);
    let span = table.integral_at(seg.t1) - i0;
    if span <= 0.0 || !span.is_finite() {
        return u;
    }
    ((table.integral_at(t) - i0) / span).clamp(0.0, 1.0)
}

fn sample_segment(
    seg: &HermiteSegment,
    settings: &CurveSettings,
    integral: Option<&RadiusIntegralTable>,
    t: f64,
    u: f64,
    arc: &mut ArcState,
) -> SegmentSample {
    let direct = |s: f64| SegmentSample {
        point: seg.point(s),
        local_t: s,
        short_by: None,
    };
    match settings.retiming {
        Retiming::Linear => direct(u),
        Retiming::ExpRatio => direct(exp_interp(seg.ratio, u)),
        Retiming::ArcLength if seg.length <= 0.0 => direct(exp_interp(seg.ratio, u)),
        Retiming::ArcLength => {
            let fraction = integral_fraction(integral, seg, t, u);
            let mut sample = march(seg, settings.arc_steps(), arc, seg.marched_length * fraction);
            let missing = seg.length * fraction - seg.marched_length;
            if missing > MARCH_TOLERANCE * seg.length {
                sample.short_by = Some(missing);
            }
            sample
        }
    }
}

/// Walk the polyline through `P(k / steps)` from the current state until the accumulated length
/// brackets `target`, then interpolate within the final step.
fn march(seg: &HermiteSegment, steps: u32, arc: &mut ArcState, target: f64) -> SegmentSample {
    if arc.step > steps {
        *arc = ArcState::default();
    }

    while arc.step < steps {
        let d = seg.step_length(arc.step, steps);
        if arc.accumulated + d > target {
            break;
        }
        arc.accumulated += d;
        arc.step += 1;
    }
    while arc.step > 0 && arc.accumulated > target {
        arc.step -= 1;
        arc.accumulated -= seg.step_length(arc.step, steps);
    }
    if arc.step == 0 {
        arc.accumulated = 0.0;
    }

    if arc.step == steps {
        return SegmentSample {
            point: seg.p1,
            local_t: 1.0,
            short_by: None,
        };
    }

    let d = seg.step_length(arc.step, steps);
    let frac = if d > 0.0 {
        ((target - arc.accumulated) / d).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let s = (f64::from(arc.step) + frac) / f64::from(steps);
    SegmentSample {
        point: seg.point(s),
        local_t: s,
        short_by: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/center.rs"]
mod tests;
