use crate::animation::center::HermiteSegment;

/// Arc-length marching state within one segment.
///
/// `accumulated` is the polyline length from the segment start to grid point `step`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ArcState {
    pub(crate) step: u32,
    pub(crate) accumulated: f64,
}

/// Where the last center evaluation ended: segment, local parameter and arc length so far.
///
/// Precondition for O(1) cost: successive queries move monotonically (or by small jumps) along
/// the timeline. Arbitrary seeks are still answered correctly, they just walk across every
/// segment in between.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SegmentCursor {
    segment: usize,
    local_t: f64,
    arc: ArcState,
}

impl SegmentCursor {
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Hermite parameter of the last evaluated point within [`Self::segment`].
    pub fn local_t(&self) -> f64 {
        self.local_t
    }

    /// Arc length marched from the start of [`Self::segment`] (arc-length retiming only).
    pub fn accumulated_arc_length(&self) -> f64 {
        self.arc.accumulated
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Step segment by segment until `t` lies within the current segment's bounds.
    ///
    /// Each step resets the marching state to the edge the cursor entered from. Returns the
    /// number of segments crossed.
    pub(crate) fn walk_to(&mut self, segments: &[HermiteSegment], t: f64, steps: u32) -> usize {
        if self.segment >= segments.len() {
            self.reset();
        }

        let mut crossed = 0;
        while self.segment > 0 && t < segments[self.segment].t0 {
            self.segment -= 1;
            self.local_t = 1.0;
            self.arc = ArcState {
                step: steps,
                accumulated: segments[self.segment].marched_length,
            };
            crossed += 1;
        }
        while self.segment + 1 < segments.len() && t > segments[self.segment].t1 {
            self.segment += 1;
            self.local_t = 0.0;
            self.arc = ArcState::default();
            crossed += 1;
        }
        crossed
    }

    pub(crate) fn arc_mut(&mut self) -> &mut ArcState {
        &mut self.arc
    }

    pub(crate) fn set_local_t(&mut self, local_t: f64) {
        self.local_t = local_t;
    }
}
