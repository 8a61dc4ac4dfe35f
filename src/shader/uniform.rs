use crate::foundation::{
    core::Rgb,
    error::{SweepError, SweepResult},
};

/// Value pushed to the renderer for one shader parameter.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Float(f64),
    Bool(bool),
    Color(Rgb),
}

impl ParamValue {
    pub fn as_float(self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(self) -> Option<Rgb> {
        match self {
            Self::Color(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Color(_) => "color",
            Self::Bool(_) => "bool",
        }
    }
}

/// Typed payload of a [`Uniform`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UniformKind {
    Float {
        /// Inclusive `[min, max]`. Unbounded ends are stored as `f64::MIN` / `f64::MAX`.
        range: [f64; 2],
        default: f64,
        value: f64,
        /// Editor drag increment.
        speed: f64,
    },
    Color {
        default: Rgb,
        value: Rgb,
    },
    Bool {
        default: bool,
        value: bool,
    },
}

impl UniformKind {
    pub fn value(&self) -> ParamValue {
        match self {
            Self::Float { value, .. } => ParamValue::Float(*value),
            Self::Color { value, .. } => ParamValue::Color(*value),
            Self::Bool { value, .. } => ParamValue::Bool(*value),
        }
    }

    pub fn default_value(&self) -> ParamValue {
        match self {
            Self::Float { default, .. } => ParamValue::Float(*default),
            Self::Color { default, .. } => ParamValue::Color(*default),
            Self::Bool { default, .. } => ParamValue::Bool(*default),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.value().type_name()
    }
}

/// One named, user-tunable input of a color function.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Uniform {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    /// Whether edits should refresh interactive previews.
    #[serde(default = "yes")]
    pub update: bool,
    #[serde(flatten)]
    pub kind: UniformKind,
}

fn yes() -> bool {
    true
}

impl Uniform {
    pub fn float(name: &str, range: [f64; 2], default: f64, speed: f64) -> Self {
        Self::new(
            name,
            UniformKind::Float {
                range,
                default,
                value: default,
                speed,
            },
        )
    }

    pub fn color(name: &str, default: Rgb) -> Self {
        Self::new(
            name,
            UniformKind::Color {
                default,
                value: default,
            },
        )
    }

    pub fn boolean(name: &str, default: bool) -> Self {
        Self::new(
            name,
            UniformKind::Bool {
                default,
                value: default,
            },
        )
    }

    fn new(name: &str, kind: UniformKind) -> Self {
        Self {
            name: name.to_owned(),
            display_name: display_name(name),
            update: true,
            kind,
        }
    }

    pub fn value(&self) -> ParamValue {
        self.kind.value()
    }

    /// Replace the current value. The new value must have the uniform's type; floats are clamped
    /// to the uniform's range.
    pub fn set_value(&mut self, value: ParamValue) -> SweepResult<()> {
        match (&mut self.kind, value) {
            (UniformKind::Float { range, value, .. }, ParamValue::Float(v)) if v.is_finite() => {
                *value = v.clamp(range[0], range[1]);
            }
            (UniformKind::Color { value, .. }, ParamValue::Color(c)) => *value = c,
            (UniformKind::Bool { value, .. }, ParamValue::Bool(b)) => *value = b,
            (kind, v) => {
                return Err(SweepError::configuration(format!(
                    "uniform '{}' is a {} and cannot take {v:?}",
                    self.name,
                    kind.type_name()
                )));
            }
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        match &mut self.kind {
            UniformKind::Float { default, value, .. } => *value = *default,
            UniformKind::Color { default, value } => *value = *default,
            UniformKind::Bool { default, value } => *value = *default,
        }
    }

    pub fn validate(&self) -> SweepResult<()> {
        if self.name.is_empty() || !self.name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(SweepError::configuration(format!(
                "invalid uniform name '{}'",
                self.name
            )));
        }
        if let UniformKind::Float {
            range,
            default,
            value,
            speed,
        } = &self.kind
            && (!range[0].is_finite()
                || !range[1].is_finite()
                || range[0] > range[1]
                || !default.is_finite()
                || !value.is_finite()
                || !speed.is_finite())
        {
            return Err(SweepError::configuration(format!(
                "float uniform '{}' needs finite values and min <= max",
                self.name
            )));
        }
        Ok(())
    }
}

/// `frequency_scale` -> `Frequency scale`.
fn display_name(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A named palette program together with the uniforms it exposes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorFunction {
    pub name: String,
    #[serde(default)]
    pub uniforms: Vec<Uniform>,
}

impl Default for ColorFunction {
    /// The built-in cosine palette used by the CPU renderer.
    fn default() -> Self {
        Self {
            name: "cosine".to_owned(),
            uniforms: vec![
                Uniform::float("frequency", [0.0, f64::MAX], 1.0, 0.01),
                Uniform::float("phase", [0.0, 1.0], 0.0, 0.001),
                Uniform::color("tint", Rgb::new(0.5, 0.6, 0.8)),
                Uniform::boolean("invert", false),
            ],
        }
    }
}

impl ColorFunction {
    pub fn new(name: &str, uniforms: Vec<Uniform>) -> SweepResult<Self> {
        let cf = Self {
            name: name.to_owned(),
            uniforms,
        };
        cf.validate()?;
        Ok(cf)
    }

    /// Collect the `#uniform` directives of a palette source.
    ///
    /// ```text
    /// #uniform float <name> <default> <speed> <min|NULL> <max|NULL> [update];
    /// #uniform bool <name> <true|false> [update];
    /// #uniform color <name> <r> <g> <b> [update];
    /// ```
    pub fn parse(name: &str, source: &str) -> SweepResult<Self> {
        let mut uniforms = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find("#uniform ") {
            let body = &rest[start + "#uniform ".len()..];
            let end = body.find(';').ok_or_else(|| {
                SweepError::configuration("unterminated #uniform directive (missing ';')")
            })?;
            uniforms.push(parse_directive(&body[..end])?);
            rest = &body[end + 1..];
        }
        Self::new(name, uniforms)
    }

    pub fn validate(&self) -> SweepResult<()> {
        for (i, u) in self.uniforms.iter().enumerate() {
            u.validate()?;
            if self.uniforms[..i].iter().any(|other| other.name == u.name) {
                return Err(SweepError::configuration(format!(
                    "color function '{}' declares uniform '{}' twice",
                    self.name, u.name
                )));
            }
        }
        Ok(())
    }

    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    pub fn set_value(&mut self, name: &str, value: ParamValue) -> SweepResult<()> {
        let uniform = self
            .uniforms
            .iter_mut()
            .find(|u| u.name == name)
            .ok_or_else(|| SweepError::configuration(format!("unknown uniform '{name}'")))?;
        uniform.set_value(value)
    }

    pub fn reset(&mut self) {
        self.uniforms.iter_mut().for_each(Uniform::reset);
    }
}

fn parse_directive(body: &str) -> SweepResult<Uniform> {
    let words: Vec<&str> = body.split_whitespace().collect();
    let bad = || SweepError::configuration(format!("malformed #uniform directive '{body}'"));
    let float = |s: &str| s.parse::<f64>().map_err(|_| bad());
    let flag = |s: &str| match s {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(bad()),
    };
    let bound = |s: &str, unbounded: f64| {
        if s == "NULL" { Ok(unbounded) } else { float(s) }
    };

    let (mut uniform, trailing) = match words.as_slice() {
        ["float", name, default, speed, min, max, rest @ ..] => (
            Uniform::float(
                name,
                [bound(min, f64::MIN)?, bound(max, f64::MAX)?],
                float(default)?,
                float(speed)?,
            ),
            rest,
        ),
        ["bool", name, default, rest @ ..] => (Uniform::boolean(name, flag(default)?), rest),
        ["color", name, r, g, b, rest @ ..] => (
            Uniform::color(name, Rgb::new(float(r)?, float(g)?, float(b)?)),
            rest,
        ),
        _ => return Err(bad()),
    };
    match trailing {
        [] => {}
        [update] => uniform.update = flag(update)?,
        _ => return Err(bad()),
    }
    Ok(uniform)
}

#[cfg(test)]
#[path = "../../tests/unit/shader/uniform.rs"]
mod tests;
