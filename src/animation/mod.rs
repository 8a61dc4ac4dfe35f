pub(crate) mod center;
pub(crate) mod cursor;
pub(crate) mod integral;
pub(crate) mod keyframe;
pub(crate) mod radius;
pub(crate) mod scalar;
pub(crate) mod settings;
