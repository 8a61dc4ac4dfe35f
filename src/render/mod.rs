pub(crate) mod backend;
pub(crate) mod cpu;
pub(crate) mod fractal;
pub(crate) mod palette;
pub(crate) mod view;
