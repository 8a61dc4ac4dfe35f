pub(crate) mod tracks;
pub(crate) mod uniform;
