pub(crate) mod text;
pub(crate) mod transform;
