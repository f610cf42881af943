use crate::meta::{Meta, TypeMeta};

/// metadata type for location data (produced by the ast reader)
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct LocationMeta {
    /// line number in the original cool source file
    pub line: usize,
}

impl From<usize> for LocationMeta {
    fn from(line: usize) -> Self {
        Self { line }
    }
}

/// implemented by every metadata type that remembers where the node came from,
/// so that already annotated programs can be checked again
pub trait GetLocation {
    fn get_location(&self) -> LocationMeta;
}

impl GetLocation for LocationMeta {
    fn get_location(&self) -> LocationMeta {
        *self
    }
}

impl GetLocation for TypeMeta {
    fn get_location(&self) -> LocationMeta {
        LocationMeta { line: self.line }
    }
}

impl<ItemT, MetaT: GetLocation> GetLocation for Meta<ItemT, MetaT> {
    fn get_location(&self) -> LocationMeta {
        self.get_meta().get_location()
    }
}
