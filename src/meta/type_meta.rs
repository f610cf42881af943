use crate::meta::Meta;
use crate::util::symbol::Symbol;

/// metadata used to store type information, the line is kept for re-checking and printing
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TypeMeta {
    pub line: usize,
    pub t: Symbol,
}

pub trait GetType {
    fn get_type(&self) -> Symbol;
}

impl<ItemT> GetType for Meta<ItemT, TypeMeta> {
    fn get_type(&self) -> Symbol {
        self.get_meta().t
    }
}
