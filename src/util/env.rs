use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::util::symbol::Symbol;

/// alias, we use Symbol as key everywhere in the project
pub type Env<T> = FxHashMap<Symbol, T>;

/// stack of environments, the innermost frame is the last one
///
/// used for attributes and methods of every class (one frame per class in the
/// inheritance chain) and for lexical bindings (let, case branches, method formals)
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedTable<K: Hash + Eq, V> {
    frames: Vec<FxHashMap<K, V>>,
}

impl<K: Hash + Eq, V> Default for ScopedTable<K, V> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<K: Hash + Eq, V> ScopedTable<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn exit_scope(&mut self) {
        self.frames.pop();
    }

    /// number of frames on the stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// bind k to v in the innermost frame, opening one if the table is empty
    pub fn add_id(&mut self, k: K, v: V) {
        if self.frames.is_empty() {
            self.enter_scope();
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(k, v);
        }
    }

    /// innermost binding of k, searching all frames
    pub fn lookup(&self, k: &K) -> Option<&V> {
        self.frames.iter()
            .rev()
            .find_map(|frame| frame.get(k))
    }

    /// binding of k in the innermost frame only
    pub fn probe(&self, k: &K) -> Option<&V> {
        self.frames.last()?.get(k)
    }

    /// binding of k in any frame except the innermost one
    pub fn lookup_enclosing(&self, k: &K) -> Option<&V> {
        let enclosing = self.frames.len().checked_sub(1)?;
        self.frames[..enclosing].iter()
            .rev()
            .find_map(|frame| frame.get(k))
    }
}
