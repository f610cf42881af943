// String interning for class, feature and identifier names.

use std::fmt;

use rustc_hash::FxHashMap;

/// opaque handle of an interned string, equal handles always mean equal strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

impl Symbol {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// predefined symbols, seeded into every interner in this exact order
pub mod sym {
    use super::Symbol;

    pub const OBJECT: Symbol = Symbol(0);
    pub const IO: Symbol = Symbol(1);
    pub const INT: Symbol = Symbol(2);
    pub const BOOL: Symbol = Symbol(3);
    pub const STRING: Symbol = Symbol(4);
    pub const SELF_TYPE: Symbol = Symbol(5);
    pub const MAIN: Symbol = Symbol(6);
    pub const MAIN_METHOD: Symbol = Symbol(7);
    pub const SELF: Symbol = Symbol(8);
    pub const NO_CLASS: Symbol = Symbol(9);
    pub const NO_TYPE: Symbol = Symbol(10);
    pub const PRIM_SLOT: Symbol = Symbol(11);
    pub const ABORT: Symbol = Symbol(12);
    pub const TYPE_NAME: Symbol = Symbol(13);
    pub const COPY: Symbol = Symbol(14);
    pub const OUT_STRING: Symbol = Symbol(15);
    pub const OUT_INT: Symbol = Symbol(16);
    pub const IN_STRING: Symbol = Symbol(17);
    pub const IN_INT: Symbol = Symbol(18);
    pub const LENGTH: Symbol = Symbol(19);
    pub const CONCAT: Symbol = Symbol(20);
    pub const SUBSTR: Symbol = Symbol(21);
    pub const ARG: Symbol = Symbol(22);
    pub const ARG2: Symbol = Symbol(23);
    pub const VAL: Symbol = Symbol(24);
    pub const STR_FIELD: Symbol = Symbol(25);
    pub const BASIC_CLASS_FILE: Symbol = Symbol(26);

    pub(super) const PREDEFINED: [&str; 27] = [
        "Object", "IO", "Int", "Bool", "String", "SELF_TYPE", "Main", "main", "self",
        "_no_class", "_no_type", "_prim_slot", "abort", "type_name", "copy", "out_string",
        "out_int", "in_string", "in_int", "length", "concat", "substr", "arg", "arg2", "_val",
        "_str_field", "<basic class>",
    ];
}

/// interns strings to unique Symbol ids
#[derive(Debug, Clone)]
pub struct Interner {
    map: FxHashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Default for Interner {
    fn default() -> Self {
        let mut interner = Self { map: FxHashMap::default(), strings: Vec::new() };
        for name in sym::PREDEFINED.iter() {
            interner.intern(name);
        }
        interner
    }
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(sym) = self.map.get(s) {
            return *sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(String::from(s));
        self.map.insert(String::from(s), sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.strings[sym.index() as usize]
    }

    /// look up a string to get its symbol, if it has been interned
    pub fn lookup(&self, s: &str) -> Option<Symbol> {
        self.map.get(s).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_symbols_match_their_names() {
        let interner = Interner::new();
        assert_eq!(interner.resolve(sym::OBJECT), "Object");
        assert_eq!(interner.resolve(sym::SELF_TYPE), "SELF_TYPE");
        assert_eq!(interner.resolve(sym::NO_TYPE), "_no_type");
        assert_eq!(interner.resolve(sym::BASIC_CLASS_FILE), "<basic class>");
        assert_eq!(interner.lookup("String"), Some(sym::STRING));
    }

    #[test]
    fn intern_returns_same_symbol() {
        let mut interner = Interner::new();
        let s1 = interner.intern("Point");
        let s2 = interner.intern("Point");
        let s3 = interner.intern("Line");

        assert_eq!(s1, s2);
        assert_ne!(s1, s3);
        assert_eq!(interner.intern("Int"), sym::INT);
        assert_eq!(interner.resolve(s3), "Line");
    }
}
