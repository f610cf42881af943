use std::ops::{Deref, DerefMut};

use crate::frontend::error::{ErrorReporter, FrontendErrorKind};
use crate::frontend::typechecker::gather::{AttrTable, ClassTable, MethodTable};
use crate::frontend::typechecker::graph::MethodSig;
use crate::util::symbol::{sym, Symbol};

/// checks expressions class by class, the object environment starts as a copy
/// of the class attribute table (including `self`) and grows with nested scopes
pub struct TypeChecker<'t, 'i> {
    /// contains declarations of all classes
    table: &'t ClassTable<'i>,

    /// all diagnostics go here, checking never stops at the first error
    reporter: &'t mut ErrorReporter,

    /// class whose features are checked, SELF_TYPE refers to it
    current_class: Symbol,

    /// file in which the current class was declared
    file: &'i str,

    /// maps identifiers to their declared types
    local_env: AttrTable,
}

/// guard for a nested scope, the scope is closed when the guard is dropped
pub struct NestedScope<'a, 't, 'i> {
    checker: &'a mut TypeChecker<'t, 'i>,
}

impl<'a, 't, 'i> Deref for NestedScope<'a, 't, 'i> {
    type Target = TypeChecker<'t, 'i>;

    fn deref(&self) -> &Self::Target {
        self.checker
    }
}

impl<'a, 't, 'i> DerefMut for NestedScope<'a, 't, 'i> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.checker
    }
}

impl<'a, 't, 'i> Drop for NestedScope<'a, 't, 'i> {
    fn drop(&mut self) {
        self.checker.local_env.exit_scope();
    }
}

impl<'t, 'i> TypeChecker<'t, 'i> {
    /// typechecker is created outside of any class, see `enter_class`
    pub fn new(table: &'t ClassTable<'i>, reporter: &'t mut ErrorReporter) -> Self {
        let file = table.interner().resolve(sym::BASIC_CLASS_FILE);
        Self { table, reporter, current_class: sym::OBJECT, file, local_env: AttrTable::new() }
    }

    /// switch to checking features of the given class, with a fresh copy of its attributes
    pub fn enter_class(&mut self, class: Symbol) {
        let interner = self.table.interner();
        if let Some(node) = self.table.graph().get(class) {
            self.file = interner.resolve(node.file);
        }
        self.current_class = class;
        self.local_env = self.table.attr_table(class).cloned().unwrap_or_default();
    }

    /// opens a scope containing given bindings, later bindings shadow earlier ones
    pub fn with_nested_scope(&mut self, bindings: Vec<(Symbol, Symbol)>) -> NestedScope<'_, 't, 'i> {
        self.local_env.enter_scope();
        for (ident, t) in bindings {
            self.local_env.add_id(ident, t);
        }
        NestedScope { checker: self }
    }

    pub fn scope_depth(&self) -> usize {
        self.local_env.depth()
    }

    /// declared type of an identifier visible in the current scope
    pub fn get_variable(&self, ident: Symbol) -> Option<Symbol> {
        self.local_env.lookup(&ident).copied()
    }

    pub fn get_method_table(&self, class: Symbol) -> Option<&'t MethodTable> {
        self.table.method_table(class)
    }

    pub fn get_method(&self, class: Symbol, method: Symbol) -> Option<&'t MethodSig> {
        self.table.lookup_method(class, method)
    }

    /// replace SELF_TYPE with the current class
    pub fn resolve(&self, t: Symbol) -> Symbol {
        if t == sym::SELF_TYPE {
            self.current_class
        } else {
            t
        }
    }

    /// check if a value of type `child` can be used where `parent` is expected
    pub fn conforms(&self, child: Symbol, parent: Symbol) -> bool {
        self.table.graph().conforms(child, parent, self.current_class)
    }

    /// conformance after replacing SELF_TYPE on both sides, used for declared types
    /// of attributes, let bindings and method bodies
    pub fn conforms_resolved(&self, child: Symbol, parent: Symbol) -> bool {
        self.table.graph().is_subclass(self.resolve(child), self.resolve(parent))
    }

    /// common type of two branches, SELF_TYPE is kept only if both branches have it
    pub fn join(&self, t1: Symbol, t2: Symbol) -> Symbol {
        if t1 == sym::SELF_TYPE && t2 == sym::SELF_TYPE {
            sym::SELF_TYPE
        } else {
            self.table.graph().get_lub(self.resolve(t1), self.resolve(t2))
        }
    }

    /// check if class exists, SELF_TYPE counts as existing only when allowed
    pub fn is_type_defined(&self, t: Symbol, allow_self_type: bool) -> bool {
        (allow_self_type && t == sym::SELF_TYPE) || self.table.graph().contains(t)
    }

    /// name of the symbol, for diagnostics
    pub fn name(&self, s: Symbol) -> String {
        String::from(self.table.interner().resolve(s))
    }

    pub fn error(&mut self, line: usize, kind: FrontendErrorKind) {
        self.reporter.error_at(self.file, line, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::typechecker::graph::InheritanceGraph;
    use crate::frontend::typechecker::tests::Builder;

    #[test]
    fn nested_scopes_are_closed_on_drop() {
        let mut b = Builder::new();
        let main = {
            let body = b.int(0);
            let x = b.attr("x", "Int");
            let m = b.method("main", vec![], "Int", body);
            b.class("Main", "IO", vec![x, m])
        };
        let program = b.program(vec![main]);
        let mut reporter = ErrorReporter::new();
        let graph = InheritanceGraph::build(&program, &b.interner, &mut reporter);
        let table = ClassTable::gather(graph, &b.interner, &mut reporter);
        assert_eq!(reporter.error_count(), 0);

        let x = b.sym("x");
        let mut checker = TypeChecker::new(&table, &mut reporter);
        checker.enter_class(sym::MAIN);
        let depth = checker.scope_depth();
        assert_eq!(checker.get_variable(x), Some(sym::INT));
        assert_eq!(checker.get_variable(sym::SELF), Some(sym::MAIN));
        {
            let mut nested = checker.with_nested_scope(vec![(x, sym::STRING)]);
            assert_eq!(nested.get_variable(x), Some(sym::STRING));
            {
                let inner = nested.with_nested_scope(vec![(x, sym::BOOL)]);
                assert_eq!(inner.get_variable(x), Some(sym::BOOL));
                assert_eq!(inner.scope_depth(), depth + 2);
            }
            assert_eq!(nested.get_variable(x), Some(sym::STRING));
        }
        assert_eq!(checker.scope_depth(), depth);
        assert_eq!(checker.get_variable(x), Some(sym::INT));
        assert_eq!(checker.join(sym::SELF_TYPE, sym::SELF_TYPE), sym::SELF_TYPE);
        assert_eq!(checker.join(sym::SELF_TYPE, sym::IO), sym::IO);
        assert_eq!(checker.join(sym::SELF_TYPE, sym::INT), sym::OBJECT);
        assert!(checker.conforms(sym::SELF_TYPE, sym::IO));
        assert!(checker.conforms_resolved(sym::MAIN, sym::SELF_TYPE));
        assert!(!checker.conforms(sym::MAIN, sym::SELF_TYPE));
    }
}
