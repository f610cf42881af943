use crate::frontend::typechecker::graph::InheritanceGraph;
use crate::util::symbol::{sym, Symbol};

impl InheritanceGraph {
    /// ancestors of the class starting with the class itself, ends at Object
    /// (or at the first class missing from the graph)
    pub fn ancestors(&self, class: Symbol) -> Ancestors {
        Ancestors { graph: self, next: Some(class) }
    }

    /// check if child == parent or parent is an ancestor of child,
    /// valid only for concrete types (without SELF_TYPE)
    pub fn is_subclass(&self, child: Symbol, parent: Symbol) -> bool {
        if child == parent {
            return true;
        }
        self.ancestors(child).any(|ancestor| ancestor == parent)
    }

    /// subtype relation extended with SELF_TYPE, which means "the class of self"
    /// when checking class `self_class`
    pub fn conforms(&self, child: Symbol, parent: Symbol, self_class: Symbol) -> bool {
        match (child == sym::SELF_TYPE, parent == sym::SELF_TYPE) {
            (true, true) => true,
            (false, true) => false,
            (true, false) => self.is_subclass(self_class, parent),
            (false, false) => self.is_subclass(child, parent),
        }
    }

    /// least upper bound (most specific common ancestor) of two concrete types
    pub fn get_lub(&self, t1: Symbol, t2: Symbol) -> Symbol {
        self.ancestors(t1)
            .find(|ancestor| self.is_subclass(t2, *ancestor))
            .unwrap_or(sym::OBJECT)
    }
}

/// iterator over the parent chain of a class
pub struct Ancestors<'g> {
    graph: &'g InheritanceGraph,
    next: Option<Symbol>,
}

impl<'g> Iterator for Ancestors<'g> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        let current = self.next?;
        self.next = self.graph.get_parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use crate::frontend::error::ErrorReporter;
    use crate::frontend::typechecker::graph::InheritanceGraph;
    use crate::frontend::typechecker::tests::Builder;
    use crate::util::symbol::{sym, Symbol};

    /// A <- B <- C, A <- D, IO <- Main
    fn hierarchy() -> (InheritanceGraph, [Symbol; 4]) {
        let mut b = Builder::new();
        let classes = vec![
            b.class("Main", "IO", vec![]),
            b.class("A", "Object", vec![]),
            b.class("B", "A", vec![]),
            b.class("C", "B", vec![]),
            b.class("D", "A", vec![]),
        ];
        let program = b.program(classes);
        let mut reporter = ErrorReporter::new();
        let graph = InheritanceGraph::build(&program, &b.interner, &mut reporter);
        assert_eq!(reporter.error_count(), 0);
        let names = [b.sym("A"), b.sym("B"), b.sym("C"), b.sym("D")];
        (graph, names)
    }

    #[test]
    fn subclass_is_reflexive_and_transitive() {
        let (graph, [a, b, c, d]) = hierarchy();
        for t in [a, b, c, d, sym::OBJECT, sym::INT, sym::SELF_TYPE].iter() {
            assert!(graph.is_subclass(*t, *t));
        }
        assert!(graph.is_subclass(c, b));
        assert!(graph.is_subclass(b, a));
        assert!(graph.is_subclass(c, a));
        assert!(graph.is_subclass(c, sym::OBJECT));
        assert!(!graph.is_subclass(a, c));
        assert!(!graph.is_subclass(d, b));
        assert!(!graph.is_subclass(sym::INT, a));
    }

    #[test]
    fn self_type_conformance() {
        let (graph, [a, b, c, _]) = hierarchy();
        assert!(graph.conforms(sym::SELF_TYPE, sym::SELF_TYPE, c));
        assert!(graph.conforms(sym::SELF_TYPE, a, c));
        assert!(graph.conforms(sym::SELF_TYPE, b, b));
        assert!(!graph.conforms(sym::SELF_TYPE, c, b));
        assert!(!graph.conforms(c, sym::SELF_TYPE, c));
        assert!(graph.conforms(c, a, b));
    }

    #[test]
    fn lub_is_symmetric_and_an_upper_bound() {
        let (graph, [a, b, c, d]) = hierarchy();
        let types = [a, b, c, d, sym::OBJECT, sym::IO, sym::MAIN, sym::STRING];
        for t1 in types.iter() {
            for t2 in types.iter() {
                let lub = graph.get_lub(*t1, *t2);
                assert_eq!(lub, graph.get_lub(*t2, *t1));
                assert!(graph.is_subclass(*t1, lub));
                assert!(graph.is_subclass(*t2, lub));
            }
        }
        assert_eq!(graph.get_lub(c, d), a);
        assert_eq!(graph.get_lub(c, b), b);
        assert_eq!(graph.get_lub(sym::MAIN, sym::IO), sym::IO);
        assert_eq!(graph.get_lub(sym::INT, sym::STRING), sym::OBJECT);
    }

    #[test]
    fn ancestors_end_at_object() {
        let (graph, [a, _, c, _]) = hierarchy();
        let chain: Vec<_> = graph.ancestors(c).collect();
        assert_eq!(chain.len(), 4);
        assert_eq!(chain[2], a);
        assert_eq!(chain.last(), Some(&sym::OBJECT));
    }
}
