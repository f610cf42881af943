use crate::frontend::error::{ErrorReporter, FrontendErrorKind};
use crate::frontend::typechecker::graph::{ClassId, ClassNode, FeatureDecl, InheritanceGraph, MethodSig};
use crate::util::env::ScopedTable;
use crate::util::symbol::{sym, Interner, Symbol};

/// attribute name -> declared type, one frame per class of the inheritance chain
pub type AttrTable = ScopedTable<Symbol, Symbol>;

/// method name -> signature, one frame per class of the inheritance chain
pub type MethodTable = ScopedTable<Symbol, MethodSig>;

/// declarations visible in every class, computed from the (valid) inheritance graph
#[derive(Debug)]
pub struct ClassTable<'i> {
    interner: &'i Interner,
    graph: InheritanceGraph,
    attrs: Vec<AttrTable>,
    methods: Vec<MethodTable>,
}

/// tables of a single class while they are being filled in
struct ClassScope<'a> {
    node: &'a ClassNode,
    attrs: AttrTable,
    methods: MethodTable,
}

impl<'i> ClassTable<'i> {
    /// walk the hierarchy root first, every class starts with a copy of its parent's tables
    pub fn gather(graph: InheritanceGraph, interner: &'i Interner, reporter: &mut ErrorReporter) -> Self {
        let mut tables: Vec<Option<(AttrTable, MethodTable)>> = vec![None; graph.len()];
        for id in graph.ids() {
            gather_class(&graph, id, interner, &mut tables, reporter);
        }
        let (attrs, methods): (Vec<_>, Vec<_>) = tables.into_iter()
            .map(Option::unwrap_or_default)
            .unzip();

        if !graph.contains(sym::MAIN) {
            reporter.error(FrontendErrorKind::MainClassMissing);
        }
        tracing::debug!(classes = graph.len(), "declarations gathered");
        Self { interner, graph, attrs, methods }
    }

    pub fn graph(&self) -> &InheritanceGraph {
        &self.graph
    }

    pub fn interner(&self) -> &'i Interner {
        self.interner
    }

    pub fn attr_table(&self, class: Symbol) -> Option<&AttrTable> {
        self.graph.id(class).map(|id| &self.attrs[id.index()])
    }

    pub fn method_table(&self, class: Symbol) -> Option<&MethodTable> {
        self.graph.id(class).map(|id| &self.methods[id.index()])
    }

    /// method visible in the class, declared there or inherited
    pub fn lookup_method(&self, class: Symbol, method: Symbol) -> Option<&MethodSig> {
        self.method_table(class)?.lookup(&method)
    }
}

fn gather_class(
    graph: &InheritanceGraph, id: ClassId, interner: &Interner,
    tables: &mut Vec<Option<(AttrTable, MethodTable)>>, reporter: &mut ErrorReporter,
) {
    if tables[id.index()].is_some() {
        return;
    }
    let node = graph.node(id);
    let (mut attrs, mut methods) = match graph.id(node.parent) {
        Some(parent_id) if parent_id != id => {
            gather_class(graph, parent_id, interner, tables, reporter);
            tables[parent_id.index()].clone().unwrap_or_default()
        }
        _ => {
            // root of the hierarchy, own frame goes on top of an empty one
            let mut attrs = AttrTable::new();
            let mut methods = MethodTable::new();
            attrs.enter_scope();
            methods.enter_scope();
            (attrs, methods)
        }
    };
    attrs.enter_scope();
    methods.enter_scope();

    let mut scope = ClassScope { node, attrs, methods };
    for feature in node.features.iter() {
        match feature {
            FeatureDecl::Attribute { ident, t, line } => {
                scope.add_attribute(graph, interner, reporter, *ident, *t, *line)
            }
            FeatureDecl::Method(sig) => scope.add_method(graph, interner, reporter, sig),
        }
    }
    scope.attrs.add_id(sym::SELF, node.ident);
    if node.ident == sym::MAIN {
        scope.check_main(interner, reporter);
    }
    tracing::trace!(class = interner.resolve(node.ident), "class declarations gathered");
    tables[id.index()] = Some((scope.attrs, scope.methods));
}

/// types that can be used in declarations: classes of the graph and the raw value slot
fn is_declarable(graph: &InheritanceGraph, t: Symbol) -> bool {
    t == sym::PRIM_SLOT || graph.contains(t)
}

impl<'a> ClassScope<'a> {
    fn error(&self, interner: &Interner, reporter: &mut ErrorReporter, line: usize, kind: FrontendErrorKind) {
        reporter.error_at(interner.resolve(self.node.file), line, kind);
    }

    fn add_attribute(
        &mut self, graph: &InheritanceGraph, interner: &Interner, reporter: &mut ErrorReporter,
        ident: Symbol, t: Symbol, line: usize,
    ) {
        let attr = String::from(interner.resolve(ident));
        let kind = if ident == sym::SELF {
            FrontendErrorKind::SelfAttribute
        } else if self.attrs.probe(&ident).is_some() {
            FrontendErrorKind::AttributeRedefined { attr }
        } else if self.attrs.lookup_enclosing(&ident).is_some() {
            FrontendErrorKind::AttributeInherited { attr }
        } else if t != sym::SELF_TYPE && !is_declarable(graph, t) {
            FrontendErrorKind::UndefinedAttributeType { attr, t: String::from(interner.resolve(t)) }
        } else {
            self.attrs.add_id(ident, t);
            return;
        };
        self.error(interner, reporter, line, kind);
    }

    fn add_method(
        &mut self, graph: &InheritanceGraph, interner: &Interner, reporter: &mut ErrorReporter,
        sig: &MethodSig,
    ) {
        let method = || String::from(interner.resolve(sig.ident));
        if self.methods.probe(&sig.ident).is_some() {
            let kind = FrontendErrorKind::MethodRedefined { method: method() };
            self.error(interner, reporter, sig.line, kind);
            return;
        }

        let mut errors = Vec::new();
        let mut seen: Vec<Symbol> = Vec::with_capacity(sig.formals.len());
        for formal in sig.formals.iter() {
            let name = String::from(interner.resolve(formal.ident));
            if formal.ident == sym::SELF {
                errors.push((formal.line, FrontendErrorKind::SelfFormal));
            } else if seen.contains(&formal.ident) {
                errors.push((formal.line, FrontendErrorKind::FormalRedefined { formal: name }));
            } else if formal.t == sym::SELF_TYPE {
                errors.push((formal.line, FrontendErrorKind::SelfTypeFormal { formal: name }));
            } else if !is_declarable(graph, formal.t) {
                let t = String::from(interner.resolve(formal.t));
                errors.push((formal.line, FrontendErrorKind::UndefinedFormalType { formal: name, t }));
            }
            seen.push(formal.ident);
        }
        if sig.ret != sym::SELF_TYPE && !is_declarable(graph, sig.ret) {
            let t = String::from(interner.resolve(sig.ret));
            errors.push((sig.line, FrontendErrorKind::UndefinedReturnType { method: method(), t }));
        }

        if let Some(inherited) = self.methods.lookup_enclosing(&sig.ident) {
            if inherited.ret != sig.ret {
                errors.push((sig.line, FrontendErrorKind::OverrideReturnType {
                    method: method(),
                    actual: String::from(interner.resolve(sig.ret)),
                    expected: String::from(interner.resolve(inherited.ret)),
                }));
            }
            if inherited.formals.len() != sig.formals.len() {
                errors.push((sig.line, FrontendErrorKind::OverrideArity { method: method() }));
            } else {
                let mismatch = sig.formals.iter()
                    .zip(inherited.formals.iter())
                    .find(|(actual, expected)| actual.t != expected.t);
                if let Some((actual, expected)) = mismatch {
                    errors.push((actual.line, FrontendErrorKind::OverrideParamType {
                        method: method(),
                        actual: String::from(interner.resolve(actual.t)),
                        expected: String::from(interner.resolve(expected.t)),
                    }));
                }
            }
        }

        if errors.is_empty() {
            tracing::trace!(class = interner.resolve(self.node.ident), method = %sig, "method declared");
            self.methods.add_id(sig.ident, sig.clone());
        } else {
            for (line, kind) in errors {
                self.error(interner, reporter, line, kind);
            }
        }
    }

    fn check_main(&self, interner: &Interner, reporter: &mut ErrorReporter) {
        match self.methods.lookup(&sym::MAIN_METHOD) {
            None => self.error(interner, reporter, self.node.line, FrontendErrorKind::MainMethodMissing),
            Some(main) if !main.formals.is_empty() => {
                self.error(interner, reporter, main.line, FrontendErrorKind::MainMethodArguments)
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::{Class, Program};
    use crate::frontend::typechecker::tests::Builder;
    use crate::meta::LocationMeta;

    fn gather<'b>(b: &'b Builder, program: &Program<LocationMeta>) -> (ClassTable<'b>, Vec<String>) {
        let mut reporter = ErrorReporter::new();
        let graph = InheritanceGraph::build(program, &b.interner, &mut reporter);
        assert_eq!(reporter.error_count(), 0);
        let table = ClassTable::gather(graph, &b.interner, &mut reporter);
        let messages = reporter.errors().iter().map(|e| e.to_string()).collect();
        (table, messages)
    }

    fn main_class(b: &mut Builder) -> Class<LocationMeta> {
        let body = b.int(0);
        let main = b.method("main", vec![], "Int", body);
        b.class("Main", "Object", vec![main])
    }

    #[test]
    fn attributes_are_inherited_and_shadowing_is_rejected() {
        let mut b = Builder::new();
        let main = main_class(&mut b);
        let a = {
            let x = b.attr("x", "Int");
            b.class("A", "Object", vec![x])
        };
        let b_class = {
            let x = b.attr("x", "String");
            let y = b.attr("y", "Bool");
            b.class("B", "A", vec![x, y])
        };
        let program = b.program(vec![main, a, b_class]);
        let (table, messages) = gather(&b, &program);

        assert_eq!(messages, vec!["test.cl:3: Attribute x is an attribute of an inherited class."]);
        let attrs = table.attr_table(b.sym("B")).unwrap();
        assert_eq!(attrs.lookup(&b.sym("x")), Some(&sym::INT));
        assert_eq!(attrs.lookup(&b.sym("y")), Some(&sym::BOOL));
        assert_eq!(attrs.lookup(&sym::SELF), Some(&b.sym("B")));
        // empty base frame, Object, A, B
        assert_eq!(attrs.depth(), 4);
    }

    #[test]
    fn attribute_declaration_errors() {
        let mut b = Builder::new();
        let main = main_class(&mut b);
        let a = {
            let features = vec![
                b.attr("self", "Int"), b.attr("x", "Int"), b.attr("x", "Int"), b.attr("z", "Missing"),
                b.attr("me", "SELF_TYPE"),
            ];
            b.class("A", "Object", features)
        };
        let program = b.program(vec![main, a]);
        let (table, messages) = gather(&b, &program);

        assert_eq!(messages, vec![
            "test.cl:2: 'self' cannot be the name of an attribute.",
            "test.cl:2: Attribute x is multiply defined in class.",
            "test.cl:2: Class Missing of attribute z is undefined.",
        ]);
        let attrs = table.attr_table(b.sym("A")).unwrap();
        assert_eq!(attrs.lookup(&b.sym("z")), None);
        assert_eq!(attrs.lookup(&b.sym("me")), Some(&sym::SELF_TYPE));
    }

    #[test]
    fn overrides_must_keep_the_signature() {
        let mut b = Builder::new();
        let main = main_class(&mut b);
        let a = {
            let body = b.int(1);
            let f = b.formal("a", "Int");
            let m = b.method("f", vec![f], "Int", body);
            b.class("A", "Object", vec![m])
        };
        let same = {
            let body = b.int(2);
            let f = b.formal("other_name", "Int");
            let m = b.method("f", vec![f], "Int", body);
            b.class("B", "A", vec![m])
        };
        let wrong_ret = {
            let body = b.int(3);
            let f = b.formal("a", "Int");
            let m = b.method("f", vec![f], "Object", body);
            b.class("C", "A", vec![m])
        };
        let wrong_arity = {
            let body = b.int(4);
            let m = b.method("f", vec![], "Int", body);
            b.class("D", "A", vec![m])
        };
        let wrong_param = {
            let body = b.int(5);
            let f = b.formal("a", "Bool");
            let m = b.method("f", vec![f], "Int", body);
            b.class("E", "A", vec![m])
        };
        let program = b.program(vec![main, a, same, wrong_ret, wrong_arity, wrong_param]);
        let (table, messages) = gather(&b, &program);

        assert_eq!(messages, vec![
            "test.cl:4: In redefined method f, return type Object is different from original return type Int.",
            "test.cl:5: Incompatible number of formal parameters in redefined method f.",
            "test.cl:6: In redefined method f, parameter type Bool is different from original type Int",
        ]);
        let f = b.sym("f");
        let overriding = table.method_table(b.sym("B")).unwrap().probe(&f);
        assert_eq!(overriding.map(|m| m.formals[0].ident), Some(b.sym("other_name")));
        assert!(table.method_table(b.sym("C")).unwrap().probe(&f).is_none());
        assert!(table.lookup_method(b.sym("C"), f).is_some());
        assert!(table.lookup_method(b.sym("E"), sym::COPY).is_some());
    }

    #[test]
    fn method_declaration_errors() {
        let mut b = Builder::new();
        let main = main_class(&mut b);
        let a = {
            let dup = {
                let body = b.int(1);
                let formals = vec![b.formal("a", "Int"), b.formal("a", "Int"), b.formal("self", "Int")];
                b.method("g", formals, "Int", body)
            };
            let self_type = {
                let body = b.int(1);
                let formals = vec![b.formal("a", "SELF_TYPE"), b.formal("c", "Nope")];
                b.method("h", formals, "Nope", body)
            };
            let redefined = {
                let body = b.int(1);
                b.method("h", vec![], "Int", body)
            };
            let again = {
                let body = b.int(1);
                b.method("h", vec![], "Int", body)
            };
            b.class("A", "Object", vec![dup, self_type, redefined, again])
        };
        let program = b.program(vec![main, a]);
        let (table, messages) = gather(&b, &program);

        assert_eq!(messages, vec![
            "test.cl:2: Formal parameter a is multiply defined.",
            "test.cl:2: 'self' cannot be the name of a formal parameter.",
            "test.cl:2: Formal parameter a cannot have type SELF_TYPE.",
            "test.cl:2: Class Nope of formal parameter c is undefined.",
            "test.cl:2: Undefined return type Nope in method h.",
            "test.cl:2: Method h is redefined in the current class.",
        ]);
        let methods = table.method_table(b.sym("A")).unwrap();
        assert!(methods.probe(&b.sym("g")).is_none());
        assert_eq!(methods.probe(&b.sym("h")).map(|m| m.ret), Some(sym::INT));
    }

    #[test]
    fn missing_main_class() {
        let mut b = Builder::new();
        let a = b.class("A", "Object", vec![]);
        let program = b.program(vec![a]);
        let (_, messages) = gather(&b, &program);
        assert_eq!(messages, vec!["Class Main is not defined."]);
    }

    #[test]
    fn main_method_requirements() {
        let mut b = Builder::new();
        let main = b.class("Main", "Object", vec![]);
        let program = b.program(vec![main]);
        let (_, messages) = gather(&b, &program);
        assert_eq!(messages, vec!["test.cl:1: No 'main' method in class Main."]);

        let mut b = Builder::new();
        let main = {
            let body = b.int(0);
            let f = b.formal("x", "Int");
            let m = b.method("main", vec![f], "Int", body);
            b.class("Main", "Object", vec![m])
        };
        let program = b.program(vec![main]);
        let (_, messages) = gather(&b, &program);
        assert_eq!(messages, vec!["test.cl:1: 'main' method in class Main should have no arguments."]);
    }

    #[test]
    fn inherited_main_method_is_accepted() {
        let mut b = Builder::new();
        let main = b.class("Main", "A", vec![]);
        let a = {
            let body = b.int(0);
            let m = b.method("main", vec![], "Int", body);
            b.class("A", "IO", vec![m])
        };
        let program = b.program(vec![main, a]);
        let (table, messages) = gather(&b, &program);
        assert!(messages.is_empty(), "{:?}", messages);
        assert!(table.lookup_method(sym::MAIN, sym::OUT_STRING).is_some());
        assert!(table.lookup_method(sym::MAIN, sym::MAIN_METHOD).is_some());
    }
}
