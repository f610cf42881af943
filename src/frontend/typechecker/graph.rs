use std::fmt;

use itertools::Itertools;

use crate::frontend::ast::{Class, FeatureKind, Keyed, Program};
use crate::frontend::error::{ErrorReporter, FrontendErrorKind};
use crate::frontend::typechecker::util::{get_basic_classes, is_basic_class};
use crate::meta::GetLocation;
use crate::util::env::Env;
use crate::util::symbol::{sym, Interner, Symbol};

/// index of a class in the inheritance graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalDecl {
    pub ident: Symbol,
    pub t: Symbol,
    pub line: usize,
}

/// signature of a method, as stored in method tables
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSig {
    pub ident: Symbol,
    pub formals: Vec<FormalDecl>,
    pub ret: Symbol,
    pub line: usize,
}

impl fmt::Display for MethodSig {
    /// symbol handles only, used in trace output
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let formals = self.formals.iter().map(|formal| formal.t).join(", ");
        write!(f, "{}({}): {}", self.ident, formals, self.ret)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureDecl {
    Attribute { ident: Symbol, t: Symbol, line: usize },
    Method(MethodSig),
}

/// declaration-level view of a class: everything except expression bodies
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub ident: Symbol,
    pub parent: Symbol,
    pub file: Symbol,
    pub line: usize,
    pub features: Vec<FeatureDecl>,
}

impl<MetaT: GetLocation> From<&Class<MetaT>> for ClassNode {
    fn from(cls: &Class<MetaT>) -> Self {
        let features = cls.item.features.iter()
            .map(|feature| {
                let line = feature.get_location().line;
                match &feature.item {
                    FeatureKind::Attribute { ident, t, init: _ } => {
                        FeatureDecl::Attribute { ident: *ident, t: *t, line }
                    }
                    FeatureKind::Method { ident, formals, ret, body: _ } => {
                        let formals = formals.iter()
                            .map(|formal| FormalDecl {
                                ident: formal.item.ident,
                                t: formal.item.t,
                                line: formal.get_location().line,
                            })
                            .collect();
                        FeatureDecl::Method(MethodSig { ident: *ident, formals, ret: *ret, line })
                    }
                }
            })
            .collect();
        Self {
            ident: cls.item.get_key(),
            parent: cls.item.parent,
            file: cls.item.file,
            line: cls.get_location().line,
            features,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Color {
    White,
    Gray,
    Black,
}

/// every class of the program (basic classes first), parents are looked up by name
#[derive(Debug, Clone)]
pub struct InheritanceGraph {
    nodes: Vec<ClassNode>,
    index: Env<ClassId>,
}

impl InheritanceGraph {
    fn new() -> Self {
        Self { nodes: Vec::new(), index: Env::default() }
    }

    /// install basic classes and all user classes, then validate parents and acyclicity
    pub fn build<MetaT: GetLocation>(
        program: &Program<MetaT>, interner: &Interner, reporter: &mut ErrorReporter,
    ) -> Self {
        let mut graph = Self::new();
        for node in get_basic_classes() {
            graph.insert(node);
        }
        graph.add_class_nodes(program, interner, reporter);
        graph.check_parents(interner, reporter);
        if graph.has_cycle() {
            reporter.error(FrontendErrorKind::InheritanceCycle);
        }
        tracing::debug!(classes = graph.nodes.len(), "inheritance graph built");
        graph
    }

    fn insert(&mut self, node: ClassNode) {
        let id = ClassId(self.nodes.len());
        self.index.insert(node.ident, id);
        self.nodes.push(node);
    }

    fn add_class_nodes<MetaT: GetLocation>(
        &mut self, program: &Program<MetaT>, interner: &Interner, reporter: &mut ErrorReporter,
    ) {
        for cls in program.item.classes.iter() {
            let node = ClassNode::from(cls);
            let file = interner.resolve(node.file);
            let class = String::from(interner.resolve(node.ident));
            if is_basic_class(node.ident) {
                reporter.error_at(file, node.line, FrontendErrorKind::BasicClassRedefined { class });
            } else if self.contains(node.ident) {
                reporter.error_at(file, node.line, FrontendErrorKind::ClassRedefined { class });
            } else {
                self.insert(node);
            }
        }
    }

    fn check_parents(&self, interner: &Interner, reporter: &mut ErrorReporter) {
        for node in self.nodes.iter() {
            let parent = node.parent;
            let kind = if parent == sym::INT || parent == sym::BOOL
                || parent == sym::STRING || parent == sym::SELF_TYPE {
                FrontendErrorKind::IllegalParent {
                    class: String::from(interner.resolve(node.ident)),
                    parent: String::from(interner.resolve(parent)),
                }
            } else if parent != sym::NO_CLASS && !self.contains(parent) {
                FrontendErrorKind::UndefinedParent {
                    class: String::from(interner.resolve(node.ident)),
                    parent: String::from(interner.resolve(parent)),
                }
            } else {
                continue;
            };
            reporter.error_at(interner.resolve(node.file), node.line, kind);
        }
    }

    /// depth first search over the parent relation, stops at the first cycle found
    fn has_cycle(&self) -> bool {
        let mut colors = vec![Color::White; self.nodes.len()];
        (0..self.nodes.len()).any(|i| self.visit(ClassId(i), &mut colors))
    }

    fn visit(&self, id: ClassId, colors: &mut [Color]) -> bool {
        match colors[id.0] {
            Color::Gray => return true,
            Color::Black => return false,
            Color::White => {}
        }
        colors[id.0] = Color::Gray;
        let found = match self.id(self.nodes[id.0].parent) {
            Some(parent_id) => self.visit(parent_id, colors),
            None => false,
        };
        colors[id.0] = Color::Black;
        found
    }

    pub fn contains(&self, name: Symbol) -> bool {
        self.index.contains_key(&name)
    }

    pub fn id(&self, name: Symbol) -> Option<ClassId> {
        self.index.get(&name).copied()
    }

    pub fn get(&self, name: Symbol) -> Option<&ClassNode> {
        self.id(name).map(|id| &self.nodes[id.0])
    }

    pub fn node(&self, id: ClassId) -> &ClassNode {
        &self.nodes[id.0]
    }

    /// all class ids in installation order (basic classes, then user classes as declared)
    pub fn ids(&self) -> impl Iterator<Item=ClassId> {
        (0..self.nodes.len()).map(ClassId)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// parent of a class present in the graph, None for Object and unknown classes
    pub fn get_parent(&self, name: Symbol) -> Option<Symbol> {
        let parent = self.get(name)?.parent;
        if parent == sym::NO_CLASS {
            None
        } else {
            Some(parent)
        }
    }
}
