use crate::frontend::ast::Program;
use crate::frontend::error::{Diagnostic, ErrorReporter};
use crate::meta::{GetLocation, TypeMeta};
use crate::util::mapper::AstMapper;
use crate::util::symbol::Interner;

use self::gather::ClassTable;
use self::graph::InheritanceGraph;
use self::typechecker::TypeChecker;

mod util;
mod graph;
mod subtype;
mod gather;
mod typechecker;
mod mapper;


pub type TypeCheckResult<AstT> = Result<AstT, Vec<Diagnostic>>;

/// main typechecker function: validates the class hierarchy, gathers declarations
/// of all classes and annotates every expression of the program with its type,
/// checking stops after the first phase that reported any error
pub fn check_types<M: GetLocation>(program: &Program<M>, interner: &Interner) -> TypeCheckResult<Program<TypeMeta>> {
    let mut reporter = ErrorReporter::new();

    // the hierarchy must be valid (known parents, no cycles) before inheritance is used
    let graph = InheritanceGraph::build(program, interner, &mut reporter);
    reporter.checkpoint()?;

    let table = ClassTable::gather(graph, interner, &mut reporter);
    reporter.checkpoint()?;

    let checked = {
        let mut typechecker = TypeChecker::new(&table, &mut reporter);
        typechecker.map_program(program)
    };
    reporter.checkpoint()?;
    tracing::debug!(classes = checked.item.classes.len(), "program typechecked");
    Ok(checked)
}
