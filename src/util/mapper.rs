use crate::frontend::ast::{Class, Expression, Feature, Formal, Program, ProgramItem};

/// converts the ast to one with different metadata, eg. typechecker maps
/// location metadata to type metadata, errors are collected by the implementor
pub trait AstMapper<FromMeta, ToMeta> {
    fn map_expression(&mut self, expr: &Expression<FromMeta>) -> Expression<ToMeta>;
    fn map_formal(&mut self, formal: &Formal<FromMeta>) -> Formal<ToMeta>;
    fn map_feature(&mut self, feature: &Feature<FromMeta>) -> Feature<ToMeta>;
    fn map_class(&mut self, class: &Class<FromMeta>) -> Class<ToMeta>;

    /// metadata of the program root itself
    fn map_program_meta(&mut self, program: &Program<FromMeta>) -> ToMeta;

    /// main ast mapper function, default implementation maps classes in order
    fn map_program(&mut self, program: &Program<FromMeta>) -> Program<ToMeta> {
        let classes = program.item.classes.iter()
            .map(|cls| self.map_class(cls))
            .collect();
        let meta = self.map_program_meta(program);
        Program::new(ProgramItem { classes }, meta)
    }
}
