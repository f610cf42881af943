use std::fs;
use std::io::Read;
use std::ops::Add;
use std::sync::Arc;

use codemap::{CodeMap, File, Pos};

use crate::meta::{MetaMapper, TypeMeta};
use crate::util::symbol::Interner;

use self::error::{Diagnostic, ErrorLocation, FrontendError, FrontendErrorKind};
pub use self::parser::ast;
use self::parser::parse_program;
pub use self::typechecker::check_types;

mod parser;
mod typechecker;

pub mod error;
pub mod printer;


pub type CheckedProgram = ast::Program<TypeMeta>;
pub type Error = Diagnostic;

/// load file from path and process it as an ast dump
pub fn process_file(path: &str, interner: &mut Interner) -> Result<CheckedProgram, Vec<Error>> {
    let source_code = match fs::read_to_string(path) {
        Ok(source_code) => source_code,
        Err(e) => {
            let err = FrontendError::new(
                FrontendErrorKind::SystemError { message: format!("Failed to read file {}: {}", path, e) },
                ErrorLocation::Program,
            );
            return Err(vec![err]);
        }
    };
    process_code(path, &source_code, interner)
}

/// read the whole ast dump from a reader (eg. stdin) and process it under given name
pub fn process_reader<R: Read>(
    name: &str, reader: &mut R, interner: &mut Interner,
) -> Result<CheckedProgram, Vec<Error>> {
    let mut source_code = String::new();
    if let Err(e) = reader.read_to_string(&mut source_code) {
        let err = FrontendError::new(
            FrontendErrorKind::SystemError { message: format!("Failed to read {}: {}", name, e) },
            ErrorLocation::Program,
        );
        return Err(vec![err]);
    }
    process_code(name, &source_code, interner)
}

/// read the ast dump given by name and run the semantic analysis on it
pub fn process_code(file_name: &str, source_code: &str, interner: &mut Interner) -> Result<CheckedProgram, Vec<Error>> {
    let _span = tracing::debug_span!("process", file = file_name).entered();
    let program = match parse_program(source_code, interner) {
        Ok(program) => program,
        Err(errors) => {
            // setup codemap for mapping byte offset to (file, line, column)
            let mut codemap = CodeMap::new();
            let codemap_file = codemap.add_file(String::from(file_name), String::from(source_code));
            let located_errors = errors.iter()
                .map(|e| e.map_meta(&codemap_file).map_meta(&codemap))
                .collect();
            return Err(located_errors);
        }
    };
    tracing::debug!(classes = program.item.classes.len(), "ast dump parsed");
    check_types(&program, interner)
}

/// necessary for mapping parser error location
impl MetaMapper<usize, Pos> for Arc<File> {
    fn map_meta(&self, from: &usize) -> Pos {
        let offset = (*from).min(self.source().len());
        self.span.low().add(offset as u64)
    }
}

/// necessary for mapping parser error location, lines are counted from 1
impl MetaMapper<Pos, ErrorLocation> for CodeMap {
    fn map_meta(&self, from: &Pos) -> ErrorLocation {
        let loc = self.look_up_pos(*from);
        ErrorLocation::Source {
            file: String::from(loc.file.name()),
            line: loc.position.line + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_are_located_by_line() {
        let mut interner = Interner::new();
        let source = "#1\n_program\n  #1\n  _class\n    Main\n    Object\n    oops\n";
        let errors = process_code("bad.ast", source, &mut interner).unwrap_err();
        assert_eq!(errors.len(), 1);
        match errors[0].get_meta() {
            ErrorLocation::Source { file, line } => {
                assert_eq!(file, "bad.ast");
                assert_eq!(*line, 7);
            }
            ErrorLocation::Program => panic!("parse error should point to a line"),
        }
    }

    #[test]
    fn missing_file_is_a_system_error() {
        let mut interner = Interner::new();
        let errors = process_file("/nonexistent/file.ast", &mut interner).unwrap_err();
        assert!(errors[0].to_string().starts_with("Failed to read file /nonexistent/file.ast"));
        assert!(!errors[0].item.is_semantic());
    }

    struct BrokenPipe;

    impl Read for BrokenPipe {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn unreadable_input_is_a_system_error() {
        let mut interner = Interner::new();
        let errors = process_reader("<stdin>", &mut BrokenPipe, &mut interner).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Failed to read <stdin>: pipe closed");
        assert!(!errors[0].item.is_semantic());
    }

    #[test]
    fn dump_is_read_from_any_reader() {
        let mut interner = Interner::new();
        let source = "#1\n_program\n  #1\n  _class\n    Main\n    Object\n    \"a.cl\"\n    (\n    )\n";
        let errors = process_reader("<stdin>", &mut source.as_bytes(), &mut interner).unwrap_err();
        let printed: Vec<_> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(printed, vec!["a.cl:1: No 'main' method in class Main."]);
        assert!(errors[0].item.is_semantic());
    }
}
