use std::sync::OnceLock;

use lalrpop_util::lalrpop_mod;
use regex::{Captures, Regex};

use crate::frontend::error::FrontendError;
use crate::meta::LocationMeta;
use crate::util::symbol::Interner;

use self::ast::Program;
use self::cool_ast::ProgramParser;

lalrpop_mod!(#[allow(clippy::all, unused_parens)] cool_ast, "/frontend/parser/cool_ast.rs");

pub mod ast;


pub type ParsedProgram = Program<LocationMeta>;
/// parser errors are located by byte offset, mapped to source lines by the caller
pub type ParserErrors = Vec<FrontendError<usize>>;


/// read the textual ast dump produced by the cool parser, interning every name
pub fn parse_program(source_code: &str, interner: &mut Interner) -> Result<ParsedProgram, ParserErrors> {
    let parser = ProgramParser::new();
    parser.parse(interner, source_code)
        .map_err(|e| vec![FrontendError::from(e)])
}

/// resolve escape sequences of a string constant as printed by the cool parser
pub fn unescape(escaped: &str) -> String {
    static ESCAPE: OnceLock<Regex> = OnceLock::new();
    let escape = ESCAPE.get_or_init(|| {
        Regex::new(r"\\([0-7]{3}|.)").expect("escape sequence pattern is valid")
    });
    escape.replace_all(escaped, |caps: &Captures| {
        let seq = &caps[1];
        match seq {
            "n" => String::from("\n"),
            "t" => String::from("\t"),
            "b" => String::from("\u{8}"),
            "f" => String::from("\u{c}"),
            _ if seq.len() == 3 => {
                u32::from_str_radix(seq, 8).ok()
                    .and_then(std::char::from_u32)
                    .map(String::from)
                    .unwrap_or_default()
            }
            other => String::from(other),
        }
    }).into_owned()
}
