extern crate lalrpop;

/// this build script is used to generate the ast dump reader from its grammar
/// (src/frontend/parser/cool_ast.lalrpop), output goes to OUT_DIR
fn main() {
    lalrpop::process_root().unwrap();
}
