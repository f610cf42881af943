use include_dir::{include_dir, Dir};

use cool::frontend::printer::AstDump;
use cool::frontend::process_code;
use cool::util::symbol::Interner;

static GOOD_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/tests/good");
static BAD_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/tests/bad");

fn ast_files(dir: &'static Dir<'static>) -> impl Iterator<Item=(String, &'static str)> {
    dir.files()
        .filter(|file| file.path().extension().map_or(false, |ext| ext == "ast"))
        .map(|file| {
            let file_name = file.path().to_string_lossy().into_owned();
            let source_code = file.contents_utf8().unwrap();
            (file_name, source_code)
        })
}

#[test]
fn good_examples_processed() {
    let mut failed_cases: Vec<String> = vec![];
    for (file_name, source_code) in ast_files(&GOOD_DIR) {
        let mut interner = Interner::new();
        match process_code(&file_name, source_code, &mut interner) {
            Ok(_) => {
                // make sure to run cargo test with --nocapture flag
                println!("Passed {}", file_name);
            }
            Err(errors) => {
                println!("Failed {}: {:?}", file_name, errors);
                failed_cases.push(file_name);
            }
        }
    }
    assert_eq!(failed_cases.len(), 0usize, "{:?}", failed_cases);
}

#[test]
fn good_examples_are_idempotent() {
    let mut failed_cases: Vec<String> = vec![];
    for (file_name, source_code) in ast_files(&GOOD_DIR) {
        let mut interner = Interner::new();
        let first = match process_code(&file_name, source_code, &mut interner) {
            Ok(program) => AstDump::new(&program, &interner).to_string(),
            Err(_) => {
                failed_cases.push(file_name);
                continue;
            }
        };
        let second = match process_code(&file_name, &first, &mut interner) {
            Ok(program) => AstDump::new(&program, &interner).to_string(),
            Err(_) => {
                failed_cases.push(file_name);
                continue;
            }
        };
        if first != second {
            println!("Output of {} changed after second pass", file_name);
            failed_cases.push(file_name);
        }
    }
    assert_eq!(failed_cases.len(), 0usize, "{:?}", failed_cases);
}

#[test]
fn annotated_dump_contains_types() {
    let source_code = GOOD_DIR.get_file("hello.ast").unwrap().contents_utf8().unwrap();
    let mut interner = Interner::new();
    let program = process_code("hello.ast", source_code, &mut interner).unwrap();
    let dump = AstDump::new(&program, &interner).to_string();

    let expected = r#"#1
_program
  #1
  _class
    Main
    IO
    "hello.cl"
    (
    #2
    _method
      main
      SELF_TYPE
      #2
      _dispatch
        #2
        _object
          self
        : SELF_TYPE
        out_string
        (
        #2
        _string
          "Hello, World.\n"
        : String
        )
      : SELF_TYPE
    )
"#;
    assert_eq!(dump, expected);
}

#[test]
fn bad_examples_report_expected_errors() {
    let mut failed_cases: Vec<String> = vec![];
    for (file_name, source_code) in ast_files(&BAD_DIR) {
        let expected_path = file_name.replace(".ast", ".err");
        let expected = BAD_DIR.get_file(&expected_path)
            .and_then(|file| file.contents_utf8())
            .unwrap_or("");
        let expected: Vec<&str> = expected.lines().collect();

        let mut interner = Interner::new();
        match process_code(&file_name, source_code, &mut interner) {
            Ok(_) => {
                println!("Incorrectly accepted {}", file_name);
                failed_cases.push(file_name);
            }
            Err(errors) => {
                let actual: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                if actual != expected {
                    println!("Unexpected errors for {}:\n{:#?}\nexpected:\n{:#?}", file_name, actual, expected);
                    failed_cases.push(file_name);
                } else {
                    println!("Passed {}", file_name);
                }
            }
        }
    }
    assert_eq!(
        failed_cases.len(),
        0usize,
        "Following files were not rejected as expected: {:?}",
        failed_cases
    );
}
