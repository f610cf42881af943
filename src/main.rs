use std::env;
use std::io;
use std::process::exit;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use cool::frontend::printer::AstDump;
use cool::frontend::{process_file, process_reader, Error};
use cool::parse_env;
use cool::util::symbol::Interner;


/// get the optional input file name, the ast dump is read from stdin when it is missing
pub fn parse_arg() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("-h") | Some("--help") => {
            println!("Usage: {} {}", &args[0], "[input_filename]");
            exit(0)
        }
        Some(input_filename) => Some(String::from(input_filename)),
        None => None,
    }
}

/// log to stderr when SEMANT_LOG is set, eg. SEMANT_LOG=debug or SEMANT_LOG=cool=trace
fn init_logging() {
    if let Ok(filter) = EnvFilter::try_from_env("SEMANT_LOG") {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(io::stderr);
        if parse_env("SEMANT_LOG_STYLE", "compact") == "full" {
            builder.with_span_events(FmtSpan::NEW | FmtSpan::CLOSE).init();
        } else {
            builder.without_time().compact().init();
        }
        tracing::debug!("tracing initialized");
    }
}

/// run the semantic analysis and print the annotated ast on success
fn run(input_filename: Option<&str>) -> Result<(), Vec<Error>> {
    let mut interner = Interner::new();
    let program = match input_filename {
        Some(path) => process_file(path, &mut interner)?,
        None => process_reader("<stdin>", &mut io::stdin(), &mut interner)?,
    };
    print!("{}", AstDump::new(&program, &interner));
    Ok(())
}

fn main() {
    init_logging();

    let input_filename = parse_arg();
    if let Err(err_vec) = run(input_filename.as_deref()) {
        for err in err_vec.iter() {
            eprintln!("{}", err);
        }
        if err_vec.iter().any(|err| err.item.is_semantic()) {
            eprintln!("Compilation halted due to static semantic errors.");
        }
        exit(1);
    }
}
