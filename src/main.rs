use std::env;

use lox_core::runner;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <tokenize|parse|run> <path> [-d]", program_name(&args));
        std::process::exit(runner::EXIT_USAGE_ERROR);
    }

    let command = &args[1];
    let path = &args[2];
    let debug = args.get(3).map(|flag| flag == "-d").unwrap_or(false);

    std::process::exit(runner::run(command, path, debug));
}

fn program_name(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or("program")
}
