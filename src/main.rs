use std::{env, fs, process};

use loxvm::{interpret, InterpretResult, VM};

mod repl;

const EX_USAGE: i32 = 64;
const EX_IOERR: i32 = 74;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => repl::repl(),
        [path] => run_file(path),
        _ => {
            eprintln!("Usage: loxvm [path]");
            process::exit(EX_USAGE);
        }
    }
}

fn run_file(path: &str) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("Could not read file \"{}\": {}.", path, err);
            process::exit(EX_IOERR);
        }
    };
    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(_) => {
            eprintln!("File \"{}\" is not valid UTF-8.", path);
            process::exit(EX_IOERR);
        }
    };

    let mut vm = VM::new();
    let result = interpret(&mut vm, &source);
    report(&result);
    process::exit(result.exit_code());
}

pub(crate) fn report(result: &InterpretResult) {
    match result {
        InterpretResult::Ok(value) => println!("{}", value),
        InterpretResult::CompileError(err) => eprintln!("{}", err),
        InterpretResult::RuntimeError(err) => eprintln!("{}", err),
    }
}
