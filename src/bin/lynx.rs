use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Arg, Command};

use lynx::source::{ModuleSource, SourceType};
use lynx::{InterpretError, VirtualMachine};

// sysexits-style codes, one per failure stage
const EXIT_COMPILE_ERROR: i32 = 65;
const EXIT_RUNTIME_ERROR: i32 = 70;
const EXIT_IO_ERROR: i32 = 74;

fn main() {
    env_logger::init();

    let app = Command::new("lynx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("An interpreter for the Lynx programming language")
        .arg(
            Arg::new("file")
            .index(1)
            .help("path to input script file")
            .value_name("FILE")
        )
        .arg(
            Arg::new("cmd")
            .short('c')
            .help("execute a snippet then exit")
            .value_name("CMD")
            .takes_value(true)
        );

    let args = app.get_matches();

    let mut module = None;
    if let Some(snippet) = args.value_of("cmd") {
        let source = SourceType::String(snippet.to_string());
        module = Some(ModuleSource::new("<cmd>", source));
    } else if let Some(path) = args.value_of("file") {
        let source = SourceType::File(PathBuf::from(path));
        module = Some(ModuleSource::new(path, source));
    }

    match module {
        Some(module) => run_module(module),
        None => Repl::new().run(),
    }
}

fn run_module(module: ModuleSource) {
    let source = match module.source_text() {
        Ok(source) => source,

        Err(error) => {
            eprintln!("Error reading \"{}\": {}.", module.name(), error);
            process::exit(EXIT_IO_ERROR);
        }
    };

    let mut vm = VirtualMachine::new();
    if let Err(errors) = vm.interpret(&source) {
        lynx::print_errors(&errors);

        let code = match errors {
            InterpretError::Compile(..) => EXIT_COMPILE_ERROR,
            InterpretError::Runtime(..) => EXIT_RUNTIME_ERROR,
        };
        process::exit(code);
    }
}


//////// REPL ////////


const PROMPT: &str = "> ";

struct Repl {
    vm: VirtualMachine,
}

enum ReadLine {
    Ok(String),
    Eof,
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            vm: VirtualMachine::new(),
        }
    }

    fn read_line(&self) -> ReadLine {
        let mut stdout = io::stdout();
        let _ = stdout.write_all(PROMPT.as_bytes());
        let _ = stdout.flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => ReadLine::Eof,
            Ok(_) => ReadLine::Ok(input),

            Err(error) => {
                eprintln!("Could not read input: {}", error);
                process::exit(EXIT_IO_ERROR);
            }
        }
    }

    pub fn run(&mut self) {
        loop {
            let line = match self.read_line() {
                ReadLine::Eof => {
                    println!();
                    return;
                }
                ReadLine::Ok(line) => line,
            };

            // errors don't end the session, and the VM stays warm so
            // interned strings and globals survive to the next line
            if let Err(errors) = self.vm.interpret(&line) {
                lynx::print_errors(&errors);
            }
        }
    }
}
