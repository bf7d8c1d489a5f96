pub mod source;
pub mod lexer;
pub mod codegen;
pub mod runtime;

use codegen::CompileError;
use runtime::RuntimeError;

pub use runtime::VirtualMachine;


/// What an `interpret` call can fail with, by stage. Either way the VM
/// remains usable for the next call.
#[derive(Debug)]
pub enum InterpretError {
    Compile(Vec<CompileError>),
    Runtime(RuntimeError),
}

/// Renders errors to stderr the way the CLI and REPL report them.
pub fn print_errors(errors: &InterpretError) {
    match errors {
        InterpretError::Compile(errors) => {
            for error in errors.iter() {
                eprintln!("{}", error);
            }
        }

        InterpretError::Runtime(error) => {
            eprintln!("{}", error);
            eprintln!("[line {}] in script", error.line());
        }
    }
}
