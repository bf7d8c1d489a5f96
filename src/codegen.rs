pub mod chunk;
pub use chunk::{Chunk, ValueArray};

mod opcodes;
pub use opcodes::OpCode;

mod compiler;
pub use compiler::compile;

pub mod errors;
pub use errors::{CompileError, ErrorAt};

mod tests;
