use std::fmt;
use std::error::Error;


pub type ExecResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Non-number operand to `NEGATE`.
    InvalidUnaryOperand,
    /// Non-number operands to a comparison.
    InvalidCompareOperands,
    /// Arithmetic on anything but two numbers (or, for `ADD`, two strings).
    InvalidArithmeticOperands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeError {
    kind: ErrorKind,
    line: u32,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, line: u32) -> Self {
        RuntimeError { kind, line }
    }

    pub fn kind(&self) -> ErrorKind { self.kind }

    /// Source line of the instruction that failed.
    pub fn line(&self) -> u32 { self.line }
}

impl Error for RuntimeError { }

impl fmt::Display for RuntimeError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind {
            ErrorKind::InvalidUnaryOperand => "Operand must be a number.",
            ErrorKind::InvalidCompareOperands => "Operands must be numbers.",
            ErrorKind::InvalidArithmeticOperands => "Operands must be two numbers or two strings.",
        };
        fmt.write_str(message)
    }
}
