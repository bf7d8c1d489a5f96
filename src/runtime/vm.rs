use std::io::{self, Write};

use crate::codegen::{self, Chunk, OpCode};
use crate::runtime::errors::{ErrorKind, ExecResult, RuntimeError};
use crate::runtime::heap::ObjHeap;
use crate::runtime::table::Table;
use crate::runtime::value::Value;
use crate::InterpretError;


/// Operand stack capacity. The compiler's stack discipline (statements are
/// net-zero, expressions net one) keeps well under this for the implemented
/// grammar.
pub const STACK_MAX: usize = 256;


// Helper macros for the dispatch loop

macro_rules! arith_op {
    ( $vm:expr, $chunk:expr, $ip:expr, $op:tt ) => {{
        let rhs = $vm.pop();
        let lhs = $vm.pop();
        match (lhs.as_number(), rhs.as_number()) {
            (Some(lhs), Some(rhs)) => $vm.push(Value::Number(lhs $op rhs)),
            _ => return Err(RuntimeError::new(
                ErrorKind::InvalidArithmeticOperands,
                $chunk.line($ip - 1),
            )),
        }
    }};
}

macro_rules! cmp_op {
    ( $vm:expr, $chunk:expr, $ip:expr, $op:tt ) => {{
        let rhs = $vm.pop();
        let lhs = $vm.pop();
        match (lhs.as_number(), rhs.as_number()) {
            (Some(lhs), Some(rhs)) => $vm.push(Value::Bool(lhs $op rhs)),
            _ => return Err(RuntimeError::new(
                ErrorKind::InvalidCompareOperands,
                $chunk.line($ip - 1),
            )),
        }
    }};
}


/// Stack-based bytecode interpreter. Lives for the whole process in the
/// REPL, so interned strings and globals carry over between lines; each
/// `interpret` call owns its chunk and drops it on the way out.
pub struct VirtualMachine {
    stack: Vec<Value>,
    globals: Table,
    heap: ObjHeap,
}

impl VirtualMachine {
    pub fn new() -> Self {
        VirtualMachine {
            stack: Vec::with_capacity(STACK_MAX),
            globals: Table::new(),
            heap: ObjHeap::new(),
        }
    }

    /// Compiles and runs `source`, printing to stdout.
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpretError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.interpret_to(source, &mut out)
    }

    /// Same pipeline with an explicit output sink.
    pub fn interpret_to(&mut self, source: &str, out: &mut dyn Write) -> Result<(), InterpretError> {
        let chunk = codegen::compile(source, &mut self.heap)
            .map_err(InterpretError::Compile)?;

        match self.run(&chunk, out) {
            Ok(()) => Ok(()),
            Err(error) => {
                self.stack.clear();
                Err(InterpretError::Runtime(error))
            }
        }
    }

    pub(crate) fn run(&mut self, chunk: &Chunk, out: &mut dyn Write) -> ExecResult<()> {
        let mut ip = 0;

        loop {
            let offset = ip;
            let byte = chunk.read(ip);
            ip += 1;

            let opcode = match OpCode::from_byte(byte) {
                Some(opcode) => opcode,
                // skip unknown bytes rather than losing forward progress
                None => continue,
            };

            log::trace!("{:04} {:16} {:?}", offset, opcode, self.stack);

            match opcode {
                OpCode::Constant => {
                    let index = chunk.read(ip);
                    ip += 1;
                    self.push(chunk.constant(index));
                }

                OpCode::Nil => self.push(Value::Nil),
                OpCode::True => self.push(Value::Bool(true)),
                OpCode::False => self.push(Value::Bool(false)),

                OpCode::Pop => {
                    self.pop();
                }

                OpCode::DefineGlobal => {
                    let index = chunk.read(ip);
                    ip += 1;

                    let value = self.pop();
                    if let Value::Obj(name) = chunk.constant(index) {
                        self.globals.set(name, value);
                    }
                }

                OpCode::Equal => {
                    let rhs = self.pop();
                    let lhs = self.pop();
                    self.push(Value::Bool(lhs.equal(&rhs)));
                }

                OpCode::Greater => cmp_op!(self, chunk, ip, >),
                OpCode::Less => cmp_op!(self, chunk, ip, <),

                OpCode::Add => {
                    let rhs = self.pop();
                    let lhs = self.pop();

                    if let (Some(lhs), Some(rhs)) = (lhs.as_string(), rhs.as_string()) {
                        let mut buffer = String::with_capacity(lhs.len() + rhs.len());
                        buffer.push_str(lhs.as_str());
                        buffer.push_str(rhs.as_str());

                        // take_string drops the buffer if the result is
                        // already interned
                        let result = self.heap.take_string(buffer);
                        self.push(Value::Obj(result));
                    } else if let (Some(lhs), Some(rhs)) = (lhs.as_number(), rhs.as_number()) {
                        self.push(Value::Number(lhs + rhs));
                    } else {
                        return Err(RuntimeError::new(
                            ErrorKind::InvalidArithmeticOperands,
                            chunk.line(ip - 1),
                        ));
                    }
                }

                OpCode::Subtract => arith_op!(self, chunk, ip, -),
                OpCode::Multiply => arith_op!(self, chunk, ip, *),
                OpCode::Divide => arith_op!(self, chunk, ip, /),

                OpCode::Not => {
                    let value = self.pop();
                    self.push(Value::Bool(value.is_falsey()));
                }

                OpCode::Negate => match self.peek(0).as_number() {
                    Some(value) => {
                        self.pop();
                        self.push(Value::Number(-value));
                    }
                    None => {
                        return Err(RuntimeError::new(
                            ErrorKind::InvalidUnaryOperand,
                            chunk.line(ip - 1),
                        ));
                    }
                },

                OpCode::Print => {
                    let value = self.pop();
                    let _ = writeln!(out, "{}", value);
                }

                OpCode::Return => return Ok(()),
            }
        }
    }

    // Stack discipline is the compiler's responsibility; a miss here is a
    // codegen bug, not a user error.

    fn push(&mut self, value: Value) {
        debug_assert!(self.stack.len() < STACK_MAX, "stack overflow");
        self.stack.push(value);
    }

    fn pop(&mut self) -> Value {
        self.stack.pop().expect("stack underflow")
    }

    fn peek(&self, distance: usize) -> Value {
        self.stack[self.stack.len() - 1 - distance]
    }

    #[cfg(test)]
    pub(crate) fn stack_len(&self) -> usize {
        self.stack.len()
    }

    #[cfg(test)]
    pub(crate) fn heap_mut(&mut self) -> &mut ObjHeap {
        &mut self.heap
    }

    #[cfg(test)]
    pub(crate) fn globals(&self) -> &Table {
        &self.globals
    }
}

impl Default for VirtualMachine {
    fn default() -> Self {
        Self::new()
    }
}
