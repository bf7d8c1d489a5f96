use crate::runtime::Value;


// Backing storage grows geometrically: 8 slots to start with, doubling
// afterwards, so appends stay amortized O(1).
const fn grow_capacity(capacity: usize) -> usize {
    if capacity < 8 { 8 } else { capacity * 2 }
}

/// Growable sequence of constants, indexed by the single operand byte of
/// `OP_CONSTANT` and `OP_DEFINE_GLOBAL`.
#[derive(Debug, Default)]
pub struct ValueArray {
    values: Vec<Value>,
}

impl ValueArray {
    pub fn new() -> Self {
        ValueArray { values: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub fn write(&mut self, value: Value) {
        if self.values.len() == self.values.capacity() {
            let new_capacity = grow_capacity(self.values.capacity());
            self.values.reserve_exact(new_capacity - self.values.len());
        }
        self.values.push(value);
    }

    pub fn get(&self, index: usize) -> Value {
        self.values[index]
    }

    pub fn as_slice(&self) -> &[Value] {
        self.values.as_slice()
    }
}

/// A compiled unit: bytecode, a parallel table of source lines, and the
/// constant pool. Append-only while compiling, read-only while executing.
#[derive(Debug, Default)]
pub struct Chunk {
    code: Vec<u8>,
    lines: Vec<u32>,
    constants: ValueArray,
}

impl Chunk {
    pub fn new() -> Self {
        Chunk {
            code: Vec::new(),
            lines: Vec::new(),
            constants: ValueArray::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.code.as_slice()
    }

    #[inline]
    pub fn read(&self, offset: usize) -> u8 {
        self.code[offset]
    }

    /// Source line for the instruction byte at `offset`.
    #[inline]
    pub fn line(&self, offset: usize) -> u32 {
        self.lines[offset]
    }

    // using Into<u8> so that OpCodes can be written without extra fuss
    pub fn write(&mut self, byte: impl Into<u8>, line: u32) {
        if self.code.len() == self.code.capacity() {
            let new_capacity = grow_capacity(self.code.capacity());
            self.code.reserve_exact(new_capacity - self.code.len());
            self.lines.reserve_exact(new_capacity - self.lines.len());
        }
        self.code.push(byte.into());
        self.lines.push(line);
    }

    /// Appends a constant and returns its raw pool index. The single-byte
    /// operand limit is the compiler's to enforce; this just grows.
    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.write(value);
        self.constants.len() - 1
    }

    #[inline]
    pub fn constant(&self, index: u8) -> Value {
        self.constants.get(usize::from(index))
    }

    pub fn constants(&self) -> &ValueArray {
        &self.constants
    }
}
