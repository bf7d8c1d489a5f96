// Opcodes
//
// Rust enums are not like C enums, so to convert between opcode bytes and
// the enum cheaply each value is pinned down as a const. Values are assigned
// sequentially; operands, where present, are single bytes following the
// opcode. Everything from 0x11 up is unassigned (a future wide constant
// load would claim the next slot).

const OP_CONSTANT:      u8 = 0x00;  // (u8 const index); _ => [ value ]
const OP_NIL:           u8 = 0x01;  // _ => [ nil ]
const OP_TRUE:          u8 = 0x02;  // _ => [ true ]
const OP_FALSE:         u8 = 0x03;  // _ => [ false ]
const OP_POP:           u8 = 0x04;  // [ _ ] => []
const OP_DEF_GLOBAL:    u8 = 0x05;  // (u8 const index of name); [ value ] => []
const OP_EQUAL:         u8 = 0x06;  // [ lhs rhs ] => [ result ]
const OP_GREATER:       u8 = 0x07;
const OP_LESS:          u8 = 0x08;
const OP_ADD:           u8 = 0x09;
const OP_SUBTRACT:      u8 = 0x0A;
const OP_MULTIPLY:      u8 = 0x0B;
const OP_DIVIDE:        u8 = 0x0C;
const OP_NOT:           u8 = 0x0D;  // [ operand ] => [ result ]
const OP_NEGATE:        u8 = 0x0E;
const OP_PRINT:         u8 = 0x0F;  // [ value ] => []
const OP_RETURN:        u8 = 0x10;

// There are no opcodes for !=, <=, or >=; the compiler composes those from
// EQUAL/LESS/GREATER followed by NOT.

#[repr(u8)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum OpCode {
    Constant = OP_CONSTANT,
    Nil = OP_NIL,
    True = OP_TRUE,
    False = OP_FALSE,
    Pop = OP_POP,
    DefineGlobal = OP_DEF_GLOBAL,
    Equal = OP_EQUAL,
    Greater = OP_GREATER,
    Less = OP_LESS,
    Add = OP_ADD,
    Subtract = OP_SUBTRACT,
    Multiply = OP_MULTIPLY,
    Divide = OP_DIVIDE,
    Not = OP_NOT,
    Negate = OP_NEGATE,
    Print = OP_PRINT,
    Return = OP_RETURN,
}

impl OpCode {
    #[inline]
    pub fn from_byte(byte: u8) -> Option<OpCode> {
        let opcode = match byte {
            OP_CONSTANT => Self::Constant,
            OP_NIL => Self::Nil,
            OP_TRUE => Self::True,
            OP_FALSE => Self::False,
            OP_POP => Self::Pop,
            OP_DEF_GLOBAL => Self::DefineGlobal,
            OP_EQUAL => Self::Equal,
            OP_GREATER => Self::Greater,
            OP_LESS => Self::Less,
            OP_ADD => Self::Add,
            OP_SUBTRACT => Self::Subtract,
            OP_MULTIPLY => Self::Multiply,
            OP_DIVIDE => Self::Divide,
            OP_NOT => Self::Not,
            OP_NEGATE => Self::Negate,
            OP_PRINT => Self::Print,
            OP_RETURN => Self::Return,
            _ => return None,
        };
        Some(opcode)
    }
}

impl From<OpCode> for u8 {
    fn from(opcode: OpCode) -> Self { opcode as u8 }
}

// For trace logging
impl std::fmt::Display for OpCode {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = match *self {
            Self::Constant => "OP_CONSTANT",
            Self::Nil => "OP_NIL",
            Self::True => "OP_TRUE",
            Self::False => "OP_FALSE",
            Self::Pop => "OP_POP",
            Self::DefineGlobal => "OP_DEFINE_GLOBAL",
            Self::Equal => "OP_EQUAL",
            Self::Greater => "OP_GREATER",
            Self::Less => "OP_LESS",
            Self::Add => "OP_ADD",
            Self::Subtract => "OP_SUBTRACT",
            Self::Multiply => "OP_MULTIPLY",
            Self::Divide => "OP_DIVIDE",
            Self::Not => "OP_NOT",
            Self::Negate => "OP_NEGATE",
            Self::Print => "OP_PRINT",
            Self::Return => "OP_RETURN",
        };

        if let Some(width) = fmt.width() {
            write!(fmt, "{:1$}", mnemonic, width)
        } else {
            fmt.write_str(mnemonic)
        }
    }
}
