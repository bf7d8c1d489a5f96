use crate::lexer::{Scanner, Token, TokenType};
use crate::codegen::chunk::Chunk;
use crate::codegen::opcodes::OpCode;
use crate::codegen::errors::{CompileError, ErrorAt};
use crate::runtime::{ObjHeap, Value};


/// Compiles a source buffer into a chunk in a single pass, allocating string
/// constants out of the given heap so they are interned alongside everything
/// the VM creates later.
///
/// On failure every error collected before EOF is returned; panic mode keeps
/// the list to one report per statement.
pub fn compile(source: &str, heap: &mut ObjHeap) -> Result<Chunk, Vec<CompileError>> {
    let mut compiler = Compiler::new(source, heap);

    compiler.advance();
    while !compiler.matches(TokenType::EOF) {
        compiler.declaration();
    }

    compiler.finish()
}


// Precedence ladder, lowest binds loosest. The discriminant order is what
// `parse_precedence` compares against, so the derive does the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    None,
    Assignment,  // =
    Or,          // or
    And,         // and
    Equality,    // == !=
    Comparison,  // < > <= >=
    Term,        // + -
    Factor,      // * /
    Unary,       // ! -
    Call,        // . ()
    Primary,
}

impl Precedence {
    /// One step tighter; used for the left-associative binary operators.
    fn next(self) -> Precedence {
        match self {
            Self::None => Self::Assignment,
            Self::Assignment => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Equality,
            Self::Equality => Self::Comparison,
            Self::Comparison => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Unary,
            Self::Unary => Self::Call,
            Self::Call => Self::Primary,
            Self::Primary => Self::Primary,
        }
    }
}

type ParseFn<'s, 'h> = fn(&mut Compiler<'s, 'h>);

struct ParseRule<'s, 'h> {
    prefix: Option<ParseFn<'s, 'h>>,
    infix: Option<ParseFn<'s, 'h>>,
    precedence: Precedence,
}

// The canonical presentation is a table indexed by token type; a match over
// the token type is the same table without the indexing hazards.
fn get_rule<'s, 'h>(kind: TokenType) -> ParseRule<'s, 'h> {
    use TokenType::*;

    let (prefix, infix, precedence): (Option<ParseFn<'s, 'h>>, Option<ParseFn<'s, 'h>>, Precedence) = match kind {
        LeftParen => (Some(Compiler::grouping), None, Precedence::None),
        Minus => (Some(Compiler::unary), Some(Compiler::binary), Precedence::Term),
        Plus => (None, Some(Compiler::binary), Precedence::Term),
        Slash => (None, Some(Compiler::binary), Precedence::Factor),
        Star => (None, Some(Compiler::binary), Precedence::Factor),
        Bang => (Some(Compiler::unary), None, Precedence::None),
        BangEqual => (None, Some(Compiler::binary), Precedence::Equality),
        EqualEqual => (None, Some(Compiler::binary), Precedence::Equality),
        Greater => (None, Some(Compiler::binary), Precedence::Comparison),
        GreaterEqual => (None, Some(Compiler::binary), Precedence::Comparison),
        Less => (None, Some(Compiler::binary), Precedence::Comparison),
        LessEqual => (None, Some(Compiler::binary), Precedence::Comparison),
        StringLit => (Some(Compiler::string), None, Precedence::None),
        Number => (Some(Compiler::number), None, Precedence::None),
        False => (Some(Compiler::literal), None, Precedence::None),
        Nil => (Some(Compiler::literal), None, Precedence::None),
        True => (Some(Compiler::literal), None, Precedence::None),
        _ => (None, None, Precedence::None),
    };

    ParseRule { prefix, infix, precedence }
}


struct Compiler<'s, 'h> {
    scanner: Scanner<'s>,
    previous: Token<'s>,
    current: Token<'s>,
    chunk: Chunk,
    heap: &'h mut ObjHeap,
    errors: Vec<CompileError>,
    panic_mode: bool,
}

impl<'s, 'h> Compiler<'s, 'h> {
    fn new(source: &'s str, heap: &'h mut ObjHeap) -> Self {
        Compiler {
            scanner: Scanner::new(source),
            previous: Token::empty(),
            current: Token::empty(),
            chunk: Chunk::new(),
            heap,
            errors: Vec::new(),
            panic_mode: false,
        }
    }

    fn finish(mut self) -> Result<Chunk, Vec<CompileError>> {
        self.emit_return();

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        log::debug!(
            "compiled chunk: {} bytes, {} constants",
            self.chunk.len(),
            self.chunk.constants().len(),
        );
        Ok(self.chunk)
    }

    // Token plumbing

    fn advance(&mut self) {
        self.previous = self.current;

        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenType::Error {
                break;
            }

            let token = self.current;
            self.error_at(token, token.lexeme);
        }
    }

    fn consume(&mut self, kind: TokenType, message: &str) {
        if self.check(kind) {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    fn check(&self, kind: TokenType) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenType) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    // Error reporting

    fn error(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token<'s>, message: &str) {
        // one report per statement; synchronize clears the flag
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let at = match token.kind {
            TokenType::EOF => ErrorAt::End,
            TokenType::Error => ErrorAt::Plain,
            _ => ErrorAt::Token(token.lexeme.to_string()),
        };
        self.errors.push(CompileError::new(message, at, token.line));
    }

    /// Skips forward to a likely statement boundary so later statements get
    /// their own error reports.
    fn synchronize(&mut self) {
        use TokenType::*;

        self.panic_mode = false;

        while !self.check(EOF) {
            if self.previous.kind == Semicolon {
                return;
            }

            match self.current.kind {
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => self.advance(),
            }
        }
    }

    // Emitters

    fn emit_byte(&mut self, byte: impl Into<u8>) {
        let line = self.previous.line;
        self.chunk.write(byte, line);
    }

    fn emit_bytes(&mut self, byte1: impl Into<u8>, byte2: impl Into<u8>) {
        self.emit_byte(byte1);
        self.emit_byte(byte2);
    }

    fn emit_return(&mut self) {
        self.emit_byte(OpCode::Return);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_bytes(OpCode::Constant, index);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.chunk.add_constant(value);
        match u8::try_from(index) {
            Ok(index) => index,
            Err(_) => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    // Declarations and statements

    fn declaration(&mut self) {
        if self.matches(TokenType::Var) {
            self.var_declaration();
        } else {
            self.statement();
        }

        if self.panic_mode {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) {
        let global = self.parse_variable("Expect variable name.");

        if self.matches(TokenType::Equal) {
            self.expression();
        } else {
            self.emit_byte(OpCode::Nil);
        }
        self.consume(TokenType::Semicolon, "Expect ';' after variable declaration.");

        self.emit_bytes(OpCode::DefineGlobal, global);
    }

    fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenType::Identifier, message);

        let name = self.previous;
        self.identifier_constant(name)
    }

    fn identifier_constant(&mut self, name: Token<'s>) -> u8 {
        let string = self.heap.copy_string(name.lexeme);
        self.make_constant(Value::Obj(string))
    }

    fn statement(&mut self) {
        if self.matches(TokenType::Print) {
            self.print_statement();
        } else {
            self.expression_statement();
        }
    }

    fn print_statement(&mut self) {
        self.expression();
        self.consume(TokenType::Semicolon, "Expect ';' after value.");
        self.emit_byte(OpCode::Print);
    }

    fn expression_statement(&mut self) {
        self.expression();
        self.consume(TokenType::Semicolon, "Expect ';' after expression.");
        self.emit_byte(OpCode::Pop);
    }

    // Expressions

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();

        let prefix = match get_rule(self.previous.kind).prefix {
            Some(prefix) => prefix,
            None => {
                self.error("Expect expression.");
                return;
            }
        };
        prefix(self);

        while precedence <= get_rule(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = get_rule(self.previous.kind).infix {
                infix(self);
            }
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenType::RightParen, "Expect ')' after expression.");
    }

    fn number(&mut self) {
        match self.previous.lexeme.parse::<f64>() {
            Ok(value) => self.emit_constant(Value::Number(value)),
            Err(_) => self.error("Invalid number literal."),
        }
    }

    fn string(&mut self) {
        // the scanner leaves the quotes on the lexeme
        let lexeme = self.previous.lexeme;
        let contents = &lexeme[1..lexeme.len() - 1];

        let string = self.heap.copy_string(contents);
        self.emit_constant(Value::Obj(string));
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenType::False => self.emit_byte(OpCode::False),
            TokenType::Nil => self.emit_byte(OpCode::Nil),
            TokenType::True => self.emit_byte(OpCode::True),
            _ => unreachable!("literal rule on non-literal token"),
        }
    }

    fn unary(&mut self) {
        let operator = self.previous.kind;

        // operand first, so the instruction pops it
        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenType::Bang => self.emit_byte(OpCode::Not),
            TokenType::Minus => self.emit_byte(OpCode::Negate),
            _ => unreachable!("unary rule on non-unary token"),
        }
    }

    fn binary(&mut self) {
        let operator = self.previous.kind;
        let rule = get_rule(operator);

        // one level tighter than our own precedence: left-associative
        self.parse_precedence(rule.precedence.next());

        match operator {
            TokenType::Plus => self.emit_byte(OpCode::Add),
            TokenType::Minus => self.emit_byte(OpCode::Subtract),
            TokenType::Star => self.emit_byte(OpCode::Multiply),
            TokenType::Slash => self.emit_byte(OpCode::Divide),
            TokenType::EqualEqual => self.emit_byte(OpCode::Equal),
            TokenType::BangEqual => self.emit_bytes(OpCode::Equal, OpCode::Not),
            TokenType::Greater => self.emit_byte(OpCode::Greater),
            TokenType::GreaterEqual => self.emit_bytes(OpCode::Less, OpCode::Not),
            TokenType::Less => self.emit_byte(OpCode::Less),
            TokenType::LessEqual => self.emit_bytes(OpCode::Greater, OpCode::Not),
            _ => unreachable!("binary rule on non-operator token"),
        }
    }
}
