use super::literals;
use super::{ParseError, Span};
use crate::ast::Node;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Number(String),
    /// Decoded string contents.
    String(String),
    And,
    Break,
    Do,
    Else,
    Elseif,
    End,
    False,
    For,
    Function,
    Goto,
    If,
    In,
    Local,
    Nil,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    True,
    Until,
    While,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    Caret,
    Hash,
    EqualEqual,
    TildeEqual,
    LessEqual,
    GreaterEqual,
    Less,
    Greater,
    Equal,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    DoubleColon,
    Semicolon,
    Colon,
    Comma,
    Dot,
    DotDot,
    Ellipsis,
    Eof,
}

impl TokenKind {
    fn keyword(word: &str) -> Option<Self> {
        let kind = match word {
            "and" => TokenKind::And,
            "break" => TokenKind::Break,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "elseif" => TokenKind::Elseif,
            "end" => TokenKind::End,
            "false" => TokenKind::False,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "in" => TokenKind::In,
            "local" => TokenKind::Local,
            "nil" => TokenKind::Nil,
            "not" => TokenKind::Not,
            "or" => TokenKind::Or,
            "repeat" => TokenKind::Repeat,
            "return" => TokenKind::Return,
            "then" => TokenKind::Then,
            "true" => TokenKind::True,
            "until" => TokenKind::Until,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }

    /// Binary operator spelling in the tree plus left/right binding power.
    fn binary_op(&self) -> Option<(&'static str, u8, u8)> {
        let op = match self {
            TokenKind::Or => ("or", 1, 1),
            TokenKind::And => ("and", 2, 2),
            TokenKind::Less => ("<", 3, 3),
            TokenKind::Greater => (">", 3, 3),
            TokenKind::LessEqual => ("<=", 3, 3),
            TokenKind::GreaterEqual => (">=", 3, 3),
            TokenKind::EqualEqual => ("===", 3, 3),
            TokenKind::TildeEqual => ("!==", 3, 3),
            TokenKind::DotDot => ("..", 9, 8),
            TokenKind::Plus => ("+", 10, 10),
            TokenKind::Minus => ("-", 10, 10),
            TokenKind::Star => ("*", 11, 11),
            TokenKind::Slash => ("/", 11, 11),
            TokenKind::SlashSlash => ("//", 11, 11),
            TokenKind::Percent => ("%", 11, 11),
            TokenKind::Caret => ("**", 14, 13),
            _ => return None,
        };
        Some(op)
    }

    fn unary_op(&self) -> Option<&'static str> {
        match self {
            TokenKind::Not => Some("not"),
            TokenKind::Hash => Some("#"),
            TokenKind::Minus => Some("-"),
            _ => None,
        }
    }
}

const UNARY_PRIORITY: u8 = 12;

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    line: usize,
    span: Span,
}

struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    current: Option<char>,
    line: usize,
    offset: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            chars,
            current,
            line: 1,
            offset: 0,
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace_and_comments()?;
        let line = self.line;
        let start = self.offset;
        let Some(ch) = self.current else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
                span: Span::new(start, start),
            });
        };

        let kind = match ch {
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '%' => self.single(TokenKind::Percent),
            '^' => self.single(TokenKind::Caret),
            '#' => self.single(TokenKind::Hash),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ']' => self.single(TokenKind::RBracket),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '/' => {
                self.advance();
                if self.current == Some('/') {
                    self.advance();
                    TokenKind::SlashSlash
                } else {
                    TokenKind::Slash
                }
            }
            '=' => {
                self.advance();
                if self.current == Some('=') {
                    self.advance();
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '~' => {
                self.advance();
                if self.current == Some('=') {
                    self.advance();
                    TokenKind::TildeEqual
                } else {
                    return Err(self.error_from(start, line, "bitwise operators are not supported"));
                }
            }
            '<' => {
                self.advance();
                match self.current {
                    Some('=') => {
                        self.advance();
                        TokenKind::LessEqual
                    }
                    Some('<') => {
                        return Err(self.error_from(start, line, "bitwise operators are not supported"));
                    }
                    _ => TokenKind::Less,
                }
            }
            '>' => {
                self.advance();
                match self.current {
                    Some('=') => {
                        self.advance();
                        TokenKind::GreaterEqual
                    }
                    Some('>') => {
                        return Err(self.error_from(start, line, "bitwise operators are not supported"));
                    }
                    _ => TokenKind::Greater,
                }
            }
            '&' | '|' => {
                return Err(self.error_from(start, line, "bitwise operators are not supported"));
            }
            ':' => {
                self.advance();
                if self.current == Some(':') {
                    self.advance();
                    TokenKind::DoubleColon
                } else {
                    TokenKind::Colon
                }
            }
            '.' => {
                if matches!(self.peek(), Some(next) if next.is_ascii_digit()) {
                    TokenKind::Number(self.consume_number(start)?)
                } else {
                    self.advance();
                    if self.current == Some('.') {
                        self.advance();
                        if self.current == Some('.') {
                            self.advance();
                            TokenKind::Ellipsis
                        } else {
                            TokenKind::DotDot
                        }
                    } else {
                        TokenKind::Dot
                    }
                }
            }
            '[' => match self.long_bracket_level() {
                Some(level) => TokenKind::String(self.consume_long_bracket(level, "string")?),
                None => self.single(TokenKind::LBracket),
            },
            '"' | '\'' => TokenKind::String(self.consume_string(ch)?),
            c if c.is_ascii_digit() => TokenKind::Number(self.consume_number(start)?),
            c if is_ident_start(c) => {
                let word = self.consume_ident();
                TokenKind::keyword(&word).unwrap_or(TokenKind::Ident(word))
            }
            other => {
                self.advance();
                return Err(self.error_from(start, line, format!("unexpected character '{other}'")));
            }
        };

        Ok(Token {
            kind,
            line,
            span: Span::new(start, self.offset),
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current {
            if ch == '\n' {
                self.line += 1;
            }
            self.offset += ch.len_utf8();
        }
        self.current = self.chars.next();
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn error_from(&self, start: usize, line: usize, message: impl Into<String>) -> ParseError {
        ParseError::new(line, message).with_span(Span::new(start, self.offset.max(start + 1)))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            while matches!(self.current, Some(c) if c.is_whitespace()) {
                self.advance();
            }

            if self.current == Some('-') && self.peek() == Some('-') {
                self.advance();
                self.advance();
                if let Some(level) = self.long_bracket_level() {
                    self.consume_long_bracket(level, "comment")?;
                } else {
                    while let Some(ch) = self.current {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                continue;
            }
            break;
        }
        Ok(())
    }

    /// `[[` or `[==[` at the cursor: the number of `=` signs.
    fn long_bracket_level(&self) -> Option<usize> {
        if self.current != Some('[') {
            return None;
        }
        let mut peek = self.chars.clone();
        let mut level = 0;
        loop {
            match peek.next() {
                Some('=') => level += 1,
                Some('[') => return Some(level),
                _ => return None,
            }
        }
    }

    fn consume_long_bracket(&mut self, level: usize, what: &str) -> Result<String, ParseError> {
        let line = self.line;
        let start = self.offset;
        for _ in 0..level + 2 {
            self.advance();
        }
        // a newline right after the opening bracket is not part of the text
        if self.current == Some('\r') {
            self.advance();
        }
        if self.current == Some('\n') {
            self.advance();
        }

        let mut out = String::new();
        loop {
            let Some(ch) = self.current else {
                return Err(self.error_from(start, line, format!("unfinished long {what}")));
            };
            if ch == ']' && self.closes_long_bracket(level) {
                for _ in 0..level + 2 {
                    self.advance();
                }
                return Ok(out);
            }
            out.push(ch);
            self.advance();
        }
    }

    fn closes_long_bracket(&self, level: usize) -> bool {
        let mut peek = self.chars.clone();
        (0..level).all(|_| peek.next() == Some('=')) && peek.next() == Some(']')
    }

    fn consume_string(&mut self, quote: char) -> Result<String, ParseError> {
        let line = self.line;
        let start = self.offset;
        self.advance();

        let mut out = String::new();
        loop {
            let Some(ch) = self.current else {
                return Err(self.error_from(start, line, "unfinished string"));
            };
            match ch {
                c if c == quote => {
                    self.advance();
                    return Ok(out);
                }
                '\n' => return Err(self.error_from(start, line, "unfinished string")),
                '\\' => {
                    self.advance();
                    self.consume_escape(&mut out, start, line)?;
                }
                other => {
                    out.push(other);
                    self.advance();
                }
            }
        }
    }

    fn consume_escape(&mut self, out: &mut String, start: usize, line: usize) -> Result<(), ParseError> {
        let Some(ch) = self.current else {
            return Err(self.error_from(start, line, "unfinished string"));
        };
        let simple = match ch {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'a' => Some('\u{7}'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'v' => Some('\u{b}'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '\'' => Some('\''),
            '\n' => Some('\n'),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            self.advance();
            return Ok(());
        }

        match ch {
            'z' => {
                self.advance();
                while matches!(self.current, Some(c) if c.is_whitespace()) {
                    self.advance();
                }
            }
            'x' => {
                self.advance();
                let mut value = 0u32;
                for _ in 0..2 {
                    let digit = self
                        .current
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| self.error_from(start, line, "hexadecimal digit expected"))?;
                    value = value * 16 + digit;
                    self.advance();
                }
                out.push(byte_char(value));
            }
            'u' => {
                self.advance();
                if self.current != Some('{') {
                    return Err(self.error_from(start, line, "missing '{' in \\u{xxxx}"));
                }
                self.advance();
                let mut value = 0u32;
                let mut digits = 0;
                while let Some(digit) = self.current.and_then(|c| c.to_digit(16)) {
                    value = value
                        .checked_mul(16)
                        .and_then(|v| v.checked_add(digit))
                        .ok_or_else(|| self.error_from(start, line, "UTF-8 value too large"))?;
                    digits += 1;
                    self.advance();
                }
                if digits == 0 || self.current != Some('}') {
                    return Err(self.error_from(start, line, "malformed \\u{xxxx} escape"));
                }
                self.advance();
                let decoded = char::from_u32(value)
                    .ok_or_else(|| self.error_from(start, line, "UTF-8 value too large"))?;
                out.push(decoded);
            }
            c if c.is_ascii_digit() => {
                let mut value = 0u32;
                for _ in 0..3 {
                    let Some(digit) = self.current.and_then(|c| c.to_digit(10)) else {
                        break;
                    };
                    value = value * 10 + digit;
                    self.advance();
                }
                if value > 255 {
                    return Err(self.error_from(start, line, "decimal escape too large"));
                }
                out.push(byte_char(value));
            }
            other => {
                return Err(self.error_from(start, line, format!("invalid escape sequence '\\{other}'")));
            }
        }
        Ok(())
    }

    fn consume_number(&mut self, start: usize) -> Result<String, ParseError> {
        let line = self.line;
        let mut text = String::new();
        let hex = self.current == Some('0') && matches!(self.peek(), Some('x' | 'X'));
        let exponent_marks: &[char] = if hex {
            text.push('0');
            self.advance();
            if let Some(x) = self.current {
                text.push(x);
            }
            self.advance();
            &['p', 'P']
        } else {
            &['e', 'E']
        };

        while let Some(ch) = self.current {
            if exponent_marks.contains(&ch) {
                text.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current {
                    text.push(sign);
                    self.advance();
                }
            } else if ch == '.' || (hex && ch.is_ascii_hexdigit()) || ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.current, Some(c) if is_ident_continue(c)) {
            while matches!(self.current, Some(c) if is_ident_continue(c)) {
                self.advance();
            }
            return Err(self.error_from(start, line, "malformed number"));
        }
        if text.matches('.').count() > 1 {
            return Err(self.error_from(start, line, format!("malformed number near '{text}'")));
        }
        Ok(text)
    }

    fn consume_ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(ch) = self.current {
            if is_ident_continue(ch) {
                out.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        out
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Lua strings are byte strings; escaped bytes map to the same code point.
fn byte_char(value: u32) -> char {
    char::from(value as u8)
}

pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub(super) fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(Self { tokens, pos: 0 })
    }

    pub(super) fn parse_chunk(&mut self) -> Result<Vec<Node>, ParseError> {
        let body = self.parse_block()?;
        if !self.check(&TokenKind::Eof) {
            return Err(self.error_here("'<eof>' expected"));
        }
        Ok(body)
    }

    fn parse_block(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut stmts = Vec::new();
        while !self.block_follows() {
            if self.check(&TokenKind::Return) {
                stmts.push(self.parse_return()?);
                if !self.block_follows() {
                    return Err(self.error_here("'return' must be the last statement in a block"));
                }
                break;
            }
            self.parse_stmt(&mut stmts)?;
        }
        Ok(stmts)
    }

    fn block_follows(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::End | TokenKind::Else | TokenKind::Elseif | TokenKind::Until | TokenKind::Eof
        )
    }

    fn parse_stmt(&mut self, out: &mut Vec<Node>) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::Semicolon => {
                self.advance();
                out.push(Node::Semicolon);
            }
            TokenKind::Break => {
                self.advance();
                out.push(Node::Break);
            }
            TokenKind::Goto => return Err(self.error_here("'goto' is not supported")),
            TokenKind::DoubleColon => return Err(self.error_here("labels are not supported")),
            TokenKind::Do => {
                self.advance();
                let body = self.parse_block()?;
                self.expect(&TokenKind::End, "'end' expected to close 'do'")?;
                out.push(Node::Do { body });
            }
            TokenKind::While => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect(&TokenKind::Do, "'do' expected after 'while' condition")?;
                let body = self.parse_block()?;
                self.expect(&TokenKind::End, "'end' expected to close 'while'")?;
                out.push(Node::while_loop(cond, body));
            }
            TokenKind::Repeat => {
                self.advance();
                let body = self.parse_block()?;
                self.expect(&TokenKind::Until, "'until' expected to close 'repeat'")?;
                let cond = self.parse_expr()?;
                out.push(Node::repeat(cond, body));
            }
            TokenKind::If => out.push(self.parse_if()?),
            TokenKind::For => out.push(self.parse_for()?),
            TokenKind::Function => out.push(self.parse_function_stmt()?),
            TokenKind::Local => {
                self.advance();
                if self.match_kind(&TokenKind::Function) {
                    let name = self.expect_ident("function name expected after 'local function'")?;
                    let function = self.parse_function_body()?;
                    out.push(Node::local_assign(vec![Node::var(name.clone())], Vec::new()));
                    out.push(Node::assign(vec![Node::var(name)], vec![function]));
                } else {
                    out.push(self.parse_local()?);
                }
            }
            _ => out.push(self.parse_expr_stmt()?),
        }
        Ok(())
    }

    fn parse_return(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let expr = if self.block_follows() || self.check(&TokenKind::Semicolon) {
            Node::Nil
        } else {
            let expr = self.parse_expr()?;
            if self.check(&TokenKind::Comma) {
                return Err(self.error_here("multiple return values are not supported"));
            }
            expr
        };
        self.match_kind(&TokenKind::Semicolon);
        Ok(Node::ret(expr))
    }

    fn parse_if(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Then, "'then' expected after 'if' condition")?;
        let body = self.parse_block()?;
        let mut elifs = Vec::new();
        while self.match_kind(&TokenKind::Elseif) {
            let elif_cond = self.parse_expr()?;
            self.expect(&TokenKind::Then, "'then' expected after 'elseif' condition")?;
            elifs.push((elif_cond, self.parse_block()?));
        }
        let else_body = if self.match_kind(&TokenKind::Else) {
            self.parse_block()?
        } else {
            Vec::new()
        };
        self.expect(&TokenKind::End, "'end' expected to close 'if'")?;
        Ok(Node::If {
            cond: Box::new(cond),
            body,
            elifs,
            else_body,
        })
    }

    /// Numeric `for` becomes a `do` block holding the loop state and a
    /// `while` that copies the counter into the loop variable each pass.
    fn parse_for(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let name = self.expect_ident("loop variable expected after 'for'")?;
        if self.check(&TokenKind::Comma) || self.check(&TokenKind::In) {
            return Err(self.error_here("generic 'for ... in' loops are not supported"));
        }
        self.expect(&TokenKind::Equal, "'=' expected in numeric 'for'")?;
        let start = self.parse_expr()?;
        self.expect(&TokenKind::Comma, "',' expected after 'for' initial value")?;
        let limit = self.parse_expr()?;
        let step = if self.match_kind(&TokenKind::Comma) {
            self.parse_expr()?
        } else {
            Node::number("1")
        };
        self.expect(&TokenKind::Do, "'do' expected after 'for' header")?;
        let body = self.parse_block()?;
        self.expect(&TokenKind::End, "'end' expected to close 'for'")?;

        // `$` cannot start a Lua name, so user code never sees these
        const COUNTER: &str = "$for_i";
        const LIMIT: &str = "$for_limit";
        const STEP: &str = "$for_step";
        let zero = || Node::number("0");
        let ascending = Node::binop(
            "and",
            Node::binop(">", Node::var(STEP), zero()),
            Node::binop("<=", Node::var(COUNTER), Node::var(LIMIT)),
        );
        let descending = Node::binop(
            "and",
            Node::binop("<=", Node::var(STEP), zero()),
            Node::binop(">=", Node::var(COUNTER), Node::var(LIMIT)),
        );
        // each pass gets its own block so closures capture that pass's variable
        let mut iteration = vec![
            Node::local_assign(vec![Node::var(name)], vec![Node::var(COUNTER)]),
            Node::assign(
                vec![Node::var(COUNTER)],
                vec![Node::binop("+", Node::var(COUNTER), Node::var(STEP))],
            ),
        ];
        iteration.extend(body);
        Ok(Node::Do {
            body: vec![
                Node::local_assign(
                    vec![Node::var(COUNTER), Node::var(LIMIT), Node::var(STEP)],
                    vec![start, limit, step],
                ),
                Node::while_loop(
                    Node::binop("or", ascending, descending),
                    vec![Node::Do { body: iteration }],
                ),
            ],
        })
    }

    fn parse_function_stmt(&mut self) -> Result<Node, ParseError> {
        self.advance();
        let name = self.expect_ident("function name expected")?;
        let mut target = Node::var(name);
        while self.match_kind(&TokenKind::Dot) {
            let field = self.expect_ident("field name expected after '.'")?;
            target = Node::index(target, self.string_node(&field)?);
        }
        if self.check(&TokenKind::Colon) {
            return Err(self.error_here("method definitions with ':' are not supported"));
        }
        let function = self.parse_function_body()?;
        Ok(Node::assign(vec![target], vec![function]))
    }

    fn parse_function_body(&mut self) -> Result<Node, ParseError> {
        self.expect(&TokenKind::LParen, "'(' expected before parameters")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                if self.match_kind(&TokenKind::Ellipsis) {
                    params.push(Node::Ellipsis);
                    break;
                }
                params.push(Node::var(self.expect_ident("parameter name expected")?));
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')' expected after parameters")?;
        let body = self.parse_block()?;
        self.expect(&TokenKind::End, "'end' expected to close 'function'")?;
        Ok(Node::function(params, body))
    }

    fn parse_local(&mut self) -> Result<Node, ParseError> {
        let mut targets = Vec::new();
        loop {
            let name = self.expect_ident("local name expected")?;
            if self.match_kind(&TokenKind::Less) {
                let attrib = self.expect_ident("attribute name expected")?;
                if attrib != "const" {
                    return Err(self.error_here(format!("unsupported attribute '{attrib}'")));
                }
                self.expect(&TokenKind::Greater, "'>' expected after attribute")?;
            }
            targets.push(Node::var(name));
            if !self.match_kind(&TokenKind::Comma) {
                break;
            }
        }
        let exprs = if self.match_kind(&TokenKind::Equal) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        Ok(Node::local_assign(targets, exprs))
    }

    fn parse_expr_stmt(&mut self) -> Result<Node, ParseError> {
        let first = self.parse_suffixed_expr()?;
        if self.check(&TokenKind::Equal) || self.check(&TokenKind::Comma) {
            let mut targets = vec![self.assignable(first)?];
            while self.match_kind(&TokenKind::Comma) {
                let target = self.parse_suffixed_expr()?;
                targets.push(self.assignable(target)?);
            }
            self.expect(&TokenKind::Equal, "'=' expected in assignment")?;
            let exprs = self.parse_expr_list()?;
            return Ok(Node::assign(targets, exprs));
        }
        if matches!(first, Node::FunctionCall { .. }) {
            Ok(first)
        } else {
            Err(self.error_here("syntax error: expected '=' or a function call"))
        }
    }

    fn assignable(&self, target: Node) -> Result<Node, ParseError> {
        match target {
            Node::VarRef { .. } | Node::Index { .. } => Ok(target),
            _ => Err(self.error_here("cannot assign to this expression")),
        }
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut exprs = vec![self.parse_expr()?];
        while self.match_kind(&TokenKind::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        self.parse_subexpr(0)
    }

    /// Precedence climbing over the binding powers in `TokenKind::binary_op`.
    fn parse_subexpr(&mut self, limit: u8) -> Result<Node, ParseError> {
        let mut lhs = if let Some(op) = self.peek_kind().unary_op() {
            self.advance();
            let operand = self.parse_subexpr(UNARY_PRIORITY)?;
            Node::unop(op, operand)
        } else {
            self.parse_simple_expr()?
        };
        while let Some((op, left, right)) = self.peek_kind().binary_op() {
            if left <= limit {
                break;
            }
            self.advance();
            let rhs = self.parse_subexpr(right)?;
            lhs = Node::binop(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_simple_expr(&mut self) -> Result<Node, ParseError> {
        let node = match self.peek_kind().clone() {
            TokenKind::Number(literal) => {
                self.advance();
                Node::number(literal)
            }
            TokenKind::String(value) => {
                self.advance();
                self.string_node(&value)?
            }
            TokenKind::Nil => {
                self.advance();
                Node::Nil
            }
            TokenKind::True => {
                self.advance();
                Node::True
            }
            TokenKind::False => {
                self.advance();
                Node::False
            }
            TokenKind::Ellipsis => {
                self.advance();
                Node::Ellipsis
            }
            TokenKind::Function => {
                self.advance();
                self.parse_function_body()?
            }
            TokenKind::LBrace => self.parse_table()?,
            _ => self.parse_suffixed_expr()?,
        };
        Ok(node)
    }

    fn parse_primary_expr(&mut self) -> Result<Node, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Node::var(name))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')' expected")?;
                Ok(expr)
            }
            _ => Err(self.error_here("unexpected symbol")),
        }
    }

    fn parse_suffixed_expr(&mut self) -> Result<Node, ParseError> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            match self.peek_kind().clone() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_ident("field name expected after '.'")?;
                    expr = Node::index(expr, self.string_node(&field)?);
                }
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket, "']' expected")?;
                    expr = Node::index(expr, key);
                }
                TokenKind::Colon => {
                    return Err(self.error_here("method calls with ':' are not supported"));
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = if self.check(&TokenKind::RParen) {
                        Vec::new()
                    } else {
                        self.parse_expr_list()?
                    };
                    self.expect(&TokenKind::RParen, "')' expected after arguments")?;
                    expr = Node::call(expr, args);
                }
                TokenKind::String(value) => {
                    self.advance();
                    let arg = self.string_node(&value)?;
                    expr = Node::call(expr, vec![arg]);
                }
                TokenKind::LBrace => {
                    let arg = self.parse_table()?;
                    expr = Node::call(expr, vec![arg]);
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_table(&mut self) -> Result<Node, ParseError> {
        self.expect(&TokenKind::LBrace, "'{' expected")?;
        let mut entries = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let entry = if self.match_kind(&TokenKind::LBracket) {
                let key = self.parse_expr()?;
                self.expect(&TokenKind::RBracket, "']' expected after table key")?;
                self.expect(&TokenKind::Equal, "'=' expected after table key")?;
                Node::key_value(key, self.parse_expr()?)
            } else if let TokenKind::Ident(name) = self.peek_kind().clone()
                && self.peek_kind_at(1) == &TokenKind::Equal
            {
                self.advance();
                self.advance();
                let key = self.string_node(&name)?;
                Node::key_value(key, self.parse_expr()?)
            } else {
                self.parse_expr()?
            };
            entries.push(entry);
            if !self.match_kind(&TokenKind::Comma) && !self.match_kind(&TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace, "'}' expected to close table")?;
        Ok(Node::Table { entries })
    }

    fn string_node(&self, value: &str) -> Result<Node, ParseError> {
        let literal = literals::string_literal(value)
            .map_err(|err| self.error_here(format!("cannot encode string literal: {err}")))?;
        Ok(Node::string(literal))
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, ahead: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)].kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<(), ParseError> {
        if self.match_kind(kind) {
            Ok(())
        } else {
            Err(self.error_here(message))
        }
    }

    fn expect_ident(&mut self, message: &str) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek_kind().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.error_here(message))
        }
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::new(token.line, message).with_span(token.span)
    }
}
