use super::emit::Sink;
use super::resolve::Symbols;
use super::tokenize::{Token, TokenKind, Tokenizer};
use super::types::{self, Located};
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    ExpectedComparison(String),
    InvalidStatement(String, TokenKind),
    UnexpectedPrimary(String),
    EmptyBody(TokenKind),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnexpectedToken { expected, found } => {
                write!(f, "Expected {}, got {}", expected, found)
            }
            Error::ExpectedComparison(text) => {
                write!(f, "Expected comparison operator, got: {}", text.escape_debug())
            }
            Error::InvalidStatement(text, kind) => {
                write!(f, "Invalid statement at {} ({})", text.escape_debug(), kind)
            }
            Error::UnexpectedPrimary(text) => {
                write!(f, "Unexpected token at {}", text.escape_debug())
            }
            Error::EmptyBody(end) => write!(f, "Expected at least one statement before {}", end),
        }
    }
}

/// A grammar rule, recorded each time the parser enters it.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Rule {
    Program,
    Statement(TokenKind),
    Newline,
    Comparison,
    Expression,
    Term,
    Unary(Option<String>),
    Primary(String),
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Program => write!(f, "PROGRAM"),
            Rule::Statement(kind) => write!(f, "STATEMENT-{}", kind),
            Rule::Newline => write!(f, "NEWLINE"),
            Rule::Comparison => write!(f, "COMPARISON"),
            Rule::Expression => write!(f, "EXPRESSION"),
            Rule::Term => write!(f, "TERM"),
            Rule::Unary(None) => write!(f, "UNARY"),
            Rule::Unary(Some(sign)) => write!(f, "UNARY ({})", sign),
            Rule::Primary(text) => write!(f, "PRIMARY ({})", text.escape_debug()),
        }
    }
}

pub type Trace = Vec<Rule>;

/// Recursive descent recognizer, one method per grammar rule:
///
/// ```text
/// program    ::= {nl} {statement}
/// statement  ::= "PRINT" (string | expression) nl
///              | "IF" comparison "THEN" nl {statement} "ENDIF" nl
///              | "WHILE" comparison "REPEAT" nl {statement} "ENDWHILE" nl
///              | "LABEL" ident nl
///              | "GOTO" ident nl
///              | "LET" ident "=" expression nl
///              | "INPUT" ident nl
/// comparison ::= expression (("==" | "!=" | ">" | ">=" | "<" | "<=") expression)+
/// expression ::= term {("-" | "+") term}
/// term       ::= unary {("/" | "*") unary}
/// unary      ::= ["+" | "-"] primary
/// primary    ::= number | ident
/// nl         ::= "\n"+
/// ```
///
/// C code is pushed into the `Sink` as soon as each piece is recognized.
pub struct Parser<S: Sink> {
    tokens: Tokenizer,
    cur: Located<Token>,
    peek: Located<Token>,
    symbols: Symbols,
    sink: S,
    trace: Trace,
}

impl<S: Sink> Parser<S> {
    pub fn new(source: &str, sink: S) -> Result<Self, types::Error> {
        let mut tokens = Tokenizer::new(source);
        let cur = tokens.next_token()?;
        let peek = tokens.next_token()?;

        Ok(Parser {
            tokens,
            cur,
            peek,
            symbols: Symbols::new(),
            sink,
            trace: Trace::new(),
        })
    }

    fn kind(&self) -> TokenKind {
        self.cur.as_value().kind
    }

    fn text(&self) -> &str {
        &self.cur.as_value().text
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind())
    }

    fn advance(&mut self) -> Result<(), types::Error> {
        let next = self.tokens.next_token()?;
        self.cur = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    /// Consumes the current token, which must be of the given kind.
    fn expect(&mut self, kind: TokenKind) -> Result<Located<Token>, types::Error> {
        if !self.check(kind) {
            return self.fail(Error::UnexpectedToken {
                expected: kind,
                found: self.kind(),
            });
        }

        let tk = self.cur.clone();
        self.advance()?;
        Ok(tk)
    }

    fn fail<T>(&self, err: Error) -> Result<T, types::Error> {
        Err(self.cur.transfer(err).into())
    }

    fn rule(&mut self, rule: Rule) {
        log::trace!("{}", rule);
        self.trace.push(rule);
    }

    fn declare_variable(&mut self, var: &Located<Token>) -> Result<(), types::Error> {
        let name = &var.as_value().text;
        if self.symbols.declare_variable(var.loc(), name)? {
            self.sink.header_line(&format!("float {};", name));
        }
        Ok(())
    }

    /// Emits the current (binary) operator and steps over it.
    fn operator(&mut self) -> Result<(), types::Error> {
        let op = format!(" {} ", self.text());
        self.sink.emit(&op);
        self.advance()
    }

    /// Recognizes a whole program, consuming the parser. Returns the sink
    /// holding the generated code, and the rules which fired in order.
    pub fn program(mut self) -> Result<(S, Trace), types::Error> {
        self.rule(Rule::Program);
        self.sink.header_line("#include <stdio.h>");
        self.sink.emit_line("int main(void){");

        while self.check(TokenKind::Newline) {
            self.advance()?;
        }

        while !self.check(TokenKind::Eof) {
            self.statement()?;
        }

        self.symbols.resolve()?;

        self.sink.emit_line("return 0;");
        self.sink.emit_line("}");
        Ok((self.sink, self.trace))
    }

    fn statement(&mut self) -> Result<(), types::Error> {
        let kind = self.kind();
        match kind {
            TokenKind::Print => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                if self.check(TokenKind::Str) {
                    let line = format!("printf(\"{}\\n\");", self.text());
                    self.sink.emit_line(&line);
                    self.advance()?;
                } else {
                    self.sink.emit("printf(\"%.2f\\n\", (float)(");
                    self.expression()?;
                    self.sink.emit_line("));");
                }
            }

            TokenKind::If => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                self.sink.emit("if(");
                self.comparison()?;
                self.expect(TokenKind::Then)?;
                self.nl()?;
                self.sink.emit_line("){");

                self.body(TokenKind::Endif)?;
                self.sink.emit_line("}");
            }

            TokenKind::While => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                self.sink.emit("while(");
                self.comparison()?;
                self.expect(TokenKind::Repeat)?;
                self.nl()?;
                self.sink.emit_line("){");

                self.body(TokenKind::Endwhile)?;
                self.sink.emit_line("}");
            }

            TokenKind::Label => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                let label = self.expect(TokenKind::Ident)?;
                let name = &label.as_value().text;
                self.symbols.declare_label(label.loc(), name)?;
                self.sink.emit_line(&format!("{}:", name));
            }

            TokenKind::Goto => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                let label = self.expect(TokenKind::Ident)?;
                let name = &label.as_value().text;
                self.symbols.reference_label(label.loc(), name);
                self.sink.emit_line(&format!("goto {};", name));
            }

            TokenKind::Let => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                // Declared before the right-hand side is read, so `LET x = x` is accepted.
                let var = self.expect(TokenKind::Ident)?;
                self.declare_variable(&var)?;
                let var = var.value().text;
                self.expect(TokenKind::Eq)?;

                self.sink.emit(&format!("{} = ", var));
                self.expression()?;
                self.sink.emit_line(";");
            }

            TokenKind::Input => {
                self.rule(Rule::Statement(kind));
                self.advance()?;

                let var = self.expect(TokenKind::Ident)?;
                self.declare_variable(&var)?;
                let var = var.value().text;

                // On a malformed read, zero the variable and throw the bad input away.
                self.sink
                    .emit_line(&format!("if(0 == scanf(\"%f\", &{})) {{", var));
                self.sink.emit_line(&format!("{} = 0;", var));
                self.sink.emit_line("scanf(\"%*s\");");
                self.sink.emit_line("}");
            }

            _ => {
                return self.fail(Error::InvalidStatement(self.text().to_owned(), kind));
            }
        }

        self.nl()
    }

    /// One or more statements, then the given terminating keyword.
    fn body(&mut self, end: TokenKind) -> Result<(), types::Error> {
        if self.check(end) {
            return self.fail(Error::EmptyBody(end));
        }

        while !self.check(end) {
            self.statement()?;
        }
        self.expect(end)?;
        Ok(())
    }

    fn nl(&mut self) -> Result<(), types::Error> {
        self.rule(Rule::Newline);

        self.expect(TokenKind::Newline)?;
        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    // Chains such as `a < b < c` are accepted and passed through to C as written.
    fn comparison(&mut self) -> Result<(), types::Error> {
        self.rule(Rule::Comparison);

        self.expression()?;
        if !self.kind().is_rel_op() {
            return self.fail(Error::ExpectedComparison(self.text().to_owned()));
        }

        while self.kind().is_rel_op() {
            self.operator()?;
            self.expression()?;
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<(), types::Error> {
        self.rule(Rule::Expression);

        self.term()?;
        while self.check_any(&[TokenKind::Plus, TokenKind::Minus]) {
            self.operator()?;
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<(), types::Error> {
        self.rule(Rule::Term);

        self.unary()?;
        while self.check_any(&[TokenKind::Asterisk, TokenKind::Slash]) {
            self.operator()?;
            self.unary()?;
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<(), types::Error> {
        if self.check_any(&[TokenKind::Plus, TokenKind::Minus]) {
            let sign = self.text().to_owned();
            self.rule(Rule::Unary(Some(sign.clone())));
            self.sink.emit(&sign);
            self.advance()?;
        } else {
            self.rule(Rule::Unary(None));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<(), types::Error> {
        let text = self.text().to_owned();
        self.rule(Rule::Primary(text.clone()));

        match self.kind() {
            TokenKind::Number => {}
            TokenKind::Ident => self.symbols.use_variable(self.cur.loc(), &text)?,
            _ => return self.fail(Error::UnexpectedPrimary(text)),
        }

        self.sink.emit(&text);
        self.advance()
    }
}
