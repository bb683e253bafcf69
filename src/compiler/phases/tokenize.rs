use super::types::{Loc, Located};
use derive_more::Constructor;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Display;
use strum_macros::{Display, EnumIter};

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    UnexpectedChar(char),
    MalformedNotEq(char),
    IllegalStringChar(char),
    UnterminatedStringLiteral,
    MalformedNumber(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnexpectedChar(c) => write!(f, "Unknown token: {:?}", c),
            Error::MalformedNotEq(c) => write!(f, "Expected !=, got !{}", c.escape_debug()),
            Error::IllegalStringChar(c) => {
                write!(f, "Illegal character {:?} used in string literal", c)
            }
            Error::UnterminatedStringLiteral => write!(f, "String literal runs past end of line"),
            Error::MalformedNumber(raw) => write!(f, "Illegal char in number '{}'", raw),
        }
    }
}

/// The closed set of token kinds. Keywords are not told apart from
/// identifiers by their position in this enum, but through `KEYWORD_TABLE`.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum TokenKind {
    #[strum(to_string = "EOF")]
    Eof,
    #[strum(to_string = "NEWLINE")]
    Newline,
    #[strum(to_string = "NUMBER")]
    Number,
    #[strum(to_string = "IDENT")]
    Ident,
    #[strum(to_string = "STRING")]
    Str,

    #[strum(to_string = "LABEL")]
    Label,
    #[strum(to_string = "GOTO")]
    Goto,
    #[strum(to_string = "PRINT")]
    Print,
    #[strum(to_string = "INPUT")]
    Input,
    #[strum(to_string = "LET")]
    Let,
    #[strum(to_string = "IF")]
    If,
    #[strum(to_string = "THEN")]
    Then,
    #[strum(to_string = "ENDIF")]
    Endif,
    #[strum(to_string = "WHILE")]
    While,
    #[strum(to_string = "REPEAT")]
    Repeat,
    #[strum(to_string = "ENDWHILE")]
    Endwhile,

    #[strum(to_string = "EQ")]
    Eq,
    #[strum(to_string = "PLUS")]
    Plus,
    #[strum(to_string = "MINUS")]
    Minus,
    #[strum(to_string = "ASTERISK")]
    Asterisk,
    #[strum(to_string = "SLASH")]
    Slash,
    #[strum(to_string = "EQEQ")]
    EqEq,
    #[strum(to_string = "NOTEQ")]
    NotEq,
    #[strum(to_string = "LT")]
    Lt,
    #[strum(to_string = "LTEQ")]
    LtEq,
    #[strum(to_string = "GT")]
    Gt,
    #[strum(to_string = "GTEQ")]
    GtEq,
}

const KEYWORDS: [TokenKind; 11] = [
    TokenKind::Label,
    TokenKind::Goto,
    TokenKind::Print,
    TokenKind::Input,
    TokenKind::Let,
    TokenKind::If,
    TokenKind::Then,
    TokenKind::Endif,
    TokenKind::While,
    TokenKind::Repeat,
    TokenKind::Endwhile,
];

// A keyword's display name is also its exact (case-sensitive) spelling in source.
static KEYWORD_TABLE: Lazy<HashMap<String, TokenKind>> =
    Lazy::new(|| KEYWORDS.iter().map(|kw| (kw.to_string(), *kw)).collect());

impl TokenKind {
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        KEYWORD_TABLE.get(lexeme).copied()
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.contains(&self)
    }

    pub fn is_rel_op(self) -> bool {
        matches!(
            self,
            TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Constructor)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.text.escape_debug())
    }
}

/// Pull-based scanner over a copy of the source, newline-terminated if it was not already.
///
/// `next_token()` keeps returning `Eof` once the input is exhausted. The
/// `Iterator` implementation instead stops there (or after the first error).
pub struct Tokenizer {
    source: String,
    idx: usize,
    line: usize,
    col: usize,
    exhausted: bool,
}

impl Tokenizer {
    const NEWLINE_CHAR: char = '\n';
    const COMMENT_CHAR: char = '#';
    const STRING_LITERAL_CHAR: char = '"';

    pub fn new(source: &str) -> Self {
        let mut source = source.to_owned();
        if !source.ends_with(Tokenizer::NEWLINE_CHAR) {
            source.push(Tokenizer::NEWLINE_CHAR);
        }

        Tokenizer {
            source,
            idx: 0,
            line: 1,
            col: 1,
            exhausted: false,
        }
    }

    /// The buffer being scanned, including the trailing newline sentinel.
    pub fn source(&self) -> &str {
        &self.source
    }

    fn loc(&self) -> Loc {
        Loc::new(self.line, self.col)
    }

    fn cur(&self) -> Option<char> {
        self.source[self.idx..].chars().next()
    }

    fn peek(&self) -> Option<char> {
        self.source[self.idx..].chars().nth(1)
    }

    fn bump(&mut self) {
        if let Some(c) = self.cur() {
            self.idx += c.len_utf8();
            if c == Tokenizer::NEWLINE_CHAR {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ') | Some('\t') | Some('\r') = self.cur() {
            self.bump();
        }
    }

    // Leaves the terminating newline in place, it is still a token.
    fn skip_comment(&mut self) {
        if self.cur() != Some(Tokenizer::COMMENT_CHAR) {
            return;
        }

        while let Some(c) = self.cur() {
            if c == Tokenizer::NEWLINE_CHAR {
                break;
            }
            self.bump();
        }
    }

    fn lexeme_since(&self, start: usize) -> String {
        self.source[start..self.idx].to_owned()
    }

    fn with_second(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.bump();
            double
        } else {
            single
        }
    }

    fn string_literal(&mut self, loc: Loc) -> Result<Located<Token>, Located<Error>> {
        self.bump();
        let start = self.idx;

        loop {
            match self.cur() {
                // Strings cannot span lines; report at the opening quote.
                None | Some(Tokenizer::NEWLINE_CHAR) => {
                    return Err(Located::with_loc(loc, Error::UnterminatedStringLiteral));
                }
                Some(Tokenizer::STRING_LITERAL_CHAR) => break,
                // These would all need escaping in the generated `printf` format string.
                Some(c) if c.is_control() || c == '\\' || c == '%' => {
                    return Err(Located::with_loc(self.loc(), Error::IllegalStringChar(c)));
                }
                Some(_) => self.bump(),
            }
        }

        let text = self.lexeme_since(start);
        self.bump();
        Ok(Located::with_loc(loc, Token::new(text, TokenKind::Str)))
    }

    fn number(&mut self, loc: Loc) -> Result<Located<Token>, Located<Error>> {
        let start = self.idx;
        let is_digit = |c: Option<char>| c.map_or(false, |c| c.is_ascii_digit());

        while is_digit(self.cur()) {
            self.bump();
        }

        if self.cur() == Some('.') {
            self.bump();
            if !is_digit(self.cur()) {
                return Err(Located::with_loc(
                    loc,
                    Error::MalformedNumber(self.lexeme_since(start)),
                ));
            }
            while is_digit(self.cur()) {
                self.bump();
            }
        }

        Ok(Located::with_loc(
            loc,
            Token::new(self.lexeme_since(start), TokenKind::Number),
        ))
    }

    fn keyword_or_ident(&mut self, loc: Loc) -> Located<Token> {
        let start = self.idx;
        while self.cur().map_or(false, |c| c.is_ascii_alphanumeric()) {
            self.bump();
        }

        let text = self.lexeme_since(start);
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Ident);
        Located::with_loc(loc, Token::new(text, kind))
    }

    pub fn next_token(&mut self) -> Result<Located<Token>, Located<Error>> {
        self.skip_whitespace();
        self.skip_comment();

        let loc = self.loc();
        let start = self.idx;

        let c = match self.cur() {
            None => return Ok(Located::with_loc(loc, Token::new(String::new(), TokenKind::Eof))),
            Some(c) => c,
        };

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            Tokenizer::NEWLINE_CHAR => TokenKind::Newline,
            '=' => self.with_second('=', TokenKind::EqEq, TokenKind::Eq),
            '>' => self.with_second('=', TokenKind::GtEq, TokenKind::Gt),
            '<' => self.with_second('=', TokenKind::LtEq, TokenKind::Lt),
            '!' => {
                let next = self.peek().unwrap_or('\0');
                if next != '=' {
                    return Err(Located::with_loc(loc, Error::MalformedNotEq(next)));
                }
                self.bump();
                TokenKind::NotEq
            }
            Tokenizer::STRING_LITERAL_CHAR => return self.string_literal(loc),
            c if c.is_ascii_digit() => return self.number(loc),
            c if c.is_ascii_alphabetic() => return Ok(self.keyword_or_ident(loc)),
            c => return Err(Located::with_loc(loc, Error::UnexpectedChar(c))),
        };

        self.bump();
        Ok(Located::with_loc(loc, Token::new(self.lexeme_since(start), kind)))
    }
}

impl Iterator for Tokenizer {
    type Item = Result<Located<Token>, Located<Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        match self.next_token() {
            Ok(tk) if tk.as_value().kind == TokenKind::Eof => {
                self.exhausted = true;
                None
            }
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
            ok => Some(ok),
        }
    }
}

/// Every token of `source` up to (not including) `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Located<Token>>, Located<Error>> {
    Tokenizer::new(source).collect()
}
