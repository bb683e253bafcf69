use super::{parse, resolve, tokenize};
use derive_more::Constructor;
use std::fmt::Display;

/*
    Phases:

        1.  Tokenization: The source is terminated with a newline sentinel and scanned one token
            at a time, on demand. Newlines are significant and become tokens; comments and other
            whitespace do not.

        2.  Recognition: The parser holds the current and the next token, and has one method per
            grammar rule. Recognizing a rule pushes the C text for it into a `Sink` straight away,
            so there is no tree and no second pass.

        3.  Resolution: Variables are declared the first time they are assigned or read into, and
            must be declared before they appear in an expression. Labels must be unique, and every
            `GOTO` target must be declared somewhere in the program. The latter is the only check
            which has to wait until the whole program has been seen.

        4.  Emission: The `Emitter` keeps a header (includes and variable declarations) and a body
            (everything else) and concatenates the two once the program has been accepted.
*/

#[derive(Debug, PartialEq, Clone, Copy, Eq, Constructor)]
pub struct Loc {
    line: usize,
    col: usize,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Located<T: Sized> {
    loc: Loc,
    val: T,
}

impl Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(line: {}, col: {})", self.line, self.col)
    }
}

impl<T: Display> Display for Located<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}: {}", self.loc, self.val)
    }
}

impl<T> Located<T> {
    pub fn with_loc(loc: Loc, val: T) -> Self {
        Located { loc, val }
    }

    pub fn loc(&self) -> Loc {
        self.loc
    }

    pub fn value(self) -> T {
        self.val
    }

    pub fn as_value(&self) -> &T {
        &self.val
    }

    pub fn transfer<S>(&self, s: S) -> Located<S> {
        Located::with_loc(self.loc, s)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Tokenize(Located<tokenize::Error>),
    Parse(Located<parse::Error>),
    Resolve(Located<resolve::Error>),
}

impl Error {
    /// Lexing errors are reported separately from grammar and semantic errors.
    pub fn is_lexical(&self) -> bool {
        matches!(self, Error::Tokenize(_))
    }

    pub fn loc(&self) -> Loc {
        match self {
            Error::Tokenize(err) => err.loc(),
            Error::Parse(err) => err.loc(),
            Error::Resolve(err) => err.loc(),
        }
    }
}

impl From<Located<tokenize::Error>> for Error {
    fn from(err: Located<tokenize::Error>) -> Self {
        Error::Tokenize(err)
    }
}

impl From<Located<parse::Error>> for Error {
    fn from(err: Located<parse::Error>) -> Self {
        Error::Parse(err)
    }
}

impl From<Located<resolve::Error>> for Error {
    fn from(err: Located<resolve::Error>) -> Self {
        Error::Resolve(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Compile Error (in ")?;
        match self {
            Error::Tokenize(_) => write!(f, "Tokenizer"),
            Error::Parse(_) => write!(f, "Parser"),
            Error::Resolve(_) => write!(f, "Resolver"),
        }?;
        write!(f, "): ")?;
        match self {
            Error::Tokenize(err) => write!(f, "{}", err),
            Error::Parse(err) => write!(f, "{}", err),
            Error::Resolve(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}
