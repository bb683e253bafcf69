pub mod types;

pub mod emit;
pub mod parse;
pub mod resolve;
pub mod tokenize;

pub use emit::{Discard, Emitter, Sink};
pub use parse::{Parser, Rule, Trace};
pub use resolve::Symbols;
pub use tokenize::{tokenize, Token, TokenKind, Tokenizer};
