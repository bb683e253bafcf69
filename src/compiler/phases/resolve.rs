use super::types::{Loc, Located};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt::Display;

const C_KEYWORDS: [&str; 34] = [
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
];

/// File scope names of the generated program, which a global `float` would clash with.
const C_GLOBALS: [&str; 3] = ["main", "printf", "scanf"];

static RESERVED_LABELS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| C_KEYWORDS.iter().copied().collect());

static RESERVED_VARIABLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    RESERVED_LABELS
        .iter()
        .chain(C_GLOBALS.iter())
        .copied()
        .collect()
});

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    DuplicateLabel(String),
    UnknownLabel(String),
    UndeclaredVariable(String),
    ReservedName(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateLabel(label) => write!(f, "Label already exists: {}", label),
            Error::UnknownLabel(label) => {
                write!(f, "Attempting to GOTO to undeclared label: {}", label)
            }
            Error::UndeclaredVariable(name) => {
                write!(f, "Referencing variable before assignment: {}", name)
            }
            Error::ReservedName(name) => write!(f, "Name is reserved in generated C: {}", name),
        }
    }
}

/// Names seen so far in one compilation.
#[derive(Debug, Default)]
pub struct Symbols {
    variables: HashSet<String>,
    labels: HashSet<String>,
    // In order of first reference, so the reported missing label does not depend on hashing.
    gotos: Vec<Located<String>>,
    referenced: HashSet<String>,
}

fn reserved(
    table: &HashSet<&'static str>,
    loc: Loc,
    name: &str,
) -> Result<(), Located<Error>> {
    if table.contains(name) {
        Err(Located::with_loc(loc, Error::ReservedName(name.to_owned())))
    } else {
        Ok(())
    }
}

impl Symbols {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns true iff `name` had not been declared before.
    pub fn declare_variable(&mut self, loc: Loc, name: &str) -> Result<bool, Located<Error>> {
        reserved(&RESERVED_VARIABLES, loc, name)?;
        Ok(self.variables.insert(name.to_owned()))
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn use_variable(&self, loc: Loc, name: &str) -> Result<(), Located<Error>> {
        if self.is_variable(name) {
            Ok(())
        } else {
            Err(Located::with_loc(
                loc,
                Error::UndeclaredVariable(name.to_owned()),
            ))
        }
    }

    pub fn declare_label(&mut self, loc: Loc, label: &str) -> Result<(), Located<Error>> {
        reserved(&RESERVED_LABELS, loc, label)?;
        if !self.labels.insert(label.to_owned()) {
            return Err(Located::with_loc(
                loc,
                Error::DuplicateLabel(label.to_owned()),
            ));
        }
        Ok(())
    }

    pub fn reference_label(&mut self, loc: Loc, label: &str) {
        if self.referenced.insert(label.to_owned()) {
            self.gotos.push(Located::with_loc(loc, label.to_owned()));
        }
    }

    /// Checks that every `GOTO` target was declared somewhere in the program.
    /// Only meaningful once the whole program has been read.
    pub fn resolve(&self) -> Result<(), Located<Error>> {
        match self
            .gotos
            .iter()
            .find(|goto| !self.labels.contains(goto.as_value()))
        {
            Some(goto) => Err(goto.transfer(Error::UnknownLabel(goto.as_value().clone()))),
            None => Ok(()),
        }
    }
}
