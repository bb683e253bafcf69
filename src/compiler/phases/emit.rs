use itertools::Itertools;
use std::path::Path;

/// Receives generated code as the parser recognizes each rule.
pub trait Sink {
    /// Append `code` to the current body line.
    fn emit(&mut self, code: &str);
    /// Append `code` to the body and end the line.
    fn emit_line(&mut self, code: &str);
    /// Append a full line to the header, which precedes the whole body.
    fn header_line(&mut self, code: &str);
}

/// Accumulates C code in two append-only buffers.
#[derive(Debug, Default)]
pub struct Emitter {
    header: Vec<String>,
    body: Vec<String>,
}

impl Emitter {
    pub fn new() -> Self {
        Default::default()
    }

    /// The header fragments in insertion order, followed by the body fragments.
    pub fn finalize(self) -> String {
        self.header.iter().chain(self.body.iter()).join("")
    }

    pub fn write_file<P: AsRef<Path>>(self, path: P) -> Result<(), std::io::Error> {
        std::fs::write(path, self.finalize())
    }
}

impl Sink for Emitter {
    fn emit(&mut self, code: &str) {
        self.body.push(code.to_owned());
    }

    fn emit_line(&mut self, code: &str) {
        self.body.push(format!("{}\n", code));
    }

    fn header_line(&mut self, code: &str) {
        self.header.push(format!("{}\n", code));
    }
}

/// Drops everything, for when only the grammar is being checked.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Sink for Discard {
    fn emit(&mut self, _code: &str) {}

    fn emit_line(&mut self, _code: &str) {}

    fn header_line(&mut self, _code: &str) {}
}
