pub mod phases;

pub use phases::types::Error;

use phases::{Discard, Emitter, Parser, Trace};

/// Translates a program to C, also returning the rules which fired while recognizing it.
pub fn compile_traced(source: &str) -> Result<(String, Trace), Error> {
    let (emitter, trace) = Parser::new(source, Emitter::new())?.program()?;
    log::debug!("recognized {} rules", trace.len());
    Ok((emitter.finalize(), trace))
}

pub fn compile(source: &str) -> Result<String, Error> {
    Ok(compile_traced(source)?.0)
}

/// Runs the same checks as `compile`, without generating any code.
pub fn check(source: &str) -> Result<Trace, Error> {
    let (Discard, trace) = Parser::new(source, Discard)?.program()?;
    Ok(trace)
}
