pub mod assets;

pub mod compiler;

pub mod cli;
