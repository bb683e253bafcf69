use super::suite;
use crate::compiler::{
    self,
    phases::{Emitter, Parser, TokenKind, Tokenizer},
};
use crate::assets;
use ansi_term::Color::Red;
use anyhow::{bail, Context};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

pub fn terminal_init() {
    #[cfg(windows)]
    {
        // Without ANSI support we still run, just uncolored.
        let _ = ansi_term::enable_ansi_support();
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[derive(StructOpt, Debug)]
#[structopt(name = "teeny")]
pub enum CommandRoot {
    Compile(SubcommandCompile),
    Check(SubcommandCheck),
    Lex(SubcommandLex),
    Suite(SubcommandSuite),
}

#[derive(StructOpt, Debug)]
#[structopt(name = "teenyc")]
pub struct SubcommandCompile {
    #[structopt(name = "in.teeny", parse(from_os_str))]
    in_src: PathBuf,

    #[structopt(name = "out.c", parse(from_os_str))]
    out_c: Option<PathBuf>,
}

/// Validates a program without generating any code.
#[derive(StructOpt, Debug)]
pub struct SubcommandCheck {
    /// Print every grammar rule as it is recognized.
    #[structopt(short, long)]
    trace: bool,

    #[structopt(name = "in.teeny", parse(from_os_str))]
    in_src: PathBuf,
}

/// Prints the kind of every token, then the source as it was scanned.
#[derive(StructOpt, Debug)]
pub struct SubcommandLex {
    #[structopt(name = "in.teeny", parse(from_os_str))]
    in_src: PathBuf,
}

#[derive(StructOpt, Debug)]
pub struct SubcommandSuite {
    #[structopt(name = "suite/dir", parse(from_os_str))]
    suite_dir: Option<PathBuf>,
}

pub fn root(cmd: CommandRoot) -> ! {
    let result = match cmd {
        CommandRoot::Compile(scmd) => compile(scmd),
        CommandRoot::Check(scmd) => check(scmd),
        CommandRoot::Lex(scmd) => lex(scmd),
        CommandRoot::Suite(scmd) => suite(scmd),
    };

    exit_with(result)
}

pub fn compile_only(cmd: SubcommandCompile) -> ! {
    exit_with(compile(cmd))
}

fn exit_with(result: anyhow::Result<()>) -> ! {
    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            eprintln!("{} {:#}", Red.bold().paint("Error:"), err);
            std::process::exit(1);
        }
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("could not read '{}'", path.display()))
}

pub fn default_output_path(in_src: &Path) -> anyhow::Result<PathBuf> {
    let stem = in_src
        .file_stem()
        .with_context(|| format!("'{}' does not name a file", in_src.display()))?;
    Ok(PathBuf::from(stem).with_extension(assets::DEFAULT_OUTPUT_EXT))
}

/// Compiles `source` and writes the C code to `out_name`. Nothing is written
/// unless the whole program was accepted.
pub fn compile_to_path(source: &str, out_name: &Path) -> anyhow::Result<()> {
    let (emitter, _) = Parser::new(source, Emitter::new())?.program()?;

    emitter
        .write_file(out_name)
        .with_context(|| format!("could not write '{}'", out_name.display()))
}

fn compile(cmd: SubcommandCompile) -> anyhow::Result<()> {
    let source = read_source(&cmd.in_src)?;

    let out_name = match cmd.out_c {
        Some(outfile) => outfile,
        None => default_output_path(&cmd.in_src)?,
    };
    compile_to_path(&source, &out_name)?;

    log::info!("compiling done: {}", out_name.display());
    Ok(())
}

fn check(cmd: SubcommandCheck) -> anyhow::Result<()> {
    let source = read_source(&cmd.in_src)?;
    let trace = compiler::check(&source)?;

    if cmd.trace {
        for rule in trace.iter() {
            println!("{}", rule);
        }
    }

    log::info!("'{}' is a valid program", cmd.in_src.display());
    Ok(())
}

fn lex(cmd: SubcommandLex) -> anyhow::Result<()> {
    let source = read_source(&cmd.in_src)?;
    let mut tokens = Tokenizer::new(&source);

    for tk in tokens.by_ref() {
        println!("{}", tk.map_err(compiler::Error::from)?.value().kind);
    }
    println!("{}", TokenKind::Eof);

    println!();
    print!("{}", tokens.source());
    Ok(())
}

fn suite(cmd: SubcommandSuite) -> anyhow::Result<()> {
    let suite_dir = cmd.suite_dir.unwrap_or_else(assets::default_suite_dir);
    let success = suite::run_suite(&suite_dir)
        .with_context(|| format!("could not run suite '{}'", suite_dir.display()))?;

    if !success {
        bail!("suite '{}' did not pass", suite_dir.display());
    }
    Ok(())
}
