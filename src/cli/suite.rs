use crate::{assets, compiler};
use ansi_term::Color::{Green, Red};
use derive_more::Constructor;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// What a unit must do to pass, decided by the files sitting next to it.
#[derive(Debug)]
enum Expectation {
    Compiles,
    Output(String),
    Fails(String),
}

#[derive(Debug, Constructor)]
struct Unit {
    name: OsString,
    src: PathBuf,
    expect: Expectation,
}

impl Unit {
    fn run(&self) -> Result<Result<(), String>, io::Error> {
        let source = std::fs::read_to_string(&self.src)?;

        Ok(match (&self.expect, compiler::compile(&source)) {
            (Expectation::Compiles, Ok(_)) => Ok(()),
            (Expectation::Output(expected), Ok(code)) => {
                if &code == expected {
                    Ok(())
                } else {
                    Err(String::from("generated code differs from the expected output"))
                }
            }
            (Expectation::Fails(msg), Err(err)) => {
                if err.to_string().contains(msg.as_str()) {
                    Ok(())
                } else {
                    Err(format!("expected an error containing '{}', got: {}", msg, err))
                }
            }
            (Expectation::Fails(msg), Ok(_)) => Err(format!(
                "compiled, but expected an error containing '{}'",
                msg
            )),
            (_, Err(err)) => Err(err.to_string()),
        })
    }
}

pub fn run_suite(suite_dir: &Path) -> Result<bool, io::Error> {
    let mut units = find_units(suite_dir)?;
    units.sort_unstable_by(|unit1, unit2| unit1.name.cmp(&unit2.name));

    run_units(&suite_dir.to_string_lossy(), &units)
}

fn find_unit(path: &Path) -> Result<Option<Unit>, io::Error> {
    if !path
        .extension()
        .map_or(false, |ext| ext == assets::SOURCE_EXT)
    {
        return Ok(None);
    }

    let name = match path.file_stem() {
        Some(name) => name.to_owned(),
        None => return Ok(None),
    };

    let expected_out = path.with_extension(assets::DEFAULT_OUTPUT_EXT);
    let expected_err = path.with_extension(assets::EXPECTED_ERROR_EXT);

    let expect = if expected_out.exists() {
        Expectation::Output(std::fs::read_to_string(expected_out)?)
    } else if expected_err.exists() {
        Expectation::Fails(std::fs::read_to_string(expected_err)?.trim().to_owned())
    } else {
        Expectation::Compiles
    };

    Ok(Some(Unit::new(name, PathBuf::from(path), expect)))
}

fn find_units(suite_dir: &Path) -> Result<Vec<Unit>, io::Error> {
    let mut units = Vec::new();
    for entry in suite_dir.read_dir()? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        if let Some(unit) = find_unit(&path)? {
            units.push(unit);
        }
    }
    Ok(units)
}

fn run_units(name: &str, units: &[Unit]) -> Result<bool, io::Error> {
    let name_pad = units.iter().map(|unit| unit.name.len()).max().unwrap_or(0);

    println!("Running suite: '{}' ({} units)", name, units.len());
    println!("{:-<line_len$}", "", line_len = name_pad + 45);

    let mut passes = 0;
    for (num, unit) in units.iter().enumerate() {
        if run_unit(unit, num + 1, name_pad)? {
            passes += 1;
        }
    }
    let success = passes == units.len();

    println!("{:-<line_len$}", "", line_len = name_pad + 45);
    println!(
        "Suite Result: {}, {}/{} passes",
        if success {
            Green.bold().paint("SUCCESS")
        } else {
            Red.bold().paint("FAILED")
        },
        passes,
        units.len()
    );

    Ok(success)
}

fn run_unit(unit: &Unit, num: usize, name_pad: usize) -> Result<bool, io::Error> {
    let (success, msg) = match unit.run()? {
        Ok(()) => (true, format!("{}", Green.bold().paint("PASS"))),
        Err(why) => (
            false,
            format!(
                "{}:\n\t{}",
                Red.bold().paint("FAIL"),
                why.replace("\n", "\n\t")
            ),
        ),
    };

    println!(
        "Unit {:2 }: {} {}{}",
        num,
        unit.name.to_string_lossy(),
        " ".repeat(name_pad - unit.name.len()),
        msg
    );

    Ok(success)
}
