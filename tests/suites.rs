use teeny::{assets, cli::suite};

#[test]
fn run_suite_programs() -> Result<(), std::io::Error> {
    assert!(suite::run_suite(&assets::default_suite_dir())?);
    Ok(())
}

#[test]
fn sample_programs_compile() {
    for name in ["fib", "average", "countdown"].iter() {
        let path = format!("programs/{}.{}", name, assets::SOURCE_EXT);
        let source = std::fs::read_to_string(&path).unwrap();
        assert!(
            teeny::compiler::compile(&source).is_ok(),
            "{} did not compile",
            path
        );
    }
}
