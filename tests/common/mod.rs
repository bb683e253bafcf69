use std::path::PathBuf;

#[allow(dead_code)]
pub fn compile_ok(source: &str) -> String {
    match teeny::compiler::compile(source) {
        Ok(code) => code,
        Err(err) => panic!("expected {:?} to compile, got: {}", source, err),
    }
}

#[allow(dead_code)]
pub fn scratch_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("teeny-test-{}-{}", std::process::id(), name));
    path
}
