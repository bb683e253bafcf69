use std::path::PathBuf;

pub const SOURCE_EXT: &str = "teeny";
pub const DEFAULT_OUTPUT_EXT: &str = "c";
pub const EXPECTED_ERROR_EXT: &str = "err";

pub fn default_suite_dir() -> PathBuf {
    ["programs", "suite"].iter().collect()
}
