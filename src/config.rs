use std::path::PathBuf;

/// Where a run reads from and writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory whose regular files are the sources.
    pub input_dir: PathBuf,
    /// File to create or overwrite with the merged lines.
    pub output: PathBuf,
    /// Number of threads draining the multiplexer. Zero is treated as one.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("tests"),
            output: PathBuf::from("output.txt"),
            workers: 1,
        }
    }
}
