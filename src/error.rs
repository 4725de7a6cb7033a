use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that stop a run.
///
/// A source that fails mid-read is not an error here: it is retired and the
/// run continues.
#[derive(Debug, Error)]
pub enum Error {
    /// The input directory could not be listed.
    #[error("failed to list input directory {}: {source}", .path.display())]
    Discover { path: PathBuf, source: io::Error },

    /// A declared source could not be opened. No output is produced.
    #[error("failed to open source {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The output file could not be created.
    #[error("failed to create output {}: {source}", .path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    /// Writing to the output failed.
    #[error("failed to write output: {0}")]
    Sink(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::Error;
    use std::error::Error as _;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn open_error_names_the_path() {
        let err = Error::Open {
            path: PathBuf::from("in/a.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(err.to_string(), "failed to open source in/a.txt: no such file");
        assert!(err.source().is_some());
    }
}
