use std::io::{BufRead, Result};

/// One slot of the multiplexer's source arena.
///
/// The reader is moved out of the slot for the duration of a read so that the
/// shared lock is not held across I/O. Between reads it is always present.
pub(super) struct Source<R> {
    pub(super) label: String,
    reader: Option<R>,
    /// Number of lines produced from this source so far.
    pub(super) lines: u64,
    /// Set once the source has reported end-of-stream or a read error. Never
    /// cleared.
    pub(super) retired: bool,
}

impl<R> Source<R> {
    pub(super) fn new(label: String, reader: R) -> Self {
        Source {
            label,
            reader: Some(reader),
            lines: 0,
            retired: false,
        }
    }

    pub(super) fn claim(&mut self) -> Option<R> {
        self.reader.take()
    }

    pub(super) fn restore(&mut self, reader: R) {
        debug_assert!(self.reader.is_none());
        self.reader = Some(reader);
    }
}

/// Reads one line, without its `\n` or `\r\n` terminator.
///
/// Returns `Ok(None)` at end-of-stream. A final line lacking a terminator is
/// still a line.
pub(super) fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::read_line;
    use std::io::{Cursor, ErrorKind};

    #[test]
    fn strips_terminators() {
        let mut reader = Cursor::new("unix\nwindows\r\n\nlast");
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("unix"));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("windows"));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some(""));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("last"));
        assert_eq!(read_line(&mut reader).unwrap(), None);
        assert_eq!(read_line(&mut reader).unwrap(), None);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut reader = Cursor::new(vec![0xff, 0xfe, b'\n']);
        let err = read_line(&mut reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }
}
