use crate::multiplexer::Line;
use crate::sync::Mutex;
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::io::{Result, Write};

/// Output sink that writes lines in production order, whatever order they are
/// handed in.
///
/// When several workers drain one [`Multiplexer`](crate::Multiplexer), a
/// worker holding line 7 may reach the sink before the worker holding line 6.
/// The sequencer writes a line as soon as every line before it has been
/// written and holds it back otherwise, so the output is exactly what a single
/// worker would have produced.
///
/// Each line is written followed by `\n`.
///
/// ```
/// use rrmux::{Multiplexer, Sequencer};
/// use std::io::Cursor;
///
/// let mux = Multiplexer::new(vec![Cursor::new("a1\n"), Cursor::new("b1\n")]);
/// let first = mux.next_line().unwrap();
/// let second = mux.next_line().unwrap();
///
/// let sequencer = Sequencer::new(Vec::new());
/// sequencer.commit(second).unwrap();
/// assert_eq!(sequencer.pending(), 1);
/// sequencer.commit(first).unwrap();
/// assert_eq!(sequencer.written(), 2);
/// assert_eq!(sequencer.into_inner(), b"a1\nb1\n");
/// ```
pub struct Sequencer<W> {
    inner: Mutex<Inner<W>>,
}

#[cfg(test)]
struct _Test
where
    Sequencer<std::io::BufWriter<std::fs::File>>: Send + Sync;

struct Inner<W> {
    sink: W,
    /// Number of lines written to the sink.
    written: u64,
    /// Lines after the last written one, indexed by `seq - written`. A slot
    /// is `None` until its line is committed.
    pending: VecDeque<Option<String>>,
}

impl<W: Write> Sequencer<W> {
    pub fn new(sink: W) -> Self {
        Sequencer {
            inner: Mutex::new(Inner {
                sink,
                written: 0,
                pending: VecDeque::new(),
            }),
        }
    }

    /// Hands over one line.
    ///
    /// Writes it, along with any held-back lines it unblocks, if it is the
    /// next line due; otherwise holds it until the lines before it arrive.
    ///
    /// # Panics
    ///
    /// Panics if a line with the same sequence number was already committed.
    pub fn commit(&self, line: Line) -> Result<()> {
        let inner = &mut *self.inner.lock();
        let seq = line.seq;
        *inner.get(seq) = Some(line.into_text());

        // A line leaves `pending` only once the sink has accepted it, so a
        // failed write is retried by the next commit.
        while let Some(Some(text)) = inner.pending.front() {
            writeln!(inner.sink, "{}", text)?;
            inner.pending.pop_front();
            inner.written += 1;
        }
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.lock().sink.flush()
    }

    /// Number of lines written to the sink so far.
    pub fn written(&self) -> u64 {
        self.inner.lock().written
    }

    /// Number of committed lines held back waiting for an earlier line.
    pub fn pending(&self) -> usize {
        let inner = self.inner.lock();
        inner.pending.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().sink
    }
}

impl<W> Inner<W> {
    fn get(&mut self, seq: u64) -> &mut Option<String> {
        assert!(seq >= self.written, "line {} committed twice", seq);
        let offset = (seq - self.written) as usize;

        if offset >= self.pending.len() {
            self.pending.resize_with(offset + 1, || None);
        }

        let slot = &mut self.pending[offset];
        assert!(slot.is_none(), "line {} committed twice", seq);
        slot
    }
}

impl<W> Debug for Sequencer<W> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let inner = self.inner.lock();
        formatter
            .debug_struct("Sequencer")
            .field("written", &inner.written)
            .field("pending", &inner.pending.len())
            .finish()
    }
}
