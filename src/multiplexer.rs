#[path = "source.rs"]
mod source;

use crate::error::{Error, Result};
use crate::sync::{Condvar, Mutex};
use log::{debug, info, warn};
use std::fmt::{self, Debug};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use self::source::Source;

/// Round-robin reader over a fixed, ordered set of line sources.
///
/// Sources are visited in index order: the next line of source 0, then the
/// next line of source 1, and so on, wrapping back to the lowest index. A
/// source that reaches end-of-stream is retired and loses its slot in every
/// later round. Once every source is retired the multiplexer is exhausted and
/// all further calls report [`Outcome::Done`].
///
/// The multiplexer is `Sync` whenever the reader type is `Send`, so any
/// number of threads may pull from it at once. The order in which lines are
/// produced is decided by the shared cursor alone and does not depend on
/// which thread asks.
///
/// # Single reader
///
/// ```
/// use rrmux::Multiplexer;
/// use std::io::Cursor;
///
/// let mux = Multiplexer::new(vec![
///     Cursor::new("a1\na2\na3\n"),
///     Cursor::new("b1\n"),
///     Cursor::new("c1\nc2\n"),
/// ]);
///
/// let lines: Vec<String> = mux.lines().map(|line| line.into_text()).collect();
/// assert_eq!(lines, ["a1", "b1", "c1", "a2", "c2", "a3"]);
/// assert!(mux.is_done());
/// ```
///
/// # Many workers
///
/// Every produced line carries a sequence number. Workers that hand their
/// lines to a shared [`Sequencer`](crate::Sequencer) get exactly the output a
/// single worker would have written.
///
/// ```
/// use rrmux::{Multiplexer, Outcome, Sequencer};
/// use std::io::Cursor;
///
/// let mux = Multiplexer::new(vec![Cursor::new("a1\na2\n"), Cursor::new("b1\n")]);
/// let sequencer = Sequencer::new(Vec::new());
///
/// rayon::scope(|scope| {
///     for _ in 0..4 {
///         scope.spawn(|_| loop {
///             match mux.try_next() {
///                 Outcome::Line(line) => sequencer.commit(line).unwrap(),
///                 Outcome::Skip => {}
///                 Outcome::Done | Outcome::Cancelled => return,
///             }
///         });
///     }
/// });
///
/// assert_eq!(sequencer.into_inner(), b"a1\nb1\na2\n");
/// ```
pub struct Multiplexer<R> {
    state: Mutex<State<R>>,
    changed: Condvar,
    /// Mirror of `State::exhausted` for lock-free polling. Only ever written
    /// while the state lock is held.
    exhausted: AtomicBool,
    len: usize,
}

#[cfg(test)]
struct _Test
where
    Multiplexer<BufReader<File>>: Send + Sync;

struct State<R> {
    sources: Vec<Source<R>>,
    /// Index of the source to be read next.
    turn: usize,
    /// Number of sources not yet retired.
    live: usize,
    exhausted: bool,
    cancelled: bool,
    /// A caller has checked out `sources[turn]` and is reading from it.
    reading: bool,
    /// Number of lines produced so far; the next line's sequence number.
    produced: u64,
}

/// Result of one [`Multiplexer::try_next`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The source whose turn it was produced a line.
    Line(Line),
    /// The source whose turn it was had nothing left and has been retired.
    /// Poll again.
    Skip,
    /// Every source has been retired.
    Done,
    /// [`Multiplexer::cancel`] was called before all sources were retired.
    Cancelled,
}

/// A line produced by a [`Multiplexer`].
///
/// Fields are read-only; writing to them will not compile.
#[readonly::make]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// Index of the source the line was read from.
    pub source: usize,
    /// Position of this line in the multiplexer's output, starting at 0 and
    /// increasing by 1 for every line produced, whichever source it came
    /// from.
    pub seq: u64,
    /// Line content without its terminator.
    pub text: String,
}

impl Line {
    /// Takes the line content.
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Point-in-time view of one source, from [`Multiplexer::status`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStatus {
    pub index: usize,
    /// File path for sources opened by [`Multiplexer::open`], otherwise
    /// `source #<index>`.
    pub label: String,
    pub lines: u64,
    pub retired: bool,
}

impl<R> Multiplexer<R> {
    /// Makes a multiplexer over already-open readers, in the given order.
    pub fn new(readers: Vec<R>) -> Self {
        let sources = readers
            .into_iter()
            .enumerate()
            .map(|(index, reader)| Source::new(format!("source #{}", index), reader))
            .collect();
        Self::from_sources(sources)
    }

    fn from_sources(sources: Vec<Source<R>>) -> Self {
        let len = sources.len();
        let exhausted = len == 0;
        Multiplexer {
            state: Mutex::new(State {
                sources,
                turn: 0,
                live: len,
                exhausted,
                cancelled: false,
                reading: false,
                produced: 0,
            }),
            changed: Condvar::new(),
            exhausted: AtomicBool::new(exhausted),
            len,
        }
    }

    /// Number of sources, retired or not.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every source has been retired.
    ///
    /// This call does not block. Once it returns true it returns true forever.
    pub fn is_done(&self) -> bool {
        self.exhausted.load(Ordering::Acquire)
    }

    /// Stops the multiplexer.
    ///
    /// Every caller waiting in [`try_next`](Self::try_next), and every later
    /// call, gets [`Outcome::Cancelled`] unless the sources were already
    /// exhausted. A read already in progress still completes and its line is
    /// delivered to the caller that started it.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if !state.cancelled {
            state.cancelled = true;
            debug!("multiplexer cancelled after {} lines", state.produced);
        }
        drop(state);
        self.changed.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// Snapshot of every source's progress.
    pub fn status(&self) -> Vec<SourceStatus> {
        let state = self.state.lock();
        state
            .sources
            .iter()
            .enumerate()
            .map(|(index, source)| SourceStatus {
                index,
                label: source.label.clone(),
                lines: source.lines,
                retired: source.retired,
            })
            .collect()
    }

    fn publish(&self, state: &State<R>) {
        if state.exhausted {
            self.exhausted.store(true, Ordering::Release);
        }
    }
}

impl Multiplexer<BufReader<File>> {
    /// Opens every path for reading, in order.
    ///
    /// Fails without producing a multiplexer if any path cannot be opened.
    pub fn open<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut sources = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let file = File::open(path).map_err(|source| Error::Open {
                path: path.to_owned(),
                source,
            })?;
            sources.push(Source::new(
                path.display().to_string(),
                BufReader::new(file),
            ));
        }
        debug!("opened {} sources", sources.len());
        Ok(Self::from_sources(sources))
    }
}

impl<R: BufRead> Multiplexer<R> {
    /// Reads the next line from the source whose turn it is.
    ///
    /// Blocks only while another caller is in the middle of reading; the lock
    /// is not held during the read itself. A source at end-of-stream costs
    /// exactly one call, which returns [`Outcome::Skip`]. A read error is
    /// handled the same way as end-of-stream: the source is retired and the
    /// error is logged, not returned.
    pub fn try_next(&self) -> Outcome {
        let mut state = self.state.lock();
        loop {
            if state.exhausted {
                return Outcome::Done;
            }
            if state.cancelled {
                return Outcome::Cancelled;
            }
            if !state.reading {
                break;
            }
            state = self.changed.wait(state);
        }

        let index = state.turn;
        let mut reader = state.sources[index]
            .claim()
            .expect("reader of a live source is checked in while no read is in flight");
        state.reading = true;
        drop(state);

        let claim = Claim { mux: self, index };
        let read = source::read_line(&mut reader);

        let mut state = self.state.lock();
        state.reading = false;
        state.sources[index].restore(reader);
        let outcome = match read {
            Ok(Some(text)) => Outcome::Line(state.produce(index, text)),
            Ok(None) => {
                state.retire(index);
                Outcome::Skip
            }
            Err(err) => {
                warn!(
                    "retiring {} after read error: {}",
                    state.sources[index].label, err,
                );
                state.retire(index);
                Outcome::Skip
            }
        };
        self.publish(&state);
        drop(state);
        drop(claim);
        self.changed.notify_all();
        outcome
    }

    /// Waits for the next line, passing over retired sources.
    ///
    /// Returns `None` once the multiplexer is exhausted or cancelled.
    pub fn next_line(&self) -> Option<Line> {
        loop {
            match self.try_next() {
                Outcome::Line(line) => return Some(line),
                Outcome::Skip => {}
                Outcome::Done | Outcome::Cancelled => return None,
            }
        }
    }

    /// Iterator over [`next_line`](Self::next_line).
    pub fn lines(&self) -> Lines<R> {
        Lines { mux: self }
    }
}

impl<R> Debug for Multiplexer<R> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let state = self.state.lock();
        formatter
            .debug_struct("Multiplexer")
            .field("sources", &state.sources.len())
            .field("turn", &state.turn)
            .field("live", &state.live)
            .field("produced", &state.produced)
            .field("exhausted", &state.exhausted)
            .finish()
    }
}

/// Iterator returned by [`Multiplexer::lines`].
pub struct Lines<'a, R> {
    mux: &'a Multiplexer<R>,
}

impl<'a, R: BufRead> Iterator for Lines<'a, R> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        self.mux.next_line()
    }
}

impl<R> State<R> {
    fn produce(&mut self, index: usize, text: String) -> Line {
        let seq = self.produced;
        self.produced += 1;
        self.sources[index].lines += 1;
        self.turn = self.next_live(index);
        Line {
            source: index,
            seq,
            text,
        }
    }

    fn retire(&mut self, index: usize) {
        let source = &mut self.sources[index];
        if source.retired {
            return;
        }
        source.retired = true;
        debug!("retired {} after {} lines", source.label, source.lines);

        self.live -= 1;
        if self.live == 0 {
            self.exhausted = true;
            info!(
                "all {} sources exhausted after {} lines",
                self.sources.len(),
                self.produced,
            );
        } else {
            self.turn = self.next_live(index);
        }
    }

    /// First non-retired index after `from`, wrapping around.
    fn next_live(&self, from: usize) -> usize {
        let len = self.sources.len();
        (1..=len)
            .map(|step| (from + step) % len)
            .find(|&index| !self.sources[index].retired)
            .unwrap_or(from)
    }
}

/// Outstanding read of one source. If the read panics, the source is retired
/// so that other callers are not left waiting on a read that never settles.
struct Claim<'a, R> {
    mux: &'a Multiplexer<R>,
    index: usize,
}

impl<'a, R> Drop for Claim<'a, R> {
    fn drop(&mut self) {
        if !thread::panicking() {
            return;
        }
        let mut state = self.mux.state.lock();
        state.reading = false;
        state.retire(self.index);
        self.mux.publish(&state);
        drop(state);
        self.mux.changed.notify_all();
    }
}
