use crate::error::{Error, Result};
use crate::multiplexer::{Multiplexer, Outcome};
use crate::sequencer::Sequencer;
use crate::sync::Mutex;
use log::debug;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};

/// Forwards every line of `mux` to `sequencer` on the calling thread.
///
/// Returns the number of lines forwarded. Stops early with an error if the
/// sink fails.
pub fn drain<R, W>(mux: &Multiplexer<R>, sequencer: &Sequencer<W>) -> Result<u64>
where
    R: BufRead,
    W: Write,
{
    let mut forwarded = 0;
    while !mux.is_done() {
        match mux.try_next() {
            Outcome::Line(line) => {
                sequencer.commit(line).map_err(Error::Sink)?;
                forwarded += 1;
            }
            Outcome::Skip => {}
            Outcome::Done | Outcome::Cancelled => break,
        }
    }
    Ok(forwarded)
}

/// Runs [`drain`] on `workers` threads at once.
///
/// The sink receives the same lines in the same order as with one worker. If
/// any worker fails to write, the multiplexer is cancelled so the rest stop,
/// and the first failure is returned.
pub fn drain_with_workers<R, W>(
    mux: &Multiplexer<R>,
    sequencer: &Sequencer<W>,
    workers: usize,
) -> Result<u64>
where
    R: BufRead + Send,
    W: Write + Send,
{
    let workers = workers.max(1);
    if workers == 1 {
        return drain(mux, sequencer);
    }

    let forwarded = AtomicU64::new(0);
    let failure = Mutex::new(None);

    rayon::scope(|scope| {
        for worker in 0..workers {
            let forwarded = &forwarded;
            let failure = &failure;
            scope.spawn(move |_| match drain(mux, sequencer) {
                Ok(count) => {
                    debug!("worker {} forwarded {} lines", worker, count);
                    forwarded.fetch_add(count, Ordering::Relaxed);
                }
                Err(err) => {
                    mux.cancel();
                    failure.lock().get_or_insert(err);
                }
            });
        }
    });

    match failure.into_inner() {
        Some(err) => Err(err),
        None => Ok(forwarded.into_inner()),
    }
}
