//! Round-robin merging of lines from a fixed set of text sources.
//!
//! # Use case
//!
//! Sometimes a set of line-oriented inputs needs to become one stream where
//! the inputs take turns, rather than one stream where they follow each other.
//! Concatenating is easy. Interleaving deterministically, while still letting
//! several threads pull lines and push them to an output, takes some care: the
//! threads must agree on whose turn it is, a finished input must stop taking
//! turns, everyone must find out when the last input is finished, and the
//! output must not depend on how the threads happened to be scheduled.
//!
//! # Objective
//!
//!   - We have an ordered set of sources 0..N, all opened up front.
//!
//!   - We want the next line of source 0, then the next line of source 1,
//!     etc, wrapping back to source 0. A source with no lines left drops out
//!     of the rotation for good.
//!
//!   - We want any number of threads to be able to pull lines concurrently,
//!     with the order of lines decided by the rotation alone.
//!
//!   - We want the output written in that same order regardless of which
//!     thread delivers which line.
//!
//! The [`Multiplexer`] owns the sources and the rotation. The [`Sequencer`]
//! puts lines back in order on their way to the output. [`drain`] and
//! [`drain_with_workers`] connect the two, and [`run`] does the whole thing
//! for a directory of files.
//!
//! ```
//! use rrmux::{drain, Multiplexer, Sequencer};
//! use std::io::Cursor;
//!
//! let mux = Multiplexer::new(vec![Cursor::new("a1\na2\n"), Cursor::new("b1\n")]);
//! let sequencer = Sequencer::new(Vec::new());
//! let lines = drain(&mux, &sequencer)?;
//!
//! assert_eq!(lines, 3);
//! assert_eq!(sequencer.into_inner(), b"a1\nb1\na2\n");
//! # Ok::<(), rrmux::Error>(())
//! ```

mod config;
mod discover;
mod drain;
mod error;
mod multiplexer;
mod run;
mod sequencer;
mod sync;

pub use crate::config::Config;
pub use crate::discover::list_sources;
pub use crate::drain::{drain, drain_with_workers};
pub use crate::error::{Error, Result};
pub use crate::multiplexer::{Line, Lines, Multiplexer, Outcome, SourceStatus};
pub use crate::run::{run, Summary};
pub use crate::sequencer::Sequencer;

#[doc(no_inline)]
pub use termcolor::ColorChoice;
