use crate::config::Config;
use crate::discover::list_sources;
use crate::drain::drain_with_workers;
use crate::error::{Error, Result};
use crate::multiplexer::Multiplexer;
use crate::sequencer::Sequencer;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};
use termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor};

/// What a completed run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub sources: usize,
    pub lines: u64,
    /// Wall-clock time spent draining, excluding discovery and opening.
    pub elapsed: Duration,
}

impl Summary {
    /// Prints the elapsed time and totals to stderr.
    pub fn report(&self, color: ColorChoice) -> io::Result<()> {
        self.write_report(&mut StandardStream::stderr(color))
    }

    fn write_report(&self, out: &mut dyn WriteColor) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_bold(true);
        out.set_color(&spec)?;
        write!(out, "Total elapsed time")?;
        out.reset()?;
        writeln!(
            out,
            ": {:?} ({} lines from {} sources)",
            self.elapsed, self.lines, self.sources,
        )
    }
}

/// Merges every file of `config.input_dir` into `config.output`, one line
/// from each file in turn.
///
/// Every source is opened before the output is created, so a source that
/// cannot be opened fails the run without touching the output.
pub fn run(config: &Config) -> Result<Summary> {
    let paths = list_sources(&config.input_dir)?;
    info!(
        "merging {} files from {}",
        paths.len(),
        config.input_dir.display(),
    );

    let mux = Multiplexer::open(&paths)?;
    let output = File::create(&config.output).map_err(|source| Error::CreateOutput {
        path: config.output.clone(),
        source,
    })?;
    let sequencer = Sequencer::new(BufWriter::new(output));

    let start = Instant::now();
    let lines = drain_with_workers(&mux, &sequencer, config.workers)?;
    sequencer.flush().map_err(Error::Sink)?;
    let elapsed = start.elapsed();

    for source in mux.status() {
        debug!("{}: {} lines", source.label, source.lines);
    }

    Ok(Summary {
        sources: mux.len(),
        lines,
        elapsed,
    })
}
