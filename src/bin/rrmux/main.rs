//! # rrmux
//!
//! Merges the files of a directory line by line, taking one line from each
//! file in turn, and reports how long it took.

use log::{error, warn};

mod args;
mod logging;

fn main() {
    logging::init();
    let args = args::build_cli().get_matches();
    let config = args::config(&args);

    let code = match rrmux::run(&config) {
        Ok(summary) => {
            if let Err(err) = summary.report(args::color(&args)) {
                warn!("failed to print timing report: {}", err);
            }
            0
        }
        Err(err) => {
            error!("{}", err);
            1
        }
    };

    std::process::exit(code)
}
