//! Command-line definition for `rrmux`.

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rrmux::{ColorChoice, Config};
use std::path::PathBuf;

pub fn build_cli() -> Command {
    Command::new("rrmux")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merge the lines of every file in a directory, one file at a time in turn")
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .default_value("tests")
                .help("Directory whose files are merged"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value("output.txt")
                .help("File to create or overwrite with the merged lines"),
        )
        .arg(
            Arg::new("workers")
                .long("workers")
                .short('w')
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("1")
                .help("Number of threads draining the inputs; 0 means one per CPU"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Do not color the timing report"),
        )
}

pub fn config(args: &ArgMatches) -> Config {
    let mut config = Config::default();
    if let Some(input) = args.get_one::<PathBuf>("input") {
        config.input_dir = input.clone();
    }
    if let Some(output) = args.get_one::<PathBuf>("output") {
        config.output = output.clone();
    }
    config.workers = match args.get_one::<usize>("workers") {
        Some(&0) => num_cpus::get(),
        Some(&workers) => workers,
        None => config.workers,
    };
    config
}

pub fn color(args: &ArgMatches) -> ColorChoice {
    if args.get_flag("no-color") {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}
