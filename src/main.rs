use anyhow::Result;
use clap::Parser;
use env_logger::fmt::Target;
use log::LevelFilter;
use std::{env, io::Write, path::Path};

use strip_comments::{cli, config::Config, strip};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let log_level_filter = cli.verbose.log_level_filter();

    // With --stdin, stdout carries the stripped source.
    let target = if cli.stdin { Target::Stderr } else { Target::Stdout };
    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}:\n{}", record.level(), record.args()))
        .filter_level(log_level_filter)
        .target(target)
        .init();

    // The 'normal run' mode will show the 'pretty' formatted progress. But if we turn off the log
    // level, we should never show that.
    let show_progress = log_level_filter == LevelFilter::Info;

    let config = match &cli.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::discover(&env::current_dir()?)?,
    }
    .with_overrides(&cli.extensions, cli.filter.clone());

    match strip::strip(
        &cli.paths,
        cli.stdin,
        cli.check,
        &config,
        show_progress,
        cli.no_timing,
    ) {
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1)
        }
        Ok(()) => Ok(()),
    }
}
