use std::process;

use clap::Parser;
use log::{debug, error, LevelFilter};

use dartboard_cli::Args;

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();
    debug!("{:?}", args);

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = dartboard_cli::run(&args, &mut stdout) {
        error!("{}", err);
        process::exit(1);
    }
}
