mod args;
mod insights;

use clap::Parser;
use log::LevelFilter;
use snafu::ErrorCompat;

fn main() {
    let args = args::Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    if let Err(e) = insights::run_dashboards(&args) {
        eprintln!("An error occured: {}", e);
        let mut source = std::error::Error::source(&*e);
        while let Some(s) = source {
            eprintln!("caused by: {}", s);
            source = s.source();
        }
        if let Some(bt) = ErrorCompat::backtrace(&*e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
