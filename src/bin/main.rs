use std::io::Write;
use std::process;

use clap::ErrorKind as ClapErrorKind;
use env_logger::{Builder, Target};
use log::{debug, error, info, Level};
use s3cp::storage::S3;
use s3cp::{cli, Config, Error, Transfer};

fn init_logger(cfg: &Config) {
    Builder::new()
        .filter_level(cfg.log_level())
        .target(Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level, record.args()),
        })
        .init();
}

fn run(cfg: &Config) -> Result<(), Error> {
    let transfer = Transfer::route(&cfg.source, &cfg.destination)?;
    debug!("{:?}", transfer);

    let s3 = S3::new(cfg)?;
    transfer.run(cfg, &s3)?;

    if let Some(message) = cfg.completion_message() {
        info!("{}", message);
    }

    Ok(())
}

fn main() {
    let args = match cli::app().get_matches_safe() {
        Ok(args) => args,
        Err(err) => match err.kind {
            ClapErrorKind::HelpDisplayed | ClapErrorKind::VersionDisplayed => err.exit(),
            _ => {
                eprintln!("{}", err.message);
                process::exit(1);
            }
        },
    };

    let cfg = match Config::from_matches(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    init_logger(&cfg);
    debug!("{:?}", cfg);

    if let Err(err) = run(&cfg) {
        error!("{}", err);
        process::exit(1);
    }
}
