use std::str::FromStr;

use clap::ArgMatches;
use log::LevelFilter;
use rusoto_core::Region;
use url::Url;

use crate::cli::{DEBUG_ARG, DESTINATION_ARG, ENDPOINT_ARG, QUIET_ARG, REGION_ARG, RR_ARG, SOURCE_ARG};
use crate::Error;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Options for a single copy, fixed once the command line is parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub source: String,
    pub destination: String,
    pub region: Region,
    pub reduced_redundancy: bool,
    pub quiet: bool,
    pub debug: bool,
}

impl Config {
    pub fn from_matches(args: &ArgMatches<'_>) -> Result<Self, Error> {
        let source = args.value_of(SOURCE_ARG).unwrap_or_default().to_string();
        let destination = args.value_of(DESTINATION_ARG).unwrap_or_default().to_string();
        let region = args.value_of(REGION_ARG).unwrap_or(DEFAULT_REGION);
        let region = region_from(region, args.value_of(ENDPOINT_ARG))?;

        Ok(Config {
            source,
            destination,
            region,
            reduced_redundancy: args.is_present(RR_ARG),
            quiet: args.is_present(QUIET_ARG),
            debug: args.is_present(DEBUG_ARG),
        })
    }

    /// The line printed after a successful copy, `None` when quiet.
    pub fn completion_message(&self) -> Option<String> {
        if self.quiet {
            return None;
        }

        Some(format!("{} -> {} : transfer complete", self.source, self.destination))
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        }
    }
}

fn region_from(name: &str, endpoint: Option<&str>) -> Result<Region, Error> {
    if let Some(endpoint) = endpoint {
        let endpoint = Url::parse(endpoint).map_err(Error::usage)?;
        let endpoint = endpoint.as_str().trim_end_matches('/').to_string();
        return Ok(Region::Custom {
            name: name.to_string(),
            endpoint,
        });
    }

    Region::from_str(name).map_err(Error::usage)
}
