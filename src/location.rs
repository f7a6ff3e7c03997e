use std::fmt::{self, Display};
use std::path::PathBuf;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::Error;

lazy_static! {
    // bucket and key are matched loosely so that empty parts can be rejected
    static ref S3_PATH_RE: Regex = Regex::new("^s3:([^:]*):(.*)$").unwrap();
}

/// One side of a copy: a local file or an object in a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Local(PathBuf),
    Remote { bucket: String, key: String },
}

impl Location {
    pub fn parse<S>(value: S) -> Result<Self, Error>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        let caps = match S3_PATH_RE.captures(value) {
            Some(caps) => caps,
            None => return Ok(Location::Local(PathBuf::from(value))),
        };

        let bucket = &caps[1];
        let key = &caps[2];

        if bucket.is_empty() || key.is_empty() {
            return Err(Error::invalid_location(value));
        }

        Ok(Location::Remote {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    pub fn is_remote(&self) -> bool {
        match self {
            Location::Remote { .. } => true,
            Location::Local(_) => false,
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::parse(s)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Location::Local(path) => write!(f, "{}", path.display()),
            Location::Remote { bucket, key } => write!(f, "s3:{}:{}", bucket, key),
        }
    }
}
