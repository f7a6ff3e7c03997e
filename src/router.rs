use std::path::PathBuf;

use log::debug;

use crate::commands::{Download, Upload};
use crate::storage::Backend;
use crate::{Config, Error, Location};

/// A copy with its direction resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Download {
        bucket: String,
        key: String,
        path: PathBuf,
    },
    Upload {
        path: PathBuf,
        bucket: String,
        key: String,
    },
}

impl Transfer {
    /// Classifies both arguments and picks the direction. Performs no I/O.
    pub fn route<S1, S2>(source: S1, destination: S2) -> Result<Self, Error>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let source = Location::parse(source)?;
        let destination = Location::parse(destination)?;

        debug!(
            "Source remote = {}, destination remote = {}",
            source.is_remote(),
            destination.is_remote()
        );

        match (source, destination) {
            (Location::Remote { bucket, key }, Location::Local(path)) => {
                Ok(Transfer::Download { bucket, key, path })
            }
            (Location::Local(path), Location::Remote { bucket, key }) => {
                Ok(Transfer::Upload { path, bucket, key })
            }
            (Location::Remote { .. }, Location::Remote { .. }) => Err(Error::direction(
                "copying between two storage paths is not supported",
            )),
            (Location::Local(_), Location::Local(_)) => Err(Error::direction(
                "one of source or destination must be a storage path like s3:bucket:/path",
            )),
        }
    }

    pub fn run(self, cfg: &Config, backend: &dyn Backend) -> Result<(), Error> {
        match self {
            Transfer::Download { bucket, key, path } => {
                debug!("Downloading s3:{}:{}", bucket, key);
                Download::new(backend, bucket, key, path).run()?;
            }
            Transfer::Upload { path, bucket, key } => {
                debug!("Uploading {:?}", path.as_os_str());
                Upload::new(cfg, backend, path, bucket, key).run()?;
            }
        }

        Ok(())
    }
}
