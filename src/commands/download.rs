use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::ResultExt;
use crate::stats::Timer;
use crate::storage::{Backend, DownloadRequest};
use crate::Error;

pub struct Download<'a> {
    backend: &'a dyn Backend,
    bucket: String,
    key: String,
    path: PathBuf,
}

impl<'a> Download<'a> {
    pub fn new<P>(backend: &'a dyn Backend, bucket: String, key: String, path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Download {
            backend,
            bucket,
            key,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Writes the object into the destination file, returns the number of bytes retrieved.
    pub fn run(self) -> Result<u64, Error> {
        let Self {
            backend,
            bucket,
            key,
            path,
        } = self;

        let path = destination_path(&path, &bucket, &key)?;

        let mut opts = OpenOptions::new();
        let file = opts
            .create(true)
            .truncate(true)
            .write(true)
            .open(&path)
            .io_err(&path)?;

        let req = DownloadRequest {
            bucket: &bucket,
            key: &key,
        };

        let timer = Timer::start();
        let mut writer = BufWriter::new(file);
        let result = backend.download(req, &mut writer);
        drop(writer);

        let len = match result {
            Ok(len) => len,
            Err(err) => {
                if let Err(rm) = fs::remove_file(&path) {
                    debug!("Unable to remove {:?}; {}", path.as_os_str(), rm);
                }
                return Err(err);
            }
        };

        debug!("Downloaded '{}' into {:?}, {} bytes retrieved", req, path.as_os_str(), len);
        debug!("Download {}", timer.stop(len));

        Ok(len)
    }
}

// An existing directory receives the object under its own file name.
fn destination_path(path: &Path, bucket: &str, key: &str) -> Result<PathBuf, Error> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    match key.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(path.join(name)),
        _ => Err(Error::invalid_location(format!("s3:{}:{}", bucket, key))),
    }
}
