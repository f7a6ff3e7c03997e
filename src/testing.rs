use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rusoto_core::Region;
use tempfile::{self, NamedTempFile, TempDir};

use crate::storage::{Backend, DownloadRequest, UploadOutput, UploadRequest};
use crate::{Config, Error};

#[derive(Debug)]
pub struct FileGuard(Option<NamedTempFile>);

#[derive(Debug)]
pub struct DirGuard(Option<TempDir>);

impl AsRef<Path> for FileGuard {
    fn as_ref(&self) -> &Path {
        match self.0 {
            Some(ref temp) => temp.as_ref(),
            None => panic!("using after close"),
        }
    }
}

impl AsRef<Path> for DirGuard {
    fn as_ref(&self) -> &Path {
        match self.0 {
            Some(ref temp) => temp.path(),
            None => panic!("using after close"),
        }
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        if let Some(file) = self.0.take() {
            file.close().expect("cannot close temporary file")
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        if let Some(dir) = self.0.take() {
            dir.close().expect("cannot close temporary dir")
        }
    }
}

pub fn temp_file(suffix: &str) -> FileGuard {
    temp_file_with(suffix, &[])
}

pub fn temp_file_with(suffix: &str, content: &[u8]) -> FileGuard {
    let mut b = tempfile::Builder::new();
    let mut file = b.suffix(suffix).tempfile().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    FileGuard(Some(file))
}

pub fn temp_dir() -> DirGuard {
    let b = tempfile::Builder::new();
    let dir = b.tempdir().unwrap();
    DirGuard(Some(dir))
}

pub fn config() -> Config {
    Config {
        source: String::new(),
        destination: String::new(),
        region: Region::UsEast1,
        reduced_redundancy: false,
        quiet: false,
        debug: true,
    }
}

#[derive(Debug, Clone)]
pub struct Object {
    pub body: Vec<u8>,
    pub storage_class: Option<String>,
}

/// Keeps objects in a map keyed by (bucket, key).
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: RefCell<HashMap<(String, String), Object>>,
    calls: Cell<usize>,
    failing: bool,
}

impl MemoryBackend {
    pub fn failing() -> Self {
        MemoryBackend {
            failing: true,
            ..Default::default()
        }
    }

    pub fn put(&self, bucket: &str, key: &str, body: &[u8]) {
        let object = Object {
            body: body.to_vec(),
            storage_class: None,
        };
        self.objects
            .borrow_mut()
            .insert((bucket.into(), key.into()), object);
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.object(bucket, key).map(|it| it.body)
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Object> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Backend for MemoryBackend {
    fn download(&self, req: DownloadRequest<'_>, dst: &mut dyn Write) -> Result<u64, Error> {
        self.calls.set(self.calls.get() + 1);
        let message = format!("Failed to download {}", req);

        let body = match self.get(req.bucket, req.key) {
            Some(body) if !self.failing => body,
            Some(body) => {
                // write a little before failing so callers see a partial file
                let _ = dst.write_all(&body[..body.len() / 2]);
                return Error::transfer_err(message, "connection reset");
            }
            None => return Error::transfer_err(message, "NoSuchKey"),
        };

        dst.write_all(&body)
            .and_then(|_| dst.flush())
            .map_err(Error::transfer(message))?;

        Ok(body.len() as u64)
    }

    fn upload(&self, req: UploadRequest<'_>, src: &File) -> Result<UploadOutput, Error> {
        self.calls.set(self.calls.get() + 1);
        let message = format!("Failed to upload to {}", req);

        if self.failing {
            return Error::transfer_err(message, "access denied");
        }

        let mut body = Vec::new();
        src.take(req.len)
            .read_to_end(&mut body)
            .map_err(Error::transfer(message))?;

        let object = Object {
            body,
            storage_class: req.storage_class.map(String::from),
        };
        self.objects
            .borrow_mut()
            .insert((req.bucket.into(), req.key.into()), object);

        Ok(UploadOutput {
            location: format!("memory://{}/{}", req.bucket, req.key),
            len: req.len,
        })
    }
}
