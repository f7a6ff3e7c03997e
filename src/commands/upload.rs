use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::ResultExt;
use crate::stats::Timer;
use crate::storage::{Backend, UploadOutput, UploadRequest, REDUCED_REDUNDANCY};
use crate::{Config, Error};

pub struct Upload<'a, 'b> {
    cfg: &'a Config,
    backend: &'b dyn Backend,
    path: PathBuf,
    bucket: String,
    key: String,
}

impl<'a, 'b> Upload<'a, 'b> {
    pub fn new<P>(cfg: &'a Config, backend: &'b dyn Backend, path: P, bucket: String, key: String) -> Self
    where
        P: AsRef<Path>,
    {
        Upload {
            cfg,
            backend,
            path: path.as_ref().to_path_buf(),
            bucket,
            key,
        }
    }

    pub fn run(self) -> Result<UploadOutput, Error> {
        let Self {
            cfg,
            backend,
            path,
            bucket,
            key,
        } = self;

        let key = object_key(&path, key)?;

        let file = File::open(&path).io_err(&path)?;
        let meta = file.metadata().io_err(&path)?;
        if meta.is_dir() {
            return Err(Error::io(&path)("source is a directory"));
        }

        let storage_class = if cfg.reduced_redundancy {
            Some(REDUCED_REDUNDANCY)
        } else {
            None
        };

        let req = UploadRequest {
            bucket: &bucket,
            key: &key,
            len: meta.len(),
            storage_class,
        };

        let timer = Timer::start();
        let output = backend.upload(req, &file)?;

        debug!("Post-upload file destination URL '{}'", output.location);
        debug!("Upload {}", timer.stop(output.len));

        Ok(output)
    }
}

// A key ending with '/' names a folder, the source file name is appended.
fn object_key(path: &Path, key: String) -> Result<String, Error> {
    if !key.ends_with('/') {
        return Ok(key);
    }

    match path.file_name().and_then(|it| it.to_str()) {
        Some(name) => Ok(format!("{}{}", key, name)),
        None => Err(Error::io(path)(format!("Empty file name for {:?}", path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::ErrorKind;
    use crate::testing::{self, MemoryBackend};

    #[test]
    fn upload() {
        let cfg = testing::config();
        let backend = MemoryBackend::default();
        let src = testing::temp_file_with(".txt", b"hello world");

        let output = Upload::new(&cfg, &backend, &src, "mybucket".into(), "/a/b.txt".into())
            .run()
            .unwrap();

        assert_eq!(output.len, 11);
        assert_eq!(output.location, "memory://mybucket//a/b.txt");

        let object = backend.object("mybucket", "/a/b.txt").unwrap();
        assert_eq!(object.body, b"hello world");
        assert_eq!(object.storage_class, None);
    }

    #[test]
    fn upload_reduced_redundancy() {
        let mut cfg = testing::config();
        cfg.reduced_redundancy = true;

        let work = testing::temp_dir();
        let src = work.as_ref().join("b.txt");
        std::fs::write(&src, b"data").unwrap();

        let backend = MemoryBackend::default();
        Upload::new(&cfg, &backend, &src, "mybucket".into(), "/a/".into())
            .run()
            .unwrap();

        let object = backend.object("mybucket", "/a/b.txt").unwrap();
        assert_eq!(object.body, b"data");
        assert_eq!(object.storage_class.as_deref(), Some(REDUCED_REDUNDANCY));
    }

    #[test]
    fn upload_empty_file() {
        let cfg = testing::config();
        let backend = MemoryBackend::default();
        let src = testing::temp_file(".txt");

        let output = Upload::new(&cfg, &backend, &src, "mybucket".into(), "empty".into())
            .run()
            .unwrap();

        assert_eq!(output.len, 0);
        assert_eq!(backend.get("mybucket", "empty").unwrap(), b"");
    }

    #[test]
    fn open_failure() {
        let cfg = testing::config();
        let backend = MemoryBackend::default();
        let work = testing::temp_dir();

        let params = vec![work.as_ref().join("missing.txt"), work.as_ref().to_path_buf()];

        for src in params {
            let err = Upload::new(&cfg, &backend, &src, "mybucket".into(), "key".into())
                .run()
                .unwrap_err();

            assert!(matches!(err.kind(), ErrorKind::Io(_)), "{}", err);
        }

        assert_eq!(backend.calls(), 0);
    }

    #[test]
    fn transfer_failure() {
        let cfg = testing::config();
        let backend = MemoryBackend::failing();
        let src = testing::temp_file_with(".txt", b"data");

        let err = Upload::new(&cfg, &backend, &src, "mybucket".into(), "key".into())
            .run()
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Transfer failed; Failed to upload to s3:mybucket:key; access denied"
        );
    }

    #[test]
    fn keys() {
        let path = Path::new("/tmp/backup.tar.gz");

        #[rustfmt::skip]
        let params = vec![
            ("/a/b.txt", "/a/b.txt"),
            ("/a/", "/a/backup.tar.gz"),
            ("/", "/backup.tar.gz"),
            ("folder", "folder"),
        ];

        for (key, expected) in params {
            assert_eq!(object_key(path, key.to_string()).unwrap(), expected);
        }
    }
}
