use std::fmt::{self, Debug, Display};
use std::fs::File;
use std::io::Write;

mod s3;

pub use self::s3::S3;
use crate::Error;

pub const REDUCED_REDUNDANCY: &str = "REDUCED_REDUNDANCY";

#[derive(Debug, Clone, Copy)]
pub struct DownloadRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub len: u64,
    pub storage_class: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutput {
    pub location: String,
    pub len: u64,
}

/// Moves object bytes between an open local file and a bucket.
pub trait Backend: Debug {
    /// Streams the object into `dst`, returns the number of bytes written.
    fn download(&self, req: DownloadRequest<'_>, dst: &mut dyn Write) -> Result<u64, Error>;

    /// Streams `req.len` bytes of `src` into the object.
    fn upload(&self, req: UploadRequest<'_>, src: &File) -> Result<UploadOutput, Error>;
}

impl<'a> Display for DownloadRequest<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "s3:{}:{}", self.bucket, self.key)
    }
}

impl<'a> Display for UploadRequest<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "s3:{}:{}", self.bucket, self.key)
    }
}
