use std::cmp;
use std::error::Error as StdError;
use std::fmt::{self, Debug};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::unix::fs::FileExt;

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, warn};
use rusoto_core::Region;
use rusoto_s3::{self as s3_api, S3Client, S3 as S3Api};
use tokio::runtime::{Builder, Runtime};

use crate::errors::ResultExt;
use crate::storage::{Backend, DownloadRequest, UploadOutput, UploadRequest};
use crate::{Config, Error};

const CHUNK_SIZE: u64 = 1024 * 1024 * 10; // 10mb
const MAX_PARTS: u64 = 10_000;
const CONCURRENCY: usize = 10;

type Cause = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Part {
    number: i64,
    offset: u64,
    len: u64,
}

pub struct S3 {
    client: S3Client,
    region: Region,
    runtime: Runtime,
}

impl S3 {
    pub fn new(cfg: &Config) -> Result<Self, Error> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .transfer_err("Unable to start the I/O runtime")?;

        let client = {
            let _guard = runtime.enter();
            S3Client::new(cfg.region.clone())
        };

        Ok(S3 {
            client,
            region: cfg.region.clone(),
            runtime,
        })
    }

    fn put_object(&self, req: UploadRequest<'_>, src: &File) -> Result<UploadOutput, Error> {
        let message = format!("Failed to upload to {}", req);

        let mut body = Vec::with_capacity(req.len as usize);
        src.take(req.len)
            .read_to_end(&mut body)
            .transfer_err(message.as_str())?;

        let put_object = s3_api::PutObjectRequest {
            bucket: req.bucket.to_string(),
            key: req.key.to_string(),
            content_length: Some(body.len() as i64),
            body: Some(body.into()),
            storage_class: req.storage_class.map(String::from),
            ..Default::default()
        };

        self.runtime
            .block_on(self.client.put_object(put_object))
            .transfer_err(message)?;

        Ok(UploadOutput {
            location: object_url(&self.region, req.bucket, req.key),
            len: req.len,
        })
    }

    fn multipart_upload(&self, req: UploadRequest<'_>, src: &File) -> Result<UploadOutput, Error> {
        let message = format!("Failed to upload to {}", req);

        let upload = s3_api::CreateMultipartUploadRequest {
            bucket: req.bucket.to_string(),
            key: req.key.to_string(),
            storage_class: req.storage_class.map(String::from),
            ..Default::default()
        };

        self.runtime.block_on(async {
            let upload = self
                .client
                .create_multipart_upload(upload)
                .await
                .transfer_err(message.as_str())?;

            let upload_id = match upload.upload_id {
                Some(val) => val,
                None => return Error::transfer_err(message, "upload id cannot be empty"),
            };

            debug!("Started multipart upload {}", upload_id);

            let parts = match self.upload_parts(req, &upload_id, src).await {
                Ok(parts) => parts,
                Err(err) => {
                    self.abort(req, upload_id).await;
                    return Error::transfer_err(message, err);
                }
            };

            let complete = s3_api::CompleteMultipartUploadRequest {
                bucket: req.bucket.to_string(),
                key: req.key.to_string(),
                upload_id: upload_id.clone(),
                multipart_upload: Some(s3_api::CompletedMultipartUpload { parts: Some(parts) }),
                ..Default::default()
            };

            let complete = match self.client.complete_multipart_upload(complete).await {
                Ok(val) => val,
                Err(err) => {
                    self.abort(req, upload_id).await;
                    return Error::transfer_err(message, err);
                }
            };

            let location = complete
                .location
                .unwrap_or_else(|| object_url(&self.region, req.bucket, req.key));

            Ok::<_, Error>(UploadOutput {
                location,
                len: req.len,
            })
        })
    }

    // Each part is read when it is about to be sent, at most CONCURRENCY parts are held in memory.
    async fn upload_parts(
        &self,
        req: UploadRequest<'_>,
        upload_id: &str,
        src: &File,
    ) -> Result<Vec<s3_api::CompletedPart>, Cause> {
        let parts = parts(req.len).map(|part| async move {
            let body = read_part(src, &part)?;
            let upload = s3_api::UploadPartRequest {
                body: Some(body.into()),
                bucket: req.bucket.to_string(),
                key: req.key.to_string(),
                upload_id: upload_id.to_string(),
                part_number: part.number,
                content_length: Some(part.len as i64),
                ..Default::default()
            };

            let res = self.client.upload_part(upload).await?;

            Ok::<_, Cause>(s3_api::CompletedPart {
                e_tag: res.e_tag,
                part_number: Some(part.number),
            })
        });

        stream::iter(parts)
            .buffered(CONCURRENCY)
            .try_collect()
            .await
    }

    async fn abort(&self, req: UploadRequest<'_>, upload_id: String) {
        let abort = s3_api::AbortMultipartUploadRequest {
            bucket: req.bucket.to_string(),
            key: req.key.to_string(),
            upload_id,
            ..Default::default()
        };

        if let Err(err) = self.client.abort_multipart_upload(abort).await {
            warn!("Unable to abort multipart upload to {}; {}", req, err);
        }
    }
}

impl Backend for S3 {
    fn download(&self, req: DownloadRequest<'_>, dst: &mut dyn Write) -> Result<u64, Error> {
        let message = format!("Failed to download {}", req);

        let get_object = s3_api::GetObjectRequest {
            bucket: req.bucket.to_string(),
            key: req.key.to_string(),
            ..Default::default()
        };

        self.runtime.block_on(async {
            let resp = self
                .client
                .get_object(get_object)
                .await
                .transfer_err(message.as_str())?;

            let mut body = match resp.body {
                Some(body) => body,
                None => return Ok(0),
            };

            let mut len = 0_u64;
            while let Some(chunk) = body.next().await {
                let chunk = chunk.transfer_err(message.as_str())?;
                dst.write_all(&chunk).transfer_err(message.as_str())?;
                len += chunk.len() as u64;
            }

            dst.flush().transfer_err(message)?;
            Ok::<_, Error>(len)
        })
    }

    fn upload(&self, req: UploadRequest<'_>, src: &File) -> Result<UploadOutput, Error> {
        if req.len < CHUNK_SIZE {
            self.put_object(req, src)
        } else {
            self.multipart_upload(req, src)
        }
    }
}

impl Debug for S3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("S3").field("region", &self.region).finish()
    }
}

// Parts grow past CHUNK_SIZE when the file would not fit into MAX_PARTS of them.
fn part_size(len: u64) -> u64 {
    let size = (len + MAX_PARTS - 1) / MAX_PARTS;
    cmp::max(CHUNK_SIZE, size)
}

fn parts(len: u64) -> impl Iterator<Item = Part> {
    let size = part_size(len);
    let count = (len + size - 1) / size;

    (0..count).map(move |idx| {
        let offset = idx * size;
        Part {
            number: (idx + 1) as i64,
            offset,
            len: cmp::min(size, len - offset),
        }
    })
}

// A file truncated after its length was taken fails here with UnexpectedEof.
fn read_part(src: &File, part: &Part) -> io::Result<Vec<u8>> {
    let mut buf = vec![0; part.len as usize];
    src.read_exact_at(&mut buf, part.offset)?;
    Ok(buf)
}

fn object_url(region: &Region, bucket: &str, key: &str) -> String {
    let key = key.trim_start_matches('/');

    match region {
        Region::Custom { endpoint, .. } => {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
        }
        region => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region.name(), key),
    }
}
