// MinIO Rust Library for Amazon S3 Compatible Cloud Storage
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The [`Object`] handle: every operation on one `(bucket, key)` pair.

use crate::s3::builders::GetObject;
use crate::s3::client::{Client, MAX_MULTIPART_COUNT, MAX_PART_SIZE, MIN_PART_SIZE};
use crate::s3::error::{Error, IoError, ValidationErr};
use crate::s3::file_reader::ChunkedFileReader;
use crate::s3::multimap_ext::Multimap;
use crate::s3::multipart::{InitiateOptions, MultipartUpload, PartOptions};
use crate::s3::object_content::{FileSink, ObjectContent};
use crate::s3::response::{
    AbortMultipartUploadResponse, CompleteMultipartUploadResponse, DeleteObjectResponse,
    GetObjectResponse, HeadObjectResponse, PutObjectResponse, RestoreObjectResponse, UploadPartResponse,
    available_from_metadata,
};
use crate::s3::response_traits::{HasEtagFromBody, HasEtagFromHeaders, HasS3Fields};
use crate::s3::types::{ObjectMetadata, RestoreTier, S3Api};
use crate::s3::utils::{
    UtcTime, check_bucket_name, check_object_name, digest, is_multipart_etag, md5_hex_to_b64,
    utc_now,
};
use bytes::Bytes;
use http::Method;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Handle to a single object.
///
/// Identity is fixed at construction. The handle owns the object's
/// [`ObjectMetadata`]: it is sent on every write and refreshed from the
/// response of every read.
///
/// ```no_run
/// use s3object::s3::{Client, Object};
/// use s3object::s3::types::{ObjectMetadata, StorageClass};
///
/// #[tokio::main]
/// async fn main() {
///     let client = Client::try_from("http://localhost:9000").unwrap();
///     let metadata = ObjectMetadata::builder()
///         .content_type("text/plain")
///         .storage_class(StorageClass::StandardIa)
///         .build();
///     let mut object = Object::new(&client, "my-bucket", "notes.txt")
///         .unwrap()
///         .with_metadata(metadata);
///     object.put("remember the milk").await.unwrap();
///     assert!(object.exists().await.unwrap());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Object {
    client: Client,
    bucket: String,
    key: String,
    metadata: ObjectMetadata,
}

impl Object {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        client: &Client,
        bucket: S1,
        key: S2,
    ) -> Result<Self, ValidationErr> {
        let bucket = bucket.into();
        let key = key.into();
        check_bucket_name(&bucket)?;
        check_object_name(&key)?;
        Ok(Self {
            client: client.clone(),
            bucket,
            key,
            metadata: ObjectMetadata::default(),
        })
    }

    pub fn with_metadata(mut self, metadata: ObjectMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    // region: read

    /// Whether the object exists. A failed probe answers `false`; only
    /// transport and validation failures are errors.
    pub async fn exists(&self) -> Result<bool, Error> {
        match self.head_request().await {
            Ok(_) => Ok(true),
            Err(Error::Request(resp)) => {
                log::debug!(
                    "{}/{} probed absent (status {})",
                    self.bucket,
                    self.key,
                    resp.status
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Downloads the whole object and checks it against its etag.
    pub async fn get(&mut self) -> Result<Bytes, Error> {
        let resp = self.get_verified().await?;
        Ok(resp.into_content())
    }

    /// Downloads the object and decodes it as text using the charset from
    /// `Content-Type` (UTF-8 when none is given). The integrity check runs on
    /// the raw bytes. A `Content-Encoding` such as gzip is not undone.
    pub async fn get_decoded(&mut self) -> Result<String, Error> {
        let resp = self.get_verified().await?;
        if let Some(encoding) = resp.content_encoding() {
            log::debug!(
                "{}/{} has content encoding {encoding}; returning it undecoded",
                self.bucket,
                self.key
            );
        }
        let charset = resp.charset();
        decode_charset(resp.content(), charset.as_deref())
    }

    /// Streams the object through `callback`, one chunk at a time. No
    /// integrity check is made on this path.
    pub async fn get_to_callback<F>(&mut self, mut callback: F) -> Result<(), Error>
    where
        F: FnMut(Bytes) -> Result<(), Error> + Send,
    {
        let resp = self.get_request().send_to_sink(&mut callback).await?;
        self.metadata.refresh_from_headers(resp.headers());
        Ok(())
    }

    /// Streams the object into the file at `path`, then checks the file
    /// against the etag. A failed request leaves an existing file untouched;
    /// a corrupted download is left in place.
    pub async fn get_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<u64, Error> {
        let path = path.as_ref();
        let mut sink = FileSink::new(path);
        let resp = match self.get_request().send_to_sink(&mut sink).await {
            Ok(resp) => resp,
            Err(e) => {
                sink.discard().await;
                return Err(e);
            }
        };
        let written = sink.finish().await?;

        let expected = self.expected_etag(resp.etag());
        self.metadata.refresh_from_headers(resp.headers());
        if let Some(expected) = expected.filter(|e| self.should_verify(e)) {
            let actual = self.client.file_digest().digest_file(path).await?;
            check_digest(&expected, actual)?;
        }
        Ok(written)
    }

    /// Metadata of the object, keyed by canonical field name (see
    /// [`canonical_metadata_name`](crate::s3::response::canonical_metadata_name)).
    pub async fn head(&mut self) -> Result<BTreeMap<String, String>, Error> {
        let resp = self.head_request().await?;
        self.metadata.refresh_from_headers(resp.headers());
        Ok(resp.metadata_map())
    }

    /// Whether the object can be read now. Archived objects are available
    /// only after a restore has finished.
    pub async fn available(&mut self) -> Result<bool, Error> {
        let metadata = self.head().await?;
        Ok(available_from_metadata(&metadata))
    }

    fn get_request(&self) -> GetObject {
        self.client
            .get_object(&self.bucket, &self.key)
            .sse(self.metadata.sse().cloned())
            .build()
    }

    async fn head_request(&self) -> Result<HeadObjectResponse, Error> {
        self.client
            .head_object(&self.bucket, &self.key)
            .sse(self.metadata.sse().cloned())
            .build()
            .send()
            .await
    }

    async fn get_verified(&mut self) -> Result<GetObjectResponse, Error> {
        let resp = self.get_request().send().await?;
        let expected = self.expected_etag(resp.etag());
        self.metadata.refresh_from_headers(resp.headers());
        if let Some(expected) = expected.filter(|e| self.should_verify(e)) {
            check_digest(&expected, digest(resp.content()).0)?;
        }
        Ok(resp)
    }

    /// The etag the service returned, falling back to the one already known.
    fn expected_etag(&self, returned: Option<String>) -> Option<String> {
        returned.or_else(|| self.metadata.etag().map(str::to_string))
    }

    fn should_verify(&self, etag: &str) -> bool {
        if is_multipart_etag(etag) {
            log::warn!(
                "skipping integrity check of {}/{}: etag {etag} comes from a multipart upload",
                self.bucket,
                self.key
            );
            return false;
        }
        true
    }

    // endregion: read

    // region: write

    /// Uploads `content` in a single request with its `Content-MD5`.
    pub async fn put<C: Into<Bytes>>(&mut self, content: C) -> Result<PutObjectResponse, Error> {
        let content: Bytes = content.into();
        let (hex, b64) = digest(&content);
        let size = content.len() as u64;

        let resp = self
            .client
            .put_object(&self.bucket, &self.key)
            .metadata(self.metadata.clone())
            .content(ObjectContent::Bytes(content))
            .content_md5(b64)
            .build()
            .send()
            .await?;

        self.metadata.set_observed_etag(resp.etag().or(Some(hex)));
        self.metadata.set_observed_size(Some(size));
        Ok(resp)
    }

    /// Uploads the file at `path` in a single request, streaming it in
    /// blocks. An etag given through the metadata builder is trusted and the
    /// file is not hashed; a given size likewise replaces the file's size.
    /// Values reported by earlier responses are never reused here.
    pub async fn put_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<PutObjectResponse, Error> {
        let path = path.as_ref();
        let file_size = regular_file_size(path).await?;
        let size = self.metadata.known_size().unwrap_or(file_size);

        let etag = match self.metadata.known_etag() {
            Some(etag) => etag.to_string(),
            None => self.client.file_digest().digest_file(path).await?,
        };
        let content_md5 =
            md5_hex_to_b64(&etag).ok_or_else(|| ValidationErr::InvalidEtag(etag.clone()))?;

        let resp = self
            .client
            .put_object(&self.bucket, &self.key)
            .metadata(self.metadata.clone())
            .content(ChunkedFileReader::new(path))
            .content_length(size)
            .content_md5(content_md5)
            .build()
            .send()
            .await?;

        self.metadata.set_observed_etag(resp.etag().or(Some(etag)));
        self.metadata.set_observed_size(Some(size));
        Ok(resp)
    }

    /// Deletes the object. Whether deleting a missing key succeeds is up to
    /// the service.
    pub async fn delete(&self) -> Result<DeleteObjectResponse, Error> {
        self.client
            .delete_object(&self.bucket, &self.key)
            .build()
            .send()
            .await
    }

    /// Requests a temporary copy of an archived object for `days` days.
    /// Completion is not awaited; poll [`available`](Self::available).
    pub async fn restore(
        &self,
        days: u32,
        tier: RestoreTier,
    ) -> Result<RestoreObjectResponse, Error> {
        log::debug!(
            "requesting {tier} restore of {}/{} for {days} days",
            self.bucket,
            self.key
        );
        self.client
            .restore_object(&self.bucket, &self.key)
            .days(days)
            .tier(tier)
            .build()
            .send()
            .await
    }

    // endregion: write

    // region: uri

    /// Unsigned URI of the object.
    pub fn uri(&self) -> String {
        self.client.object_url(&self.bucket, &self.key)
    }

    /// URI carrying a signed query string valid until `expires`, or until the
    /// metadata's `expires` when none is given.
    pub fn query_string_authentication_uri(
        &self,
        expires: Option<UtcTime>,
        extra_params: Option<Multimap>,
    ) -> Result<String, Error> {
        let expires = expires
            .or(self.metadata.expires())
            .ok_or(ValidationErr::MissingExpiry)?;
        let seconds = (expires - utc_now()).num_seconds().max(1);
        let seconds = u32::try_from(seconds).unwrap_or(u32::MAX);
        self.client.presigned_url(
            &Method::GET,
            &self.bucket,
            &self.key,
            &extra_params.unwrap_or_default(),
            seconds,
        )
    }

    // endregion: uri

    // region: multipart

    /// A not yet started multipart upload of this object, carrying its metadata.
    pub fn multipart_upload(&self) -> MultipartUpload {
        MultipartUpload::new(
            &self.client,
            &self.bucket,
            &self.key,
            self.metadata.clone(),
        )
    }

    /// Starts a multipart upload and returns its upload ID.
    pub async fn initiate_multipart_upload(
        &self,
        options: InitiateOptions,
    ) -> Result<String, Error> {
        self.multipart_upload().initiate(options).await
    }

    /// Uploads one part under `upload_id`.
    pub async fn put_part<C: Into<Bytes>>(
        &self,
        upload_id: &str,
        part_number: u16,
        content: C,
        options: PartOptions,
    ) -> Result<UploadPartResponse, Error> {
        MultipartUpload::resume(&self.client, &self.bucket, &self.key, upload_id)
            .put_part(part_number, content, options)
            .await
    }

    /// Completes `upload_id` with part numbers and etags matched by position.
    pub async fn complete_multipart_upload(
        &mut self,
        upload_id: &str,
        part_numbers: Vec<u16>,
        etags: Vec<String>,
    ) -> Result<CompleteMultipartUploadResponse, Error> {
        let resp = MultipartUpload::resume(&self.client, &self.bucket, &self.key, upload_id)
            .complete_with(part_numbers, etags)
            .await?;
        self.metadata.set_observed_etag(resp.etag().ok());
        self.metadata.set_observed_size(None);
        Ok(resp)
    }

    pub async fn abort_multipart_upload(
        &self,
        upload_id: &str,
    ) -> Result<AbortMultipartUploadResponse, Error> {
        MultipartUpload::resume(&self.client, &self.bucket, &self.key, upload_id)
            .abort()
            .await
    }

    /// Uploads the file at `path` as a multipart upload of `part_size` byte
    /// parts (by default the smallest size that fits in 10000 parts, at least
    /// 5 MiB). When any step after initiation fails the upload is aborted and
    /// the original error returned.
    pub async fn put_multipart_from_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        part_size: Option<u64>,
    ) -> Result<CompleteMultipartUploadResponse, Error> {
        let path = path.as_ref();
        let size = regular_file_size(path).await?;
        let part_size = match part_size {
            Some(part_size) => part_size,
            None => MIN_PART_SIZE.max(size.div_ceil(MAX_MULTIPART_COUNT as u64)),
        };
        if part_size < MIN_PART_SIZE {
            return Err(ValidationErr::InvalidMinPartSize(part_size).into());
        }
        if part_size > MAX_PART_SIZE {
            return Err(ValidationErr::InvalidMaxPartSize(part_size).into());
        }
        let part_count = size.div_ceil(part_size).max(1);
        if part_count > MAX_MULTIPART_COUNT as u64 {
            return Err(ValidationErr::TooManyParts {
                object_size: size,
                part_size,
                max: MAX_MULTIPART_COUNT,
            }
            .into());
        }

        let part_options = PartOptions {
            extra_headers: self
                .metadata
                .sse()
                .map(|sse| sse.read_headers())
                .filter(|h| !h.is_empty()),
            ..Default::default()
        };

        let mut upload = self.multipart_upload();
        upload.initiate(InitiateOptions::default()).await?;

        let result =
            upload_file_parts(&mut upload, path, part_count as u16, part_size, part_options).await;
        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                if let Err(abort_err) = upload.abort().await {
                    log::warn!(
                        "failed to abort multipart upload of {}/{}: {abort_err}",
                        self.bucket,
                        self.key
                    );
                }
                return Err(e);
            }
        };

        self.metadata.set_observed_etag(resp.etag().ok());
        self.metadata.set_observed_size(Some(size));
        Ok(resp)
    }

    // endregion: multipart
}

async fn upload_file_parts(
    upload: &mut MultipartUpload,
    path: &Path,
    part_count: u16,
    part_size: u64,
    options: PartOptions,
) -> Result<CompleteMultipartUploadResponse, Error> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| IoError::new(path, e))?;
    for part_number in 1..=part_count {
        let mut buf = Vec::new();
        (&mut file)
            .take(part_size)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| IoError::new(path, e))?;
        upload.put_part(part_number, buf, options.clone()).await?;
    }
    upload.complete().await
}

/// Size of the regular file at `path`. A missing path or a non-regular file
/// is a caller error.
async fn regular_file_size(path: &Path) -> Result<u64, Error> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ValidationErr::MissingFile(path.to_path_buf()).into());
        }
        Err(e) => return Err(IoError::new(path, e).into()),
    };
    if !meta.is_file() {
        return Err(ValidationErr::MissingFile(path.to_path_buf()).into());
    }
    Ok(meta.len())
}

fn check_digest(expected: &str, actual: String) -> Result<(), Error> {
    if expected.eq_ignore_ascii_case(&actual) {
        return Ok(());
    }
    log::warn!("checksum mismatch: expected etag {expected}, computed {actual}");
    Err(Error::CorruptedDownload {
        expected: expected.to_string(),
        actual,
    })
}

fn decode_charset(content: &[u8], charset: Option<&str>) -> Result<String, Error> {
    match charset.unwrap_or("utf-8") {
        "utf-8" | "utf8" | "us-ascii" => String::from_utf8(content.to_vec())
            .map_err(|e| Error::Protocol(format!("content is not valid UTF-8: {e}"))),
        "iso-8859-1" | "latin1" | "latin-1" => Ok(content.iter().map(|&b| b as char).collect()),
        other => Err(ValidationErr::UnsupportedCharset(other.to_string()).into()),
    }
}
