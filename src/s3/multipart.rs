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

//! Multipart upload coordinator.
//!
//! A [`MultipartUpload`] walks one upload session through
//! `NotStarted -> Initiated -> PartUploading -> Completed | Aborted`, keeping
//! the `(part number, etag)` pairs needed to complete it. Parts are sent one
//! at a time and never retried here.
//!
//! An upload that is neither completed nor aborted leaves parts behind that
//! the service keeps (and bills) until they are aborted. Cleaning those up is
//! the caller's job.

use crate::s3::client::Client;
use crate::s3::error::{Error, ValidationErr};
use crate::s3::multimap_ext::Multimap;
use crate::s3::response::{
    AbortMultipartUploadResponse, CompleteMultipartUploadResponse, UploadPartResponse,
};
use crate::s3::response_traits::HasEtagFromHeaders;
use crate::s3::types::{ObjectMetadata, Part, S3Api};
use bytes::Bytes;
use std::fmt;

/// Lifecycle of a [`MultipartUpload`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MultipartState {
    #[default]
    NotStarted,
    Initiated,
    PartUploading,
    Completed,
    Aborted,
}

impl MultipartState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultipartState::NotStarted => "not started",
            MultipartState::Initiated => "initiated",
            MultipartState::PartUploading => "uploading parts",
            MultipartState::Completed => "completed",
            MultipartState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for MultipartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional parameters of [`MultipartUpload::initiate`]. The object's
/// [`ObjectMetadata`] headers are always sent.
#[derive(Clone, Debug, Default)]
pub struct InitiateOptions {
    /// Headers added to the initiate request as they are.
    pub extra_headers: Option<Multimap>,
}

/// Optional parameters of [`MultipartUpload::put_part`].
#[derive(Clone, Debug)]
pub struct PartOptions {
    /// Send `Content-MD5` with the part (default `true`).
    pub send_content_md5: bool,
    /// Headers added to the part request as they are, e.g. SSE-C key headers.
    pub extra_headers: Option<Multimap>,
}

impl Default for PartOptions {
    fn default() -> Self {
        Self {
            send_content_md5: true,
            extra_headers: None,
        }
    }
}

/// One multipart upload session of a single object.
#[derive(Clone, Debug)]
pub struct MultipartUpload {
    client: Client,
    bucket: String,
    object: String,
    metadata: ObjectMetadata,
    upload_id: Option<String>,
    state: MultipartState,
    parts: Vec<Part>,
}

impl MultipartUpload {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        client: &Client,
        bucket: S1,
        object: S2,
        metadata: ObjectMetadata,
    ) -> Self {
        Self {
            client: client.clone(),
            bucket: bucket.into(),
            object: object.into(),
            metadata,
            upload_id: None,
            state: MultipartState::NotStarted,
            parts: Vec::new(),
        }
    }

    /// Picks up an upload started elsewhere. Parts already uploaded under
    /// `upload_id` are unknown to this instance.
    pub fn resume<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        client: &Client,
        bucket: S1,
        object: S2,
        upload_id: S3,
    ) -> Self {
        let mut upload = Self::new(client, bucket, object, ObjectMetadata::default());
        upload.upload_id = Some(upload_id.into());
        upload.state = MultipartState::Initiated;
        upload
    }

    pub fn state(&self) -> MultipartState {
        self.state
    }

    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    /// Parts uploaded so far, in upload order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    fn require(
        &self,
        allowed: &[MultipartState],
        operation: &'static str,
    ) -> Result<String, ValidationErr> {
        match &self.upload_id {
            Some(id) if allowed.contains(&self.state) => Ok(id.clone()),
            _ => Err(ValidationErr::InvalidMultipartState {
                state: self.state.as_str(),
                operation,
            }),
        }
    }

    /// Starts the upload and returns the upload ID handed out by the service.
    pub async fn initiate(&mut self, options: InitiateOptions) -> Result<String, Error> {
        if self.state != MultipartState::NotStarted {
            return Err(ValidationErr::InvalidMultipartState {
                state: self.state.as_str(),
                operation: "initiate",
            }
            .into());
        }

        let resp = self
            .client
            .create_multipart_upload(&self.bucket, &self.object)
            .metadata(self.metadata.clone())
            .extra_headers(options.extra_headers)
            .build()
            .send()
            .await?;
        let upload_id = resp.upload_id()?;

        log::debug!(
            "initiated multipart upload {upload_id} for {}/{}",
            self.bucket,
            self.object
        );
        self.upload_id = Some(upload_id.clone());
        self.state = MultipartState::Initiated;
        Ok(upload_id)
    }

    /// Uploads one part. On success the part's etag is recorded for
    /// [`complete`](Self::complete); on failure nothing is recorded and the
    /// caller may send the same part number again.
    pub async fn put_part(
        &mut self,
        part_number: u16,
        content: impl Into<Bytes>,
        options: PartOptions,
    ) -> Result<UploadPartResponse, Error> {
        let upload_id = self.require(
            &[MultipartState::Initiated, MultipartState::PartUploading],
            "upload a part",
        )?;

        let resp = self
            .client
            .upload_part(&self.bucket, &self.object, upload_id, part_number)
            .content(content)
            .send_content_md5(options.send_content_md5)
            .extra_headers(options.extra_headers)
            .build()
            .send()
            .await?;
        let etag = resp
            .etag()
            .ok_or_else(|| Error::Protocol(format!("part {part_number} response has no ETag")))?;

        log::debug!(
            "uploaded part {part_number} of {}/{} (etag {etag})",
            self.bucket,
            self.object
        );
        self.parts.push(Part {
            number: part_number,
            etag,
        });
        self.state = MultipartState::PartUploading;
        Ok(resp)
    }

    /// Completes the upload with the recorded parts, in upload order.
    pub async fn complete(&mut self) -> Result<CompleteMultipartUploadResponse, Error> {
        let (part_numbers, etags) = self
            .parts
            .iter()
            .map(|p| (p.number, p.etag.clone()))
            .unzip();
        self.complete_with(part_numbers, etags).await
    }

    /// Completes the upload with explicit lists, matched by position.
    pub async fn complete_with(
        &mut self,
        part_numbers: Vec<u16>,
        etags: Vec<String>,
    ) -> Result<CompleteMultipartUploadResponse, Error> {
        let upload_id = self.require(
            &[MultipartState::Initiated, MultipartState::PartUploading],
            "complete",
        )?;
        let count = part_numbers.len();

        let resp = self
            .client
            .complete_multipart_upload(&self.bucket, &self.object, upload_id)
            .part_numbers(part_numbers)
            .etags(etags)
            .build()
            .send()
            .await?;

        log::debug!(
            "completed multipart upload of {}/{} with {} parts",
            self.bucket,
            self.object,
            count
        );
        self.state = MultipartState::Completed;
        self.parts.clear();
        Ok(resp)
    }

    /// Aborts the upload. Allowed in any state once an upload ID is known;
    /// aborting a finished upload returns whatever error the service reports.
    pub async fn abort(&mut self) -> Result<AbortMultipartUploadResponse, Error> {
        let upload_id = self.require(
            &[
                MultipartState::Initiated,
                MultipartState::PartUploading,
                MultipartState::Completed,
                MultipartState::Aborted,
            ],
            "abort",
        )?;

        let resp = self
            .client
            .abort_multipart_upload(&self.bucket, &self.object, upload_id.as_str())
            .build()
            .send()
            .await?;

        log::debug!(
            "aborted multipart upload {upload_id} of {}/{}",
            self.bucket,
            self.object
        );
        self.state = MultipartState::Aborted;
        self.parts.clear();
        Ok(resp)
    }
}
