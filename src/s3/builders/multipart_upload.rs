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

//! Builders for the multipart upload control plane and part uploads

use crate::s3::builders::object_headers::{check_sse, metadata_headers};
use crate::s3::client::{Client, MAX_MULTIPART_COUNT};
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::{CONTENT_LENGTH, CONTENT_MD5, CONTENT_TYPE};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::object_content::ObjectContent;
use crate::s3::response::{
    AbortMultipartUploadResponse, CompleteMultipartUploadResponse,
    CreateMultipartUploadResponse, UploadPartResponse,
};
use crate::s3::types::{ObjectMetadata, S3Api, S3Request, ToS3Request};
use crate::s3::utils::{check_bucket_name, check_object_name, md5sum_hash, trim_quotes};
use bytes::{Bytes, BytesMut};
use http::Method;
use typed_builder::TypedBuilder;

fn check_upload_id(upload_id: &str) -> Result<(), ValidationErr> {
    if upload_id.trim().is_empty() {
        return Err(ValidationErr::InvalidUploadId);
    }
    Ok(())
}

fn upload_id_query(upload_id: String) -> Multimap {
    let mut query_params = Multimap::new();
    query_params.add("uploadId", upload_id);
    query_params
}

// region: create-multipart-upload

/// Argument builder for the [`CreateMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CreateMultipartUpload.html) S3 API operation.
///
/// The object's metadata headers are sent here, not with the parts.
#[derive(Clone, Debug, TypedBuilder)]
pub struct CreateMultipartUpload {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(default)]
    metadata: ObjectMetadata,
}

pub type CreateMultipartUploadBldr =
    CreateMultipartUploadBuilder<((Client,), (), (String,), (String,), ())>;

impl S3Api for CreateMultipartUpload {
    type S3Response = CreateMultipartUploadResponse;
}

impl ToS3Request for CreateMultipartUpload {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        check_sse(self.metadata.sse().map(|s| s.as_ref()), &self.client)?;
        let mut headers = self.extra_headers.unwrap_or_default();
        headers.add_multimap(metadata_headers(&self.metadata));

        let mut query_params = Multimap::new();
        query_params.add("uploads", "");

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::POST)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .headers(headers)
            .build())
    }
}

// endregion: create-multipart-upload

// region: upload-part

/// Argument builder for the [`UploadPart`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_UploadPart.html) S3 API operation.
///
/// `Content-Length` is taken from the content. Part numbers are not checked
/// for gaps or duplicates; the caller owns the numbering.
#[derive(Clone, Debug, TypedBuilder)]
pub struct UploadPart {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(setter(into))] // force required + accept Into<String>
    upload_id: String,
    #[builder(!default)] // force required
    part_number: u16,
    #[builder(setter(into))] // force required + accept Into<Bytes>
    content: Bytes,
    /// Send a `Content-MD5` header so the service rejects a corrupted part.
    #[builder(default = true)]
    send_content_md5: bool,
}

pub type UploadPartBldr =
    UploadPartBuilder<((Client,), (), (String,), (String,), (String,), (u16,), (), ())>;

impl S3Api for UploadPart {
    type S3Response = UploadPartResponse;
}

impl ToS3Request for UploadPart {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;
        if self.part_number < 1 || self.part_number > MAX_MULTIPART_COUNT {
            return Err(ValidationErr::InvalidPartNumber(self.part_number));
        }

        let mut headers = self.extra_headers.unwrap_or_default();
        headers.add(CONTENT_LENGTH, self.content.len().to_string());
        if self.send_content_md5 {
            headers.add(CONTENT_MD5, md5sum_hash(&self.content));
        }

        let mut query_params = upload_id_query(self.upload_id);
        query_params.add("partNumber", self.part_number.to_string());

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::PUT)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .headers(headers)
            .body(ObjectContent::Bytes(self.content))
            .build())
    }
}

// endregion: upload-part

// region: complete-multipart-upload

/// Argument builder for the [`CompleteMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_CompleteMultipartUpload.html) S3 API operation.
///
/// `part_numbers` and `etags` are matched by position. Lists of different
/// lengths are rejected before any request is made.
#[derive(Clone, Debug, TypedBuilder)]
pub struct CompleteMultipartUpload {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(setter(into))] // force required + accept Into<String>
    upload_id: String,
    #[builder(!default)] // force required
    part_numbers: Vec<u16>,
    #[builder(!default)] // force required
    etags: Vec<String>,
}

pub type CompleteMultipartUploadBldr =
    CompleteMultipartUploadBuilder<((Client,), (), (String,), (String,), (String,), (), ())>;

impl S3Api for CompleteMultipartUpload {
    type S3Response = CompleteMultipartUploadResponse;
}

fn complete_request_body(part_numbers: &[u16], etags: &[String]) -> Bytes {
    // Set capacity of the byte-buffer based on the part count - attempting
    // to avoid extra allocations when building the XML payload.
    let mut data = BytesMut::with_capacity(100 * part_numbers.len() + 100);
    data.extend_from_slice(b"<CompleteMultipartUpload>");
    for (number, etag) in part_numbers.iter().zip(etags) {
        data.extend_from_slice(b"<Part><PartNumber>");
        data.extend_from_slice(number.to_string().as_bytes());
        data.extend_from_slice(b"</PartNumber><ETag>\"");
        data.extend_from_slice(trim_quotes(etag).as_bytes());
        data.extend_from_slice(b"\"</ETag></Part>");
    }
    data.extend_from_slice(b"</CompleteMultipartUpload>");
    data.freeze()
}

impl ToS3Request for CompleteMultipartUpload {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;
        if self.part_numbers.len() != self.etags.len() {
            return Err(ValidationErr::PartListMismatch {
                parts: self.part_numbers.len(),
                etags: self.etags.len(),
            });
        }
        if self.part_numbers.is_empty() {
            return Err(ValidationErr::EmptyParts);
        }

        let body = complete_request_body(&self.part_numbers, &self.etags);
        let mut headers = self.extra_headers.unwrap_or_default();
        headers.add(CONTENT_TYPE, "application/xml");
        headers.add(CONTENT_LENGTH, body.len().to_string());
        headers.add(CONTENT_MD5, md5sum_hash(&body));

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::POST)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(upload_id_query(self.upload_id))
            .headers(headers)
            .body(ObjectContent::Bytes(body))
            .build())
    }
}

// endregion: complete-multipart-upload

// region: abort-multipart-upload

/// Argument builder for the [`AbortMultipartUpload`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_AbortMultipartUpload.html) S3 API operation.
///
/// Aborting an upload that is already completed or aborted surfaces the
/// service's error as is.
#[derive(Clone, Debug, TypedBuilder)]
pub struct AbortMultipartUpload {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(setter(into))] // force required + accept Into<String>
    upload_id: String,
}

pub type AbortMultipartUploadBldr =
    AbortMultipartUploadBuilder<((Client,), (), (String,), (String,), (String,))>;

impl S3Api for AbortMultipartUpload {
    type S3Response = AbortMultipartUploadResponse;
}

impl ToS3Request for AbortMultipartUpload {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;
        check_upload_id(&self.upload_id)?;

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::DELETE)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(upload_id_query(self.upload_id))
            .headers(self.extra_headers.unwrap_or_default())
            .build())
    }
}

// endregion: abort-multipart-upload
