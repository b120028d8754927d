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

use crate::s3::error::{Error, S3ErrorResponse};
use crate::s3::http::HttpResponse;
use crate::s3::response_traits::{
    HasBucket, HasEtagFromBody, HasEtagFromHeaders, HasObject, HasS3Fields,
};
use crate::s3::types::{FromS3Response, S3Request};
use crate::{impl_from_s3response, impl_has_s3fields};
use async_trait::async_trait;
use bytes::{Buf, Bytes};
use http::HeaderMap;
use xmltree::Element;

/// Response of [create_multipart_upload()](crate::s3::client::Client::create_multipart_upload) API
#[derive(Clone, Debug)]
pub struct CreateMultipartUploadResponse {
    request: S3Request,
    headers: HeaderMap,
    body: Bytes,
}

/// Response of [upload_part()](crate::s3::client::Client::upload_part) API
#[derive(Clone, Debug)]
pub struct UploadPartResponse {
    request: S3Request,
    headers: HeaderMap,
    body: Bytes,
}

/// Response of [complete_multipart_upload()](crate::s3::client::Client::complete_multipart_upload) API
#[derive(Clone, Debug)]
pub struct CompleteMultipartUploadResponse {
    request: S3Request,
    headers: HeaderMap,
    body: Bytes,
}

/// Response of [abort_multipart_upload()](crate::s3::client::Client::abort_multipart_upload) API
#[derive(Clone, Debug)]
pub struct AbortMultipartUploadResponse {
    request: S3Request,
    headers: HeaderMap,
    body: Bytes,
}

impl_from_s3response!(Upload => CreateMultipartUploadResponse, UploadPartResponse);
impl_from_s3response!(Request => AbortMultipartUploadResponse);
impl_has_s3fields!(
    CreateMultipartUploadResponse,
    UploadPartResponse,
    CompleteMultipartUploadResponse,
    AbortMultipartUploadResponse,
);

impl HasBucket for CreateMultipartUploadResponse {}
impl HasObject for CreateMultipartUploadResponse {}

impl HasBucket for UploadPartResponse {}
impl HasObject for UploadPartResponse {}
impl HasEtagFromHeaders for UploadPartResponse {}

impl HasBucket for CompleteMultipartUploadResponse {}
impl HasObject for CompleteMultipartUploadResponse {}
impl HasEtagFromBody for CompleteMultipartUploadResponse {}

impl HasBucket for AbortMultipartUploadResponse {}
impl HasObject for AbortMultipartUploadResponse {}

impl CreateMultipartUploadResponse {
    /// Upload ID from the `<InitiateMultipartUploadResult>` body.
    pub fn upload_id(&self) -> Result<String, Error> {
        let root = Element::parse(self.body.clone().reader())
            .map_err(|e| Error::Protocol(format!("initiate response is not XML: {e}")))?;
        root.get_child("UploadId")
            .and_then(|e| e.get_text())
            .map(|t| t.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Protocol("<UploadId> missing from initiate response".into()))
    }
}

// The service may answer a completion with 200 and an <Error> document once
// it has started assembling parts.
#[async_trait]
impl FromS3Response for CompleteMultipartUploadResponse {
    async fn from_s3response(
        request: S3Request,
        response: Result<HttpResponse, Error>,
    ) -> Result<Self, Error> {
        let resp = response?;
        if !resp.is_success() || has_error_root(&resp.body) {
            return Err(Error::Upload(S3ErrorResponse::parse(
                resp.status,
                &resp.body,
            )));
        }
        Ok(Self {
            request,
            headers: resp.headers,
            body: resp.body,
        })
    }
}

fn has_error_root(body: &Bytes) -> bool {
    Element::parse(body.clone().reader())
        .map(|root| root.name == "Error")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_error_root() {
        assert!(has_error_root(&Bytes::from_static(
            b"<Error><Code>InternalError</Code></Error>"
        )));
        assert!(!has_error_root(&Bytes::from_static(
            b"<CompleteMultipartUploadResult><ETag>\"abc-2\"</ETag></CompleteMultipartUploadResult>"
        )));
        assert!(!has_error_root(&Bytes::new()));
    }
}
