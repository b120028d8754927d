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

//! Error definitions for object operations

use bytes::{Buf, Bytes};
use std::path::PathBuf;
use thiserror::Error;
use xmltree::Element;

/// Programmer/contract errors, raised before any request leaves the process.
#[derive(Debug, Error)]
pub enum ValidationErr {
    #[error("invalid bucket name: {0}")]
    InvalidBucketName(String),

    #[error("invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("upload ID cannot be empty")]
    InvalidUploadId,

    #[error("part number {0} is not supported; must be between 1 and 10000")]
    InvalidPartNumber(u16),

    #[error("{parts} part numbers do not match {etags} etags")]
    PartListMismatch { parts: usize, etags: usize },

    #[error("parts cannot be empty")]
    EmptyParts,

    #[error("part size {0} is not supported; minimum allowed 5MiB")]
    InvalidMinPartSize(u64),

    #[error("part size {0} is not supported; maximum allowed 5GiB")]
    InvalidMaxPartSize(u64),

    #[error("object size {object_size} and part size {part_size} make more than {max} parts")]
    TooManyParts {
        object_size: u64,
        part_size: u64,
        max: u16,
    },

    #[error("{0} requires a content source")]
    MissingContent(&'static str),

    #[error("a file body needs a known {0} before it can be sent")]
    MissingFileBodyInfo(&'static str),

    #[error("multipart upload is {state}; cannot {operation}")]
    InvalidMultipartState {
        state: &'static str,
        operation: &'static str,
    },

    #[error("etag '{0}' is not a hex MD5 digest")]
    InvalidEtag(String),

    #[error("file {0:?} does not exist or is not a regular file")]
    MissingFile(PathBuf),

    #[error("expires must be set to build a query string authentication URI")]
    MissingExpiry,

    #[error("SSE-C and SSE-KMS need an HTTPS endpoint")]
    SseTlsRequired,

    #[error("invalid storage class '{0}'")]
    InvalidStorageClass(String),

    #[error("invalid canned ACL '{0}'")]
    InvalidCannedAcl(String),

    #[error("invalid restore tier '{0}'")]
    InvalidRestoreTier(String),

    #[error("unsupported charset '{0}'")]
    UnsupportedCharset(String),

    #[error("user metadata key '{0}' is not a valid header name")]
    InvalidUserMetadata(String),

    #[error("time parse error: {0}")]
    TimeParseError(#[from] chrono::ParseError),

    #[error("header value is not valid text: {0}")]
    StrError(#[from] http::header::ToStrError),

    #[error("integer parse error: {0}")]
    IntError(#[from] std::num::ParseIntError),

    #[error("XML parse error: {0}")]
    XmlParseError(#[from] xmltree::ParseError),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// File system failures while streaming or digesting local content.
#[derive(Debug, Error)]
#[error("I/O error on {path:?}: {source}")]
pub struct IoError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl IoError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Failures of the transport collaborator itself (no response received).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("HTTP error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] http::uri::InvalidUri),

    #[error("{0}")]
    Other(String),
}

/// Error response of a failed S3 request, parsed from the XML body when possible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct S3ErrorResponse {
    pub status: u16,
    pub code: String,
    pub message: String,
    pub resource: String,
    pub request_id: String,
    /// Raw response body as returned by the transport.
    pub body: String,
}

impl S3ErrorResponse {
    /// Builds an error response from a status and body. A body that is not an
    /// S3 `<Error>` document leaves the parsed fields empty.
    pub fn parse(status: u16, body: &Bytes) -> Self {
        let raw = String::from_utf8_lossy(body).into_owned();
        let mut resp = S3ErrorResponse {
            status,
            body: raw,
            ..Default::default()
        };
        if let Ok(root) = Element::parse(body.clone().reader()) {
            let text = |tag: &str| {
                root.get_child(tag)
                    .and_then(|e| e.get_text())
                    .map(|t| t.to_string())
                    .unwrap_or_default()
            };
            resp.code = text("Code");
            resp.message = text("Message");
            resp.resource = text("Resource");
            resp.request_id = text("RequestId");
        }
        resp
    }
}

impl std::fmt::Display for S3ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.code.is_empty() {
            write!(f, "HTTP status {}: {}", self.status, self.body)
        } else {
            write!(
                f,
                "HTTP status {}; code: {}, message: {}, resource: {}, request_id: {}",
                self.status, self.code, self.message, self.resource, self.request_id
            )
        }
    }
}

/// Error definitions
#[derive(Debug, Error)]
pub enum Error {
    /// Programmer error, caught before any request is issued.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErr),

    /// Local file open/read/write failure.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Transport failure (no response).
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// Computed checksum does not match the expected etag.
    #[error("corrupted download; expected etag {expected}, computed {actual}")]
    CorruptedDownload { expected: String, actual: String },

    /// Non-success status on an upload.
    #[error("upload failed; {0}")]
    Upload(S3ErrorResponse),

    /// Non-success status on a request expected to succeed.
    #[error("request failed; {0}")]
    Request(S3ErrorResponse),

    /// A response lacks a field it is required to carry.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(NetworkError::ReqwestError(err))
    }
}

impl From<http::header::ToStrError> for Error {
    fn from(err: http::header::ToStrError) -> Self {
        Error::Validation(ValidationErr::StrError(err))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Self {
        Error::Validation(ValidationErr::TimeParseError(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_s3_error_body() {
        let body = Bytes::from_static(
            b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>AccessDenied</Code>\
<Message>Access Denied</Message><Resource>/bucket/key</Resource>\
<RequestId>4442587FB7D0A2F9</RequestId></Error>",
        );
        let resp = S3ErrorResponse::parse(403, &body);
        assert_eq!(resp.status, 403);
        assert_eq!(resp.code, "AccessDenied");
        assert_eq!(resp.message, "Access Denied");
        assert_eq!(resp.resource, "/bucket/key");
        assert_eq!(resp.request_id, "4442587FB7D0A2F9");
    }

    #[test]
    fn test_parse_non_xml_body_keeps_raw_detail() {
        let resp = S3ErrorResponse::parse(502, &Bytes::from_static(b"bad gateway"));
        assert!(resp.code.is_empty());
        assert_eq!(resp.body, "bad gateway");
        assert_eq!(resp.to_string(), "HTTP status 502: bad gateway");
    }
}
