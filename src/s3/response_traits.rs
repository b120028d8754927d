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

//! Response traits for accessing S3 metadata from HTTP response headers and bodies.
//!
//! Every response type keeps the request that produced it plus the raw
//! headers and body, and opts into the accessors that make sense for it:
//! - [`HasBucket`], [`HasObject`]: identity of the object the request addressed
//! - [`HasEtagFromHeaders`]: ETag of the stored content (PUT, GET, HEAD, UploadPart)
//! - [`HasEtagFromBody`]: ETag parsed from an XML body (CompleteMultipartUpload)
//! - [`HasUserMetadata`]: `x-amz-meta-*` headers with the prefix stripped
//! - [`HasObjectSize`], [`HasLastModified`]

use crate::s3::error::Error;
use crate::s3::header_constants::{CONTENT_LENGTH, ETAG, LAST_MODIFIED, X_AMZ_META_PREFIX};
use crate::s3::types::S3Request;
use crate::s3::types::metadata::normalize_user_metadata;
use crate::s3::utils::{UtcTime, from_http_header_value, trim_quotes};
use bytes::{Buf, Bytes};
use http::HeaderMap;
use std::collections::BTreeMap;
use xmltree::Element;

#[macro_export]
/// Implements the `FromS3Response` trait for the specified types. A
/// non-success status becomes `Error::$kind` carrying the parsed error body.
macro_rules! impl_from_s3response {
    ($kind:ident => $($ty:ty),* $(,)?) => {
        $(
            #[async_trait::async_trait]
            impl $crate::s3::types::FromS3Response for $ty {
                async fn from_s3response(
                    request: $crate::s3::types::S3Request,
                    response: Result<$crate::s3::http::HttpResponse, $crate::s3::error::Error>,
                ) -> Result<Self, $crate::s3::error::Error> {
                    let resp = response?;
                    if !resp.is_success() {
                        return Err($crate::s3::error::Error::$kind(
                            $crate::s3::error::S3ErrorResponse::parse(resp.status, &resp.body),
                        ));
                    }
                    Ok(Self {
                        request,
                        headers: resp.headers,
                        body: resp.body,
                    })
                }
            }
        )*
    };
}

#[macro_export]
/// Implements the `HasS3Fields` trait for the specified types.
macro_rules! impl_has_s3fields {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::s3::response_traits::HasS3Fields for $ty {
                /// The request that was sent to the S3 API.
                fn request(&self) -> &$crate::s3::types::S3Request {
                    &self.request
                }

                /// The response headers of the S3 API.
                fn headers(&self) -> &http::HeaderMap {
                    &self.headers
                }

                /// The response body of the S3 API.
                fn body(&self) -> &bytes::Bytes {
                    &self.body
                }
            }
        )*
    };
}

pub trait HasS3Fields {
    /// The request that was sent to the S3 API.
    fn request(&self) -> &S3Request;
    /// HTTP headers returned by the server, containing metadata such as `Content-Type`, `ETag`, etc.
    fn headers(&self) -> &HeaderMap;
    /// The response body returned by the server, which may contain the object data or other information.
    fn body(&self) -> &Bytes;
}

/// Returns the name of the S3 bucket.
pub trait HasBucket: HasS3Fields {
    #[inline]
    fn bucket(&self) -> &str {
        &self.request().bucket
    }
}

/// Returns the object key (name) of the S3 object.
pub trait HasObject: HasS3Fields {
    #[inline]
    fn object(&self) -> &str {
        self.request().object.as_deref().unwrap_or_default()
    }
}

/// Value of the `ETag` header without the surrounding quotes.
pub trait HasEtagFromHeaders: HasS3Fields {
    #[inline]
    fn etag(&self) -> Option<String> {
        self.headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| trim_quotes(s).to_string())
            .filter(|s| !s.is_empty())
    }
}

/// ETag carried in the XML response body.
pub trait HasEtagFromBody: HasS3Fields {
    fn etag(&self) -> Result<String, Error> {
        let root = Element::parse(self.body().clone().reader())
            .map_err(|e| Error::Protocol(format!("response body is not XML: {e}")))?;
        root.get_child("ETag")
            .and_then(|e| e.get_text())
            .map(|t| trim_quotes(&t).to_string())
            .ok_or_else(|| Error::Protocol("<ETag> missing from response body".into()))
    }
}

/// Size of the object as reported by `Content-Length`.
pub trait HasObjectSize: HasS3Fields {
    #[inline]
    fn object_size(&self) -> Option<u64> {
        self.headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
    }
}

/// User metadata from `x-amz-meta-*` headers, keys lower-cased with the
/// prefix stripped. A header repeated with several values keeps the last.
pub trait HasUserMetadata: HasS3Fields {
    fn user_metadata(&self) -> BTreeMap<String, String> {
        normalize_user_metadata(self.headers().iter().filter_map(|(name, value)| {
            if !name.as_str().starts_with(X_AMZ_META_PREFIX) {
                return None;
            }
            value.to_str().ok().map(|v| (name.as_str(), v))
        }))
    }
}

/// Parsed `Last-Modified` header.
pub trait HasLastModified: HasS3Fields {
    fn last_modified(&self) -> Option<UtcTime> {
        self.headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| from_http_header_value(s).ok())
    }
}
