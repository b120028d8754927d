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

use crate::s3::header_constants::{CONTENT_ENCODING, CONTENT_TYPE};
use crate::s3::response_traits::{
    HasBucket, HasEtagFromHeaders, HasLastModified, HasObject, HasObjectSize, HasS3Fields,
    HasUserMetadata,
};
use crate::s3::types::S3Request;
use crate::{impl_from_s3response, impl_has_s3fields};
use bytes::Bytes;
use http::HeaderMap;

/// Response of [get_object()](crate::s3::client::Client::get_object) API.
///
/// When the body was streamed to a sink, [`content`](Self::content) is empty.
#[derive(Clone, Debug)]
pub struct GetObjectResponse {
    request: S3Request,
    headers: HeaderMap,
    body: Bytes,
}

impl_from_s3response!(Request => GetObjectResponse);
impl_has_s3fields!(GetObjectResponse);

impl HasBucket for GetObjectResponse {}
impl HasObject for GetObjectResponse {}
impl HasEtagFromHeaders for GetObjectResponse {}
impl HasObjectSize for GetObjectResponse {}
impl HasUserMetadata for GetObjectResponse {}
impl HasLastModified for GetObjectResponse {}

impl GetObjectResponse {
    /// Raw content as sent by the service.
    pub fn content(&self) -> &Bytes {
        &self.body
    }

    pub fn into_content(self) -> Bytes {
        self.body
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
    }

    /// Lower-cased `charset` parameter of `Content-Type`, if any.
    pub fn charset(&self) -> Option<String> {
        self.content_type().and_then(parse_charset)
    }
}

fn parse_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_ascii_lowercase())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_charset() {
        assert_eq!(
            parse_charset("text/plain; charset=ISO-8859-1").as_deref(),
            Some("iso-8859-1")
        );
        assert_eq!(
            parse_charset("text/html;format=flowed; Charset=\"utf-8\"").as_deref(),
            Some("utf-8")
        );
        assert_eq!(parse_charset("application/octet-stream"), None);
    }
}
