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

//! Translation of [`ObjectMetadata`] into request headers

use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::*;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::sse::Sse;
use crate::s3::types::{ObjectMetadata, StorageClass};
use crate::s3::utils::to_http_header_value;

/// Rejects encryption that may only travel over TLS on a plain HTTP client.
pub(crate) fn check_sse(sse: Option<&dyn Sse>, client: &Client) -> Result<(), ValidationErr> {
    match sse {
        Some(sse) if sse.tls_required() && !client.is_secure() => {
            Err(ValidationErr::SseTlsRequired)
        }
        _ => Ok(()),
    }
}

fn add_non_empty(headers: &mut Multimap, name: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        headers.add(name, v);
    }
}

/// Headers describing the object itself. Sent on single-shot PUT and on
/// multipart initiate; fields that are unset produce no header.
pub fn metadata_headers(metadata: &ObjectMetadata) -> Multimap {
    let mut headers = Multimap::new();
    headers.add(CONTENT_TYPE, metadata.content_type());

    if let Some(expires) = metadata.expires() {
        headers.add(EXPIRES, to_http_header_value(expires));
    }
    add_non_empty(&mut headers, CONTENT_ENCODING, metadata.content_encoding());
    add_non_empty(&mut headers, CONTENT_DISPOSITION, metadata.content_disposition());
    add_non_empty(&mut headers, CACHE_CONTROL, metadata.cache_control());

    if metadata.storage_class() != StorageClass::default() {
        headers.add(X_AMZ_STORAGE_CLASS, metadata.storage_class().as_str());
    }
    if let Some(location) = metadata.website_redirect_location() {
        headers.add(X_AMZ_WEBSITE_REDIRECT_LOCATION, location);
    }
    for (key, value) in metadata.user_metadata() {
        headers.add(format!("{X_AMZ_META_PREFIX}{key}"), value);
    }

    if let Some(acl) = metadata.explicit_acl() {
        headers.add_multimap(acl.headers());
    }
    if let Some(sse) = metadata.sse() {
        headers.add_multimap(sse.headers());
    }
    headers
}

/// Headers of an upload body: the object's metadata headers plus length and
/// the base64 `Content-MD5` of the content.
pub fn object_write_headers(
    metadata: &ObjectMetadata,
    content_length: u64,
    content_md5: &str,
) -> Multimap {
    let mut headers = metadata_headers(metadata);
    headers.add(CONTENT_LENGTH, content_length.to_string());
    headers.add(CONTENT_MD5, content_md5);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::sse::{SseCustomerKey, SseS3};
    use crate::s3::types::CannedAcl;
    use crate::s3::utils::digest;
    use std::sync::Arc;

    #[test]
    fn test_default_metadata_sends_only_required_headers() {
        let (_, md5) = digest(b"hello, world");
        let headers = object_write_headers(&ObjectMetadata::default(), 12, &md5);
        let mut names: Vec<&str> = headers.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Content-Length", "Content-MD5", "Content-Type"]);
        assert_eq!(headers.get_ci("content-type"), Some("binary/octet-stream"));
        assert_eq!(headers.get_ci("content-md5"), Some("5NfxtO0uQtFYmPSyewGdpA=="));
    }

    #[test]
    fn test_full_metadata_headers() {
        let meta = ObjectMetadata::builder()
            .content_type("text/html")
            .content_encoding("gzip")
            .content_disposition("attachment; filename=a.html")
            .cache_control("")
            .storage_class(StorageClass::StandardIa)
            .acl(CannedAcl::PublicRead)
            .website_redirect_location("/other.html")
            .user_metadata(vec![("Color".to_string(), "blue".to_string())])
            .sse(Arc::new(SseS3::new()))
            .build()
            .with_expires_str("2030-01-01T00:00:00Z")
            .unwrap();

        let headers = metadata_headers(&meta);
        assert_eq!(headers.get_ci("content-type"), Some("text/html"));
        assert_eq!(headers.get_ci("content-encoding"), Some("gzip"));
        assert_eq!(
            headers.get_ci("content-disposition"),
            Some("attachment; filename=a.html")
        );
        assert!(!headers.contains_key_ci("cache-control"));
        assert_eq!(headers.get_ci("x-amz-storage-class"), Some("STANDARD_IA"));
        assert_eq!(headers.get_ci("x-amz-acl"), Some("public-read"));
        assert_eq!(
            headers.get_ci("x-amz-website-redirect-location"),
            Some("/other.html")
        );
        assert_eq!(headers.get_ci("x-amz-meta-color"), Some("blue"));
        assert_eq!(headers.get_ci("x-amz-server-side-encryption"), Some("AES256"));
        assert_eq!(
            headers.get_ci("expires"),
            Some("Tue, 01 Jan 2030 00:00:00 GMT")
        );
        assert!(!headers.contains_key_ci("content-md5"));
    }

    #[test]
    fn test_customer_key_needs_https() {
        let key: &dyn Sse = &SseCustomerKey::new("32byteslongsecretkeymustbegiven1");
        let s3: &dyn Sse = &SseS3::new();
        let plain = Client::try_from("http://localhost:9000").unwrap();
        let secure = Client::try_from("https://localhost:9000").unwrap();
        assert!(matches!(
            check_sse(Some(key), &plain),
            Err(ValidationErr::SseTlsRequired)
        ));
        assert!(check_sse(Some(key), &secure).is_ok());
        assert!(check_sse(Some(s3), &plain).is_ok());
        assert!(check_sse(None, &plain).is_ok());
    }
}
