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

use crate::s3::header_constants::{X_AMZ_ID_2, X_AMZ_PREFIX, X_AMZ_RESTORE, X_AMZ_STORAGE_CLASS};
use crate::s3::response_traits::{
    HasBucket, HasEtagFromHeaders, HasLastModified, HasObject, HasObjectSize, HasS3Fields,
    HasUserMetadata,
};
use crate::s3::types::{ObjectMetadata, S3Request, StorageClass};
use crate::{impl_from_s3response, impl_has_s3fields};
use bytes::Bytes;
use http::HeaderMap;
use std::collections::BTreeMap;

/// Plain response headers kept in the metadata map, besides `x-amz-*` and `content-*`.
const METADATA_HEADERS: [&str; 5] = [
    "accept-ranges",
    "cache-control",
    "etag",
    "expires",
    "last-modified",
];

/// Marker of a finished restore inside the `Restore` metadata field.
const RESTORE_COMPLETED: &str = "ongoing-request=\"false\"";

/// Whether an object described by a canonical metadata map can be read.
///
/// Only archived objects (`GLACIER`, `DEEP_ARCHIVE`) can be unavailable, and
/// they become readable once the `Restore` field reports a finished restore.
pub fn available_from_metadata(metadata: &BTreeMap<String, String>) -> bool {
    let archived = metadata
        .get("StorageClass")
        .and_then(|s| s.parse::<StorageClass>().ok())
        .is_some_and(|c| c.is_archived());
    if !archived {
        return true;
    }
    metadata
        .get("Restore")
        .is_some_and(|r| r.contains(RESTORE_COMPLETED))
}

/// Canonical metadata field name for a response header, or `None` when the
/// header is not metadata.
///
/// The `x-amz-` prefix is removed and each dash separated segment is
/// capitalized and concatenated: `x-amz-server-side-encryption` becomes
/// `ServerSideEncryption`, `content-type` becomes `ContentType`. `etag`
/// becomes `ETag`.
pub fn canonical_metadata_name(header: &str) -> Option<String> {
    let header = header.to_ascii_lowercase();
    let allowed = METADATA_HEADERS.contains(&header.as_str())
        || header.starts_with("content-")
        || (header.starts_with(X_AMZ_PREFIX) && !header.eq_ignore_ascii_case(X_AMZ_ID_2));
    if !allowed {
        return None;
    }

    let name: String = header
        .strip_prefix(X_AMZ_PREFIX)
        .unwrap_or(&header)
        .split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    Some(if name == "Etag" { "ETag".to_string() } else { name })
}

/// Response of [head_object()](crate::s3::client::Client::head_object) API
#[derive(Clone, Debug)]
pub struct HeadObjectResponse {
    request: S3Request,
    headers: HeaderMap,
    body: Bytes,
}

impl_from_s3response!(Request => HeadObjectResponse);
impl_has_s3fields!(HeadObjectResponse);

impl HasBucket for HeadObjectResponse {}
impl HasObject for HeadObjectResponse {}
impl HasEtagFromHeaders for HeadObjectResponse {}
impl HasObjectSize for HeadObjectResponse {}
impl HasUserMetadata for HeadObjectResponse {}
impl HasLastModified for HeadObjectResponse {}

impl HeadObjectResponse {
    /// Allow-listed response headers keyed by canonical name. Repeated
    /// headers are joined with `,`.
    pub fn metadata_map(&self) -> BTreeMap<String, String> {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in self.headers() {
            let Some(key) = canonical_metadata_name(name.as_str()) else {
                continue;
            };
            let Ok(value) = value.to_str() else {
                log::warn!("skipping non-text value of header {name}");
                continue;
            };
            map.entry(key)
                .and_modify(|v| {
                    v.push(',');
                    v.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }
        map
    }

    /// Object metadata as reported by the service.
    pub fn metadata(&self) -> ObjectMetadata {
        let mut metadata = ObjectMetadata::default();
        metadata.refresh_from_headers(self.headers());
        metadata
    }

    /// Storage class reported by the service; absent means `STANDARD`.
    pub fn storage_class(&self) -> StorageClass {
        self.headers()
            .get(X_AMZ_STORAGE_CLASS)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// See [`available_from_metadata`].
    pub fn is_available(&self) -> bool {
        available_from_metadata(&self.metadata_map())
    }

    /// Raw `x-amz-restore` value, e.g. `ongoing-request="false", expiry-date="..."`
    pub fn restore(&self) -> Option<&str> {
        self.headers()
            .get(X_AMZ_RESTORE)
            .and_then(|v| v.to_str().ok())
    }
}
