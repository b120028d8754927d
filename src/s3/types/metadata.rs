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

//! Transport-level description of an object

use super::basic_types::{CannedAcl, StorageClass};
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::{
    CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE,
    DEFAULT_CONTENT_TYPE, ETAG, LAST_MODIFIED, X_AMZ_META_PREFIX, X_AMZ_STORAGE_CLASS,
    X_AMZ_WEBSITE_REDIRECT_LOCATION,
};
use crate::s3::sse::Sse;
use crate::s3::utils::{UtcTime, from_http_header_value, parse_timestamp, trim_quotes};
use http::HeaderMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Lower-cases a user metadata key and strips a leading `x-amz-meta-`.
pub fn normalize_user_metadata_key(key: &str) -> String {
    let key = key.trim().to_lowercase();
    match key.strip_prefix(X_AMZ_META_PREFIX) {
        Some(stripped) => stripped.to_string(),
        None => key,
    }
}

/// Normalizes user metadata pairs. Keys that collide after case folding are
/// resolved last-write-wins in iteration order.
pub fn normalize_user_metadata<I, K, V>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut map = BTreeMap::new();
    for (k, v) in pairs {
        map.insert(normalize_user_metadata_key(k.as_ref()), v.into());
    }
    map
}

/// Immutable description of an object's transport-level properties.
///
/// ```
/// use s3object::s3::types::{CannedAcl, ObjectMetadata, StorageClass};
///
/// let meta = ObjectMetadata::builder()
///     .content_type("text/plain")
///     .storage_class(StorageClass::ReducedRedundancy)
///     .acl(CannedAcl::PublicRead)
///     .user_metadata(vec![("X-Amz-Meta-Color".to_string(), "blue".to_string())])
///     .build();
/// assert_eq!(meta.user_metadata().get("color").map(String::as_str), Some("blue"));
/// ```
#[derive(Clone, Debug, TypedBuilder)]
pub struct ObjectMetadata {
    #[builder(default = DEFAULT_CONTENT_TYPE.to_string(), setter(into))]
    content_type: String,
    #[builder(default, setter(into, strip_option))]
    content_encoding: Option<String>,
    #[builder(default, setter(into, strip_option))]
    content_disposition: Option<String>,
    #[builder(default, setter(into, strip_option))]
    cache_control: Option<String>,
    #[builder(default)]
    storage_class: StorageClass,
    /// Canned ACL sent on write; `None` sends no ACL header.
    #[builder(default, setter(strip_option))]
    acl: Option<CannedAcl>,
    #[builder(default, setter(transform = |pairs: Vec<(String, String)>| normalize_user_metadata(pairs)))]
    user_metadata: BTreeMap<String, String>,
    #[builder(default, setter(into, strip_option))]
    website_redirect_location: Option<String>,
    #[builder(default, setter(strip_option))]
    sse: Option<Arc<dyn Sse>>,
    #[builder(default, setter(strip_option))]
    expires: Option<UtcTime>,
    /// Known hex MD5 of the content. Supplying it lets file uploads skip hashing.
    #[builder(default, setter(transform = |etag: &str| Some(trim_quotes(etag).to_string())))]
    etag: Option<String>,
    /// Known byte length of the content.
    #[builder(default, setter(strip_option))]
    size: Option<u64>,
    #[builder(default, setter(skip))]
    observed_etag: Option<String>,
    #[builder(default, setter(skip))]
    observed_size: Option<u64>,
    #[builder(default, setter(skip))]
    last_modified: Option<UtcTime>,
}

impl Default for ObjectMetadata {
    fn default() -> Self {
        ObjectMetadata::builder().build()
    }
}

impl ObjectMetadata {
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.content_disposition.as_deref()
    }

    pub fn cache_control(&self) -> Option<&str> {
        self.cache_control.as_deref()
    }

    pub fn storage_class(&self) -> StorageClass {
        self.storage_class
    }

    /// Effective canned ACL; `private` unless one was set.
    pub fn acl(&self) -> CannedAcl {
        self.acl.unwrap_or_default()
    }

    /// The canned ACL only when explicitly set.
    pub fn explicit_acl(&self) -> Option<CannedAcl> {
        self.acl
    }

    pub fn user_metadata(&self) -> &BTreeMap<String, String> {
        &self.user_metadata
    }

    pub fn website_redirect_location(&self) -> Option<&str> {
        self.website_redirect_location.as_deref()
    }

    pub fn sse(&self) -> Option<&Arc<dyn Sse>> {
        self.sse.as_ref()
    }

    /// Server side encryption algorithm name, e.g. `AES256`
    pub fn encryption(&self) -> Option<&str> {
        self.sse.as_ref().map(|s| s.algorithm())
    }

    pub fn expires(&self) -> Option<UtcTime> {
        self.expires
    }

    /// ETag last reported by the service, or the known one before any
    /// exchange has reported it.
    pub fn etag(&self) -> Option<&str> {
        self.observed_etag.as_deref().or(self.etag.as_deref())
    }

    /// Size last reported by the service, or the known one.
    pub fn size(&self) -> Option<u64> {
        self.observed_size.or(self.size)
    }

    /// The etag given through the builder or [`with_etag`](Self::with_etag).
    /// Service responses never change it.
    pub fn known_etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// The size given through the builder. Service responses never change it.
    pub fn known_size(&self) -> Option<u64> {
        self.size
    }

    pub fn last_modified(&self) -> Option<UtcTime> {
        self.last_modified
    }

    /// Sets `expires` from an RFC 3339 or HTTP-date string.
    pub fn with_expires_str(mut self, expires: &str) -> Result<Self, ValidationErr> {
        self.expires = Some(parse_timestamp(expires)?);
        Ok(self)
    }

    /// Replaces user metadata with `pairs`, normalizing keys.
    pub fn with_user_metadata<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.user_metadata = normalize_user_metadata(pairs);
        self
    }

    pub fn with_etag(mut self, etag: Option<&str>) -> Self {
        self.etag = etag.map(|e| trim_quotes(e).to_string());
        self
    }

    pub(crate) fn set_observed_etag(&mut self, etag: Option<String>) {
        self.observed_etag = etag;
    }

    pub(crate) fn set_observed_size(&mut self, size: Option<u64>) {
        self.observed_size = size;
    }

    /// Updates the fields a GET or HEAD response reports. User metadata is
    /// replaced as a whole; ACL, encryption and expiry are left alone.
    pub(crate) fn refresh_from_headers(&mut self, headers: &HeaderMap) {
        let text = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        if let Some(v) = text(CONTENT_TYPE) {
            self.content_type = v.to_string();
        }
        if let Some(v) = text(CONTENT_ENCODING) {
            self.content_encoding = Some(v.to_string());
        }
        if let Some(v) = text(CONTENT_DISPOSITION) {
            self.content_disposition = Some(v.to_string());
        }
        if let Some(v) = text(CACHE_CONTROL) {
            self.cache_control = Some(v.to_string());
        }
        if let Some(v) = text(X_AMZ_WEBSITE_REDIRECT_LOCATION) {
            self.website_redirect_location = Some(v.to_string());
        }
        self.storage_class = text(X_AMZ_STORAGE_CLASS)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        if let Some(etag) = text(ETAG).map(trim_quotes).filter(|e| !e.is_empty()) {
            self.observed_etag = Some(etag.to_string());
        }
        if let Some(size) = text(CONTENT_LENGTH).and_then(|v| v.parse().ok()) {
            self.observed_size = Some(size);
        }
        self.last_modified = text(LAST_MODIFIED).and_then(|v| from_http_header_value(v).ok());
        self.user_metadata = normalize_user_metadata(headers.iter().filter_map(|(name, value)| {
            if !name.as_str().starts_with(X_AMZ_META_PREFIX) {
                return None;
            }
            value.to_str().ok().map(|v| (name.as_str(), v))
        }));
    }
}
