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

//! Checksum codec and various utility and helper functions

use std::path::Path;

use async_trait::async_trait;
use base64::engine::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::s3::error::{Error, IoError, ValidationErr};

/// Date and time with UTC timezone
pub type UtcTime = DateTime<Utc>;

/// Read buffer used when digesting whole files.
const DIGEST_BUFFER_SIZE: usize = 64 * 1024;

/// Encodes data using base64 algorithm
pub fn b64encode<T: AsRef<[u8]>>(input: T) -> String {
    BASE64.encode(input)
}

// region: checksum codec

/// Computes the MD5 digest of `data`, returned as `(hex, base64)`.
///
/// The hex form is what S3 reports as the etag of a single-part upload; the
/// base64 form (of the raw 16 bytes, not of the hex string) is the value of
/// the `Content-MD5` request header.
pub fn digest(data: &[u8]) -> (String, String) {
    let d = md5::compute(data);
    (format!("{d:x}"), b64encode(d.0))
}

/// Gets base64 encoded MD5 hash of given data
pub fn md5sum_hash(data: &[u8]) -> String {
    b64encode(md5::compute(data).0)
}

/// Converts a hex encoded MD5 digest (e.g. a caller-supplied etag) into the
/// base64 form used by `Content-MD5`. Returns `None` when `hex` is not 32 hex
/// digits.
pub fn md5_hex_to_b64(hex: &str) -> Option<String> {
    let hex = trim_quotes(hex);
    if hex.len() != 32 {
        return None;
    }
    let mut raw = [0u8; 16];
    for (i, byte) in raw.iter_mut().enumerate() {
        *byte = u8::from_str_radix(hex.get(2 * i..2 * i + 2)?, 16).ok()?;
    }
    Some(b64encode(raw))
}

/// Streams the file at `path` through MD5 and returns the hex digest. The
/// file is never loaded into memory as a whole.
pub async fn digest_file(path: &Path) -> Result<String, Error> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| IoError::new(path, e))?;
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; DIGEST_BUFFER_SIZE];
    loop {
        let n = file.read(&mut buf).await.map_err(|e| IoError::new(path, e))?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(format!("{:x}", ctx.compute()))
}

/// Returns `true` if `etag` carries the `<hex>-<part count>` suffix that
/// multipart uploads produce. Such an etag is not an MD5 of the object
/// content and must not be compared against one.
pub fn is_multipart_etag(etag: &str) -> bool {
    lazy_static! {
        static ref MULTIPART_ETAG_REGEX: Regex = Regex::new(r"[0-9A-Fa-f]+-\d+$").unwrap();
    }
    MULTIPART_ETAG_REGEX.is_match(trim_quotes(etag))
}

/// Whole-file digest used by uploads and file downloads.
#[async_trait]
pub trait FileDigest: std::fmt::Debug + Send + Sync {
    /// Returns the hex encoded MD5 digest of the file at `path`.
    async fn digest_file(&self, path: &Path) -> Result<String, Error>;
}

/// Default [`FileDigest`], streaming the file through [`digest_file`].
#[derive(Clone, Debug, Default)]
pub struct Md5FileDigest;

#[async_trait]
impl FileDigest for Md5FileDigest {
    async fn digest_file(&self, path: &Path) -> Result<String, Error> {
        digest_file(path).await
    }
}

// endregion: checksum codec

/// Gets hex encoded SHA256 hash of given data
pub fn sha256_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Strips surrounding double quotes, as found on `ETag` header values.
pub fn trim_quotes(s: &str) -> &str {
    s.trim().trim_matches('"')
}

/// Gets current UTC time
pub fn utc_now() -> UtcTime {
    chrono::offset::Utc::now()
}

/// Gets signer date value of given time
pub fn to_signer_date(time: UtcTime) -> String {
    time.format("%Y%m%d").to_string()
}

/// Gets AMZ date value of given time
pub fn to_amz_date(time: UtcTime) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Gets HTTP header value (RFC 7231 IMF-fixdate) of given time
pub fn to_http_header_value(time: UtcTime) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses HTTP header value to time
pub fn from_http_header_value(s: &str) -> Result<UtcTime, ValidationErr> {
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(
        NaiveDateTime::parse_from_str(s.trim(), "%a, %d %b %Y %H:%M:%S GMT")?,
        Utc,
    ))
}

/// Parses a caller-supplied timestamp. Accepts RFC 3339 (`2025-01-02T03:04:05Z`)
/// and HTTP dates (`Thu, 02 Jan 2025 03:04:05 GMT`).
pub fn parse_timestamp(s: &str) -> Result<UtcTime, ValidationErr> {
    match DateTime::parse_from_rfc3339(s.trim()) {
        Ok(t) => Ok(t.with_timezone(&Utc)),
        Err(_) => from_http_header_value(s),
    }
}

const OBJECT_KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes an object key for use in a request path. `/` is kept.
pub fn urlencode_object_key(key: &str) -> String {
    utf8_percent_encode(key, OBJECT_KEY_ENCODE_SET).collect()
}

/// Percent-encodes a query string component.
pub fn url_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Validates given bucket name. Only the checks needed to build a well-formed
/// path are done here; naming policy is the service's business.
pub fn check_bucket_name(bucket_name: &str) -> Result<(), ValidationErr> {
    if bucket_name.trim().is_empty() {
        return Err(ValidationErr::InvalidBucketName(
            "bucket name cannot be empty".into(),
        ));
    }
    if bucket_name.contains('/') {
        return Err(ValidationErr::InvalidBucketName(format!(
            "bucket name '{bucket_name}' cannot contain '/'"
        )));
    }
    Ok(())
}

/// Validates given object key.
pub fn check_object_name(object_name: &str) -> Result<(), ValidationErr> {
    if object_name.is_empty() {
        return Err(ValidationErr::InvalidObjectName(
            "object name cannot be empty".into(),
        ));
    }
    if object_name.len() > 1024 {
        return Err(ValidationErr::InvalidObjectName(format!(
            "object name of {} bytes exceeds 1024 bytes",
            object_name.len()
        )));
    }
    Ok(())
}
