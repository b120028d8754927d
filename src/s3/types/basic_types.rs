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

//! Basic S3 data types: StorageClass, CannedAcl, RestoreTier, Part

use crate::s3::error::ValidationErr;
use crate::s3::header_constants::X_AMZ_ACL;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Storage class of an object
pub enum StorageClass {
    #[default]
    Standard,
    ReducedRedundancy,
    StandardIa,
    OnezoneIa,
    IntelligentTiering,
    Glacier,
    DeepArchive,
}

impl StorageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageClass::Standard => "STANDARD",
            StorageClass::ReducedRedundancy => "REDUCED_REDUNDANCY",
            StorageClass::StandardIa => "STANDARD_IA",
            StorageClass::OnezoneIa => "ONEZONE_IA",
            StorageClass::IntelligentTiering => "INTELLIGENT_TIERING",
            StorageClass::Glacier => "GLACIER",
            StorageClass::DeepArchive => "DEEP_ARCHIVE",
        }
    }

    /// Returns `true` for archive classes whose content must be restored
    /// before it can be read.
    pub fn is_archived(&self) -> bool {
        matches!(self, StorageClass::Glacier | StorageClass::DeepArchive)
    }
}

impl FromStr for StorageClass {
    type Err = ValidationErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [StorageClass; 7] = [
            StorageClass::Standard,
            StorageClass::ReducedRedundancy,
            StorageClass::StandardIa,
            StorageClass::OnezoneIa,
            StorageClass::IntelligentTiering,
            StorageClass::Glacier,
            StorageClass::DeepArchive,
        ];
        let s = s.trim();
        ALL.into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationErr::InvalidStorageClass(s.to_string()))
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// Canned access control list applied on write
pub enum CannedAcl {
    #[default]
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    AwsExecRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
    LogDeliveryWrite,
}

impl CannedAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
            CannedAcl::AwsExecRead => "aws-exec-read",
            CannedAcl::BucketOwnerRead => "bucket-owner-read",
            CannedAcl::BucketOwnerFullControl => "bucket-owner-full-control",
            CannedAcl::LogDeliveryWrite => "log-delivery-write",
        }
    }

    /// Returns the request headers carrying this ACL.
    pub fn headers(&self) -> Multimap {
        let mut map = Multimap::new();
        map.add(X_AMZ_ACL, self.as_str());
        map
    }
}

impl FromStr for CannedAcl {
    type Err = ValidationErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Ok(match normalized.as_str() {
            "private" => CannedAcl::Private,
            "public-read" => CannedAcl::PublicRead,
            "public-read-write" => CannedAcl::PublicReadWrite,
            "authenticated-read" => CannedAcl::AuthenticatedRead,
            "aws-exec-read" => CannedAcl::AwsExecRead,
            "bucket-owner-read" => CannedAcl::BucketOwnerRead,
            "bucket-owner-full-control" => CannedAcl::BucketOwnerFullControl,
            "log-delivery-write" => CannedAcl::LogDeliveryWrite,
            _ => return Err(ValidationErr::InvalidCannedAcl(s.to_string())),
        })
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Retrieval tier of a Glacier restore request
pub enum RestoreTier {
    #[default]
    Standard,
    Bulk,
    Expedited,
}

impl RestoreTier {
    pub fn parse(s: &str) -> Result<RestoreTier, ValidationErr> {
        if s.eq_ignore_ascii_case("Standard") {
            Ok(RestoreTier::Standard)
        } else if s.eq_ignore_ascii_case("Bulk") {
            Ok(RestoreTier::Bulk)
        } else if s.eq_ignore_ascii_case("Expedited") {
            Ok(RestoreTier::Expedited)
        } else {
            Err(ValidationErr::InvalidRestoreTier(s.to_string()))
        }
    }
}

impl fmt::Display for RestoreTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RestoreTier::Standard => write!(f, "Standard"),
            RestoreTier::Bulk => write!(f, "Bulk"),
            RestoreTier::Expedited => write!(f, "Expedited"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Contains part number and etag of multipart upload
pub struct Part {
    pub number: u16,
    pub etag: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_class_parse_is_case_insensitive() {
        assert_eq!(
            "glacier".parse::<StorageClass>().unwrap(),
            StorageClass::Glacier
        );
        assert_eq!(
            "Reduced_Redundancy".parse::<StorageClass>().unwrap(),
            StorageClass::ReducedRedundancy
        );
        assert!(matches!(
            "COLD".parse::<StorageClass>(),
            Err(ValidationErr::InvalidStorageClass(s)) if s == "COLD"
        ));
        assert_eq!(StorageClass::default().to_string(), "STANDARD");
    }

    #[test]
    fn test_canned_acl_headers() {
        let acl: CannedAcl = "public_read".parse().unwrap();
        assert_eq!(acl, CannedAcl::PublicRead);
        let headers = acl.headers();
        assert_eq!(headers.get_ci("x-amz-acl"), Some("public-read"));
        assert!("world-writable".parse::<CannedAcl>().is_err());
    }

    #[test]
    fn test_restore_tier_parse() {
        assert_eq!(RestoreTier::parse("bulk").unwrap(), RestoreTier::Bulk);
        assert_eq!(RestoreTier::Expedited.to_string(), "Expedited");
        assert!(RestoreTier::parse("fast").is_err());
    }
}
