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

use async_trait::async_trait;
use s3object::s3::error::Error;
use s3object::s3::utils::{FileDigest, Md5FileDigest};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// [`FileDigest`] that counts how many files it was asked to hash.
#[derive(Debug, Default)]
pub struct CountingDigest {
    inner: Md5FileDigest,
    calls: AtomicUsize,
}

impl CountingDigest {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileDigest for CountingDigest {
    async fn digest_file(&self, path: &Path) -> Result<String, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.digest_file(path).await
    }
}
