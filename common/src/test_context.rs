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

use crate::counting_digest::CountingDigest;
use crate::memory_s3::MemoryS3;
use crate::utils::{rand_bucket_name, rand_object_name};
use s3object::s3::creds::StaticProvider;
use s3object::s3::http::BaseUrl;
use s3object::s3::{Client, ClientBuilder, Object};
use std::sync::Arc;

/// A client wired to a fresh [`MemoryS3`] and a random bucket name.
#[derive(Clone)]
pub struct TestContext {
    pub client: Client,
    pub server: Arc<MemoryS3>,
    pub digest: Arc<CountingDigest>,
    pub bucket: String,
}

impl TestContext {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let server = Arc::new(MemoryS3::default());
        let digest = Arc::new(CountingDigest::default());
        let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
        let client = ClientBuilder::new(base_url)
            .provider(Some(StaticProvider::new("minioadmin", "minioadmin", None)))
            .transport(server.clone())
            .file_digest(digest.clone())
            .build()
            .unwrap();

        Self {
            client,
            server,
            digest,
            bucket: rand_bucket_name(),
        }
    }

    /// Handle to `key` in the context's bucket.
    pub fn object(&self, key: &str) -> Object {
        Object::new(&self.client, &self.bucket, key).unwrap()
    }

    /// Handle to a random key in the context's bucket.
    pub fn rand_object(&self) -> Object {
        self.object(&rand_object_name())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
