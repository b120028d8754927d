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

use crate::s3::builders::{CompleteMultipartUpload, CompleteMultipartUploadBldr};
use crate::s3::client::Client;

impl Client {
    /// Creates a [`CompleteMultipartUpload`] request builder. Part numbers and
    /// etags are paired by position.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use s3object::s3::ClientBuilder;
    /// use s3object::s3::creds::StaticProvider;
    /// use s3object::s3::http::BaseUrl;
    /// use s3object::s3::response_traits::HasEtagFromBody;
    /// use s3object::s3::types::S3Api;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let base_url = "http://localhost:9000/".parse::<BaseUrl>().unwrap();
    ///     let client = ClientBuilder::new(base_url)
    ///         .provider(Some(StaticProvider::new("minioadmin", "minioadmin", None)))
    ///         .build()
    ///         .unwrap();
    ///     let resp = client
    ///         .complete_multipart_upload("bucket-name", "object-name", "upload-id")
    ///         .part_numbers(vec![1, 2])
    ///         .etags(vec!["etag-1".to_string(), "etag-2".to_string()])
    ///         .build()
    ///         .send()
    ///         .await
    ///         .unwrap();
    ///     println!("final etag: {}", resp.etag().unwrap());
    /// }
    /// ```
    pub fn complete_multipart_upload<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
        upload_id: S3,
    ) -> CompleteMultipartUploadBldr {
        CompleteMultipartUpload::builder()
            .client(self.clone())
            .bucket(bucket)
            .object(object)
            .upload_id(upload_id)
    }
}
