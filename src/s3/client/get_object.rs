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

use crate::s3::builders::{GetObject, GetObjectBldr};
use crate::s3::client::Client;

impl Client {
    /// Creates a [`GetObject`] request builder.
    ///
    /// To execute the request, call [`GetObject::send()`](crate::s3::types::S3Api::send),
    /// which returns a [`Result`] containing a [`GetObjectResponse`](crate::s3::response::GetObjectResponse).
    /// Large objects can be streamed with [`GetObject::send_to_sink()`] instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use s3object::s3::ClientBuilder;
    /// use s3object::s3::creds::StaticProvider;
    /// use s3object::s3::http::BaseUrl;
    /// use s3object::s3::response::GetObjectResponse;
    /// use s3object::s3::types::S3Api;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let base_url = "http://localhost:9000/".parse::<BaseUrl>().unwrap();
    ///     let client = ClientBuilder::new(base_url)
    ///         .provider(Some(StaticProvider::new("minioadmin", "minioadmin", None)))
    ///         .build()
    ///         .unwrap();
    ///     let resp: GetObjectResponse =
    ///         client.get_object("bucket-name", "object-name").build().send().await.unwrap();
    ///     let content_str = String::from_utf8_lossy(resp.content());
    ///     println!("retrieved content '{}'", content_str);
    /// }
    /// ```
    pub fn get_object<S1: Into<String>, S2: Into<String>>(
        &self,
        bucket: S1,
        object: S2,
    ) -> GetObjectBldr {
        GetObject::builder()
            .client(self.clone())
            .bucket(bucket)
            .object(object)
    }
}
