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

//! S3Request struct and implementation for executing HTTP requests.

use crate::s3::client::Client;
use crate::s3::error::Error;
use crate::s3::http::{HttpResponse, ResponseSink};
use crate::s3::multimap_ext::Multimap;
use crate::s3::object_content::ObjectContent;
use http::Method;
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, TypedBuilder)]
/// Generic S3Request
pub struct S3Request {
    #[builder(!default)] // force required
    pub(crate) client: Client,

    #[builder(!default)] // force required
    method: Method,

    #[builder(setter(into))]
    pub(crate) bucket: String,

    #[builder(default, setter(into))]
    pub(crate) object: Option<String>,

    #[builder(default)]
    pub(crate) query_params: Multimap,

    #[builder(default)]
    headers: Multimap,

    #[builder(default, setter(into))]
    body: Option<ObjectContent>,
}

impl S3Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request headers; after execution these include the signing headers.
    pub fn headers(&self) -> &Multimap {
        &self.headers
    }

    /// Execute the request, returning the response. Only used in [`S3Api::send()`](super::S3Api::send)
    pub async fn execute(&mut self) -> Result<HttpResponse, Error> {
        self.client
            .execute(
                self.method.clone(),
                &mut self.headers,
                &self.query_params,
                &self.bucket,
                self.object.as_deref(),
                self.body.clone(),
            )
            .await
    }

    /// Execute the request, streaming a successful response body into `sink`.
    pub async fn execute_streaming(
        &mut self,
        sink: &mut dyn ResponseSink,
    ) -> Result<HttpResponse, Error> {
        self.client
            .execute_streaming(
                self.method.clone(),
                &mut self.headers,
                &self.query_params,
                &self.bucket,
                self.object.as_deref(),
                self.body.clone(),
                sink,
            )
            .await
    }
}
