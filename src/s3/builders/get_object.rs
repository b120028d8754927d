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

use crate::s3::builders::object_headers::check_sse;
use crate::s3::client::Client;
use crate::s3::error::{Error, ValidationErr};
use crate::s3::http::ResponseSink;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::GetObjectResponse;
use crate::s3::sse::Sse;
use crate::s3::types::{FromS3Response, S3Api, S3Request, ToS3Request};
use crate::s3::utils::{check_bucket_name, check_object_name};
use http::Method;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Argument builder for the [`GetObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html) S3 API operation.
///
/// This struct constructs the parameters required for the [`Client::get_object`](crate::s3::client::Client::get_object) method.
#[derive(Clone, Debug, TypedBuilder)]
pub struct GetObject {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    /// Encryption the object was written with; customer keys must be resent.
    #[builder(default, setter(into))]
    sse: Option<Arc<dyn Sse>>,
}

pub type GetObjectBldr = GetObjectBuilder<((Client,), (), (String,), (String,), ())>;

impl GetObject {
    /// Sends the request, handing the body to `sink` as it arrives instead of
    /// buffering it. The returned response has an empty body.
    pub async fn send_to_sink(
        self,
        sink: &mut dyn ResponseSink,
    ) -> Result<GetObjectResponse, Error> {
        let mut req: S3Request = self.to_s3request()?;
        let resp = req.execute_streaming(sink).await;
        GetObjectResponse::from_s3response(req, resp).await
    }
}

impl S3Api for GetObject {
    type S3Response = GetObjectResponse;
}

impl ToS3Request for GetObject {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        let mut headers = self.extra_headers.unwrap_or_default();
        check_sse(self.sse.as_deref(), &self.client)?;
        if let Some(sse) = &self.sse {
            headers.add_multimap(sse.read_headers());
        }

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::GET)
            .bucket(self.bucket)
            .object(self.object)
            .headers(headers)
            .build())
    }
}
