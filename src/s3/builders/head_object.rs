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
use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::response::HeadObjectResponse;
use crate::s3::sse::Sse;
use crate::s3::types::{S3Api, S3Request, ToS3Request};
use crate::s3::utils::{check_bucket_name, check_object_name};
use http::Method;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Argument builder for the [`HeadObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_HeadObject.html) S3 API operation.
///
/// Retrieves object metadata without the body.
#[derive(Clone, Debug, TypedBuilder)]
pub struct HeadObject {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(default, setter(into))]
    sse: Option<Arc<dyn Sse>>,
}

pub type HeadObjectBldr = HeadObjectBuilder<((Client,), (), (String,), (String,), ())>;

impl S3Api for HeadObject {
    type S3Response = HeadObjectResponse;
}

impl ToS3Request for HeadObject {
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
            .method(Method::HEAD)
            .bucket(self.bucket)
            .object(self.object)
            .headers(headers)
            .build())
    }
}
