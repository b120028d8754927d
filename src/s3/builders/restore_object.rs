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

use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::header_constants::{CONTENT_LENGTH, CONTENT_MD5, CONTENT_TYPE};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::object_content::ObjectContent;
use crate::s3::response::RestoreObjectResponse;
use crate::s3::types::{RestoreTier, S3Api, S3Request, ToS3Request};
use crate::s3::utils::{check_bucket_name, check_object_name, md5sum_hash};
use bytes::Bytes;
use http::Method;
use typed_builder::TypedBuilder;

/// Argument builder for the [`RestoreObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_RestoreObject.html) S3 API operation.
///
/// Requests a temporary copy of an archived object for `days` days. The
/// service completes the restore asynchronously.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RestoreObject {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(!default)] // force required
    days: u32,
    #[builder(default)]
    tier: RestoreTier,
}

pub type RestoreObjectBldr =
    RestoreObjectBuilder<((Client,), (), (String,), (String,), (), ())>;

impl S3Api for RestoreObject {
    type S3Response = RestoreObjectResponse;
}

fn restore_request_body(days: u32, tier: RestoreTier) -> Bytes {
    Bytes::from(format!(
        "<RestoreRequest xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
<Days>{days}</Days>\
<GlacierJobParameters><Tier>{tier}</Tier></GlacierJobParameters>\
</RestoreRequest>"
    ))
}

impl ToS3Request for RestoreObject {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        let body = restore_request_body(self.days, self.tier);
        let mut headers = self.extra_headers.unwrap_or_default();
        headers.add(CONTENT_TYPE, "application/xml");
        headers.add(CONTENT_LENGTH, body.len().to_string());
        headers.add(CONTENT_MD5, md5sum_hash(&body));

        let mut query_params = Multimap::new();
        query_params.add("restore", "");

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::POST)
            .bucket(self.bucket)
            .object(self.object)
            .query_params(query_params)
            .headers(headers)
            .body(ObjectContent::Bytes(body))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_request_body() {
        let body = restore_request_body(3, RestoreTier::Bulk);
        assert_eq!(
            body,
            "<RestoreRequest xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
<Days>3</Days><GlacierJobParameters><Tier>Bulk</Tier></GlacierJobParameters>\
</RestoreRequest>"
        );
    }
}
