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

use crate::s3::builders::object_headers::{check_sse, object_write_headers};
use crate::s3::client::Client;
use crate::s3::error::ValidationErr;
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::object_content::ObjectContent;
use crate::s3::response::PutObjectResponse;
use crate::s3::types::{ObjectMetadata, S3Api, S3Request, ToS3Request};
use crate::s3::utils::{check_bucket_name, check_object_name, digest};
use http::Method;
use typed_builder::TypedBuilder;

/// Argument builder for the [`PutObject`](https://docs.aws.amazon.com/AmazonS3/latest/API/API_PutObject.html) S3 API operation.
///
/// This struct constructs the parameters required for the [`Client::put_object`](crate::s3::client::Client::put_object) method.
///
/// In-memory content gets its length and `Content-MD5` computed here. A file
/// body must come with both already known.
#[derive(Clone, Debug, TypedBuilder)]
pub struct PutObject {
    #[builder(!default)] // force required
    client: Client,
    #[builder(default, setter(into))]
    extra_headers: Option<Multimap>,
    #[builder(setter(into))] // force required + accept Into<String>
    bucket: String,
    #[builder(setter(into))] // force required + accept Into<String>
    object: String,
    #[builder(default)]
    metadata: ObjectMetadata,
    #[builder(default, setter(into, strip_option))]
    content: Option<ObjectContent>,
    #[builder(default, setter(strip_option))]
    content_length: Option<u64>,
    /// Base64 encoded MD5 of the content
    #[builder(default, setter(into, strip_option))]
    content_md5: Option<String>,
}

pub type PutObjectBldr =
    PutObjectBuilder<((Client,), (), (String,), (String,), (), (), (), ())>;

impl S3Api for PutObject {
    type S3Response = PutObjectResponse;
}

impl ToS3Request for PutObject {
    fn to_s3request(self) -> Result<S3Request, ValidationErr> {
        check_bucket_name(&self.bucket)?;
        check_object_name(&self.object)?;

        check_sse(self.metadata.sse().map(|s| s.as_ref()), &self.client)?;
        let content = self.content.ok_or(ValidationErr::MissingContent("PutObject"))?;
        let (content_length, content_md5) = match &content {
            ObjectContent::Bytes(b) => {
                let md5 = match self.content_md5 {
                    Some(v) => v,
                    None => digest(b).1,
                };
                (b.len() as u64, md5)
            }
            ObjectContent::File(_) => (
                self.content_length
                    .ok_or(ValidationErr::MissingFileBodyInfo("content length"))?,
                self.content_md5
                    .ok_or(ValidationErr::MissingFileBodyInfo("content MD5"))?,
            ),
        };

        let mut headers = self.extra_headers.unwrap_or_default();
        headers.add_multimap(object_write_headers(
            &self.metadata,
            content_length,
            &content_md5,
        ));

        Ok(S3Request::builder()
            .client(self.client)
            .method(Method::PUT)
            .bucket(self.bucket)
            .object(self.object)
            .headers(headers)
            .body(content)
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::file_reader::ChunkedFileReader;

    fn client() -> Client {
        Client::try_from("http://localhost:9000").unwrap()
    }

    #[test]
    fn test_missing_content_fails_fast() {
        let err = client()
            .put_object("bucket", "key")
            .build()
            .to_s3request()
            .unwrap_err();
        assert!(matches!(err, ValidationErr::MissingContent("PutObject")));
    }

    #[test]
    fn test_file_body_requires_known_digest() {
        let err = client()
            .put_object("bucket", "key")
            .content(ChunkedFileReader::new("/tmp/some-file"))
            .content_length(10)
            .build()
            .to_s3request()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationErr::MissingFileBodyInfo("content MD5")
        ));
    }

    #[test]
    fn test_bytes_body_headers() {
        let req = client()
            .put_object("bucket", "key")
            .content("hello, world")
            .build()
            .to_s3request()
            .unwrap();
        assert_eq!(*req.method(), Method::PUT);
        assert_eq!(req.headers().get_ci("content-length"), Some("12"));
        assert_eq!(
            req.headers().get_ci("content-md5"),
            Some("5NfxtO0uQtFYmPSyewGdpA==")
        );
    }
}
