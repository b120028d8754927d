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

use s3object::s3::error::{Error, ValidationErr};
use s3object::s3::types::ObjectMetadata;
use s3object::s3::utils::digest;
use s3object_common::test_context::TestContext;
use s3object_common::utils::{rand_bytes, temp_file_with};

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_from_file_hashes_only_without_known_etag() {
    let ctx = TestContext::new();
    let data = rand_bytes(20_000);
    let file = temp_file_with(&data);
    let (hex, b64) = digest(&data);

    let mut known = ctx
        .rand_object()
        .with_metadata(ObjectMetadata::builder().etag(hex.as_str()).build());
    known.put_from_file(file.path()).await.unwrap();
    assert_eq!(ctx.digest.calls(), 0);
    assert_eq!(
        ctx.server.last_request().unwrap().header("Content-MD5"),
        Some(b64.as_str())
    );

    let mut unknown = ctx.rand_object();
    unknown.put_from_file(file.path()).await.unwrap();
    assert_eq!(ctx.digest.calls(), 1);
    assert_eq!(unknown.metadata().etag(), Some(hex.as_str()));

    let stored = ctx.server.object(&ctx.bucket, unknown.key()).unwrap();
    assert_eq!(stored.content, data);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_from_file_sends_file_size() {
    let ctx = TestContext::new();
    let data = rand_bytes(12_345);
    let file = temp_file_with(&data);

    let mut object = ctx.rand_object();
    object.put_from_file(file.path()).await.unwrap();

    let req = ctx.server.last_request().unwrap();
    assert_eq!(req.header("Content-Length"), Some("12345"));
    assert_eq!(object.metadata().size(), Some(12_345));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_from_file_with_wrong_etag_is_rejected() {
    let ctx = TestContext::new();
    let file = temp_file_with(b"actual content");

    let mut object = ctx.rand_object().with_metadata(
        ObjectMetadata::builder()
            .etag(digest(b"other content").0.as_str())
            .build(),
    );
    match object.put_from_file(file.path()).await.unwrap_err() {
        Error::Upload(resp) => assert_eq!(resp.code, "BadDigest"),
        e => panic!("unexpected error: {e:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_from_file_with_multipart_etag_is_a_caller_error() {
    let ctx = TestContext::new();
    let file = temp_file_with(b"content");

    let mut object = ctx.rand_object().with_metadata(
        ObjectMetadata::builder()
            .etag("9e107d9d372bb6826bd81d3542a419d6-2")
            .build(),
    );
    let err = object.put_from_file(file.path()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationErr::InvalidEtag(_))));
    assert_eq!(ctx.server.request_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn interrupted_file_body_is_resent_from_the_start() {
    let ctx = TestContext::new();
    let data = rand_bytes(300_000);
    let file = temp_file_with(&data);

    ctx.server.interrupt_file_body_after(2);
    let mut object = ctx.rand_object();
    object.put_from_file(file.path()).await.unwrap();

    let stored = ctx.server.object(&ctx.bucket, object.key()).unwrap();
    assert_eq!(stored.content, data);
    assert_eq!(object.get().await.unwrap(), data);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn missing_file_fails_before_any_request() {
    let ctx = TestContext::new();
    let dir = tempfile::tempdir().unwrap();

    let mut object = ctx.rand_object();
    let err = object
        .put_from_file(dir.path().join("absent.bin"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationErr::MissingFile(_))));
    assert_eq!(ctx.server.request_count(), 0);
    assert_eq!(ctx.digest.calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_from_file_after_put_hashes_the_new_file() {
    let ctx = TestContext::new();
    let data = rand_bytes(27);
    let file = temp_file_with(&data);
    let (hex, b64) = digest(&data);

    let mut object = ctx.rand_object();
    object.put("first version").await.unwrap();
    object.put_from_file(file.path()).await.unwrap();

    assert_eq!(ctx.digest.calls(), 1);
    let req = ctx.server.last_request().unwrap();
    assert_eq!(req.header("Content-Length"), Some("27"));
    assert_eq!(req.header("Content-MD5"), Some(b64.as_str()));
    assert_eq!(object.metadata().etag(), Some(hex.as_str()));
    assert_eq!(object.metadata().size(), Some(27));
    assert!(object.metadata().known_etag().is_none());

    let stored = ctx.server.object(&ctx.bucket, object.key()).unwrap();
    assert_eq!(stored.content, data);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_from_file_after_multipart_upload() {
    let ctx = TestContext::new();
    let data = rand_bytes(4096);
    let file = temp_file_with(&data);

    let mut object = ctx.rand_object();
    object.put_multipart_from_file(file.path(), None).await.unwrap();
    assert!(object.metadata().etag().unwrap().ends_with("-1"));

    object.put_from_file(file.path()).await.unwrap();
    assert_eq!(object.metadata().etag(), Some(digest(&data).0.as_str()));
    assert_eq!(object.get().await.unwrap(), data);
}
