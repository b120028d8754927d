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

use bytes::{Bytes, BytesMut};
use http::Method;
use s3object::s3::error::Error;
use s3object::s3::response_traits::{HasBucket, HasEtagFromHeaders, HasObject};
use s3object::s3::types::{CannedAcl, ObjectMetadata, StorageClass};
use s3object::s3::utils::{digest, md5sum_hash};
use s3object_common::test_context::TestContext;
use s3object_common::utils::{rand_bytes, rand_object_name};

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_then_get_returns_the_same_bytes() {
    let ctx = TestContext::new();
    for size in [0, 1, 4096, 100_003] {
        let data = rand_bytes(size);
        let mut object = ctx.rand_object();

        let resp = object.put(data.clone()).await.unwrap();
        assert_eq!(resp.bucket(), ctx.bucket);
        assert_eq!(resp.object(), object.key());
        assert_eq!(resp.etag(), Some(digest(&data).0));

        let got = object.get().await.unwrap();
        assert_eq!(got, data);
        assert_eq!(object.metadata().size(), Some(size as u64));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn put_sends_metadata_headers() {
    let ctx = TestContext::new();
    let metadata = ObjectMetadata::builder()
        .content_type("text/plain")
        .cache_control("max-age=60")
        .storage_class(StorageClass::ReducedRedundancy)
        .acl(CannedAcl::PublicRead)
        .website_redirect_location("/elsewhere.html")
        .user_metadata(vec![("Color".to_string(), "blue".to_string())])
        .build();
    let mut object = ctx.rand_object().with_metadata(metadata);
    object.put("hello, world").await.unwrap();

    let req = ctx.server.last_request().unwrap();
    assert_eq!(req.method, Method::PUT);
    assert_eq!(req.header("Content-Type"), Some("text/plain"));
    assert_eq!(req.header("Content-Length"), Some("12"));
    assert_eq!(req.header("Content-MD5"), Some("5NfxtO0uQtFYmPSyewGdpA=="));
    assert_eq!(req.header("Cache-Control"), Some("max-age=60"));
    assert_eq!(
        req.header("x-amz-storage-class"),
        Some("REDUCED_REDUNDANCY")
    );
    assert_eq!(req.header("x-amz-acl"), Some("public-read"));
    assert_eq!(
        req.header("x-amz-website-redirect-location"),
        Some("/elsewhere.html")
    );
    assert_eq!(req.header("x-amz-meta-color"), Some("blue"));
    assert!(req.header("Content-Encoding").is_none());
    assert!(req.header("Expires").is_none());
    assert!(req.header("Authorization").is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn default_metadata_sends_only_required_headers() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    object.put(Bytes::from_static(b"abc")).await.unwrap();

    let req = ctx.server.last_request().unwrap();
    assert_eq!(req.header("Content-Type"), Some("binary/octet-stream"));
    assert_eq!(req.header("Content-MD5"), Some(md5sum_hash(b"abc").as_str()));
    assert!(req.header("x-amz-storage-class").is_none());
    assert!(req.header("x-amz-acl").is_none());
    assert!(req.header("Cache-Control").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_repopulates_user_metadata() {
    let ctx = TestContext::new();
    let key = rand_object_name();
    let metadata = ObjectMetadata::builder()
        .content_type("text/plain")
        .user_metadata(vec![("Shape".to_string(), "round".to_string())])
        .build();
    ctx.object(&key)
        .with_metadata(metadata)
        .put("data")
        .await
        .unwrap();

    let stale = ObjectMetadata::default().with_user_metadata([("color", "blue")]);
    let mut object = ctx.object(&key).with_metadata(stale);
    object.get().await.unwrap();
    let user_metadata = object.metadata().user_metadata();
    assert_eq!(user_metadata.len(), 1);
    assert_eq!(user_metadata["shape"], "round");
    assert_eq!(object.metadata().content_type(), "text/plain");
    assert!(object.metadata().last_modified().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_detects_corruption() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    object.put("hello, world").await.unwrap();

    ctx.server.force_etag("00000000000000000000000000000000");
    let err = object.get().await.unwrap_err();
    match err {
        Error::CorruptedDownload { expected, actual } => {
            assert_eq!(expected, "00000000000000000000000000000000");
            assert_eq!(actual, digest(b"hello, world").0);
        }
        e => panic!("unexpected error: {e:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_skips_check_for_multipart_etag() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    object.put("hello, world").await.unwrap();

    ctx.server.force_etag("9e107d9d372bb6826bd81d3542a419d6-3");
    let got = object.get().await.unwrap();
    assert_eq!(got.as_ref(), b"hello, world");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_decoded_uses_declared_charset() {
    let ctx = TestContext::new();

    let mut utf8 = ctx
        .rand_object()
        .with_metadata(ObjectMetadata::builder().content_type("text/plain; charset=utf-8").build());
    utf8.put("héllo").await.unwrap();
    assert_eq!(utf8.get_decoded().await.unwrap(), "héllo");

    let mut latin1 = ctx.rand_object().with_metadata(
        ObjectMetadata::builder()
            .content_type("text/plain; charset=ISO-8859-1")
            .build(),
    );
    latin1.put(vec![0x63, 0x61, 0x66, 0xE9]).await.unwrap();
    assert_eq!(latin1.get_decoded().await.unwrap(), "café");

    // The check runs on the raw bytes, before decoding.
    ctx.server.force_etag("00000000000000000000000000000000");
    assert!(matches!(
        latin1.get_decoded().await,
        Err(Error::CorruptedDownload { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_to_callback_streams_without_checking() {
    let ctx = TestContext::new();
    let data = rand_bytes(10_000);
    let mut object = ctx.rand_object();
    object.put(data.clone()).await.unwrap();

    ctx.server.force_etag("00000000000000000000000000000000");
    let mut received = BytesMut::new();
    object
        .get_to_callback(|chunk: Bytes| {
            received.extend_from_slice(&chunk);
            Ok(())
        })
        .await
        .unwrap();
    assert_eq!(received.freeze(), data);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_to_callback_propagates_sink_errors() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    object.put("payload").await.unwrap();

    let err = object
        .get_to_callback(|_chunk: Bytes| Err(Error::Protocol("sink is full".into())))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Protocol(msg) if msg == "sink is full"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_to_file_writes_and_verifies() {
    let ctx = TestContext::new();
    let data = rand_bytes(50_000);
    let mut object = ctx.rand_object();
    object.put(data.clone()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("download.bin");
    let written = object.get_to_file(&path).await.unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(std::fs::read(&path).unwrap(), data.to_vec());
    assert_eq!(ctx.digest.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn get_to_file_keeps_corrupted_file() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    object.put("hello, world").await.unwrap();

    ctx.server.force_etag("00000000000000000000000000000000");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("download.bin");
    let err = object.get_to_file(&path).await.unwrap_err();
    assert!(matches!(err, Error::CorruptedDownload { .. }));
    assert_eq!(std::fs::read(&path).unwrap(), b"hello, world");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn failed_get_to_file_leaves_existing_file() {
    let ctx = TestContext::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("download.bin");
    std::fs::write(&path, b"previous contents").unwrap();

    let mut missing = ctx.rand_object();
    let err = missing.get_to_file(&path).await.unwrap_err();
    assert!(matches!(err, Error::Request(resp) if resp.status == 404));
    assert_eq!(std::fs::read(&path).unwrap(), b"previous contents");

    let mut object = ctx.rand_object();
    object.put("new contents").await.unwrap();
    ctx.server.fail_next(403, "AccessDenied");
    assert!(matches!(
        object.get_to_file(&path).await,
        Err(Error::Request(resp)) if resp.code == "AccessDenied"
    ));
    ctx.server.fail_next_network("connection reset");
    assert!(matches!(
        object.get_to_file(&path).await,
        Err(Error::Network(_))
    ));
    assert_eq!(std::fs::read(&path).unwrap(), b"previous contents");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    object.get_to_file(&path).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"new contents");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn failed_put_is_an_upload_error() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();

    ctx.server.fail_next(403, "AccessDenied");
    match object.put("data").await.unwrap_err() {
        Error::Upload(resp) => {
            assert_eq!(resp.status, 403);
            assert_eq!(resp.code, "AccessDenied");
        }
        e => panic!("unexpected error: {e:?}"),
    }
    assert!(ctx.server.object(&ctx.bucket, object.key()).is_none());
}
