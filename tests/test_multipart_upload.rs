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
use s3object::s3::client::MIN_PART_SIZE;
use s3object::s3::error::{Error, ValidationErr};
use s3object::s3::multipart::{InitiateOptions, MultipartState, PartOptions};
use s3object::s3::response_traits::{HasEtagFromBody, HasEtagFromHeaders};
use s3object::s3::types::ObjectMetadata;
use s3object::s3::utils::{digest, is_multipart_etag};
use s3object_common::test_context::TestContext;
use s3object_common::utils::{rand_bytes, temp_file_with};

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn coordinator_walks_the_full_lifecycle() {
    let ctx = TestContext::new();
    let object = ctx.rand_object().with_metadata(
        ObjectMetadata::builder()
            .content_type("application/x-tar")
            .user_metadata(vec![("Origin".to_string(), "backup".to_string())])
            .build(),
    );
    let first = rand_bytes(1024);
    let second = rand_bytes(512);

    let mut upload = object.multipart_upload();
    assert_eq!(upload.state(), MultipartState::NotStarted);

    let upload_id = upload.initiate(InitiateOptions::default()).await.unwrap();
    assert_eq!(upload.state(), MultipartState::Initiated);
    assert_eq!(upload.upload_id(), Some(upload_id.as_str()));
    let initiate = ctx.server.last_request().unwrap();
    assert_eq!(initiate.method, Method::POST);
    assert_eq!(initiate.header("Content-Type"), Some("application/x-tar"));
    assert_eq!(initiate.header("x-amz-meta-origin"), Some("backup"));

    upload
        .put_part(1, first.clone(), PartOptions::default())
        .await
        .unwrap();
    let resp = upload
        .put_part(2, second.clone(), PartOptions::default())
        .await
        .unwrap();
    assert_eq!(resp.etag(), Some(digest(&second).0));
    assert_eq!(upload.state(), MultipartState::PartUploading);
    let numbers: Vec<u16> = upload.parts().iter().map(|p| p.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    let resp = upload.complete().await.unwrap();
    let etag = resp.etag().unwrap();
    assert!(is_multipart_etag(&etag));
    assert!(etag.ends_with("-2"));
    assert_eq!(upload.state(), MultipartState::Completed);
    assert!(upload.parts().is_empty());

    let stored = ctx.server.object(&ctx.bucket, object.key()).unwrap();
    let mut expected = BytesMut::from(first.as_ref());
    expected.extend_from_slice(&second);
    assert_eq!(stored.content, expected.freeze());
    assert_eq!(stored.headers["x-amz-meta-origin"], "backup");
    assert_eq!(ctx.server.uploads_in_progress(), 0);

    let err = upload
        .put_part(3, Bytes::from_static(b"late"), PartOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationErr::InvalidMultipartState { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn part_options_control_content_md5() {
    let ctx = TestContext::new();
    let object = ctx.rand_object();
    let upload_id = object
        .initiate_multipart_upload(InitiateOptions::default())
        .await
        .unwrap();

    object
        .put_part(&upload_id, 1, "abc", PartOptions::default())
        .await
        .unwrap();
    assert!(ctx.server.last_request().unwrap().header("Content-MD5").is_some());

    let options = PartOptions {
        send_content_md5: false,
        ..Default::default()
    };
    object.put_part(&upload_id, 2, "def", options).await.unwrap();
    let req = ctx.server.last_request().unwrap();
    assert!(req.header("Content-MD5").is_none());
    assert_eq!(req.header("Content-Length"), Some("3"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn object_level_multipart_operations() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    let data = rand_bytes(2048);

    let upload_id = object
        .initiate_multipart_upload(InitiateOptions::default())
        .await
        .unwrap();
    let part = object
        .put_part(&upload_id, 1, data.clone(), PartOptions::default())
        .await
        .unwrap();
    let etag = part.etag().unwrap();
    object
        .complete_multipart_upload(&upload_id, vec![1], vec![etag])
        .await
        .unwrap();

    let final_etag = object.metadata().etag().unwrap().to_string();
    assert!(is_multipart_etag(&final_etag));
    // A multipart etag is not an MD5 of the content, so no check is made.
    assert_eq!(object.get().await.unwrap(), data);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn complete_with_mismatched_lists_sends_nothing() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();

    let err = object
        .complete_multipart_upload(
            "upload-1",
            vec![1, 2],
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationErr::PartListMismatch { parts: 2, etags: 3 })
    ));
    assert_eq!(ctx.server.request_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn initiate_without_upload_id_is_a_protocol_error() {
    let ctx = TestContext::new();
    ctx.server.omit_upload_id();

    let object = ctx.rand_object();
    let mut upload = object.multipart_upload();
    let err = upload.initiate(InitiateOptions::default()).await.unwrap_err();
    assert!(matches!(err, Error::Protocol(_)));
    assert_eq!(upload.state(), MultipartState::NotStarted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn abort_releases_parts_and_surfaces_repeat_errors() {
    let ctx = TestContext::new();
    let object = ctx.rand_object();
    let mut upload = object.multipart_upload();
    upload.initiate(InitiateOptions::default()).await.unwrap();
    upload
        .put_part(1, Bytes::from_static(b"part"), PartOptions::default())
        .await
        .unwrap();
    assert_eq!(ctx.server.uploads_in_progress(), 1);

    upload.abort().await.unwrap();
    assert_eq!(upload.state(), MultipartState::Aborted);
    assert_eq!(ctx.server.uploads_in_progress(), 0);

    match upload.abort().await.unwrap_err() {
        Error::Request(resp) => assert_eq!(resp.code, "NoSuchUpload"),
        e => panic!("unexpected error: {e:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn failed_part_is_an_upload_error_and_records_nothing() {
    let ctx = TestContext::new();
    let object = ctx.rand_object();
    let mut upload = object.multipart_upload();
    upload.initiate(InitiateOptions::default()).await.unwrap();

    ctx.server.fail_next(500, "InternalError");
    let err = upload
        .put_part(1, Bytes::from_static(b"part"), PartOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Upload(resp) if resp.status == 500));
    assert!(upload.parts().is_empty());

    // The same part number may be sent again.
    upload
        .put_part(1, Bytes::from_static(b"part"), PartOptions::default())
        .await
        .unwrap();
    assert_eq!(upload.parts().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn multipart_from_file_uploads_every_part() {
    let ctx = TestContext::new();
    let data = rand_bytes((2 * MIN_PART_SIZE + 1024) as usize);
    let file = temp_file_with(&data);

    let mut object = ctx.rand_object();
    let resp = object
        .put_multipart_from_file(file.path(), Some(MIN_PART_SIZE))
        .await
        .unwrap();
    assert!(resp.etag().unwrap().ends_with("-3"));

    let parts = ctx
        .server
        .requests()
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .count();
    assert_eq!(parts, 3);
    let stored = ctx.server.object(&ctx.bucket, object.key()).unwrap();
    assert_eq!(stored.content, data);
    assert_eq!(object.metadata().size(), Some(data.len() as u64));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn multipart_from_small_file_uses_one_part() {
    let ctx = TestContext::new();
    let file = temp_file_with(b"small file");

    let mut object = ctx.rand_object();
    let resp = object
        .put_multipart_from_file(file.path(), None)
        .await
        .unwrap();
    assert!(resp.etag().unwrap().ends_with("-1"));
    assert_eq!(object.get().await.unwrap().as_ref(), b"small file");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn multipart_from_file_aborts_on_failure() {
    let ctx = TestContext::new();
    let data = rand_bytes((MIN_PART_SIZE + 10) as usize);
    let file = temp_file_with(&data);

    // initiate, part 1, then part 2 fails
    ctx.server.fail_nth(3, 503, "SlowDown");
    let mut object = ctx.rand_object();
    let err = object
        .put_multipart_from_file(file.path(), Some(MIN_PART_SIZE))
        .await
        .unwrap_err();
    match err {
        Error::Upload(resp) => assert_eq!(resp.code, "SlowDown"),
        e => panic!("unexpected error: {e:?}"),
    }

    let last = ctx.server.last_request().unwrap();
    assert_eq!(last.method, Method::DELETE);
    assert!(last.query.contains_key("uploadId"));
    assert_eq!(ctx.server.uploads_in_progress(), 0);
    assert!(ctx.server.object(&ctx.bucket, object.key()).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn multipart_from_file_rejects_small_parts() {
    let ctx = TestContext::new();
    let file = temp_file_with(b"content");

    let mut object = ctx.rand_object();
    let err = object
        .put_multipart_from_file(file.path(), Some(1024))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationErr::InvalidMinPartSize(1024))
    ));
    assert_eq!(ctx.server.request_count(), 0);
}
