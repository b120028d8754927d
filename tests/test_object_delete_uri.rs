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

use chrono::Duration;
use http::Method;
use s3object::s3::error::{Error, ValidationErr};
use s3object::s3::multimap_ext::{Multimap, MultimapExt};
use s3object::s3::types::ObjectMetadata;
use s3object::s3::utils::utc_now;
use s3object_common::test_context::TestContext;

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn delete_removes_the_object() {
    let ctx = TestContext::new();
    let mut object = ctx.rand_object();
    object.put("short lived").await.unwrap();
    assert!(object.exists().await.unwrap());

    object.delete().await.unwrap();
    assert_eq!(ctx.server.last_request().unwrap().method, Method::DELETE);
    assert!(!object.exists().await.unwrap());

    // Deleting again is up to the service, which accepts it here.
    object.delete().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 10)]
async fn delete_failure_is_a_request_error() {
    let ctx = TestContext::new();
    let object = ctx.rand_object();
    ctx.server.fail_next(403, "AccessDenied");
    assert!(matches!(
        object.delete().await,
        Err(Error::Request(resp)) if resp.code == "AccessDenied"
    ));
}

#[test]
fn uri_addresses_the_object() {
    let ctx = TestContext::new();
    let object = ctx.object("reports/2024 q1.csv");
    assert_eq!(
        object.uri(),
        format!("http://localhost:9000/{}/reports/2024%20q1.csv", ctx.bucket)
    );
}

#[test]
fn signed_uri_uses_metadata_expiry() {
    let ctx = TestContext::new();
    let object = ctx.object("key");
    assert!(matches!(
        object.query_string_authentication_uri(None, None),
        Err(Error::Validation(ValidationErr::MissingExpiry))
    ));

    let expires = utc_now() + Duration::minutes(10);
    let object = object.with_metadata(ObjectMetadata::builder().expires(expires).build());
    let mut extra = Multimap::new();
    extra.add("response-content-disposition", "attachment");
    let uri = object
        .query_string_authentication_uri(None, Some(extra))
        .unwrap();

    assert!(uri.starts_with(&format!("http://localhost:9000/{}/key?", ctx.bucket)));
    assert!(uri.contains("X-Amz-Algorithm=AWS4-HMAC-SHA256"));
    assert!(uri.contains("X-Amz-Signature="));
    assert!(uri.contains("response-content-disposition=attachment"));
    let seconds: u32 = uri
        .split(['?', '&'])
        .find_map(|p| p.strip_prefix("X-Amz-Expires="))
        .unwrap()
        .parse()
        .unwrap();
    assert!((590..=600).contains(&seconds));
    // Signing makes no request.
    assert_eq!(ctx.server.request_count(), 0);
}

#[test]
fn signed_uri_in_the_past_is_clamped() {
    let ctx = TestContext::new();
    let object = ctx.object("key");
    let uri = object
        .query_string_authentication_uri(Some(utc_now() - Duration::hours(1)), None)
        .unwrap();
    let seconds = uri
        .split(['?', '&'])
        .find_map(|p| p.strip_prefix("X-Amz-Expires="));
    assert_eq!(seconds, Some("1"));
}
