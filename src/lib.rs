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

//! # Object operations for S3 compatible storage (`s3object`)
//!
//! This crate provides an async, strongly-typed engine for working with single
//! objects stored in Amazon S3 compatible object storage: single-shot
//! PUT/GET/HEAD/DELETE, the multipart upload sequence, Glacier restores, and
//! content integrity verification.
//!
//! Every wire operation has a request builder (e.g. [`s3::builders::PutObject`],
//! [`s3::builders::UploadPart`]) implementing [`s3::types::ToS3Request`] and
//! [`s3::types::S3Api`]. The [`s3::Object`] handle is the public-facing surface
//! that orchestrates them.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use s3object::s3::{ClientBuilder, Object};
//! use s3object::s3::creds::StaticProvider;
//! use s3object::s3::http::BaseUrl;
//!
//! #[tokio::main]
//! async fn main() {
//!     let base_url: BaseUrl = "http://localhost:9000".parse().unwrap();
//!     let client = ClientBuilder::new(base_url)
//!         .provider(Some(StaticProvider::new("minioadmin", "minioadmin", None)))
//!         .build()
//!         .unwrap();
//!
//!     let mut object = Object::new(&client, "my-bucket", "hello.txt").unwrap();
//!     object.put("hello, world").await.expect("upload failed");
//!     let content = object.get().await.expect("download failed");
//!     assert_eq!(content.as_ref(), b"hello, world");
//! }
//! ```
//!
//! ## Design
//! - Request signing and HTTP transport are collaborators behind the
//!   [`s3::signer::Signer`] and [`s3::http::Transport`] traits; defaults are
//!   provided (`SigV4Signer`, `ReqwestTransport`).
//! - Builders implement [`s3::types::ToS3Request`] for request conversion and
//!   [`s3::types::S3Api`] for execution
//! - Responses implement [`s3::types::FromS3Response`]

#![allow(clippy::result_large_err)]
pub mod s3;

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
