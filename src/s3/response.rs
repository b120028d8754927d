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

//! Responses for [`Client`](crate::s3::client::Client) APIs

mod delete_object;
mod get_object;
mod head_object;
mod multipart_upload;
mod put_object;
mod restore_object;

pub use delete_object::DeleteObjectResponse;
pub use get_object::GetObjectResponse;
pub use head_object::{HeadObjectResponse, available_from_metadata, canonical_metadata_name};
pub use multipart_upload::{
    AbortMultipartUploadResponse, CompleteMultipartUploadResponse,
    CreateMultipartUploadResponse, UploadPartResponse,
};
pub use put_object::PutObjectResponse;
pub use restore_object::RestoreObjectResponse;
