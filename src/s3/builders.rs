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

//! Argument builders for [`Client`](crate::s3::client::Client) APIs

mod delete_object;
mod get_object;
mod head_object;
mod multipart_upload;
pub mod object_headers;
mod put_object;
mod restore_object;

pub use delete_object::*;
pub use get_object::*;
pub use head_object::*;
pub use multipart_upload::*;
pub use put_object::*;
pub use restore_object::*;
