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

//! In-memory S3 service behind the [`Transport`] seam.
//!
//! Handles the object operations of the crate: PUT, GET, HEAD, DELETE,
//! restore and the multipart sequence. Every request is recorded, and
//! failures, etags and response headers can be injected.

use async_trait::async_trait;
use bytes::{Buf, Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use s3object::s3::error::{Error, NetworkError};
use s3object::s3::http::{HttpRequest, HttpResponse, Transport};
use s3object::s3::multimap_ext::{Multimap, MultimapExt};
use s3object::s3::object_content::ObjectContent;
use s3object::s3::utils::{
    digest, md5sum_hash, to_http_header_value, trim_quotes, urlencode_object_key, utc_now,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use xmltree::Element;

/// Request headers kept with a stored object and returned on GET/HEAD.
const STORED_HEADERS: [&str; 8] = [
    "content-type",
    "content-encoding",
    "content-disposition",
    "cache-control",
    "expires",
    "x-amz-storage-class",
    "x-amz-website-redirect-location",
    "x-amz-server-side-encryption",
];

/// A request as the service received it, after signing.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Multimap,
    pub headers: Multimap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get_ci(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct StoredObject {
    pub content: Bytes,
    pub etag: String,
    /// Lower-cased header name to value
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct Upload {
    path: String,
    headers: BTreeMap<String, String>,
    parts: BTreeMap<u16, (String, Bytes)>,
}

enum Injected {
    Status(u16, String),
    Network(String),
}

#[derive(Default)]
struct State {
    objects: HashMap<String, StoredObject>,
    uploads: HashMap<String, Upload>,
    next_upload: u64,
    requests: Vec<RecordedRequest>,
    /// One entry per upcoming request; `None` lets it through.
    injected: VecDeque<Option<Injected>>,
    forced_etag: Option<String>,
    response_headers: Vec<(String, String)>,
    omit_upload_id: bool,
    interrupt_file_body_after: Option<usize>,
    file_chunks_read: usize,
}

/// In-memory S3 service. Objects are keyed by request path.
#[derive(Default)]
pub struct MemoryS3 {
    state: Mutex<State>,
}

impl std::fmt::Debug for MemoryS3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryS3").finish_non_exhaustive()
    }
}

fn object_path(bucket: &str, key: &str) -> String {
    format!("/{bucket}/{}", urlencode_object_key(key))
}

impl MemoryS3 {
    // region: inspection and injection

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let path = object_path(bucket, key);
        self.state.lock().unwrap().objects.get(&path).cloned()
    }

    /// Stores an object directly, bypassing the request path.
    pub fn insert_object(&self, bucket: &str, key: &str, content: Bytes, headers: &[(&str, &str)]) {
        let object = StoredObject {
            etag: digest(&content).0,
            content,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect(),
        };
        let path = object_path(bucket, key);
        self.state.lock().unwrap().objects.insert(path, object);
    }

    pub fn uploads_in_progress(&self) -> usize {
        self.state.lock().unwrap().uploads.len()
    }

    fn inject(&self, nth: usize, failure: Injected) {
        let mut state = self.state.lock().unwrap();
        state.injected.clear();
        state.injected.extend((1..nth).map(|_| None));
        state.injected.push_back(Some(failure));
    }

    /// Answers the next request with `status` and an S3 error document.
    pub fn fail_next(&self, status: u16, code: &str) {
        self.fail_nth(1, status, code);
    }

    /// Answers the `nth` upcoming request (1 based) with `status` and an S3
    /// error document.
    pub fn fail_nth(&self, nth: usize, status: u16, code: &str) {
        self.inject(nth, Injected::Status(status, code.to_string()));
    }

    /// Fails the next request without a response, as a dropped connection.
    pub fn fail_next_network(&self, message: &str) {
        self.inject(1, Injected::Network(message.to_string()));
    }

    /// Reports `etag` on every GET and HEAD instead of the stored one.
    pub fn force_etag(&self, etag: &str) {
        self.state.lock().unwrap().forced_etag = Some(etag.to_string());
    }

    /// Adds a header to every GET and HEAD response.
    pub fn add_response_header(&self, name: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .response_headers
            .push((name.to_string(), value.to_string()));
    }

    /// Initiate responses leave out `<UploadId>`.
    pub fn omit_upload_id(&self) {
        self.state.lock().unwrap().omit_upload_id = true;
    }

    /// The next file body breaks off after `chunks` chunks and is read again
    /// from a reset reader, as a transport retry would.
    pub fn interrupt_file_body_after(&self, chunks: usize) {
        self.state.lock().unwrap().interrupt_file_body_after = Some(chunks);
    }

    /// Chunks pulled from file bodies so far, interrupted reads included.
    pub fn file_chunks_read(&self) -> usize {
        self.state.lock().unwrap().file_chunks_read
    }

    // endregion: inspection and injection

    async fn read_body(&self, body: &mut Option<ObjectContent>) -> Result<Bytes, Error> {
        let reader = match body {
            None => return Ok(Bytes::new()),
            Some(ObjectContent::Bytes(b)) => return Ok(b.clone()),
            Some(ObjectContent::File(reader)) => reader,
        };

        let mut interrupt_after = self.state.lock().unwrap().interrupt_file_body_after.take();
        let mut buf = BytesMut::new();
        let mut chunks = 0;
        loop {
            let chunk = reader.next_chunk().await?;
            self.state.lock().unwrap().file_chunks_read += 1;
            if chunk.is_empty() {
                break;
            }
            chunks += 1;
            buf.extend_from_slice(&chunk);
            if interrupt_after == Some(chunks) {
                log::debug!("interrupting file body after {chunks} chunks");
                interrupt_after = None;
                reader.reset();
                buf.clear();
                chunks = 0;
            }
        }
        Ok(buf.freeze())
    }

    fn handle(&self, req: RecordedRequest) -> HttpResponse {
        let mut state = self.state.lock().unwrap();
        state.requests.push(req.clone());

        if let Some(Some(Injected::Status(status, code))) = state.injected.pop_front() {
            return error_response(status, &code);
        }

        let query = &req.query;
        match req.method {
            Method::PUT if query.contains_key("uploadId") => state.upload_part(&req),
            Method::PUT => state.put_object(&req),
            Method::POST if query.contains_key("uploads") => state.create_upload(&req),
            Method::POST if query.contains_key("uploadId") => state.complete_upload(&req),
            Method::POST if query.contains_key("restore") => state.restore(&req),
            Method::DELETE if query.contains_key("uploadId") => state.abort_upload(&req),
            Method::DELETE => {
                state.objects.remove(&req.path);
                response(204, HeaderMap::new(), Bytes::new())
            }
            Method::GET | Method::HEAD => state.read_object(&req),
            _ => error_response(405, "MethodNotAllowed"),
        }
    }
}

impl State {
    fn check_body(req: &RecordedRequest) -> Option<HttpResponse> {
        if let Some(len) = req.header("Content-Length") {
            if len.parse::<usize>().ok() != Some(req.body.len()) {
                return Some(error_response(400, "IncompleteBody"));
            }
        }
        if let Some(md5) = req.header("Content-MD5") {
            if md5 != md5sum_hash(&req.body) {
                return Some(error_response(400, "BadDigest"));
            }
        }
        None
    }

    fn stored_headers(req: &RecordedRequest) -> BTreeMap<String, String> {
        req.headers
            .iter()
            .filter_map(|(k, v)| {
                let k = k.to_ascii_lowercase();
                (STORED_HEADERS.contains(&k.as_str()) || k.starts_with("x-amz-meta-"))
                    .then(|| (k, v.clone()))
            })
            .collect()
    }

    fn put_object(&mut self, req: &RecordedRequest) -> HttpResponse {
        if let Some(resp) = Self::check_body(req) {
            return resp;
        }
        let etag = digest(&req.body).0;
        self.objects.insert(
            req.path.clone(),
            StoredObject {
                content: req.body.clone(),
                etag: etag.clone(),
                headers: Self::stored_headers(req),
            },
        );
        response(200, etag_headers(&etag), Bytes::new())
    }

    fn create_upload(&mut self, req: &RecordedRequest) -> HttpResponse {
        self.next_upload += 1;
        let upload_id = format!("upload-{}", self.next_upload);
        self.uploads.insert(
            upload_id.clone(),
            Upload {
                path: req.path.clone(),
                headers: Self::stored_headers(req),
                parts: BTreeMap::new(),
            },
        );
        let id_element = if self.omit_upload_id {
            String::new()
        } else {
            format!("<UploadId>{upload_id}</UploadId>")
        };
        let body = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<InitiateMultipartUploadResult>\
<Bucket>bucket</Bucket><Key>{}</Key>{id_element}</InitiateMultipartUploadResult>",
            req.path
        );
        response(200, HeaderMap::new(), Bytes::from(body))
    }

    fn upload_part(&mut self, req: &RecordedRequest) -> HttpResponse {
        if let Some(resp) = Self::check_body(req) {
            return resp;
        }
        let upload_id = req.query.get("uploadId").cloned().unwrap_or_default();
        let Some(upload) = self.uploads.get_mut(&upload_id) else {
            return error_response(404, "NoSuchUpload");
        };
        let Some(part_number) = req.query.get("partNumber").and_then(|n| n.parse().ok()) else {
            return error_response(400, "InvalidArgument");
        };
        let etag = digest(&req.body).0;
        upload
            .parts
            .insert(part_number, (etag.clone(), req.body.clone()));
        response(200, etag_headers(&etag), Bytes::new())
    }

    fn complete_upload(&mut self, req: &RecordedRequest) -> HttpResponse {
        let upload_id = req.query.get("uploadId").cloned().unwrap_or_default();
        let Some(upload) = self.uploads.get(&upload_id) else {
            return error_response(404, "NoSuchUpload");
        };
        let Ok(root) = Element::parse(req.body.clone().reader()) else {
            return error_response(400, "MalformedXML");
        };

        let mut content = BytesMut::new();
        let mut md5s = Vec::new();
        let mut count = 0;
        for part in root.children.iter().filter_map(|c| c.as_element()) {
            let text = |tag: &str| {
                part.get_child(tag)
                    .and_then(|e| e.get_text())
                    .map(|t| t.to_string())
                    .unwrap_or_default()
            };
            let number: u16 = text("PartNumber").parse().unwrap_or(0);
            let etag = text("ETag");
            match upload.parts.get(&number) {
                Some((stored, data)) if stored == trim_quotes(&etag) => {
                    content.extend_from_slice(data);
                    md5s.extend_from_slice(&md5_raw(data));
                    count += 1;
                }
                _ => return error_response(400, "InvalidPart"),
            }
        }

        let etag = format!("{}-{count}", digest(&md5s).0);
        let Some(upload) = self.uploads.remove(&upload_id) else {
            return error_response(404, "NoSuchUpload");
        };
        self.objects.insert(
            upload.path,
            StoredObject {
                content: content.freeze(),
                etag: etag.clone(),
                headers: upload.headers,
            },
        );
        let body = format!(
            "<CompleteMultipartUploadResult><ETag>\"{etag}\"</ETag></CompleteMultipartUploadResult>"
        );
        response(200, HeaderMap::new(), Bytes::from(body))
    }

    fn abort_upload(&mut self, req: &RecordedRequest) -> HttpResponse {
        let upload_id = req.query.get("uploadId").cloned().unwrap_or_default();
        match self.uploads.remove(&upload_id) {
            Some(_) => response(204, HeaderMap::new(), Bytes::new()),
            None => error_response(404, "NoSuchUpload"),
        }
    }

    fn restore(&mut self, req: &RecordedRequest) -> HttpResponse {
        let Some(object) = self.objects.get_mut(&req.path) else {
            return error_response(404, "NoSuchKey");
        };
        object.headers.insert(
            "x-amz-restore".to_string(),
            "ongoing-request=\"true\"".to_string(),
        );
        response(202, HeaderMap::new(), Bytes::new())
    }

    fn read_object(&self, req: &RecordedRequest) -> HttpResponse {
        let Some(object) = self.objects.get(&req.path) else {
            if req.method == Method::HEAD {
                return response(404, HeaderMap::new(), Bytes::new());
            }
            return error_response(404, "NoSuchKey");
        };

        let etag = self.forced_etag.as_deref().unwrap_or(&object.etag);
        let mut headers = etag_headers(etag);
        for (k, v) in object
            .headers
            .iter()
            .chain(self.response_headers.iter().map(|(k, v)| (k, v)))
        {
            headers.append(header_name(k), header_value(v));
        }
        headers.insert(
            header_name("content-length"),
            header_value(&object.content.len().to_string()),
        );
        headers.insert(
            header_name("last-modified"),
            header_value(&to_http_header_value(utc_now())),
        );
        headers.insert(header_name("accept-ranges"), header_value("bytes"));
        headers.insert(header_name("x-amz-id-2"), header_value("memory-host-id"));
        headers.insert(header_name("x-amz-request-id"), header_value("memory-request"));

        let body = if req.method == Method::HEAD {
            Bytes::new()
        } else {
            object.content.clone()
        };
        response(200, headers, body)
    }
}

fn md5_raw(data: &[u8]) -> Vec<u8> {
    let hex = digest(data).0;
    (0..hex.len())
        .step_by(2)
        .filter_map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

fn header_name(name: &str) -> HeaderName {
    HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()).unwrap()
}

fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}

fn etag_headers(etag: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header_name("etag"), header_value(&format!("\"{etag}\"")));
    headers
}

fn response(status: u16, headers: HeaderMap, body: Bytes) -> HttpResponse {
    HttpResponse {
        status,
        headers,
        body,
    }
}

fn error_response(status: u16, code: &str) -> HttpResponse {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error><Code>{code}</Code>\
<Message>{code}</Message><Resource>/</Resource><RequestId>memory-request</RequestId></Error>"
    );
    response(status, HeaderMap::new(), Bytes::from(body))
}

#[async_trait]
impl Transport for MemoryS3 {
    async fn execute(&self, req: &mut HttpRequest) -> Result<HttpResponse, Error> {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(Some(Injected::Network(_))) = state.injected.front() {
                if let Some(Some(Injected::Network(message))) = state.injected.pop_front() {
                    return Err(NetworkError::Other(message).into());
                }
            }
        }

        let body = self.read_body(&mut req.body).await?;
        let recorded = RecordedRequest {
            method: req.method.clone(),
            path: req.url.path.clone(),
            query: req.url.query.clone(),
            headers: req.headers.clone(),
            body,
        };
        log::trace!("{} {}", recorded.method, recorded.path);
        Ok(self.handle(recorded))
    }
}
