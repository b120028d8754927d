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

//! S3 client: endpoint, credentials and the transport/signing collaborators
//! shared by all object operations.
//!
//! # HTTP Version Support
//!
//! The default [`ReqwestTransport`] negotiates HTTP/2 via ALPN when the
//! `http2` feature is enabled (the default) and falls back to HTTP/1.1.

use http::Method;
use std::fmt::Debug;
use std::mem;
use std::sync::Arc;

use crate::s3::creds::Provider;
use crate::s3::error::Error;
use crate::s3::http::{BaseUrl, HttpRequest, HttpResponse, ReqwestTransport, ResponseSink, Transport, Url};
use crate::s3::multimap_ext::Multimap;
use crate::s3::object_content::ObjectContent;
use crate::s3::signer::{AnonymousSigner, SigV4Signer, Signer};
use crate::s3::utils::{FileDigest, Md5FileDigest, utc_now};

mod abort_multipart_upload;
mod complete_multipart_upload;
mod create_multipart_upload;
mod delete_object;
mod get_object;
mod head_object;
mod put_object;
mod restore_object;
mod upload_part;

/// The default AWS region to be used if no other region is specified.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Minimum allowed size (in bytes) for a multipart upload part (except the last).
pub const MIN_PART_SIZE: u64 = 5_242_880; // 5 MiB
/// Maximum allowed size (in bytes) for a single multipart upload part.
pub const MAX_PART_SIZE: u64 = 5_368_709_120; // 5 GiB
/// Maximum allowed size (in bytes) for a single object upload.
pub const MAX_OBJECT_SIZE: u64 = 5_497_558_138_880; // 5 TiB
/// Maximum number of parts allowed in a multipart upload.
pub const MAX_MULTIPART_COUNT: u16 = 10_000;

/// Client Builder manufactures a Client using given parameters.
///
/// Signing and transport are pluggable; unset collaborators default to
/// [`SigV4Signer`] (or [`AnonymousSigner`] without a provider) and
/// [`ReqwestTransport`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: BaseUrl,
    /// Set the credential provider. If not, set anonymous access is used.
    provider: Option<Arc<dyn Provider>>,
    signer: Option<Arc<dyn Signer>>,
    transport: Option<Arc<dyn Transport>>,
    file_digest: Option<Arc<dyn FileDigest>>,
    region: Option<String>,
    /// Set flag to ignore certificate check. This is insecure and should only be used for testing.
    ignore_cert_check: Option<bool>,
    /// Set the app info as an Option of (app_name, app_version) pair. This will show up in the client's user-agent.
    app_info: Option<(String, String)>,
}

impl ClientBuilder {
    /// Creates a builder given a base URL for the S3 compatible service.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            provider: None,
            signer: None,
            transport: None,
            file_digest: None,
            region: None,
            ignore_cert_check: None,
            app_info: None,
        }
    }

    /// Set the credential provider. If not, set anonymous access is used.
    pub fn provider<P: Provider + 'static>(mut self, provider: Option<P>) -> Self {
        self.provider = provider.map(|p| Arc::new(p) as Arc<dyn Provider>);
        self
    }

    /// Replace the request signer. Takes precedence over [`provider`](Self::provider).
    pub fn signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the whole-file digest used by file uploads and downloads.
    pub fn file_digest(mut self, file_digest: Arc<dyn FileDigest>) -> Self {
        self.file_digest = Some(file_digest);
        self
    }

    /// Region used in request signatures; defaults to `us-east-1`.
    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the app info as an Option of (app_name, app_version) pair. This will
    /// show up in the client's user-agent.
    pub fn app_info(mut self, app_info: Option<(String, String)>) -> Self {
        self.app_info = app_info;
        self
    }

    /// Set flag to ignore certificate check. This is insecure and should only
    /// be used for testing.
    pub fn ignore_cert_check(mut self, ignore_cert_check: Option<bool>) -> Self {
        self.ignore_cert_check = ignore_cert_check;
        self
    }

    fn build_transport(&self) -> Result<Arc<dyn Transport>, Error> {
        // Content must reach the caller exactly as stored, or etags stop matching.
        let mut builder = reqwest::Client::builder().no_gzip();

        let mut user_agent = String::from("s3object (")
            + std::env::consts::OS
            + "; "
            + std::env::consts::ARCH
            + ") s3object-rs/"
            + env!("CARGO_PKG_VERSION");
        if let Some((app_name, app_version)) = &self.app_info {
            user_agent.push_str(format!(" {app_name}/{app_version}").as_str());
        }
        builder = builder.user_agent(user_agent);

        #[cfg(any(
            feature = "default-tls",
            feature = "native-tls",
            feature = "rustls-tls"
        ))]
        if let Some(v) = self.ignore_cert_check {
            builder = builder.danger_accept_invalid_certs(v);
        }

        Ok(Arc::new(ReqwestTransport::new(builder.build()?)))
    }

    /// Build the Client.
    pub fn build(self) -> Result<Client, Error> {
        let transport = match &self.transport {
            Some(t) => Arc::clone(t),
            None => self.build_transport()?,
        };
        let signer: Arc<dyn Signer> = match (self.signer, self.provider) {
            (Some(signer), _) => signer,
            (None, Some(provider)) => Arc::new(SigV4Signer::new(provider)),
            (None, None) => Arc::new(AnonymousSigner),
        };

        Ok(Client {
            shared: Arc::new(SharedClientItems {
                base_url: self.base_url,
                region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
                transport,
                signer,
                file_digest: self.file_digest.unwrap_or_else(|| Arc::new(Md5FileDigest)),
            }),
        })
    }
}

/// Handle to an S3 compatible service. Cheap to clone; clones share the
/// same collaborators.
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) shared: Arc<SharedClientItems>,
}

#[derive(Debug)]
pub(crate) struct SharedClientItems {
    pub(crate) base_url: BaseUrl,
    pub(crate) region: String,
    transport: Arc<dyn Transport>,
    signer: Arc<dyn Signer>,
    pub(crate) file_digest: Arc<dyn FileDigest>,
}

impl Client {
    /// Returns whether this client is configured to use HTTPS.
    pub fn is_secure(&self) -> bool {
        self.shared.base_url.https
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.shared.base_url
    }

    pub fn region(&self) -> &str {
        &self.shared.region
    }

    pub(crate) fn file_digest(&self) -> &dyn FileDigest {
        self.shared.file_digest.as_ref()
    }

    /// Unsigned URL of an object.
    pub fn object_url(&self, bucket: &str, object: &str) -> String {
        self.shared
            .base_url
            .build_url(&Multimap::new(), bucket, Some(object))
            .to_string()
    }

    /// URL of an object carrying a signature valid for `expires` seconds.
    pub fn presigned_url(
        &self,
        method: &Method,
        bucket: &str,
        object: &str,
        query_params: &Multimap,
        expires: u32,
    ) -> Result<String, Error> {
        let mut url = self
            .shared
            .base_url
            .build_url(query_params, bucket, Some(object));
        self.shared
            .signer
            .presign(method, &mut url, &self.shared.region, expires, utc_now())?;
        Ok(url.to_string())
    }

    fn prepare_request(
        &self,
        method: Method,
        headers: &mut Multimap,
        query_params: &Multimap,
        bucket: &str,
        object: Option<&str>,
        body: Option<ObjectContent>,
    ) -> Result<HttpRequest, Error> {
        let url: Url = self.shared.base_url.build_url(query_params, bucket, object);
        let mut req = HttpRequest {
            method,
            url,
            headers: mem::take(headers),
            body,
        };
        self.shared
            .signer
            .sign(&mut req, &self.shared.region, utc_now())?;
        Ok(req)
    }

    fn log_response(req: &HttpRequest, resp: &Result<HttpResponse, Error>) {
        match resp {
            Ok(r) if r.is_success() => {
                log::debug!("{} {} -> {}", req.method, req.url, r.status)
            }
            Ok(r) => log::debug!(
                "{} {} -> {} ({} byte error body)",
                req.method,
                req.url,
                r.status,
                r.body.len()
            ),
            Err(e) => log::warn!("{} {} failed: {e}", req.method, req.url),
        }
    }

    pub(crate) async fn execute(
        &self,
        method: Method,
        headers: &mut Multimap,
        query_params: &Multimap,
        bucket: &str,
        object: Option<&str>,
        body: Option<ObjectContent>,
    ) -> Result<HttpResponse, Error> {
        let mut req = self.prepare_request(method, headers, query_params, bucket, object, body)?;
        let resp = self.shared.transport.execute(&mut req).await;
        Self::log_response(&req, &resp);
        *headers = req.headers;
        resp
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn execute_streaming(
        &self,
        method: Method,
        headers: &mut Multimap,
        query_params: &Multimap,
        bucket: &str,
        object: Option<&str>,
        body: Option<ObjectContent>,
        sink: &mut dyn ResponseSink,
    ) -> Result<HttpResponse, Error> {
        let mut req = self.prepare_request(method, headers, query_params, bucket, object, body)?;
        let resp = self.shared.transport.execute_streaming(&mut req, sink).await;
        Self::log_response(&req, &resp);
        *headers = req.headers;
        resp
    }
}

impl TryFrom<&str> for Client {
    type Error = Error;

    /// Anonymous client for `base_url`, using the default transport.
    fn try_from(base_url: &str) -> Result<Self, Self::Error> {
        let base_url: BaseUrl = base_url.parse()?;
        ClientBuilder::new(base_url).build()
    }
}
