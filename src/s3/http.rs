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

//! HTTP request/response descriptors and the transport collaborator

use crate::s3::error::{Error, ValidationErr};
use crate::s3::multimap_ext::{Multimap, MultimapExt};
use crate::s3::object_content::ObjectContent;
use crate::s3::utils::urlencode_object_key;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use http::{HeaderMap, Method, Uri};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug)]
/// Represents HTTP URL
pub struct Url {
    pub https: bool,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub query: Multimap,
}

impl Url {
    pub fn host_header_value(&self) -> String {
        if self.port > 0 {
            return format!("{}:{}", self.host, self.port);
        }
        self.host.clone()
    }
}

impl Default for Url {
    fn default() -> Self {
        Self {
            https: true,
            host: String::default(),
            port: u16::default(),
            path: String::default(),
            query: Multimap::default(),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.is_empty() {
            return Err(std::fmt::Error);
        }

        if self.https {
            f.write_str("https://")?;
        } else {
            f.write_str("http://")?;
        }
        f.write_str(&self.host_header_value())?;

        if !self.path.starts_with('/') {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;

        if !self.query.is_empty() {
            f.write_str("?")?;
            f.write_str(&self.query.to_query_string())?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Represents Base URL of S3 endpoint
pub struct BaseUrl {
    pub https: bool,
    host: String,
    port: u16,
    /// Use `bucket.host` addressing instead of `host/bucket`
    pub virtual_style: bool,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            https: true,
            host: "127.0.0.1".to_string(),
            port: 9000,
            virtual_style: false,
        }
    }
}

impl FromStr for BaseUrl {
    type Err = ValidationErr;

    /// Convert a string to a BaseUrl.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3object::s3::http::BaseUrl;
    ///
    /// let base_url: BaseUrl = "s3.amazonaws.com".parse().unwrap();
    /// assert!(base_url.virtual_style);
    /// let base_url: BaseUrl = "http://192.168.124.63:9000".parse().unwrap();
    /// assert!(!base_url.https);
    /// ```
    fn from_str(s: &str) -> Result<Self, ValidationErr> {
        let url = s
            .parse::<Uri>()
            .map_err(|e| ValidationErr::InvalidBaseUrl(e.to_string()))?;

        let https = match url.scheme_str() {
            None | Some("https") => true,
            Some("http") => false,
            Some(_) => {
                return Err(ValidationErr::InvalidBaseUrl(
                    "scheme must be http or https".into(),
                ));
            }
        };

        let Some(host) = url.host() else {
            return Err(ValidationErr::InvalidBaseUrl(
                "valid host must be provided".into(),
            ));
        };
        let host = if host.parse::<std::net::Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.to_string()
        };

        let mut port = url.port_u16().unwrap_or(0);
        if (https && port == 443) || (!https && port == 80) {
            port = 0;
        }

        if url.path() != "/" && !url.path().is_empty() {
            return Err(ValidationErr::InvalidBaseUrl(
                "path must be empty for base URL".into(),
            ));
        }
        if url.query().is_some() {
            return Err(ValidationErr::InvalidBaseUrl(
                "query must be none for base URL".into(),
            ));
        }

        let virtual_style = host.ends_with(".amazonaws.com") || host.ends_with(".amazonaws.com.cn");

        Ok(BaseUrl {
            https,
            host,
            port,
            virtual_style,
        })
    }
}

impl BaseUrl {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Builds URL from base URL for given parameters for S3 operation
    pub fn build_url(
        &self,
        query: &Multimap,
        bucket_name: &str,
        object_name: Option<&str>,
    ) -> Url {
        let mut url = Url {
            https: self.https,
            host: self.host.clone(),
            port: self.port,
            path: String::new(),
            query: query.clone(),
        };

        // Dotted bucket names break TLS certificate matching in virtual style.
        let enforce_path_style = bucket_name.contains('.') && self.https;
        if enforce_path_style || !self.virtual_style {
            url.path.push('/');
            url.path.push_str(bucket_name);
        } else {
            url.host = format!("{bucket_name}.{}", self.host);
        }

        match object_name {
            Some(v) => {
                if !v.starts_with('/') {
                    url.path.push('/');
                }
                url.path.push_str(&urlencode_object_key(v));
            }
            None if url.path.is_empty() => url.path.push('/'),
            None => {}
        }

        url
    }
}

/// Request descriptor handed to a [`Transport`].
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Multimap,
    pub body: Option<ObjectContent>,
}

/// Response as returned by a [`Transport`]. Non-success statuses are
/// returned as responses, not errors; the caller decides what they mean.
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First value of header `name`, if present and valid text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Consumer of a streamed response body.
#[async_trait]
pub trait ResponseSink: Send {
    async fn consume(&mut self, chunk: Bytes) -> Result<(), Error>;
}

#[async_trait]
impl<F> ResponseSink for F
where
    F: FnMut(Bytes) -> Result<(), Error> + Send,
{
    async fn consume(&mut self, chunk: Bytes) -> Result<(), Error> {
        self(chunk)
    }
}

/// HTTP transport collaborator. Implementations perform exactly one
/// request-response exchange per call.
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    async fn execute(&self, req: &mut HttpRequest) -> Result<HttpResponse, Error>;

    /// Executes `req`, feeding a successful response body to `sink` instead of
    /// buffering it. The returned response carries an empty body on success
    /// and the error document otherwise.
    async fn execute_streaming(
        &self,
        req: &mut HttpRequest,
        sink: &mut dyn ResponseSink,
    ) -> Result<HttpResponse, Error> {
        let mut resp = self.execute(req).await?;
        if resp.is_success() {
            let body = std::mem::take(&mut resp.body);
            if !body.is_empty() {
                sink.consume(body).await?;
            }
        }
        Ok(resp)
    }
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, req: &HttpRequest) -> Result<reqwest::Response, Error> {
        let mut builder = self.client.request(req.method.clone(), req.url.to_string());
        for (key, values) in req.headers.iter_all() {
            for value in values {
                builder = builder.header(key, value);
            }
        }
        builder = match &req.body {
            Some(ObjectContent::Bytes(b)) => builder.body(b.clone()),
            Some(ObjectContent::File(reader)) => {
                builder.body(reqwest::Body::wrap_stream(reader.rewound().into_stream()))
            }
            None => builder,
        };
        Ok(builder.send().await?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, req: &mut HttpRequest) -> Result<HttpResponse, Error> {
        let resp = self.send(req).await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_streaming(
        &self,
        req: &mut HttpRequest,
        sink: &mut dyn ResponseSink,
    ) -> Result<HttpResponse, Error> {
        let resp = self.send(req).await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        if !resp.status().is_success() {
            let body = resp.bytes().await?;
            return Ok(HttpResponse {
                status,
                headers,
                body,
            });
        }

        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            sink.consume(chunk?).await?;
        }
        Ok(HttpResponse {
            status,
            headers,
            body: Bytes::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_parse() {
        let base: BaseUrl = "http://localhost:9000".parse().unwrap();
        assert!(!base.https);
        assert_eq!(base.host(), "localhost");
        assert_eq!(base.port(), 9000);
        assert!(!base.virtual_style);

        let base: BaseUrl = "https://s3.amazonaws.com:443".parse().unwrap();
        assert_eq!(base.port(), 0);
        assert!(base.virtual_style);

        assert!("ftp://example.com".parse::<BaseUrl>().is_err());
        assert!("http://example.com/path".parse::<BaseUrl>().is_err());
    }

    #[test]
    fn test_build_url_path_style() {
        let base: BaseUrl = "http://localhost:9000".parse().unwrap();
        let mut query = Multimap::new();
        query.add("uploads", "");
        let url = base.build_url(&query, "bucket", Some("dir/my file.txt"));
        assert_eq!(
            url.to_string(),
            "http://localhost:9000/bucket/dir/my%20file.txt?uploads"
        );
    }

    #[test]
    fn test_build_url_virtual_style() {
        let base: BaseUrl = "https://s3.amazonaws.com".parse().unwrap();
        let url = base.build_url(&Multimap::new(), "bucket", Some("key"));
        assert_eq!(url.to_string(), "https://bucket.s3.amazonaws.com/key");

        let url = base.build_url(&Multimap::new(), "my.bucket", Some("key"));
        assert_eq!(url.to_string(), "https://s3.amazonaws.com/my.bucket/key");
    }
}
