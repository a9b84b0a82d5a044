// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;
use std::fmt::Formatter;
use std::mem;
use std::time::Duration;

use bytes::Bytes;
use http::Request;
use http::Response;
use http::Uri;
use log::debug;

use crate::*;

/// A HTTP client instance for the WebHDFS service.
///
/// # Notes
///
/// * The client must NOT follow 3xx responses: the write handshake has to see
///   the redirect to pick up its `Location`.
/// * The client is cheap to clone, all clones share the same connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

/// We don't want users to know details about our clients.
impl Debug for HttpClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish()
    }
}

impl HttpClient {
    /// Create a new http client with redirects disabled.
    ///
    /// Every request is bounded by `timeout` if given.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::ClientBuilder::new().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|err| {
            Error::new(ErrorKind::Unexpected, "http client build failed").set_source(err)
        })?;
        Ok(Self { client })
    }

    /// Construct `Self` with given [`reqwest::Client`]
    ///
    /// The given client must be built with `redirect::Policy::none()`:
    /// reqwest can't tell the policy of a built client, so a client that
    /// follows redirects would complete CREATE and OPEN on its own, skipping
    /// the data node handshake.
    pub fn with(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Send a request and consume the whole response body.
    ///
    /// Any failure before a complete response is read turns into
    /// [`ErrorKind::ConnectionError`], an expired timeout is marked by the
    /// context entry `timeout: true`.
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let uri = req.uri().clone();
        let (parts, body) = req.into_parts();

        let url = reqwest::Url::parse(&uri.to_string()).map_err(|err| {
            Error::new(ErrorKind::Unexpected, "request url is invalid")
                .with_operation("http_util::Client::send")
                .with_context("url", &uri)
                .set_source(err)
        })?;

        debug!("http request: {} {}", parts.method, uri);

        let mut resp = self
            .client
            .request(parts.method, url)
            .headers(parts.headers)
            .body(body)
            .send()
            .await
            .map_err(|err| new_connection_error("send http request", &uri, err))?;

        let status = resp.status();
        let version = resp.version();
        // Take headers directly instead of copy the entire map.
        let headers = mem::take(resp.headers_mut());

        let bs = resp
            .bytes()
            .await
            .map_err(|err| new_connection_error("read data from http response", &uri, err))?;

        debug!("http response: {} {} -> {}", status, uri, bs.len());

        let mut hr = Response::new(bs);
        *hr.status_mut() = status;
        *hr.version_mut() = version;
        *hr.headers_mut() = headers;
        Ok(hr)
    }
}

fn new_connection_error(message: &'static str, uri: &Uri, err: reqwest::Error) -> Error {
    Error::new(ErrorKind::ConnectionError, message)
        .with_operation("http_util::Client::send")
        .with_context("url", uri)
        .with_context("timeout", err.is_timeout())
        .set_source(err)
}
