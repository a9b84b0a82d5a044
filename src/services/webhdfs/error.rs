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

use bytes::Bytes;
use http::Response;
use http::StatusCode;
use serde::Deserialize;

use crate::raw::*;
use crate::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WebHdfsErrorWrapper {
    pub remote_exception: WebHdfsError,
}

/// WebHdfsError is the error message returned by WebHdfs service.
///
/// Only `exception` drives classification, `javaClassName` and friends are
/// implementation specific and ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebHdfsError {
    exception: String,
    #[serde(default)]
    message: String,
}

/// Classify a complete response.
///
/// The status line and `Location` (if any) are kept in the error context.
pub(super) fn parse_response(resp: Response<Bytes>) -> Result<Bytes> {
    let (parts, body) = resp.into_parts();
    classify(parts.status, body).map_err(|err| with_error_response_context(err, &parts))
}

/// Decide between success and one of the error kinds.
///
/// Rules, first match wins:
///
/// - 2xx: success, body passed through unchanged.
/// - 3xx: only valid inside the write handshake, here it's a decode error.
/// - 4xx: the `RemoteException` body is parsed and its `exception` mapped.
/// - 5xx: [`ErrorKind::RemoteServerError`], marked temporary.
/// - anything left, or a 4xx body that is not a `RemoteException`:
///   [`ErrorKind::ResponseDecode`] carrying the raw body.
pub fn classify(status: StatusCode, body: Bytes) -> Result<Bytes> {
    if status.is_success() {
        return Ok(body);
    }

    let raw = String::from_utf8_lossy(&body);

    let err = if status.is_redirection() {
        Error::new(
            ErrorKind::ResponseDecode,
            "unexpected redirect outside of write handshake",
        )
        .with_context("body", &raw)
    } else if status.is_client_error() {
        match serde_json::from_str::<WebHdfsErrorWrapper>(&raw) {
            Ok(wrapper) => parse_remote_exception(wrapper.remote_exception),
            Err(err) => Error::new(
                ErrorKind::ResponseDecode,
                "error response is not a RemoteException",
            )
            .with_context("body", &raw)
            .set_source(err),
        }
    } else if status.is_server_error() {
        let message = match serde_json::from_str::<WebHdfsErrorWrapper>(&raw) {
            Ok(wrapper) => wrapper.remote_exception.message,
            Err(_) => raw.to_string(),
        };
        Error::new(ErrorKind::RemoteServerError, message).set_temporary()
    } else {
        Error::new(ErrorKind::ResponseDecode, "unexpected informational response")
            .with_context("body", &raw)
    };

    Err(err)
}

fn parse_remote_exception(e: WebHdfsError) -> Error {
    let kind = match e.exception.as_str() {
        "FileNotFoundException" => ErrorKind::RemoteFileNotFound,
        "AccessControlException" | "SecurityException" => ErrorKind::RemotePermissionDenied,
        // passing invalid arguments or an unsupported op returns BAD_REQUEST
        "IllegalArgumentException" | "InvalidPathException" | "UnsupportedOperationException" => {
            ErrorKind::RemoteBadRequest
        }
        _ => ErrorKind::RemoteClientError,
    };

    Error::new(kind, e.message).with_context("exception", e.exception)
}
