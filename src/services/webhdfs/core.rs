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

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Request;
use http::Response;
use log::debug;
use log::warn;

use super::error::parse_response;
use crate::raw::*;
use crate::*;

/// build_operation_url builds the full url of one WebHDFS operation.
///
/// # Rules
///
/// The url is `{endpoint}{path}?op={OP}[&{default params}][&{extra}]&user.name={user}`.
///
/// - `op` always comes first and `user.name` always comes last, so the
///   output is deterministic.
/// - Path and values are percent encoded, a path can't inject another
///   `op=` or `user.name=`.
pub fn build_operation_url(
    endpoint: &str,
    path: &HdfsPath,
    op: Operation,
    user_name: &str,
    extra: &[(&str, &str)],
) -> String {
    let mut url = format!("{}{}?op={}", endpoint, percent_encode_path(path.as_str()), op);
    for (k, v) in op.default_params() {
        url += &format!("&{k}={}", percent_encode_path(v));
    }
    for (k, v) in extra {
        url += &format!("&{k}={}", percent_encode_path(v));
    }
    url += &format!("&user.name={}", percent_encode_path(user_name));
    url
}

pub struct WebhdfsCore {
    pub root: HdfsPath,
    pub endpoint: String,
    pub user_name: String,
    pub skip_first_hop_payload: bool,
    pub client: HttpClient,
}

impl Debug for WebhdfsCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhdfsCore")
            .field("root", &self.root)
            .field("endpoint", &self.endpoint)
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

impl WebhdfsCore {
    pub fn operation_url(&self, path: &HdfsPath, op: Operation) -> String {
        build_operation_url(&self.endpoint, path, op, &self.user_name, &[])
    }

    /// First hop of CREATE, sent to the coordinating node.
    pub fn webhdfs_create_request(&self, path: &HdfsPath, body: Bytes) -> Result<Request<Bytes>> {
        let url = self.operation_url(path, Operation::Create);

        Request::put(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .map_err(new_request_build_error)
    }

    /// Second hop of CREATE, sent to the data node the coordinator picked.
    pub fn webhdfs_transfer_request(
        &self,
        location: &reqwest::Url,
        body: Bytes,
    ) -> Result<Request<Bytes>> {
        Request::put(location.as_str())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .map_err(new_request_build_error)
    }

    /// Request for an operation without payload: DELETE, LISTSTATUS and OPEN.
    pub fn webhdfs_request(&self, path: &HdfsPath, op: Operation) -> Result<Request<Bytes>> {
        let url = self.operation_url(path, op);

        Request::builder()
            .method(op.method())
            .uri(&url)
            .body(Bytes::new())
            .map_err(new_request_build_error)
    }

    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.client.send(req).await
    }

    /// Issue a single request and classify its response, no redirect handling.
    pub async fn execute(&self, path: &HdfsPath, op: Operation) -> Result<Bytes> {
        debug!("webhdfs: {op} {path}");

        let req = self.webhdfs_request(path, op)?;
        let resp = self.send(req).await?;
        parse_response(resp)
    }

    pub async fn webhdfs_delete(&self, path: &HdfsPath) -> Result<Bytes> {
        self.execute(path, Operation::Delete)
            .await
            .map_err(|err| err.with_operation(Operation::Delete).with_context("path", path))
    }

    pub async fn webhdfs_list_status(&self, path: &HdfsPath) -> Result<Bytes> {
        self.execute(path, Operation::ListStatus)
            .await
            .map_err(|err| err.with_operation(Operation::ListStatus).with_context("path", path))
    }

    /// OPEN is redirected to a data node like CREATE, the redirect is
    /// followed once without payload.
    pub async fn webhdfs_read_file(&self, path: &HdfsPath) -> Result<Bytes> {
        self.open_and_follow(path)
            .await
            .map_err(|err| err.with_operation(Operation::Open).with_context("path", path))
    }

    async fn open_and_follow(&self, path: &HdfsPath) -> Result<Bytes> {
        debug!("webhdfs: {} {path}", Operation::Open);

        let req = self.webhdfs_request(path, Operation::Open)?;
        let url = req.uri().to_string();
        let resp = self.send(req).await?;
        if !resp.status().is_redirection() {
            return parse_response(resp);
        }

        let location = parse_redirect_target(&url, &resp)?;
        debug!("webhdfs: {} {path} redirected to {location}", Operation::Open);

        let req = Request::get(location.as_str())
            .body(Bytes::new())
            .map_err(new_request_build_error)?;
        let resp = self.send(req).await?;
        parse_response(resp)
    }
}

/// Extract the redirect target of a 3xx response.
///
/// A relative `Location` is joined with the url the request was sent to.
pub(super) fn parse_redirect_target(
    request_url: &str,
    resp: &Response<Bytes>,
) -> Result<reqwest::Url> {
    let Some(location) = parse_location(resp.headers())? else {
        warn!(
            "webhdfs: {} from {request_url} without Location header",
            resp.status()
        );
        return Err(Error::new(
            ErrorKind::RedirectMissing,
            "redirect response has no Location header",
        )
        .with_context("status", resp.status())
        .with_context("url", request_url));
    };

    reqwest::Url::parse(request_url)
        .and_then(|base| base.join(location))
        .map_err(|err| {
            Error::new(ErrorKind::ResponseDecode, "redirect location is not a valid url")
                .with_context("location", location)
                .set_source(err)
        })
}

#[cfg(test)]
mod tests {
    use http::header::LOCATION;
    use http::Method;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;

    const ENDPOINT: &str = "http://127.0.0.1:9870/webhdfs/v1";

    fn new_core() -> WebhdfsCore {
        WebhdfsCore {
            root: HdfsPath::new("/01").expect("must be valid"),
            endpoint: ENDPOINT.to_string(),
            user_name: "hadoop".to_string(),
            skip_first_hop_payload: false,
            client: HttpClient::new(None).expect("must build"),
        }
    }

    fn query_pairs(url: &str) -> Vec<(String, String)> {
        let (_, query) = url.split_once('?').expect("url must have query");
        query
            .split('&')
            .map(|pair| {
                let (k, v) = pair.split_once('=').expect("pair must have '='");
                (k.to_string(), v.to_string())
            })
            .collect()
    }

    #[test]
    fn test_build_operation_url() {
        let path = HdfsPath::new("/01/a.txt").expect("must be valid");
        let cases = vec![
            (
                Operation::Create,
                "http://127.0.0.1:9870/webhdfs/v1/01/a.txt?op=CREATE&overwrite=true&user.name=hadoop",
            ),
            (
                Operation::Delete,
                "http://127.0.0.1:9870/webhdfs/v1/01/a.txt?op=DELETE&user.name=hadoop",
            ),
            (
                Operation::ListStatus,
                "http://127.0.0.1:9870/webhdfs/v1/01/a.txt?op=LISTSTATUS&user.name=hadoop",
            ),
            (
                Operation::Open,
                "http://127.0.0.1:9870/webhdfs/v1/01/a.txt?op=OPEN&user.name=hadoop",
            ),
        ];

        for (op, expected) in cases {
            let actual = build_operation_url(ENDPOINT, &path, op, "hadoop", &[]);
            assert_eq!(actual, expected, "{op}");
        }
    }

    #[test]
    fn test_build_operation_url_has_single_op_and_user() {
        let paths = ["/01/a.txt", "/op=DELETE", "/a?op=OPEN&user.name=root", "/sub dir/&x"];

        for p in paths {
            let path = HdfsPath::new(p).expect("must be valid");
            for op in [
                Operation::Create,
                Operation::Delete,
                Operation::ListStatus,
                Operation::Open,
            ] {
                let url = build_operation_url(ENDPOINT, &path, op, "hadoop", &[]);
                let pairs = query_pairs(&url);

                let ops = pairs.iter().filter(|(k, _)| k == "op").collect::<Vec<_>>();
                assert_eq!(ops.len(), 1, "{url}");
                assert_eq!(ops[0].1, op.to_string(), "{url}");

                let users = pairs.iter().filter(|(k, _)| k == "user.name").collect::<Vec<_>>();
                assert_eq!(users.len(), 1, "{url}");
                assert_eq!(users[0].1, "hadoop", "{url}");
            }
        }
    }

    #[test]
    fn test_build_operation_url_extra_params() {
        let path = HdfsPath::new("/01").expect("must be valid");
        let url = build_operation_url(
            ENDPOINT,
            &path,
            Operation::Create,
            "hadoop",
            &[("replication", "2"), ("permission", "644")],
        );
        assert_eq!(
            url,
            "http://127.0.0.1:9870/webhdfs/v1/01?op=CREATE&overwrite=true&replication=2&permission=644&user.name=hadoop"
        );
    }

    #[test]
    fn test_webhdfs_request_methods() {
        let core = new_core();
        let path = HdfsPath::new("/01/a.txt").expect("must be valid");

        let req = core
            .webhdfs_create_request(&path, Bytes::from("hello"))
            .expect("must build");
        assert_eq!(req.method(), Method::PUT);
        assert_eq!(req.body(), &Bytes::from("hello"));

        let req = core
            .webhdfs_request(&path, Operation::Delete)
            .expect("must build");
        assert_eq!(req.method(), Method::DELETE);
        assert!(req.body().is_empty());

        let req = core
            .webhdfs_request(&path, Operation::ListStatus)
            .expect("must build");
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn test_parse_redirect_target() {
        let url = "http://namenode:9870/webhdfs/v1/01/a.txt?op=CREATE&user.name=hadoop";

        let resp = Response::builder()
            .status(StatusCode::TEMPORARY_REDIRECT)
            .header(LOCATION, "http://node2:9864/webhdfs/v1/01/a.txt?op=CREATE&namenoderpcaddress=nn:8020")
            .body(Bytes::new())
            .expect("must build");
        let target = parse_redirect_target(url, &resp).expect("must parse");
        assert_eq!(
            target.as_str(),
            "http://node2:9864/webhdfs/v1/01/a.txt?op=CREATE&namenoderpcaddress=nn:8020"
        );

        let resp = Response::builder()
            .status(StatusCode::TEMPORARY_REDIRECT)
            .header(LOCATION, "/data/a.txt")
            .body(Bytes::new())
            .expect("must build");
        let target = parse_redirect_target(url, &resp).expect("must parse");
        assert_eq!(target.as_str(), "http://namenode:9870/data/a.txt");
    }

    #[test]
    fn test_parse_redirect_target_missing() {
        let resp = Response::builder()
            .status(StatusCode::TEMPORARY_REDIRECT)
            .body(Bytes::new())
            .expect("must build");

        let err = parse_redirect_target("http://namenode:9870/a", &resp).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::RedirectMissing);
        assert_eq!(err.context("status"), Some("307 Temporary Redirect"));
    }
}
