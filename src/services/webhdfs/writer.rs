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

use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::Arc;

use bytes::Bytes;
use log::debug;

use super::core::parse_redirect_target;
use super::core::WebhdfsCore;
use super::error::parse_response;
use crate::raw::*;
use crate::*;

/// State of one CREATE handshake.
#[derive(Debug)]
enum WriteState {
    /// Hop 1 goes to the coordinating node which should answer with 3xx.
    AwaitingRedirect,
    /// Hop 2 carries the payload to the data node at this url.
    Transferring(reqwest::Url),
    /// Terminal: succeeded or failed.
    Finished(Result<Bytes>),
}

impl Display for WriteState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteState::AwaitingRedirect => write!(f, "AwaitingRedirect"),
            WriteState::Transferring(url) => write!(f, "Transferring({url})"),
            WriteState::Finished(Ok(_)) => write!(f, "Succeeded"),
            WriteState::Finished(Err(_)) => write!(f, "Failed"),
        }
    }
}

/// WebhdfsWriter drives the two hop CREATE of a single path.
///
/// Every hop is awaited before the next one is built, and nothing is retried.
/// Once hop 2 got a response the write is terminal, there is no rollback.
pub struct WebhdfsWriter {
    core: Arc<WebhdfsCore>,
    path: HdfsPath,
}

impl WebhdfsWriter {
    pub fn new(core: Arc<WebhdfsCore>, path: HdfsPath) -> Self {
        WebhdfsWriter { core, path }
    }

    /// Write payload and return the body of the final response.
    pub async fn write(&self, payload: Bytes) -> Result<Bytes> {
        let mut state = WriteState::AwaitingRedirect;

        loop {
            debug!("webhdfs: {} {} -> {state}", Operation::Create, self.path);

            state = match state {
                WriteState::AwaitingRedirect => self.await_redirect(&payload).await,
                WriteState::Transferring(location) => self.transfer(location, &payload).await,
                WriteState::Finished(res) => {
                    return res.map_err(|err| {
                        err.with_operation(Operation::Create)
                            .with_context("path", &self.path)
                    })
                }
            };
        }
    }

    async fn await_redirect(&self, payload: &Bytes) -> WriteState {
        // Bytes clones are refcounted, the payload is never copied.
        let body = if self.core.skip_first_hop_payload {
            Bytes::new()
        } else {
            payload.clone()
        };

        let req = match self.core.webhdfs_create_request(&self.path, body) {
            Ok(req) => req,
            Err(err) => return WriteState::Finished(Err(err)),
        };
        let url = req.uri().to_string();

        let resp = match self.core.send(req).await {
            Ok(resp) => resp,
            Err(err) => return WriteState::Finished(Err(err)),
        };

        // Some gateways complete CREATE in one hop.
        if !resp.status().is_redirection() {
            return WriteState::Finished(parse_response(resp));
        }

        match parse_redirect_target(&url, &resp) {
            Ok(location) => WriteState::Transferring(location),
            Err(err) => WriteState::Finished(Err(err)),
        }
    }

    async fn transfer(&self, location: reqwest::Url, payload: &Bytes) -> WriteState {
        let res = self
            .send_to_data_node(&location, payload.clone())
            .await
            .map_err(|err| err.with_context("location", &location));

        WriteState::Finished(res)
    }

    async fn send_to_data_node(&self, location: &reqwest::Url, body: Bytes) -> Result<Bytes> {
        let req = self.core.webhdfs_transfer_request(location, body)?;
        let resp = self.core.send(req).await?;
        parse_response(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_state_display() {
        let url = reqwest::Url::parse("http://node2:9864/a.txt").expect("must parse");
        let cases = vec![
            (WriteState::AwaitingRedirect, "AwaitingRedirect"),
            (
                WriteState::Transferring(url),
                "Transferring(http://node2:9864/a.txt)",
            ),
            (WriteState::Finished(Ok(Bytes::new())), "Succeeded"),
            (
                WriteState::Finished(Err(Error::new(ErrorKind::RedirectMissing, ""))),
                "Failed",
            ),
        ];

        for (state, expected) in cases {
            assert_eq!(state.to_string(), expected);
        }
    }
}
