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
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use log::debug;

use super::config::WebhdfsConfig;
use super::core::WebhdfsCore;
use super::writer::WebhdfsWriter;
use crate::raw::*;
use crate::*;

const WEBHDFS_DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9870/webhdfs/v1";

/// Builder for [`WebhdfsClient`].
///
/// # Example
///
/// ```no_run
/// use webhdfs_client::WebhdfsBuilder;
///
/// # async fn test() -> webhdfs_client::Result<()> {
/// let mut builder = WebhdfsBuilder::default();
/// builder
///     .endpoint("http://192.168.48.129:9870/webhdfs/v1")
///     .user_name("hadoop")
///     .root("/01");
/// let client = builder.build()?;
///
/// let path = client.resolve("a.txt")?;
/// client.write(&path, "hello").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Clone)]
pub struct WebhdfsBuilder {
    config: WebhdfsConfig,
    timeout: Option<Duration>,
    http_client: Option<HttpClient>,
}

impl Debug for WebhdfsBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WebhdfsBuilder {
    pub(super) fn from_config(config: WebhdfsConfig) -> Self {
        WebhdfsBuilder {
            timeout: config.timeout.map(Duration::from_secs),
            config,
            http_client: None,
        }
    }

    /// Set the root directory relative paths are resolved under.
    ///
    /// Default to `/`.
    pub fn root(&mut self, root: &str) -> &mut Self {
        if !root.is_empty() {
            self.config.root = Some(root.to_string())
        }

        self
    }

    /// Set the service base url, default to `http://127.0.0.1:9870/webhdfs/v1`
    ///
    /// Endpoints should be full uri including the `/webhdfs/v1` prefix, e.g.
    ///
    /// - `https://webhdfs.example.com:9870/webhdfs/v1`
    /// - `http://192.168.48.129:9870/webhdfs/v1`
    ///
    /// If user inputs endpoint without scheme, we will
    /// prepend `http://` to it.
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        if !endpoint.is_empty() {
            self.config.endpoint = Some(endpoint.to_string());
        }
        self
    }

    /// Set the acting user sent as `user.name` with every request.
    pub fn user_name(&mut self, user_name: &str) -> &mut Self {
        if !user_name.is_empty() {
            self.config.user_name = Some(user_name.to_string());
        }
        self
    }

    /// Bound every request by timeout.
    ///
    /// An expired timeout is returned as [`ErrorKind::ConnectionError`].
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send an empty body on the first hop of a write.
    ///
    /// # Note
    ///
    /// By default the payload is sent on both hops so that a service
    /// completing CREATE without redirect still receives the content. With
    /// this set, such a service would create an empty file.
    pub fn skip_first_hop_payload(&mut self) -> &mut Self {
        self.config.skip_first_hop_payload = Some(true);
        self
    }

    /// Specify the http client that used by this service.
    ///
    /// # Notes
    ///
    /// The client must not follow redirects, see [`HttpClient::with`]. A
    /// client following redirects would resend CREATE to the data node on
    /// its own and the builder's timeout is not applied to it either.
    pub fn http_client(&mut self, client: HttpClient) -> &mut Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(&mut self) -> Result<WebhdfsClient> {
        debug!("start building webhdfs client: {:?}", self);

        let root = normalize_root(&self.config.root.take().unwrap_or_default())?;
        debug!("webhdfs client use root {root}");

        let endpoint = normalize_endpoint(
            self.config
                .endpoint
                .take()
                .as_deref()
                .unwrap_or(WEBHDFS_DEFAULT_ENDPOINT),
        );
        debug!("webhdfs client use endpoint {endpoint}");

        let Some(user_name) = self.config.user_name.take() else {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "user_name is required")
                    .with_operation("Builder::build")
                    .with_context("endpoint", &endpoint),
            );
        };

        let client = match self.http_client.take() {
            Some(client) => client,
            None => HttpClient::new(self.timeout)
                .map_err(|err| err.with_operation("Builder::build"))?,
        };

        let core = WebhdfsCore {
            root,
            endpoint,
            user_name,
            skip_first_hop_payload: self.config.skip_first_hop_payload.unwrap_or_default(),
            client,
        };

        Ok(WebhdfsClient {
            core: Arc::new(core),
        })
    }
}

/// Client of the [WebHDFS](https://hadoop.apache.org/docs/stable/hadoop-project-dist/hadoop-hdfs/WebHDFS.html) REST API.
///
/// All operations return the raw body of the final response on success and
/// a classified [`Error`] otherwise, nothing is retried. The client keeps no
/// state between calls: clones share one connection pool and may be used
/// concurrently.
#[derive(Clone)]
pub struct WebhdfsClient {
    core: Arc<WebhdfsCore>,
}

impl Debug for WebhdfsClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhdfsClient")
            .field("core", &self.core)
            .finish()
    }
}

impl WebhdfsClient {
    /// Build a client from config.
    pub fn from_config(config: WebhdfsConfig) -> Result<Self> {
        config.into_builder().build()
    }

    /// The configured root.
    pub fn root(&self) -> &HdfsPath {
        &self.core.root
    }

    /// Resolve a relative path under the configured root.
    pub fn resolve(&self, relative: &str) -> Result<HdfsPath> {
        resolve(self.core.root.as_str(), relative)
    }

    /// Create or overwrite the file at path with content.
    ///
    /// The coordinating node redirects to a data node which receives the
    /// content on a second hop.
    ///
    /// # Cancellation
    ///
    /// Dropping the returned future aborts the hop in flight. The write is
    /// then failed from the caller's view, but the data node may or may not
    /// have stored the bytes: the protocol can't tell.
    pub async fn write(&self, path: &HdfsPath, content: impl Into<Bytes>) -> Result<String> {
        let bs = WebhdfsWriter::new(self.core.clone(), path.clone())
            .write(content.into())
            .await?;
        into_string(bs, Operation::Create, path)
    }

    /// Delete the file or empty directory at path.
    ///
    /// Returns the raw `{"boolean": ...}` body; deleting a missing path
    /// succeeds with `false`.
    pub async fn delete(&self, path: &HdfsPath) -> Result<String> {
        let bs = self.core.webhdfs_delete(path).await?;
        into_string(bs, Operation::Delete, path)
    }

    /// List the directory at path.
    ///
    /// Returns the raw `{"FileStatuses":{"FileStatus":[...]}}` body, see
    /// [`crate::services::webhdfs::parse_list_status`] to decode it.
    pub async fn list(&self, path: &HdfsPath) -> Result<String> {
        let bs = self.core.webhdfs_list_status(path).await?;
        into_string(bs, Operation::ListStatus, path)
    }

    /// Read the whole content of the file at path.
    pub async fn read(&self, path: &HdfsPath) -> Result<Bytes> {
        self.core.webhdfs_read_file(path).await
    }
}

/// Prepend `http://` if endpoint has no scheme and trim tailing slashes,
/// so we can accept `127.0.0.1:9870/webhdfs/v1/`.
fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

fn into_string(bs: Bytes, op: Operation, path: &HdfsPath) -> Result<String> {
    String::from_utf8(bs.to_vec()).map_err(|err| {
        Error::new(ErrorKind::ResponseDecode, "response body is not valid utf-8")
            .with_operation(op)
            .with_context("path", path)
            .set_source(err)
    })
}
