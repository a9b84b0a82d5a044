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

use std::collections::HashMap;
use std::env;
use std::fmt::Debug;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use super::backend::WebhdfsBuilder;
use crate::*;

/// Prefix of environment variables read by [`WebhdfsConfig::from_env`].
const ENV_PREFIX: &str = "webhdfs_";

/// Config for WebHDFS support.
///
/// Loaded once and read-only afterwards: the client built from it holds no
/// other process wide state.
#[derive(Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
#[non_exhaustive]
pub struct WebhdfsConfig {
    /// Endpoint for webhdfs, including the `/webhdfs/v1` prefix.
    pub endpoint: Option<String>,
    /// Name of the user sent as `user.name`.
    pub user_name: Option<String>,
    /// Root that relative paths are resolved under.
    pub root: Option<String>,
    /// Timeout in seconds applied to every request.
    pub timeout: Option<u64>,
    /// Send an empty body on the first hop of a write, default to `false`.
    pub skip_first_hop_payload: Option<bool>,
}

impl Debug for WebhdfsConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhdfsConfig")
            .field("endpoint", &self.endpoint)
            .field("user_name", &self.user_name)
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .field("skip_first_hop_payload", &self.skip_first_hop_payload)
            .finish_non_exhaustive()
    }
}

impl WebhdfsConfig {
    /// Build config from string pairs, unknown keys are ignored.
    ///
    /// Keys are matched case-insensitively.
    pub fn from_map(map: HashMap<String, String>) -> Result<Self> {
        let map = map
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect::<HashMap<_, _>>();

        let mut cfg = WebhdfsConfig {
            endpoint: map.get("endpoint").cloned(),
            user_name: map.get("user_name").cloned(),
            root: map.get("root").cloned(),
            ..Default::default()
        };

        if let Some(v) = map.get("timeout") {
            cfg.timeout = Some(v.trim().parse::<u64>().map_err(|err| {
                Error::new(ErrorKind::ConfigInvalid, "timeout must be seconds")
                    .with_context("timeout", v)
                    .set_source(err)
            })?);
        }
        if let Some(v) = map.get("skip_first_hop_payload") {
            cfg.skip_first_hop_payload = Some(parse_bool("skip_first_hop_payload", v)?);
        }

        Ok(cfg)
    }

    /// Load config from environment variables.
    ///
    /// The format of each environment variable should be `WEBHDFS_{OPTION}`,
    /// such as `WEBHDFS_ENDPOINT`, `WEBHDFS_USER_NAME`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        let map = vars
            .into_iter()
            .filter_map(|(k, v)| {
                k.to_lowercase()
                    .strip_prefix(ENV_PREFIX)
                    .map(|k| (k.to_string(), v))
            })
            .collect();
        Self::from_map(map)
    }

    /// Overlay `other` on self, values set in `other` win.
    pub fn merge(self, other: WebhdfsConfig) -> Self {
        WebhdfsConfig {
            endpoint: other.endpoint.or(self.endpoint),
            user_name: other.user_name.or(self.user_name),
            root: other.root.or(self.root),
            timeout: other.timeout.or(self.timeout),
            skip_first_hop_payload: other.skip_first_hop_payload.or(self.skip_first_hop_payload),
        }
    }

    /// Convert this configuration into a client builder.
    pub fn into_builder(self) -> WebhdfsBuilder {
        WebhdfsBuilder::from_config(self)
    }
}

fn parse_bool(key: &'static str, v: &str) -> Result<bool> {
    match v.trim().to_lowercase().as_str() {
        "true" | "on" => Ok(true),
        "false" | "off" => Ok(false),
        _ => Err(
            Error::new(ErrorKind::ConfigInvalid, "invalid bool value").with_context(key, v),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn pairs(v: &[(&str, &str)]) -> HashMap<String, String> {
        v.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_map() {
        let cfg = WebhdfsConfig::from_map(pairs(&[
            ("endpoint", "http://192.168.48.129:9870/webhdfs/v1"),
            ("USER_NAME", "hadoop"),
            ("root", "/01"),
            ("timeout", "30"),
            ("skip_first_hop_payload", "on"),
            ("unknown", "ignored"),
        ]))
        .expect("must parse");

        assert_eq!(
            cfg.endpoint.as_deref(),
            Some("http://192.168.48.129:9870/webhdfs/v1")
        );
        assert_eq!(cfg.user_name.as_deref(), Some("hadoop"));
        assert_eq!(cfg.root.as_deref(), Some("/01"));
        assert_eq!(cfg.timeout, Some(30));
        assert_eq!(cfg.skip_first_hop_payload, Some(true));
    }

    #[test]
    fn test_from_map_invalid_values() {
        let err = WebhdfsConfig::from_map(pairs(&[("timeout", "soon")])).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

        let err = WebhdfsConfig::from_map(pairs(&[("skip_first_hop_payload", "maybe")]))
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }

    #[test]
    fn test_from_vars() {
        let cfg = WebhdfsConfig::from_vars(vec![
            ("WEBHDFS_ENDPOINT".to_string(), "http://nn:9870/webhdfs/v1".to_string()),
            ("WEBHDFS_USER_NAME".to_string(), "hadoop".to_string()),
            ("HOME".to_string(), "/root".to_string()),
        ])
        .expect("must parse");

        assert_eq!(cfg.endpoint.as_deref(), Some("http://nn:9870/webhdfs/v1"));
        assert_eq!(cfg.user_name.as_deref(), Some("hadoop"));
        assert_eq!(cfg.root, None);
    }

    #[test]
    fn test_merge() {
        let file = WebhdfsConfig {
            endpoint: Some("http://file:9870/webhdfs/v1".to_string()),
            user_name: Some("file".to_string()),
            root: Some("/01".to_string()),
            ..Default::default()
        };
        let env = WebhdfsConfig {
            user_name: Some("env".to_string()),
            timeout: Some(5),
            ..Default::default()
        };

        let cfg = file.merge(env);
        assert_eq!(cfg.endpoint.as_deref(), Some("http://file:9870/webhdfs/v1"));
        assert_eq!(cfg.user_name.as_deref(), Some("env"));
        assert_eq!(cfg.root.as_deref(), Some("/01"));
        assert_eq!(cfg.timeout, Some(5));
    }

    #[test]
    fn test_merge_env_false_overrides_file_true() {
        let file = WebhdfsConfig {
            skip_first_hop_payload: Some(true),
            ..Default::default()
        };
        let env = WebhdfsConfig::from_map(pairs(&[("skip_first_hop_payload", "false")]))
            .expect("must parse");

        let cfg = file.clone().merge(env);
        assert_eq!(cfg.skip_first_hop_payload, Some(false));

        // Unset values leave the file value in place.
        let cfg = file.merge(WebhdfsConfig::default());
        assert_eq!(cfg.skip_first_hop_payload, Some(true));
    }

    #[test]
    fn test_deserialize_toml_shape() {
        let cfg: WebhdfsConfig = serde_json::from_str(
            r#"{"endpoint":"http://nn:9870/webhdfs/v1","user_name":"hadoop","timeout":10}"#,
        )
        .expect("must deserialize");
        assert_eq!(cfg.user_name.as_deref(), Some("hadoop"));
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.skip_first_hop_payload, None);
    }
}
