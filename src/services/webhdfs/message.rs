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

//! WebHDFS response messages

use serde::Deserialize;

use crate::raw::*;
use crate::*;

#[derive(Debug, Deserialize)]
pub(super) struct BooleanResp {
    pub boolean: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct FileStatusesWrapper {
    pub file_statuses: FileStatuses,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct FileStatuses {
    pub file_status: Vec<FileStatus>,
}

/// FileStatus is one entry of a `LISTSTATUS` response.
///
/// The client never needs these fields itself, they are parsed only on
/// request through [`parse_list_status`].
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
#[non_exhaustive]
pub struct FileStatus {
    /// Size in bytes, `0` for directories.
    pub length: u64,
    /// Modification time in milliseconds since epoch.
    pub modification_time: i64,
    /// Name of this entry relative to the listed directory.
    pub path_suffix: String,
    /// Type of this entry.
    #[serde(rename = "type")]
    pub ty: FileStatusType,
}

/// Type of a [`FileStatus`] entry.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileStatusType {
    /// A directory.
    Directory,
    /// A regular file.
    #[default]
    File,
    /// A symbolic link.
    Symlink,
}

/// Parse the raw body returned by [`WebhdfsClient::list`] into entries.
pub fn parse_list_status(body: &str) -> Result<Vec<FileStatus>> {
    let resp: FileStatusesWrapper =
        serde_json::from_str(body).map_err(new_json_deserialize_error)?;
    Ok(resp.file_statuses.file_status)
}

/// Parse the raw body returned by [`WebhdfsClient::delete`].
///
/// `false` means nothing existed at that path.
pub fn parse_boolean(body: &str) -> Result<bool> {
    let resp: BooleanResp = serde_json::from_str(body).map_err(new_json_deserialize_error)?;
    Ok(resp.boolean)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_empty() {
        let json = r#"
    {
        "FileStatuses": {"FileStatus":[]}
    }
        "#;
        let file_statuses = parse_list_status(json).expect("must success");
        assert!(file_statuses.is_empty());
    }

    #[test]
    fn test_list_status() {
        let json = r#"
{
  "FileStatuses":
  {
    "FileStatus":
    [
      {
        "accessTime"      : 1320171722771,
        "blockSize"       : 33554432,
        "group"           : "supergroup",
        "length"          : 24930,
        "modificationTime": 1320171722771,
        "owner"           : "webuser",
        "pathSuffix"      : "a.patch",
        "permission"      : "644",
        "replication"     : 1,
        "type"            : "FILE"
      },
      {
        "accessTime"      : 0,
        "blockSize"       : 0,
        "group"           : "supergroup",
        "length"          : 0,
        "modificationTime": 1320895981256,
        "owner"           : "szetszwo",
        "pathSuffix"      : "bar",
        "permission"      : "711",
        "replication"     : 0,
        "type"            : "DIRECTORY"
      }
    ]
  }
}
            "#;

        let file_statuses = parse_list_status(json).expect("must success");

        assert_eq!(file_statuses.len(), 2);
        assert_eq!(file_statuses[0].length, 24930);
        assert_eq!(file_statuses[0].modification_time, 1320171722771);
        assert_eq!(file_statuses[0].path_suffix, "a.patch");
        assert_eq!(file_statuses[0].ty, FileStatusType::File);
        assert_eq!(file_statuses[1].length, 0);
        assert_eq!(file_statuses[1].modification_time, 1320895981256);
        assert_eq!(file_statuses[1].path_suffix, "bar");
        assert_eq!(file_statuses[1].ty, FileStatusType::Directory);
    }

    #[test]
    fn test_list_status_partial_entry() {
        let json = r#"{"FileStatuses":{"FileStatus":[{"pathSuffix":"a.txt","type":"FILE"}]}}"#;

        let file_statuses = parse_list_status(json).expect("must success");
        assert_eq!(file_statuses.len(), 1);
        assert_eq!(file_statuses[0].path_suffix, "a.txt");
        assert_eq!(file_statuses[0].length, 0);
    }

    #[test]
    fn test_list_status_malformed() {
        let err = parse_list_status(r#"{"boolean":true}"#).expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ResponseDecode);
    }

    #[test]
    fn test_parse_boolean() {
        assert!(parse_boolean(r#"{"boolean": true}"#).expect("must success"));
        assert!(!parse_boolean(r#"{"boolean":false}"#).expect("must success"));
        assert_eq!(
            parse_boolean("").expect_err("must fail").kind(),
            ErrorKind::ResponseDecode
        );
    }
}
