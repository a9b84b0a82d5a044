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

use crate::*;

/// HdfsPath is an absolute path inside the remote namespace.
///
/// # Invariants
///
/// - Never empty and always starts with a single `/`.
/// - Never contains `//` and never ends with `/` unless it's the root itself.
/// - Never contains a `.` or `..` component.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HdfsPath(String);

impl HdfsPath {
    /// Build a path from an absolute path, collapsing repeated slashes.
    ///
    /// A missing leading `/` is added: `abc//def/` => `/abc/def`. Surrounding
    /// whitespace and `.` components are dropped.
    pub fn new(path: &str) -> Result<Self> {
        let components = split_components(path)?;
        Ok(Self::from_components(&components))
    }

    fn from_components(components: &[&str]) -> Self {
        HdfsPath(format!("/{}", components.join("/")))
    }

    /// Return the path as str.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if this path is the namespace root.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }
}

impl Display for HdfsPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for HdfsPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split path into components, dropping empty and `.` ones and rejecting `..`.
fn split_components(path: &str) -> Result<Vec<&str>> {
    let components = path
        .trim()
        .split('/')
        .filter(|v| !v.is_empty() && *v != ".")
        .collect::<Vec<&str>>();

    if components.iter().any(|v| *v == "..") {
        return Err(
            Error::new(ErrorKind::InvalidPath, "path must not contain '..'")
                .with_context("path", path),
        );
    }

    Ok(components)
}

/// resolve joins a configured root with a caller supplied relative path.
///
/// # Rules
///
/// - Root and relative are joined with exactly one `/`: (`/01`, `a.txt`) => `/01/a.txt`.
/// - Repeated slashes are collapsed: (`/01/`, `/sub//a.txt`) => `/01/sub/a.txt`.
/// - Leading `/` of relative is trimmed, relative never escapes root.
/// - `.` components are dropped: (`/01`, `./a.txt`) => `/01/a.txt`.
/// - Surrounding whitespace of both sides is trimmed: (`/01`, ` a.txt `) => `/01/a.txt`.
///
/// Returns [`ErrorKind::InvalidPath`] if relative is empty (or only slashes, dots and whitespace)
/// or either side contains a `..` component.
pub fn resolve(root: &str, relative: &str) -> Result<HdfsPath> {
    let rel = split_components(relative)?;
    if rel.is_empty() {
        return Err(
            Error::new(ErrorKind::InvalidPath, "relative path must not be empty")
                .with_context("root", root)
                .with_context("relative", relative),
        );
    }

    let mut components = split_components(root)?;
    components.extend(rel);

    Ok(HdfsPath::from_components(&components))
}

/// Make sure root is normalized to style like `/abc/def`.
///
/// # Normalize Rules
///
/// - All whitespace will be trimmed: ` abc/def ` => `abc/def`
/// - Internal // will be replaced by /: `abc///def` => `abc/def`
/// - Empty path will be `/`: `` => `/`
/// - Add leading `/` if not starts with: `abc/` => `/abc`
/// - Trailing `/` is removed: `/abc/` => `/abc`
pub fn normalize_root(v: &str) -> Result<HdfsPath> {
    HdfsPath::new(v).map_err(|err| {
        Error::new(ErrorKind::ConfigInvalid, "root is not a valid path")
            .with_context("root", v)
            .set_source(err)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve() {
        let cases = vec![
            ("plain", "/01", "a.txt", "/01/a.txt"),
            ("root with trailing slash", "/01/", "a.txt", "/01/a.txt"),
            ("relative with leading slash", "/01", "/a.txt", "/01/a.txt"),
            ("both slashes", "/01/", "/a.txt", "/01/a.txt"),
            ("nested", "/user/hadoop", "sub/dir/a.txt", "/user/hadoop/sub/dir/a.txt"),
            ("doubled inside", "//user//hadoop//", "sub///a.txt", "/user/hadoop/sub/a.txt"),
            ("namespace root", "/", "a.txt", "/a.txt"),
            ("empty root", "", "a.txt", "/a.txt"),
            ("root without leading slash", "01", "a.txt", "/01/a.txt"),
            ("trailing slash on relative", "/01", "dir/", "/01/dir"),
            ("current dir prefix", "/01", "./a.txt", "/01/a.txt"),
            ("current dir inside", "/01/./sub", "dir/./a.txt", "/01/sub/dir/a.txt"),
            ("surrounding whitespace", "/01", " a.txt ", "/01/a.txt"),
        ];

        for (name, root, relative, expected) in cases {
            let actual = resolve(root, relative).expect("must resolve");
            assert_eq!(actual.as_str(), expected, "{name}");
        }
    }

    #[test]
    fn test_resolve_never_produces_doubled_slash() {
        let roots = ["", "/", "//", "/01", "/01/", "01//", " /a//b/ "];
        let relatives = ["a", "/a", "a/", "//a//b//", "a/b/c.txt", "x y.txt"];

        for root in roots {
            for relative in relatives {
                let p = resolve(root, relative).expect("must resolve");
                assert!(p.as_str().starts_with('/'), "{root:?} + {relative:?}");
                assert!(!p.as_str().starts_with("//"), "{root:?} + {relative:?}");
                assert!(!p.as_str().contains("//"), "{root:?} + {relative:?}");
            }
        }
    }

    #[test]
    fn test_resolve_rejects_empty_relative() {
        for relative in ["", "   ", "/", "///", ".", "./", "/./."] {
            let err = resolve("/01", relative).expect_err("must fail");
            assert_eq!(err.kind(), ErrorKind::InvalidPath, "{relative:?}");
        }
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        for relative in ["..", "../etc/passwd", "a/../../b", "a/.."] {
            let err = resolve("/01", relative).expect_err("must fail");
            assert_eq!(err.kind(), ErrorKind::InvalidPath, "{relative:?}");
        }
        let err = resolve("/01/..", "a.txt").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::InvalidPath);
    }

    #[test]
    fn test_normalize_root() {
        let cases = vec![
            ("empty", "", "/"),
            ("slash", "/", "/"),
            ("many slashes", "///", "/"),
            ("no leading", "abc", "/abc"),
            ("trailing", "/abc/", "/abc"),
            ("internal", "abc///def", "/abc/def"),
            ("whitespace", " /abc/def ", "/abc/def"),
            ("current dir", "./abc/./def/.", "/abc/def"),
            ("only current dir", ".", "/"),
        ];

        for (name, input, expected) in cases {
            let actual = normalize_root(input).expect("must normalize");
            assert_eq!(actual.as_str(), expected, "{name}");
        }

        assert!(normalize_root("").expect("must normalize").is_root());
        let err = normalize_root("/a/../b").expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    }
}
