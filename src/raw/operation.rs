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

use http::Method;

/// Operation is the remote operation selected by the `op=` query parameter.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[non_exhaustive]
pub enum Operation {
    /// Create (or overwrite) a file, two hops through a data node.
    Create,
    /// Delete a file or an empty directory.
    Delete,
    /// List the statuses of a directory.
    ListStatus,
    /// Open a file for read, redirected to a data node.
    Open,
}

impl Operation {
    /// Convert self into the `op=` token.
    pub fn into_static(self) -> &'static str {
        self.into()
    }

    /// The http method this operation is sent with.
    pub fn method(self) -> Method {
        match self {
            Operation::Create => Method::PUT,
            Operation::Delete => Method::DELETE,
            Operation::ListStatus | Operation::Open => Method::GET,
        }
    }

    /// Query parameters this operation always carries besides `op` and `user.name`.
    ///
    /// CREATE always overwrites: there is no conflict detection.
    pub fn default_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Operation::Create => &[("overwrite", "true")],
            Operation::Delete | Operation::ListStatus | Operation::Open => &[],
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

impl From<Operation> for &'static str {
    fn from(v: Operation) -> &'static str {
        match v {
            Operation::Create => "CREATE",
            Operation::Delete => "DELETE",
            Operation::ListStatus => "LISTSTATUS",
            Operation::Open => "OPEN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wire_mapping() {
        let cases = vec![
            (Operation::Create, "CREATE", Method::PUT),
            (Operation::Delete, "DELETE", Method::DELETE),
            (Operation::ListStatus, "LISTSTATUS", Method::GET),
            (Operation::Open, "OPEN", Method::GET),
        ];

        for (op, token, method) in cases {
            assert_eq!(op.to_string(), token);
            assert_eq!(op.method(), method, "{token}");
        }
        assert_eq!(Operation::Create.default_params(), &[("overwrite", "true")]);
        assert!(Operation::Delete.default_params().is_empty());
    }
}
