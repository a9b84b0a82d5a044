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

//! Errors that returned by webhdfs-client
//!
//! Every failure is a classified [`Error`], callers branch on [`ErrorKind`]
//! instead of parsing messages.
//!
//! # Examples
//!
//! ```no_run
//! # use webhdfs_client::WebhdfsClient;
//! use webhdfs_client::ErrorKind;
//! # async fn test(client: WebhdfsClient) -> webhdfs_client::Result<()> {
//! let path = client.resolve("a.txt")?;
//! if let Err(e) = client.write(&path, "hello").await {
//!     if e.kind() == ErrorKind::RemotePermissionDenied {
//!         println!("no permission on {path}")
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::backtrace::Backtrace;
use std::backtrace::BacktraceStatus;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::io;

/// Result that is a wrapper of `Result<T, webhdfs_client::Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// ErrorKind is all kinds of Error of webhdfs-client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Something happened that we can't classify, for example the request
    /// could not be built.
    Unexpected,
    /// The config for client is invalid.
    ConfigInvalid,

    /// The given path is empty or contains a `..` component.
    InvalidPath,
    /// The request never got a response: connect failure, broken body or
    /// timeout. Check [`Error::is_timeout`] for the timeout variant.
    ConnectionError,
    /// The coordinating node answered a write with 3xx but no `Location`.
    RedirectMissing,
    /// The response could not be interpreted: unparseable error body, a
    /// redirect outside of the write handshake or a non utf-8 body.
    ResponseDecode,
    /// Remote returned `FileNotFoundException`.
    RemoteFileNotFound,
    /// Remote returned `AccessControlException` or `SecurityException`.
    RemotePermissionDenied,
    /// Remote rejected the request arguments.
    RemoteBadRequest,
    /// Remote returned another 4xx exception, the raw message is kept.
    RemoteClientError,
    /// Remote returned 5xx. This is the only kind worth retrying.
    RemoteServerError,
}

impl ErrorKind {
    /// Convert self into static str.
    pub fn into_static(self) -> &'static str {
        self.into()
    }

    /// Backtrace is useless for expected outcomes like a missing file.
    fn disable_backtrace(&self) -> bool {
        matches!(self, ErrorKind::RemoteFileNotFound)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

impl From<ErrorKind> for &'static str {
    fn from(v: ErrorKind) -> &'static str {
        match v {
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::InvalidPath => "InvalidPath",
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::RedirectMissing => "RedirectMissing",
            ErrorKind::ResponseDecode => "ResponseDecode",
            ErrorKind::RemoteFileNotFound => "RemoteFileNotFound",
            ErrorKind::RemotePermissionDenied => "RemotePermissionDenied",
            ErrorKind::RemoteBadRequest => "RemoteBadRequest",
            ErrorKind::RemoteClientError => "RemoteClientError",
            ErrorKind::RemoteServerError => "RemoteServerError",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ErrorStatus {
    /// Permanent means without external changes, the error never changes.
    ///
    /// For example, remote returns a permission denied error.
    ///
    /// Users SHOULD never retry this operation.
    Permanent,
    /// Temporary means this error is returned for temporary.
    ///
    /// For example, the name node is restarting and returns 503.
    ///
    /// Users CAN retry the operation to resolve it.
    Temporary,
}

impl Display for ErrorStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStatus::Permanent => write!(f, "permanent"),
            ErrorStatus::Temporary => write!(f, "temporary"),
        }
    }
}

/// Error is the error struct returned by all webhdfs-client functions.
///
/// ## Display
///
/// - Via `Display`: a single line like
///
/// ```shell
/// RemotePermissionDenied (permanent) at CREATE, context: { path: /01/a.txt, status: 403 Forbidden } => Permission denied
/// ```
///
/// - Via `Debug`: multiple lines with context, source and backtrace (if captured).
///
/// - Via `{:#?}`: the conventional struct-style representation.
pub struct Error {
    kind: ErrorKind,
    message: String,

    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
    backtrace: Backtrace,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("status", &self.status);
            de.field("operation", &self.operation);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }
        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }
        if self.backtrace.status() == BacktraceStatus::Captured {
            writeln!(f)?;
            writeln!(f, "Backtrace:")?;
            writeln!(f, "{}", self.backtrace)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),

            status: ErrorStatus::Permanent,
            operation: "",
            context: Vec::default(),
            source: None,
            backtrace: if kind.disable_backtrace() {
                Backtrace::disabled()
            } else {
                Backtrace::capture()
            },
        }
    }

    /// Update error's operation.
    ///
    /// # Notes
    ///
    /// If the error already carries an operation, we will push a new context
    /// `(called, operation)`.
    pub fn with_operation(mut self, operation: impl Into<&'static str>) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }

        self.operation = operation.into();
        self
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Notes
    ///
    /// If the source has been set, we will raise a panic here.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "the source error has been set");

        self.source = Some(src.into());
        self
    }

    /// Set temporary status for error.
    ///
    /// By set temporary, we indicate this error is retryable.
    pub fn set_temporary(mut self) -> Self {
        self.status = ErrorStatus::Temporary;
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    ///
    /// For remote errors this is the `message` of the remote exception.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Return the wire operation this error happened at, like `CREATE`.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the first context value recorded under `key`.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if this error is temporary.
    pub fn is_temporary(&self) -> bool {
        self.status == ErrorStatus::Temporary
    }

    /// Check if this error is a connection error caused by an expired timeout.
    pub fn is_timeout(&self) -> bool {
        self.kind == ErrorKind::ConnectionError && self.context("timeout") == Some("true")
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = match err.kind() {
            ErrorKind::RemoteFileNotFound => io::ErrorKind::NotFound,
            ErrorKind::RemotePermissionDenied => io::ErrorKind::PermissionDenied,
            ErrorKind::InvalidPath | ErrorKind::RemoteBadRequest => io::ErrorKind::InvalidInput,
            ErrorKind::ConnectionError if err.is_timeout() => io::ErrorKind::TimedOut,
            _ => io::ErrorKind::Other,
        };

        io::Error::new(kind, err)
    }
}
