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

//! Async client for the [WebHDFS](https://hadoop.apache.org/docs/stable/hadoop-project-dist/hadoop-hdfs/WebHDFS.html) REST protocol.
//!
//! - Write: CREATE through the coordinating node, then the payload to the data
//!   node it redirects to.
//! - Delete and list: a single request, the raw JSON body is returned.
//! - Errors: every failure is an [`Error`] whose [`ErrorKind`] tells what
//!   happened, only [`ErrorKind::RemoteServerError`] is worth retrying.
//!
//! # Quick Start
//!
//! ```no_run
//! use webhdfs_client::Result;
//! use webhdfs_client::WebhdfsBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut builder = WebhdfsBuilder::default();
//!     builder
//!         .endpoint("http://127.0.0.1:9870/webhdfs/v1")
//!         .user_name("hadoop")
//!         .root("/01");
//!     let client = builder.build()?;
//!
//!     // Write data
//!     let path = client.resolve("a.txt")?;
//!     client.write(&path, "hello").await?;
//!
//!     // List the root
//!     let listing = client.list(client.root()).await?;
//!     println!("{listing}");
//!
//!     // Delete
//!     let deleted = client.delete(&path).await?;
//!     println!("{deleted}");
//!
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]
// Deny unused qualifications.
#![deny(unused_qualifications)]

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

// Public modules, they will be accessed like `webhdfs_client::raw::Xxxx`
pub mod raw;
pub mod services;

pub use raw::HdfsPath;
pub use services::webhdfs::WebhdfsBuilder;
pub use services::webhdfs::WebhdfsClient;
pub use services::webhdfs::WebhdfsConfig;
