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

//! [WebHDFS](https://hadoop.apache.org/docs/stable/hadoop-project-dist/hadoop-hdfs/WebHDFS.html) service.
//!
//! # Capabilities
//!
//! - [x] write (CREATE, two hops, always overwrites)
//! - [x] delete (DELETE)
//! - [x] list (LISTSTATUS)
//! - [x] read (OPEN)
//! - [ ] append, rename, permissions
//!
//! # Configuration
//!
//! - `endpoint`: service base url, default `http://127.0.0.1:9870/webhdfs/v1`
//! - `user_name`: acting user, required
//! - `root`: root relative paths resolve under, default `/`
//! - `timeout`: request timeout in seconds
//! - `skip_first_hop_payload`: send an empty body to the coordinating node

mod backend;
pub use backend::WebhdfsBuilder;
pub use backend::WebhdfsClient;

mod config;
pub use config::WebhdfsConfig;

mod core;
pub use self::core::build_operation_url;

mod error;
pub use error::classify;

mod message;
pub use message::parse_boolean;
pub use message::parse_list_status;
pub use message::FileStatus;
pub use message::FileStatusType;

mod writer;
