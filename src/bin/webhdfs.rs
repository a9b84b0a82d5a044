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

//! The `webhdfs` command-line interface.
//!
//! Connection settings come from a toml config file (default
//! `~/.config/webhdfs/config.toml`) and `WEBHDFS_{OPTION}` environment
//! variables, environment variables have higher precedence:
//!
//! ```toml
//! endpoint = "http://192.168.48.129:9870/webhdfs/v1"
//! user_name = "hadoop"
//! root = "/01"
//! ```

use std::fs;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use clap::value_parser;
use webhdfs_client::services::webhdfs::parse_boolean;
use webhdfs_client::services::webhdfs::parse_list_status;
use webhdfs_client::services::webhdfs::FileStatusType;
use webhdfs_client::HdfsPath;
use webhdfs_client::WebhdfsClient;
use webhdfs_client::WebhdfsConfig;

#[derive(Debug, clap::Parser)]
#[command(about, version)]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true, value_parser = value_parser!(PathBuf))]
    config: Option<PathBuf>,

    #[command(subcommand)]
    subcommand: Subcommand,
}

#[derive(Debug, clap::Subcommand)]
enum Subcommand {
    /// Create or overwrite a remote file.
    Put {
        /// Remote path, relative paths resolve under the configured root.
        target: String,
        /// Local file to upload, read stdin if absent.
        #[arg(short, long, value_parser = value_parser!(PathBuf))]
        file: Option<PathBuf>,
    },
    /// Delete a remote file or empty directory.
    Rm {
        /// Remote path, relative paths resolve under the configured root.
        target: String,
    },
    /// List a remote directory, default to the configured root.
    Ls {
        /// Remote path, relative paths resolve under the configured root.
        target: Option<String>,
        /// Print the raw response instead of entry names.
        #[arg(long)]
        raw: bool,
    },
    /// Print the content of a remote file.
    Cat {
        /// Remote path, relative paths resolve under the configured root.
        target: String,
    },
}

impl Subcommand {
    async fn run(&self, client: &WebhdfsClient) -> Result<()> {
        match self {
            Subcommand::Put { target, file } => {
                let path = parse_target(client, target)?;
                let content = match file {
                    Some(file) => fs::read(file)?,
                    None => {
                        let mut buf = Vec::new();
                        std::io::stdin().read_to_end(&mut buf)?;
                        buf
                    }
                };
                let body = client.write(&path, content).await?;
                if !body.is_empty() {
                    println!("{body}");
                }
            }
            Subcommand::Rm { target } => {
                let path = parse_target(client, target)?;
                let body = client.delete(&path).await?;
                if !parse_boolean(&body)? {
                    eprintln!("{path}: nothing to delete");
                }
            }
            Subcommand::Ls { target, raw } => {
                let path = match target {
                    Some(target) => parse_target(client, target)?,
                    None => client.root().clone(),
                };
                let body = client.list(&path).await?;
                if *raw {
                    println!("{body}");
                    return Ok(());
                }
                for entry in parse_list_status(&body)? {
                    match entry.ty {
                        FileStatusType::Directory => println!("{}/", entry.path_suffix),
                        _ => println!("{}", entry.path_suffix),
                    }
                }
            }
            Subcommand::Cat { target } => {
                let path = parse_target(client, target)?;
                let content = client.read(&path).await?;
                std::io::stdout().write_all(&content)?;
            }
        }
        Ok(())
    }
}

/// Absolute targets are used as is, others resolve under root.
fn parse_target(client: &WebhdfsClient, target: &str) -> Result<HdfsPath> {
    if target.starts_with('/') {
        Ok(HdfsPath::new(target)?)
    } else {
        Ok(client.resolve(target)?)
    }
}

/// Load config from file then overlay environment variables.
///
/// A missing config file is not an error.
fn load_config(path: &Path) -> Result<WebhdfsConfig> {
    let file = if path.exists() {
        let data = fs::read_to_string(path)?;
        toml::from_str(&data)?
    } else {
        WebhdfsConfig::default()
    };
    Ok(file.merge(WebhdfsConfig::from_env()?))
}

fn default_config_path() -> Result<PathBuf> {
    let d = dirs::config_dir().ok_or_else(|| anyhow!("unknown config dir"))?;
    Ok(d.join("webhdfs/config.toml"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let cli: Cli = clap::Parser::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let client = WebhdfsClient::from_config(load_config(&config_path)?)?;

    cli.subcommand.run(&client).await
}
