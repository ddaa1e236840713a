// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::conf;
use crate::http::HTTPError;
use crate::instagram::{Credentials, InstagramScraper};
use crate::scrape;
use crate::sink;
use crate::tiktok::TikTokScraper;
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::info;
use std::path::PathBuf;
use thiserror::Error;

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Dumps Instagram and TikTok comment threads to CSV", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity<InfoLevel> {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dump comments on Instagram posts
    #[clap(alias = "ig")]
    Instagram(InstagramConfig),

    /// Dump comments on TikTok videos
    #[clap(alias = "tt")]
    Tiktok(TikTokConfig),
}

#[derive(Args, Debug)]
struct InstagramConfig {
    /// CSV file listing post shortcodes in its first column
    #[arg(long, value_name = "FILE", default_value = conf::INSTAGRAM_INPUT)]
    input_file: PathBuf,

    /// Where to write the comments
    #[arg(short, long, value_name = "FILE", default_value = conf::INSTAGRAM_OUTPUT)]
    output: PathBuf,

    /// Value of the `sessionid` cookie
    #[arg(long, env = conf::SESSION_ID_ENV, hide_env_values = true)]
    session_id: String,

    /// Value of the `ds_user_id` cookie
    #[arg(long, env = conf::USER_ID_ENV)]
    user_id: String,

    /// Value of the `csrftoken` cookie
    #[arg(long, env = conf::CSRF_TOKEN_ENV, hide_env_values = true)]
    csrf_token: String,

    /// Value of the `mid` cookie
    #[arg(long, env = conf::MACHINE_ID_ENV, hide_env_values = true)]
    machine_id: String,
}

impl InstagramConfig {
    fn credentials(&self) -> Credentials {
        Credentials::new(
            &self.session_id,
            &self.user_id,
            &self.csrf_token,
            &self.machine_id,
        )
    }
}

#[derive(Args, Debug)]
struct TikTokConfig {
    /// CSV file listing video ids in its first column
    #[arg(long, value_name = "FILE", default_value = conf::TIKTOK_INPUT)]
    input_file: PathBuf,

    /// Where to write the comments
    #[arg(short, long, value_name = "FILE", default_value = conf::TIKTOK_OUTPUT)]
    output: PathBuf,
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the command-line program using its stored configuration options.
    ///
    /// Only failing to build an HTTP client or to write the output file is
    /// an error. Everything else is logged and skipped.
    pub async fn run(&self) -> Result<(), Error> {
        let written = match &self.config.command {
            Command::Instagram(config) => {
                let scraper = InstagramScraper::new(config.credentials())?;
                scrape::dump(&scraper, &config.input_file, &config.output).await?
            }
            Command::Tiktok(config) => {
                let scraper = TikTokScraper::new()?;
                scrape::dump(&scraper, &config.input_file, &config.output).await?
            }
        };

        if written.is_none() {
            info!("Nothing to do");
        }
        Ok(())
    }
}

/// An error that stops the program.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client could not be set up.
    #[error("{0}")]
    Http(#[from] HTTPError),

    /// The output file could not be written.
    #[error("Could not save comments: {0}")]
    Sink(#[from] sink::Error),
}
