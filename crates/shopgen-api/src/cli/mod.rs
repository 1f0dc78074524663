//! CLI command definitions for the `shopgen` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod check;
pub mod generate;
pub mod skill;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use shopgen_infra::config::DEFAULT_CONFIG_FILE;

/// Retail content generation with model fallback and compliance checks.
#[derive(Parser)]
#[command(name = "shopgen", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "SHOPGEN_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,shopgen=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate content for a skill or feature id.
    #[command(alias = "gen")]
    Generate {
        /// Skill or feature id (e.g., moments-copywriter, video_script).
        skill: String,

        /// The user message.
        message: String,

        /// Brand context appended to the system prompt.
        #[arg(long)]
        shop_context: Option<String>,

        /// Model catalogue id replacing the skill's primary model.
        #[arg(long)]
        model: Option<String>,

        /// Image URL or data URI to attach (repeatable).
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Check content for forbidden terms and score its quality.
    Check {
        /// Content to check.
        content: String,

        /// Target platform (douyin, xiaohongshu, weixin, general).
        #[arg(long)]
        platform: Option<String>,

        /// Content type for quality weighting (e.g., moments, article).
        #[arg(long)]
        content_type: Option<String>,

        /// Feature id used to infer platform and content type.
        #[arg(long)]
        feature: Option<String>,

        /// Also print a copy with forbidden terms replaced.
        #[arg(long)]
        replace: bool,

        /// Skip the quality score.
        #[arg(long)]
        no_quality: bool,
    },

    /// List resolvable skill and feature ids.
    Skills,
}
