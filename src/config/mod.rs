pub mod feed_kind;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use std::path::PathBuf;
use url::Url;

pub use feed_kind::FeedKind;

#[derive(Debug, Clone, Parser)]
#[command(name = "socialgram", version, about)]
pub struct Config {
    /// Base URL of the Socialgram API
    #[arg(long, env = "SOCIALGRAM_API", default_value = "http://localhost:3000/api")]
    api: Url,
    /// Session token sent as a bearer credential
    #[arg(long, env = "SOCIALGRAM_TOKEN")]
    token: Option<String>,
    /// Limit request concurrency
    #[arg(long, default_value = "5")]
    limit: usize,
    /// Retry transient failures of read requests
    #[arg(long, default_value = "0")]
    retries: u32,
    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
    #[command(subcommand)]
    pub command: Command,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show a feed
    Feed {
        #[arg(short, long, default_value_t = FeedKind::Home)]
        kind: FeedKind,
    },
    /// Show a user's profile and posts
    Profile { username: String },
    /// Like or unlike a post
    Like { post: String },
    /// Like or unlike a reel
    LikeReel { reel: String },
    /// Comment on a post
    Comment { post: String, text: String },
    /// Follow or unfollow a user
    Follow { username: String },
    /// Repost a post with an optional comment
    Repost {
        post: String,
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Share a photo or video
    Post {
        file: PathBuf,
        #[arg(short, long)]
        caption: Option<String>,
        /// Ask the assistant for a caption when none is given
        #[arg(long, name = "suggest-caption")]
        suggest_caption: bool,
    },
    /// Share a story
    Story { file: PathBuf },
    /// Play through the stories tray
    Stories,
    /// List notifications and mark them read
    Notifications,
    /// Send a direct message
    Send { username: String, text: String },
    /// Ask the assistant
    Chat { text: String },
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub const fn api(&self) -> &Url {
        &self.api
    }
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(|token| token.trim_start_matches("Bearer ").trim())
            .filter(|token| !token.is_empty())
    }
    pub const fn limit(&self) -> usize {
        self.limit
    }
    pub const fn retries(&self) -> u32 {
        self.retries
    }
    pub const fn timeout(&self) -> u64 {
        self.timeout
    }
}
