//! CLI argument definitions using clap

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use confab_core::config::{StoreConfig, ENV_CACHE_DIR, ENV_TTL};
use confab_core::error::ConfabResult;
use confab_core::record::{Provider, RecordKind};

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Composable JSONL pipeline for chat conversation records")]
#[command(
    long_about = r#"Composable JSONL pipeline for chat conversation records.

Every subcommand is one stream stage: records in on stdin, records out
on stdout, diagnostics on stderr. Typical pipeline:

  cat raw-capture.jsonl \
      | confab normalize --provider claude \
      | confab store \
      | confab render > transcript.md

Cache commands read CONFAB_CACHE_DIR and CONFAB_TTL when the flags are
not given; the built-in defaults are ~/.confab/cache and 15m."#
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode provider-native raw JSONL into canonical records
    Normalize(NormalizeArgs),
    /// Persist canonical records, emitting the stored cache entries
    Store(StoreArgs),
    /// Look up one cached record and report its staleness verdict
    Get(GetArgs),
    /// Stream cached entries matching a scope
    List(ListArgs),
    /// Remove one cached entry so the next get misses
    Invalidate(InvalidateArgs),
    /// Render canonical records or cache entries as Markdown
    Render,
}

impl Commands {
    /// Stage name used in diagnostics.
    pub fn stage_name(&self) -> &'static str {
        match self {
            Commands::Normalize(_) => "normalize",
            Commands::Store(_) => "store",
            Commands::Get(_) => "get",
            Commands::List(_) => "list",
            Commands::Invalidate(_) => "invalidate",
            Commands::Render => "render",
        }
    }
}

#[derive(Args)]
pub struct NormalizeArgs {
    /// Provider whose raw records are on stdin (claude, chatgpt)
    #[arg(long)]
    pub provider: Provider,
}

/// Flags shared by every cache-touching stage.
#[derive(Args)]
pub struct CacheArgs {
    /// Cache root directory
    #[arg(long, env = ENV_CACHE_DIR)]
    pub cache_dir: Option<PathBuf>,

    /// Freshness window, humantime syntax ("90s", "15m", "2h");
    /// stamped onto entries on writes, imposed on the verdict on reads
    #[arg(long, env = ENV_TTL, value_parser = parse_ttl)]
    pub ttl: Option<Duration>,
}

impl CacheArgs {
    pub fn store_config(&self) -> ConfabResult<StoreConfig> {
        let root = match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => StoreConfig::default_root()?,
        };
        let mut config = StoreConfig::new(root);
        if let Some(ttl) = self.ttl {
            config = config.with_ttl(ttl);
        }
        Ok(config)
    }
}

#[derive(Args)]
pub struct StoreArgs {
    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub cache: CacheArgs,

    /// Provider of the record
    #[arg(long)]
    pub provider: Provider,

    /// Record kind (organization, conversation, message)
    #[arg(long)]
    pub kind: RecordKind,

    /// Provider-native record id
    #[arg(long)]
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub cache: CacheArgs,

    /// Only entries from this provider
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Only entries of this kind
    #[arg(long)]
    pub kind: Option<RecordKind>,

    /// Only entries whose id starts with this prefix
    #[arg(long)]
    pub id_prefix: Option<String>,
}

#[derive(Args)]
pub struct InvalidateArgs {
    #[command(flatten)]
    pub cache: CacheArgs,

    /// Provider of the record
    #[arg(long)]
    pub provider: Provider,

    /// Record kind (organization, conversation, message)
    #[arg(long)]
    pub kind: RecordKind,

    /// Provider-native record id
    #[arg(long)]
    pub id: String,
}

fn parse_ttl(raw: &str) -> Result<Duration, humantime::DurationError> {
    humantime::parse_duration(raw)
}
