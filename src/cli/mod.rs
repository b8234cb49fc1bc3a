//! CLI module

pub mod init;
pub mod serve;
pub mod tasks;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::address::parse_address;
use crate::error::{Result, TodoError};
use crate::ledger::Account;
use crate::storage::{self, config::Config};

#[derive(Parser)]
#[command(name = "todo-ledger")]
#[command(version)]
#[command(about = "Per-account to-do ledger with a REST API")]
pub struct Cli {
    /// Data directory (defaults to $TODO_LEDGER_HOME or ~/.todo-ledger)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Account to act as (defaults to accounts.default in config.toml)
    #[arg(short, long, global = true)]
    pub account: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<IpAddr>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Keep the ledger in memory only
        #[arg(long)]
        no_persist: bool,
    },
    /// Write a config.toml into the data directory
    Init {
        /// Additional known accounts
        #[arg(long = "known")]
        known: Vec<String>,
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Add a task
    Add { description: String },
    /// Replace a task's description
    Edit { id: u64, description: String },
    /// Flip a task between done and not done
    Toggle { id: u64 },
    /// Soft-delete a task
    Delete { id: u64 },
    /// Show one task
    Show { id: u64 },
    /// List tasks
    List {
        /// Include deleted tasks
        #[arg(long)]
        all: bool,
    },
    /// Task counters for the account
    Stats,
    /// List any address's tasks
    User { address: String },
    /// Accounts that hold tasks
    Accounts,
}

/// Resolved data directory and configuration
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    /// `--account` from the command line
    pub account: Option<String>,
}

impl Context {
    /// Load config.toml and apply environment overrides
    pub fn load(data_dir: Option<PathBuf>, account: Option<String>) -> Result<Self> {
        let data_dir = data_dir.unwrap_or_else(storage::default_data_dir);
        let mut config = storage::config::load_config(&data_dir)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(Self {
            data_dir,
            config,
            account,
        })
    }

    /// `--account`, else the configured default
    pub fn resolve_account(&self) -> Result<Option<Account>> {
        match &self.account {
            Some(raw) => parse_address(raw).map(Some),
            None => self.config.default_account(),
        }
    }

    /// Like [`Context::resolve_account`] but an account is required
    pub fn require_account(&self) -> Result<Account> {
        self.resolve_account()?.ok_or_else(|| {
            TodoError::invalid_input("No account given: pass --account or set accounts.default")
        })
    }
}
