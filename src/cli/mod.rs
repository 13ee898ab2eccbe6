//! CLI module - Command-line interface for the portal account store
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Portal accounts - alumni portal account and credential store
#[derive(Parser)]
#[command(name = "portal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a default config.toml in the current directory
    InitConfig,

    /// Create a new account
    Register {
        email: String,
        password: String,
        /// Display name
        #[arg(required = true)]
        name: Vec<String>,
    },

    /// Sign in and remember the session
    Login { email: String, password: String },

    /// Sign out of the current session
    Logout,

    /// Show the signed-in account
    Whoami,

    /// List all accounts (admin)
    #[command(alias = "ls")]
    Users,

    /// Disable an account (admin)
    Disable { email: String },

    /// Re-enable an account (admin)
    Enable { email: String },

    /// Post an announcement (admin)
    Announce {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show announcements, newest first
    Announcements,

    /// Show recent activity (admin)
    Activity {
        /// Number of entries to show
        #[arg(long, short = 'n', default_value_t = crate::constants::limits::DEFAULT_ACTIVITY_LIMIT)]
        limit: usize,
    },

    /// Show account counters (admin)
    Stats,

    /// Rate a password without creating anything
    Strength { password: String },
}

pub use commands::*;
