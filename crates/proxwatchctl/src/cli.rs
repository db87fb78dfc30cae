//! Command-line argument parsing.
//!
//! Keeps argument parsing separate from execution logic; handlers live in
//! `commands.rs`.

use clap::{Parser, Subcommand};

/// Proxwatch - cluster monitoring dashboard client
#[derive(Parser)]
#[command(name = "proxwatchctl")]
#[command(about = "Monitor registered Proxmox clusters", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides $PROXWATCH_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered clusters
    List {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Register a new cluster endpoint
    Register {
        /// Display name for the cluster
        #[arg(long)]
        name: String,

        /// Proxmox API endpoint, e.g. https://pve.lan:8006
        #[arg(long)]
        api_endpoint: String,

        /// API username, e.g. root@pam
        #[arg(long)]
        username: String,

        /// API password
        #[arg(long)]
        password: String,
    },

    /// Show one cluster
    Show {
        /// Cluster id
        id: String,
    },

    /// Delete a registered cluster
    Delete {
        /// Cluster id
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show the disk inventory of every node
    Disks {
        /// Cluster id
        id: String,
    },

    /// Show live node health and resource counts (one-shot)
    Status {
        /// Cluster id
        id: String,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Live status dashboard, refreshed automatically
    Watch {
        /// Cluster id
        id: String,

        /// Refresh period in seconds (0 disables automatic refresh)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}
