// src/args.rs

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use inventory_client::handlers::render::OutputFormat;
use uuid::Uuid;

/// Terminal client for the Multi-T inventory API
#[derive(Parser, Debug)]
#[command(name = "inventory-client", version, about, long_about = None)]
pub struct Cli {
    /// API base URL (overrides INVENTORY_API_URL)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides INVENTORY_SESSION_FILE)
    #[arg(long = "session-file", global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Landing page
    Home,

    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "INVENTORY_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session token
    Logout,

    /// Show the current identity
    Me,

    /// List the tenant's inventory joined with the product catalog
    Inventory {
        #[arg(long)]
        skip: Option<u32>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// List all tenants (superusers only)
    Tenants,

    /// Request a restock for an inventory item
    Restock {
        /// Inventory item id (see `inventory`)
        inventory_id: Uuid,

        /// Quantity to request (whole number, at least 1)
        #[arg(long, allow_hyphen_values = true)]
        quantity: String,
    },
}
