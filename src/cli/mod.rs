//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! `openproject` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::filter::{FilterField, FilterOptions};

/// OpenProject API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "openproject", about = "OpenProject API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log level selected by the verbosity flags.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single resource by ID.
    Get {
        /// The type of resource to get.
        entity: Entity,

        /// The resource ID (`me` is accepted for users).
        id: String,
    },

    /// List resources with optional filtering and pagination.
    List {
        /// The type of resource to list.
        entity: Entity,

        /// Page number (1-indexed).
        #[arg(long)]
        offset: Option<u32>,

        /// Number of items per page.
        #[arg(long)]
        page_size: Option<u32>,

        /// Fetch every page concurrently instead of a single page.
        #[arg(long, conflicts_with = "offset")]
        all: bool,

        /// Filter condition such as `status=1` or `subject~release` (repeatable).
        #[arg(long = "filter", value_name = "FIELD<OP>VALUE", value_parser = parse_filter)]
        filters: Vec<FilterField>,

        /// Project ID or identifier (work packages, categories).
        #[arg(long)]
        project: Option<String>,

        /// Work package ID (activities).
        #[arg(long)]
        work_package: Option<u64>,
    },

    /// Delete a resource.
    Delete {
        /// The type of resource to delete.
        entity: Entity,

        /// The resource ID.
        id: u64,
    },

    /// Download the content of an attachment.
    Download {
        /// Attachment ID.
        id: u64,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Command {
    /// Filter options of a `list` command, empty for other commands.
    pub fn filter_options(&self) -> FilterOptions {
        match self {
            Command::List { filters, .. } => filters.iter().cloned().collect(),
            _ => FilterOptions::new(),
        }
    }
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A work package (task, bug, ...).
    #[value(alias = "work-packages", alias = "wp")]
    WorkPackage,
    /// A user.
    #[value(alias = "users")]
    User,
    /// A project.
    #[value(alias = "projects")]
    Project,
    /// A work package status.
    #[value(alias = "statuses")]
    Status,
    /// A saved query.
    #[value(alias = "queries")]
    Query,
    /// An attachment.
    #[value(alias = "attachments")]
    Attachment,
    /// A work package activity.
    #[value(alias = "activities")]
    Activity,
    /// A work package category.
    #[value(alias = "categories")]
    Category,
    /// A wiki page.
    #[value(alias = "wiki-pages")]
    WikiPage,
}

fn parse_filter(raw: &str) -> Result<FilterField, String> {
    raw.parse().map_err(|e: crate::OpenProjectError| e.to_string())
}
