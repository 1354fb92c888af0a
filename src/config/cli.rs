use crate::config::OutputFormat;
use crate::core::bulk::BulkAction;
use crate::core::stop_place_table::{SortKey, DEFAULT_PER_PAGE};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gbfs-console", version)]
#[command(about = "Admin console for the Lamassu GBFS aggregation backend")]
pub struct Cli {
    /// TOML config file; defaults to ./gbfs-console.toml when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, either the root or a `/admin/ui` or `/status/ui` page
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token for admin calls
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage feed providers and their subscriptions
    Providers {
        #[command(subcommand)]
        command: ProvidersCommand,
    },
    /// Inspect and clear the backend cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
    /// Spatial index maintenance
    Spatial {
        #[command(subcommand)]
        command: SpatialCommand,
    },
    /// Public status board
    Status {
        #[arg(long)]
        watch: bool,
        /// Refresh interval in seconds; defaults to [polling].status_interval_seconds
        #[arg(long)]
        interval: Option<u64>,
    },
    /// GBFS validation reports
    Validation {
        #[command(subcommand)]
        command: ValidationCommand,
    },
    /// Compose a MapLibre style with the stations of the given systems
    Map {
        #[arg(required = true)]
        system_ids: Vec<String>,
        /// Write the style here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Stop places of the given systems as a table
    Stops {
        #[command(subcommand)]
        command: StopsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum StopsCommand {
    List {
        #[arg(required = true)]
        system_ids: Vec<String>,
        #[arg(long, value_enum, default_value_t = SortKey::Name)]
        sort: SortKey,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProvidersCommand {
    List,
    Show {
        system_id: String,
    },
    /// Create a provider from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a provider with the JSON file's content
    Update {
        system_id: String,
        #[arg(long)]
        file: PathBuf,
    },
    Delete {
        system_id: String,
    },
    Start(LifecycleArgs),
    Stop(LifecycleArgs),
    Restart(LifecycleArgs),
    Enable {
        system_id: String,
    },
    Disable {
        system_id: String,
    },
    /// Subscription status of every provider
    Statuses,
    /// Re-render the provider table until Ctrl-C
    Watch {
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Import providers from the backend's static configuration file
    Migrate,
    /// Run an action for several providers at once
    Bulk {
        #[command(subcommand)]
        action: BulkCommand,
    },
}

#[derive(Args, Debug)]
pub struct LifecycleArgs {
    pub system_id: String,
    /// Poll until the subscription leaves STARTING/STOPPING
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct BulkTargets {
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub system_ids: Vec<String>,
    #[arg(long)]
    pub all: bool,
}

#[derive(Subcommand, Debug)]
pub enum BulkCommand {
    Start(BulkTargets),
    Stop(BulkTargets),
    Restart(BulkTargets),
    Enable(BulkTargets),
    Disable(BulkTargets),
}

impl BulkCommand {
    pub fn split(&self) -> (BulkAction, &BulkTargets) {
        match self {
            BulkCommand::Start(t) => (BulkAction::Start, t),
            BulkCommand::Stop(t) => (BulkAction::Stop, t),
            BulkCommand::Restart(t) => (BulkAction::Restart, t),
            BulkCommand::Enable(t) => (BulkAction::Enable, t),
            BulkCommand::Disable(t) => (BulkAction::Disable, t),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cache keys grouped by type
    Keys,
    ClearVehicles,
    ClearOld,
    /// Wipe the whole cache database
    ClearDb,
}

#[derive(Subcommand, Debug)]
pub enum SpatialCommand {
    Orphans,
    ClearOrphans,
}

#[derive(Subcommand, Debug)]
pub enum ValidationCommand {
    /// Latest report summary per system
    List,
    Show {
        system_id: String,
        /// Expand example paths for every error group
        #[arg(long)]
        details: bool,
    },
    History {
        system_id: String,
    },
}
