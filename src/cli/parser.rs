use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for rKickCounter
/// CLI application to log baby kicks with SQLite
#[derive(Parser)]
#[command(
    name = "rkickcounter",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple kick counter CLI: log baby kicks, review patterns and share a PDF report",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Unlock the counter for today with the PIN
    Login {
        /// PIN digits; prompted for when omitted
        #[arg(long)]
        pin: Option<String>,
    },

    /// Show today's count and login state
    Status,

    /// Log one kick now
    Add,

    /// Delete today's count and today's kicks
    Reset {
        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List logged kicks
    List {
        #[arg(long = "today", help = "Show only today's kicks")]
        today: bool,

        #[arg(
            long,
            short,
            value_name = "RANGE",
            conflicts_with = "today",
            help = "Filter by year/month/day or a custom range (YYYY-MM-DD:YYYY-MM-DD)"
        )]
        range: Option<String>,

        #[arg(long = "json", help = "Print the kicks as JSON")]
        json: bool,
    },

    /// Show interval and time-of-day analytics
    Analytics {
        #[arg(long, value_name = "N", help = "Look-back window in days")]
        days: Option<u32>,
    },

    /// Generate the PDF kick report
    Report {
        #[arg(long, value_name = "FILE", help = "Output file (default from config)")]
        file: Option<String>,

        #[arg(long, value_name = "N", help = "Look-back window in days")]
        days: Option<u32>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export kick events
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check integrity and daily count consistency")]
        check: bool,

        #[arg(long = "reconcile", help = "Rebuild daily counts from the kick events")]
        reconcile: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

impl Commands {
    /// Commands that need today's PIN login first.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            Commands::Add
                | Commands::Reset { .. }
                | Commands::List { .. }
                | Commands::Analytics { .. }
                | Commands::Report { .. }
                | Commands::Export { .. }
                | Commands::Backup { .. }
                | Commands::Log { .. }
        ) || matches!(
            self,
            Commands::Db {
                check,
                reconcile,
                vacuum,
                info,
                ..
            } if *check || *reconcile || *vacuum || *info
        )
    }
}
