// src/cli.rs

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "logsift - upload text logs and search them by keyword and date",
    long_about = "logsift stores uploaded log files (plain .txt/.csv files or .zip/.rar/.7z archives of them) in a local SQLite database and lets you search them by keyword and date range."
)]
pub struct Cli {
    /// Path to a config file. Defaults to ~/.config/logsift/config.toml if present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Acting user recorded in log events. Defaults to $USER.
    #[arg(long, global = true, env = "USER")]
    pub user: Option<String>,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates the database and the upload directory.
    Init,

    /// Uploads a log file or an archive of log files.
    Upload {
        /// File to upload.
        file: PathBuf,

        #[arg(short, long, help = "Name to upload the file under (defaults to its file name)")]
        name: Option<String>,
    },

    /// Searches stored logs. At least one of --start, --end or --keyword is required.
    Search {
        #[arg(short, long, help = "Earliest log date, inclusive (format: YYYY-MM-DDTHH:MM)")]
        start: Option<String>,

        #[arg(short, long, help = "Latest log date, inclusive (format: YYYY-MM-DDTHH:MM)")]
        end: Option<String>,

        #[arg(short, long, help = "Case-sensitive text the log content must contain")]
        keyword: Option<String>,

        #[arg(short, long, help = "Result order: newest or oldest")]
        order: Option<String>,
    },

    /// Shows the full content of one log.
    Show {
        #[arg(help = "The numeric ID of the log")]
        id: i64,
    },

    /// Deletes one or more logs.
    #[command(verbatim_doc_comment)]
    Del {
        /// A list of log IDs to delete.
        /// Can be a single ID, comma-separated IDs, or a range.
        /// Examples:
        ///   logsift del 5          (deletes log #5)
        ///   logsift del 3,5,8      (deletes logs #3, #5, #8)
        ///   logsift del 7-9        (deletes logs #7, #8, #9)
        #[arg(value_name = "ID_LIST")]
        ids: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}
