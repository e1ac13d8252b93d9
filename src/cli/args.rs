// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List all notes with their images resolved
    List {
        /// Output notes as JSON
        #[arg(long, conflicts_with = "open")]
        json: bool,

        /// Render the notes as HTML and open them in the browser
        #[arg(long)]
        open: bool,
    },

    /// Create a note, optionally attaching an image
    Create {
        #[arg(short, long, default_value = "")]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Image file to upload; its file name becomes the storage key
        #[arg(short, long, value_name = "PATH")]
        image: Option<PathBuf>,
    },

    /// Delete a note by ID
    Delete {
        #[arg(value_name = "NOTE_ID")]
        note_id: String,
    },

    /// Forget the stored session token
    SignOut,
}
