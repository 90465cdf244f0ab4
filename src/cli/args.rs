// src/cli/args.rs
use crate::domain::NoteTag;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to a TOML config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// NoteHub API root, overrides config and environment
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute (list, create, delete, or shell)
    #[command(subcommand)]
    pub command: Command,
}

/// Tag choices on the command line; mirrors [`NoteTag`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "PascalCase")]
pub enum TagArg {
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl From<TagArg> for NoteTag {
    fn from(tag: TagArg) -> Self {
        match tag {
            TagArg::Todo => NoteTag::Todo,
            TagArg::Work => NoteTag::Work,
            TagArg::Personal => NoteTag::Personal,
            TagArg::Meeting => NoteTag::Meeting,
            TagArg::Shopping => NoteTag::Shopping,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List one page of notes
    List {
        /// Only notes matching this text
        #[arg(short, long, value_name = "SEARCH")]
        search: Option<String>,

        /// Page to show, starting at 1
        #[arg(short, long, value_name = "PAGE", default_value_t = 1,
              value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Create a note
    Create {
        /// Title, 3 to 50 characters
        #[arg(short, long, value_name = "TITLE")]
        title: String,

        /// Body text, up to 500 characters
        #[arg(short = 'b', long, value_name = "CONTENT")]
        content: Option<String>,

        /// Tag
        #[arg(short = 'g', long, value_enum, ignore_case = true, default_value_t = TagArg::Todo)]
        tag: TagArg,
    },

    /// Delete a note by id
    Delete {
        /// Note ID to delete
        #[arg(value_name = "NOTE_ID")]
        note_id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactive list with search, paging, create and delete
    Shell,
}
