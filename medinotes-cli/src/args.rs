use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "medinotes", version, about = "Create, validate and render clinical note templates")]
pub struct Cli {
    /// Log registry and template activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the registered note types
    Types,

    /// Show the required and optional fields of a note type
    Fields {
        /// Note type, e.g. consult, handoff, operative
        template: String,
    },

    /// Check that every required field has a value
    Validate {
        template: String,

        /// JSON object of field values; "-" reads stdin
        #[arg(short, long)]
        input: String,
    },

    /// Render a note as plain text
    Render {
        template: String,

        /// JSON object of field values; "-" reads stdin
        #[arg(short, long)]
        input: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export a note snapshot as JSON
    Export {
        template: String,

        /// JSON object of field values; "-" reads stdin
        #[arg(short, long)]
        input: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective settings
    Config {
        /// Write a default settings.json if none exists
        #[arg(long)]
        init: bool,
    },
}
