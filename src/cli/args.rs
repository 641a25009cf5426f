//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Composable drawable-element trees: uniform draw/add/remove over shapes and groups
#[derive(Parser, Debug)]
#[command(name = "rsdraw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw a scene to stdout
    Draw {
        /// Scene file (default: configured default_scene)
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// Show scene structure as a tree
    Tree {
        /// Scene file (default: configured default_scene)
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// List atomic elements in traversal order
    Leaves {
        /// Scene file (default: configured default_scene)
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// Validate a scene and show stats
    Check {
        /// Scene file (default: configured default_scene)
        #[arg(value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// Run the built-in composition walkthrough
    Demo,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config file path
    Path,

    /// Create config template
    Init,
}
