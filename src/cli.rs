//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::view::StatusFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BedBug Tracker static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (default: bedbug.toml)
    #[arg(short = 'C', long, default_value = "bedbug.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared build arguments for Build and Serve commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// enable rss feed generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub rss: Option<bool>,

    /// enable sitemap generation
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub sitemap: Option<bool>,

    /// Override base URL for the site.
    ///
    /// Useful for CI deployments where the production URL differs from local development.
    ///
    /// Example: bedbug build --base-url "https://bedbugs.example.org"
    #[arg(long = "base-url")]
    pub base_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a starter site with sample hotels, posts and pages
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Render the whole site into the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the site. Rebuild and reload on change automatically
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Search the hotel directory by name or city
    Search {
        /// Case-insensitive text matched against name or city
        #[arg(default_value = "")]
        query: String,

        /// Status filter: all, clean or pest-reported
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Print the view as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render one hotel page with local edits and reviews applied
    ///
    /// Nothing is written back to the data source.
    Preview {
        /// Hotel id
        id: String,

        /// Local edit as FIELD=VALUE (name, city, image, description)
        #[arg(short, long = "edit", value_name = "FIELD=VALUE")]
        edits: Vec<String>,

        /// Visitor review as RATING|AUTHOR|COMMENT
        #[arg(short = 'R', long = "review", value_name = "RATING|AUTHOR|COMMENT")]
        reviews: Vec<String>,

        /// Write the page to this file instead of stdout
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Build arguments for commands that render the site.
    pub const fn build_args(&self) -> Option<&BuildArgs> {
        match &self.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => Some(build_args),
            _ => None,
        }
    }
}
