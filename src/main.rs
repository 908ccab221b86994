//! bedbug - A static site generator for a community-sourced hotel pest report directory.

mod build;
mod cli;
mod config;
mod content;
mod error;
mod generator;
mod init;
mod loader;
mod logger;
mod model;
mod query;
mod render;
mod serve;
mod source;
mod utils;
mod view;
mod watch;

use anyhow::{Context, Result};
use build::build_all;
use clap::Parser;
use cli::{Cli, Commands};
use config::{SiteConfig, cfg, init_config};
use init::new_site;
use query::PreviewArgs;
use serve::serve_site;
use tokio::{runtime::Handle, task};

#[tokio::main]
async fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config = SiteConfig::load(cli)?;
    config.validate()?;
    init_config(config);

    match &cli.command {
        Commands::Init { name } => new_site(&cfg(), name.is_some()),
        Commands::Build { .. } => build_all(cfg()).await,
        Commands::Serve { .. } => {
            build_all(cfg()).await?;
            let runtime = Handle::current();
            task::spawn_blocking(move || serve_site(runtime))
                .await
                .context("Server stopped unexpectedly")?
        }
        Commands::Search {
            query: text,
            status,
            json,
        } => query::search(&cfg(), text, *status, *json).await,
        Commands::Preview {
            id,
            edits,
            reviews,
            save,
        } => {
            let args = PreviewArgs { id, edits, reviews };
            query::preview(&cfg(), args, save.as_deref()).await
        }
    }
}
