// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>
//! chroma: browse, seed and query a Chroma server from the terminal.
//!
//! Connection settings come from `CHROMA_*` environment variables and are
//! overridden by flags. When the server is unreachable the commands run
//! against the client's local mirror instead.

mod seed;
mod tree;

use std::sync::Arc;

use anyhow::{bail, Context};
use chroma_client::{ChromaClient, ConnectionConfig, QueryRequest};
use chroma_navigator::{HierarchyNavigator, Node};
use clap::{Parser, Subcommand};
use colored::Colorize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// CLI argument parsing
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "chroma", version = VERSION, about = "Chroma vector database explorer")]
struct Cli {
    /// Hostname, IP or full URL of the Chroma server.
    #[arg(long, global = true)]
    host: Option<String>,

    #[arg(long, global = true)]
    port: Option<u16>,

    /// Connect over https.
    #[arg(long, global = true)]
    ssl: bool,

    #[arg(long, global = true)]
    tenant: Option<String>,

    #[arg(long, global = true)]
    database: Option<String>,

    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tenant / database / collection / record tree.
    Tree {
        /// Levels to expand below the tenant.
        #[arg(long, default_value_t = 3)]
        depth: usize,
    },
    /// Create a demo tenant, database and two collections.
    Seed,
    /// Run a similarity query and print the raw result.
    Query {
        collection: String,

        /// Query text; repeat for several queries.
        #[arg(long = "text", short = 't')]
        texts: Vec<String>,

        /// Results per query.
        #[arg(short = 'n', long = "n-results")]
        n_results: Option<usize>,
    },
}

impl Cli {
    fn connection_config(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig::from_env();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = Some(port);
        }
        if self.ssl {
            config.use_tls = true;
        }
        if let Some(tenant) = &self.tenant {
            config.tenant = tenant.clone();
        }
        if let Some(database) = &self.database {
            config.database = database.clone();
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        config
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.connection_config();
    let client = Arc::new(ChromaClient::new());

    if !client.connect(config.clone()).await {
        eprintln!(
            "{} {} unreachable; showing local mirror",
            "warning:".yellow().bold(),
            config.host
        );
    }

    match cli.command {
        Command::Tree { depth } => {
            let navigator = HierarchyNavigator::new(client.clone());
            let roots = if client.is_connected() {
                navigator.expand(None).await
            } else {
                // Browse the mirror from the configured tenant.
                vec![Node::Tenant {
                    name: config.tenant.clone(),
                }]
            };
            for (level, node) in tree::walk(&navigator, roots, depth).await {
                println!("{}", tree::render(level, &node));
            }
        }
        Command::Seed => {
            if !client.is_connected() {
                bail!("seeding needs a reachable server");
            }
            for step in seed::seed(&client).await {
                match step.outcome {
                    Ok(()) => println!("{} {}", "ok".green(), step.description),
                    Err(err) => println!("{} {} ({err})", "skip".yellow(), step.description),
                }
            }
        }
        Command::Query {
            collection,
            texts,
            n_results,
        } => {
            if texts.is_empty() {
                bail!("pass at least one --text");
            }
            let mut query = QueryRequest::texts(texts);
            if let Some(n) = n_results {
                query = query.with_n_results(n);
            }
            let result = client
                .query_collection(&config.tenant, &config.database, &collection, query)
                .await;
            let pretty = serde_json::to_string_pretty(&result).context("rendering query result")?;
            println!("{pretty}");
        }
    }

    Ok(())
}
