//! TezWeb CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run document store migrations
//! tezweb-cli migrate
//!
//! # Preview the design a seed produces
//! tezweb-cli design --seed demo-seed --template shop-lite
//!
//! # Show the public name a business name normalizes to
//! tezweb-cli normalize "Chai Point"
//!
//! # Publish, unpublish and look up sites
//! tezweb-cli publish --owner u1 --website w1 --name "Chai Point"
//! tezweb-cli unpublish --owner u1 --website w1
//! tezweb-cli resolve chai-point
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `design` - Print a generated design config as JSON
//! - `normalize` - Print a normalized subdomain
//! - `publish` / `unpublish` / `resolve` - Operate on the name mapping

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tezweb-cli")]
#[command(author, version, about = "TezWeb CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Print the design config generated for a seed
    Design {
        /// Seed string (websites use `{owner}:{template}`)
        #[arg(short, long)]
        seed: String,

        /// Template ID
        #[arg(short, long, default_value = "modern-portfolio")]
        template: String,
    },
    /// Print the subdomain a name normalizes to
    Normalize {
        /// Raw name, e.g. a business name
        name: String,
    },
    /// Publish a website under a public name
    Publish {
        /// Owner user ID
        #[arg(short, long)]
        owner: String,

        /// Website ID
        #[arg(short, long)]
        website: String,

        /// Desired public name (normalized; suffixed if taken)
        #[arg(short, long, default_value = "")]
        name: String,
    },
    /// Return a website to draft and release its name
    Unpublish {
        /// Owner user ID
        #[arg(short, long)]
        owner: String,

        /// Website ID
        #[arg(short, long)]
        website: String,
    },
    /// Show which website a public name serves
    Resolve {
        /// Public name
        name: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Design { seed, template } => {
            commands::design::preview(&seed, &template, &mut std::io::stdout().lock())?;
        }
        Commands::Normalize { name } => {
            commands::design::normalize(&name, &mut std::io::stdout().lock())?;
        }
        Commands::Publish {
            owner,
            website,
            name,
        } => commands::sites::publish(&owner, &website, &name).await?,
        Commands::Unpublish { owner, website } => {
            commands::sites::unpublish(&owner, &website).await?;
        }
        Commands::Resolve { name } => commands::sites::resolve(&name).await?,
    }
    Ok(())
}
