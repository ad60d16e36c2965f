use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_glue_ddl::glue::api_statements;
use rust_glue_ddl::model::read_file_with_encoding_fallback;
use rust_glue_ddl::{
    generate_container_script, generate_script, load_bundle, ContainerBundle, SchemaBundle,
    ScriptTarget,
};

#[derive(Parser)]
#[command(name = "rust-glue-ddl")]
#[command(author, version, about = "Hive DDL and metadata catalog scripts from entity schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the script of a single entity bundle
    Script {
        /// Path to the entity bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Script target (hive, glue); defaults to the bundle's options
        #[arg(short, long)]
        target: Option<ScriptTarget>,

        /// Write the script to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Generate the script of a whole database bundle
    ContainerScript {
        /// Path to the container bundle (JSON)
        #[arg(short, long)]
        bundle: PathBuf,

        /// Script target (hive, glue); defaults to the bundle's options
        #[arg(short, long)]
        target: Option<ScriptTarget>,

        /// Write the script to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the catalog payloads embedded in a CLI script as JSON
    Payloads {
        /// Path to the CLI script
        #[arg(short, long)]
        script: PathBuf,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_script(script: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, script)?;
            info!(path = %path.display(), "Wrote script");
        }
        None => println!("{}", script),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Script {
            bundle,
            target,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            let mut bundle: SchemaBundle = load_bundle(&bundle)?;
            if let Some(target) = target {
                bundle.options = bundle.options.with_target(target);
            }
            write_script(&generate_script(&bundle)?, output.as_deref())?;
        }
        Commands::ContainerScript {
            bundle,
            target,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            let mut bundle: ContainerBundle = load_bundle(&bundle)?;
            if let Some(target) = target {
                bundle.options = bundle.options.with_target(target);
            }
            write_script(&generate_container_script(&bundle)?, output.as_deref())?;
        }
        Commands::Payloads { script, verbose } => {
            init_tracing(verbose);
            let text = read_file_with_encoding_fallback(&script)?;
            let statements = api_statements(&text)?;
            let payloads = serde_json::json!({
                "databases": statements.databases,
                "tables": statements.tables,
            });
            println!("{}", serde_json::to_string_pretty(&payloads)?);
        }
    }

    Ok(())
}
