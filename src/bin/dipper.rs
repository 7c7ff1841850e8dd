//! dipper: generate typed sqlx wrappers from annotated SQL files
//!
//! # Usage
//!
//! ```bash
//! # Generate units for every .sql file under ./queries
//! dipper generate queries -o src/generated
//!
//! # Show what a file declares and the code it becomes
//! dipper explain queries/select_products.sql
//!
//! # Show the SQL type table
//! dipper types
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dipper::prelude::*;
use dipper::types::SQL_TYPES;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dipper")]
#[command(version)]
#[command(about = "Typed sqlx query wrappers from annotated .sql files", long_about = None)]
#[command(after_help = "EXAMPLES:
    dipper generate queries -o src/generated
    dipper generate --dialect sqlite
    dipper explain queries/select_products.sql --json")]
struct Cli {
    /// Config file (default: ./dipper.toml, then the user config dir)
    #[arg(short, long, global = true, env = "DIPPER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate .g.rs units for a directory of .sql files
    Generate {
        /// Directory to scan (default: build.queries_dir from config)
        dir: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "generated")]
        out: PathBuf,

        /// Target database (postgres, mysql, sqlite)
        #[arg(long)]
        dialect: Option<Dialect>,
    },
    /// Show the metadata extracted from a file and the generated code
    Explain {
        file: PathBuf,

        /// Print metadata as JSON instead
        #[arg(long)]
        json: bool,

        /// Target database (postgres, mysql, sqlite)
        #[arg(long)]
        dialect: Option<Dialect>,
    },
    /// Show the SQL type to Rust type table
    Types,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dipper=debug" } else { "dipper=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Commands::Generate { dir, out, dialect } => {
            if let Some(dialect) = dialect {
                config.codegen.dialect = dialect;
            }
            let dir = dir.unwrap_or_else(|| config.build.queries_dir.clone());
            generate(config, dir, out).await
        }
        Commands::Explain {
            file,
            json,
            dialect,
        } => {
            if let Some(dialect) = dialect {
                config.codegen.dialect = dialect;
            }
            explain(&config, &file, json)
        }
        Commands::Types => {
            show_types();
            Ok(())
        }
    }
}

async fn generate(config: Config, dir: PathBuf, out: PathBuf) -> Result<()> {
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let summary = tokio::task::spawn_blocking(move || -> DipperResult<WriteSummary> {
        let generator = Generator::new(config);
        let units = generator.collect(&dir)?;
        let generated = generator.generate_all(&units, &cancel)?;
        generator.write(&generated, &out)
    })
    .await
    .context("generation task failed")??;

    println!(
        "{} {} written, {} unchanged",
        "✓".green(),
        summary.written.to_string().cyan(),
        summary.unchanged.to_string().dimmed()
    );
    println!("  {} {}", "Index:".dimmed(), summary.index.display());
    Ok(())
}

fn explain(config: &Config, file: &Path, json: bool) -> Result<()> {
    let unit = SourceUnit::from_path(file)?;
    let metadata = extract(&unit);

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("{}", "Query Explanation".cyan().bold());
    println!();
    println!("  {} {}", "File:".dimmed(), unit.file_name.yellow());
    println!("  {} {}", "Name:".dimmed(), metadata.query_name.white());
    match &metadata.result_type {
        Some(result) => println!("  {} {}", "Result:".dimmed(), result.white()),
        None => println!("  {} {}", "Result:".dimmed(), "(untyped rows)".dimmed()),
    }

    if !metadata.parameters.is_empty() {
        println!("  {}", "Parameters:".dimmed());
        for param in &metadata.parameters {
            println!(
                "    • {} {} → {}",
                param.name.white(),
                param.sql_type.yellow(),
                resolve_type(&param.sql_type).rust.cyan()
            );
        }
    }

    let generated = assemble(&metadata, &config.codegen);
    println!();
    println!(
        "{} {}",
        "Generated:".green().bold(),
        generated.file_name.white()
    );
    println!("{}", generated.source);
    Ok(())
}

fn show_types() {
    println!("{}", "SQL Type Reference".cyan().bold());
    println!();
    println!(
        "{:14} {}",
        "SQL".white().bold(),
        "Rust".white().bold()
    );
    println!("{}", "─".repeat(48).dimmed());

    for row in SQL_TYPES {
        println!("{:14} {}", row.sql.cyan(), row.rust.yellow());
    }

    println!();
    println!("{}", "Unknown tokens map to String.".dimmed());
}
