use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemagen_catalog::{CatalogAdapter, OfflineCatalog};
use schemagen_core::Config;
use schemagen_engine::{GenerationSummary, Generator};

const DEFAULT_CONFIG: &str = "intermediate_db.toml";

/// Schemagen - intermediate database schema generator
#[derive(Parser)]
#[command(name = "schemagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: intermediate_db.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the schema SQL
    Generate {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        database: DatabaseArgs,
    },

    /// Regenerate in memory and fail if an existing schema file is out of date
    Check {
        /// Previously generated schema file
        #[arg(short, long)]
        against: PathBuf,

        #[command(flatten)]
        database: DatabaseArgs,
    },
}

#[derive(Args)]
struct DatabaseArgs {
    /// PostgreSQL connection string (default: $DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Database schema holding the tables
    #[arg(long, default_value = "public")]
    schema: String,

    /// Connect over TLS
    #[arg(long)]
    tls: bool,

    /// Check that every database-backed table exists before generating
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::from_file(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    if cli.verbose {
        eprintln!(
            "{} {} ({} tables)",
            "Loaded config".cyan(),
            config_path.display(),
            config.tables.len()
        );
    }

    match cli.command {
        Commands::Generate { output, database } => {
            generate_command(config, output.as_deref(), &database).await
        }
        Commands::Check { against, database } => {
            check_command(config, &against, &database).await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Generate command - write the schema to a file or stdout
async fn generate_command(config: Config, output: Option<&Path>, database: &DatabaseArgs) -> Result<()> {
    let (sql, summary) = render(config, database).await?;

    // Only touch the output file once the whole run succeeded
    match output {
        Some(path) => {
            std::fs::write(path, &sql)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} {} ({} tables, {} indexes)",
                "Schema written to".green(),
                path.display(),
                summary.tables,
                summary.indexes
            );
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&sql)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Check command - compare a generated file against a fresh run
async fn check_command(config: Config, against: &Path, database: &DatabaseArgs) -> Result<()> {
    let (sql, _) = render(config, database).await?;

    let existing = std::fs::read(against)
        .with_context(|| format!("Failed to read {}", against.display()))?;

    if existing == sql {
        eprintln!("{} {}", "✓ Up to date:".green(), against.display());
        Ok(())
    } else {
        eprintln!(
            "{} {}",
            "✗ Out of date:".red().bold(),
            against.display()
        );
        eprintln!("Re-run `schemagen generate` to update it.");
        std::process::exit(1);
    }
}

/// Run the generator into memory
async fn render(config: Config, database: &DatabaseArgs) -> Result<(Vec<u8>, GenerationSummary)> {
    let catalog = connect(database).await?;
    let generator = Generator::new(config, catalog.as_ref());

    if database.validate {
        generator.validate_table_names().await?;
    }

    let mut sql = Vec::new();
    let summary = generator.run(&mut sql).await?;
    Ok((sql, summary))
}

/// Pick the catalog adapter for this run
async fn connect(database: &DatabaseArgs) -> Result<Box<dyn CatalogAdapter>> {
    if let Some(url) = &database.database_url {
        return connect_postgres(url, database).await;
    }

    match std::env::var("DATABASE_URL") {
        Ok(url) if cfg!(feature = "postgres") => connect_postgres(&url, database).await,
        Ok(_) => {
            tracing::warn!(
                "DATABASE_URL is set but PostgreSQL support is not compiled in; only virtual tables can be generated"
            );
            Ok(Box::new(OfflineCatalog::new()))
        }
        Err(_) => {
            tracing::info!("No database configured; only virtual tables can be generated");
            Ok(Box::new(OfflineCatalog::new()))
        }
    }
}

#[cfg(feature = "postgres")]
async fn connect_postgres(url: &str, database: &DatabaseArgs) -> Result<Box<dyn CatalogAdapter>> {
    use schemagen_catalog::PostgresCatalog;

    let catalog = if database.tls {
        PostgresCatalog::connect_with_tls(url).await?
    } else {
        PostgresCatalog::connect(url).await?
    };
    catalog.test_connection().await?;

    Ok(Box::new(catalog.with_schema(database.schema.clone())))
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_url: &str, _database: &DatabaseArgs) -> Result<Box<dyn CatalogAdapter>> {
    Err(anyhow::anyhow!(
        "PostgreSQL support not compiled. Rebuild with: cargo build --features postgres"
    ))
}
