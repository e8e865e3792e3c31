use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use erdkit::core::{
    CasePolicy, Config, Database, DdlOptions, Document, Language, NameCase, generate_code,
    generate_ddl_with,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL DDL of a saved diagram
    Ddl {
        file: PathBuf,
        /// mysql, mariadb, postgresql, oracle, mssql or sqlite
        #[clap(short, long, value_parser = parse_database)]
        database: Option<Database>,
        #[clap(long, value_parser = parse_name_case)]
        table_case: Option<NameCase>,
        #[clap(long, value_parser = parse_name_case)]
        column_case: Option<NameCase>,
    },
    /// Print object code for every table of a saved diagram
    Code {
        file: PathBuf,
        /// java, typescript or kotlin
        #[clap(short, long, value_parser = parse_language)]
        language: Option<Language>,
        /// none, camel, pascal or snake
        #[clap(long, value_parser = parse_name_case)]
        table_case: Option<NameCase>,
        #[clap(long, value_parser = parse_name_case)]
        column_case: Option<NameCase>,
    },
}

fn parse_database(value: &str) -> Result<Database> {
    Database::from_str(value).ok_or_else(|| anyhow!("unknown database {value:?}"))
}

fn parse_language(value: &str) -> Result<Language> {
    Language::from_str(value).ok_or_else(|| anyhow!("unknown language {value:?}"))
}

fn parse_name_case(value: &str) -> Result<NameCase> {
    NameCase::from_str(value).ok_or_else(|| anyhow!("unknown name case {value:?}"))
}

fn load(file: &Path) -> Result<Document> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let document = Document::from_json(&json)
        .with_context(|| format!("failed to load diagram {}", file.display()))?;
    tracing::info!(
        tables = document.table_count(),
        relationships = document.relationship_count(),
        "loaded {}",
        file.display()
    );
    Ok(document)
}

fn main() -> Result<()> {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let config = Config::from_env()?;
    let args = Cli::parse();

    let output = match args.command {
        Commands::Ddl {
            file,
            database,
            table_case,
            column_case,
        } => {
            let document = load(&file)?;
            let options = DdlOptions {
                database: database.unwrap_or(config.database),
                case: CasePolicy::new(
                    table_case.unwrap_or_default(),
                    column_case.unwrap_or_default(),
                ),
            };
            tracing::info!(database = %options.database, "generating DDL");
            generate_ddl_with(&document, &options)
        }
        Commands::Code {
            file,
            language,
            table_case,
            column_case,
        } => {
            let document = load(&file)?;
            let canvas = document.canvas();
            let language = language.unwrap_or(canvas.language);
            let case = CasePolicy::new(
                table_case.unwrap_or(canvas.table_case),
                column_case.unwrap_or(canvas.column_case),
            );
            tracing::info!(%language, "generating code");
            generate_code(&document, language, case)
        }
    };

    print!("{output}");
    Ok(())
}
