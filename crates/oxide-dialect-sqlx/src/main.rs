//! oxide-dialect CLI
//!
//! Command-line tool for inspecting database metadata and synchronizing a
//! database with a JSON schema document.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oxide_dialect::prelude::*;
use oxide_dialect_sqlx::{load_schema, SchemaSynchronizer, SqlxConnection};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "oxide-dialect")]
#[command(author, version, about = "Database metadata inspection and schema synchronization", long_about = None)]
struct Cli {
    /// Database URL.
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Catalog to switch to before running the command.
    #[arg(long)]
    catalog: Option<String>,

    /// Schema to switch to before running the command.
    #[arg(long)]
    schema: Option<String>,

    /// How long cached metadata stays valid (connection or pass).
    #[arg(long, default_value = "connection")]
    cache_lifetime: CacheLifetime,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tables of the current schema.
    Tables {
        /// List tables of every schema instead.
        #[arg(short, long)]
        all: bool,
    },

    /// List schemas.
    Schemas,

    /// Show the columns, primary key and indices of a table.
    Describe {
        /// Table name, optionally schema-qualified.
        table: String,
    },

    /// List sequences of the current schema.
    Sequences,

    /// Show the resolved dialect and its capabilities.
    Probe,

    /// Show the SQL needed to match a schema document without executing it.
    Plan {
        /// Path to the JSON schema document.
        #[arg(short = 'f', long)]
        schema_file: PathBuf,
    },

    /// Bring the database in line with a schema document.
    Sync {
        /// Path to the JSON schema document.
        #[arg(short = 'f', long)]
        schema_file: PathBuf,

        /// Show SQL without executing it.
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut conn = SqlxConnection::connect(&cli.database).await?;
    let mut metadata = DatabaseDialectMetadata::connect(&mut conn, cli.cache_lifetime).await?;

    if cli.catalog.is_some() || cli.schema.is_some() {
        let settings = SessionSettings {
            catalog: cli.catalog.clone(),
            schema: cli.schema.clone(),
            ..SessionSettings::default()
        };
        metadata.apply_session_settings(&mut conn, &settings).await?;
    }

    match cli.command {
        Commands::Tables { all } => {
            let tables = if all {
                metadata.all_tables_names_in_all_schemas(&mut conn).await?
            } else {
                metadata.all_tables_names(&mut conn).await?
            };
            print_list("Tables", &tables);
        }

        Commands::Schemas => {
            let current = metadata.current_schema(&mut conn).await?;
            let schemas = metadata.all_schema_names(&mut conn).await?;
            println!("\nSchemas:");
            println!("{:-<60}", "");
            for schema in &schemas {
                let marker = if *schema == current { "*" } else { " " };
                println!(" {marker} {schema}");
            }
            println!();
        }

        Commands::Describe { table } => describe(&mut metadata, &mut conn, &table).await?,

        Commands::Sequences => {
            let sequences = metadata.sequence_details(&mut conn).await?;
            if sequences.is_empty() {
                info!("No sequences found.");
            } else {
                println!("\nSequences:");
                println!("{:-<60}", "");
                for sequence in &sequences {
                    println!(
                        " {} (start {}, increment {})",
                        sequence.name,
                        display_or_dash(sequence.start_with),
                        display_or_dash(sequence.increment_by)
                    );
                }
                println!();
            }
        }

        Commands::Probe => {
            let catalog = metadata.catalog(&mut conn).await?;
            let schema = metadata.current_schema(&mut conn).await?;
            let limit = metadata
                .supports_limit_with_update_or_delete(&mut conn)
                .await?;
            let properties = &metadata.vendor().properties;
            println!("\nDialect: {}", metadata.dialect());
            println!("{:-<60}", "");
            println!(" catalog:                 {}", catalog.as_deref().unwrap_or("-"));
            println!(" current schema:          {schema}");
            println!(" supports catalogs:       {}", properties.supports_catalogs);
            println!(" identifier quote:        {}", properties.identifier_quote);
            println!(" max column name length:  {}", properties.max_column_name_length);
            println!(" limit in update/delete:  {limit}");
            println!(" restrict supported:      {}", metadata.vendor().types.supports_restrict);
            println!();
        }

        Commands::Plan { schema_file } => {
            let schema = load_schema(&schema_file)?;
            let plan = SchemaSynchronizer::new(&mut metadata)
                .plan(&mut conn, &schema)
                .await?;
            if plan.is_empty() {
                info!("No changes needed.");
            }
            for sql in &plan.statements {
                println!("{sql};");
            }
            for warning in &plan.warnings {
                println!("-- {warning}");
            }
        }

        Commands::Sync {
            schema_file,
            dry_run,
        } => {
            let schema = load_schema(&schema_file)?;
            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
            }
            let report = SchemaSynchronizer::new(&mut metadata)
                .dry_run(dry_run)
                .sync(&mut conn, &schema)
                .await?;
            info!(
                "{} statement(s) planned, {} executed, {} warning(s)",
                report.plan.statements.len(),
                report.executed,
                report.plan.warnings.len()
            );
        }
    }

    conn.close().await?;
    Ok(())
}

async fn describe(
    metadata: &mut DatabaseDialectMetadata,
    conn: &mut SqlxConnection,
    name: &str,
) -> anyhow::Result<()> {
    let table_ref = TableRef::parse(name);
    if !metadata.table_exists(conn, &table_ref).await? {
        anyhow::bail!("Table not found: {table_ref}");
    }

    let refs = [table_ref.clone()];
    let columns = metadata
        .table_columns(conn, &refs)
        .await?
        .remove(&table_ref)
        .unwrap_or_default();
    let primary_key = metadata
        .existing_primary_keys(conn, &refs)
        .await?
        .remove(&table_ref)
        .flatten();

    // The live table as a declared one, so the vendor renders its DDL.
    let mut table = TableSchema::new(&table_ref.name);
    table.schema.clone_from(&table_ref.schema);
    for column in &columns {
        let mut declared = ColumnSchema::new(&column.name, SqlType::Custom(column.type_name.clone()));
        declared.nullable = column.nullable;
        declared.auto_increment = column.auto_increment;
        if let Some(default) = &column.default_value {
            declared.default = DefaultValue::Expression(default.clone());
        }
        table = table.column(declared);
    }
    if let Some(pk) = &primary_key {
        table = table.primary_key(pk.column_names.clone());
    }
    let indices = metadata
        .existing_indices(conn, &[&table])
        .await?
        .remove(&table_ref)
        .unwrap_or_default();

    println!("\nTable {table_ref}:");
    println!("{:-<60}", "");
    for column in &columns {
        println!(
            " {:<24} {:<16} {}{}",
            column.name,
            column.type_name,
            if column.nullable { "NULL" } else { "NOT NULL" },
            column
                .default_value
                .as_deref()
                .map(|d| format!(" DEFAULT {d}"))
                .unwrap_or_default()
        );
    }
    if let Some(pk) = &primary_key {
        println!("\n Primary key {} ({})", pk.name, pk.column_names.join(", "));
    }
    for index in &indices {
        println!(
            " {}index {} ({}){}",
            if index.unique { "unique " } else { "" },
            index.name,
            index.columns.join(", "),
            index
                .filter_condition
                .as_deref()
                .map(|c| format!(" WHERE {c}"))
                .unwrap_or_default()
        );
    }
    println!("\n{};", metadata.ddl().create_table(&table, &[]));
    println!();
    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        info!("No {} found.", title.to_lowercase());
        return;
    }
    println!("\n{title}:");
    println!("{:-<60}", "");
    for item in items {
        println!(" {item}");
    }
    println!();
}

fn display_or_dash(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
