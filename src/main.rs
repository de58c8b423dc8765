use std::{
    io::Read,
    path::{Path, PathBuf},
};

use clap::Parser;
use serde::{Serialize, de::DeserializeOwned};
use session_purge::{
    config::PurgeConfig,
    db::DbPool,
    models::{BatchIdResponse, DeletionRequest, NotificationInput},
    observability,
    purge::{PurgeHandlers, error_chain},
};
use uuid::Uuid;

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_CONFIG_FILE: &str = "session-purge.toml";

type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// CLI arguments for the session purge pipeline
#[derive(Parser, Debug)]
#[command(version, about = "Deferred session purge pipeline", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./session-purge.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resolve a deletion request (JSON) into batch manifests; prints the batch handles
    Enumerate {
        /// Request file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Delete one batch's documents from the search index
    DeleteOpensearch {
        /// Batch handle file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        batch: String,
    },
    /// Delete one batch's sessions from the database
    DeleteDatabase {
        /// Batch handle file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        batch: String,
    },
    /// Delete one batch's payload objects from object storage
    DeleteS3 {
        /// Batch handle file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        batch: String,
    },
    /// Send the completion notice (JSON notification input)
    Notify {
        /// Notification file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// List the batch handles recorded for a task
    Batches {
        #[arg(long)]
        task: Uuid,
    },
    /// Run every stage in sequence for one deletion request
    Run {
        /// Request file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },
    /// Run database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config_path = match resolve_config_path(args.config.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = match PurgeConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}",
                config_path.display(),
                error_chain(&e)
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Error: {}", error_chain(&e));
        std::process::exit(1);
    }
    if let Err(e) = observability::metrics::init_metrics(&config.observability.metrics) {
        eprintln!("Error: {}", error_chain(&e));
        std::process::exit(1);
    }

    tracing::debug!(config_file = %config_path.display(), "Configuration loaded");

    if let Err(e) = run_command(args.command, &config).await {
        eprintln!("Error: {}", error_chain(e.as_ref()));
        std::process::exit(1);
    }
}

async fn run_command(command: Command, config: &PurgeConfig) -> CliResult<()> {
    if let Command::Migrate = command {
        return run_migrate(config).await;
    }

    let handlers = PurgeHandlers::from_config(config).await?;

    match command {
        Command::Enumerate { input } => {
            let request: DeletionRequest = read_json(&input)?;
            let batches = handlers.get_session_ids_by_query(&request).await?;
            print_json(&batches)
        }
        Command::DeleteOpensearch { batch } => {
            let batch: BatchIdResponse = read_json(&batch)?;
            print_json(&handlers.delete_session_batch_from_opensearch(batch).await?)
        }
        Command::DeleteDatabase { batch } => {
            let batch: BatchIdResponse = read_json(&batch)?;
            print_json(&handlers.delete_session_batch_from_database(batch).await?)
        }
        Command::DeleteS3 { batch } => {
            let batch: BatchIdResponse = read_json(&batch)?;
            print_json(&handlers.delete_session_batch_from_s3(batch).await?)
        }
        Command::Notify { input } => {
            let input: NotificationInput = read_json(&input)?;
            handlers.send_email(&input).await?;
            Ok(())
        }
        Command::Batches { task } => print_json(&handlers.batches_for_task(task).await?),
        Command::Run { input } => {
            let request: DeletionRequest = read_json(&input)?;
            run_pipeline(&handlers, &request).await
        }
        Command::Migrate => Ok(()),
    }
}

/// Every stage for one request, batch by batch. For local use; deployments
/// drive the stages from their own orchestrator.
async fn run_pipeline(handlers: &PurgeHandlers, request: &DeletionRequest) -> CliResult<()> {
    let batches = handlers.get_session_ids_by_query(request).await?;
    let Some(task_id) = batches.first().map(|b| b.task_id) else {
        tracing::info!(project_id = request.project_id, "No sessions matched; nothing to purge");
        return Ok(());
    };

    for batch in &batches {
        handlers.delete_session_batch_from_opensearch(*batch).await?;
        handlers.delete_session_batch_from_database(*batch).await?;
        handlers.delete_session_batch_from_s3(*batch).await?;
    }

    let session_count = handlers.task_session_count(task_id).await?;
    if request.email.is_empty() {
        tracing::info!(%task_id, session_count, "No requester email; skipping notification");
    } else {
        handlers
            .send_email(&request.notification(session_count))
            .await?;
    }

    print_json(&batches)
}

async fn run_migrate(config: &PurgeConfig) -> CliResult<()> {
    if config.database.is_none() {
        return Err("Database is not configured. Nothing to migrate.".into());
    }

    tracing::info!("Running database migrations");
    let pool = DbPool::from_config(&config.database).await?;
    pool.run_migrations().await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf, String> {
    if let Some(path) = explicit_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return Ok(path);
    }

    let cwd_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if cwd_config.exists() {
        return Ok(cwd_config);
    }

    Err(format!(
        "No config file given and {} not found in the working directory",
        DEFAULT_CONFIG_FILE
    ))
}

/// Read and parse JSON from a file, or from stdin when `source` is "-".
fn read_json<T: DeserializeOwned>(source: &str) -> CliResult<T> {
    let contents = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .map_err(|e| format!("Failed to read {}: {}", source, e))?
    };
    Ok(serde_json::from_str(&contents)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
