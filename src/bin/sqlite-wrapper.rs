use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{Value as JsonValue, json};
use sqlite_wrapper::prelude::*;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run select/insert/update/delete requests against SQLite")]
struct Args {
    /// Database file; `:memory:` for a throwaway database.
    #[arg(long, default_value = ":memory:")]
    db: String,
    /// Log every compiled statement to stderr.
    #[arg(long)]
    log_queries: bool,
    #[arg(long, value_enum, default_value = "inline")]
    in_list: InListMode,
    /// SQL script executed before the command (schema, fixtures).
    #[arg(long)]
    init: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select with a JSON request object, or raw SQL.
    Select { request: String },
    /// Insert a JSON object as one row; prints the new row id.
    Insert { table: String, record: String },
    /// Update rows; prints the number of changed rows.
    Update {
        table: String,
        changes: String,
        #[arg(long = "where")]
        filter: Option<String>,
    },
    /// Delete rows; prints the number of removed rows.
    Delete {
        table: String,
        #[arg(long = "where")]
        filter: Option<String>,
    },
    /// Print the compiled statement for a select request without running it.
    Sql { request: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if args.log_queries {
            Level::INFO
        } else {
            Level::WARN
        })
        .init();

    let options = WrapperOptions::builder(args.db.as_str())
        .log_queries(args.log_queries)
        .in_list_mode(args.in_list)
        .finish();

    let db = SqliteWrapper::open(options).await?;
    if let Some(path) = &args.init {
        let script = std::fs::read_to_string(path)?;
        db.database().execute_batch(&script).await?;
    }

    let output = match args.command {
        Command::Select { request } => db.select_json(&parse_request(&request)).await?.to_json(),
        Command::Insert { table, record } => {
            let record = Record::from_json(&serde_json::from_str::<JsonValue>(&record)?)?;
            json!({ "id": db.insert(&table, &record).await? })
        }
        Command::Update {
            table,
            changes,
            filter,
        } => {
            let changes = Record::from_json(&serde_json::from_str::<JsonValue>(&changes)?)?;
            let filter = parse_filter(filter.as_deref())?;
            json!({ "changes": db.update(&table, &changes, filter.as_ref()).await? })
        }
        Command::Delete { table, filter } => {
            let filter = parse_filter(filter.as_deref())?;
            json!({ "changes": db.delete(&table, filter.as_ref()).await? })
        }
        Command::Sql { request } => {
            let qp = db
                .builder()
                .select(&SelectInput::from_json(&parse_request(&request))?)?;
            json!({ "sql": qp.query, "params": params_json(&qp.params) })
        }
    };
    print_json(&output)?;

    db.close();
    Ok(())
}

// Anything that is not valid JSON is taken as raw SQL.
fn parse_request(request: &str) -> JsonValue {
    serde_json::from_str(request).unwrap_or_else(|_| JsonValue::String(request.to_owned()))
}

fn parse_filter(filter: Option<&str>) -> Result<Option<WhereSpec>, Box<dyn std::error::Error>> {
    let Some(raw) = filter else {
        return Ok(None);
    };
    let value: JsonValue = serde_json::from_str(raw)?;
    Ok(Some(WhereSpec::from_json(&value)?))
}

fn params_json(params: &[RowValues]) -> JsonValue {
    JsonValue::Array(params.iter().map(RowValues::to_json).collect())
}

fn print_json(value: &JsonValue) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
