//! atlink CLI: format mention-bearing text against a local identity store.
//!
//! Usage:
//!   atlink format [--db path] [--directory file.json] [--no-linkify] [--json] <text|->
//!   atlink account <subcommand> [--db path]

use atlink::{
    AccountPersister, ActorType, FormatConfig, IdentityStore, LookupOptions, OpenStore,
    RemoteDirectory, RemoteObject, SqliteStore, StaticDirectory, StorePersister, TextFormatter,
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "atlink",
    version,
    about = "Resolve @mentions and render text to HTML"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format text, resolving the accounts it mentions
    Format {
        /// Text to format, or `-` to read stdin
        text: String,
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// JSON file mapping handles to actor objects
        #[arg(long)]
        directory: Option<PathBuf>,
        /// Leave bare URLs as text
        #[arg(long)]
        no_linkify: bool,
        /// Remote lookups to run at once
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage known accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
        /// Path to SQLite database file
        #[arg(long, global = true)]
        db: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Persist an account
    Add {
        /// Canonical IRI of the actor
        #[arg(long)]
        iri: String,
        /// Preferred username; the handle becomes username@host
        #[arg(long)]
        username: String,
        /// Profile URL
        #[arg(long)]
        url: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// List known accounts
    List,
}

/// Get the default database path (~/.local/share/atlink/atlink.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("atlink").join("atlink.db")
}

fn open_store(db: Option<PathBuf>) -> Result<Arc<SqliteStore>, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    info!(path = %db_path.display(), "opening identity store");
    SqliteStore::open(&db_path)
        .map(Arc::new)
        .map_err(|e| format!("Failed to open database: {}", e))
}

fn read_text(text: String) -> Result<String, String> {
    if text != "-" {
        return Ok(text);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("Failed to read stdin: {}", e))?;
    Ok(buf)
}

async fn cmd_format(
    store: Arc<SqliteStore>,
    directory: Option<PathBuf>,
    text: &str,
    config: FormatConfig,
    json: bool,
) -> i32 {
    let directory = match directory {
        Some(path) => match StaticDirectory::from_json_file(&path) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: cannot load directory '{}': {}", path.display(), e);
                return 1;
            }
        },
        None => StaticDirectory::new(),
    };
    info!(entries = directory.len(), "directory loaded");

    let directory: Arc<dyn RemoteDirectory> = Arc::new(directory);
    let formatter = TextFormatter::new(store, directory).with_config(config);
    let result = match formatter.format(text, &LookupOptions::new()).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    } else {
        print!("{}", result.html);
        for id in &result.mentions {
            println!("mention: {}", id);
        }
    }
    0
}

async fn cmd_account_add(
    store: Arc<SqliteStore>,
    iri: String,
    username: String,
    url: Option<String>,
    name: Option<String>,
) -> i32 {
    let mut actor = RemoteObject::actor(ActorType::Person, iri, username);
    actor.url = url;
    actor.name = name;

    let persister = StorePersister::new(store);
    match persister.persist(&actor, &LookupOptions::new()).await {
        Ok(Some(record)) => {
            println!("Saved account '{}' ({})", record.handle, record.id);
            0
        }
        Ok(None) => {
            eprintln!("Error: account is invalid or its handle is taken");
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_account_list(store: &SqliteStore) -> i32 {
    let accounts = match store.list_accounts() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    if accounts.is_empty() {
        println!("No accounts known.");
        return 0;
    }
    println!("{:<36}  {:<32}  {}", "ID", "HANDLE", "LINK");
    println!("{}", "-".repeat(96));
    for account in accounts {
        println!("{:<36}  {:<32}  {}", account.id, account.handle, account.href());
    }
    0
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Format {
            text,
            db,
            directory,
            no_linkify,
            concurrency,
            json,
        } => {
            let store = match open_store(db) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let text = match read_text(text) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let config = FormatConfig::new()
                .with_linkify(!no_linkify)
                .with_lookup_concurrency(concurrency);
            cmd_format(store, directory, &text, config, json).await
        }
        Commands::Account { action, db } => {
            let store = match open_store(db) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            match action {
                AccountAction::Add {
                    iri,
                    username,
                    url,
                    name,
                } => cmd_account_add(store, iri, username, url, name).await,
                AccountAction::List => cmd_account_list(&store),
            }
        }
    };
    std::process::exit(code);
}
