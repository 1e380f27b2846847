mod actor;
mod app;
mod cache;
mod config;
mod constants;
mod credentials;
mod event;
mod input;
mod mail;
mod ui;
mod view;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::actor::{RetryConfig, with_retry};
use crate::app::App;
use crate::cache::CacheStore;
use crate::config::Config;
use crate::constants::REQUEST_TIMEOUT_SECS;
use crate::credentials::{Account, AccountInfo, AccountStore};
use crate::mail::{MailTmClient, MailboxClient};

const LOCAL_PART_LEN: usize = 8;
const PASSWORD_LEN: usize = 16;
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const COMMANDS: &[&str] = &[
    "m", "messages", "inbox", "g", "generate", "list", "me", "d", "delete", "export",
];

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,burnmail=debug"));

    // Try to create a log file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .and_then(|dir| std::fs::create_dir_all(&dir).ok().map(|()| dir.join("burnmail.log")))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"burnmail - Disposable email in your terminal

Usage: burnmail [command]

Commands:
    (none), m, messages, inbox   Open the interactive inbox
    g, generate                  Create a new disposable address
    list                         Print the current messages
    me                           Show the stored account
    d, delete                    Delete the account and local data
    export                       Save every message to a JSON file
    help                         Show this help message

Options:
    -h, --help                   Show this help message
    -V, --version                Show version

Configuration file: ~/.config/burnmail/config.toml
Set BURNMAIL_TOKEN to override the stored bearer token.
"#
    );
}

/// `len` characters drawn uniformly from [a-z0-9]
fn random_string(len: usize) -> Result<String> {
    // Largest multiple of the alphabet size that fits a byte; rejects the rest
    let limit = (256 / ALPHABET.len() * ALPHABET.len()) as u8;
    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 32];

    while out.len() < len {
        getrandom::fill(&mut buf).map_err(|e| anyhow::anyhow!("Random source failed: {}", e))?;
        for &byte in buf.iter().filter(|&&b| b < limit) {
            if out.len() == len {
                break;
            }
            out.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
        }
    }
    Ok(out)
}

fn load_account() -> Result<(AccountStore, Account)> {
    let store = AccountStore::open()?;
    let account = store.load()?;
    Ok((store, account))
}

fn authorized_client(config: &Config, account: &Account) -> Result<MailTmClient> {
    Ok(MailTmClient::new(&config.api)
        .context("Failed to create HTTP client")?
        .with_token(account.token.clone()))
}

async fn run_inbox(config: Config) -> Result<()> {
    let (_, account) = load_account()?;
    let client = authorized_client(&config, &account)?;

    tracing::info!("Opening inbox for {}", account.info.address);
    let mut app = App::new(config, account.info.address, Arc::new(client))?;
    app.run().await
}

async fn run_generate(config: &Config) -> Result<()> {
    let store = AccountStore::open()?;
    if store.exists() {
        let existing = store
            .load()
            .map(|account| account.info.address)
            .unwrap_or_else(|_| "unknown".to_string());
        anyhow::bail!(
            "An account already exists ({}). Run 'burnmail delete' first.",
            existing
        );
    }

    let client = MailTmClient::new(&config.api).context("Failed to create HTTP client")?;
    let retry = RetryConfig::default();
    let cancel = CancellationToken::new();

    let domains = with_retry(&retry, &cancel, || client.domains())
        .await
        .context("Failed to fetch domains")?;
    let domain = domains
        .iter()
        .find(|d| d.is_active)
        .context("No active domains available")?;

    let address = format!("{}@{}", random_string(LOCAL_PART_LEN)?, domain.domain);
    let password = random_string(PASSWORD_LEN)?;
    tracing::info!("Creating account {}", address);

    let remote = with_retry(&retry, &cancel, || client.create_account(&address, &password))
        .await
        .context("Failed to create account")?;
    let token = with_retry(&retry, &cancel, || client.login(&address, &password))
        .await
        .context("Failed to log in")?;

    let account = Account {
        info: AccountInfo {
            address: remote.address,
            account_id: remote.id,
            created_at: Utc::now(),
        },
        password,
        token: token.token,
    };
    store.save(&account)?;

    println!("Created {}", account.info.address);
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(account.info.address.clone())) {
        Ok(()) => println!("Address copied to clipboard."),
        Err(e) => eprintln!("Warning: could not copy to clipboard: {}", e),
    }
    Ok(())
}

async fn run_list(config: &Config) -> Result<()> {
    let (_, account) = load_account()?;
    let client = authorized_client(config, &account)?;
    let retry = RetryConfig::default();
    let cancel = CancellationToken::new();

    let fetch = with_retry(&retry, &cancel, || client.list_messages());
    let messages = tokio::time::timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS), fetch)
        .await
        .context("Timed out fetching messages")?
        .context("Failed to fetch messages")?;

    println!("{} ({} messages)", account.info.address, messages.len());
    if messages.is_empty() {
        return Ok(());
    }
    println!();

    for message in &messages {
        let date = view::columns::format_date(
            &message.created_at,
            &config.ui.list_date_format,
            "%d/%m %H:%M",
        );
        let marker = if message.seen { ' ' } else { '*' };
        println!(
            "{} {:<12} {:<30} {}",
            marker,
            date,
            view::truncate(message.sender(), 30),
            view::truncate(&message.subject, 60)
        );
    }
    Ok(())
}

fn run_me() -> Result<()> {
    let (_, account) = load_account()?;
    println!("Address: {}", account.info.address);
    println!(
        "Created: {}",
        account
            .info
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

async fn run_delete(config: &Config) -> Result<()> {
    let (store, account) = load_account()?;
    let client = authorized_client(config, &account)?;

    match client.delete_account(&account.info.account_id).await {
        Ok(()) => println!("Deleted remote account {}", account.info.address),
        Err(e) => {
            tracing::warn!("Remote account deletion failed: {}", e);
            eprintln!("Warning: could not delete remote account: {}", e);
        }
    }

    store.delete()?;
    if let Ok(path) = Config::cache_path() {
        CacheStore::new(path, config.cache.expiry()).clear();
    }
    println!("Local account data removed.");
    Ok(())
}

async fn run_export(config: &Config) -> Result<()> {
    let (_, account) = load_account()?;
    let client = authorized_client(config, &account)?;
    let retry = RetryConfig::default();
    let cancel = CancellationToken::new();

    let summaries = with_retry(&retry, &cancel, || client.list_messages())
        .await
        .context("Failed to fetch messages")?;

    let mut messages = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        match with_retry(&retry, &cancel, || client.message(&summary.id)).await {
            Ok(detail) => messages.push(detail),
            Err(e) => {
                tracing::warn!("Export skipped {}: {}", summary.id, e);
                eprintln!("Warning: skipped message '{}': {}", summary.subject, e);
            }
        }
    }

    let now = Utc::now();
    let document = serde_json::json!({
        "account": account.info.address,
        "exportedAt": now,
        "messages": messages,
    });
    let path = PathBuf::from(format!(
        "burnmail_export_{}_{}.json",
        account.info.address,
        now.timestamp()
    ));
    let contents = serde_json::to_vec_pretty(&document).context("Failed to serialize export")?;
    credentials::write_private(&path, &contents)?;

    println!("Exported {} messages to {}", messages.len(), path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str());

    match command {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some("--version") | Some("-V") => {
            println!("burnmail {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(cmd) if !COMMANDS.contains(&cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        _ => {}
    }

    setup_logging();
    let config = Config::load()?;
    config.ensure_dirs()?;

    match command {
        Some("g") | Some("generate") => run_generate(&config).await,
        Some("list") => run_list(&config).await,
        Some("me") => run_me(),
        Some("d") | Some("delete") => run_delete(&config).await,
        Some("export") => run_export(&config).await,
        // none, m, messages, inbox
        _ => run_inbox(config).await,
    }
}
