use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use core_logic::{
    parse_pool, setup_logger, FileSource, InputSource, PromptSource, ProxyDescriptor, SystemClock,
};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use dotenv::dotenv;
use puzzlemania::config::PuzzleConfig;
use puzzlemania::identity::{build_identities, build_identities_shared, Identity};
use puzzlemania::scheduler::Scheduler;
use std::sync::Arc;
use tracing::{error, info};

const BANNER: &str = r#"
 ____                _        __  __             _
|  _ \ _   _ _______| | ___  |  \/  | __ _ _ __ (_) __ _
| |_) | | | |_  /_  / |/ _ \ | |\/| |/ _` | '_ \| |/ _` |
|  __/| |_| |/ / / /| |  __/ | |  | | (_| | | | | | (_| |
|_|    \__,_/___/___|_|\___| |_|  |_|\__,_|_| |_|_|\__,_|
"#;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config.toml
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Read private keys from a file instead of prompting
    #[arg(long)]
    keys_file: Option<String>,

    /// Read proxy descriptors from a file instead of prompting
    #[arg(long)]
    proxies_file: Option<String>,

    /// Offer one shared proxy for all wallets instead of 1:1 pairing
    #[arg(long, default_value = "false")]
    shared_proxy: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = setup_logger();
    // Keep guard alive for file logging
    std::mem::forget(_log_guard);
    dotenv().ok();

    let args = Args::parse();
    println!("{}", BANNER.cyan());

    let config = match PuzzleConfig::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut key_source: Box<dyn InputSource> = match &args.keys_file {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(PromptSource),
    };
    let mut keys =
        key_source.read_lines("Enter private keys, one per line (empty line to finish):")?;

    let (identities, pool) = if args.shared_proxy {
        let shared = ask_shared_proxy()?;
        let pool = shared.iter().cloned().collect();
        (build_identities_shared(&mut keys, shared), pool)
    } else {
        let mut proxy_source: Box<dyn InputSource> = match &args.proxies_file {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(PromptSource),
        };
        let proxy_lines =
            proxy_source.read_lines("Enter proxies, one per line (empty line to finish):")?;
        let pool = parse_pool(&proxy_lines);
        (build_identities(&mut keys, &proxy_lines), pool)
    };
    // Key lines are wiped inside the builders; drop the empty shells too
    drop(keys);

    let identities: Vec<Identity> = match identities {
        Ok(identities) => identities,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    info!("{} wallets added, starting task run", identities.len());

    let scheduler = Scheduler::new(config, identities, pool, Arc::new(SystemClock::new()));
    scheduler.run_forever().await
}

/// Yes/no prompt for the ad-hoc single-shared-proxy flow.
fn ask_shared_proxy() -> Result<Option<ProxyDescriptor>> {
    let use_proxy = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Use one shared proxy for all wallets?")
        .default(false)
        .interact()?;
    if !use_proxy {
        info!("Continuing without a proxy");
        return Ok(None);
    }

    let descriptor: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Proxy (ip:port or ip:port:username:password)")
        .allow_empty(true)
        .interact_text()?;

    match ProxyDescriptor::parse(&descriptor) {
        Some(proxy) => {
            info!("Using proxy {}", proxy);
            Ok(Some(proxy))
        }
        None => {
            info!("Continuing without a proxy");
            Ok(None)
        }
    }
}
