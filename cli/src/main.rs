//! devdrop: balances, faucet funds, airdrops and token mints against a ledger endpoint.

mod targets;

use anyhow::{bail, Context};
use clap::Parser;
use devdrop_crypto::{read_keypair_file, Keypair};
use devdrop_ledger_client::{LedgerClient, RpcLedgerClient};
use devdrop_services::{
    AirdropService, BalanceTracker, DevdropConfig, DropOrchestrator, TokenMintService,
};
use devdrop_types::{Account, Cluster, SnapshotReport, LAMPORTS_PER_SOL};
use devdrop_utils::{init_logging, LogFormat};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "devdrop", about = "Devnet airdrops and token mints")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DEVDROP_CONFIG")]
    config: Option<PathBuf>,

    /// Cluster: "devnet", "testnet" or "mainnet-beta".
    #[arg(long, env = "DEVDROP_NETWORK")]
    network: Option<Cluster>,

    /// RPC endpoint URL (defaults to the cluster's public endpoint).
    #[arg(long, env = "DEVDROP_ENDPOINT")]
    endpoint: Option<String>,

    /// Keypair file of the funder / mint authority.
    #[arg(long, env = "DEVDROP_KEYPAIR")]
    keypair: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DEVDROP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DEVDROP_LOG_FORMAT")]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print balances of one or more accounts.
    Balance {
        #[arg(required = true)]
        accounts: Vec<Account>,

        /// Print token balances for this mint instead of native balances.
        #[arg(long)]
        mint: Option<Account>,
    },
    /// Request faucet funds (devnet only).
    Fund {
        /// Recipient. Defaults to the keypair's account.
        #[arg(long)]
        account: Option<Account>,

        #[arg(long, default_value_t = LAMPORTS_PER_SOL)]
        lamports: u64,
    },
    /// Airdrop SOL to wallets and report before/after balances.
    Drop {
        /// Targets as WALLET=SOL.
        #[arg(required = true)]
        targets: Vec<String>,
    },
    /// Create a token mint owned by the keypair.
    CreateMint {
        #[arg(long)]
        decimals: u8,

        /// Whole tokens to issue right away.
        #[arg(long)]
        amount: Option<u64>,
    },
    /// Issue more tokens of an existing mint.
    MintMore {
        #[arg(long)]
        mint: Account,

        /// Whole tokens to issue.
        #[arg(long)]
        amount: u64,
    },
}

/// File config (or defaults) with CLI flags and env vars applied on top.
fn merge_config(cli: &Cli, file_config: Option<DevdropConfig>) -> DevdropConfig {
    let base = file_config.unwrap_or_default();
    DevdropConfig {
        network: cli.network.unwrap_or(base.network),
        ledger_endpoint: cli.endpoint.clone().or(base.ledger_endpoint.clone()),
        keypair_path: cli.keypair.clone().or(base.keypair_path.clone()),
        log_level: cli.log_level.clone().unwrap_or(base.log_level.clone()),
        log_format: cli.log_format.clone().unwrap_or(base.log_format.clone()),
        ..base
    }
}

fn load_keypair(config: &DevdropConfig) -> anyhow::Result<Option<Keypair>> {
    config
        .keypair_path
        .as_ref()
        .map(|path| read_keypair_file(path))
        .transpose()
        .context("failed to load keypair")
}

fn require_keypair(config: &DevdropConfig) -> anyhow::Result<Keypair> {
    match load_keypair(config)? {
        Some(keypair) => Ok(keypair),
        None => bail!("this command needs --keypair (or keypair_path in the config file)"),
    }
}

fn print_report(report: &SnapshotReport) {
    for (account, amount) in report.balances.iter() {
        println!("{account}\t{amount}");
    }
    for (account, reason) in &report.failures {
        println!("{account}\terror: {reason}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = cli.config.as_ref().map(DevdropConfig::from_toml_file);
    let (file_config, file_error) = match file_config {
        Some(Ok(cfg)) => (Some(cfg), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let config = merge_config(&cli, file_config);

    let log_format: LogFormat = config.log_format.parse()?;
    init_logging(log_format, &config.log_level);
    if let Some(e) = file_error {
        tracing::warn!("{e}, using CLI defaults");
    }
    config.validate()?;

    let cluster = config.cluster_config();
    tracing::info!(
        network = %cluster.network,
        endpoint = %cluster.ledger_endpoint,
        "devdrop starting"
    );
    let client: Arc<dyn LedgerClient> = Arc::new(RpcLedgerClient::new(
        cluster.ledger_endpoint.clone(),
        config.rpc_options(),
    )?);

    match cli.command {
        Command::Balance { accounts, mint } => {
            let tracker = BalanceTracker::from_config(client, &config);
            let report = match mint {
                Some(mint) => tracker.snapshot_token(&accounts, &mint).await,
                None => tracker.snapshot(&accounts).await,
            };
            print_report(&report);
            if !report.is_complete() {
                bail!("{} balance read(s) failed", report.failures.len());
            }
        }
        Command::Fund { account, lamports } => {
            let funder = load_keypair(&config)?;
            let recipient = account.or_else(|| funder.as_ref().map(Keypair::account));
            let service = AirdropService::from_config(client, &config);
            match service.request_dev_funds(recipient.as_ref(), lamports).await? {
                Some(signature) => println!("{signature}"),
                None => tracing::warn!("no account given and no keypair configured; nothing requested"),
            }
        }
        Command::Drop { targets } => {
            let batch = targets::parse_batch(&targets)?;
            let funder = load_keypair(&config)?;
            let orchestrator = DropOrchestrator::from_config(client, &config);
            let report = orchestrator.run(funder.as_ref(), &batch).await;

            println!("before:");
            print_report(&report.before);
            println!("after:");
            print_report(&report.after);
            for (account, delta) in report.deltas() {
                println!(
                    "{account}\t{delta:+}\t({:+.9} SOL)",
                    delta as f64 / LAMPORTS_PER_SOL as f64
                );
            }
            match report.outcome {
                Ok(Some(signature)) => println!("signature: {signature}"),
                Ok(None) => tracing::warn!("no keypair configured; drop skipped"),
                Err(e) => return Err(e.into()),
            }
        }
        Command::CreateMint { decimals, amount } => {
            let authority = require_keypair(&config)?;
            let service = TokenMintService::from_config(client, &config);
            let mint = match amount {
                Some(amount) => {
                    service
                        .create_mint_with_supply(&authority, decimals, amount)
                        .await?
                }
                None => service.create_mint(&authority, decimals).await?,
            };
            println!("mint: {}", mint.address);
            println!("decimals: {}", mint.decimals);
            println!("supply: {}", mint.supply);
        }
        Command::MintMore { mint, amount } => {
            let authority = require_keypair(&config)?;
            let service = TokenMintService::from_config(client, &config);
            let current = service.refresh(&mint).await?;
            let updated = service.mint_more(&current, &authority, amount).await?;
            println!("mint: {}", updated.address);
            println!("supply: {}", updated.supply);
        }
    }

    Ok(())
}
