//! `drips` command-line client.
//!
//! Offline commands (`account`, `stream-config`, `orcid`) need no RPC.
//! `collect` and `claim-orcid` read the signer key from `DRIPS_PRIVATE_KEY`.

use std::path::PathBuf;

use alloy::primitives::U256;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use drips_sdk::chain::{PendingTx, SigningClient, Wallet, WriteClient};
use drips_sdk::claim::{claim_orcid, prepare_claim_orcid, ClaimOptions, ClaimOrcidResult, StepResult};
use drips_sdk::codec::{
    decode_stream_config, encode_stream_config, parse_account_id, resolve_address_from_address_driver_id,
    resolve_driver_name, DriverName, Orcid, StreamConfig,
};
use drips_sdk::collect::{prepare_collection, CollectConfig};
use drips_sdk::config::{load_config, SdkConfig};
use drips_sdk::observability::logging::init_logging;
use drips_sdk::registry::ContractRegistry;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "drips")]
#[command(about = "Client for the Drips streaming and splitting protocol", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured RPC URL.
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an account ID into its driver (and address, for AddressDriver IDs)
    Account { account_id: String },
    /// Pack or unpack a stream config
    StreamConfig {
        #[command(subcommand)]
        action: StreamConfigAction,
    },
    /// Validate an ORCID iD
    Orcid { orcid: String },
    /// Build (and optionally send) a batched collection transaction
    Collect {
        /// Collection request as JSON, or `@path` to read it from a file
        #[arg(long)]
        request: String,
        /// Broadcast the transaction and wait for its receipt
        #[arg(long)]
        send: bool,
    },
    /// Claim an ORCID iD and route its splits to the signer
    ClaimOrcid {
        orcid: String,
        /// Print the batched claim transaction without sending it
        #[arg(long)]
        prepare_only: bool,
    },
}

#[derive(Subcommand)]
enum StreamConfigAction {
    Encode {
        #[arg(long, default_value_t = 0)]
        drip_id: u64,
        #[arg(long)]
        amount_per_sec: U256,
        #[arg(long, default_value_t = 0)]
        start: u64,
        #[arg(long, default_value_t = 0)]
        duration: u64,
    },
    Decode { config: U256 },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SdkConfig::default(),
    };
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc.rpc_url = rpc_url;
    }
    init_logging(&config.observability);

    let output = match cli.command {
        Commands::Account { account_id } => account(&account_id)?,
        Commands::StreamConfig { action } => stream_config(action)?,
        Commands::Orcid { orcid } => {
            let orcid = Orcid::parse(&orcid)?;
            json!({ "orcid": orcid, "valid": true })
        }
        Commands::Collect { request, send } => collect(&config, &request, send).await?,
        Commands::ClaimOrcid { orcid, prepare_only } => claim(&config, &orcid, prepare_only).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn account(account_id: &str) -> CliResult<Value> {
    let account_id = parse_account_id(account_id)?;
    let driver = resolve_driver_name(account_id)?;
    let address = match driver {
        DriverName::Address => Some(resolve_address_from_address_driver_id(account_id)?.to_checksum(None)),
        _ => None,
    };
    Ok(json!({
        "accountId": account_id.to_string(),
        "driver": driver.as_str(),
        "address": address,
    }))
}

fn stream_config(action: StreamConfigAction) -> CliResult<Value> {
    match action {
        StreamConfigAction::Encode {
            drip_id,
            amount_per_sec,
            start,
            duration,
        } => {
            let config = StreamConfig::from_raw(drip_id, amount_per_sec, start, duration)?;
            let packed = encode_stream_config(&config)?;
            Ok(json!({ "config": packed.to_string() }))
        }
        StreamConfigAction::Decode { config } => {
            let config = decode_stream_config(config)?;
            Ok(json!({
                "dripId": config.drip_id,
                "amountPerSec": config.amount_per_sec.to_string(),
                "start": config.start,
                "duration": config.duration,
            }))
        }
    }
}

async fn signing_client(config: &SdkConfig) -> CliResult<SigningClient> {
    let wallet = Wallet::from_env()?;
    let client = SigningClient::new(config.rpc.clone(), wallet).await?;
    Ok(client)
}

async fn collect(config: &SdkConfig, request: &str, send: bool) -> CliResult<Value> {
    let request: CollectConfig = match request.strip_prefix('@') {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => serde_json::from_str(request)?,
    };
    let registry = ContractRegistry::from_config(config);
    let client = signing_client(config).await?;

    let tx = prepare_collection(&client, &registry, &request).await?;
    if !send {
        return Ok(serde_json::to_value(&tx)?);
    }

    let pending = client.send_tx(tx).await?;
    tracing::info!(tx_hash = %pending.hash(), "Waiting for collection receipt");
    let receipt = pending.wait(config.rpc.confirmations).await?;
    Ok(serde_json::to_value(&receipt)?)
}

async fn claim(config: &SdkConfig, orcid: &str, prepare_only: bool) -> CliResult<Value> {
    let registry = ContractRegistry::from_config(config);
    let client = signing_client(config).await?;

    if prepare_only {
        let tx = prepare_claim_orcid(&client, &registry, orcid).await?;
        return Ok(serde_json::to_value(&tx)?);
    }

    let mut options = ClaimOptions::from(&config.claim);
    options.on_progress = Some(Box::new(|elapsed| {
        tracing::info!(elapsed_secs = elapsed.as_secs(), "Waiting for ORCID ownership");
    }));

    let result = claim_orcid(&client, &registry, orcid, options).await?;
    Ok(claim_report(&result))
}

fn claim_report(result: &ClaimOrcidResult) -> Value {
    fn step<T>(step: &StepResult<T>, data: impl FnOnce(&T) -> Value) -> Value {
        match step {
            StepResult::Success(value) => json!({ "success": true, "data": data(value) }),
            StepResult::Failed(error) => json!({ "success": false, "error": error.to_string() }),
        }
    }

    json!({
        "runId": result.run_id,
        "orcid": result.orcid,
        "status": format!("{:?}", result.status()).to_lowercase(),
        "claim": step(&result.claim, |c| json!({
            "accountId": c.account_id.to_string(),
            "txHash": c.tx_hash,
        })),
        "ownership": step(&result.ownership, |o| json!({
            "owner": o.owner,
            "elapsedMs": o.elapsed.as_millis() as u64,
            "polls": o.polls,
        })),
        "splits": step(&result.splits, |s| json!({
            "receiverAccountId": s.receiver_account_id.to_string(),
            "txHash": s.tx_hash,
        })),
    })
}
