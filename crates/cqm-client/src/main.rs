use alloy::primitives::Address;
use alloy::providers::ProviderBuilder;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use cqm::units::{format_whole_tokens, parse_whole_tokens};
use cqm_client::{
    AdminClient, ChainConfig, ConnectedWallet, CqmError, PayBackClient, RelayClient,
    TypedDataSigner,
};

/// Pay CQM tokens back through the relayer, or mint and burn as admin.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chain RPC endpoint used for reads (and for sending with a local key)
    #[arg(long, env = "RPC_URL", default_value = cqm::RPC_URL)]
    rpc_url: Url,

    /// Chain ID of the signing domain
    #[arg(long, env = "CHAIN_ID", default_value_t = cqm::CHIADO_CHAIN_ID)]
    chain_id: u64,

    /// Token contract address
    #[arg(long, env = "CONTRACT_ADDRESS", default_value_t = cqm::CONTRACT_ADDRESS)]
    contract: Address,

    /// Relayer endpoint
    #[arg(long, env = "BACKEND_URL", default_value = cqm::BACKEND_URL)]
    backend_url: Url,

    /// External wallet JSON-RPC endpoint (takes precedence over PRIVATE_KEY)
    #[arg(long, env = "WALLET_RPC_URL")]
    wallet_rpc: Option<Url>,

    /// Local private key
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    private_key: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the connected account's balance in whole tokens
    Balance,
    /// Pay whole tokens back to the contract owner, gas paid by the relayer
    PayBack {
        #[arg(long)]
        amount: String,
    },
    /// Show the total supply in whole tokens
    Supply,
    /// Mint whole tokens to the connected account
    Mint {
        #[arg(long)]
        amount: String,
    },
    /// Burn whole tokens from the connected account
    Burn {
        #[arg(long)]
        amount: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Err(e) = run(args).await {
        match e {
            CqmError::WalletUnavailable(_) => {
                eprintln!("Please connect a wallet! ({e})");
            }
            CqmError::InvalidInput(_) | CqmError::SignatureError(_) => {
                eprintln!("Error: {e}");
            }
            _ => {
                tracing::error!(error = %e, "operation failed");
                eprintln!("Operation failed. Run with --log-level debug for details.");
            }
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), CqmError> {
    let config = ChainConfig {
        chain_id: args.chain_id,
        contract: args.contract,
        rpc_url: args.rpc_url.to_string(),
        ..ChainConfig::default()
    };

    match args.command {
        Command::Supply => {
            let provider = ProviderBuilder::new().connect_http(args.rpc_url);
            let admin = AdminClient::new(provider, Address::ZERO, config);
            let supply = admin.total_supply().await?;
            println!("Total supply: {}", format_whole_tokens(supply));
        }
        Command::Balance => {
            let wallet =
                ConnectedWallet::connect(args.private_key.as_deref(), args.wallet_rpc).await?;
            let provider = ProviderBuilder::new().connect_http(args.rpc_url);
            let client =
                PayBackClient::new(wallet, provider, RelayClient::new(args.backend_url), config);
            let balance = client.balance().await?;
            println!("Balance: {}", format_whole_tokens(balance));
        }
        Command::PayBack { amount } => {
            let amount = parse_whole_tokens(&amount)?;
            let wallet =
                ConnectedWallet::connect(args.private_key.as_deref(), args.wallet_rpc).await?;
            let provider = ProviderBuilder::new().connect_http(args.rpc_url);
            let client =
                PayBackClient::new(wallet, provider, RelayClient::new(args.backend_url), config);

            let ack = client.pay_back(amount).await?;
            println!(
                "Transaction submitted successfully: {}",
                serde_json::to_string(&ack)?
            );
        }
        Command::Mint { amount } => {
            let amount = parse_whole_tokens(&amount)?;
            let wallet =
                ConnectedWallet::connect(args.private_key.as_deref(), args.wallet_rpc).await?;
            let operator = wallet.get_address().await?;
            let admin = AdminClient::new(
                wallet.transacting_provider(args.rpc_url),
                operator,
                config,
            );

            let tx = admin.mint(operator, amount).await?;
            println!("Minting successful!");
            println!("  tx: {tx}");
        }
        Command::Burn { amount } => {
            let amount = parse_whole_tokens(&amount)?;
            let wallet =
                ConnectedWallet::connect(args.private_key.as_deref(), args.wallet_rpc).await?;
            let operator = wallet.get_address().await?;
            let admin = AdminClient::new(
                wallet.transacting_provider(args.rpc_url),
                operator,
                config,
            );

            let tx = admin.burn(amount).await?;
            println!("Burning successful!");
            println!("  tx: {tx}");
        }
    }

    Ok(())
}
