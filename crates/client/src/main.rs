//! CLI for inspecting fairdrop Dutch auctions.
//!
//! This binary reads program mappings from a JSON snapshot and provides
//! commands for:
//! - Pricing an auction at a block and sampling its price curve
//! - Reporting status and demand
//! - Computing the settlement of a bid record
//! - Listing auctions, overall or per creator

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use fairdrop_client::{
    bid_report, claim_call, withdrawable_revenue, withdrawable_unsold, SnapshotReader,
};
use fairdrop_pricing::{current_price, demand_percent, price_curve, time_percent, PricePoint};
use fairdrop_registry::{
    summaries, AuctionEntry, AuctionRegistry, AuctionSummary, ListFilter, RegistryConfig,
};
use fairdrop_types::plaintext::{format_amount, format_field, truncate_address};
use fairdrop_types::{token_label, BlockHeight};

#[derive(Parser)]
#[command(name = "fairdrop-cli")]
#[command(about = "CLI for fairdrop Dutch auctions")]
struct Cli {
    /// Registry configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Mapping snapshot file (JSON)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Block height to evaluate at
    #[arg(long, global = true)]
    block: Option<BlockHeight>,

    /// Decimals used when displaying amounts
    #[arg(long, global = true, default_value = "0")]
    decimals: u32,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current price of an auction
    Price {
        /// Auction ID
        auction_id: String,
    },

    /// Sampled price curve of an auction
    Curve {
        /// Auction ID
        auction_id: String,
    },

    /// Lifecycle status of an auction
    Status {
        /// Auction ID
        auction_id: String,
    },

    /// Settlement of a bid record against a cleared auction
    Settle {
        /// Auction ID
        auction_id: String,

        /// File holding the decrypted bid record plaintext
        #[arg(long)]
        bid_file: PathBuf,
    },

    /// Committed quantity as a percentage of supply
    Demand {
        /// Auction ID
        auction_id: String,
    },

    /// Full details of an auction
    Inspect {
        /// Auction ID
        auction_id: String,
    },

    /// List auctions, newest first
    List {
        /// Only auctions created by this address
        #[arg(long)]
        creator: Option<String>,

        /// Maximum number of auctions (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Only auctions accepting bids
        #[arg(long)]
        active: bool,
    },

    /// Auctions created by an address
    Creator {
        /// Creator address
        address: String,
    },
}

impl Cli {
    fn block(&self) -> Result<BlockHeight> {
        self.block
            .ok_or_else(|| anyhow!("--block is required for this command"))
    }

    fn amount(&self, value: u128) -> String {
        format_amount(value, self.decimals)
    }

    fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    let config = match path {
        Some(path) if path.exists() => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            RegistryConfig::from_json(&json)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        Some(path) => {
            warn!(path = %path.display(), "Config file not found, using defaults");
            RegistryConfig::default()
        }
        None => RegistryConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn open_registry(cli: &Cli, config: &RegistryConfig) -> Result<AuctionRegistry<SnapshotReader>> {
    let path = cli
        .snapshot
        .as_ref()
        .ok_or_else(|| anyhow!("--snapshot is required for this command"))?;
    let reader = SnapshotReader::load(path)?;
    Ok(AuctionRegistry::from_config(reader, config))
}

fn price_cmd(cli: &Cli, entry: &AuctionEntry) -> Result<()> {
    let block = cli.block()?;
    let price = current_price(&entry.config, block)?;

    if cli.json {
        return cli.print_json(&serde_json::json!({
            "auction_id": entry.config.auction_id,
            "block": block,
            "price": price,
        }));
    }
    println!("Auction {} at block {}:", format_field(&entry.config.auction_id), block);
    println!("  Price: {}", cli.amount(price));
    println!("  Status: {}", entry.status(block).label());
    Ok(())
}

fn curve_cmd(cli: &Cli, entry: &AuctionEntry) -> Result<()> {
    let points: Vec<PricePoint> = price_curve(&entry.config)?.collect();

    if cli.json {
        return cli.print_json(&points);
    }
    println!("Price curve for auction {}:", format_field(&entry.config.auction_id));
    for point in &points {
        println!("  block {:>10}  price {}", point.block, cli.amount(point.price));
    }
    Ok(())
}

fn status_cmd(cli: &Cli, entry: &AuctionEntry) -> Result<()> {
    let block = cli.block()?;
    let status = entry.status(block);

    if cli.json {
        return cli.print_json(&serde_json::json!({
            "auction_id": entry.config.auction_id,
            "block": block,
            "status": status,
            "time_percent": time_percent(&entry.config, block),
        }));
    }
    println!("Auction {}: {}", format_field(&entry.config.auction_id), status.label());
    println!("  Window: {} - {}", entry.config.start_block, entry.config.end_block);
    println!("  Elapsed: {}%", time_percent(&entry.config, block));
    Ok(())
}

fn settle_cmd(cli: &Cli, entry: &AuctionEntry, bid_file: &Path) -> Result<()> {
    let record = std::fs::read_to_string(bid_file)
        .with_context(|| format!("reading {}", bid_file.display()))?;
    let state = entry.state.clone().unwrap_or_default();
    let report = bid_report(&record, &entry.config, &state)?;

    if cli.json {
        return cli.print_json(&report);
    }

    let Some(settlement) = report.settlement else {
        println!("Auction {} not cleared yet", format_field(&entry.config.auction_id));
        println!("  Committed: {}", cli.amount(report.quantity));
        println!("  Payment locked: {}", cli.amount(report.payment_amount));
        return Ok(());
    };

    let claim = claim_call(&record, &entry.config, &state)?;
    println!("Settlement for auction {}:", format_field(&entry.config.auction_id));
    println!("  Clearing price: {}", cli.amount(settlement.clearing_price));
    println!("  Tokens: {}", cli.amount(settlement.sale_tokens));
    println!("  Cost: {}", cli.amount(settlement.cost_at_clearing));
    println!("  Refund: {}", cli.amount(settlement.refund));
    println!("  {} inputs: {}", claim.call.label(), claim.call.inputs[1..].join(" "));
    Ok(())
}

fn demand_cmd(cli: &Cli, entry: &AuctionEntry) -> Result<()> {
    let state = entry.state.clone().unwrap_or_default();
    let percent = demand_percent(&state, &entry.config);

    if cli.json {
        return cli.print_json(&serde_json::json!({
            "auction_id": entry.config.auction_id,
            "total_committed": state.total_committed,
            "supply": entry.config.supply,
            "demand_percent": percent,
        }));
    }
    println!(
        "Auction {}: {}% ({} / {})",
        format_field(&entry.config.auction_id),
        percent,
        cli.amount(state.total_committed),
        cli.amount(entry.config.supply)
    );
    Ok(())
}

fn inspect_cmd(
    cli: &Cli,
    registry: &AuctionRegistry<SnapshotReader>,
    entry: &AuctionEntry,
) -> Result<()> {
    let escrow = registry.escrow(&entry.config.auction_id)?;
    let config = &entry.config;
    let state = entry.state.clone().unwrap_or_default();

    if cli.json {
        return cli.print_json(&serde_json::json!({
            "config": config,
            "sale_token": token_label(&config.sale_token_id),
            "payment_token": token_label(&config.payment_token_id),
            "state": entry.state,
            "escrow": escrow,
            "summary": cli.block.map(|block| entry.summary(block)),
        }));
    }

    println!("Auction {}:", config.auction_id);
    println!("  Creator: {}", config.creator);
    println!("  Sale token: {}", token_label(&config.sale_token_id));
    println!("  Payment token: {}", token_label(&config.payment_token_id));
    println!("  Supply: {}", cli.amount(config.supply));
    println!(
        "  Price: {} -> {} (-{} every {} blocks)",
        cli.amount(config.start_price),
        cli.amount(config.floor_price),
        cli.amount(config.price_decay_amount),
        config.price_decay_blocks
    );
    println!("  Window: {} - {}", config.start_block, config.end_block);
    if config.has_bid_cap() {
        println!(
            "  Bid bounds: {} - {}",
            cli.amount(config.min_bid_amount),
            cli.amount(config.max_bid_amount)
        );
    } else {
        println!("  Min bid: {}", cli.amount(config.min_bid_amount));
    }

    if let Some(block) = cli.block {
        println!("  Status: {}", entry.status(block).label());
        match current_price(config, block) {
            Ok(price) => println!("  Current price: {}", cli.amount(price)),
            Err(e) => println!("  Current price: unavailable ({e})"),
        }
    }

    println!(
        "  Committed: {} ({}%)",
        cli.amount(state.total_committed),
        demand_percent(&state, config)
    );
    println!("  Payments: {}", cli.amount(state.total_payments));
    if let Some(price) = state.final_price() {
        println!("  Clearing price: {}", cli.amount(price));
        println!("  Revenue: {}", cli.amount(state.creator_revenue));
    }

    println!("  Escrow:");
    println!("    Sale tokens: {}", cli.amount(escrow.sales));
    println!("    Payments: {}", cli.amount(escrow.payments));
    println!(
        "    Withdrawable revenue: {}",
        cli.amount(withdrawable_revenue(&state, &escrow))
    );
    println!(
        "    Withdrawable unsold: {}",
        cli.amount(withdrawable_unsold(config, &state, &escrow))
    );
    Ok(())
}

fn print_summaries(cli: &Cli, rows: &[AuctionSummary]) -> Result<()> {
    if cli.json {
        return cli.print_json(&rows);
    }
    if rows.is_empty() {
        println!("No auctions found");
        return Ok(());
    }

    println!("Auctions:");
    for s in rows {
        let price = s
            .current_price
            .map_or_else(|| "-".to_string(), |p| cli.amount(p));
        println!(
            "  [{}] {} - price {} - {}% sold ({})",
            format_field(&s.auction_id),
            s.status.label(),
            price,
            s.demand_percent,
            truncate_address(&s.creator, 8)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fairdrop_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let registry = open_registry(&cli, &config)?;

    match &cli.command {
        Commands::Price { auction_id } => price_cmd(&cli, &registry.auction(auction_id)?)?,

        Commands::Curve { auction_id } => curve_cmd(&cli, &registry.auction(auction_id)?)?,

        Commands::Status { auction_id } => status_cmd(&cli, &registry.auction(auction_id)?)?,

        Commands::Settle {
            auction_id,
            bid_file,
        } => settle_cmd(&cli, &registry.auction(auction_id)?, bid_file)?,

        Commands::Demand { auction_id } => demand_cmd(&cli, &registry.auction(auction_id)?)?,

        Commands::Inspect { auction_id } => {
            inspect_cmd(&cli, &registry, &registry.auction(auction_id)?)?
        }

        Commands::List {
            creator,
            limit,
            active,
        } => {
            let block = cli.block()?;
            let filter = ListFilter {
                creator: creator.clone(),
                limit: *limit,
            };
            let mut listed = summaries(&registry.list_auctions(&filter)?, block);
            if *active {
                listed.retain(|s| s.status.accepts_bids());
            }
            info!(count = listed.len(), "Listed auctions");
            print_summaries(&cli, &listed)?;
        }

        Commands::Creator { address } => {
            let block = cli.block()?;
            let entries = registry.creator_auctions(address)?;
            info!(creator = %address, count = entries.len(), "Loaded creator auctions");
            print_summaries(&cli, &summaries(&entries, block))?;
        }
    }

    Ok(())
}
