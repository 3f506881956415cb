use std::str::FromStr;

use anyhow::{bail, Context};
use groupbuy_api::prelude::*;
use groupbuy_client::*;
use tracing_subscriber::EnvFilter;

const WATCH_INTERVAL_MS: u32 = 2_000;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let provider = HttpProvider::http(config.rpc_url.clone());
    let command = env_var("COMMAND")?;
    match command.as_str() {
        "connect" => {
            log_wallet(&provider).await?;
        }
        "campaigns" => {
            log_campaigns(&provider, &config).await?;
        }
        "campaign" => {
            log_campaign(&provider, &config).await?;
        }
        "commit" => {
            commit(&provider, &config).await?;
        }
        "refund" => {
            refund(&provider, &config).await?;
        }
        "create" => {
            create(&provider, &config).await?;
        }
        "leader" => {
            log_leader(&provider, &config).await?;
        }
        "election-commit" => {
            election_commit(&provider, &config).await?;
        }
        "election-reveal" => {
            election_reveal(&provider, &config).await?;
        }
        "election-reset" => {
            election_reset(&provider, &config).await?;
        }
        "watch" => {
            watch(&provider, &config).await?;
        }
        _ => bail!("Unknown COMMAND {}", command),
    };

    Ok(())
}

async fn log_wallet(provider: &HttpProvider) -> Result<(), anyhow::Error> {
    let mut wallet = WalletState::default();
    connect(Some(provider), &mut wallet).await?;
    if json_output() {
        println!("{}", serde_json::to_string_pretty(&wallet)?);
        return Ok(());
    }
    println!("Wallet");
    if let Some(address) = wallet.address {
        println!("  address: {}", address);
    }
    println!("  network: {}", wallet.network.as_deref().unwrap_or_default());
    println!("  chain_id: {}", wallet.chain_id.as_deref().unwrap_or_default());
    println!("  balance: {} ETH", to_ether(wallet.balance));
    Ok(())
}

async fn log_campaigns(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let contract = GroupBuyContract::new(provider, config.groupbuy_contract);
    let caller = try_caller(provider).await;
    let entries = scan_campaigns(&contract, caller, &config.scan, unix_now()).await;
    if json_output() {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No campaigns");
        return Ok(());
    }
    for entry in entries {
        println!("Campaign #{}", entry.id);
        println!("  status: {}", entry.status);
        if let Some(error) = &entry.error {
            println!("  error: {}", error);
            continue;
        }
        if let Some(record) = &entry.record {
            println!("  organizer: {}", short_address(&record.organizer));
            println!("  unit_price: {} ETH", to_ether(record.unit_price));
        }
        if let Some(snapshot) = &entry.snapshot {
            println!("  committed: {} / {}", snapshot.committed, snapshot.goal);
            println!("  progress: {:.0}%", entry.progress_percent());
        }
    }
    Ok(())
}

async fn log_campaign(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let id = env_parse::<u64>("ID")?;
    let caller = require_caller(provider).await?;
    let contract = GroupBuyContract::new(provider, config.groupbuy_contract);
    let mut session = CampaignSession::new(contract, Some(caller), id);
    session.refresh().await;
    print_campaign(session.state())?;
    Ok(())
}

async fn commit(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let id = env_parse::<u64>("ID")?;
    let accepted = std::env::var("ACCEPT_TERMS").is_ok_and(|v| v == "true" || v == "1");
    let caller = require_caller(provider).await?;
    let contract = GroupBuyContract::new(provider, config.groupbuy_contract);
    let mut session = CampaignSession::new(contract, Some(caller), id);
    session.refresh().await;
    session.accept_terms(accepted);
    let hash = session.commit().await?;
    println!("Commit transaction: {}", hash);
    print_campaign(session.state())?;
    Ok(())
}

async fn refund(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let id = env_parse::<u64>("ID")?;
    let caller = require_caller(provider).await?;
    let contract = GroupBuyContract::new(provider, config.groupbuy_contract);
    let mut session = CampaignSession::new(contract, Some(caller), id);
    session.refresh().await;
    let hash = session.refund().await?;
    println!("Refund transaction: {}", hash);
    print_campaign(session.state())?;
    Ok(())
}

async fn create(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let id = env_parse::<u64>("ID")?;
    let company = env_parse::<Address>("COMPANY")?;
    let price = from_ether(&env_var("PRICE")?).context("Invalid PRICE")?;
    let goal = env_parse::<u64>("GOAL")?;
    let days = env_parse::<u64>("DAYS")?;
    let caller = require_caller(provider).await?;
    let contract = GroupBuyContract::new(provider, config.groupbuy_contract);
    if contract.campaign(id).await?.exists() {
        bail!("Campaign #{} already exists", id);
    }
    let hash = contract
        .create_campaign(caller, id, company, price, goal, days)
        .await?;
    println!("Create transaction: {}", hash);
    Ok(())
}

async fn log_leader(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let election = ElectionContract::new(provider, config.election_contract);
    let leader = election.leader().await?;
    println!("Election");
    println!("  address: {}", election.address());
    if leader.is_zero() {
        println!("  leader: none");
    } else {
        println!("  leader: {}", leader);
    }
    Ok(())
}

async fn election_commit(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let value = env_parse::<U256>("VALUE")?;
    let salt = env_parse::<B256>("SALT")?;
    let caller = require_caller(provider).await?;
    let election = ElectionContract::new(provider, config.election_contract);
    let hash = election.commit(caller, value, salt).await?;
    println!("Commit transaction: {}", hash);
    Ok(())
}

async fn election_reveal(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let value = env_parse::<U256>("VALUE")?;
    let caller = require_caller(provider).await?;
    let election = ElectionContract::new(provider, config.election_contract);
    let hash = election.reveal(caller, value).await?;
    println!("Reveal transaction: {}", hash);
    Ok(())
}

async fn election_reset(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let caller = require_caller(provider).await?;
    let election = ElectionContract::new(provider, config.election_contract);
    let hash = election.reset(caller).await?;
    println!("Reset transaction: {}", hash);
    Ok(())
}

async fn watch(provider: &HttpProvider, config: &Config) -> Result<(), anyhow::Error> {
    let election = ElectionContract::new(provider, config.election_contract);
    let mut subscriptions = SubscriptionSet::new();
    subscriptions.push(election.subscribe(&ElectionEventKind::ALL).await?);
    println!("Watching {} (ctrl-c to stop)", election.address());

    let stopped = tokio::select! {
        _ = poll_events(&subscriptions) => Ok(()),
        stopped = tokio::signal::ctrl_c() => stopped,
    };
    subscriptions.dispose().await?;
    Ok(stopped?)
}

async fn poll_events(subscriptions: &SubscriptionSet<'_, HttpProvider>) {
    loop {
        // Failed filters are already logged by the set.
        let (events, _) = subscriptions.poll().await;
        for event in events {
            match event {
                ElectionEvent::LeaderElected { leader } => println!("Leader elected: {}", leader),
                ElectionEvent::RevealOn => println!("Reveal phase started"),
                ElectionEvent::ResetDone => println!("Election reset"),
            }
        }
        sleep_ms(WATCH_INTERVAL_MS).await;
    }
}

fn print_campaign(state: &CampaignState) -> Result<(), anyhow::Error> {
    if json_output() {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }
    println!("Campaign #{}", state.id);
    println!("  status: {}", state.status.detail_label());
    if let Some(snapshot) = &state.snapshot {
        println!("  organizer: {}", snapshot.organizer);
        println!("  unit_price: {} ETH", to_ether(snapshot.unit_price));
        println!("  committed: {} / {}", snapshot.committed, snapshot.goal);
        println!("  progress: {:.0}%", state.progress_percent());
        println!("  deadline: {}", snapshot.deadline);
    }
    println!("  has_committed: {}", state.flags.has_committed);
    println!("  has_refunded: {}", state.flags.has_refunded);
    if let Some(error) = &state.error {
        println!("  error: {}", error);
    }
    Ok(())
}

async fn require_caller(provider: &HttpProvider) -> Result<Address, anyhow::Error> {
    let mut wallet = WalletState::default();
    connect(Some(provider), &mut wallet).await?;
    Ok(wallet.require_address()?)
}

/// The first account if the node exposes one. List views work without it.
async fn try_caller(provider: &HttpProvider) -> Option<Address> {
    match provider.request_accounts().await {
        Ok(accounts) => accounts.first().copied(),
        Err(e) => {
            tracing::warn!("No caller account, listing without personal status: {}", e);
            None
        }
    }
}

fn json_output() -> bool {
    std::env::var("FORMAT").is_ok_and(|f| f == "json")
}

fn env_var(name: &str) -> Result<String, anyhow::Error> {
    std::env::var(name).with_context(|| format!("Missing {} env var", name))
}

fn env_parse<T>(name: &str) -> Result<T, anyhow::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env_var(name)?;
    T::from_str(value.trim()).with_context(|| format!("Invalid {}", name))
}
