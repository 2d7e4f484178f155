//! ticketsafi-client CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use ticketsafi_client::{
    ApiClient, ClientConfig, ConfirmationPoller, GateScanner, HttpStatusSource, HttpStoreSource,
    HttpTicketVerifier, ScanVerdict,
};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<ExitCode> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = cli.to_config()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    info!("ticketsafi-client v{}", env!("CARGO_PKG_VERSION"));

    let api = ApiClient::new(&config)?;

    match cli.command {
        Command::VerifyPayment { reference } => verify_payment(api, &config, reference).await,
        Command::Scan { qr_hash, role } => scan(api, role.into(), &qr_hash).await,
        Command::Store { slug } => store(api, &slug).await,
    }
}

async fn verify_payment(
    api: ApiClient,
    config: &ClientConfig,
    reference: String,
) -> color_eyre::Result<ExitCode> {
    let poller = ConfirmationPoller::new(HttpStatusSource::new(api), config.poll.clone());

    let (tx, rx) = oneshot::channel();
    let handle = poller.start(reference, move |completion| {
        let _ = tx.send(completion);
    });

    tokio::select! {
        completion = rx => {
            let Ok(completion) = completion else {
                warn!("Confirmation ended without a result");
                return Ok(ExitCode::FAILURE);
            };
            println!("{}: {}", completion.subject_id, completion.outcome.state());
            println!("{}", completion.outcome.advisory());
            if let Some(payload) = completion.outcome.payload() {
                println!("{}", serde_json::to_string_pretty(&payload.details)?);
            }
            Ok(if completion.outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, cancelling confirmation");
            handle.cancel();
            Ok(ExitCode::from(130))
        }
    }
}

async fn scan(
    api: ApiClient,
    role: ticketsafi_client::StaffRole,
    qr_hash: &str,
) -> color_eyre::Result<ExitCode> {
    let scanner = GateScanner::new(HttpTicketVerifier::new(api), role)?;

    match scanner.submit(qr_hash).await {
        Some(ScanVerdict::Valid(details)) => {
            println!("VALID TICKET");
            println!("Attendee: {}", details.display_name());
            println!("Tier: {}", details.tier_name.as_deref().unwrap_or("-"));
            Ok(ExitCode::SUCCESS)
        }
        Some(ScanVerdict::Rejected { message, .. }) => {
            println!("{message}");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

async fn store(api: ApiClient, slug: &str) -> color_eyre::Result<ExitCode> {
    let store = HttpStoreSource::new(api).fetch(slug).await?;

    println!("{} ({})", store.name, store.slug);
    if !store.description.is_empty() {
        println!("{}", store.description);
    }
    if store.events.is_empty() {
        println!("No upcoming events");
    }
    for event in &store.events {
        let date = event.start_datetime.map_or_else(
            || "TBA".to_string(),
            |start| start.format("%Y-%m-%d %H:%M").to_string(),
        );
        let price = event.lowest_price.as_deref().unwrap_or("-");
        println!("{date}  {}  from KES {price}", event.title);
    }
    Ok(ExitCode::SUCCESS)
}
