// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use touchbridge_flow::boards::discover;
use touchbridge_flow::config::{load_and_validate_config, RuntimeBuilder};
use touchbridge_flow::host::{serve, ChannelContext};
use touchbridge_flow::traits::FlowContext;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <config.yaml>", program);
    eprintln!("       {} --boards <config.yaml>", program);
    eprintln!("Bus messages are JSON lines: stdin carries inbound messages, stdout carries samples.");
    std::process::exit(2);
}

/// Print the discovered board table as JSON and exit.
async fn print_boards(config_path: &str) -> anyhow::Result<()> {
    let cfg = load_and_validate_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path))?;
    let registry = discover(&cfg.worker).await?;
    println!("{}", registry.to_json()?);
    Ok(())
}

/// Cancel `shutdown` on SIGINT or SIGTERM.
fn watch_signals(shutdown: CancellationToken) -> anyhow::Result<()> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => tracing::info!("SIGINT received, closing endpoints"),
            _ = terminate.recv() => tracing::info!("SIGTERM received, closing endpoints"),
        }
        shutdown.cancel();
    });
    Ok(())
}

async fn run_bridge(config_path: &str) -> anyhow::Result<()> {
    let cfg = load_and_validate_config(config_path)
        .with_context(|| format!("Failed to load {}", config_path))?;

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (_session, bridge) = RuntimeBuilder::from_config(&cfg, |endpoint| {
        ChannelContext::new(&endpoint.id, outbound_tx.clone()) as std::sync::Arc<dyn FlowContext>
    })
    .await?;
    drop(outbound_tx);

    tracing::info!(endpoints = bridge.len(), "Bridge running");

    let shutdown = CancellationToken::new();
    watch_signals(shutdown.clone())?;

    serve(
        bridge,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        outbound_rx,
        shutdown,
    )
    .await?;

    tracing::info!("All endpoints closed");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("touchbridge-flow");

    match args.get(1).map(String::as_str) {
        Some("--boards") => match args.get(2) {
            Some(path) => print_boards(path).await,
            None => usage(program),
        },
        Some(path) if !path.starts_with('-') => run_bridge(path).await,
        _ => usage(program),
    }
}
