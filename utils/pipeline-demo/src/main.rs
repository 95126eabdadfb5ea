/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use stream_pipelines::{
    combine, fan_in, fan_out, from_iter, tee, worker_stage, HeartbeatConfig, HeartbeatExecutor,
    Stream,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_ITEMS: [&str; 7] = ["this", "is", "a", "list", "of", "multiple", "items"];
const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Parser)]
#[command(name = "pipeline-demo")]
#[command(about = "Runs words through fan-out, fan-in, tee, combine and a heartbeat-supervised job")]
struct Cli {
    /// Number of fan-out workers; overrides the config file
    #[arg(long)]
    workers: Option<usize>,

    /// JSON5 config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// How long the supervised job runs before reporting its result
    #[arg(long, default_value_t = 300)]
    work_ms: u64,

    /// Words to process
    items: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    workers: usize,
    heartbeat: HeartbeatConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("unable to read config {}", path.display()))?;
    let config: DemoConfig = json5::from_str(&raw)
        .with_context(|| format!("unable to parse config {}", path.display()))?;
    config.heartbeat.validate()?;
    Ok(config)
}

async fn print_all(label: &str, stream: Stream<String>) -> usize {
    let mut printed = 0;
    while let Some(line) = stream.recv().await {
        println!("{label}: {line}");
        printed += 1;
    }
    printed
}

async fn run(cli: Cli, token: CancellationToken) -> Result<ExitCode> {
    let config = load_config(cli.config.as_ref())?;
    let workers = cli.workers.unwrap_or(config.workers);
    let items = if cli.items.is_empty() {
        DEFAULT_ITEMS.iter().map(|item| item.to_string()).collect()
    } else {
        cli.items
    };
    info!(workers, items = items.len(), "starting pipeline");

    let (for_pool, for_lengths) = tee(&token, from_iter(&token, items)?)?;
    let upper = fan_in(
        &token,
        fan_out(&token, for_pool, workers, |_token, word: String| {
            word.to_uppercase()
        })?,
    )?;
    let lengths = worker_stage(&token, for_lengths, |_token, word: String| {
        format!("{word} has {} characters", word.chars().count())
    })?;
    let printed = print_all("combined", combine(&token, vec![Some(upper), Some(lengths)])?).await;
    info!(printed, "pipeline drained");

    let work = Duration::from_millis(cli.work_ms);
    let executor = HeartbeatExecutor::new(config.heartbeat);
    let outcome = executor
        .run(&token, move |token| async move {
            tokio::select! {
                _ = token.cancelled() => 0,
                _ = tokio::time::sleep(work) => printed,
            }
        })
        .await;

    match outcome {
        Ok(value) => {
            println!("supervised job finished with {value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(%err, "supervised job failed");
            eprintln!("supervised job failed: {err}");
            Ok(ExitCode::from(1))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match run(cli, token).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("pipeline-demo failed: {err:#}");
            ExitCode::from(2)
        }
    }
}
