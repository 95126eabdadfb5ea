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

//! Combine: merge a fixed list of streams into one.

use crate::error::PipelineError;
use crate::flow::log_stage_exit;
use crate::flow::or_done::spawn_or_done;
use crate::observability::events;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream, StreamWriter};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

const COMPONENT: &str = "combine";

/// Merges every present stream in `sources` into one output stream.
///
/// `None` entries are skipped. Each source gets its own relay task; the output
/// closes only after every relay has finished, by exhaustion or cancellation.
/// With no sources the output is closed right away.
pub fn combine<T>(
    token: &CancellationToken,
    sources: Vec<Option<Stream<T>>>,
) -> Result<Stream<T>, PipelineError>
where
    T: Send + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    let (writer, output) = channel();

    let mut relays = JoinSet::new();
    for (index, source) in sources.into_iter().enumerate() {
        let Some(source) = source else {
            trace!(component = COMPONENT, index, "skipping absent source");
            continue;
        };
        let source = spawn_or_done(&runtime, token, source);
        runtime.spawn_joined(
            COMPONENT,
            &mut relays,
            relay(token.clone(), index, source, writer.share()),
        );
    }

    let token = token.clone();
    runtime.spawn(COMPONENT, async move {
        let mut total = 0usize;
        while let Some(joined) = relays.join_next().await {
            match joined {
                Ok(relayed) => total += relayed,
                Err(err) => warn!(component = COMPONENT, %err, "relay task failed"),
            }
        }
        drop(writer);
        log_stage_exit(COMPONENT, &token, total);
    });

    Ok(output)
}

async fn relay<T>(
    token: CancellationToken,
    index: usize,
    source: Stream<T>,
    output: StreamWriter<T>,
) -> usize {
    let mut relayed = 0usize;
    while let Some(item) = source.recv_or_cancel(&token).await {
        if output.send_or_cancel(&token, item).await != Delivery::Delivered {
            break;
        }
        relayed += 1;
    }
    trace!(
        event = events::COMBINE_RELAY_FINISHED,
        component = COMPONENT,
        index,
        relayed,
        "relay finished"
    );
    relayed
}
