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

//! Fan-out of one shared input stream over a fixed pool of worker stages.

use crate::error::PipelineError;
use crate::flow::worker::{spawn_worker_stage, WorkerFunc};
use crate::observability::events;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

const COMPONENT: &str = "fan_out";

/// Starts `max_procs` worker stages that all consume the same `input` and emits
/// each worker's output stream as soon as it is running.
///
/// Workers compete for items, so every item reaches exactly one worker and the
/// channel hand-off itself balances the load. If `token` fires before all
/// workers are emitted, the outer stream closes after the emitted prefix.
pub fn fan_out<In, Out, F>(
    token: &CancellationToken,
    input: Stream<In>,
    max_procs: usize,
    func: F,
) -> Result<Stream<Stream<Out>>, PipelineError>
where
    In: Send + 'static,
    Out: Send + 'static,
    F: Fn(&CancellationToken, In) -> Out + Send + Sync + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    let (writer, workers) = channel();
    let func: WorkerFunc<In, Out> = Arc::new(func);
    let token = token.clone();
    let worker_runtime = runtime.clone();

    runtime.spawn(COMPONENT, async move {
        let mut emitted = 0usize;
        while emitted < max_procs {
            if token.is_cancelled() {
                break;
            }
            let worker_output =
                spawn_worker_stage(&worker_runtime, &token, input.clone(), func.clone(), emitted);
            match writer.send_or_cancel(&token, worker_output).await {
                Delivery::Delivered => {
                    trace!(
                        event = events::FAN_OUT_WORKER_EMITTED,
                        component = COMPONENT,
                        worker = emitted,
                        "worker stream handed out"
                    );
                    emitted += 1;
                }
                Delivery::Cancelled | Delivery::Abandoned => break,
            }
        }
        debug!(
            event = events::STAGE_CLOSED,
            component = COMPONENT,
            emitted,
            max_procs,
            cancelled = token.is_cancelled(),
            "worker stream closed"
        );
    });

    Ok(workers)
}
