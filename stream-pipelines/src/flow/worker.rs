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

//! Sequential worker stage: one output item per input item, in input order.

use crate::error::PipelineError;
use crate::flow::{log_stage_abandoned, log_stage_exit};
use crate::observability::events;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream, StreamWriter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

const COMPONENT: &str = "worker_stage";

/// Shared form of a worker function, as handed to every worker of a fan-out.
pub type WorkerFunc<In, Out> = Arc<dyn Fn(&CancellationToken, In) -> Out + Send + Sync>;

/// Applies `func` to each item of `input` and emits the results in input order.
///
/// `func` runs synchronously inside the stage task, one item at a time. If
/// cancellation fires while a result waits to be sent, the result is dropped and
/// the stage exits. Closing `input` closes the output.
pub fn worker_stage<In, Out, F>(
    token: &CancellationToken,
    input: Stream<In>,
    func: F,
) -> Result<Stream<Out>, PipelineError>
where
    In: Send + 'static,
    Out: Send + 'static,
    F: Fn(&CancellationToken, In) -> Out + Send + Sync + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    Ok(spawn_worker_stage(&runtime, token, input, Arc::new(func), 0))
}

/// Infallible variant used by fan-out, where `worker` labels the instance.
pub(crate) fn spawn_worker_stage<In, Out>(
    runtime: &StageRuntime,
    token: &CancellationToken,
    input: Stream<In>,
    func: WorkerFunc<In, Out>,
    worker: usize,
) -> Stream<Out>
where
    In: Send + 'static,
    Out: Send + 'static,
{
    let (writer, output) = channel();
    runtime.spawn(COMPONENT, work(token.clone(), input, func, writer, worker));
    output
}

async fn work<In, Out>(
    token: CancellationToken,
    input: Stream<In>,
    func: WorkerFunc<In, Out>,
    output: StreamWriter<Out>,
    worker: usize,
) {
    trace!(
        event = events::STAGE_STARTED,
        component = COMPONENT,
        worker,
        "worker waiting for input"
    );

    let mut processed = 0usize;
    while let Some(item) = input.recv_or_cancel(&token).await {
        let result = func(&token, item);
        match output.send_or_cancel(&token, result).await {
            Delivery::Delivered => processed += 1,
            Delivery::Cancelled => break,
            Delivery::Abandoned => {
                log_stage_abandoned(COMPONENT, processed);
                return;
            }
        }
    }
    log_stage_exit(COMPONENT, &token, processed);
}
