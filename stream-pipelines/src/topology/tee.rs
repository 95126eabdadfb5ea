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

//! Tee: duplicate one stream into two independently consumed streams.

use crate::error::PipelineError;
use crate::flow::log_stage_exit;
use crate::flow::or_done::spawn_or_done;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream, StreamWriter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const COMPONENT: &str = "tee";

/// Delivers every item of `input` to both returned streams.
///
/// An item must be accepted by both outputs, in either order, before the next
/// input item is read, so the two consumers never drift apart by more than one
/// item. If one output is dropped, the other keeps receiving. Both outputs close
/// when `input` closes or `token` fires.
pub fn tee<T>(
    token: &CancellationToken,
    input: Stream<T>,
) -> Result<(Stream<T>, Stream<T>), PipelineError>
where
    T: Clone + Send + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    let (left_writer, left) = channel();
    let (right_writer, right) = channel();
    let input = spawn_or_done(&runtime, token, input);

    runtime.spawn(
        COMPONENT,
        duplicate(token.clone(), input, left_writer, right_writer),
    );
    Ok((left, right))
}

async fn duplicate<T>(
    token: CancellationToken,
    input: Stream<T>,
    left: StreamWriter<T>,
    right: StreamWriter<T>,
) where
    T: Clone + Send + 'static,
{
    let mut duplicated = 0usize;
    while let Some(item) = input.recv_or_cancel(&token).await {
        let (to_left, to_right) = futures::join!(
            left.send_or_cancel(&token, item.clone()),
            right.send_or_cancel(&token, item),
        );

        match (to_left, to_right) {
            (Delivery::Cancelled, _) | (_, Delivery::Cancelled) => break,
            (Delivery::Abandoned, Delivery::Abandoned) => {
                debug!(component = COMPONENT, duplicated, "both outputs dropped, tee stopped");
                return;
            }
            _ => duplicated += 1,
        }
    }
    log_stage_exit(COMPONENT, &token, duplicated);
}
