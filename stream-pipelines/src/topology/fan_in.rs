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

//! Fan-in of a dynamically discovered set of streams into one.

use crate::error::PipelineError;
use crate::flow::or_done::spawn_or_done;
use crate::flow::{log_stage_abandoned, log_stage_exit};
use crate::observability::events;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream, StreamWriter};
use futures::stream::SelectAll;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::trace;

const COMPONENT: &str = "fan_in";

/// Merges every stream received on `streams` into one output stream.
///
/// All currently open inner streams are polled together, so an item waiting in a
/// later stream is never stuck behind a long earlier one. There is no ordering
/// across sources. The output closes once `streams` has closed and every inner
/// stream it yielded has closed, or as soon as `token` fires.
pub fn fan_in<T>(
    token: &CancellationToken,
    streams: Stream<Stream<T>>,
) -> Result<Stream<T>, PipelineError>
where
    T: Send + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    let (writer, output) = channel();
    runtime.spawn(
        COMPONENT,
        merge(runtime.clone(), token.clone(), streams, writer),
    );
    Ok(output)
}

async fn merge<T>(
    runtime: StageRuntime,
    token: CancellationToken,
    streams: Stream<Stream<T>>,
    output: StreamWriter<T>,
) where
    T: Send + 'static,
{
    let mut active: SelectAll<Stream<T>> = SelectAll::new();
    let mut discovering = true;
    let mut merged = 0usize;

    loop {
        if !discovering && active.is_empty() {
            break;
        }

        let item = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            inner = streams.recv(), if discovering => {
                match inner {
                    Some(inner) => {
                        active.push(spawn_or_done(&runtime, &token, inner));
                        trace!(
                            event = events::FAN_IN_SOURCE_ADDED,
                            component = COMPONENT,
                            active = active.len(),
                            "inner stream joined the merge"
                        );
                    }
                    None => discovering = false,
                }
                continue;
            }
            Some(item) = active.next(), if !active.is_empty() => item,
            else => break,
        };

        match output.send_or_cancel(&token, item).await {
            Delivery::Delivered => merged += 1,
            Delivery::Cancelled => break,
            Delivery::Abandoned => {
                log_stage_abandoned(COMPONENT, merged);
                return;
            }
        }
    }

    log_stage_exit(COMPONENT, &token, merged);
}

#[cfg(test)]
mod tests {
    use super::fan_in;
    use crate::sources::generator::from_iter;
    use crate::stream::{channel, Delivery};
    use crate::topology::fan_out::fan_out;
    use futures::StreamExt;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const DEADLINE: Duration = Duration::from_secs(5);

    fn echo(_token: &CancellationToken, item: &'static str) -> &'static str {
        item
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn single_worker_round_trip_closes() {
        let token = CancellationToken::new();
        let workers = fan_out(&token, from_iter(&token, ["thing"]).unwrap(), 1, echo).unwrap();

        let got: Vec<_> = tokio::time::timeout(DEADLINE, fan_in(&token, workers).unwrap().collect())
            .await
            .expect("fan_in closes");
        assert_eq!(got, vec!["thing"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn more_workers_than_items_still_delivers_each_item_once() {
        let token = CancellationToken::new();
        let workers = fan_out(&token, from_iter(&token, ["single"]).unwrap(), 5, echo).unwrap();

        let got: Vec<_> = tokio::time::timeout(DEADLINE, fan_in(&token, workers).unwrap().collect())
            .await
            .expect("fan_in closes");
        assert_eq!(got, vec!["single"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn interleaves_open_streams_instead_of_draining_one_first() {
        let token = CancellationToken::new();
        let (outer_writer, outer) = channel();
        let (slow_writer, slow) = channel::<&str>();
        let (fast_writer, fast) = channel::<&str>();

        let merged = fan_in(&token, outer).unwrap();
        assert_eq!(outer_writer.send_or_cancel(&token, slow).await, Delivery::Delivered);
        assert_eq!(outer_writer.send_or_cancel(&token, fast).await, Delivery::Delivered);

        // The first stream stays open and silent; the second must still get through.
        assert_eq!(fast_writer.send_or_cancel(&token, "fast").await, Delivery::Delivered);
        let first = tokio::time::timeout(DEADLINE, merged.recv())
            .await
            .expect("item from the second stream is not starved");
        assert_eq!(first, Some("fast"));

        drop(fast_writer);
        drop(outer_writer);
        assert_eq!(slow_writer.send_or_cancel(&token, "slow").await, Delivery::Delivered);
        drop(slow_writer);

        let rest: Vec<_> = tokio::time::timeout(DEADLINE, merged.collect())
            .await
            .expect("fan_in closes once every source closed");
        assert_eq!(rest, vec!["slow"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn output_stays_open_while_an_inner_stream_is_open() {
        let token = CancellationToken::new();
        let (outer_writer, outer) = channel();
        let (inner_writer, inner) = channel::<u8>();

        let merged = fan_in(&token, outer).unwrap();
        outer_writer.send_or_cancel(&token, inner).await;
        drop(outer_writer);

        let early = tokio::time::timeout(Duration::from_millis(50), merged.recv()).await;
        assert!(early.is_err(), "output closed before its inner stream");

        drop(inner_writer);
        let next = tokio::time::timeout(DEADLINE, merged.recv())
            .await
            .expect("fan_in closes");
        assert_eq!(next, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_closes_the_output_with_sources_still_open() {
        let token = CancellationToken::new();
        let (outer_writer, outer) = channel::<crate::stream::Stream<u8>>();
        let merged = fan_in(&token, outer).unwrap();

        token.cancel();
        let next = tokio::time::timeout(DEADLINE, merged.recv())
            .await
            .expect("cancelled fan_in closes");
        assert_eq!(next, None);
        drop(outer_writer);
    }
}
