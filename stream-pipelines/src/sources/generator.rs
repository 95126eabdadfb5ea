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

//! Bounded generator over an in-memory sequence.

use crate::error::PipelineError;
use crate::flow::{log_stage_abandoned, log_stage_exit};
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream};
use tokio_util::sync::CancellationToken;

const COMPONENT: &str = "generator";

/// Emits `items` in order and closes the stream once they run out or `token` fires.
pub fn from_iter<I>(token: &CancellationToken, items: I) -> Result<Stream<I::Item>, PipelineError>
where
    I: IntoIterator,
    I::IntoIter: Send + 'static,
    I::Item: Send + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    let (writer, output) = channel();
    let token = token.clone();
    let items = items.into_iter();

    runtime.spawn(COMPONENT, async move {
        let mut emitted = 0usize;
        for item in items {
            match writer.send_or_cancel(&token, item).await {
                Delivery::Delivered => emitted += 1,
                Delivery::Cancelled => break,
                Delivery::Abandoned => {
                    log_stage_abandoned(COMPONENT, emitted);
                    return;
                }
            }
        }
        log_stage_exit(COMPONENT, &token, emitted);
    });

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::from_iter;
    use futures::StreamExt;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test(flavor = "multi_thread")]
    async fn emits_items_in_order_then_closes() {
        let token = CancellationToken::new();
        let list = vec!["hello", "and", "welcome"];

        let stream = from_iter(&token, list.clone()).unwrap();
        let got: Vec<_> = tokio::time::timeout(DEADLINE, stream.collect())
            .await
            .expect("generator closes its stream");
        assert_eq!(got, list);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_sequence_closes_immediately() {
        let token = CancellationToken::new();
        let stream = from_iter(&token, Vec::<u8>::new()).unwrap();

        let next = tokio::time::timeout(DEADLINE, stream.recv())
            .await
            .expect("generator closes its stream");
        assert_eq!(next, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_truncates_the_sequence() {
        let token = CancellationToken::new();
        let stream = from_iter(&token, 0..1_000).unwrap();

        assert_eq!(stream.recv().await, Some(0));
        token.cancel();

        let rest: Vec<_> = tokio::time::timeout(DEADLINE, stream.collect())
            .await
            .expect("generator closes after cancellation");
        assert!(rest.len() <= 1, "got {rest:?}");
    }
}
