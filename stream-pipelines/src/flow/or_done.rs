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

//! Pass-through stage that unblocks both sides as soon as cancellation fires.

use crate::error::PipelineError;
use crate::flow::{log_stage_abandoned, log_stage_exit};
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream, StreamWriter};
use tokio_util::sync::CancellationToken;

const COMPONENT: &str = "or_done";

/// Relays every item of `input` to the returned stream, in order, until `input`
/// closes or `token` fires.
///
/// On cancellation the output closes right away and an item caught between
/// receive and send is dropped. One forwarding task is spawned per call.
pub fn or_done<T>(token: &CancellationToken, input: Stream<T>) -> Result<Stream<T>, PipelineError>
where
    T: Send + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    Ok(spawn_or_done(&runtime, token, input))
}

/// Infallible variant for stages that already hold a runtime.
pub(crate) fn spawn_or_done<T>(
    runtime: &StageRuntime,
    token: &CancellationToken,
    input: Stream<T>,
) -> Stream<T>
where
    T: Send + 'static,
{
    let (writer, output) = channel();
    runtime.spawn(COMPONENT, relay(token.clone(), input, writer));
    output
}

async fn relay<T>(token: CancellationToken, input: Stream<T>, output: StreamWriter<T>) {
    let mut relayed = 0usize;
    while let Some(item) = input.recv_or_cancel(&token).await {
        match output.send_or_cancel(&token, item).await {
            Delivery::Delivered => relayed += 1,
            Delivery::Cancelled => break,
            Delivery::Abandoned => {
                log_stage_abandoned(COMPONENT, relayed);
                return;
            }
        }
    }
    log_stage_exit(COMPONENT, &token, relayed);
}

#[cfg(test)]
mod tests {
    use super::or_done;
    use crate::sources::generator::from_iter;
    use crate::stream::channel;
    use futures::StreamExt;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test(flavor = "multi_thread")]
    async fn relays_every_item_in_order() {
        let token = CancellationToken::new();
        let list = vec!["something", "nother", "another"];

        let output = or_done(&token, from_iter(&token, list.clone()).unwrap()).unwrap();
        let got: Vec<_> = tokio::time::timeout(DEADLINE, output.collect())
            .await
            .expect("or_done closes its output");

        assert_eq!(got, list);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_input_yields_closed_empty_output() {
        let token = CancellationToken::new();
        let output = or_done(&token, from_iter(&token, Vec::<u8>::new()).unwrap()).unwrap();

        let got: Vec<u8> = tokio::time::timeout(DEADLINE, output.collect())
            .await
            .expect("or_done closes its output");
        assert!(got.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancelling_before_start_yields_at_most_one_item() {
        let token = CancellationToken::new();
        let input = from_iter(&token, ["something", "nother", "another"]).unwrap();
        token.cancel();

        let output = or_done(&token, input).unwrap();
        let got: Vec<_> = tokio::time::timeout(DEADLINE, output.collect())
            .await
            .expect("cancelled or_done must close");
        assert!(got.len() < 2, "got {got:?}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_unblocks_a_silent_input() {
        let token = CancellationToken::new();
        let (_writer, silent) = channel::<u32>();
        let output = or_done(&token, silent).unwrap();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let next = tokio::time::timeout(DEADLINE, output.recv())
            .await
            .expect("or_done must close after cancellation");
        assert_eq!(next, None);
    }
}
