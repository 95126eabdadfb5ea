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

//! Shared helpers for exercising stream pipelines in tests.
//!
//! Every wait is bounded so a stage that forgets to close its output fails the
//! test instead of hanging it.

use futures::future::join_all;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Once;
use std::time::Duration;
use stream_pipelines::Stream;
use tracing_subscriber::EnvFilter;

/// Upper bound for any single wait in a test.
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Installs a `RUST_LOG`-driven fmt subscriber once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Receives every item until `stream` closes.
///
/// Panics if the stream is still open after [`TEST_DEADLINE`].
pub async fn collect<T>(stream: &Stream<T>) -> Vec<T> {
    tokio::time::timeout(TEST_DEADLINE, async {
        let mut items = Vec::new();
        while let Some(item) = stream.recv().await {
            items.push(item);
        }
        items
    })
    .await
    .unwrap_or_else(|_| panic!("stream did not close within {TEST_DEADLINE:?}"))
}

/// Counts the items of `stream` until it closes.
pub async fn count<T>(stream: &Stream<T>) -> usize {
    collect(stream).await.len()
}

/// Drains every stream concurrently and returns the per-stream item counts.
///
/// Streams that depend on each other being read, like the outputs of a tee,
/// must be drained this way.
pub async fn count_concurrently<T>(streams: &[Stream<T>]) -> Vec<usize> {
    join_all(streams.iter().map(count)).await
}

/// Asserts that `actual` holds the same items as `expected`, ignoring order.
pub fn assert_same_multiset<T>(actual: &[T], expected: &[T])
where
    T: Eq + Hash + Debug,
{
    assert_eq!(
        occurrences(actual),
        occurrences(expected),
        "items differ: actual {actual:?}, expected {expected:?}"
    );
}

fn occurrences<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Asserts that `stream` reports end-of-stream within [`TEST_DEADLINE`]
/// without yielding another item.
pub async fn assert_closed<T: Debug>(stream: &Stream<T>) {
    let next = tokio::time::timeout(TEST_DEADLINE, stream.recv())
        .await
        .unwrap_or_else(|_| panic!("stream did not close within {TEST_DEADLINE:?}"));
    assert!(next.is_none(), "expected a closed stream, received {next:?}");
}
