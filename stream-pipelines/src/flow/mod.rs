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

//! Single-stream flow layer.
//!
//! Owns the two one-in/one-out stages every topology is assembled from: the
//! cancellation-aware pass-through and the sequential worker stage. Both run one
//! task per call and close their output exactly once, on input exhaustion or on
//! cancellation.
//!
//! ```
//! use futures::StreamExt;
//! use stream_pipelines::{from_iter, or_done, worker_stage};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let token = CancellationToken::new();
//! let words = from_iter(&token, ["left", "right"]).unwrap();
//! let lengths = worker_stage(&token, or_done(&token, words).unwrap(), |_token, word| {
//!     word.len()
//! })
//! .unwrap();
//!
//! assert_eq!(lengths.collect::<Vec<_>>().await, vec![4, 5]);
//! # });
//! ```

use crate::observability::events;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub(crate) mod or_done;
pub(crate) mod worker;

/// Logs how a stage task ended: by cancellation or by its input closing.
pub(crate) fn log_stage_exit(component: &'static str, token: &CancellationToken, items: usize) {
    if token.is_cancelled() {
        debug!(
            event = events::STAGE_CANCELLED,
            component, items, "stage stopped on cancellation"
        );
    } else {
        debug!(
            event = events::STAGE_CLOSED,
            component, items, "stage input exhausted, output closed"
        );
    }
}

/// Logs that a stage stopped because nobody reads its output anymore.
pub(crate) fn log_stage_abandoned(component: &'static str, items: usize) {
    debug!(
        event = events::STAGE_ABANDONED,
        component, items, "output consumers are gone, stage stopped"
    );
}
