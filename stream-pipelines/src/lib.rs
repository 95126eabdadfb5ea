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

//! # stream-pipelines
//!
//! `stream-pipelines` provides cancellation-aware building blocks for concurrent
//! stream processing on Tokio: pass-through, sequential workers, fan-out over a
//! worker pool, fan-in, tee, combine and a heartbeat-monitored executor for a
//! single long-running computation.
//!
//! Every stage takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and one or more [`Stream`]s, spawns its tasks on the current runtime and
//! returns its output streams immediately. Each output stream is closed exactly
//! once, either when the inputs are exhausted or when the token fires.
//!
//! ```
//! use futures::StreamExt;
//! use stream_pipelines::{combine, from_iter, tee};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let token = CancellationToken::new();
//! let (left, right) = tee(&token, from_iter(&token, ["hello", "bonjour"]).unwrap()).unwrap();
//! let greetings = combine(&token, vec![Some(left), None, Some(right)]).unwrap();
//!
//! let mut seen: Vec<_> = greetings.collect().await;
//! seen.sort_unstable();
//! assert_eq!(seen, vec!["bonjour", "bonjour", "hello", "hello"]);
//! # });
//! ```
//!
//! ## Contract violations
//!
//! Stages report misuse synchronously with [`PipelineError`] before any task is
//! spawned: starting outside a Tokio runtime, or handing the heartbeat executor
//! a zero interval. Failures that happen while data flows are values on the
//! streams, as with [`RequestOutcome`].
//!
//! ## Internal architecture map
//!
//! - Stream: bounded hand-off channel with a single write handle
//! - Runtime: runtime capture and stage task spawning
//! - Flow: pass-through and sequential worker stages
//! - Topology: fan-out, fan-in, tee and combine
//! - Sources: iterator generator and asynchronous request adapter
//! - Supervision: heartbeat executor and its configuration
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events/spans and does not unconditionally initialize a global
//! subscriber. Binaries and tests are responsible for one-time
//! `tracing_subscriber` initialization at process boundaries.

mod error;
pub use error::{BoxError, PipelineError};

pub mod stream;
pub use stream::{Delivery, Stream, StreamWriter};

#[doc(hidden)]
pub mod observability;
mod runtime;

mod flow;
pub use flow::or_done::or_done;
pub use flow::worker::{worker_stage, WorkerFunc};

mod topology;
pub use topology::combine::combine;
pub use topology::fan_in::fan_in;
pub use topology::fan_out::fan_out;
pub use topology::tee::tee;

mod sources;
pub use sources::generator::from_iter;
pub use sources::request::{request_async, RequestClient, RequestError, RequestOutcome};

mod supervision;
pub use supervision::config::HeartbeatConfig;
pub use supervision::heartbeat::{
    Heartbeat, HeartbeatError, HeartbeatExecutor, HeartbeatHandle,
};
