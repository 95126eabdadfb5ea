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

//! Supervision layer.
//!
//! Runs one long computation under a liveness heartbeat and two independent
//! bounds: a hard deadline on the computation itself (`timeout`) and a caller-side
//! wait bound of twice the pulse interval for "no heartbeat and no result".
//!
//! ```
//! use std::time::Duration;
//! use stream_pipelines::{HeartbeatConfig, HeartbeatExecutor};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let executor = HeartbeatExecutor::new(HeartbeatConfig::new(
//!     Duration::from_millis(20),
//!     Duration::from_secs(5),
//! ));
//!
//! let answer = executor
//!     .run(&CancellationToken::new(), |_token| async {
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!         42
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(answer, 42);
//! # });
//! ```

pub(crate) mod config;
pub(crate) mod heartbeat;
