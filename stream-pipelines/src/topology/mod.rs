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

//! Multi-stream topology layer.
//!
//! Owns the stages that change the number of streams: fan-out over a worker pool,
//! fan-in of a dynamically discovered set of streams, tee duplication and the
//! static combine merge. Ordering is only preserved where a single task owns the
//! whole path; anything that crosses parallel workers interleaves freely.
//!
//! ```
//! use futures::StreamExt;
//! use stream_pipelines::{fan_in, fan_out, from_iter};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let token = CancellationToken::new();
//! let source = from_iter(&token, 1..=6).unwrap();
//! let workers = fan_out(&token, source, 3, |_token, n: u32| n * n).unwrap();
//!
//! let mut squares: Vec<u32> = fan_in(&token, workers).unwrap().collect().await;
//! squares.sort_unstable();
//! assert_eq!(squares, vec![1, 4, 9, 16, 25, 36]);
//! # });
//! ```

pub(crate) mod combine;
pub(crate) mod fan_in;
pub(crate) mod fan_out;
pub(crate) mod tee;
