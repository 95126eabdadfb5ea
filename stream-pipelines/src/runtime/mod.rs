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

//! Runtime integration layer.
//!
//! Isolates task spawning so every stage acquires its executor up front and fails
//! synchronously when there is none, instead of panicking inside `tokio::spawn`.
//!
//! ```
//! use stream_pipelines::{or_done, stream, PipelineError};
//! use tokio_util::sync::CancellationToken;
//!
//! // Outside a runtime there is nothing to spawn on: the call fails at the call site.
//! let (_writer, input) = stream::channel::<u32>();
//! let err = or_done(&CancellationToken::new(), input).unwrap_err();
//! assert_eq!(err, PipelineError::NoRuntime { stage: "or_done" });
//! ```

pub(crate) mod stage_runtime;
