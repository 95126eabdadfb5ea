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

//! Stream sources.
//!
//! Producers that feed pipelines: a bounded generator over an in-memory sequence
//! and a single-shot asynchronous request wrapper. Both honor the same
//! cancellation convention as the stages they feed.

pub(crate) mod generator;
pub(crate) mod request;
