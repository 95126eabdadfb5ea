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

//! Heartbeat executor configuration.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const COMPONENT: &str = "heartbeat";

pub const DEFAULT_PULSE_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing of a [`crate::HeartbeatExecutor`].
///
/// Serialized with millisecond fields:
///
/// ```json
/// { "pulse_interval_ms": 1000, "timeout_ms": 30000 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Period between liveness pulses.
    #[serde(rename = "pulse_interval_ms", with = "duration_ms")]
    pub pulse_interval: Duration,
    /// Hard deadline of the supervised computation.
    #[serde(rename = "timeout_ms", with = "duration_ms")]
    pub timeout: Duration,
}

impl HeartbeatConfig {
    pub fn new(pulse_interval: Duration, timeout: Duration) -> Self {
        Self {
            pulse_interval,
            timeout,
        }
    }

    /// How long the caller waits for either a heartbeat or the result before
    /// concluding the supervisor is stuck.
    pub fn wait_bound(&self) -> Duration {
        self.pulse_interval.saturating_mul(2)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.pulse_interval.is_zero() {
            return Err(PipelineError::invalid_argument(
                COMPONENT,
                "pulse_interval must be non-zero",
            ));
        }
        if self.timeout.is_zero() {
            return Err(PipelineError::invalid_argument(
                COMPONENT,
                "timeout must be non-zero",
            ));
        }
        Ok(())
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PULSE_INTERVAL, DEFAULT_TIMEOUT)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
