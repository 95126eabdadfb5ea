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

//! Stable `tracing` event names shared by every stage.
//!
//! Events are emitted as `event = events::NAME` fields so log scrapers can match
//! on them without depending on the free-form message text.

pub mod events {
    pub const STAGE_SPAWNED: &str = "stage_spawned";
    pub const STAGE_STARTED: &str = "stage_started";
    pub const STAGE_CLOSED: &str = "stage_closed";
    pub const STAGE_CANCELLED: &str = "stage_cancelled";
    pub const STAGE_ABANDONED: &str = "stage_abandoned";

    pub const FAN_OUT_WORKER_EMITTED: &str = "fan_out_worker_emitted";
    pub const FAN_IN_SOURCE_ADDED: &str = "fan_in_source_added";
    pub const COMBINE_RELAY_FINISHED: &str = "combine_relay_finished";

    pub const HEARTBEAT_PULSE: &str = "heartbeat_pulse";
    pub const HEARTBEAT_PULSE_DROPPED: &str = "heartbeat_pulse_dropped";
    pub const HEARTBEAT_WORK_COMPLETE: &str = "heartbeat_work_complete";
    pub const HEARTBEAT_DEADLINE_EXPIRED: &str = "heartbeat_deadline_expired";
    pub const HEARTBEAT_WAIT_TIMED_OUT: &str = "heartbeat_wait_timed_out";
    pub const HEARTBEAT_CHANNEL_CLOSED: &str = "heartbeat_channel_closed";

    pub const REQUEST_COMPLETE: &str = "request_complete";
    pub const REQUEST_FAILED: &str = "request_failed";
}
