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

//! Heartbeat-monitored execution of a single long-running computation.

use crate::error::PipelineError;
use crate::observability::events;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream, StreamWriter};
use crate::supervision::config::HeartbeatConfig;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

const COMPONENT: &str = "heartbeat";

/// Payload-less liveness pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heartbeat;

/// Why [`HeartbeatExecutor::run`] returned without a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeartbeatError {
    /// The executor was started with arguments it cannot run with.
    InvalidArgument(PipelineError),
    /// Nothing arrived within the wait bound, or the computation hit its deadline.
    TimedOut,
    /// The heartbeat channel closed before a result was produced.
    HeartbeatChannelClosed,
    /// The results channel closed without producing a result.
    ResultsChannelClosed,
    /// The caller's token fired while waiting.
    Cancelled,
}

impl Display for HeartbeatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HeartbeatError::InvalidArgument(err) => write!(f, "{err}"),
            HeartbeatError::TimedOut => write!(f, "heartbeat: work timed out"),
            HeartbeatError::HeartbeatChannelClosed => {
                write!(f, "heartbeat: heartbeat channel closed before a result")
            }
            HeartbeatError::ResultsChannelClosed => {
                write!(f, "heartbeat: results channel closed before a result")
            }
            HeartbeatError::Cancelled => write!(f, "heartbeat: cancelled while waiting"),
        }
    }
}

impl Error for HeartbeatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HeartbeatError::InvalidArgument(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PipelineError> for HeartbeatError {
    fn from(err: PipelineError) -> Self {
        HeartbeatError::InvalidArgument(err)
    }
}

/// Streams of a running supervisor.
///
/// Dropping the handle cancels the computation.
pub struct HeartbeatHandle<R: 'static> {
    heartbeats: Stream<Heartbeat>,
    results: Stream<R>,
    work_token: CancellationToken,
    deadline_expired: Arc<AtomicBool>,
}

impl<R: 'static> HeartbeatHandle<R> {
    /// Pulses emitted while the computation runs. Closes when the supervisor stops.
    pub fn heartbeats(&self) -> &Stream<Heartbeat> {
        &self.heartbeats
    }

    /// Yields the computation's result at most once, then closes.
    pub fn results(&self) -> &Stream<R> {
        &self.results
    }

    /// Returns `true` once the computation was cancelled by its deadline.
    pub fn deadline_expired(&self) -> bool {
        self.deadline_expired.load(Ordering::Acquire)
    }

    /// Stops the computation and the supervisor.
    pub fn cancel(&self) {
        self.work_token.cancel();
    }

    fn closed_early(&self, caller: &CancellationToken, closed: HeartbeatError) -> HeartbeatError {
        if caller.is_cancelled() {
            HeartbeatError::Cancelled
        } else if self.deadline_expired() {
            HeartbeatError::TimedOut
        } else {
            closed
        }
    }
}

impl<R: 'static> Drop for HeartbeatHandle<R> {
    fn drop(&mut self) {
        self.work_token.cancel();
    }
}

/// Runs computations under a heartbeat supervisor.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeartbeatExecutor {
    config: HeartbeatConfig,
}

impl HeartbeatExecutor {
    pub fn new(config: HeartbeatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HeartbeatConfig {
        &self.config
    }

    /// Starts `work` on its own task and returns the heartbeat and result streams.
    ///
    /// `work` receives a child of `token` that is also cancelled once the
    /// configured timeout elapses. Pulses are offered every `pulse_interval`
    /// without blocking; a pulse nobody is ready to take is dropped.
    pub fn start<R, W, Fut>(
        &self,
        token: &CancellationToken,
        work: W,
    ) -> Result<HeartbeatHandle<R>, PipelineError>
    where
        R: Send + 'static,
        W: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        self.config.validate()?;
        let runtime = StageRuntime::acquire(COMPONENT)?;

        let work_token = token.child_token();
        let deadline_expired = Arc::new(AtomicBool::new(false));
        let (heartbeat_writer, heartbeats) = channel();
        let (result_writer, results) = channel();
        let (work_writer, work_results) = channel();

        // Ticks are anchored before the work starts, so work lasting n intervals
        // overlaps exactly n ticks.
        let mut pulse = tokio::time::interval_at(
            Instant::now() + self.config.pulse_interval,
            self.config.pulse_interval,
        );
        pulse.set_missed_tick_behavior(MissedTickBehavior::Delay);

        runtime.spawn(
            COMPONENT,
            enforce_deadline(
                work_token.clone(),
                self.config.timeout,
                deadline_expired.clone(),
            ),
        );

        let computation_token = work_token.clone();
        runtime.spawn(COMPONENT, async move {
            let value = tokio::select! {
                biased;
                _ = computation_token.cancelled() => None,
                value = work(computation_token.clone()) => Some(value),
            };
            if let Some(value) = value {
                work_writer.send_or_cancel(&computation_token, value).await;
            }
        });

        runtime.spawn(
            COMPONENT,
            supervise(
                work_token.clone(),
                pulse,
                work_results,
                heartbeat_writer,
                result_writer,
            ),
        );

        Ok(HeartbeatHandle {
            heartbeats,
            results,
            work_token,
            deadline_expired,
        })
    }

    /// Starts `work` and waits for its result.
    ///
    /// Every heartbeat restarts the wait; the wait gives up with
    /// [`HeartbeatError::TimedOut`] after twice the pulse interval without a
    /// heartbeat or a result. Argument problems are reported before any task
    /// is spawned.
    pub async fn run<R, W, Fut>(
        &self,
        token: &CancellationToken,
        work: W,
    ) -> Result<R, HeartbeatError>
    where
        R: Send + 'static,
        W: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let handle = self.start(token, work)?;
        let wait_bound = self.config.wait_bound();

        loop {
            tokio::select! {
                biased;
                result = handle.results().recv() => {
                    return match result {
                        Some(value) => Ok(value),
                        None => Err(report_closed(
                            handle.closed_early(token, HeartbeatError::ResultsChannelClosed),
                        )),
                    };
                }
                pulse = handle.heartbeats().recv() => {
                    if pulse.is_none() {
                        return Err(report_closed(
                            handle.closed_early(token, HeartbeatError::HeartbeatChannelClosed),
                        ));
                    }
                }
                _ = tokio::time::sleep(wait_bound) => {
                    warn!(
                        event = events::HEARTBEAT_WAIT_TIMED_OUT,
                        component = COMPONENT,
                        wait_bound_ms = millis(wait_bound),
                        "no heartbeat or result within the wait bound"
                    );
                    return Err(HeartbeatError::TimedOut);
                }
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn report_closed(err: HeartbeatError) -> HeartbeatError {
    debug!(
        event = events::HEARTBEAT_CHANNEL_CLOSED,
        component = COMPONENT,
        %err,
        "supervisor stopped before a result"
    );
    err
}

async fn enforce_deadline(token: CancellationToken, timeout: Duration, expired: Arc<AtomicBool>) {
    tokio::select! {
        biased;
        _ = token.cancelled() => {}
        _ = tokio::time::sleep(timeout) => {
            warn!(
                event = events::HEARTBEAT_DEADLINE_EXPIRED,
                component = COMPONENT,
                timeout_ms = millis(timeout),
                "work deadline expired, cancelling"
            );
            expired.store(true, Ordering::Release);
            token.cancel();
        }
    }
}

async fn supervise<R>(
    token: CancellationToken,
    mut pulse: Interval,
    work_results: Stream<R>,
    heartbeats: StreamWriter<Heartbeat>,
    results: StreamWriter<R>,
) {
    let _release = token.clone().drop_guard();

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = pulse.tick() => send_pulse(&heartbeats),
            value = work_results.recv() => {
                if let Some(value) = value {
                    debug!(event = events::HEARTBEAT_WORK_COMPLETE, component = COMPONENT, "work complete");
                    deliver_result(&token, &mut pulse, &heartbeats, &results, value).await;
                }
                break;
            }
        }
    }
}

/// Offers the result while continuing to pulse, so a consumer that is only
/// listening for heartbeats right now still sees liveness.
async fn deliver_result<R>(
    token: &CancellationToken,
    pulse: &mut Interval,
    heartbeats: &StreamWriter<Heartbeat>,
    results: &StreamWriter<R>,
    value: R,
) {
    let delivery = results.send_or_cancel(token, value);
    tokio::pin!(delivery);

    loop {
        tokio::select! {
            biased;
            outcome = &mut delivery => {
                if outcome != Delivery::Delivered {
                    debug!(component = COMPONENT, ?outcome, "result was not delivered");
                }
                return;
            }
            _ = pulse.tick() => send_pulse(heartbeats),
        }
    }
}

fn send_pulse(heartbeats: &StreamWriter<Heartbeat>) {
    if heartbeats.try_send(Heartbeat) {
        trace!(event = events::HEARTBEAT_PULSE, component = COMPONENT, "pulse");
    } else {
        trace!(
            event = events::HEARTBEAT_PULSE_DROPPED,
            component = COMPONENT,
            "nobody waiting for a heartbeat, pulse dropped"
        );
    }
}
