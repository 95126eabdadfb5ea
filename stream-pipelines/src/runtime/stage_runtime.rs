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

//! Runtime helper for spawning stage tasks.

use crate::error::PipelineError;
use crate::observability::events;
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, JoinSet};
use tracing::trace;

const COMPONENT: &str = "stage_runtime";

/// Executor a stage spawns its tasks on, captured at the call site.
#[derive(Clone, Debug)]
pub(crate) struct StageRuntime {
    handle: Handle,
}

impl StageRuntime {
    /// Captures the current runtime, or reports that `stage` was started outside one.
    pub(crate) fn acquire(stage: &'static str) -> Result<Self, PipelineError> {
        Handle::try_current()
            .map(|handle| Self { handle })
            .map_err(|_| PipelineError::NoRuntime { stage })
    }

    pub(crate) fn spawn<Fut>(&self, stage: &'static str, task: Fut) -> JoinHandle<()>
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        trace!(
            event = events::STAGE_SPAWNED,
            component = COMPONENT,
            stage,
            "spawning stage task"
        );
        self.handle.spawn(task)
    }

    /// Spawns a task whose output is collected through `set`.
    pub(crate) fn spawn_joined<Fut>(
        &self,
        stage: &'static str,
        set: &mut JoinSet<Fut::Output>,
        task: Fut,
    ) where
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
    {
        trace!(
            event = events::STAGE_SPAWNED,
            component = COMPONENT,
            stage,
            "spawning joined stage task"
        );
        set.spawn_on(task, &self.handle);
    }
}
