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

//! Synchronous contract violations raised before a stage starts any task.

use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

/// Boxed error used at the seams where callers plug in their own failures.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Caller-side misuse detected at the call site, never inside a background task.
#[derive(Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The stage was started outside a Tokio runtime, so there is nothing to spawn on.
    NoRuntime { stage: &'static str },
    /// A configuration value makes the stage impossible to run.
    InvalidArgument {
        stage: &'static str,
        reason: &'static str,
    },
}

impl PipelineError {
    pub(crate) fn invalid_argument(stage: &'static str, reason: &'static str) -> Self {
        PipelineError::InvalidArgument { stage, reason }
    }

    /// Name of the stage that rejected its arguments.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::NoRuntime { stage } => stage,
            PipelineError::InvalidArgument { stage, .. } => stage,
        }
    }
}

impl Debug for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NoRuntime { stage } => write!(f, "NoRuntime({stage})"),
            PipelineError::InvalidArgument { stage, reason } => {
                write!(f, "InvalidArgument({stage}: {reason})")
            }
        }
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NoRuntime { stage } => {
                write!(f, "{stage}: must be started from within a Tokio runtime")
            }
            PipelineError::InvalidArgument { stage, reason } => {
                write!(f, "{stage}: invalid argument, {reason}")
            }
        }
    }
}

impl Error for PipelineError {}
