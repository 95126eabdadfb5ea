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

//! Single-shot asynchronous request wrapped as a one-item stream.

use crate::error::{BoxError, PipelineError};
use crate::observability::events;
use crate::runtime::stage_runtime::StageRuntime;
use crate::stream::{channel, Delivery, Stream};
use async_trait::async_trait;
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const COMPONENT: &str = "request_async";

/// Transport seam for [`request_async`], e.g. an HTTP client.
#[async_trait]
pub trait RequestClient<Req>: Send + Sync {
    type Response: Send;

    async fn execute(&self, request: Req) -> Result<Self::Response, BoxError>;
}

/// Why a request produced no value.
pub enum RequestError {
    /// The token fired before the response was decoded.
    Cancelled,
    /// Transport or decoding failure reported by the client or the decoder.
    Failed(BoxError),
}

impl Debug for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Cancelled => write!(f, "Cancelled"),
            RequestError::Failed(err) => write!(f, "Failed({err:?})"),
        }
    }
}

impl Display for RequestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Cancelled => write!(f, "request cancelled before completion"),
            RequestError::Failed(err) => write!(f, "request failed: {err}"),
        }
    }
}

impl Error for RequestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RequestError::Cancelled => None,
            RequestError::Failed(err) => Some(err.as_ref()),
        }
    }
}

pub type RequestOutcome<T> = Result<T, RequestError>;

/// Executes `request` on `client`, decodes the response with `decode` and emits
/// the single outcome before closing the stream.
///
/// When `token` fires first the outcome is [`RequestError::Cancelled`], offered
/// without blocking so an absent reader cannot keep the task alive.
pub fn request_async<Req, C, D, T>(
    token: &CancellationToken,
    client: Arc<C>,
    request: Req,
    decode: D,
) -> Result<Stream<RequestOutcome<T>>, PipelineError>
where
    Req: Send + 'static,
    C: RequestClient<Req> + ?Sized + 'static,
    D: FnOnce(Result<C::Response, BoxError>) -> Result<T, BoxError> + Send + 'static,
    T: Send + 'static,
{
    let runtime = StageRuntime::acquire(COMPONENT)?;
    let (writer, output) = channel();
    let token = token.clone();

    runtime.spawn(COMPONENT, async move {
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => Err(RequestError::Cancelled),
            response = client.execute(request) => decode(response).map_err(RequestError::Failed),
        };

        match &outcome {
            Ok(_) => debug!(event = events::REQUEST_COMPLETE, component = COMPONENT, "request decoded"),
            Err(err) => warn!(event = events::REQUEST_FAILED, component = COMPONENT, %err, "request produced no value"),
        }

        if token.is_cancelled() {
            if !writer.try_send(outcome) {
                debug!(component = COMPONENT, "nobody waiting for the cancelled outcome");
            }
        } else if writer.send_or_cancel(&token, outcome).await != Delivery::Delivered {
            debug!(component = COMPONENT, "request outcome was not received");
        }
    });

    Ok(output)
}
