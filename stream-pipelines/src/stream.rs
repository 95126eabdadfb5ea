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

//! Closeable single-producer rendezvous streams.
//!
//! A [`Stream`] is the read side and a [`StreamWriter`] the single write side of
//! an unbuffered hand-off: a send completes only once a consumer has taken the
//! item. The stream closes when its writer is dropped; a receiver then observes
//! `None`.

use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio_util::sync::CancellationToken;

/// Zero capacity makes every hand-off a rendezvous.
const HAND_OFF_CAPACITY: usize = 0;

/// Creates a connected writer/stream pair.
pub fn channel<T: 'static>() -> (StreamWriter<T>, Stream<T>) {
    let (sender, receiver) = flume::bounded(HAND_OFF_CAPACITY);
    (
        StreamWriter { inner: sender },
        Stream {
            inner: receiver,
            polled: None,
        },
    )
}

/// Read handle of a stream.
///
/// Cloning yields a competing consumer: every item is received by exactly one
/// of the clones.
pub struct Stream<T: 'static> {
    inner: flume::Receiver<T>,
    polled: Option<Pin<Box<flume::r#async::RecvFut<'static, T>>>>,
}

impl<T: 'static> Stream<T> {
    /// Waits for the next item. `None` means the stream is closed and drained.
    pub async fn recv(&self) -> Option<T> {
        self.inner.recv_async().await.ok()
    }

    /// Waits for the next item unless `token` fires first.
    ///
    /// Cancellation wins when both are ready.
    pub async fn recv_or_cancel(&self, token: &CancellationToken) -> Option<T> {
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            item = self.recv() => item,
        }
    }

    /// Returns `true` once the writer is gone.
    pub fn is_closed(&self) -> bool {
        self.inner.is_disconnected()
    }

    /// Returns `true` if no item is ready to be taken without waiting.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: 'static> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            polled: None,
        }
    }
}

impl<T: 'static> futures::Stream for Stream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let this = self.get_mut();
        let inner = &this.inner;
        let pending = this
            .polled
            .get_or_insert_with(|| Box::pin(inner.clone().into_recv_async()));
        let received = ready!(pending.as_mut().poll(cx));
        this.polled = None;
        Poll::Ready(received.ok())
    }
}

impl<T: 'static> Debug for Stream<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Result of offering an item to a stream while racing cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// A consumer took the item.
    Delivered,
    /// The token fired before a consumer took the item; the item was dropped.
    Cancelled,
    /// Every consumer is gone; the item was dropped.
    Abandoned,
}

/// Write handle of a stream. There is exactly one per stream outside this crate.
pub struct StreamWriter<T> {
    inner: flume::Sender<T>,
}

impl<T> StreamWriter<T> {
    /// Offers `item` and waits until a consumer takes it or `token` fires.
    pub async fn send_or_cancel(&self, token: &CancellationToken, item: T) -> Delivery {
        tokio::select! {
            biased;
            _ = token.cancelled() => Delivery::Cancelled,
            sent = self.inner.send_async(item) => match sent {
                Ok(()) => Delivery::Delivered,
                Err(_) => Delivery::Abandoned,
            },
        }
    }

    /// Hands `item` to a consumer that is already waiting for it. Returns
    /// `false`, dropping the item, when nobody is receiving right now.
    pub fn try_send(&self, item: T) -> bool {
        self.inner.try_send(item).is_ok()
    }

    /// Returns `true` once every consumer has gone away.
    pub fn is_closed(&self) -> bool {
        self.inner.is_disconnected()
    }

    /// Second write handle for relays that jointly feed one stream. The stream
    /// only closes once every handle is dropped.
    pub(crate) fn share(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Debug for StreamWriter<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamWriter")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{channel, Delivery};
    use futures::StreamExt;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    const DEADLINE: Duration = Duration::from_secs(5);

    #[tokio::test(flavor = "multi_thread")]
    async fn dropping_the_writer_closes_the_stream() {
        let (writer, stream) = channel();
        tokio::spawn(async move {
            writer.send_or_cancel(&CancellationToken::new(), 7).await;
        });

        assert_eq!(tokio::time::timeout(DEADLINE, stream.recv()).await.unwrap(), Some(7));
        assert_eq!(tokio::time::timeout(DEADLINE, stream.recv()).await.unwrap(), None);
        assert!(stream.is_closed());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn send_waits_for_a_receiver() {
        let (writer, stream) = channel();
        let token = CancellationToken::new();

        let unreceived =
            tokio::time::timeout(Duration::from_millis(50), writer.send_or_cancel(&token, 1)).await;
        assert!(unreceived.is_err(), "send completed with nobody receiving");
        assert!(stream.is_empty());

        let (sent, received) = tokio::join!(writer.send_or_cancel(&token, 2), stream.recv());
        assert_eq!(sent, Delivery::Delivered);
        assert_eq!(received, Some(2));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn cancellation_wins_over_a_blocked_send() {
        let (writer, _stream) = channel();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = tokio::time::timeout(DEADLINE, writer.send_or_cancel(&token, 2))
            .await
            .expect("send must not block past cancellation");
        assert_eq!(outcome, Delivery::Cancelled);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn try_send_needs_a_waiting_receiver() {
        let (writer, stream) = channel();
        assert!(!writer.try_send(1));

        let receiving = tokio::spawn(async move { stream.recv().await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(writer.try_send(2));

        let received = tokio::time::timeout(DEADLINE, receiving)
            .await
            .expect("receiver wakes up")
            .expect("receiver task");
        assert_eq!(received, Some(2));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn send_reports_abandoned_when_every_consumer_is_gone() {
        let (writer, stream) = channel::<u8>();
        drop(stream);

        assert_eq!(
            writer.send_or_cancel(&CancellationToken::new(), 1).await,
            Delivery::Abandoned
        );
        assert!(writer.is_closed());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clones_compete_for_items() {
        let (writer, stream) = channel();
        let other = stream.clone();
        let token = CancellationToken::new();

        let producer = tokio::spawn(async move {
            for item in 0..4 {
                writer.send_or_cancel(&token, item).await;
            }
        });

        let mut seen = Vec::new();
        while let Some(item) = tokio::select! {
            a = stream.recv() => a,
            b = other.recv() => b,
        } {
            seen.push(item);
        }
        producer.await.expect("producer task");

        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stream_trait_collects_until_close() {
        let (writer, stream) = channel();
        tokio::spawn(async move {
            let token = CancellationToken::new();
            for word in ["a", "b"] {
                writer.send_or_cancel(&token, word).await;
            }
        });

        let collected: Vec<_> = tokio::time::timeout(DEADLINE, stream.collect())
            .await
            .expect("stream closes");
        assert_eq!(collected, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn recv_or_cancel_returns_none_once_cancelled() {
        let (_writer, stream) = channel::<u8>();
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(stream.recv_or_cancel(&token).await, None);
    }
}
