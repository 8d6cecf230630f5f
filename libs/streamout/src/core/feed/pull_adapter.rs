// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::FeedBuffer;
use crate::core::pipeline::{ChunkSink, NeedDataFn};

/// Answers the pipeline's demand signal with at most one chunk from the feed.
pub struct PullAdapter {
    feed: Arc<FeedBuffer>,
    sink: Arc<dyn ChunkSink>,
    max_chunk: usize,
    /// Held from dequeue through push so chunks reach the sink in feed
    /// order. This is the one lock held across a sink call; it is only
    /// ever try-locked, so a sink that signals demand again from inside
    /// `push_chunk` gets a no-op instead of a deadlock. The feed's own
    /// lock is released before the push.
    delivery: Mutex<()>,
    chunks_delivered: AtomicU64,
    bytes_delivered: AtomicU64,
    chunks_dropped: AtomicU64,
}

impl PullAdapter {
    pub fn new(feed: Arc<FeedBuffer>, sink: Arc<dyn ChunkSink>, max_chunk: usize) -> Self {
        Self {
            feed,
            sink,
            max_chunk: max_chunk.max(1),
            delivery: Mutex::new(()),
            chunks_delivered: AtomicU64::new(0),
            bytes_delivered: AtomicU64::new(0),
            chunks_dropped: AtomicU64::new(0),
        }
    }

    pub fn feed(&self) -> &Arc<FeedBuffer> {
        &self.feed
    }

    /// Handle one demand signal. Returns the number of bytes forwarded.
    ///
    /// The size hint is advisory; chunk size is capped by `max_chunk` and
    /// by the oldest pending `put`. An empty feed is a no-op, and so is
    /// demand that arrives while another delivery is in flight.
    pub fn on_demand(&self, requested: usize) -> usize {
        let Some(_delivery) = self.delivery.try_lock() else {
            tracing::trace!(feed = self.feed.name(), requested, "Delivery in flight, skipping demand");
            return 0;
        };

        let Some(chunk) = self.feed.take_chunk(self.max_chunk) else {
            tracing::trace!(feed = self.feed.name(), requested, "Demand with empty feed");
            return 0;
        };

        let len = chunk.len();
        match self.sink.push_chunk(chunk) {
            Ok(()) => {
                self.chunks_delivered.fetch_add(1, Ordering::Relaxed);
                self.bytes_delivered.fetch_add(len as u64, Ordering::Relaxed);
                tracing::trace!(feed = self.feed.name(), requested, len, "Chunk forwarded");
                len
            }
            Err(e) => {
                self.chunks_dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(feed = self.feed.name(), len, "Dropping chunk: {}", e);
                0
            }
        }
    }

    /// Demand callback for [`MediaPipeline::connect_need_data`](crate::core::pipeline::MediaPipeline::connect_need_data).
    ///
    /// Holds the adapter weakly so the pipeline does not keep it alive.
    pub fn need_data_callback(self: &Arc<Self>) -> NeedDataFn {
        let adapter: Weak<Self> = Arc::downgrade(self);
        Arc::new(move |requested| {
            if let Some(adapter) = adapter.upgrade() {
                adapter.on_demand(requested);
            }
        })
    }

    pub fn chunks_delivered(&self) -> u64 {
        self.chunks_delivered.load(Ordering::Relaxed)
    }

    pub fn bytes_delivered(&self) -> u64 {
        self.bytes_delivered.load(Ordering::Relaxed)
    }

    pub fn chunks_dropped(&self) -> u64 {
        self.chunks_dropped.load(Ordering::Relaxed)
    }
}
