// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Bounded byte ring with fail-fast writes.
//!
//! Key properties:
//! - Fixed capacity allocated once
//! - All-or-nothing writes (no partial `put`)
//! - Strict FIFO reads, never across a `put` boundary
//! - One lock guarding cursors and the accepting flag
//!
//! Both halves of the rtrb ring live under the same mutex so that clear,
//! statistics, and the accepting check observe a consistent view no
//! matter which thread calls them.

use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use rtrb::{Consumer, Producer, RingBuffer};
use serde::{Deserialize, Serialize};

use crate::core::{Result, StreamError};

/// Used/free byte counts at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedLevels {
    pub available: usize,
    pub free: usize,
    pub capacity: usize,
}

pub struct FeedBuffer {
    name: String,
    capacity: usize,
    state: Mutex<FeedState>,
}

struct FeedState {
    producer: Producer<u8>,
    consumer: Consumer<u8>,
    /// Lengths of the `put` calls still (partly) in the ring, oldest first.
    units: VecDeque<usize>,
    accepting: bool,
}

impl FeedBuffer {
    pub fn new(name: impl Into<String>, capacity: usize) -> Result<Self> {
        let name = name.into();
        if capacity == 0 {
            return Err(StreamError::Configuration(format!(
                "{name} feed buffer capacity must be greater than zero"
            )));
        }

        // rtrb aborts on allocation failure, so check the size first.
        let mut reserve = Vec::<u8>::new();
        reserve.try_reserve_exact(capacity).map_err(|e| {
            tracing::error!(feed = %name, capacity, "Feed buffer allocation failed: {}", e);
            StreamError::Allocation(format!("{name} feed buffer of {capacity} bytes: {e}"))
        })?;
        drop(reserve);

        let (producer, consumer) = RingBuffer::new(capacity);
        tracing::debug!(feed = %name, capacity, "Feed buffer allocated");

        Ok(Self {
            name,
            capacity,
            state: Mutex::new(FeedState {
                producer,
                consumer,
                units: VecDeque::new(),
                accepting: false,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Gate writes; a buffer that is not accepting rejects every `put`.
    pub fn set_accepting(&self, accepting: bool) {
        self.state.lock().accepting = accepting;
    }

    pub fn is_accepting(&self) -> bool {
        self.state.lock().accepting
    }

    /// Append `data` in full or not at all.
    pub fn put(&self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();

        if !state.accepting {
            return Err(StreamError::NotPlaying(self.name.clone()));
        }

        let free = state.producer.slots();
        if data.len() > free {
            return Err(StreamError::BufferFull {
                requested: data.len(),
                free,
            });
        }
        if data.is_empty() {
            return Ok(());
        }

        let chunk = state
            .producer
            .write_chunk_uninit(data.len())
            .map_err(|_| StreamError::BufferFull {
                requested: data.len(),
                free,
            })?;
        let written = chunk.fill_from_iter(data.iter().copied());
        debug_assert_eq!(written, data.len());

        state.units.push_back(written);
        Ok(())
    }

    /// Dequeue up to `max` bytes from the oldest `put`.
    ///
    /// Never blocks; returns `None` when the ring is empty.
    pub fn take_chunk(&self, max: usize) -> Option<Bytes> {
        let mut state = self.state.lock();

        let unit = *state.units.front()?;
        let len = unit.min(max).min(state.consumer.slots());
        if len == 0 {
            return None;
        }

        let chunk = state.consumer.read_chunk(len).ok()?;
        let (first, second) = chunk.as_slices();
        let mut out = BytesMut::with_capacity(len);
        out.extend_from_slice(first);
        out.extend_from_slice(second);
        chunk.commit_all();

        if len == unit {
            state.units.pop_front();
        } else if let Some(front) = state.units.front_mut() {
            *front -= len;
        }

        Some(out.freeze())
    }

    /// Discard everything buffered. Capacity is unchanged.
    pub fn clear(&self) {
        let mut state = self.state.lock();

        let pending = state.consumer.slots();
        if let Ok(chunk) = state.consumer.read_chunk(pending) {
            chunk.commit_all();
        }
        state.units.clear();

        if pending > 0 {
            tracing::debug!(feed = %self.name, discarded = pending, "Feed buffer cleared");
        }
    }

    pub fn available(&self) -> usize {
        self.state.lock().consumer.slots()
    }

    pub fn free(&self) -> usize {
        self.state.lock().producer.slots()
    }

    pub fn levels(&self) -> FeedLevels {
        let state = self.state.lock();
        FeedLevels {
            available: state.consumer.slots(),
            free: state.producer.slots(),
            capacity: self.capacity,
        }
    }
}
