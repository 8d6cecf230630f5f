// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use super::StreamOutput;
use super::engine::OutputStatistics;
use crate::core::Result;
use crate::core::pipeline::{PipelineMessage, StreamKind, log_pipeline_message};

/// Statistics are logged once every this many ticks.
const STATISTICS_EVERY_TICKS: u64 = 50;

/// Background thread that drains pipeline buses and logs statistics.
pub(crate) struct Housekeeping {
    stop_tx: Sender<()>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
    stop_timeout: Duration,
}

impl Housekeeping {
    pub(crate) fn spawn(
        audio: Arc<StreamOutput>,
        video: Arc<StreamOutput>,
        interval: Duration,
        stop_timeout: Duration,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

        let buses: Vec<(StreamKind, Receiver<PipelineMessage>)> = [&audio, &video]
            .iter()
            .filter_map(|output| output.pipeline().bus().map(|bus| (output.kind(), bus)))
            .collect();

        let handle = thread::Builder::new()
            .name("streamout-housekeeping".to_string())
            .spawn(move || {
                tracing::debug!(?interval, "Housekeeping thread started");
                let mut ticks: u64 = 0;

                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }

                    for (kind, bus) in &buses {
                        for message in bus.try_iter() {
                            log_pipeline_message(*kind, &message);
                        }
                    }

                    ticks += 1;
                    if ticks % STATISTICS_EVERY_TICKS == 0 {
                        let stats = OutputStatistics {
                            audio: audio.statistics(),
                            video: video.statistics(),
                        };
                        for line in stats.to_string().lines() {
                            tracing::debug!("{}", line);
                        }
                    }
                }

                tracing::debug!("Housekeeping thread exiting");
                let _ = done_tx.send(());
            })?;

        Ok(Self {
            stop_tx,
            done_rx,
            handle: Some(handle),
            stop_timeout,
        })
    }

    /// Signal the thread and wait at most `stop_timeout` for it.
    pub(crate) fn stop(mut self) {
        let _ = self.stop_tx.try_send(());

        match self.done_rx.recv_timeout(self.stop_timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(handle) = self.handle.take() {
                    if handle.join().is_err() {
                        tracing::error!("Housekeeping thread panicked");
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    timeout_ms = self.stop_timeout.as_millis() as u64,
                    "Housekeeping thread did not stop in time, detaching"
                );
            }
        }
    }
}
