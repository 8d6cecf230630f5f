// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use super::{PipelineState, StreamKind};

/// Asynchronous notification posted by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineMessage {
    Error {
        message: String,
        debug: Option<String>,
    },
    Warning(String),
    EndOfStream,
    StateChanged {
        old: PipelineState,
        new: PipelineState,
    },
}

/// Log one bus message at the level its severity calls for.
pub fn log_pipeline_message(kind: StreamKind, message: &PipelineMessage) {
    match message {
        PipelineMessage::Error { message, debug: details } => {
            tracing::error!(stream = %kind, "Pipeline error: {}", message);
            if let Some(details) = details {
                tracing::debug!(stream = %kind, "Debug info: {}", details);
            }
        }
        PipelineMessage::Warning(message) => {
            tracing::warn!(stream = %kind, "Pipeline warning: {}", message);
        }
        PipelineMessage::EndOfStream => {
            tracing::debug!(stream = %kind, "End of stream");
        }
        PipelineMessage::StateChanged { old, new } => {
            tracing::debug!(stream = %kind, "State changed from {} to {}", old, new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(messages: &[PipelineMessage]) -> String {
        let writer = CaptureWriter::default();
        let make_writer = writer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || make_writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            for message in messages {
                log_pipeline_message(StreamKind::Video, message);
            }
        });

        let bytes = writer.0.lock().clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_error_logs_details() {
        let output = capture(&[PipelineMessage::Error {
            message: "decoder failed".into(),
            debug: Some("no caps negotiated".into()),
        }]);
        assert!(output.contains("Pipeline error: decoder failed"));
        assert!(output.contains("Debug info: no caps negotiated"));
    }

    #[test]
    fn test_every_message_kind_is_logged() {
        let output = capture(&[
            PipelineMessage::Error {
                message: "boom".into(),
                debug: None,
            },
            PipelineMessage::Warning("late frame".into()),
            PipelineMessage::EndOfStream,
            PipelineMessage::StateChanged {
                old: PipelineState::Paused,
                new: PipelineState::Playing,
            },
        ]);
        assert!(output.contains("Pipeline error: boom"));
        assert!(!output.contains("Debug info"));
        assert!(output.contains("Pipeline warning: late frame"));
        assert!(output.contains("End of stream"));
        assert!(output.contains("State changed from PAUSED to PLAYING"));
    }
}
