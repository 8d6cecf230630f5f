// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("OSD already exists")]
    OsdAlreadyExists,

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Buffer full: requested {requested} bytes, {free} free")]
    BufferFull { requested: usize, free: usize },

    #[error("Stream not playing: {0}")]
    NotPlaying(String),

    #[error("Invalid OSD buffer: {0}")]
    InvalidBuffer(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown setup key: {0}")]
    UnknownSetupKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
