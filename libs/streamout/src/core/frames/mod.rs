// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

mod video_frame;

pub use video_frame::{FrameLayout, VideoFrameMut, BYTES_PER_PIXEL};
