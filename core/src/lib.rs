// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Musical time coordinates.
//!
//! A [BarBeatTime] places an event on a musical timeline as bar, beat, and
//! subbeat under a [TimeContext] (beats per bar, subbeats per beat, and
//! tempo). It converts to and from absolute ticks, wall-clock seconds, and a
//! compact string form, and it orders and combines with other times that
//! share its context. Sequencers, transports, and event containers all
//! measure against it.

pub use bar_beat_time::BarBeatTime;
pub use context::{Base, TimeContext, TimeSignature};
pub use error::{Result, TimeError};

/// The [bar_beat_time] module holds the coordinate type and its arithmetic.
pub mod bar_beat_time;
/// The [codec] module reads and writes the string form.
pub mod codec;
/// The [context] module describes time signatures and tempo.
pub mod context;
/// The [error] module lists what can go wrong.
pub mod error;

mod normalize;
