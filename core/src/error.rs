// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::context::TimeContext;
use thiserror::Error;

/// Everything that can go wrong while building or combining
/// [BarBeatTime](crate::BarBeatTime)s.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TimeError {
    /// One of the context's three parameters was zero.
    #[error(
        "invalid time context: beats per bar {beats_per_bar}, subbeat divisor {subbeat_divisor}, \
         beats per minute {beats_per_minute} (all must be nonzero)"
    )]
    InvalidContext {
        beats_per_bar: u32,
        subbeat_divisor: u32,
        beats_per_minute: u32,
    },

    /// The top was zero, or the bottom wasn't a power of two up to 512.
    #[error("invalid time signature {top}/{bottom}")]
    InvalidTimeSignature { top: u32, bottom: u32 },

    /// NaN or infinite seconds can't be placed on a timeline.
    #[error("seconds value {0} is not finite")]
    InvalidSeconds(f64),

    /// The string isn't a raw value, or names an invalid context or an
    /// unrepresentable time.
    #[error("couldn't parse \"{0}\" as a bar-beat time")]
    Parse(String),

    /// The time would be more than `i64::MAX` subbeats from zero.
    #[error("time is out of range (more than {} subbeats from zero)", i64::MAX)]
    OutOfRange,

    /// The two operands belong to different musical timelines.
    #[error("incompatible time contexts: {left} vs. {right}")]
    IncompatibleContext { left: TimeContext, right: TimeContext },
}

/// Shorthand for results that fail with a [TimeError].
pub type Result<T> = std::result::Result<T, TimeError>;
