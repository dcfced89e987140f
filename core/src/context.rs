// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::error::{Result, TimeError};
use std::fmt::{self, Display};
use strum_macros::{EnumIter, FromRepr, IntoStaticStr};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// [Base] says whether a time's bar, beat, and subbeat start counting at zero
/// or at one. Time zero is `0:0.0` in [Base::Zero] and `1:1.1` in [Base::One].
/// It's purely a display convention; two times that differ only in base are
/// the same instant.
#[derive(
    Clone, Copy, Debug, Default, EnumIter, Eq, FromRepr, Hash, IntoStaticStr, PartialEq,
)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum Base {
    #[default]
    Zero = 0,
    One = 1,
}
impl Base {
    /// The amount that every component is shifted by in this base.
    pub const fn offset(&self) -> i64 {
        *self as u8 as i64
    }

    /// The subscript glyph that ends a raw-value string.
    pub const fn subscript(&self) -> char {
        match self {
            Base::Zero => '₀',
            Base::One => '₁',
        }
    }

    pub fn from_subscript(c: char) -> Option<Self> {
        match c {
            '₀' => Some(Base::Zero),
            '₁' => Some(Base::One),
            _ => None,
        }
    }

    pub const fn toggled(&self) -> Self {
        match self {
            Base::Zero => Base::One,
            Base::One => Base::Zero,
        }
    }
}

/// [TimeSignature] represents a music [time
/// signature](https://en.wikipedia.org/wiki/Time_signature).
///
/// The top number tells how many beats are in a bar. The bottom number tells
/// the value of a beat; if it's 4, then a beat is a quarter note. Only the top
/// number affects bar-beat arithmetic. The bottom is carried along so that
/// callers can round-trip what the user typed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "kebab-case"))]
pub struct TimeSignature {
    /// The number of beats in a bar.
    pub top: u32,

    /// The value of a beat, expressed as a reciprocal.
    pub bottom: u32,
}
impl Default for TimeSignature {
    fn default() -> Self {
        Self::COMMON_TIME
    }
}
impl Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{}/{}", self.top, self.bottom))
    }
}
impl TimeSignature {
    /// C time = common time = 4/4
    pub const COMMON_TIME: Self = TimeSignature { top: 4, bottom: 4 };

    pub const THREE_FOUR: Self = TimeSignature { top: 3, bottom: 4 };

    pub const TWO_FOUR: Self = TimeSignature { top: 2, bottom: 4 };

    /// 𝄵 time = cut common time = alla breve = 2/2
    pub const CUT_TIME: Self = TimeSignature { top: 2, bottom: 2 };

    /// The largest note value we'll accept as a bottom number.
    pub const MAX_BOTTOM: u32 = 512;

    pub fn new_with(top: u32, bottom: u32) -> Result<Self> {
        if top == 0 || bottom == 0 || bottom > Self::MAX_BOTTOM || !bottom.is_power_of_two() {
            Err(TimeError::InvalidTimeSignature { top, bottom })
        } else {
            Ok(Self { top, bottom })
        }
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn bottom(&self) -> u32 {
        self.bottom
    }
}

/// A [TimeContext] is the set of parameters that give a bar-beat time's raw
/// components a musical meaning: how many beats make a bar, how many subbeats
/// make a beat, and how fast beats go by. Two times can be combined or
/// compared only if their contexts match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TimeContext {
    beats_per_bar: u32,
    subbeat_divisor: u32,
    beats_per_minute: u32,
}
impl Default for TimeContext {
    fn default() -> Self {
        Self {
            beats_per_bar: Self::DEFAULT_BEATS_PER_BAR,
            subbeat_divisor: Self::DEFAULT_SUBBEAT_DIVISOR,
            beats_per_minute: Self::DEFAULT_BEATS_PER_MINUTE,
        }
    }
}
impl Display for TimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "{} beats/bar, {} subbeats/beat, {} BPM",
            self.beats_per_bar, self.subbeat_divisor, self.beats_per_minute
        ))
    }
}
impl TimeContext {
    pub const DEFAULT_BEATS_PER_BAR: u32 = 4;
    /// Same resolution as a typical MIDI file's pulses per quarter note.
    pub const DEFAULT_SUBBEAT_DIVISOR: u32 = 480;
    pub const DEFAULT_BEATS_PER_MINUTE: u32 = 120;

    pub fn new_with(beats_per_bar: u32, subbeat_divisor: u32, beats_per_minute: u32) -> Result<Self> {
        if beats_per_bar == 0 || subbeat_divisor == 0 || beats_per_minute == 0 {
            return Err(TimeError::InvalidContext {
                beats_per_bar,
                subbeat_divisor,
                beats_per_minute,
            });
        }
        Ok(Self {
            beats_per_bar,
            subbeat_divisor,
            beats_per_minute,
        })
    }

    pub fn with_time_signature(
        time_signature: &TimeSignature,
        subbeat_divisor: u32,
        beats_per_minute: u32,
    ) -> Result<Self> {
        Self::new_with(time_signature.top, subbeat_divisor, beats_per_minute)
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.beats_per_bar
    }

    pub fn subbeat_divisor(&self) -> u32 {
        self.subbeat_divisor
    }

    pub fn beats_per_minute(&self) -> u32 {
        self.beats_per_minute
    }

    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.beats_per_minute as f64
    }

    /// Number of subbeats in one bar.
    pub fn ticks_per_bar(&self) -> i64 {
        self.beats_per_bar as i64 * self.subbeat_divisor as i64
    }

    pub(crate) fn check_compatible(&self, other: &TimeContext) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(TimeError::IncompatibleContext {
                left: *self,
                right: *other,
            })
        }
    }
}
