// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{
    context::{Base, TimeContext},
    error::{Result, TimeError},
    normalize::{Canonical, MAX_TICKS},
};
use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::{Add, Neg, Range, Sub},
};

/// [BarBeatTime] is an instant on a musical timeline, expressed as a bar, a
/// beat within that bar, and a subbeat within that beat, plus an overall
/// sign. The [TimeContext] that it carries says how those components map to
/// ticks (subbeats since time zero) and to wall-clock seconds.
///
/// A [BarBeatTime] is always normalized: its beat and subbeat are within the
/// range that its context and [Base] allow, and zero is never negative. All
/// constructors accept out-of-range components and carry or borrow them into
/// place.
///
/// Equality and ordering work on the tick value, so the base doesn't matter,
/// but the context does. Ordering or doing arithmetic on two times with
/// different contexts is a programming error and panics; use
/// [BarBeatTime::try_cmp], [BarBeatTime::checked_add], or
/// [BarBeatTime::checked_sub] to get a [TimeError] instead.
///
/// A time can be at most [BarBeatTime::MAX_TICKS] subbeats from zero. The
/// `try_` constructors and the `checked_` operations report anything beyond
/// that as [TimeError::OutOfRange].
#[derive(Clone, Copy, Debug)]
pub struct BarBeatTime {
    canonical: Canonical,
    context: TimeContext,
    base: Base,
}

impl BarBeatTime {
    /// The farthest a time can be from zero, in subbeats, in either direction.
    pub const MAX_TICKS: i64 = MAX_TICKS;

    /// Creates a time from raw components, which may be out of range or
    /// negative.
    ///
    /// Panics if the components add up to more than [BarBeatTime::MAX_TICKS]
    /// subbeats from zero; [BarBeatTime::try_new_with] reports that instead.
    pub fn new_with(bar: i64, beat: i64, subbeat: i64, context: TimeContext, base: Base) -> Self {
        Self::try_new_with(bar, beat, subbeat, context, base).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new_with(
        bar: i64,
        beat: i64,
        subbeat: i64,
        context: TimeContext,
        base: Base,
    ) -> Result<Self> {
        Self::try_new_with_wide(bar.into(), beat.into(), subbeat.into(), context, base)
    }

    // The codec reads components wider than i64 so that every raw value it
    // writes, including one-based bars past i64::MAX, parses back.
    pub(crate) fn try_new_with_wide(
        bar: i128,
        beat: i128,
        subbeat: i128,
        context: TimeContext,
        base: Base,
    ) -> Result<Self> {
        let canonical = Canonical::normalize(bar, beat, subbeat, &context, base)
            .ok_or(TimeError::OutOfRange)?;
        Ok(Self {
            canonical,
            context,
            base,
        })
    }

    /// Like [BarBeatTime::try_new_with], but also validates the context
    /// parameters.
    pub fn try_new(
        bar: i64,
        beat: i64,
        subbeat: i64,
        subbeat_divisor: u32,
        beats_per_bar: u32,
        beats_per_minute: u32,
        base: Base,
    ) -> Result<Self> {
        let context = TimeContext::new_with(beats_per_bar, subbeat_divisor, beats_per_minute)?;
        Self::try_new_with(bar, beat, subbeat, context, base)
    }

    /// Creates a time from a signed count of subbeats since time zero.
    ///
    /// Panics on `i64::MIN`, the one tick count outside the range.
    pub fn new_with_ticks(ticks: i64, context: TimeContext, base: Base) -> Self {
        Self::try_new_with_ticks(ticks, context, base).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new_with_ticks(ticks: i64, context: TimeContext, base: Base) -> Result<Self> {
        let canonical =
            Canonical::from_ticks(ticks, &context, base).ok_or(TimeError::OutOfRange)?;
        Ok(Self {
            canonical,
            context,
            base,
        })
    }

    /// Creates a time from a signed wall-clock offset. The result is the
    /// nearest subbeat, with halfway cases rounded away from zero.
    pub fn new_with_seconds(seconds: f64, context: TimeContext, base: Base) -> Result<Self> {
        if !seconds.is_finite() {
            return Err(TimeError::InvalidSeconds(seconds));
        }
        Self::new_with_total_beats(seconds / context.seconds_per_beat(), context, base)
    }

    /// Creates a time from a signed, possibly fractional, number of beats.
    /// Rounds the same way as [BarBeatTime::new_with_seconds].
    pub fn new_with_total_beats(beats: f64, context: TimeContext, base: Base) -> Result<Self> {
        let ticks = (beats * context.subbeat_divisor() as f64).round();
        if !ticks.is_finite() {
            return Err(TimeError::InvalidSeconds(beats * context.seconds_per_beat()));
        }
        // MAX_TICKS as f64 rounds up to 2^63, which is itself out of range.
        if ticks.abs() >= MAX_TICKS as f64 {
            return Err(TimeError::OutOfRange);
        }
        Self::try_new_with_ticks(ticks as i64, context, base)
    }

    /// Time zero, which is `0:0.0` in [Base::Zero] and `1:1.1` in [Base::One].
    pub fn zero(context: TimeContext, base: Base) -> Self {
        Self::new_with_ticks(0, context, base)
    }

    /// Time zero in the default context.
    pub fn start(base: Base) -> Self {
        Self::zero(TimeContext::default(), base)
    }

    pub fn bar(&self) -> u64 {
        self.canonical.bar
    }

    pub fn beat(&self) -> u64 {
        self.canonical.beat
    }

    pub fn subbeat(&self) -> u64 {
        self.canonical.subbeat
    }

    pub fn is_negative(&self) -> bool {
        self.canonical.negative
    }

    pub fn is_zero(&self) -> bool {
        self.ticks() == 0
    }

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn context(&self) -> TimeContext {
        self.context
    }

    pub fn beats_per_bar(&self) -> u32 {
        self.context.beats_per_bar()
    }

    pub fn subbeat_divisor(&self) -> u32 {
        self.context.subbeat_divisor()
    }

    pub fn beats_per_minute(&self) -> u32 {
        self.context.beats_per_minute()
    }

    /// The signed number of subbeats since time zero. This doesn't depend on
    /// the base.
    pub fn ticks(&self) -> i64 {
        self.canonical.ticks(&self.context, self.base)
    }

    /// The signed number of beats since time zero, including the fractional
    /// beat.
    pub fn total_beats(&self) -> f64 {
        self.ticks() as f64 / self.subbeat_divisor() as f64
    }

    /// The signed number of complete beats since time zero.
    pub fn whole_beats(&self) -> i64 {
        self.ticks() / self.subbeat_divisor() as i64
    }

    /// The signed number of seconds since time zero at this time's tempo.
    pub fn seconds(&self) -> f64 {
        let ticks_per_minute = self.beats_per_minute() as f64 * self.subbeat_divisor() as f64;
        self.ticks() as f64 * 60.0 / ticks_per_minute
    }

    /// The same instant expressed in the given base.
    pub fn with_base(&self, base: Base) -> Self {
        Self {
            canonical: self.canonical.rebased(&self.context, self.base, base),
            context: self.context,
            base,
        }
    }

    pub fn zero_based(&self) -> Self {
        self.with_base(Base::Zero)
    }

    pub fn one_based(&self) -> Self {
        self.with_base(Base::One)
    }

    /// The same number of subbeats since zero, counted out in another
    /// context. Bars and beats shift when the meter or resolution changes:
    /// `4:3.193` at 480 subbeats per beat becomes `9:2.193` at 240.
    pub fn with_context(&self, context: TimeContext) -> Self {
        Self {
            canonical: self
                .canonical
                .recontextualized(&self.context, &context, self.base),
            context,
            base: self.base,
        }
    }

    pub fn with_subbeat_divisor(&self, subbeat_divisor: u32) -> Result<Self> {
        let context = TimeContext::new_with(
            self.beats_per_bar(),
            subbeat_divisor,
            self.beats_per_minute(),
        )?;
        Ok(self.with_context(context))
    }

    pub fn with_beats_per_bar(&self, beats_per_bar: u32) -> Result<Self> {
        let context = TimeContext::new_with(
            beats_per_bar,
            self.subbeat_divisor(),
            self.beats_per_minute(),
        )?;
        Ok(self.with_context(context))
    }

    /// One beat in this time's context, as a zero-based offset.
    pub fn beat_unit(&self) -> Self {
        Self::new_with_ticks(self.subbeat_divisor() as i64, self.context, Base::Zero)
    }

    /// One subbeat in this time's context, as a zero-based offset.
    pub fn subbeat_unit(&self) -> Self {
        Self::new_with_ticks(1, self.context, Base::Zero)
    }

    /// The same time with the opposite sign. Zero stays zero.
    pub fn negated(&self) -> Self {
        Self {
            canonical: self.canonical.negated(self.base),
            ..*self
        }
    }

    /// The absolute value.
    pub fn magnitude(&self) -> Self {
        if self.is_negative() {
            self.negated()
        } else {
            *self
        }
    }

    /// One subbeat later. Panics at [BarBeatTime::MAX_TICKS].
    pub fn successor(&self) -> Self {
        self.stepped(1)
    }

    /// One subbeat earlier. Panics at -[BarBeatTime::MAX_TICKS].
    pub fn predecessor(&self) -> Self {
        self.stepped(-1)
    }

    fn stepped(&self, ticks: i64) -> Self {
        self.ticks()
            .checked_add(ticks)
            .ok_or(TimeError::OutOfRange)
            .and_then(|t| Self::try_new_with_ticks(t, self.context, self.base))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// `self + n`
    pub fn advanced_by(&self, n: &Self) -> Self {
        *self + *n
    }

    /// `other - self`
    pub fn distance_to(&self, other: &Self) -> Self {
        *other - *self
    }

    /// Whether this time falls within the half-open `range`.
    pub fn is_within(&self, range: &Range<Self>) -> bool {
        range.start <= *self && *self < range.end
    }

    /// Compares two times, failing instead of panicking if they don't share a
    /// context.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering> {
        self.context.check_compatible(&other.context)?;
        Ok(self.ticks().cmp(&other.ticks()))
    }

    pub fn checked_add(&self, rhs: &Self) -> Result<Self> {
        self.combine(rhs, 1)
    }

    pub fn checked_sub(&self, rhs: &Self) -> Result<Self> {
        self.combine(rhs, -1)
    }

    // Both operands are read in the left operand's base and added or
    // subtracted component by component, which in ticks means each operand
    // brings along the offset of that base's first position.
    fn combine(&self, rhs: &Self, sign: i128) -> Result<Self> {
        self.context.check_compatible(&rhs.context)?;
        let origin = self.origin_ticks();
        let lhs = self.ticks() as i128 + origin;
        let rhs = rhs.ticks() as i128 + origin;
        let ticks = i64::try_from(lhs + sign * rhs - origin).map_err(|_| TimeError::OutOfRange)?;
        Self::try_new_with_ticks(ticks, self.context, self.base)
    }

    /// Ticks of this base's first position (`1:1.1` in [Base::One]) when its
    /// components are read as zero-based.
    fn origin_ticks(&self) -> i128 {
        let divisor = self.subbeat_divisor() as i128;
        self.base.offset() as i128 * (self.context.ticks_per_bar() as i128 + divisor + 1)
    }
}

impl PartialEq for BarBeatTime {
    fn eq(&self, other: &Self) -> bool {
        self.context == other.context && self.ticks() == other.ticks()
    }
}
impl Eq for BarBeatTime {}

impl Hash for BarBeatTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.hash(state);
        self.ticks().hash(state);
    }
}

impl PartialOrd for BarBeatTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for BarBeatTime {
    /// Panics if the contexts differ.
    fn cmp(&self, other: &Self) -> Ordering {
        self.try_cmp(other).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Add for BarBeatTime {
    type Output = Self;

    /// Panics if the contexts differ or the sum is out of range.
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(&rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}
impl Sub for BarBeatTime {
    type Output = Self;

    /// Panics if the contexts differ or the difference is out of range.
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(&rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}
impl Neg for BarBeatTime {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negated()
    }
}
