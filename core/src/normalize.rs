// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Carry and borrow propagation between subbeats, beats, and bars. Every way
//! of building a [BarBeatTime](crate::BarBeatTime) ends up here, so this is
//! the only place that knows about out-of-range components and the base
//! offset.
//!
//! Components are folded into a tick count in `i128`, where no sum or product
//! of `i64` components and `u32` context numbers can overflow unnoticed, and
//! then split back into a sign and magnitudes. Times more than [MAX_TICKS]
//! from zero in either direction aren't representable.

use crate::context::{Base, TimeContext};

/// The farthest a time can be from zero, in subbeats. The range is symmetric
/// so that every time can be negated.
pub const MAX_TICKS: i64 = i64::MAX;

/// The canonical sign-and-magnitude form of a time. Components are expressed
/// in the base they were normalized for, so in [Base::One] none of them is
/// ever zero.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct Canonical {
    pub negative: bool,
    pub bar: u64,
    pub beat: u64,
    pub subbeat: u64,
}

impl Canonical {
    /// Brings arbitrary signed components into range, or returns `None` if
    /// they add up to a time beyond [MAX_TICKS].
    pub fn normalize(
        bar: impl Into<i128>,
        beat: impl Into<i128>,
        subbeat: impl Into<i128>,
        context: &TimeContext,
        base: Base,
    ) -> Option<Self> {
        let o = base.offset() as i128;
        let divisor = context.subbeat_divisor() as i128;
        let beats_per_bar = context.beats_per_bar() as i128;
        let ticks = bar
            .into()
            .checked_sub(o)?
            .checked_mul(beats_per_bar)?
            .checked_add(beat.into().checked_sub(o)?)?
            .checked_mul(divisor)?
            .checked_add(subbeat.into().checked_sub(o)?)?;
        Self::from_ticks(i64::try_from(ticks).ok()?, context, base)
    }

    /// Splits a signed tick count, or returns `None` for `i64::MIN`, which
    /// has no positive counterpart.
    pub fn from_ticks(ticks: i64, context: &TimeContext, base: Base) -> Option<Self> {
        if ticks < -MAX_TICKS {
            return None;
        }
        Some(Self::from_magnitude(
            ticks < 0,
            ticks.unsigned_abs(),
            context,
            base,
        ))
    }

    /// The signed number of subbeats since time zero.
    pub fn ticks(&self, context: &TimeContext, base: Base) -> i64 {
        let magnitude = self.magnitude(context, base) as i64;
        if self.negative {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Re-expresses the same components in another base.
    pub fn rebased(&self, context: &TimeContext, from: Base, to: Base) -> Self {
        if from == to {
            return *self;
        }
        Self::from_magnitude(self.negative, self.magnitude(context, from), context, to)
    }

    /// The same magnitude and sign counted out in another context.
    pub fn recontextualized(&self, from: &TimeContext, to: &TimeContext, base: Base) -> Self {
        Self::from_magnitude(self.negative, self.magnitude(from, base), to, base)
    }

    /// Flips the sign, leaving zero alone.
    pub fn negated(&self, base: Base) -> Self {
        let o = base.offset() as u64;
        let is_zero = self.bar == o && self.beat == o && self.subbeat == o;
        Self {
            negative: !self.negative && !is_zero,
            ..*self
        }
    }

    // Every Canonical is built by from_magnitude from a value no larger than
    // MAX_TICKS, so this never exceeds it.
    fn magnitude(&self, context: &TimeContext, base: Base) -> u64 {
        let o = base.offset() as u64;
        ((self.bar - o) * context.beats_per_bar() as u64 + (self.beat - o))
            * context.subbeat_divisor() as u64
            + (self.subbeat - o)
    }

    fn from_magnitude(negative: bool, magnitude: u64, context: &TimeContext, base: Base) -> Self {
        let divisor = context.subbeat_divisor() as u64;
        let beats_per_bar = context.beats_per_bar() as u64;
        let total_beats = magnitude / divisor;
        let o = base.offset() as u64;
        Self {
            negative: negative && magnitude != 0,
            bar: total_beats / beats_per_bar + o,
            beat: total_beats % beats_per_bar + o,
            subbeat: magnitude % divisor + o,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(negative: bool, bar: u64, beat: u64, subbeat: u64) -> Canonical {
        Canonical {
            negative,
            bar,
            beat,
            subbeat,
        }
    }

    fn normalize(bar: i64, beat: i64, subbeat: i64, base: Base) -> Canonical {
        Canonical::normalize(bar, beat, subbeat, &TimeContext::default(), base).unwrap()
    }

    #[test]
    fn in_range_components_are_untouched() {
        assert_eq!(normalize(3, 2, 1, Base::Zero), canonical(false, 3, 2, 1));
        assert_eq!(normalize(4, 3, 2, Base::One), canonical(false, 4, 3, 2));
    }

    #[test]
    fn overflow_carries_upward() {
        assert_eq!(
            normalize(3, 7, 2, Base::One),
            canonical(false, 4, 3, 2),
            "beat 7 of a 4-beat bar should spill into the next bar"
        );
        assert_eq!(
            normalize(0, 3, 480, Base::Zero),
            canonical(false, 1, 0, 0),
            "a full beat of subbeats should ripple all the way into the bar"
        );
        assert_eq!(normalize(1, 1, 481, Base::One), canonical(false, 1, 2, 1));
    }

    #[test]
    fn underflow_borrows_from_bar() {
        assert_eq!(normalize(2, -2, -98, Base::Zero), canonical(false, 1, 1, 382));
        assert_eq!(normalize(0, 0, -1, Base::Zero), canonical(true, 0, 0, 1));
    }

    #[test]
    fn negative_bar_flips_sign() {
        let context = TimeContext::default();
        // -1 bar + 1 beat + 170 subbeats is 1270 subbeats before zero.
        let c = normalize(-1, 1, 170, Base::Zero);
        assert_eq!(c, canonical(true, 0, 2, 310));
        assert_eq!(c.ticks(&context, Base::Zero), -1270);

        assert_eq!(normalize(0, -2, -310, Base::Zero), canonical(true, 0, 2, 310));
    }

    #[test]
    fn zero_is_never_negative() {
        let context = TimeContext::default();
        assert_eq!(normalize(-1, 4, 0, Base::Zero), canonical(false, 0, 0, 0));
        assert_eq!(normalize(0, 5, 1, Base::One), canonical(false, 1, 1, 1));
        assert_eq!(
            Canonical::from_ticks(0, &context, Base::One),
            Some(canonical(false, 1, 1, 1))
        );
    }

    #[test]
    fn ticks_round_trip() {
        let context = TimeContext::new_with(3, 96, 90).unwrap();
        for base in [Base::Zero, Base::One] {
            for ticks in [-MAX_TICKS, -1000, -289, -1, 0, 1, 95, 96, 287, 288, 12345, MAX_TICKS] {
                let c = Canonical::from_ticks(ticks, &context, base).unwrap();
                assert_eq!(c.ticks(&context, base), ticks, "{ticks} in {base:?}");
                assert_eq!(c.negative, ticks < 0);
            }
        }
    }

    #[test]
    fn times_beyond_the_tick_range_are_rejected() {
        let context = TimeContext::default();
        assert_eq!(Canonical::from_ticks(i64::MIN, &context, Base::Zero), None);
        for (bar, beat, subbeat) in [
            (i64::MAX, 0, 0),
            (i64::MIN, 0, 0),
            (0, i64::MAX, 480),
            (0, i64::MIN, 0),
            (i64::MAX, i64::MAX, i64::MAX),
        ] {
            for base in [Base::Zero, Base::One] {
                assert_eq!(
                    Canonical::normalize(bar, beat, subbeat, &context, base),
                    None,
                    "{bar}:{beat}.{subbeat} in {base:?}"
                );
            }
        }

        // Large components that cancel out are fine.
        let unit = TimeContext::new_with(1, 1, 120).unwrap();
        assert_eq!(
            Canonical::normalize(0, i64::MAX, -i64::MAX, &unit, Base::Zero),
            Some(canonical(false, 0, 0, 0))
        );
        // So is the far end of the range itself.
        assert_eq!(
            Canonical::normalize(i64::MAX, 0, 0, &unit, Base::Zero),
            Some(canonical(false, i64::MAX as u64, 0, 0))
        );
        assert_eq!(Canonical::normalize(i64::MAX, 3, 1, &unit, Base::One), None);
    }

    #[test]
    fn rebasing_keeps_the_instant() {
        let context = TimeContext::default();
        let one = canonical(false, 10, 4, 298);
        let zero = one.rebased(&context, Base::One, Base::Zero);
        assert_eq!(zero, canonical(false, 9, 3, 297));
        assert_eq!(zero.rebased(&context, Base::Zero, Base::One), one);

        let negative = Canonical::from_ticks(-1270, &context, Base::Zero).unwrap();
        let negative_one = negative.rebased(&context, Base::Zero, Base::One);
        assert_eq!(negative_one, canonical(true, 1, 3, 311));
        assert_eq!(negative_one.ticks(&context, Base::One), -1270);

        let far = Canonical::from_ticks(-MAX_TICKS, &context, Base::Zero).unwrap();
        assert_eq!(
            far.rebased(&context, Base::Zero, Base::One).ticks(&context, Base::One),
            -MAX_TICKS
        );
    }
}
