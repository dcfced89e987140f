// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The textual form of a [BarBeatTime].
//!
//! A raw value looks like `4:3/4.2/480@120₁`: bar, beat over beats per bar,
//! subbeat over subbeat divisor, tempo, and a subscript naming the base. A
//! negative time is written by counting the bar back from zero and the beat
//! and subbeat forward within that bar, so one beat before time zero in 4/4
//! is `-1:3/4.0/480@120₀`.

use crate::{
    bar_beat_time::BarBeatTime,
    context::{Base, TimeContext},
    error::TimeError,
};
use regex::Regex;
use std::{
    fmt::{self, Display},
    str::FromStr,
    sync::OnceLock,
};

fn raw_value_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // The short forms leave out any of the three context numbers or the
        // base, which then take their defaults.
        Regex::new(concat!(
            r"^(?P<bar>-?[0-9]+)",
            r":(?P<beat>[0-9]+)",
            r"(?:[/╱](?P<beats_per_bar>[0-9]+))?",
            r"\.(?P<subbeat>[0-9]+)",
            r"(?:[/╱](?P<subbeat_divisor>[0-9]+))?",
            r"(?:@(?P<beats_per_minute>[0-9]+))?",
            r"(?P<base>[₀₁])?$",
        ))
        .expect("raw value pattern is valid")
    })
}

impl BarBeatTime {
    /// Parses a raw value, returning `None` if it's malformed, names an
    /// invalid context, or lies beyond [BarBeatTime::MAX_TICKS]. Missing
    /// context numbers fall back to [TimeContext::default], and a missing
    /// subscript means [Base::Zero].
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = raw_value_regex().captures(raw)?;

        let bar: i128 = captures["bar"].parse().ok()?;
        let beat: i128 = captures["beat"].parse().ok()?;
        let subbeat: i128 = captures["subbeat"].parse().ok()?;

        let defaults = TimeContext::default();
        let number = |name: &str, default: u32| -> Option<u32> {
            match captures.name(name) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(default),
            }
        };
        let context = TimeContext::new_with(
            number("beats_per_bar", defaults.beats_per_bar())?,
            number("subbeat_divisor", defaults.subbeat_divisor())?,
            number("beats_per_minute", defaults.beats_per_minute())?,
        );
        let context = match context {
            Ok(context) => context,
            Err(e) => {
                log::trace!("rejecting {raw:?}: {e}");
                return None;
            }
        };
        let base = captures
            .name("base")
            .and_then(|m| m.as_str().chars().next())
            .and_then(Base::from_subscript)
            .unwrap_or_default();

        match Self::try_new_with_wide(bar, beat, subbeat, context, base) {
            Ok(t) => Some(t),
            Err(e) => {
                log::trace!("rejecting {raw:?}: {e}");
                None
            }
        }
    }

    /// The canonical string form, which [BarBeatTime::parse] turns back into
    /// an equal time.
    pub fn raw_value(&self) -> String {
        let (bar, beat, subbeat) = self.positional_components();
        format!(
            "{bar}:{beat}/{}.{subbeat}/{}@{}{}",
            self.beats_per_bar(),
            self.subbeat_divisor(),
            self.beats_per_minute(),
            self.base().subscript()
        )
    }

    /// A transport-style readout, always one-based: the bar padded to three
    /// digits and the subbeat padded to the width of the divisor, with a
    /// leading dash if the time is negative. Time zero is `001:1.001` at 480
    /// subbeats per beat.
    pub fn display_string(&self) -> String {
        let t = self.one_based();
        let width = self.subbeat_divisor().to_string().len();
        format!(
            "{}{:03}:{}.{:0width$}",
            if t.is_negative() { "-" } else { "" },
            t.bar(),
            t.beat(),
            t.subbeat(),
        )
    }

    // Floor decomposition: beat and subbeat are never negative, and the bar
    // carries the sign. At the ends of the range the one-based bar needs more
    // than an i64.
    fn positional_components(&self) -> (i128, i128, i128) {
        let ticks = self.ticks() as i128;
        let divisor = self.subbeat_divisor() as i128;
        let beats_per_bar = self.beats_per_bar() as i128;
        let total_beats = ticks.div_euclid(divisor);
        let o = self.base().offset() as i128;
        (
            total_beats.div_euclid(beats_per_bar) + o,
            total_beats.rem_euclid(beats_per_bar) + o,
            ticks.rem_euclid(divisor) + o,
        )
    }
}

impl Display for BarBeatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_value())
    }
}

impl FromStr for BarBeatTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TimeError::Parse(s.to_string()))
    }
}

impl TryFrom<&str> for BarBeatTime {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(feature = "serialization")]
mod serialization {
    use super::BarBeatTime;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for BarBeatTime {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for BarBeatTime {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let raw = String::deserialize(deserializer)?;
            raw.parse().map_err(de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_form() {
        let t = BarBeatTime::parse("4:3/4.2/480@120₁").unwrap();
        assert_eq!(t.bar(), 4);
        assert_eq!(t.beat(), 3);
        assert_eq!(t.subbeat(), 2);
        assert_eq!(t.subbeat_divisor(), 480);
        assert_eq!(t.beats_per_bar(), 4);
        assert_eq!(t.beats_per_minute(), 120);
        assert_eq!(t.base(), Base::One);
        assert!(!t.is_negative());
    }

    #[test]
    fn parses_short_forms_with_defaults() {
        let t = BarBeatTime::parse("9:3/4.310@120₀").unwrap();
        assert_eq!(t.subbeat_divisor(), TimeContext::DEFAULT_SUBBEAT_DIVISOR);
        assert_eq!((t.bar(), t.beat(), t.subbeat()), (9, 3, 310));

        let t = BarBeatTime::parse("2:1.5").unwrap();
        assert_eq!(t.context(), TimeContext::default());
        assert_eq!(t.base(), Base::Zero);

        let t = BarBeatTime::parse("2:1/3.5/96").unwrap();
        assert_eq!(t.beats_per_bar(), 3);
        assert_eq!(t.subbeat_divisor(), 96);
        assert_eq!(t.beats_per_minute(), TimeContext::DEFAULT_BEATS_PER_MINUTE);
    }

    #[test]
    fn accepts_fraction_slash_and_leading_zeros() {
        assert_eq!(
            BarBeatTime::parse("004:3╱4.002╱480@120₁"),
            BarBeatTime::parse("4:3/4.2/480@120₁")
        );
    }

    #[test]
    fn rejects_garbage() {
        for raw in [
            "",
            "4",
            "4:3",
            "4:3/4",
            "a:3/4.2/480@120₁",
            "4:-3/4.2/480@120₁",
            "4:3/4.2/480@120₂",
            "4:3/4.2/480@120₁ ",
            "4:3/0.2/480@120₁",
            "4:3/4.2/0@120₁",
            "4:3/4.2/480@0₁",
            "4:3/4.2/99999999999@120₁",
            "99999999999999999999:3/4.2/480@120₁",
            "9223372036854775807:0/4.0/480@120₀",
            "-9223372036854775808:0/4.0/480@120₀",
            "0:9223372036854775807/4.480/480@120₀",
        ] {
            assert_eq!(BarBeatTime::parse(raw), None, "{raw:?} should not parse");
            assert!(matches!(raw.parse::<BarBeatTime>(), Err(TimeError::Parse(_))));
        }
    }

    #[test]
    fn parses_the_far_ends_of_the_range() {
        let unit = "/1.0/1@120₀";
        let last = BarBeatTime::parse(&format!("9223372036854775807:0{unit}")).unwrap();
        assert_eq!(last.ticks(), BarBeatTime::MAX_TICKS);
        let first = BarBeatTime::parse(&format!("-9223372036854775807:0{unit}")).unwrap();
        assert_eq!(first.ticks(), -BarBeatTime::MAX_TICKS);
        assert_eq!(BarBeatTime::parse(&first.raw_value()), Some(first));
        assert_eq!(BarBeatTime::parse(&format!("-9223372036854775808:0{unit}")), None);

        let last = last.one_based();
        assert_eq!(last.raw_value(), "9223372036854775808:1/1.1/1@120₁");
        assert_eq!(BarBeatTime::parse(&last.raw_value()), Some(last));
    }

    #[test]
    fn parsing_normalizes() {
        assert_eq!(
            BarBeatTime::parse("3:7/4.2/480@120₁").unwrap().raw_value(),
            "4:3/4.2/480@120₁"
        );
    }

    #[test]
    fn formats_canonical_form() {
        let t = BarBeatTime::new_with(10, 4, 298, TimeContext::default(), Base::One);
        assert_eq!(t.raw_value(), "10:4/4.298/480@120₁");
        assert_eq!(t.to_string(), t.raw_value());
        assert_eq!(t.zero_based().raw_value(), "9:3/4.297/480@120₀");
    }

    #[test]
    fn formats_negative_times_from_the_bar_before_zero() {
        let context = TimeContext::default();
        let t = BarBeatTime::new_with_ticks(-1270, context, Base::Zero);
        assert_eq!(t.raw_value(), "-1:1/4.170/480@120₀");

        let t = BarBeatTime::new_with_ticks(-480, context, Base::Zero);
        assert_eq!(t.raw_value(), "-1:3/4.0/480@120₀");

        let t = BarBeatTime::new_with_ticks(-1, context, Base::One);
        assert_eq!(t.raw_value(), "0:4/4.480/480@120₁");
    }

    #[test]
    fn raw_values_round_trip() {
        let context = TimeContext::new_with(3, 96, 90).unwrap();
        for base in [Base::Zero, Base::One] {
            for ticks in [-100_000, -289, -288, -97, -1, 0, 1, 95, 96, 288, 31_337] {
                let t = BarBeatTime::new_with_ticks(ticks, context, base);
                let parsed = BarBeatTime::parse(&t.raw_value()).unwrap();
                assert_eq!(parsed, t, "{}", t.raw_value());
                assert_eq!(parsed.base(), base);
                assert_eq!(parsed.bar(), t.bar());
                assert_eq!(parsed.is_negative(), t.is_negative());
            }
        }
    }

    #[test]
    fn display_string_is_a_transport_readout() {
        let context = TimeContext::default();
        assert_eq!(
            BarBeatTime::zero(context, Base::Zero).display_string(),
            "001:1.001"
        );
        assert_eq!(
            BarBeatTime::new_with(11, 3, 9, context, Base::Zero).display_string(),
            "012:4.010"
        );
        assert_eq!(
            BarBeatTime::new_with_ticks(-1270, context, Base::One).display_string(),
            "-001:3.311"
        );
        let coarse = TimeContext::new_with(4, 4, 120).unwrap();
        assert_eq!(
            BarBeatTime::new_with(0, 1, 3, coarse, Base::Zero).display_string(),
            "001:2.4"
        );
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn serializes_as_raw_value() {
        let t = BarBeatTime::parse("4:3/4.2/480@120₁").unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"4:3/4.2/480@120₁\"");
        let back: BarBeatTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.base(), Base::One);

        assert!(serde_json::from_str::<BarBeatTime>("\"not a time\"").is_err());
    }
}
