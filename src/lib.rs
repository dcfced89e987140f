// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! `barbeat` gathers the time coordinate types and their settings layer under
//! one name, so applications don't need to depend on each crate separately.

pub use barbeat_core::{
    bar_beat_time, codec, context, error, BarBeatTime, Base, Result, TimeContext, TimeError,
    TimeSignature,
};
pub use barbeat_settings::{
    BaseSettings, MarkerSettings, TimeContextSettings, TimeSignatureSettings, TimelineSettings,
};

/// A version string that's good enough to tell builds apart.
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Builds the context an application should use: the one in `settings` if
/// there is one, with any of the three numbers individually replaced.
pub fn resolve_context(
    settings: Option<&TimeContextSettings>,
    beats_per_bar: Option<u32>,
    subbeat_divisor: Option<u32>,
    beats_per_minute: Option<u32>,
) -> anyhow::Result<TimeContext> {
    let base_context = match settings {
        Some(settings) => settings.context()?,
        None => TimeContext::default(),
    };
    let context = TimeContext::new_with(
        beats_per_bar.unwrap_or(base_context.beats_per_bar()),
        subbeat_divisor.unwrap_or(base_context.subbeat_divisor()),
        beats_per_minute.unwrap_or(base_context.beats_per_minute()),
    )?;
    log::debug!("using {context}");
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_one_at_a_time() {
        let settings = TimeContextSettings {
            beats_per_minute: 90,
            ..Default::default()
        };
        let context = resolve_context(Some(&settings), Some(3), None, None).unwrap();
        assert_eq!(context.beats_per_bar(), 3);
        assert_eq!(context.subbeat_divisor(), TimeContext::DEFAULT_SUBBEAT_DIVISOR);
        assert_eq!(context.beats_per_minute(), 90);

        assert_eq!(
            resolve_context(None, None, None, None).unwrap(),
            TimeContext::default()
        );
        assert!(resolve_context(None, None, Some(0), None).is_err());
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!app_version().is_empty());
    }
}
