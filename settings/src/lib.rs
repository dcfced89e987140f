// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The `barbeat-settings` crate manages serialization of time contexts and
//! named timeline markers. Keeping these structs separate from the core types
//! lets the file format stay put even if the core changes shape.

use anyhow::{anyhow, Result};
use barbeat_core::{BarBeatTime, Base, TimeContext, TimeSignature};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum_macros::FromRepr;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimeSignatureSettings {
    pub top: u32,
    pub bottom: u32,
}
impl Default for TimeSignatureSettings {
    fn default() -> Self {
        Self { top: 4, bottom: 4 }
    }
}
impl TryFrom<TimeSignatureSettings> for TimeSignature {
    type Error = anyhow::Error;

    fn try_from(value: TimeSignatureSettings) -> Result<Self> {
        Ok(TimeSignature::new_with(value.top, value.bottom)?)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, FromRepr, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseSettings {
    #[default]
    Zero = 0,
    One = 1,
}
impl BaseSettings {
    pub fn into_base(&self) -> Base {
        match self {
            BaseSettings::Zero => Base::Zero,
            BaseSettings::One => Base::One,
        }
    }
}
impl From<Base> for BaseSettings {
    fn from(value: Base) -> Self {
        match value {
            Base::Zero => BaseSettings::Zero,
            Base::One => BaseSettings::One,
        }
    }
}

/// Information about timing: BPM, time signature, resolution, and how times
/// should be numbered.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimeContextSettings {
    #[serde(rename = "bpm", default = "TimeContextSettings::default_bpm")]
    pub beats_per_minute: u32,

    #[serde(default)]
    pub time_signature: TimeSignatureSettings,

    #[serde(default = "TimeContextSettings::default_subbeat_divisor")]
    pub subbeat_divisor: u32,

    #[serde(default)]
    pub base: BaseSettings,
}
impl Default for TimeContextSettings {
    fn default() -> Self {
        Self {
            beats_per_minute: Self::default_bpm(),
            time_signature: TimeSignatureSettings::default(),
            subbeat_divisor: Self::default_subbeat_divisor(),
            base: BaseSettings::default(),
        }
    }
}
impl TryFrom<&TimeContextSettings> for TimeContext {
    type Error = anyhow::Error;

    fn try_from(value: &TimeContextSettings) -> Result<Self> {
        let time_signature: TimeSignature = value.time_signature.try_into()?;
        Ok(TimeContext::with_time_signature(
            &time_signature,
            value.subbeat_divisor,
            value.beats_per_minute,
        )?)
    }
}
impl TimeContextSettings {
    fn default_bpm() -> u32 {
        TimeContext::DEFAULT_BEATS_PER_MINUTE
    }

    fn default_subbeat_divisor() -> u32 {
        TimeContext::DEFAULT_SUBBEAT_DIVISOR
    }

    pub fn base(&self) -> Base {
        self.base.into_base()
    }

    pub fn context(&self) -> Result<TimeContext> {
        TimeContext::try_from(self)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MarkerSettings {
    pub name: String,
    pub time: BarBeatTime,
}

/// A timeline description: the clock that all of its times share, plus named
/// positions on it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TimelineSettings {
    /// The user-visible name of this timeline
    pub title: Option<String>,

    #[serde(rename = "clock", default)]
    pub context_settings: TimeContextSettings,

    #[serde(default)]
    pub markers: Vec<MarkerSettings>,
}
impl TimelineSettings {
    pub fn new_from_yaml_file(path: &Path) -> Result<Self> {
        log::debug!("loading timeline from {}", path.display());
        Self::new_from_yaml(std::fs::read_to_string(path)?.as_str())
    }

    pub fn new_from_yaml(yaml: &str) -> Result<Self> {
        let settings: TimelineSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn new_from_json(json: &str) -> Result<Self> {
        let settings: TimelineSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The markers in time order, each expressed in the timeline's base.
    pub fn sorted_markers(&self) -> Result<Vec<(String, BarBeatTime)>> {
        self.validate()?;
        let base = self.context_settings.base();
        let mut markers: Vec<_> = self
            .markers
            .iter()
            .map(|m| (m.name.clone(), m.time.with_base(base)))
            .collect();
        markers.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(markers)
    }

    fn validate(&self) -> Result<()> {
        let context = self.context_settings.context()?;
        for marker in self.markers.iter() {
            if marker.time.context() != context {
                return Err(anyhow!(
                    "marker \"{}\" at {} doesn't use the timeline's clock ({})",
                    marker.name,
                    marker.time,
                    context
                ));
            }
        }
        Ok(())
    }
}
