//! Presets and the band gains they name
//!
//! Built-in presets are constants. User-authored presets live in a
//! [`PresetLibrary`] and can be added or replaced at runtime. Lookups that
//! miss resolve to the flat curve so a renderer never has to handle failure.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Bands per preset: low, mid, high
pub const BAND_COUNT: usize = 3;

/// Ordered per-band gains in dB
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandGains(Vec<f32>);

impl BandGains {
    pub fn new(gains: Vec<f32>) -> Self {
        Self(gains)
    }

    /// All-zero reference curve
    pub fn flat(bands: usize) -> Self {
        Self(vec![0.0; bands])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, band: usize) -> Option<f32> {
        self.0.get(band).copied()
    }
}

impl From<Vec<f32>> for BandGains {
    fn from(gains: Vec<f32>) -> Self {
        Self(gains)
    }
}

impl<const N: usize> From<[f32; N]> for BandGains {
    fn from(gains: [f32; N]) -> Self {
        Self(gains.to_vec())
    }
}

/// Built-in presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    Flat,
    Pop,
    Rock,
    Jazz,
    Classical,
    Electronic,
    HipHop,
    Acoustic,
    BassBoost,
    TrebleBoost,
    Vocal,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[
            Preset::Flat,
            Preset::Pop,
            Preset::Rock,
            Preset::Jazz,
            Preset::Classical,
            Preset::Electronic,
            Preset::HipHop,
            Preset::Acoustic,
            Preset::BassBoost,
            Preset::TrebleBoost,
            Preset::Vocal,
        ]
    }

    /// Stable identifier used in settings and lookups
    pub fn id(&self) -> &'static str {
        match self {
            Preset::Flat => "flat",
            Preset::Pop => "pop",
            Preset::Rock => "rock",
            Preset::Jazz => "jazz",
            Preset::Classical => "classical",
            Preset::Electronic => "electronic",
            Preset::HipHop => "hip_hop",
            Preset::Acoustic => "acoustic",
            Preset::BassBoost => "bass_boost",
            Preset::TrebleBoost => "treble_boost",
            Preset::Vocal => "vocal",
        }
    }

    pub fn from_id(id: &str) -> Option<Preset> {
        Preset::all().iter().copied().find(|p| p.id() == id)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Preset::Flat => "Flat",
            Preset::Pop => "Pop",
            Preset::Rock => "Rock",
            Preset::Jazz => "Jazz",
            Preset::Classical => "Classical",
            Preset::Electronic => "Electronic",
            Preset::HipHop => "Hip-Hop",
            Preset::Acoustic => "Acoustic",
            Preset::BassBoost => "Bass Boost",
            Preset::TrebleBoost => "Treble Boost",
            Preset::Vocal => "Vocal",
        }
    }

    /// Returns [low, mid, high]
    pub fn values(&self) -> [f32; BAND_COUNT] {
        match self {
            Preset::Flat => [0.0, 0.0, 0.0],
            Preset::Pop => [-1.0, 4.0, -1.0],
            Preset::Rock => [4.0, -1.0, 4.0],
            Preset::Jazz => [3.0, -2.0, 2.0],
            Preset::Classical => [0.0, 0.0, -3.0],
            Preset::Electronic => [4.0, 1.0, 4.0],
            Preset::HipHop => [5.0, -1.0, 2.0],
            Preset::Acoustic => [3.0, 2.0, 3.0],
            Preset::BassBoost => [6.0, 0.0, 0.0],
            Preset::TrebleBoost => [0.0, 0.0, 6.0],
            Preset::Vocal => [-2.0, 5.0, 0.0],
        }
    }

    pub fn gains(&self) -> BandGains {
        BandGains::from(self.values())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// `presetId -> bandGains` lookup, implemented by whatever owns preset storage
pub trait PresetLookup {
    fn lookup(&self, id: &str) -> Option<BandGains>;

    /// Like `lookup`, but unknown or empty presets fall back to flat
    fn resolve(&self, id: &str) -> BandGains {
        match self.lookup(id) {
            Some(gains) if !gains.is_empty() => gains,
            _ => {
                tracing::debug!("Unknown preset {:?}, using flat curve", id);
                BandGains::flat(BAND_COUNT)
            }
        }
    }
}

/// Built-in presets plus user-authored ones
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    custom: BTreeMap<String, BandGains>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user preset. Built-in ids cannot be shadowed.
    pub fn insert_custom(&mut self, id: impl Into<String>, gains: impl Into<BandGains>) -> bool {
        let id = id.into();
        if Preset::from_id(&id).is_some() {
            tracing::warn!("Refusing to overwrite built-in preset {}", id);
            return false;
        }
        self.custom.insert(id, gains.into());
        true
    }

    pub fn remove_custom(&mut self, id: &str) -> Option<BandGains> {
        self.custom.remove(id)
    }

    /// Built-in ids in table order, then custom ids sorted
    pub fn ids(&self) -> Vec<String> {
        Preset::all()
            .iter()
            .map(|p| p.id().to_string())
            .chain(self.custom.keys().cloned())
            .collect()
    }

    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        Preset::from_id(id).map(|p| p.display_name()).unwrap_or(id)
    }
}

impl PresetLookup for PresetLibrary {
    fn lookup(&self, id: &str) -> Option<BandGains> {
        match Preset::from_id(id) {
            Some(preset) => Some(preset.gains()),
            None => self.custom.get(id).cloned(),
        }
    }
}
