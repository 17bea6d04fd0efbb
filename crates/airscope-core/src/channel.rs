//! Channel to frequency to band mapping

use serde::{Deserialize, Serialize};

/// Frequency band of a wireless network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    Ghz5,
    #[serde(rename = "6GHz")]
    Ghz6,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ghz2_4 => "2.4GHz",
            Self::Ghz5 => "5GHz",
            Self::Ghz6 => "6GHz",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Center frequency in MHz for a channel number, or 0 when unmapped
pub fn channel_to_frequency(channel: u32) -> u32 {
    match channel {
        1..=13 => 2412 + (channel - 1) * 5,
        14 => 2484,
        36..=64 => 5180 + (channel - 36) * 5,
        100..=144 => 5500 + (channel - 100) * 5,
        149..=177 => 5745 + (channel - 149) * 5,
        _ => 0,
    }
}

/// Band for a center frequency; anything outside a known range is 2.4GHz
pub fn band_for_frequency(frequency: u32) -> Band {
    match frequency {
        2400..=2499 => Band::Ghz2_4,
        5150..=5899 => Band::Ghz5,
        5925..=7124 => Band::Ghz6,
        _ => Band::Ghz2_4,
    }
}
