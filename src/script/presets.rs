use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::ReelError;

/// Allowed fine-tune pitch range.
pub const PITCH_RANGE: std::ops::RangeInclusive<u16> = 20..=200;
/// Allowed fine-tune speed range (words per minute as understood by the speech engine).
pub const SPEED_RANGE: std::ops::RangeInclusive<u16> = 120..=240;

/// Closed set of voice presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceKey {
    /// Default neutral voice.
    #[default]
    Neutral,
    /// Higher pitched, faster female variant.
    Energetic,
    /// Low pitched male variant.
    Bold,
    /// Slow narrator voice.
    Storyteller,
}

impl VoiceKey {
    /// All keys in table order.
    pub const ALL: [VoiceKey; 4] = [
        VoiceKey::Neutral,
        VoiceKey::Energetic,
        VoiceKey::Bold,
        VoiceKey::Storyteller,
    ];

    /// The immutable preset for this key.
    pub fn profile(self) -> &'static VoiceProfile {
        &VOICE_PROFILES[self as usize]
    }

    /// Lowercase key string.
    pub fn as_str(self) -> &'static str {
        match self {
            VoiceKey::Neutral => "neutral",
            VoiceKey::Energetic => "energetic",
            VoiceKey::Bold => "bold",
            VoiceKey::Storyteller => "storyteller",
        }
    }
}

impl std::str::FromStr for VoiceKey {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReelError::validation(format!("unknown voice preset '{s}'")))
    }
}

/// A named bundle of speech-synthesis parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoiceProfile {
    /// Preset key.
    pub key: VoiceKey,
    /// Base voice identifier understood by the speech engine.
    pub base_voice: &'static str,
    /// Optional voice variant identifier.
    pub variant: Option<&'static str>,
    /// Pitch, within [`PITCH_RANGE`].
    pub pitch: u16,
    /// Speed, within [`SPEED_RANGE`].
    pub speed: u16,
    /// Output amplitude.
    pub amplitude: u16,
    /// Human readable label.
    pub label: &'static str,
}

/// The fixed voice preset table, indexed by [`VoiceKey`].
pub static VOICE_PROFILES: [VoiceProfile; 4] = [
    VoiceProfile {
        key: VoiceKey::Neutral,
        base_voice: "en-us",
        variant: None,
        pitch: 50,
        speed: 175,
        amplitude: 100,
        label: "Default (Neutral)",
    },
    VoiceProfile {
        key: VoiceKey::Energetic,
        base_voice: "en",
        variant: Some("f5"),
        pitch: 160,
        speed: 190,
        amplitude: 120,
        label: "Energetic Female",
    },
    VoiceProfile {
        key: VoiceKey::Bold,
        base_voice: "en",
        variant: Some("m2"),
        pitch: 70,
        speed: 165,
        amplitude: 110,
        label: "Bold Male",
    },
    VoiceProfile {
        key: VoiceKey::Storyteller,
        base_voice: "en",
        variant: Some("klatt"),
        pitch: 95,
        speed: 155,
        amplitude: 105,
        label: "Storyteller",
    },
];

/// Per-session working copy of a voice preset.
///
/// Pitch and speed may be fine-tuned; setters keep them inside the preset bounds. The amplitude
/// always follows the selected preset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoiceSettings {
    key: VoiceKey,
    voice: String,
    variant: Option<String>,
    pitch: u16,
    speed: u16,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self::from_profile(VoiceKey::default().profile())
    }
}

impl VoiceSettings {
    /// Copy voice id, variant, pitch and speed from a preset.
    pub fn from_profile(profile: &VoiceProfile) -> Self {
        Self {
            key: profile.key,
            voice: profile.base_voice.to_owned(),
            variant: profile.variant.map(str::to_owned),
            pitch: profile.pitch,
            speed: profile.speed,
        }
    }

    /// Selected preset key.
    pub fn key(&self) -> VoiceKey {
        self.key
    }

    /// Base voice identifier.
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Voice variant identifier, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Current pitch.
    pub fn pitch(&self) -> u16 {
        self.pitch
    }

    /// Current speed.
    pub fn speed(&self) -> u16 {
        self.speed
    }

    /// Amplitude of the selected preset.
    pub fn amplitude(&self) -> u16 {
        self.key.profile().amplitude
    }

    /// Fine-tune pitch, clamped into [`PITCH_RANGE`].
    pub fn set_pitch(&mut self, pitch: u16) {
        self.pitch = pitch.clamp(*PITCH_RANGE.start(), *PITCH_RANGE.end());
    }

    /// Fine-tune speed, clamped into [`SPEED_RANGE`].
    pub fn set_speed(&mut self, speed: u16) {
        self.speed = speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end());
    }
}

/// Closed set of backdrop palettes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteId {
    /// Deep indigo to violet.
    #[default]
    Violet,
    /// Orange to pink.
    Sunrise,
    /// Slate to cyan.
    Aqua,
}

impl PaletteId {
    /// All ids in table order.
    pub const ALL: [PaletteId; 3] = [PaletteId::Violet, PaletteId::Sunrise, PaletteId::Aqua];

    /// The immutable palette for this id.
    pub fn palette(self) -> &'static Palette {
        &PALETTES[self as usize]
    }

    /// Lowercase id string.
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteId::Violet => "violet",
            PaletteId::Sunrise => "sunrise",
            PaletteId::Aqua => "aqua",
        }
    }
}

impl std::str::FromStr for PaletteId {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaletteId::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReelError::validation(format!("unknown palette '{s}'")))
    }
}

/// A named two-color gradient plus accent color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Palette id.
    pub id: PaletteId,
    /// Human readable label.
    pub label: &'static str,
    /// Gradient stop pair (start, end).
    pub stops: [Rgba8; 2],
    /// Accent color used for captions and the progress fill.
    pub accent: Rgba8,
}

/// The fixed palette table, indexed by [`PaletteId`].
pub static PALETTES: [Palette; 3] = [
    Palette {
        id: PaletteId::Violet,
        label: "Violet Pulse",
        stops: [Rgba8::rgb(0x31, 0x2e, 0x81), Rgba8::rgb(0x7c, 0x3a, 0xed)],
        accent: Rgba8::rgb(0xc4, 0xb5, 0xfd),
    },
    Palette {
        id: PaletteId::Sunrise,
        label: "Sunrise Glow",
        stops: [Rgba8::rgb(0xf9, 0x73, 0x16), Rgba8::rgb(0xec, 0x48, 0x99)],
        accent: Rgba8::rgb(0xfe, 0xf3, 0xc7),
    },
    Palette {
        id: PaletteId::Aqua,
        label: "Aqua Neon",
        stops: [Rgba8::rgb(0x0f, 0x17, 0x2a), Rgba8::rgb(0x22, 0xd3, 0xee)],
        accent: Rgba8::rgb(0x5e, 0xea, 0xd4),
    },
];

#[cfg(test)]
#[path = "../../tests/unit/script/presets.rs"]
mod tests;
