use std::cmp::Ordering;
use std::fmt;

use super::{Vocabulary, lookup, reverse_lookup, split_list};

/// An audio sample or stream encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AudioFormat(pub u32);

const MAIN_MASK: u32 = 0xFF00_0000;

impl AudioFormat {
    /// The dynamic format: resolved at runtime from the connected device.
    pub const DEFAULT: AudioFormat = AudioFormat(0x0);
    pub const PCM_16_BIT: AudioFormat = AudioFormat(0x1);
    pub const PCM_8_BIT: AudioFormat = AudioFormat(0x2);
    pub const PCM_32_BIT: AudioFormat = AudioFormat(0x3);
    pub const PCM_8_24_BIT: AudioFormat = AudioFormat(0x4);
    pub const PCM_FLOAT: AudioFormat = AudioFormat(0x5);
    pub const PCM_24_BIT_PACKED: AudioFormat = AudioFormat(0x6);
    pub const MP3: AudioFormat = AudioFormat(0x0100_0000);
    pub const AAC: AudioFormat = AudioFormat(0x0400_0000);
    pub const AAC_LC: AudioFormat = AudioFormat(0x0400_0002);
    pub const AAC_HE_V1: AudioFormat = AudioFormat(0x0400_0010);
    pub const AAC_HE_V2: AudioFormat = AudioFormat(0x0400_0100);
    pub const AAC_ELD: AudioFormat = AudioFormat(0x0400_0200);
    pub const AAC_XHE: AudioFormat = AudioFormat(0x0400_0300);
    pub const AC3: AudioFormat = AudioFormat(0x0900_0000);
    pub const E_AC3: AudioFormat = AudioFormat(0x0A00_0000);
    pub const E_AC3_JOC: AudioFormat = AudioFormat(0x0A00_0001);
    pub const DTS: AudioFormat = AudioFormat(0x0B00_0000);
    pub const DTS_HD: AudioFormat = AudioFormat(0x0C00_0000);
    pub const IEC61937: AudioFormat = AudioFormat(0x0D00_0000);
    pub const DOLBY_TRUEHD: AudioFormat = AudioFormat(0x0E00_0000);
    pub const AC4: AudioFormat = AudioFormat(0x2200_0000);

    /// Resolve a symbolic `AUDIO_FORMAT_*` name.
    pub fn from_name(name: &str) -> Option<AudioFormat> {
        lookup(FORMAT_NAMES, name).map(AudioFormat)
    }

    /// Resolve a symbolic name, falling back to `default` for unknown or empty names.
    pub fn from_name_or(name: &str, default: AudioFormat) -> AudioFormat {
        Self::from_name(name).unwrap_or(default)
    }

    pub fn name(&self) -> Option<&'static str> {
        reverse_lookup(FORMAT_NAMES, self.0)
    }

    pub fn is_dynamic(&self) -> bool {
        *self == Self::DEFAULT
    }

    /// Whether this is a linear PCM encoding (the main format field is zero).
    pub fn is_linear_pcm(&self) -> bool {
        self.0 & MAIN_MASK == 0
    }

    /// Rank used to order PCM formats by preference; lower sorts first.
    fn pcm_rank(&self) -> Option<usize> {
        PCM_ORDER.iter().position(|format| format == self)
    }

    /// Ordering used when sorting a port's profiles.
    ///
    /// Linear PCM formats come first in precision order, then everything else
    /// by numeric value.
    pub fn profile_order(&self, other: &AudioFormat) -> Ordering {
        match (self.pcm_rank(), other.pcm_rank()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

/// Parse a delimited list of format names, skipping unknown entries.
pub fn formats_from_str(literal: &str, delimiters: &[char]) -> Vec<AudioFormat> {
    split_list(literal, delimiters)
        .filter_map(|token| {
            let format = AudioFormat::from_name(token);
            if format.is_none() {
                log::warn!("Unknown audio format '{}'", token);
            }
            format
        })
        .collect()
}

const PCM_ORDER: &[AudioFormat] = &[
    AudioFormat::DEFAULT,
    AudioFormat::PCM_16_BIT,
    AudioFormat::PCM_8_24_BIT,
    AudioFormat::PCM_24_BIT_PACKED,
    AudioFormat::PCM_32_BIT,
    AudioFormat::PCM_FLOAT,
    AudioFormat::PCM_8_BIT,
];

const FORMAT_NAMES: Vocabulary = &[
    ("AUDIO_FORMAT_DEFAULT", 0x0),
    ("AUDIO_FORMAT_PCM_16_BIT", 0x1),
    ("AUDIO_FORMAT_PCM_8_BIT", 0x2),
    ("AUDIO_FORMAT_PCM_32_BIT", 0x3),
    ("AUDIO_FORMAT_PCM_8_24_BIT", 0x4),
    ("AUDIO_FORMAT_PCM_FLOAT", 0x5),
    ("AUDIO_FORMAT_PCM_24_BIT_PACKED", 0x6),
    ("AUDIO_FORMAT_MP3", 0x0100_0000),
    ("AUDIO_FORMAT_AMR_NB", 0x0200_0000),
    ("AUDIO_FORMAT_AMR_WB", 0x0300_0000),
    ("AUDIO_FORMAT_AAC", 0x0400_0000),
    ("AUDIO_FORMAT_AAC_MAIN", 0x0400_0001),
    ("AUDIO_FORMAT_AAC_LC", 0x0400_0002),
    ("AUDIO_FORMAT_AAC_SSR", 0x0400_0004),
    ("AUDIO_FORMAT_AAC_LTP", 0x0400_0008),
    ("AUDIO_FORMAT_AAC_HE_V1", 0x0400_0010),
    ("AUDIO_FORMAT_AAC_SCALABLE", 0x0400_0020),
    ("AUDIO_FORMAT_AAC_ERLC", 0x0400_0040),
    ("AUDIO_FORMAT_AAC_LD", 0x0400_0080),
    ("AUDIO_FORMAT_AAC_HE_V2", 0x0400_0100),
    ("AUDIO_FORMAT_AAC_ELD", 0x0400_0200),
    ("AUDIO_FORMAT_AAC_XHE", 0x0400_0300),
    ("AUDIO_FORMAT_HE_AAC_V1", 0x0500_0000),
    ("AUDIO_FORMAT_HE_AAC_V2", 0x0600_0000),
    ("AUDIO_FORMAT_VORBIS", 0x0700_0000),
    ("AUDIO_FORMAT_OPUS", 0x0800_0000),
    ("AUDIO_FORMAT_AC3", 0x0900_0000),
    ("AUDIO_FORMAT_E_AC3", 0x0A00_0000),
    ("AUDIO_FORMAT_E_AC3_JOC", 0x0A00_0001),
    ("AUDIO_FORMAT_DTS", 0x0B00_0000),
    ("AUDIO_FORMAT_DTS_HD", 0x0C00_0000),
    ("AUDIO_FORMAT_IEC61937", 0x0D00_0000),
    ("AUDIO_FORMAT_DOLBY_TRUEHD", 0x0E00_0000),
    ("AUDIO_FORMAT_EVRC", 0x1000_0000),
    ("AUDIO_FORMAT_QCELP", 0x1900_0000),
    ("AUDIO_FORMAT_WMA", 0x1200_0000),
    ("AUDIO_FORMAT_FLAC", 0x1B00_0000),
    ("AUDIO_FORMAT_ALAC", 0x1C00_0000),
    ("AUDIO_FORMAT_APE", 0x1D00_0000),
    ("AUDIO_FORMAT_AAC_ADTS", 0x1E00_0000),
    ("AUDIO_FORMAT_SBC", 0x1F00_0000),
    ("AUDIO_FORMAT_APTX", 0x2000_0000),
    ("AUDIO_FORMAT_APTX_HD", 0x2100_0000),
    ("AUDIO_FORMAT_AC4", 0x2200_0000),
    ("AUDIO_FORMAT_LDAC", 0x2300_0000),
    ("AUDIO_FORMAT_MAT", 0x2400_0000),
    ("AUDIO_FORMAT_MAT_1_0", 0x2400_0001),
    ("AUDIO_FORMAT_MAT_2_0", 0x2400_0002),
    ("AUDIO_FORMAT_MAT_2_1", 0x2400_0003),
];
