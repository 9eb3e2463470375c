use std::collections::BTreeSet;
use std::fmt;

use super::{Vocabulary, lookup, reverse_lookup, split_list};

/// A channel layout, either positional (output or input) or index based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelMask(pub u32);

const INDEX_REPRESENTATION: u32 = 0x8000_0000;

impl ChannelMask {
    pub const NONE: ChannelMask = ChannelMask(0x0);
    pub const OUT_MONO: ChannelMask = ChannelMask(0x1);
    pub const OUT_STEREO: ChannelMask = ChannelMask(0x3);
    pub const OUT_5POINT1: ChannelMask = ChannelMask(0x3F);
    pub const OUT_7POINT1: ChannelMask = ChannelMask(0x63F);
    pub const IN_MONO: ChannelMask = ChannelMask(0x10);
    pub const IN_STEREO: ChannelMask = ChannelMask(0xC);

    /// Resolve a symbolic `AUDIO_CHANNEL_*` name.
    pub fn from_name(name: &str) -> Option<ChannelMask> {
        if let Some(value) = lookup(CHANNEL_NAMES, name) {
            return Some(ChannelMask(value));
        }
        // AUDIO_CHANNEL_INDEX_MASK_<n>
        let count: u32 = name.strip_prefix("AUDIO_CHANNEL_INDEX_MASK_")?.parse().ok()?;
        if (1..=24).contains(&count) {
            Some(ChannelMask(INDEX_REPRESENTATION | ((1 << count) - 1)))
        } else {
            None
        }
    }

    pub fn name(&self) -> Option<String> {
        if let Some(name) = reverse_lookup(CHANNEL_NAMES, self.0) {
            return Some(name.to_string());
        }
        if self.0 & INDEX_REPRESENTATION != 0 {
            let bits = self.0 & !INDEX_REPRESENTATION;
            if bits != 0 && (bits + 1).is_power_of_two() {
                return Some(format!("AUDIO_CHANNEL_INDEX_MASK_{}", bits.count_ones()));
            }
        }
        None
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

/// Parse a comma-separated list of channel mask names, skipping unknown entries.
pub fn masks_from_str(literal: &str) -> BTreeSet<ChannelMask> {
    split_list(literal, &[','])
        .filter_map(|token| {
            let mask = ChannelMask::from_name(token);
            if mask.is_none() {
                log::warn!("Unknown channel mask '{}'", token);
            }
            mask
        })
        .collect()
}

const CHANNEL_NAMES: Vocabulary = &[
    ("AUDIO_CHANNEL_NONE", 0x0),
    ("AUDIO_CHANNEL_OUT_MONO", 0x1),
    ("AUDIO_CHANNEL_OUT_STEREO", 0x3),
    ("AUDIO_CHANNEL_OUT_2POINT1", 0xB),
    ("AUDIO_CHANNEL_OUT_TRI", 0x7),
    ("AUDIO_CHANNEL_OUT_TRI_BACK", 0x103),
    ("AUDIO_CHANNEL_OUT_3POINT1", 0xF),
    ("AUDIO_CHANNEL_OUT_QUAD", 0x33),
    ("AUDIO_CHANNEL_OUT_QUAD_SIDE", 0x603),
    ("AUDIO_CHANNEL_OUT_SURROUND", 0x107),
    ("AUDIO_CHANNEL_OUT_PENTA", 0x37),
    ("AUDIO_CHANNEL_OUT_5POINT1", 0x3F),
    ("AUDIO_CHANNEL_OUT_5POINT1_SIDE", 0x60F),
    ("AUDIO_CHANNEL_OUT_6POINT1", 0x13F),
    ("AUDIO_CHANNEL_OUT_7POINT1", 0x63F),
    ("AUDIO_CHANNEL_OUT_5POINT1POINT2", 0x3_003F),
    ("AUDIO_CHANNEL_OUT_5POINT1POINT4", 0x2_D03F),
    ("AUDIO_CHANNEL_OUT_7POINT1POINT2", 0x3_063F),
    ("AUDIO_CHANNEL_OUT_7POINT1POINT4", 0x2_D63F),
    ("AUDIO_CHANNEL_OUT_HAPTIC_A", 0x2000_0000),
    ("AUDIO_CHANNEL_IN_MONO", 0x10),
    ("AUDIO_CHANNEL_IN_STEREO", 0xC),
    ("AUDIO_CHANNEL_IN_FRONT_BACK", 0x30),
    ("AUDIO_CHANNEL_IN_6", 0xFC),
    ("AUDIO_CHANNEL_IN_2POINT0POINT2", 0x60C),
    ("AUDIO_CHANNEL_IN_2POINT1POINT2", 0x70C),
    ("AUDIO_CHANNEL_IN_3POINT0POINT2", 0x64C),
    ("AUDIO_CHANNEL_IN_3POINT1POINT2", 0x74C),
    ("AUDIO_CHANNEL_IN_5POINT1", 0x17C),
    ("AUDIO_CHANNEL_IN_VOICE_UPLINK_MONO", 0x4010),
    ("AUDIO_CHANNEL_IN_VOICE_DNLINK_MONO", 0x8010),
    ("AUDIO_CHANNEL_IN_VOICE_CALL_MONO", 0xC010),
];
