use std::collections::BTreeSet;

use crate::types::{AudioFormat, ChannelMask};

/// A supported combination of format, channel masks and sample rates.
///
/// An empty channel or rate set, or the default format, marks that dimension
/// as dynamic: it is discovered from the device at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioProfile {
    pub format: AudioFormat,
    pub channel_masks: BTreeSet<ChannelMask>,
    pub sample_rates: BTreeSet<u32>,
    pub dynamic_format: bool,
    pub dynamic_channels: bool,
    pub dynamic_rates: bool,
}

impl AudioProfile {
    pub fn new(
        format: AudioFormat,
        channel_masks: BTreeSet<ChannelMask>,
        sample_rates: BTreeSet<u32>,
    ) -> Self {
        Self {
            dynamic_format: format.is_dynamic(),
            dynamic_channels: channel_masks.is_empty(),
            dynamic_rates: sample_rates.is_empty(),
            format,
            channel_masks,
            sample_rates,
        }
    }

    /// A profile with every dimension left for runtime discovery.
    pub fn full_dynamic() -> Self {
        Self::new(AudioFormat::DEFAULT, BTreeSet::new(), BTreeSet::new())
    }

    pub fn is_full_dynamic(&self) -> bool {
        self.dynamic_format && self.dynamic_channels && self.dynamic_rates
    }
}

/// Finalize a port's profile list: never empty, ordered by format.
pub fn normalize_profiles(profiles: &mut Vec<AudioProfile>) {
    if profiles.is_empty() {
        profiles.push(AudioProfile::full_dynamic());
    }
    profiles.sort_by(|a, b| a.format.profile_order(&b.format));
}
