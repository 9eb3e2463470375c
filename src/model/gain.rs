use crate::types::{ChannelMask, GainMode};

/// A controllable gain stage attached to a port.
///
/// Values are in millibel, ramp times in milliseconds. `index` is assigned
/// from a counter shared by every gain of one load, so it is unique and
/// increasing in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioGain {
    pub index: u32,
    pub mode: GainMode,
    pub channel_mask: ChannelMask,
    pub min_value_mb: i32,
    pub max_value_mb: i32,
    pub default_value_mb: i32,
    pub step_value_mb: u32,
    pub min_ramp_ms: u32,
    pub max_ramp_ms: u32,
    pub use_for_volume: bool,
}

impl AudioGain {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            mode: GainMode::default(),
            channel_mask: ChannelMask::NONE,
            min_value_mb: 0,
            max_value_mb: 0,
            default_value_mb: 0,
            step_value_mb: 0,
            min_ramp_ms: 0,
            max_ramp_ms: 0,
            use_for_volume: false,
        }
    }
}
