use std::fmt;

use super::{Vocabulary, lookup, reverse_lookup};

/// A hardware device type. Input devices carry [`DeviceType::BIT_IN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceType(pub u32);

impl DeviceType {
    pub const BIT_IN: u32 = 0x8000_0000;

    pub const OUT_EARPIECE: DeviceType = DeviceType(0x1);
    pub const OUT_SPEAKER: DeviceType = DeviceType(0x2);
    pub const OUT_BLUETOOTH_SCO_HEADSET: DeviceType = DeviceType(0x20);
    pub const OUT_BLUETOOTH_A2DP: DeviceType = DeviceType(0x80);
    pub const OUT_BLUETOOTH_A2DP_HEADPHONES: DeviceType = DeviceType(0x100);
    pub const OUT_BLUETOOTH_A2DP_SPEAKER: DeviceType = DeviceType(0x200);
    pub const OUT_TELEPHONY_TX: DeviceType = DeviceType(0x1_0000);
    pub const IN_BUILTIN_MIC: DeviceType = DeviceType(0x8000_0004);
    pub const IN_BLUETOOTH_SCO_HEADSET: DeviceType = DeviceType(0x8000_0008);
    pub const IN_TELEPHONY_RX: DeviceType = DeviceType(0x8000_0040);

    /// Resolve a symbolic `AUDIO_DEVICE_*` name.
    pub fn from_name(name: &str) -> Option<DeviceType> {
        lookup(DEVICE_NAMES, name).map(DeviceType)
    }

    pub fn name(&self) -> Option<&'static str> {
        reverse_lookup(DEVICE_NAMES, self.0)
    }

    /// A single input device: the input bit plus exactly one type bit.
    pub fn is_input_device(&self) -> bool {
        self.0 & Self::BIT_IN != 0 && (self.0 & !Self::BIT_IN).count_ones() == 1
    }

    /// One or more output devices.
    pub fn is_output_device(&self) -> bool {
        self.0 & Self::BIT_IN == 0 && self.0 != 0
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:#010x}", self.0),
        }
    }
}

const DEVICE_NAMES: Vocabulary = &[
    ("AUDIO_DEVICE_OUT_EARPIECE", 0x1),
    ("AUDIO_DEVICE_OUT_SPEAKER", 0x2),
    ("AUDIO_DEVICE_OUT_WIRED_HEADSET", 0x4),
    ("AUDIO_DEVICE_OUT_WIRED_HEADPHONE", 0x8),
    ("AUDIO_DEVICE_OUT_BLUETOOTH_SCO", 0x10),
    ("AUDIO_DEVICE_OUT_BLUETOOTH_SCO_HEADSET", 0x20),
    ("AUDIO_DEVICE_OUT_BLUETOOTH_SCO_CARKIT", 0x40),
    ("AUDIO_DEVICE_OUT_BLUETOOTH_A2DP", 0x80),
    ("AUDIO_DEVICE_OUT_BLUETOOTH_A2DP_HEADPHONES", 0x100),
    ("AUDIO_DEVICE_OUT_BLUETOOTH_A2DP_SPEAKER", 0x200),
    ("AUDIO_DEVICE_OUT_HDMI", 0x400),
    ("AUDIO_DEVICE_OUT_AUX_DIGITAL", 0x400),
    ("AUDIO_DEVICE_OUT_ANLG_DOCK_HEADSET", 0x800),
    ("AUDIO_DEVICE_OUT_DGTL_DOCK_HEADSET", 0x1000),
    ("AUDIO_DEVICE_OUT_USB_ACCESSORY", 0x2000),
    ("AUDIO_DEVICE_OUT_USB_DEVICE", 0x4000),
    ("AUDIO_DEVICE_OUT_REMOTE_SUBMIX", 0x8000),
    ("AUDIO_DEVICE_OUT_TELEPHONY_TX", 0x1_0000),
    ("AUDIO_DEVICE_OUT_LINE", 0x2_0000),
    ("AUDIO_DEVICE_OUT_HDMI_ARC", 0x4_0000),
    ("AUDIO_DEVICE_OUT_SPDIF", 0x8_0000),
    ("AUDIO_DEVICE_OUT_FM", 0x10_0000),
    ("AUDIO_DEVICE_OUT_AUX_LINE", 0x20_0000),
    ("AUDIO_DEVICE_OUT_SPEAKER_SAFE", 0x40_0000),
    ("AUDIO_DEVICE_OUT_IP", 0x80_0000),
    ("AUDIO_DEVICE_OUT_BUS", 0x100_0000),
    ("AUDIO_DEVICE_OUT_PROXY", 0x200_0000),
    ("AUDIO_DEVICE_OUT_USB_HEADSET", 0x400_0000),
    ("AUDIO_DEVICE_OUT_HEARING_AID", 0x800_0000),
    ("AUDIO_DEVICE_OUT_ECHO_CANCELLER", 0x1000_0000),
    ("AUDIO_DEVICE_OUT_DEFAULT", 0x4000_0000),
    ("AUDIO_DEVICE_IN_COMMUNICATION", 0x8000_0001),
    ("AUDIO_DEVICE_IN_AMBIENT", 0x8000_0002),
    ("AUDIO_DEVICE_IN_BUILTIN_MIC", 0x8000_0004),
    ("AUDIO_DEVICE_IN_BLUETOOTH_SCO_HEADSET", 0x8000_0008),
    ("AUDIO_DEVICE_IN_WIRED_HEADSET", 0x8000_0010),
    ("AUDIO_DEVICE_IN_HDMI", 0x8000_0020),
    ("AUDIO_DEVICE_IN_AUX_DIGITAL", 0x8000_0020),
    ("AUDIO_DEVICE_IN_TELEPHONY_RX", 0x8000_0040),
    ("AUDIO_DEVICE_IN_VOICE_CALL", 0x8000_0040),
    ("AUDIO_DEVICE_IN_BACK_MIC", 0x8000_0080),
    ("AUDIO_DEVICE_IN_REMOTE_SUBMIX", 0x8000_0100),
    ("AUDIO_DEVICE_IN_ANLG_DOCK_HEADSET", 0x8000_0200),
    ("AUDIO_DEVICE_IN_DGTL_DOCK_HEADSET", 0x8000_0400),
    ("AUDIO_DEVICE_IN_USB_ACCESSORY", 0x8000_0800),
    ("AUDIO_DEVICE_IN_USB_DEVICE", 0x8000_1000),
    ("AUDIO_DEVICE_IN_FM_TUNER", 0x8000_2000),
    ("AUDIO_DEVICE_IN_TV_TUNER", 0x8000_4000),
    ("AUDIO_DEVICE_IN_LINE", 0x8000_8000),
    ("AUDIO_DEVICE_IN_SPDIF", 0x8001_0000),
    ("AUDIO_DEVICE_IN_BLUETOOTH_A2DP", 0x8002_0000),
    ("AUDIO_DEVICE_IN_LOOPBACK", 0x8004_0000),
    ("AUDIO_DEVICE_IN_IP", 0x8008_0000),
    ("AUDIO_DEVICE_IN_BUS", 0x8010_0000),
    ("AUDIO_DEVICE_IN_PROXY", 0x8100_0000),
    ("AUDIO_DEVICE_IN_USB_HEADSET", 0x8200_0000),
    ("AUDIO_DEVICE_IN_BLUETOOTH_BLE", 0x8400_0000),
    ("AUDIO_DEVICE_IN_HDMI_ARC", 0x8800_0000),
    ("AUDIO_DEVICE_IN_ECHO_REFERENCE", 0x9000_0000),
    ("AUDIO_DEVICE_IN_DEFAULT", 0xC000_0000),
];
