use std::fmt;

use super::{Vocabulary, mask_from_str, mask_to_string};

/// Capability flags of a source (playback) mix port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OutputFlags(pub u32);

impl OutputFlags {
    pub const NONE: OutputFlags = OutputFlags(0x0);
    pub const PRIMARY: OutputFlags = OutputFlags(0x2);
    pub const DEEP_BUFFER: OutputFlags = OutputFlags(0x8);

    pub fn from_str_mask(literal: &str) -> OutputFlags {
        OutputFlags(mask_from_str(OUTPUT_FLAG_NAMES, literal))
    }

    pub fn contains(&self, other: OutputFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Capability flags of a sink (capture) mix port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputFlags(pub u32);

impl InputFlags {
    pub const NONE: InputFlags = InputFlags(0x0);
    pub const FAST: InputFlags = InputFlags(0x1);

    pub fn from_str_mask(literal: &str) -> InputFlags {
        InputFlags(mask_from_str(INPUT_FLAG_NAMES, literal))
    }

    pub fn contains(&self, other: InputFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Mix port flags; the port role selects which vocabulary applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoFlags {
    Output(OutputFlags),
    Input(InputFlags),
}

impl fmt::Display for IoFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoFlags::Output(flags) => write!(f, "{}", mask_to_string(OUTPUT_FLAG_NAMES, flags.0)),
            IoFlags::Input(flags) => write!(f, "{}", mask_to_string(INPUT_FLAG_NAMES, flags.0)),
        }
    }
}

/// Gain control modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GainMode(pub u32);

impl GainMode {
    pub const JOINT: GainMode = GainMode(0x1);
    pub const CHANNELS: GainMode = GainMode(0x2);
    pub const RAMP: GainMode = GainMode(0x4);

    pub fn from_str_mask(literal: &str) -> GainMode {
        GainMode(mask_from_str(GAIN_MODE_NAMES, literal))
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, other: GainMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl fmt::Display for GainMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", mask_to_string(GAIN_MODE_NAMES, self.0))
    }
}

const OUTPUT_FLAG_NAMES: Vocabulary = &[
    ("AUDIO_OUTPUT_FLAG_DIRECT", 0x1),
    ("AUDIO_OUTPUT_FLAG_PRIMARY", 0x2),
    ("AUDIO_OUTPUT_FLAG_FAST", 0x4),
    ("AUDIO_OUTPUT_FLAG_DEEP_BUFFER", 0x8),
    ("AUDIO_OUTPUT_FLAG_COMPRESS_OFFLOAD", 0x10),
    ("AUDIO_OUTPUT_FLAG_NON_BLOCKING", 0x20),
    ("AUDIO_OUTPUT_FLAG_HW_AV_SYNC", 0x40),
    ("AUDIO_OUTPUT_FLAG_TTS", 0x80),
    ("AUDIO_OUTPUT_FLAG_RAW", 0x100),
    ("AUDIO_OUTPUT_FLAG_SYNC", 0x200),
    ("AUDIO_OUTPUT_FLAG_IEC958_NONAUDIO", 0x400),
    ("AUDIO_OUTPUT_FLAG_DIRECT_PCM", 0x2000),
    ("AUDIO_OUTPUT_FLAG_MMAP_NOIRQ", 0x4000),
    ("AUDIO_OUTPUT_FLAG_VOIP_RX", 0x8000),
    ("AUDIO_OUTPUT_FLAG_INCALL_MUSIC", 0x1_0000),
];

const INPUT_FLAG_NAMES: Vocabulary = &[
    ("AUDIO_INPUT_FLAG_FAST", 0x1),
    ("AUDIO_INPUT_FLAG_HW_HOTWORD", 0x2),
    ("AUDIO_INPUT_FLAG_RAW", 0x4),
    ("AUDIO_INPUT_FLAG_SYNC", 0x8),
    ("AUDIO_INPUT_FLAG_MMAP_NOIRQ", 0x10),
    ("AUDIO_INPUT_FLAG_VOIP_TX", 0x20),
    ("AUDIO_INPUT_FLAG_HW_AV_SYNC", 0x40),
    ("AUDIO_INPUT_FLAG_DIRECT", 0x80),
];

const GAIN_MODE_NAMES: Vocabulary = &[
    ("AUDIO_GAIN_MODE_JOINT", 0x1),
    ("AUDIO_GAIN_MODE_CHANNELS", 0x2),
    ("AUDIO_GAIN_MODE_RAMP", 0x4),
];
