use std::collections::BTreeSet;

use crate::model::gain::AudioGain;
use crate::model::profile::AudioProfile;
use crate::model::route::RouteId;
use crate::types::{AudioFormat, DeviceType, IoFlags};

/// Stable handle of a port inside its owning module.
///
/// Handles are assigned sequentially and never reused within a module, so
/// they stay valid (or dangling, never aliased) when ports are removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub(crate) u32);

impl PortId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Direction of a port as seen from the audio framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortRole {
    /// Produces audio: playback mix ports, capture devices.
    Source,
    /// Consumes audio: capture mix ports, playback devices.
    Sink,
}

impl PortRole {
    /// Any value other than `source` reads as a sink.
    pub fn from_literal(literal: &str) -> PortRole {
        if literal == "source" {
            PortRole::Source
        } else {
            PortRole::Sink
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PortRole::Source => "source",
            PortRole::Sink => "sink",
        }
    }
}

/// Software endpoint facing the mixer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixPort {
    pub flags: IoFlags,
    pub max_open_count: u32,
    pub max_active_count: u32,
}

/// Hardware endpoint representing a physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePort {
    pub device_type: DeviceType,
    pub address: String,
    pub encoded_formats: Vec<AudioFormat>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortKind {
    Mix(MixPort),
    Device(DevicePort),
}

/// An audio port of a module: a mix port or a device port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub tag_name: String,
    pub role: PortRole,
    pub profiles: Vec<AudioProfile>,
    pub gains: Vec<AudioGain>,
    pub kind: PortKind,
    /// Routes that use this port as sink or source. Maintained by the module.
    pub(crate) routes: BTreeSet<RouteId>,
}

impl Port {
    pub fn new(tag_name: impl Into<String>, role: PortRole, kind: PortKind) -> Self {
        Self {
            tag_name: tag_name.into(),
            role,
            profiles: Vec::new(),
            gains: Vec::new(),
            kind,
            routes: BTreeSet::new(),
        }
    }

    pub fn is_mix(&self) -> bool {
        matches!(self.kind, PortKind::Mix(_))
    }

    pub fn is_device(&self) -> bool {
        matches!(self.kind, PortKind::Device(_))
    }

    pub fn as_mix(&self) -> Option<&MixPort> {
        match &self.kind {
            PortKind::Mix(mix) => Some(mix),
            PortKind::Device(_) => None,
        }
    }

    pub fn as_device(&self) -> Option<&DevicePort> {
        match &self.kind {
            PortKind::Device(device) => Some(device),
            PortKind::Mix(_) => None,
        }
    }

    /// Routes touching this port, in creation order.
    pub fn routes(&self) -> impl Iterator<Item = RouteId> + '_ {
        self.routes.iter().copied()
    }
}
