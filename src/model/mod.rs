pub mod config;
pub mod gain;
pub mod module;
pub mod port;
pub mod profile;
pub mod route;

pub use config::{
    AudioPolicyConfig, DeviceRef, GlobalConfig, HwModuleCollection, SurroundFormats,
    default_surround_formats,
};
pub use gain::AudioGain;
pub use module::{HalVersion, HwModule};
pub use port::{DevicePort, MixPort, Port, PortId, PortKind, PortRole};
pub use profile::{AudioProfile, normalize_profiles};
pub use route::{Route, RouteId, RouteType};

use thiserror::Error;

/// Violations of the graph's structural invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("module '{module}' already has a port tagged '{tag_name}'")]
    DuplicatePort { module: String, tag_name: String },
    #[error("module '{0}' is already declared")]
    DuplicateModule(String),
    #[error("module '{module}' has no port #{}", port.index())]
    UnknownPort { module: String, port: PortId },
}
