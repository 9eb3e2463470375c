//! Loader for audio policy configuration documents.
//!
//! An audio policy configuration describes the hardware modules of a device,
//! their mix and device ports, and the routes between them. Loading one
//! yields an [`AudioPolicyConfig`]: a read-only graph handed to a routing
//! policy engine.
//!
//! ```no_run
//! use audio_policy_config::{AudioPolicyConfig, LoadOptions};
//!
//! let config = AudioPolicyConfig::load("audio_policy_configuration.xml", LoadOptions::from_env())?;
//! for module in config.modules().iter() {
//!     println!("{} has {} ports", module.name(), module.ports().count());
//! }
//! # Ok::<(), audio_policy_config::ConfigError>(())
//! ```

pub mod context;
pub mod model;
pub mod quirks;
pub mod types;
pub mod xml;

pub use crate::context::{LoadContext, LoadOptions};
pub use crate::model::{
    AudioGain, AudioPolicyConfig, AudioProfile, GlobalConfig, HalVersion, HwModule, Port, PortId,
    PortRole, Route, RouteId, RouteType,
};
pub use crate::types::{AudioFormat, ChannelMask, DeviceType};
pub use crate::xml::{ConfigError, ConfigLoader, DeserializeError};
