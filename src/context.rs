//! Per-load options and mutable state.

use std::env;

/// Environment variable standing in for the persistent system property that
/// requests the A2DP offload workaround.
pub const DISABLE_A2DP_OFFLOAD_ENV: &str = "APM_DISABLE_A2DP_OFFLOAD";

/// Options read once at the start of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    /// Move A2DP output handling from the `primary` module to a software
    /// `a2dp` module.
    pub disable_a2dp_offload: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disable_a2dp_offload(mut self, disable: bool) -> Self {
        self.disable_a2dp_offload = disable;
        self
    }

    /// Read options from the process environment.
    ///
    /// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` and `y`/`n`;
    /// anything else leaves the option disabled.
    pub fn from_env() -> Self {
        let disable_a2dp_offload = env::var(DISABLE_A2DP_OFFLOAD_ENV)
            .ok()
            .and_then(|value| parse_property_bool(&value))
            .unwrap_or(false);
        Self {
            disable_a2dp_offload,
        }
    }
}

fn parse_property_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "y" => Some(true),
        "0" | "false" | "no" | "off" | "n" => Some(false),
        _ => None,
    }
}

/// State shared by every parse step of a single load.
///
/// Created fresh for each load so nothing leaks between loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    next_gain_index: u32,
    a2dp_offload_disabled: bool,
    earpiece_channels_fixed: bool,
}

impl LoadContext {
    pub fn new(options: LoadOptions) -> Self {
        Self::with_gain_index(options, 0)
    }

    /// Start gain numbering at `first_gain_index`, e.g. to keep indices
    /// unique across several loads.
    pub fn with_gain_index(options: LoadOptions, first_gain_index: u32) -> Self {
        Self {
            next_gain_index: first_gain_index,
            a2dp_offload_disabled: options.disable_a2dp_offload,
            earpiece_channels_fixed: false,
        }
    }

    /// Hand out the next gain index.
    pub fn next_gain_index(&mut self) -> u32 {
        let index = self.next_gain_index;
        self.next_gain_index = self.next_gain_index.wrapping_add(1);
        index
    }

    /// The index the next gain will receive.
    pub fn peek_gain_index(&self) -> u32 {
        self.next_gain_index
    }

    pub fn a2dp_offload_disabled(&self) -> bool {
        self.a2dp_offload_disabled
    }

    /// Stop the A2DP workaround for the rest of this load.
    pub fn clear_a2dp_offload_disabled(&mut self) {
        self.a2dp_offload_disabled = false;
    }

    /// Record that an input-mono output profile was corrected.
    pub fn mark_earpiece_channels_fixed(&mut self) {
        self.earpiece_channels_fixed = true;
    }

    /// Read and clear the earpiece correction marker.
    pub fn take_earpiece_channels_fixed(&mut self) -> bool {
        std::mem::take(&mut self.earpiece_channels_fixed)
    }
}
