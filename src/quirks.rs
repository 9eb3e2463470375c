//! Hardware-specific corrections applied to each module once its ports and
//! routes are assembled.
//!
//! Two patches exist:
//!
//! * **A2DP offload disable**, enabled by [`LoadOptions::disable_a2dp_offload`]:
//!   A2DP playback is moved out of the `primary` module into a software
//!   `a2dp` module. The `a2dp` module receives an `a2dp output` mix port, the
//!   three [`A2DP_DEVICES`] and a route from the mix port into each device; the
//!   `primary` module loses those devices and the routes into them. If the
//!   `a2dp` module already declares `a2dp output`, the patch turns itself off
//!   for the rest of the load.
//! * **BT SCO fixup**, always on: modules that route the SCO headset
//!   microphone into the primary input and have a telephony TX route, but no
//!   route into the SCO headset, get one.
//!
//! [`LoadOptions::disable_a2dp_offload`]: crate::context::LoadOptions::disable_a2dp_offload

use std::collections::BTreeSet;
use std::fmt;

use crate::context::LoadContext;
use crate::model::{
    AudioProfile, DevicePort, HwModule, MixPort, Port, PortId, PortKind, PortRole, RouteType,
};
use crate::types::{AudioFormat, ChannelMask, DeviceType, IoFlags, OutputFlags};

pub const PRIMARY_MODULE: &str = "primary";
pub const A2DP_MODULE: &str = "a2dp";

pub const A2DP_OUTPUT: &str = "a2dp output";
pub const A2DP_ADDRESS: &str = "lhdc_a2dp";
pub const A2DP_SAMPLE_RATES: [u32; 3] = [44100, 48000, 96000];
pub const A2DP_DEVICES: [(&str, DeviceType); 3] = [
    ("BT A2DP Out", DeviceType::OUT_BLUETOOTH_A2DP),
    ("BT A2DP Headphones", DeviceType::OUT_BLUETOOTH_A2DP_HEADPHONES),
    ("BT A2DP Speaker", DeviceType::OUT_BLUETOOTH_A2DP_SPEAKER),
];

pub const BT_SCO_HEADSET: &str = "BT SCO Headset";
pub const BT_SCO_HEADSET_MIC: &str = "BT SCO Headset Mic";
pub const TELEPHONY_TX: &str = "Telephony Tx";
/// Candidate sources of the synthesized SCO headset route, in order.
pub const BT_SCO_SOURCES: [&str; 4] = [
    "primary output",
    "deep_buffer",
    "compressed_offload",
    "Telephony Rx",
];

/// One structural change made to a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    AddedPort(String),
    RemovedPort(String),
    AddedRoute { sink: String, sources: Vec<String> },
    RemovedRoute { sink: String },
    /// The `a2dp` module already provides `a2dp output`.
    A2dpOffloadKept,
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patch::AddedPort(tag) => write!(f, "added port '{}'", tag),
            Patch::RemovedPort(tag) => write!(f, "removed port '{}'", tag),
            Patch::AddedRoute { sink, sources } => {
                write!(f, "added route into '{}' from [{}]", sink, sources.join(", "))
            }
            Patch::RemovedRoute { sink } => write!(f, "removed route into '{}'", sink),
            Patch::A2dpOffloadKept => write!(f, "'{}' already declared, A2DP patch off", A2DP_OUTPUT),
        }
    }
}

/// Apply every enabled patch to `module`, returning what changed.
pub fn apply(module: &mut HwModule, ctx: &mut LoadContext) -> Vec<Patch> {
    let mut patches = Vec::new();

    if ctx.a2dp_offload_disabled() {
        if module.name() == A2DP_MODULE {
            synthesize_a2dp_outputs(module, ctx, &mut patches);
        } else if module.name() == PRIMARY_MODULE {
            strip_a2dp_outputs(module, &mut patches);
        }
    }
    if let Some(patch) = fixup_bt_sco_route(module) {
        patches.push(patch);
    }

    for patch in &patches {
        log::info!("Module '{}': {}", module.name(), patch);
    }
    patches
}

fn a2dp_device(tag_name: &str, device_type: DeviceType) -> Port {
    let mut port = Port::new(
        tag_name,
        PortRole::Sink,
        PortKind::Device(DevicePort {
            device_type,
            address: A2DP_ADDRESS.to_string(),
            encoded_formats: Vec::new(),
        }),
    );
    port.profiles = vec![AudioProfile::new(
        AudioFormat::PCM_16_BIT,
        BTreeSet::from([ChannelMask::OUT_STEREO]),
        BTreeSet::from(A2DP_SAMPLE_RATES),
    )];
    port
}

/// Register `port`, or reuse an existing port carrying the same tag name.
fn add_or_reuse(module: &mut HwModule, port: Port, patches: &mut Vec<Patch>) -> Option<PortId> {
    if let Some(existing) = module.find_port(&port.tag_name) {
        log::warn!(
            "Module '{}': '{}' already declared, not synthesizing it",
            module.name(),
            port.tag_name
        );
        return Some(existing);
    }
    let tag_name = port.tag_name.clone();
    match module.add_port(port) {
        Ok(id) => {
            patches.push(Patch::AddedPort(tag_name));
            Some(id)
        }
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}

fn synthesize_a2dp_outputs(module: &mut HwModule, ctx: &mut LoadContext, patches: &mut Vec<Patch>) {
    if module.mix_ports().any(|(_, port)| port.tag_name == A2DP_OUTPUT) {
        ctx.clear_a2dp_offload_disabled();
        patches.push(Patch::A2dpOffloadKept);
        return;
    }

    let mut output = Port::new(
        A2DP_OUTPUT,
        PortRole::Source,
        PortKind::Mix(MixPort {
            flags: IoFlags::Output(OutputFlags::NONE),
            max_open_count: 1,
            max_active_count: 1,
        }),
    );
    output.profiles = vec![AudioProfile::full_dynamic()];
    let Some(source) = add_or_reuse(module, output, patches) else {
        return;
    };

    for (tag_name, device_type) in A2DP_DEVICES {
        let Some(sink) = add_or_reuse(module, a2dp_device(tag_name, device_type), patches) else {
            continue;
        };
        if module.add_route(RouteType::Mix, sink, vec![source]).is_ok() {
            patches.push(Patch::AddedRoute {
                sink: tag_name.to_string(),
                sources: vec![A2DP_OUTPUT.to_string()],
            });
        }
    }
}

fn strip_a2dp_outputs(module: &mut HwModule, patches: &mut Vec<Patch>) {
    for (tag_name, _) in A2DP_DEVICES {
        if let Some(id) = module.find_device(tag_name) {
            let cascaded = module
                .port(id)
                .map(|port| {
                    port.routes()
                        .filter(|route| module.route(*route).is_some_and(|r| r.sink() == id))
                        .count()
                })
                .unwrap_or(0);
            module.remove_port(id);
            patches.push(Patch::RemovedPort(tag_name.to_string()));
            patches.extend((0..cascaded).map(|_| Patch::RemovedRoute {
                sink: tag_name.to_string(),
            }));
        }

        // A mix port can carry the same name; its mix routes go as well.
        let routes: Vec<_> = module
            .routes_into(tag_name)
            .filter(|(_, route)| route.route_type == RouteType::Mix)
            .map(|(id, _)| id)
            .collect();
        for id in routes {
            module.remove_route(id);
            patches.push(Patch::RemovedRoute {
                sink: tag_name.to_string(),
            });
        }
    }
}

/// Add the missing telephony RX to SCO headset route some vendor
/// configurations leave out.
fn fixup_bt_sco_route(module: &mut HwModule) -> Option<Patch> {
    let sink = module.find_device(BT_SCO_HEADSET)?;

    let mut has_telephony_tx = false;
    let mut has_sco_mic_input = false;
    for (_, route) in module.routes() {
        if route.route_type != RouteType::Mix {
            continue;
        }
        match module.tag_name(route.sink()) {
            Some(TELEPHONY_TX) => has_telephony_tx = true,
            Some(BT_SCO_HEADSET) => return None,
            _ => {
                has_sco_mic_input |= route
                    .sources()
                    .iter()
                    .any(|source| module.tag_name(*source) == Some(BT_SCO_HEADSET_MIC));
            }
        }
    }
    if !has_telephony_tx || !has_sco_mic_input {
        log::debug!(
            "Module '{}': no SCO fixup (telephony tx: {}, SCO mic input: {})",
            module.name(),
            has_telephony_tx,
            has_sco_mic_input
        );
        return None;
    }

    let sources: Vec<PortId> = BT_SCO_SOURCES
        .iter()
        .filter_map(|tag_name| module.find_port(tag_name))
        .collect();
    let names = sources
        .iter()
        .filter_map(|id| module.tag_name(*id))
        .map(str::to_string)
        .collect();
    module.add_route(RouteType::Mix, sink, sources).ok()?;
    Some(Patch::AddedRoute {
        sink: BT_SCO_HEADSET.to_string(),
        sources: names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadOptions;
    use crate::model::HalVersion;

    fn mix(module: &mut HwModule, tag: &str) -> PortId {
        let kind = PortKind::Mix(MixPort {
            flags: IoFlags::Output(OutputFlags::NONE),
            max_open_count: 1,
            max_active_count: 1,
        });
        module.add_port(Port::new(tag, PortRole::Source, kind)).unwrap()
    }

    fn device(module: &mut HwModule, tag: &str, device_type: DeviceType) -> PortId {
        let role = if device_type.is_input_device() {
            PortRole::Source
        } else {
            PortRole::Sink
        };
        let kind = PortKind::Device(DevicePort {
            device_type,
            address: String::new(),
            encoded_formats: Vec::new(),
        });
        module.add_port(Port::new(tag, role, kind)).unwrap()
    }

    fn a2dp_ctx() -> LoadContext {
        LoadContext::new(LoadOptions::new().with_disable_a2dp_offload(true))
    }

    #[test]
    fn test_a2dp_module_synthesized() {
        let mut module = HwModule::new(A2DP_MODULE, HalVersion::new(2, 0));
        let mut ctx = a2dp_ctx();
        let patches = apply(&mut module, &mut ctx);

        assert_eq!(patches.iter().filter(|p| matches!(p, Patch::AddedPort(_))).count(), 4);
        assert_eq!(module.mix_ports().count(), 1);
        assert_eq!(module.device_ports().count(), 3);
        assert_eq!(module.routes().count(), 3);

        let output = module.port_by_tag(A2DP_OUTPUT).unwrap();
        assert_eq!(output.role, PortRole::Source);
        assert!(output.profiles[0].is_full_dynamic());

        for (tag_name, device_type) in A2DP_DEVICES {
            let port = module.port_by_tag(tag_name).unwrap();
            let device = port.as_device().unwrap();
            assert_eq!(device.device_type, device_type);
            assert_eq!(device.address, A2DP_ADDRESS);
            let profile = &port.profiles[0];
            assert_eq!(profile.format, AudioFormat::PCM_16_BIT);
            assert_eq!(profile.channel_masks, BTreeSet::from([ChannelMask::OUT_STEREO]));
            assert_eq!(profile.sample_rates, BTreeSet::from(A2DP_SAMPLE_RATES));

            let (_, route) = module.routes_into(tag_name).next().unwrap();
            assert_eq!(route.sources(), &[module.find_port(A2DP_OUTPUT).unwrap()]);
        }
        assert!(ctx.a2dp_offload_disabled());
    }

    #[test]
    fn test_existing_a2dp_output_turns_patch_off() {
        let mut module = HwModule::new(A2DP_MODULE, HalVersion::default());
        mix(&mut module, A2DP_OUTPUT);
        let mut ctx = a2dp_ctx();
        assert_eq!(apply(&mut module, &mut ctx), vec![Patch::A2dpOffloadKept]);
        assert!(!ctx.a2dp_offload_disabled());
        assert_eq!(module.ports().count(), 1);

        // A later primary module is left alone.
        let mut primary = HwModule::new(PRIMARY_MODULE, HalVersion::default());
        device(&mut primary, "BT A2DP Out", DeviceType::OUT_BLUETOOTH_A2DP);
        assert!(apply(&mut primary, &mut ctx).is_empty());
        assert!(primary.find_device("BT A2DP Out").is_some());
    }

    #[test]
    fn test_primary_module_stripped() {
        let mut module = HwModule::new(PRIMARY_MODULE, HalVersion::default());
        let out = mix(&mut module, "primary output");
        let speaker = device(&mut module, "Speaker", DeviceType::OUT_SPEAKER);
        let a2dp = device(&mut module, "BT A2DP Out", DeviceType::OUT_BLUETOOTH_A2DP);
        let headphones = device(
            &mut module,
            "BT A2DP Headphones",
            DeviceType::OUT_BLUETOOTH_A2DP_HEADPHONES,
        );
        module.add_route(RouteType::Mix, a2dp, vec![out]).unwrap();
        module.add_route(RouteType::Mux, headphones, vec![out]).unwrap();
        module.add_route(RouteType::Mix, speaker, vec![out]).unwrap();

        let mut ctx = a2dp_ctx();
        let patches = apply(&mut module, &mut ctx);

        assert!(patches.contains(&Patch::RemovedPort("BT A2DP Out".to_string())));
        assert!(patches.contains(&Patch::RemovedPort("BT A2DP Headphones".to_string())));
        for (tag_name, _) in A2DP_DEVICES {
            assert!(module.find_port(tag_name).is_none());
            assert_eq!(module.routes_into(tag_name).count(), 0);
        }
        assert_eq!(module.routes().count(), 1);
        assert_eq!(module.port(out).unwrap().routes().count(), 1);
    }

    #[test]
    fn test_other_modules_untouched_by_a2dp_patch() {
        let mut module = HwModule::new("usb", HalVersion::default());
        device(&mut module, "BT A2DP Out", DeviceType::OUT_BLUETOOTH_A2DP);
        assert!(apply(&mut module, &mut a2dp_ctx()).is_empty());
        assert_eq!(module.ports().count(), 1);
    }

    fn sco_module() -> HwModule {
        let mut module = HwModule::new(PRIMARY_MODULE, HalVersion::default());
        mix(&mut module, "primary output");
        let primary_in = mix(&mut module, "primary input");
        let voice_tx = mix(&mut module, "voice_tx");
        device(&mut module, BT_SCO_HEADSET, DeviceType::OUT_BLUETOOTH_SCO_HEADSET);
        let mic = device(&mut module, "Built-In Mic", DeviceType::IN_BUILTIN_MIC);
        let sco_mic = device(&mut module, BT_SCO_HEADSET_MIC, DeviceType::IN_BLUETOOTH_SCO_HEADSET);
        let tx = device(&mut module, TELEPHONY_TX, DeviceType::OUT_TELEPHONY_TX);
        device(&mut module, "Telephony Rx", DeviceType::IN_TELEPHONY_RX);
        module.add_route(RouteType::Mix, primary_in, vec![mic, sco_mic]).unwrap();
        module.add_route(RouteType::Mix, tx, vec![voice_tx]).unwrap();
        module
    }

    #[test]
    fn test_bt_sco_route_added() {
        let mut module = sco_module();
        let patches = apply(&mut module, &mut LoadContext::new(LoadOptions::default()));
        assert_eq!(
            patches,
            vec![Patch::AddedRoute {
                sink: BT_SCO_HEADSET.to_string(),
                sources: vec!["primary output".to_string(), "Telephony Rx".to_string()],
            }]
        );
        let (_, route) = module.routes_into(BT_SCO_HEADSET).next().unwrap();
        assert_eq!(route.route_type, RouteType::Mix);
        let sink = module.find_device(BT_SCO_HEADSET).unwrap();
        assert_eq!(module.port(sink).unwrap().routes().count(), 1);

        // Applying again is a no-op.
        assert!(apply(&mut module, &mut LoadContext::new(LoadOptions::default())).is_empty());
        assert_eq!(module.routes_into(BT_SCO_HEADSET).count(), 1);
    }

    #[test]
    fn test_bt_sco_requires_telephony_route() {
        let mut module = sco_module();
        let tx = module.find_port(TELEPHONY_TX).unwrap();
        let route = module.port(tx).unwrap().routes().next().unwrap();
        module.remove_route(route);
        assert!(apply(&mut module, &mut LoadContext::new(LoadOptions::default())).is_empty());
    }

    #[test]
    fn test_bt_sco_ignores_mux_routes() {
        let mut module = HwModule::new(PRIMARY_MODULE, HalVersion::default());
        let primary_in = mix(&mut module, "primary input");
        let voice_tx = mix(&mut module, "voice_tx");
        device(&mut module, BT_SCO_HEADSET, DeviceType::OUT_BLUETOOTH_SCO_HEADSET);
        let sco_mic = device(&mut module, BT_SCO_HEADSET_MIC, DeviceType::IN_BLUETOOTH_SCO_HEADSET);
        let tx = device(&mut module, TELEPHONY_TX, DeviceType::OUT_TELEPHONY_TX);
        module.add_route(RouteType::Mux, primary_in, vec![sco_mic]).unwrap();
        module.add_route(RouteType::Mix, tx, vec![voice_tx]).unwrap();
        assert!(apply(&mut module, &mut LoadContext::new(LoadOptions::default())).is_empty());
    }
}
