//! Mix port and device port deserialization.
//!
//! ```xml
//! <mixPorts>
//!     <mixPort name="primary output" role="source" flags="AUDIO_OUTPUT_FLAG_PRIMARY">
//!         <profile format="AUDIO_FORMAT_PCM_16_BIT" samplingRates="48000"
//!                  channelMasks="AUDIO_CHANNEL_OUT_STEREO"/>
//!     </mixPort>
//! </mixPorts>
//! <devicePorts>
//!     <devicePort tagName="Speaker" type="AUDIO_DEVICE_OUT_SPEAKER" role="sink"/>
//! </devicePorts>
//! ```
//!
//! Both kinds are registered in the module under construction, sharing one
//! tag name namespace.

use crate::context::LoadContext;
use crate::model::{AudioGain, DevicePort, HwModule, MixPort, Port, PortKind, PortRole};
use crate::types::format::formats_from_str;
use crate::types::{DeviceType, InputFlags, IoFlags, OutputFlags};
use crate::xml::deserialize::gain::GainSchema;
use crate::xml::deserialize::profile::deserialize_port_profiles;
use crate::xml::deserialize::{DeserializeError, EntitySchema, deserialize_collection};
use crate::xml::quick::XmlElement;

pub const NAME: &str = "name";
pub const TAG_NAME: &str = "tagName";
pub const ROLE: &str = "role";
pub const FLAGS: &str = "flags";
pub const MAX_OPEN_COUNT: &str = "maxOpenCount";
pub const MAX_ACTIVE_COUNT: &str = "maxActiveCount";
pub const TYPE: &str = "type";
pub const ADDRESS: &str = "address";
pub const ENCODED_FORMATS: &str = "encodedFormats";

/// Default for both `maxOpenCount` and `maxActiveCount`.
pub const DEFAULT_MAX_COUNT: u32 = 1;

fn deserialize_gains(
    port: &XmlElement,
    ctx: &mut LoadContext,
) -> Result<Vec<AudioGain>, DeserializeError> {
    let mut gains = Vec::new();
    deserialize_collection(&GainSchema, port, &mut gains, ctx)?;
    Ok(gains)
}

fn insert_port(module: &mut HwModule, port: Port) -> Result<(), DeserializeError> {
    let tag_name = port.tag_name.clone();
    let id = module.add_port(port)?;
    log::debug!(
        "Module '{}': port #{} '{}'",
        module.name(),
        id.index(),
        tag_name
    );
    Ok(())
}

/// Schema of `<mixPort>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MixPortSchema;

impl EntitySchema for MixPortSchema {
    type Entity = Port;
    type Collection = HwModule;

    const TAG: &'static str = "mixPort";
    const COLLECTION_TAG: &'static str = "mixPorts";

    fn parse(
        &self,
        element: &XmlElement,
        _module: &HwModule,
        ctx: &mut LoadContext,
    ) -> Result<Port, DeserializeError> {
        let attrs = element.attrs();
        let name = attrs.get_req(NAME)?;
        let role = PortRole::from_literal(attrs.get_req(ROLE)?);

        // The flag vocabulary follows the direction of the stream.
        let flags = match role {
            PortRole::Source => IoFlags::Output(OutputFlags::from_str_mask(attrs.get(FLAGS))),
            PortRole::Sink => IoFlags::Input(InputFlags::from_str_mask(attrs.get(FLAGS))),
        };

        let mut mix = MixPort {
            flags,
            max_open_count: DEFAULT_MAX_COUNT,
            max_active_count: DEFAULT_MAX_COUNT,
        };
        attrs.read_into(MAX_OPEN_COUNT, &mut mix.max_open_count);
        attrs.read_into(MAX_ACTIVE_COUNT, &mut mix.max_active_count);

        let mut port = Port::new(name, role, PortKind::Mix(mix));
        port.profiles = deserialize_port_profiles(element, false, ctx)?;
        port.gains = deserialize_gains(element, ctx)?;
        Ok(port)
    }

    fn insert(&self, entity: Port, module: &mut HwModule) -> Result<(), DeserializeError> {
        insert_port(module, entity)
    }
}

/// Schema of `<devicePort>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevicePortSchema;

impl DevicePortSchema {
    /// Sources must be capture devices and sinks playback devices.
    pub fn role_accepts(role: PortRole, device_type: DeviceType) -> bool {
        match role {
            PortRole::Source => device_type.is_input_device(),
            PortRole::Sink => device_type.is_output_device(),
        }
    }
}

impl EntitySchema for DevicePortSchema {
    type Entity = Port;
    type Collection = HwModule;

    const TAG: &'static str = "devicePort";
    const COLLECTION_TAG: &'static str = "devicePorts";

    fn parse(
        &self,
        element: &XmlElement,
        _module: &HwModule,
        ctx: &mut LoadContext,
    ) -> Result<Port, DeserializeError> {
        let attrs = element.attrs();
        let tag_name = attrs.get_req(TAG_NAME)?;
        let type_name = attrs.get_req(TYPE)?;
        let role = PortRole::from_literal(attrs.get_req(ROLE)?);

        let device_type = DeviceType::from_name(type_name)
            .filter(|device_type| Self::role_accepts(role, *device_type))
            .ok_or_else(|| DeserializeError::InvalidValue {
                field: format!("{}@{}", Self::TAG, TYPE),
                value: format!("{} (role {})", type_name, role.as_str()),
            })?;

        let device = DevicePort {
            device_type,
            address: attrs.get(ADDRESS).to_string(),
            encoded_formats: formats_from_str(attrs.get(ENCODED_FORMATS), &[' ']),
        };

        let mut port = Port::new(tag_name, role, PortKind::Device(device));
        port.profiles =
            deserialize_port_profiles(element, device_type.is_output_device(), ctx)?;
        port.gains = deserialize_gains(element, ctx)?;
        Ok(port)
    }

    fn insert(&self, entity: Port, module: &mut HwModule) -> Result<(), DeserializeError> {
        insert_port(module, entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadOptions;
    use crate::model::{AudioProfile, HalVersion};
    use crate::types::{AudioFormat, ChannelMask};
    use crate::xml::quick::parse_document;

    fn load(xml: &str) -> (HwModule, LoadContext) {
        let root = parse_document(xml).unwrap();
        let mut ctx = LoadContext::new(LoadOptions::default());
        let mut module = HwModule::new("primary", HalVersion::default());
        deserialize_collection(&MixPortSchema, &root, &mut module, &mut ctx).unwrap();
        deserialize_collection(&DevicePortSchema, &root, &mut module, &mut ctx).unwrap();
        (module, ctx)
    }

    #[test]
    fn test_mix_port_flags_follow_role() {
        let (module, _) = load(
            r#"<module><mixPorts>
                <mixPort name="primary output" role="source"
                         flags="AUDIO_OUTPUT_FLAG_PRIMARY|AUDIO_OUTPUT_FLAG_DEEP_BUFFER"/>
                <mixPort name="primary input" role="sink" flags="AUDIO_INPUT_FLAG_FAST"
                         maxOpenCount="2" maxActiveCount="oops"/>
            </mixPorts></module>"#,
        );

        let output = module.port_by_tag("primary output").unwrap();
        let mix = output.as_mix().unwrap();
        match mix.flags {
            IoFlags::Output(flags) => {
                assert!(flags.contains(OutputFlags::PRIMARY));
                assert!(flags.contains(OutputFlags::DEEP_BUFFER));
            }
            IoFlags::Input(_) => panic!("source mix port must carry output flags"),
        }
        assert_eq!(mix.max_open_count, DEFAULT_MAX_COUNT);
        assert_eq!(output.profiles, vec![AudioProfile::full_dynamic()]);

        let input = module.port_by_tag("primary input").unwrap();
        let mix = input.as_mix().unwrap();
        assert_eq!(mix.flags, IoFlags::Input(InputFlags::FAST));
        assert_eq!(mix.max_open_count, 2);
        assert_eq!(mix.max_active_count, DEFAULT_MAX_COUNT);
    }

    #[test]
    fn test_mix_port_requires_name_and_role() {
        let (module, _) = load(
            r#"<module>
                <mixPort role="source"/>
                <mixPort name="no role"/>
                <mixPort name="ok" role="sink"/>
            </module>"#,
        );
        let tags: Vec<_> = module.ports().map(|(_, p)| p.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["ok"]);
    }

    #[test]
    fn test_device_port_attributes() {
        let (module, _) = load(
            r#"<module><devicePorts>
                <devicePort tagName="HDMI Out" type="AUDIO_DEVICE_OUT_SPEAKER" role="sink"
                            address="hdmi_0" encodedFormats="AUDIO_FORMAT_AC3 BOGUS AUDIO_FORMAT_E_AC3">
                    <gains><gain mode="AUDIO_GAIN_MODE_JOINT"/></gains>
                </devicePort>
            </devicePorts></module>"#,
        );
        let port = module.port_by_tag("HDMI Out").unwrap();
        let device = port.as_device().unwrap();
        assert_eq!(device.device_type, DeviceType::OUT_SPEAKER);
        assert_eq!(device.address, "hdmi_0");
        assert_eq!(device.encoded_formats, vec![AudioFormat::AC3, AudioFormat::E_AC3]);
        assert_eq!(port.gains.len(), 1);
    }

    #[test]
    fn test_device_role_must_match_type() {
        let (module, _) = load(
            r#"<module>
                <devicePort tagName="Bad Mic" type="AUDIO_DEVICE_IN_BUILTIN_MIC" role="sink"/>
                <devicePort tagName="Bad Speaker" type="AUDIO_DEVICE_OUT_SPEAKER" role="source"/>
                <devicePort tagName="Unknown" type="AUDIO_DEVICE_OUT_NOWHERE" role="sink"/>
                <devicePort tagName="Built-In Mic" type="AUDIO_DEVICE_IN_BUILTIN_MIC" role="source"/>
            </module>"#,
        );
        let tags: Vec<_> = module.device_ports().map(|(_, p)| p.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["Built-In Mic"]);
    }

    #[test]
    fn test_duplicate_tag_across_kinds() {
        let (module, _) = load(
            r#"<module>
                <mixPort name="Speaker" role="source"/>
                <devicePort tagName="Speaker" type="AUDIO_DEVICE_OUT_SPEAKER" role="sink"/>
            </module>"#,
        );
        let port = module.port_by_tag("Speaker").unwrap();
        assert!(port.is_mix());
        assert_eq!(module.ports().count(), 1);
    }

    #[test]
    fn test_output_device_context_reaches_profiles() {
        let (module, mut ctx) = load(
            r#"<module>
                <devicePort tagName="Earpiece" type="AUDIO_DEVICE_OUT_EARPIECE" role="sink">
                    <profile format="AUDIO_FORMAT_PCM_16_BIT" channelMasks="AUDIO_CHANNEL_IN_MONO"/>
                </devicePort>
            </module>"#,
        );
        let port = module.port_by_tag("Earpiece").unwrap();
        assert!(port.profiles[0].channel_masks.contains(&ChannelMask::OUT_MONO));
        assert!(ctx.take_earpiece_channels_fixed());
    }
}
