//! Module deserialization and graph assembly.
//!
//! ```xml
//! <module name="primary" halVersion="3.0">
//!     <attachedDevices>
//!         <item>Speaker</item>
//!     </attachedDevices>
//!     <defaultOutputDevice>Speaker</defaultOutputDevice>
//!     <mixPorts>...</mixPorts>
//!     <devicePorts>...</devicePorts>
//!     <routes>...</routes>
//! </module>
//! ```

use crate::context::LoadContext;
use crate::model::{HalVersion, HwModule, HwModuleCollection};
use crate::quirks;
use crate::xml::deserialize::ports::{DevicePortSchema, MixPortSchema};
use crate::xml::deserialize::route::RouteSchema;
use crate::xml::deserialize::{DeserializeError, EntitySchema, deserialize_collection};
use crate::xml::quick::XmlElement;

pub const NAME: &str = "name";
pub const HAL_VERSION: &str = "halVersion";

pub const ATTACHED_DEVICES_TAG: &str = "attachedDevices";
pub const ATTACHED_DEVICE_TAG: &str = "item";
pub const DEFAULT_OUTPUT_DEVICE_TAG: &str = "defaultOutputDevice";

/// Device attached automatically when an earpiece profile was corrected.
pub const EARPIECE_TAG: &str = "Earpiece";

/// Schema of `<module>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleSchema;

impl ModuleSchema {
    fn attach_declared_devices(element: &XmlElement, module: &mut HwModule) {
        let items = element
            .children_named(ATTACHED_DEVICES_TAG)
            .flat_map(|list| list.children_named(ATTACHED_DEVICE_TAG));
        for item in items {
            let tag_name = item.text();
            match module.find_device(tag_name) {
                Some(id) => {
                    module.attach_device(id);
                }
                None => log::warn!(
                    "Module '{}': attached device '{}' is not declared",
                    module.name(),
                    tag_name
                ),
            }
        }
    }

    fn set_default_output_device(element: &XmlElement, module: &mut HwModule) {
        for declared in element.children_named(DEFAULT_OUTPUT_DEVICE_TAG) {
            let tag_name = declared.text();
            let Some(id) = module.find_device(tag_name) else {
                log::warn!(
                    "Module '{}': default output device '{}' is not declared",
                    module.name(),
                    tag_name
                );
                continue;
            };
            if module.default_output_device().is_none() {
                module.set_default_output_device(id);
            }
        }
    }
}

impl EntitySchema for ModuleSchema {
    type Entity = HwModule;
    type Collection = HwModuleCollection;

    const TAG: &'static str = "module";
    const COLLECTION_TAG: &'static str = "modules";

    fn parse(
        &self,
        element: &XmlElement,
        _modules: &HwModuleCollection,
        ctx: &mut LoadContext,
    ) -> Result<HwModule, DeserializeError> {
        let attrs = element.attrs();
        let name = attrs.get_req(NAME)?;
        let version = attrs
            .get_non_empty(HAL_VERSION)
            .map(HalVersion::parse_loose)
            .unwrap_or_default();
        log::debug!("Module '{}' (HAL {})", name, version);

        let mut module = HwModule::new(name, version);
        ctx.take_earpiece_channels_fixed();

        // Routes resolve against ports, so the order matters.
        deserialize_collection(&MixPortSchema, element, &mut module, ctx)?;
        deserialize_collection(&DevicePortSchema, element, &mut module, ctx)?;
        deserialize_collection(&RouteSchema, element, &mut module, ctx)?;

        quirks::apply(&mut module, ctx);

        Self::attach_declared_devices(element, &mut module);
        Self::set_default_output_device(element, &mut module);

        if ctx.take_earpiece_channels_fixed() {
            if let Some(id) = module.find_device(EARPIECE_TAG) {
                log::info!("Module '{}': attaching corrected '{}'", module.name(), EARPIECE_TAG);
                module.attach_device(id);
            }
        }

        Ok(module)
    }

    fn insert(
        &self,
        entity: HwModule,
        modules: &mut HwModuleCollection,
    ) -> Result<(), DeserializeError> {
        modules.add(entity)?;
        Ok(())
    }
}
