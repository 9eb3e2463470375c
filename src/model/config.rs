use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::model::ModelError;
use crate::model::module::HwModule;
use crate::model::port::{Port, PortId};
use crate::types::AudioFormat;

/// Surround formats mapped to the subformats they cover.
pub type SurroundFormats = BTreeMap<AudioFormat, BTreeSet<AudioFormat>>;

/// The surround table used when a document declares none.
pub fn default_surround_formats() -> SurroundFormats {
    BTreeMap::from([
        (AudioFormat::AC3, BTreeSet::new()),
        (AudioFormat::E_AC3, BTreeSet::new()),
        (AudioFormat::DTS, BTreeSet::new()),
        (AudioFormat::DTS_HD, BTreeSet::new()),
        (
            AudioFormat::AAC_LC,
            BTreeSet::from([
                AudioFormat::AAC_HE_V1,
                AudioFormat::AAC_HE_V2,
                AudioFormat::AAC_ELD,
                AudioFormat::AAC_XHE,
            ]),
        ),
        (AudioFormat::DOLBY_TRUEHD, BTreeSet::new()),
        (AudioFormat::E_AC3_JOC, BTreeSet::new()),
        (AudioFormat::AC4, BTreeSet::new()),
    ])
}

/// Settings of the `globalConfiguration` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlobalConfig {
    pub speaker_drc_enabled: bool,
    pub call_screen_mode_supported: bool,
    /// Suffix selecting the policy engine library, if overridden.
    pub engine_library_suffix: Option<String>,
}

/// A device port addressed across modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceRef {
    pub module: usize,
    pub port: PortId,
}

/// The module list of a configuration, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HwModuleCollection {
    modules: Vec<HwModule>,
    default_output_device: Option<DeviceRef>,
}

impl HwModuleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Names are unique.
    ///
    /// The first registered module declaring a default output device provides
    /// the configuration-wide default; later declarations are ignored.
    pub fn add(&mut self, module: HwModule) -> Result<usize, ModelError> {
        if self.get(module.name()).is_some() {
            return Err(ModelError::DuplicateModule(module.name().to_string()));
        }
        let index = self.modules.len();
        if self.default_output_device.is_none() {
            if let Some(port) = module.default_output_device() {
                log::debug!(
                    "Default output device is {}/{}",
                    module.name(),
                    module.tag_name(port).unwrap_or_default()
                );
                self.default_output_device = Some(DeviceRef {
                    module: index,
                    port,
                });
            }
        }
        self.modules.push(module);
        Ok(index)
    }

    pub fn get(&self, name: &str) -> Option<&HwModule> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HwModule> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn default_output_device(&self) -> Option<DeviceRef> {
        self.default_output_device
    }

    /// Resolve a cross-module device reference.
    pub fn device(&self, device: DeviceRef) -> Option<(&HwModule, &Port)> {
        let module = self.modules.get(device.module)?;
        module.port(device.port).map(|port| (module, port))
    }
}

/// A fully loaded audio policy configuration.
///
/// Produced once by the loader and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPolicyConfig {
    pub(crate) source: Option<PathBuf>,
    pub(crate) modules: HwModuleCollection,
    pub(crate) global: GlobalConfig,
    pub(crate) surround_formats: SurroundFormats,
    pub(crate) next_gain_index: u32,
}

impl AudioPolicyConfig {
    pub(crate) fn new(source: Option<PathBuf>) -> Self {
        Self {
            source,
            modules: HwModuleCollection::new(),
            global: GlobalConfig::default(),
            surround_formats: default_surround_formats(),
            next_gain_index: 0,
        }
    }

    /// The file this configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn modules(&self) -> &HwModuleCollection {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&HwModule> {
        self.modules.get(name)
    }

    pub fn global(&self) -> &GlobalConfig {
        &self.global
    }

    pub fn surround_formats(&self) -> &SurroundFormats {
        &self.surround_formats
    }

    /// The index the next gain would have received. Seeding a later load with
    /// it keeps gain indices unique across loads.
    pub fn next_gain_index(&self) -> u32 {
        self.next_gain_index
    }

    /// The configuration-wide default output device.
    pub fn default_output_device(&self) -> Option<(&HwModule, &Port)> {
        self.modules
            .default_output_device()
            .and_then(|device| self.modules.device(device))
    }

    /// Attached devices of every module, in module order.
    pub fn attached_devices(&self) -> impl Iterator<Item = (&HwModule, &Port)> {
        self.modules
            .iter()
            .flat_map(|module| module.attached_devices().map(move |(_, port)| (module, port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::module::HalVersion;
    use crate::model::port::{DevicePort, PortKind, PortRole};
    use crate::types::DeviceType;

    fn module_with_default(name: &str, device: &str) -> HwModule {
        let mut module = HwModule::new(name, HalVersion::default());
        let id = module
            .add_port(Port::new(
                device,
                PortRole::Sink,
                PortKind::Device(DevicePort {
                    device_type: DeviceType::OUT_SPEAKER,
                    address: String::new(),
                    encoded_formats: Vec::new(),
                }),
            ))
            .unwrap();
        module.set_default_output_device(id);
        module
    }

    #[test]
    fn test_first_default_output_wins() {
        let mut modules = HwModuleCollection::new();
        modules.add(HwModule::new("empty", HalVersion::default())).unwrap();
        modules.add(module_with_default("primary", "Speaker")).unwrap();
        modules.add(module_with_default("usb", "USB Device Out")).unwrap();

        let device = modules.default_output_device().unwrap();
        let (module, port) = modules.device(device).unwrap();
        assert_eq!(module.name(), "primary");
        assert_eq!(port.tag_name, "Speaker");
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let mut modules = HwModuleCollection::new();
        modules.add(HwModule::new("primary", HalVersion::default())).unwrap();
        assert!(matches!(
            modules.add(module_with_default("primary", "Speaker")),
            Err(ModelError::DuplicateModule(_))
        ));
        assert_eq!(modules.len(), 1);
        assert!(modules.default_output_device().is_none());
    }

    #[test]
    fn test_default_surround_table() {
        let table = default_surround_formats();
        assert_eq!(table.len(), 8);
        assert_eq!(table[&AudioFormat::AAC_LC].len(), 4);
        assert!(table[&AudioFormat::AC3].is_empty());
    }
}
