//! Global settings and the surround format table.
//!
//! ```xml
//! <globalConfiguration speaker_drc_enabled="true" call_screen_mode_supported="false"
//!                      engine_library="configurable"/>
//! <surroundSound>
//!     <formats>
//!         <format name="AUDIO_FORMAT_AC3"/>
//!         <format name="AUDIO_FORMAT_AAC_LC"
//!                 subformats="AUDIO_FORMAT_AAC_HE_V1 AUDIO_FORMAT_AAC_HE_V2"/>
//!     </formats>
//! </surroundSound>
//! ```

use std::collections::BTreeSet;

use crate::context::LoadContext;
use crate::model::{GlobalConfig, SurroundFormats};
use crate::types::AudioFormat;
use crate::types::format::formats_from_str;
use crate::xml::deserialize::{DeserializeError, EntitySchema, deserialize_collection};
use crate::xml::quick::XmlElement;

pub const GLOBAL_CONFIGURATION_TAG: &str = "globalConfiguration";
pub const SPEAKER_DRC_ENABLED: &str = "speaker_drc_enabled";
pub const CALL_SCREEN_MODE_SUPPORTED: &str = "call_screen_mode_supported";
pub const ENGINE_LIBRARY: &str = "engine_library";

pub const SURROUND_SOUND_TAG: &str = "surroundSound";
pub const NAME: &str = "name";
pub const SUBFORMATS: &str = "subformats";

/// Read the first `globalConfiguration` element under `root` into `config`.
///
/// Each setting keeps its current value when absent or malformed.
pub fn deserialize_global_config(root: &XmlElement, config: &mut GlobalConfig) {
    let Some(element) = root.child(GLOBAL_CONFIGURATION_TAG) else {
        log::debug!("No <{}>, using defaults", GLOBAL_CONFIGURATION_TAG);
        return;
    };
    let attrs = element.attrs();
    if let Some(value) = attrs.get_bool(SPEAKER_DRC_ENABLED) {
        config.speaker_drc_enabled = value;
    }
    if let Some(value) = attrs.get_bool(CALL_SCREEN_MODE_SUPPORTED) {
        config.call_screen_mode_supported = value;
    }
    if let Some(suffix) = attrs.get_non_empty(ENGINE_LIBRARY) {
        config.engine_library_suffix = Some(suffix.to_string());
    }
}

/// Schema of surround `<format>` entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurroundFormatSchema;

impl EntitySchema for SurroundFormatSchema {
    type Entity = (AudioFormat, BTreeSet<AudioFormat>);
    type Collection = SurroundFormats;

    const TAG: &'static str = "format";
    const COLLECTION_TAG: &'static str = "formats";

    fn parse(
        &self,
        element: &XmlElement,
        _formats: &SurroundFormats,
        _ctx: &mut LoadContext,
    ) -> Result<Self::Entity, DeserializeError> {
        let attrs = element.attrs();
        let literal = attrs.get_req(NAME)?;
        let format = AudioFormat::from_name(literal)
            .filter(|format| !format.is_dynamic())
            .ok_or_else(|| DeserializeError::InvalidValue {
                field: format!("{}@{}", Self::TAG, NAME),
                value: literal.to_string(),
            })?;

        let mut subformats = BTreeSet::new();
        for subformat in formats_from_str(attrs.get(SUBFORMATS), &[' ']) {
            if !subformats.insert(subformat) {
                return Err(DeserializeError::InvalidValue {
                    field: format!("{}@{}", Self::TAG, SUBFORMATS),
                    value: format!("{} listed twice for {}", subformat, format),
                });
            }
        }
        Ok((format, subformats))
    }

    fn insert(
        &self,
        (format, subformats): Self::Entity,
        formats: &mut SurroundFormats,
    ) -> Result<(), DeserializeError> {
        if formats.contains_key(&format) {
            return Err(DeserializeError::Duplicate(format.to_string()));
        }
        formats.insert(format, subformats);
        Ok(())
    }
}

/// Replace `formats` with the table of the first `surroundSound` element under
/// `root`. Without one, `formats` is left as is.
pub fn deserialize_surround_sound(
    root: &XmlElement,
    formats: &mut SurroundFormats,
    ctx: &mut LoadContext,
) -> Result<(), DeserializeError> {
    let Some(element) = root.child(SURROUND_SOUND_TAG) else {
        log::debug!("No <{}>, using the built-in table", SURROUND_SOUND_TAG);
        return Ok(());
    };
    let mut declared = SurroundFormats::new();
    deserialize_collection(&SurroundFormatSchema, element, &mut declared, ctx)?;
    *formats = declared;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadOptions;
    use crate::model::default_surround_formats;
    use crate::xml::quick::parse_document;

    #[test]
    fn test_global_config() {
        let root = parse_document(
            r#"<audioPolicyConfiguration>
                <globalConfiguration speaker_drc_enabled="true" call_screen_mode_supported="yes"
                                     engine_library="configurable"/>
                <globalConfiguration speaker_drc_enabled="false"/>
            </audioPolicyConfiguration>"#,
        )
        .unwrap();
        let mut config = GlobalConfig::default();
        deserialize_global_config(&root, &mut config);
        assert!(config.speaker_drc_enabled);
        assert!(!config.call_screen_mode_supported);
        assert_eq!(config.engine_library_suffix.as_deref(), Some("configurable"));
    }

    #[test]
    fn test_global_config_absent() {
        let root = parse_document("<audioPolicyConfiguration/>").unwrap();
        let mut config = GlobalConfig::default();
        deserialize_global_config(&root, &mut config);
        assert_eq!(config, GlobalConfig::default());
    }

    #[test]
    fn test_surround_table_replaces_default() {
        let root = parse_document(
            r#"<audioPolicyConfiguration><surroundSound><formats>
                <format name="AUDIO_FORMAT_AC3"/>
                <format name="AUDIO_FORMAT_AAC_LC" subformats="AUDIO_FORMAT_AAC_HE_V1 AUDIO_FORMAT_AAC_ELD"/>
                <format name="AUDIO_FORMAT_AC3" subformats="AUDIO_FORMAT_E_AC3"/>
                <format name="AUDIO_FORMAT_DTS" subformats="AUDIO_FORMAT_AC3 AUDIO_FORMAT_AC3"/>
                <format name="AUDIO_FORMAT_UNHEARD_OF"/>
                <format name="AUDIO_FORMAT_DEFAULT"/>
                <format/>
            </formats></surroundSound></audioPolicyConfiguration>"#,
        )
        .unwrap();
        let mut ctx = LoadContext::new(LoadOptions::default());
        let mut formats = default_surround_formats();
        deserialize_surround_sound(&root, &mut formats, &mut ctx).unwrap();

        assert_eq!(formats.len(), 2);
        assert!(formats[&AudioFormat::AC3].is_empty());
        assert_eq!(
            formats[&AudioFormat::AAC_LC],
            BTreeSet::from([AudioFormat::AAC_HE_V1, AudioFormat::AAC_ELD])
        );
    }

    #[test]
    fn test_surround_absent_or_empty() {
        let mut ctx = LoadContext::new(LoadOptions::default());

        let root = parse_document("<audioPolicyConfiguration/>").unwrap();
        let mut formats = default_surround_formats();
        deserialize_surround_sound(&root, &mut formats, &mut ctx).unwrap();
        assert_eq!(formats, default_surround_formats());

        let root = parse_document("<audioPolicyConfiguration><surroundSound/></audioPolicyConfiguration>")
            .unwrap();
        deserialize_surround_sound(&root, &mut formats, &mut ctx).unwrap();
        assert!(formats.is_empty());
    }
}
