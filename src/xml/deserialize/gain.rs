//! Gain deserialization.
//!
//! ```xml
//! <gains>
//!     <gain name="gain_1" mode="AUDIO_GAIN_MODE_JOINT"
//!           minValueMB="-8400" maxValueMB="4000" defaultValueMB="0" stepValueMB="100"/>
//! </gains>
//! ```

use crate::context::LoadContext;
use crate::model::AudioGain;
use crate::types::{ChannelMask, GainMode};
use crate::xml::deserialize::{DeserializeError, EntitySchema};
use crate::xml::quick::XmlElement;

pub const MODE: &str = "mode";
pub const CHANNEL_MASK: &str = "channel_mask";
pub const MIN_VALUE_MB: &str = "minValueMB";
pub const MAX_VALUE_MB: &str = "maxValueMB";
pub const DEFAULT_VALUE_MB: &str = "defaultValueMB";
pub const STEP_VALUE_MB: &str = "stepValueMB";
pub const MIN_RAMP_MS: &str = "minRampMs";
pub const MAX_RAMP_MS: &str = "maxRampMs";
pub const USE_FOR_VOLUME: &str = "useForVolume";

/// Schema of `<gain>` elements nested in a port.
#[derive(Debug, Clone, Copy, Default)]
pub struct GainSchema;

impl EntitySchema for GainSchema {
    type Entity = AudioGain;
    type Collection = Vec<AudioGain>;

    const TAG: &'static str = "gain";
    const COLLECTION_TAG: &'static str = "gains";

    fn parse(
        &self,
        element: &XmlElement,
        _collection: &Self::Collection,
        ctx: &mut LoadContext,
    ) -> Result<AudioGain, DeserializeError> {
        let attrs = element.attrs();

        let mode = GainMode::from_str_mask(attrs.get(MODE));
        if mode.is_empty() {
            return Err(DeserializeError::InvalidValue {
                field: format!("{}@{}", Self::TAG, MODE),
                value: attrs.get(MODE).to_string(),
            });
        }

        let mut gain = AudioGain::new(0);
        gain.mode = mode;
        if let Some(name) = attrs.get_non_empty(CHANNEL_MASK) {
            match ChannelMask::from_name(name) {
                Some(mask) => gain.channel_mask = mask,
                None => log::warn!("Unknown gain channel mask '{}'", name),
            }
        }
        attrs.read_into(MIN_VALUE_MB, &mut gain.min_value_mb);
        attrs.read_into(MAX_VALUE_MB, &mut gain.max_value_mb);
        attrs.read_into(DEFAULT_VALUE_MB, &mut gain.default_value_mb);
        attrs.read_into(STEP_VALUE_MB, &mut gain.step_value_mb);
        attrs.read_into(MIN_RAMP_MS, &mut gain.min_ramp_ms);
        attrs.read_into(MAX_RAMP_MS, &mut gain.max_ramp_ms);
        gain.use_for_volume = attrs.get_bool_or(USE_FOR_VOLUME, false);

        gain.index = ctx.next_gain_index();
        log::trace!(
            "Gain #{} mode {} channels {} range [{}, {}] mB volume={}",
            gain.index,
            gain.mode,
            gain.channel_mask,
            gain.min_value_mb,
            gain.max_value_mb,
            gain.use_for_volume
        );
        Ok(gain)
    }

    fn insert(
        &self,
        entity: AudioGain,
        collection: &mut Self::Collection,
    ) -> Result<(), DeserializeError> {
        collection.push(entity);
        Ok(())
    }
}
