//! Audio profile deserialization.
//!
//! ```xml
//! <profile name="" format="AUDIO_FORMAT_PCM_16_BIT"
//!          samplingRates="44100,48000" channelMasks="AUDIO_CHANNEL_OUT_STEREO"/>
//! ```

use std::collections::BTreeSet;

use crate::context::LoadContext;
use crate::model::{AudioProfile, normalize_profiles};
use crate::types::channel::masks_from_str;
use crate::types::{AudioFormat, ChannelMask, split_list};
use crate::xml::deserialize::{DeserializeError, EntitySchema, deserialize_collection};
use crate::xml::quick::XmlElement;

pub const SAMPLING_RATES: &str = "samplingRates";
pub const FORMAT: &str = "format";
pub const CHANNEL_MASKS: &str = "channelMasks";

/// Schema of `<profile>` elements nested in a port.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileSchema {
    /// The owning port is an output device. Some vendor configurations
    /// declare their earpiece with the input mono mask; in this context a
    /// lone `AUDIO_CHANNEL_IN_MONO` is read as `AUDIO_CHANNEL_OUT_MONO`.
    pub output_device: bool,
}

impl ProfileSchema {
    pub fn for_output_device(output_device: bool) -> Self {
        Self { output_device }
    }
}

/// Parse a comma-separated sample rate list, skipping malformed entries.
pub fn sample_rates_from_str(literal: &str) -> BTreeSet<u32> {
    split_list(literal, &[','])
        .filter_map(|token| match token.parse::<u32>() {
            Ok(rate) => Some(rate),
            Err(_) => {
                log::warn!("Invalid sampling rate '{}'", token);
                None
            }
        })
        .collect()
}

impl EntitySchema for ProfileSchema {
    type Entity = AudioProfile;
    type Collection = Vec<AudioProfile>;

    const TAG: &'static str = "profile";
    const COLLECTION_TAG: &'static str = "profiles";

    fn parse(
        &self,
        element: &XmlElement,
        _collection: &Self::Collection,
        ctx: &mut LoadContext,
    ) -> Result<AudioProfile, DeserializeError> {
        let attrs = element.attrs();
        let format = AudioFormat::from_name_or(attrs.get(FORMAT), AudioFormat::DEFAULT);
        let mut channel_masks = masks_from_str(attrs.get(CHANNEL_MASKS));
        let sample_rates = sample_rates_from_str(attrs.get(SAMPLING_RATES));

        if self.output_device
            && channel_masks.len() == 1
            && channel_masks.contains(&ChannelMask::IN_MONO)
        {
            log::info!("Replacing input mono channel mask of an output device profile");
            channel_masks = BTreeSet::from([ChannelMask::OUT_MONO]);
            ctx.mark_earpiece_channels_fixed();
        }

        Ok(AudioProfile::new(format, channel_masks, sample_rates))
    }

    fn insert(
        &self,
        entity: AudioProfile,
        collection: &mut Self::Collection,
    ) -> Result<(), DeserializeError> {
        collection.push(entity);
        Ok(())
    }
}

/// Parse the profiles of a port: never empty, sorted by format.
pub fn deserialize_port_profiles(
    port: &XmlElement,
    output_device: bool,
    ctx: &mut LoadContext,
) -> Result<Vec<AudioProfile>, DeserializeError> {
    let mut profiles = Vec::new();
    deserialize_collection(
        &ProfileSchema::for_output_device(output_device),
        port,
        &mut profiles,
        ctx,
    )?;
    normalize_profiles(&mut profiles);
    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadOptions;
    use crate::xml::quick::parse_document;
    use proptest::prelude::*;

    fn profiles(xml: &str, output_device: bool, ctx: &mut LoadContext) -> Vec<AudioProfile> {
        let root = parse_document(xml).unwrap();
        deserialize_port_profiles(&root, output_device, ctx).unwrap()
    }

    #[test]
    fn test_profile_lists() {
        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(
            r#"<mixPort><profile format="AUDIO_FORMAT_PCM_16_BIT" samplingRates="48000, 44100"
                 channelMasks="AUDIO_CHANNEL_OUT_STEREO,AUDIO_CHANNEL_OUT_MONO"/></mixPort>"#,
            false,
            &mut ctx,
        );
        assert_eq!(parsed.len(), 1);
        let profile = &parsed[0];
        assert_eq!(profile.format, AudioFormat::PCM_16_BIT);
        assert_eq!(profile.sample_rates, BTreeSet::from([44100, 48000]));
        assert_eq!(profile.channel_masks.len(), 2);
        assert!(!profile.dynamic_format && !profile.dynamic_channels && !profile.dynamic_rates);
    }

    #[test]
    fn test_missing_lists_are_dynamic() {
        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(r#"<mixPort><profile name=""/></mixPort>"#, false, &mut ctx);
        assert!(parsed[0].is_full_dynamic());
    }

    #[test]
    fn test_empty_collection_gets_dynamic_profile() {
        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(r#"<mixPort/>"#, false, &mut ctx);
        assert_eq!(parsed, vec![AudioProfile::full_dynamic()]);
    }

    #[test]
    fn test_sorted_by_format() {
        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(
            r#"<mixPort><profiles>
                <profile format="AUDIO_FORMAT_AC3"/>
                <profile format="AUDIO_FORMAT_PCM_FLOAT"/>
                <profile format="AUDIO_FORMAT_PCM_16_BIT"/>
            </profiles></mixPort>"#,
            false,
            &mut ctx,
        );
        let formats: Vec<_> = parsed.iter().map(|p| p.format).collect();
        assert_eq!(
            formats,
            vec![AudioFormat::PCM_16_BIT, AudioFormat::PCM_FLOAT, AudioFormat::AC3]
        );
    }

    #[test]
    fn test_input_mono_fixed_for_output_device() {
        let xml = r#"<devicePort><profile format="AUDIO_FORMAT_PCM_16_BIT"
            channelMasks="AUDIO_CHANNEL_IN_MONO"/></devicePort>"#;

        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(xml, true, &mut ctx);
        assert_eq!(parsed[0].channel_masks, BTreeSet::from([ChannelMask::OUT_MONO]));
        assert!(ctx.take_earpiece_channels_fixed());

        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(xml, false, &mut ctx);
        assert_eq!(parsed[0].channel_masks, BTreeSet::from([ChannelMask::IN_MONO]));
        assert!(!ctx.take_earpiece_channels_fixed());
    }

    #[test]
    fn test_input_mono_among_others_untouched() {
        let mut ctx = LoadContext::new(LoadOptions::default());
        let parsed = profiles(
            r#"<devicePort><profile
                channelMasks="AUDIO_CHANNEL_IN_MONO,AUDIO_CHANNEL_OUT_STEREO"/></devicePort>"#,
            true,
            &mut ctx,
        );
        assert!(parsed[0].channel_masks.contains(&ChannelMask::IN_MONO));
        assert!(!ctx.take_earpiece_channels_fixed());
    }

    proptest! {
        #[test]
        fn prop_sample_rates_round_trip(rates in proptest::collection::btree_set(1u32..400_000, 0..8)) {
            let literal = rates.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(" , ");
            prop_assert_eq!(sample_rates_from_str(&literal), rates);
        }

        #[test]
        fn prop_sample_rates_never_panic(literal in ".*") {
            let _ = sample_rates_from_str(&literal);
        }
    }
}
