use audio_policy_config::types::channel::masks_from_str;
use audio_policy_config::types::format::formats_from_str;
use audio_policy_config::types::split_list;
use audio_policy_config::{AudioFormat, ChannelMask};
use proptest::prelude::*;

#[test]
fn test_known_lists() {
    assert_eq!(
        formats_from_str("AUDIO_FORMAT_AC3  AUDIO_FORMAT_NOPE AUDIO_FORMAT_E_AC3", &[' ']),
        vec![AudioFormat::AC3, AudioFormat::E_AC3]
    );
    let masks = masks_from_str("AUDIO_CHANNEL_OUT_STEREO, AUDIO_CHANNEL_INDEX_MASK_2,bogus");
    assert!(masks.contains(&ChannelMask::OUT_STEREO));
    assert!(masks.contains(&ChannelMask(0x8000_0003)));
    assert_eq!(masks.len(), 2);
}

proptest! {
    #[test]
    fn prop_split_list_tokens_are_trimmed_and_non_empty(literal in "[a-z ,]{0,40}") {
        for token in split_list(&literal, &[',']) {
            prop_assert!(!token.is_empty());
            prop_assert_eq!(token, token.trim());
            prop_assert!(!token.contains(','));
        }
    }

    #[test]
    fn prop_split_list_round_trip(tokens in proptest::collection::vec("[a-z]{1,8}", 0..6)) {
        let literal = tokens.join(" , ");
        let split: Vec<_> = split_list(&literal, &[',']).collect();
        prop_assert_eq!(split, tokens.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
