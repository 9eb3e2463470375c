//! Symbolic vocabularies used by the configuration schema.
//!
//! Every enumerated attribute in the document (formats, channel masks, device
//! types, I/O flags, gain modes) is written as a symbolic constant name such as
//! `AUDIO_FORMAT_PCM_16_BIT`. The tables in this module translate those names to
//! the numeric values the policy engine works with, and back again for display.

pub mod channel;
pub mod device;
pub mod flags;
pub mod format;

pub use channel::ChannelMask;
pub use device::DeviceType;
pub use flags::{GainMode, InputFlags, IoFlags, OutputFlags};
pub use format::AudioFormat;

/// A name/value table for one symbolic vocabulary.
pub(crate) type Vocabulary = &'static [(&'static str, u32)];

/// Look up the value registered for `name`.
pub(crate) fn lookup(table: Vocabulary, name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, value)| *value)
}

/// Look up the first name registered for `value`.
pub(crate) fn reverse_lookup(table: Vocabulary, value: u32) -> Option<&'static str> {
    table
        .iter()
        .find(|(_, candidate)| *candidate == value)
        .map(|(name, _)| *name)
}

/// Split a delimited list literal into trimmed, non-empty tokens.
pub fn split_list<'a>(literal: &'a str, delimiters: &'a [char]) -> impl Iterator<Item = &'a str> {
    literal
        .split(move |c: char| delimiters.contains(&c))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Combine the `|`-separated symbolic names of `literal` into a bit mask.
///
/// Unknown names contribute nothing; a literal made only of unknown names
/// yields zero.
pub(crate) fn mask_from_str(table: Vocabulary, literal: &str) -> u32 {
    split_list(literal, &['|'])
        .filter_map(|token| {
            let value = lookup(table, token);
            if value.is_none() {
                log::warn!("Unknown mask token '{}'", token);
            }
            value
        })
        .fold(0, |mask, bit| mask | bit)
}

/// Render a bit mask back into its `|`-separated symbolic form.
pub(crate) fn mask_to_string(table: Vocabulary, mask: u32) -> String {
    use itertools::Itertools;

    table
        .iter()
        .filter(|(_, bit)| *bit != 0 && mask & bit == *bit)
        .map(|(name, _)| *name)
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: Vocabulary = &[("A", 0x1), ("B", 0x2), ("C", 0x4)];

    #[test]
    fn test_split_list_trims_and_skips_empty() {
        let tokens: Vec<_> = split_list(" a, b ,,c ", &[',']).collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_mask_from_str_ignores_unknown() {
        assert_eq!(mask_from_str(TABLE, "A|C"), 0x5);
        assert_eq!(mask_from_str(TABLE, "A | X"), 0x1);
        assert_eq!(mask_from_str(TABLE, "X"), 0);
        assert_eq!(mask_from_str(TABLE, ""), 0);
    }

    #[test]
    fn test_mask_to_string() {
        assert_eq!(mask_to_string(TABLE, 0x3), "A|B");
        assert_eq!(mask_to_string(TABLE, 0), "");
    }

    #[test]
    fn test_lookup_round_trip() {
        assert_eq!(lookup(TABLE, "B"), Some(0x2));
        assert_eq!(reverse_lookup(TABLE, 0x4), Some("C"));
        assert_eq!(lookup(TABLE, "D"), None);
    }
}
