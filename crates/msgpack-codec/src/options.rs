//! Option flags shared by the encoder and the decoder.

bitflags::bitflags! {
    /// Non-default codec behaviors. Flags compose with `|`; the empty set is
    /// the strict default.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Options: u32 {
        /// Encode map keys of non-`Str` variants; decode maps whose keys are
        /// not strings.
        const NON_STR_KEYS = 1 << 2;
        /// Route integers outside the 64-bit range to the `default` callback
        /// instead of rejecting them.
        const PASSTHROUGH_BIG_INT = 1 << 3;
        /// Encode [`NumericArray`](crate::NumericArray) values natively.
        const SERIALIZE_NUMPY = 1 << 4;
        /// Encode [`Record`](crate::Record) values as maps of their fields.
        const SERIALIZE_PYDANTIC = 1 << 5;
    }
}

pub const OPT_NON_STR_KEYS: Options = Options::NON_STR_KEYS;
pub const OPT_PASSTHROUGH_BIG_INT: Options = Options::PASSTHROUGH_BIG_INT;
pub const OPT_SERIALIZE_NUMPY: Options = Options::SERIALIZE_NUMPY;
pub const OPT_SERIALIZE_PYDANTIC: Options = Options::SERIALIZE_PYDANTIC;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_compose() {
        let opts = OPT_NON_STR_KEYS | OPT_SERIALIZE_NUMPY;
        assert!(opts.contains(Options::NON_STR_KEYS));
        assert!(opts.contains(Options::SERIALIZE_NUMPY));
        assert!(!opts.contains(Options::PASSTHROUGH_BIG_INT));
        assert!(Options::default().is_empty());
    }

    #[test]
    fn flags_resolve_by_name() {
        assert_eq!(
            Options::from_name("PASSTHROUGH_BIG_INT"),
            Some(OPT_PASSTHROUGH_BIG_INT)
        );
        assert_eq!(Options::from_name("SORT_KEYS"), None);
    }
}
