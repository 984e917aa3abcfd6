/// Default maximum element depth when `huge_tree` is disabled
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Default maximum size of a single text node or attribute value when `huge_tree` is disabled
pub const DEFAULT_MAX_TEXT_LEN: usize = 10_000_000;

/// Parser settings
///
/// There is no global configuration: callers build a `ParserConfig` and pass it to the
/// `*_with_config` functions. The plain functions use [`ParserConfig::default`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Relaxed mode: ignore `max_depth` and `max_text_len`, so that jumbo payloads and very long
    /// field lists are accepted
    pub huge_tree: bool,
    /// Maximum nesting of elements, enforced only if `huge_tree` is false
    pub max_depth: usize,
    /// Maximum length in bytes of a text node or attribute value, enforced only if `huge_tree`
    /// is false
    pub max_text_len: usize,
    /// Retry byte input as ISO-8859-1 if it is not valid UTF-8
    pub encoding_fallback: bool,
}

impl ParserConfig {
    pub const fn new() -> ParserConfig {
        ParserConfig {
            huge_tree: true,
            max_depth: DEFAULT_MAX_DEPTH,
            max_text_len: DEFAULT_MAX_TEXT_LEN,
            encoding_fallback: true,
        }
    }

    /// Configuration with the default limits enforced
    pub const fn strict() -> ParserConfig {
        ParserConfig {
            huge_tree: false,
            ..ParserConfig::new()
        }
    }

    pub(crate) fn depth_limit(&self) -> Option<usize> {
        if self.huge_tree {
            None
        } else {
            Some(self.max_depth)
        }
    }

    pub(crate) fn text_limit(&self) -> Option<usize> {
        if self.huge_tree {
            None
        } else {
            Some(self.max_text_len)
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig::new()
    }
}
