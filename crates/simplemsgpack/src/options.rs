//! Decoder configuration.

/// What [`crate::unpack_with`] does with bytes after the first value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingBytes {
    /// Decode the first value and drop the rest.
    #[default]
    Ignore,
    /// Fail with [`crate::DecodeError::TrailingBytes`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackOptions {
    pub trailing: TrailingBytes,
    /// Maximum container nesting. The root container is depth 1.
    pub max_depth: usize,
}

impl UnpackOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 512;

    pub fn reject_trailing(mut self) -> Self {
        self.trailing = TrailingBytes::Reject;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            trailing: TrailingBytes::Ignore,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
