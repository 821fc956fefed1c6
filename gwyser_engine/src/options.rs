use anyhow::{Context, Result};
use std::env;

/// Overrides [`DeserializeOptions::max_depth`] in [`DeserializeOptions::from_env`].
pub const ENV_VAR_MAX_DEPTH: &str = "GWYSER_MAX_DEPTH";

pub const DEFAULT_MAX_DEPTH: usize = 100;
pub const DEFAULT_BUFFER_SIZE: usize = 1 << 16;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct DeserializeOptions {
    /// Objects nested deeper than this are rejected. The root is at depth 1.
    pub max_depth: usize,
}
impl Default for DeserializeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
impl DeserializeOptions {
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Ok(val) = env::var(ENV_VAR_MAX_DEPTH) {
            options.max_depth = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_VAR_MAX_DEPTH} {val:?}"))?;
        }
        Ok(options)
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct SerializeOptions {
    /// Bytes collected before they are handed to the sink.
    pub buffer_size: usize,
}
impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
