//! Meta activation settings.
//!
//! Built explicitly with [`ActivationConfig::builder`] or read from the
//! environment with [`ActivationConfig::from_env`].

use bon::bon;

use crate::mode::Mode;

/// Dispatch-dump marker of operators that already decompose implicitly.
pub const COMPOSITE_IMPLICIT_MARKER: &str = "CompositeImplicitAutograd";

/// Settings for [`crate::Registry::activate_meta`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationConfig {
    /// Install meta kernels at all.
    pub enabled: bool,
    /// Table merge order, highest priority first.
    pub precedence: Vec<Mode>,
    /// Skip overloads registered with `disable_meta`.
    pub respect_disabled_meta: bool,
    /// Substring of the dispatch dump that marks an implicitly composite operator.
    pub composite_marker: String,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            precedence: Mode::ACTIVATION_ORDER.to_vec(),
            respect_disabled_meta: false,
            composite_marker: COMPOSITE_IMPLICIT_MARKER.to_string(),
        }
    }
}

#[bon]
impl ActivationConfig {
    #[builder]
    pub fn new(
        #[builder(default = true)] enabled: bool,
        #[builder(default = Mode::ACTIVATION_ORDER.to_vec())] precedence: Vec<Mode>,
        #[builder(default = false)] respect_disabled_meta: bool,
        #[builder(into, default = COMPOSITE_IMPLICIT_MARKER.to_string())] composite_marker: String,
    ) -> Self {
        Self { enabled, precedence, respect_disabled_meta, composite_marker }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `DECOMP_NO_META_ACTIVATION` - Skip meta activation if set
    /// * `DECOMP_META_PRECEDENCE` - Comma separated modes, highest priority first
    ///   (default: `meta,post_autograd,pre_autograd`)
    /// * `DECOMP_RESPECT_DISABLED_META` - Skip overloads registered with `disable_meta` if set
    /// * `DECOMP_COMPOSITE_MARKER` - Dump marker of implicitly composite operators; empty means unset
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`ActivationConfig::from_env`] reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("DECOMP_NO_META_ACTIVATION").is_none();
        let precedence = lookup("DECOMP_META_PRECEDENCE")
            .and_then(|value| parse_precedence(&value))
            .unwrap_or_else(|| Mode::ACTIVATION_ORDER.to_vec());
        let respect_disabled_meta = lookup("DECOMP_RESPECT_DISABLED_META").is_some();
        let composite_marker = lookup("DECOMP_COMPOSITE_MARKER")
            .filter(|marker| !marker.is_empty())
            .unwrap_or_else(|| COMPOSITE_IMPLICIT_MARKER.to_string());

        Self { enabled, precedence, respect_disabled_meta, composite_marker }
    }
}

/// Parse a comma separated mode list. Repeats and empty lists are rejected.
pub fn parse_precedence(value: &str) -> Option<Vec<Mode>> {
    let mut modes = Vec::with_capacity(Mode::ACTIVATION_ORDER.len());
    for part in value.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        match part.parse::<Mode>() {
            Ok(mode) if !modes.contains(&mode) => modes.push(mode),
            Ok(mode) => {
                tracing::warn!(value, %mode, "repeated mode in meta precedence, keeping default");
                return None;
            }
            Err(error) => {
                tracing::warn!(value, %error, "invalid meta precedence, keeping default");
                return None;
            }
        }
    }

    if modes.is_empty() {
        tracing::warn!(value, "empty meta precedence, keeping default");
        return None;
    }
    Some(modes)
}
