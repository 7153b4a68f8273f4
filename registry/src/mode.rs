//! Decomposition modes.

use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, UnsupportedModeSnafu};

/// Stage of the compilation pipeline a decomposition table serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::IntoStaticStr, strum::VariantArray)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    PreAutograd,
    #[default]
    PostAutograd,
    Meta,
}

impl Mode {
    /// Order in which tables are merged for meta activation, highest priority first.
    pub const ACTIVATION_ORDER: [Mode; 3] = [Mode::Meta, Mode::PostAutograd, Mode::PreAutograd];

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use strum::VariantArray;

        Self::VARIANTS
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnsupportedModeSnafu { mode: s }.build())
    }
}

impl TryFrom<&str> for Mode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}
