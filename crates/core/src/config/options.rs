//! Link rendering options understood by the dejure.org linking service.
//!
//! Each option is recognized by its English name or by the German value the
//! service expects on the wire. Anything else is a [`ConfigError::UnknownValue`].

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::ConfigError;

/// How much of a citation becomes the anchor text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// The whole citation (`§ 433 BGB`) is linked.
    #[default]
    Wide,
    /// Only the provision number (`433`) is linked.
    Narrow,
}

/// Content of the anchor `title` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tooltip {
    None,
    Neutral,
    #[default]
    Descriptive,
    Statutes,
    Half,
}

/// Whether citations spanning a line break get linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreak {
    None,
    With,
    #[default]
    Auto,
}

impl LinkStyle {
    pub const FIELD: &'static str = "link_style";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wide => "wide",
            Self::Narrow => "narrow",
        }
    }

    /// Value sent as the `format` form field.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::Wide => "weit",
            Self::Narrow => "schmal",
        }
    }
}

impl Tooltip {
    pub const FIELD: &'static str = "tooltip";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Neutral => "neutral",
            Self::Descriptive => "descriptive",
            Self::Statutes => "statutes",
            Self::Half => "half",
        }
    }

    /// Value sent as the `Tooltip` form field.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::None => "ohne",
            Self::Neutral => "neutral",
            Self::Descriptive => "beschreibend",
            Self::Statutes => "Gesetze",
            Self::Half => "halb",
        }
    }
}

impl LineBreak {
    pub const FIELD: &'static str = "line_break";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::With => "with",
            Self::Auto => "auto",
        }
    }

    /// Value sent as the `Zeilenwechsel` form field.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Self::None => "ohne",
            Self::With => "mit",
            Self::Auto => "auto",
        }
    }
}

fn unknown(field: &str, value: &str) -> ConfigError {
    ConfigError::UnknownValue { field: field.into(), value: value.into() }
}

impl FromStr for LinkStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wide" | "weit" => Ok(Self::Wide),
            "narrow" | "schmal" => Ok(Self::Narrow),
            other => Err(unknown(Self::FIELD, other)),
        }
    }
}

impl FromStr for Tooltip {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "ohne" => Ok(Self::None),
            "neutral" => Ok(Self::Neutral),
            "descriptive" | "beschreibend" => Ok(Self::Descriptive),
            "statutes" | "Gesetze" => Ok(Self::Statutes),
            "half" | "halb" => Ok(Self::Half),
            other => Err(unknown(Self::FIELD, other)),
        }
    }
}

impl FromStr for LineBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "ohne" => Ok(Self::None),
            "with" | "mit" => Ok(Self::With),
            "auto" => Ok(Self::Auto),
            other => Err(unknown(Self::FIELD, other)),
        }
    }
}

impl fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Tooltip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for LineBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
