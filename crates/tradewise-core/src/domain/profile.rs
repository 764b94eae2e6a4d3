use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Investor risk appetite selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub const ALL: [Self; 3] = [Self::Conservative, Self::Moderate, Self::Aggressive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Moderate => "moderate",
            Self::Aggressive => "aggressive",
        }
    }

    /// Label written into the analysis context.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Conservative => "Conservative",
            Self::Moderate => "Moderate",
            Self::Aggressive => "Aggressive",
        }
    }
}

impl Display for RiskProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "moderate" => Ok(Self::Moderate),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(ValidationError::InvalidRiskProfile {
                value: other.to_owned(),
            }),
        }
    }
}

/// Investment horizon selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentHorizon {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl InvestmentHorizon {
    pub const ALL: [Self; 3] = [Self::ShortTerm, Self::MediumTerm, Self::LongTerm];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short",
            Self::MediumTerm => "medium",
            Self::LongTerm => "long",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ShortTerm => "Short term",
            Self::MediumTerm => "Medium term",
            Self::LongTerm => "Long term",
        }
    }
}

impl Display for InvestmentHorizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentHorizon {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" | "short_term" | "short-term" => Ok(Self::ShortTerm),
            "medium" | "medium_term" | "medium-term" => Ok(Self::MediumTerm),
            "long" | "long_term" | "long-term" => Ok(Self::LongTerm),
            other => Err(ValidationError::InvalidHorizon {
                value: other.to_owned(),
            }),
        }
    }
}
