use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Unit shown next to every concentration input.
pub const CONCENTRATION_UNIT: &str = "mg";

/// Number of metals collected by the form.
pub const METAL_COUNT: usize = 10;

/// The ten heavy metals collected by the form, in form order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metal {
    Arsenic,
    Lead,
    Cadmium,
    Chromium,
    Mercury,
    Nickel,
    Copper,
    Zinc,
    Iron,
    Manganese,
}

impl Metal {
    pub const ALL: [Metal; METAL_COUNT] = [
        Metal::Arsenic,
        Metal::Lead,
        Metal::Cadmium,
        Metal::Chromium,
        Metal::Mercury,
        Metal::Nickel,
        Metal::Copper,
        Metal::Zinc,
        Metal::Iron,
        Metal::Manganese,
    ];

    /// Key used on the wire and in CLI flags.
    pub fn key(self) -> &'static str {
        match self {
            Metal::Arsenic => "arsenic",
            Metal::Lead => "lead",
            Metal::Cadmium => "cadmium",
            Metal::Chromium => "chromium",
            Metal::Mercury => "mercury",
            Metal::Nickel => "nickel",
            Metal::Copper => "copper",
            Metal::Zinc => "zinc",
            Metal::Iron => "iron",
            Metal::Manganese => "manganese",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metal::Arsenic => "Arsenic",
            Metal::Lead => "Lead",
            Metal::Cadmium => "Cadmium",
            Metal::Chromium => "Chromium",
            Metal::Mercury => "Mercury",
            Metal::Nickel => "Nickel",
            Metal::Copper => "Copper",
            Metal::Zinc => "Zinc",
            Metal::Iron => "Iron",
            Metal::Manganese => "Manganese",
        }
    }
}

impl fmt::Display for Metal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metal: {0}")]
pub struct UnknownMetal(pub String);

impl FromStr for Metal {
    type Err = UnknownMetal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Metal::ALL
            .into_iter()
            .find(|metal| metal.key() == needle)
            .ok_or_else(|| UnknownMetal(s.to_string()))
    }
}

/// Indices returned by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollutionIndex {
    Hpi,
    Hei,
    Mi,
    Cd,
    Nemerow,
}

impl PollutionIndex {
    pub const ALL: [PollutionIndex; 5] = [
        PollutionIndex::Hpi,
        PollutionIndex::Hei,
        PollutionIndex::Mi,
        PollutionIndex::Cd,
        PollutionIndex::Nemerow,
    ];

    /// Field name in the scoring response body. Also used as the display label.
    pub fn key(self) -> &'static str {
        match self {
            PollutionIndex::Hpi => "HPI",
            PollutionIndex::Hei => "HEI",
            PollutionIndex::Mi => "MI",
            PollutionIndex::Cd => "Cd",
            PollutionIndex::Nemerow => "Nemerow",
        }
    }
}

/// Classification label the scoring service uses for water deemed safe.
pub const SAFE_CLASSIFICATION: &str = "Safe";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metal_keys_round_trip_through_from_str() {
        for metal in Metal::ALL {
            assert_eq!(metal.key().parse::<Metal>(), Ok(metal));
        }
        assert_eq!(" Lead ".parse::<Metal>(), Ok(Metal::Lead));
        assert!("uranium".parse::<Metal>().is_err());
    }

    #[test]
    fn metal_serializes_as_lowercase_key() {
        let json = serde_json::to_string(&Metal::Manganese).expect("serialize");
        assert_eq!(json, "\"manganese\"");
    }
}
