use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Target Hit", alias = "TargetHit", alias = "target")]
    TargetHit,
    #[serde(rename = "SL Hit", alias = "StopHit", alias = "stop")]
    StopHit,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::TargetHit => "Target Hit",
            Outcome::StopHit => "SL Hit",
        }
    }

    pub fn is_win(self) -> bool {
        matches!(self, Outcome::TargetHit)
    }
}

impl FromStr for Outcome {
    type Err = String;

    /// Accepts the journal spelling plus the terse forms typed on the command
    /// line. `buy` and `sell` mirror the two entry buttons of the dashboard.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "target hit" | "targethit" | "target" | "tp" | "buy" => Ok(Outcome::TargetHit),
            "sl hit" | "stophit" | "stop" | "sl" | "sell" => Ok(Outcome::StopHit),
            other => Err(format!("unknown outcome '{}'", other)),
        }
    }
}

/// Self-reported state of mind before entering, least to most settled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mindset {
    Stressed,
    Anxious,
    #[default]
    Neutral,
    Calm,
    Confident,
}

impl fmt::Display for Mindset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Mindset {
    pub const ALL: [Mindset; 5] = [
        Mindset::Stressed,
        Mindset::Anxious,
        Mindset::Neutral,
        Mindset::Calm,
        Mindset::Confident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mindset::Stressed => "Stressed",
            Mindset::Anxious => "Anxious",
            Mindset::Neutral => "Neutral",
            Mindset::Calm => "Calm",
            Mindset::Confident => "Confident",
        }
    }
}

impl FromStr for Mindset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mindset::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown mindset '{}'", wanted))
    }
}
