use serde::{Deserialize, Serialize};
use std::fmt;

/// Prediction horizon in trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Horizon {
    OneDay,
    FiveDay,
    TwentyDay,
}

impl Horizon {
    /// All horizons, in response-field order.
    pub fn all() -> [Horizon; 3] {
        [Horizon::OneDay, Horizon::FiveDay, Horizon::TwentyDay]
    }

    /// Short tag used in artifact file names and response fields.
    pub fn tag(&self) -> &'static str {
        match self {
            Horizon::OneDay => "1d",
            Horizon::FiveDay => "5d",
            Horizon::TwentyDay => "20d",
        }
    }

    /// Horizon length in trading days.
    pub fn trading_days(&self) -> u32 {
        match self {
            Horizon::OneDay => 1,
            Horizon::FiveDay => 5,
            Horizon::TwentyDay => 20,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
