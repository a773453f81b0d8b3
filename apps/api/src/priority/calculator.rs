//! Priority scoring — four ordinal signals summed into a Red/Orange/Green tier.
//!
//! Each present signal scores 1 (low), 2 (medium) or 3 (high); an absent signal
//! scores 0. Tier thresholds on the 0–12 sum:
//! - 0 (nothing set) → Green
//! - 1–6 → Green
//! - 7–9 → Orange
//! - 10–12 → Red

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority tier shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Red,
    Orange,
    Green,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Red, Priority::Orange, Priority::Green];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Red => "Red",
            Priority::Orange => "Orange",
            Priority::Green => "Green",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == raw.trim())
    }

    /// 0 = most urgent. Used for dashboard sorting.
    pub fn urgency_rank(self) -> u8 {
        match self {
            Priority::Red => 0,
            Priority::Orange => 1,
            Priority::Green => 2,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.urgency_rank().cmp(&other.urgency_rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared behaviour of the four scoring dimensions.
pub trait Signal: Sized + Copy + 'static {
    /// Variants from low (score 1) to high (score 3).
    const RANKED: [Self; 3];

    fn label(self) -> &'static str;

    fn score(self) -> u8 {
        Self::RANKED
            .iter()
            .position(|v| v.label() == self.label())
            .map(|i| i as u8 + 1)
            .unwrap_or(0)
    }

    /// Exact label match. Unknown labels yield `None` and therefore score 0.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::RANKED.into_iter().find(|v| v.label() == raw)
    }
}

macro_rules! signal_enum {
    ($(#[$meta:meta])* $name:ident { $low:ident => $low_label:literal, $mid:ident => $mid_label:literal, $high:ident => $high_label:literal $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            #[serde(rename = $low_label)]
            $low,
            #[serde(rename = $mid_label)]
            $mid,
            #[serde(rename = $high_label)]
            $high,
        }

        impl Signal for $name {
            const RANKED: [Self; 3] = [$name::$low, $name::$mid, $name::$high];

            fn label(self) -> &'static str {
                match self {
                    $name::$low => $low_label,
                    $name::$mid => $mid_label,
                    $name::$high => $high_label,
                }
            }
        }
    };
}

signal_enum!(
    /// Does the client feel the pain of the open vacancy?
    ClientPainLevel {
        No => "Nee",
        Starting => "Beginnend",
        Yes => "Ja",
    }
);

signal_enum!(
    /// How far along the engagement with the client is.
    TimeCriticality {
        JustStarted => "Net begonnen",
        Ongoing => "Lopend",
        NearingEnd => "Tegen het einde van samenwerking",
    }
);

signal_enum!(
    /// Account tier of the client.
    StrategicValue {
        CClient => "C-klant",
        BClient => "B-klant",
        AClient => "A-klant",
    }
);

signal_enum!(
    AccountHealth {
        Satisfied => "Tevreden stakeholder",
        Restless => "Onrustige stakeholder",
        ChurnRisk => "Kans op churn",
    }
);

/// The four scoring inputs of an annotation. Any of them may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityInputs {
    pub client_pain_level: Option<ClientPainLevel>,
    pub time_criticality: Option<TimeCriticality>,
    pub strategic_value: Option<StrategicValue>,
    pub account_health: Option<AccountHealth>,
}

impl PriorityInputs {
    /// Builds inputs from stored labels. Unrecognized labels degrade to unset.
    pub fn from_labels(
        client_pain_level: Option<&str>,
        time_criticality: Option<&str>,
        strategic_value: Option<&str>,
        account_health: Option<&str>,
    ) -> Self {
        Self {
            client_pain_level: client_pain_level.and_then(ClientPainLevel::parse),
            time_criticality: time_criticality.and_then(TimeCriticality::parse),
            strategic_value: strategic_value.and_then(StrategicValue::parse),
            account_health: account_health.and_then(AccountHealth::parse),
        }
    }

    /// Sum of the four dimension scores, 0–12.
    pub fn total_score(&self) -> u8 {
        fn s<T: Signal>(v: Option<T>) -> u8 {
            v.map(Signal::score).unwrap_or(0)
        }
        s(self.client_pain_level)
            + s(self.time_criticality)
            + s(self.strategic_value)
            + s(self.account_health)
    }
}

/// Maps a 0–12 score sum to its tier.
pub fn priority_for_score(total: u8) -> Priority {
    match total {
        10..=u8::MAX => Priority::Red,
        7..=9 => Priority::Orange,
        _ => Priority::Green,
    }
}

/// Derives the calculated tier of an annotation. Total: never fails.
pub fn calculate_priority(inputs: &PriorityInputs) -> Priority {
    priority_for_score(inputs.total_score())
}
