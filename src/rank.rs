//! Solo queue rank model and the total order used for promotions and the leaderboard.
//!
//! A rank maps to a single integer: `tier * 1000 + division * 100 + points`.
//! Tiers weigh 0 (Iron) to 9 (Challenger), divisions 1 (IV) to 4 (I), and the
//! apex tiers (Master and above) have no division weight. Raw strings coming
//! from the API or the database are ranked leniently: anything unmapped weighs
//! 0 and is reported with a warning instead of failing.

use std::fmt;
use std::str::FromStr;

use poise::ChoiceParameter;
use thiserror::Error;
use tracing::warn;

use crate::riot::LeagueEntryDto;

const TIER_WEIGHT: i64 = 1000;
const DIVISION_WEIGHT: i64 = 100;

#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownRank {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ChoiceParameter)]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub const ALL: [Tier; 10] = [
        Tier::Iron,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Emerald,
        Tier::Diamond,
        Tier::Master,
        Tier::Grandmaster,
        Tier::Challenger,
    ];

    /// 0 for Iron up to 9 for Challenger.
    pub fn weight(self) -> i64 {
        self as i64
    }

    pub fn has_divisions(self) -> bool {
        self < Tier::Master
    }

    /// Upper-case form used by the Riot API and stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Iron => "IRON",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
            Tier::Emerald => "EMERALD",
            Tier::Diamond => "DIAMOND",
            Tier::Master => "MASTER",
            Tier::Grandmaster => "GRANDMASTER",
            Tier::Challenger => "CHALLENGER",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tier::Iron => "Iron",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
            Tier::Emerald => "Emerald",
            Tier::Diamond => "Diamond",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
            Tier::Challenger => "Challenger",
        }
    }
}

impl FromStr for Tier {
    type Err = UnknownRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRank {
                kind: "tier",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ChoiceParameter)]
pub enum Division {
    IV,
    III,
    II,
    I,
}

impl Division {
    /// 1 for IV up to 4 for I.
    pub fn weight(self) -> i64 {
        self as i64 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Division::IV => "IV",
            Division::III => "III",
            Division::II => "II",
            Division::I => "I",
        }
    }
}

impl FromStr for Division {
    type Err = UnknownRank;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "IV" => Ok(Division::IV),
            "III" => Ok(Division::III),
            "II" => Ok(Division::II),
            "I" => Ok(Division::I),
            _ => Err(UnknownRank {
                kind: "division",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparable value of a raw (tier, division, points) triple.
///
/// Never fails. Points are added unscaled, so a value of 100 or more overlaps
/// the next division; that case is logged but left as is.
pub fn rank_value(tier: &str, division: &str, points: i32) -> i64 {
    let tier = match tier.parse::<Tier>() {
        Ok(tier) => Some(tier),
        Err(e) => {
            warn!(error = %e, "🏅 ⚠️ Unmapped tier, ranking it as the lowest");
            None
        }
    };

    let division_weight = match tier {
        Some(t) if !t.has_divisions() => 0,
        _ => match division.parse::<Division>() {
            Ok(d) => d.weight(),
            Err(e) => {
                warn!(error = %e, "🏅 ⚠️ Unmapped division, ranking it as the lowest");
                0
            }
        },
    };

    if !(0..100).contains(&points) {
        warn!(points, "🏅 ⚠️ League points outside 0..100 overlap the next division");
    }

    tier.map_or(0, Tier::weight) * TIER_WEIGHT + division_weight * DIVISION_WEIGHT + points as i64
}

/// Ranked solo queue standing as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rank {
    pub tier: String,
    pub division: String,
    pub points: i32,
}

impl Rank {
    pub fn new(tier: Tier, division: Division, points: i32) -> Self {
        Self {
            tier: tier.as_str().to_string(),
            division: division.as_str().to_string(),
            points,
        }
    }

    pub fn value(&self) -> i64 {
        rank_value(&self.tier, &self.division, self.points)
    }

    /// Value of the (tier, division) step alone, points ignored.
    pub fn step_value(&self) -> i64 {
        rank_value(&self.tier, &self.division, 0)
    }

    /// Parsed tier, `None` when the stored string is not one of the ten tiers.
    pub fn tier(&self) -> Option<Tier> {
        self.tier.parse().ok()
    }
}

impl From<&LeagueEntryDto> for Rank {
    fn from(entry: &LeagueEntryDto) -> Self {
        Self {
            tier: entry.tier.clone(),
            division: entry.rank.clone(),
            points: entry.league_points,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} / {}LP", self.tier, self.division, self.points)
    }
}

/// A promotion is a strict increase of the (tier, division) step.
pub fn is_promotion(previous: &Rank, current: &Rank) -> bool {
    previous.step_value() < current.step_value()
}
