use serde::{Deserialize, Serialize};

/// Resolved loyalty tier. `Tier::default()` (tier 0, empty name) means no tier yet.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Tier {
    pub tier: i32,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TierBreakpoint {
    pub tier: i32,
    pub name: String,
    pub min_points: i64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TierTableError {
    #[error("Tier table is empty")]
    Empty,
    #[error("Tier {0} must be non-zero")]
    ZeroTier(String),
    #[error("Tier {0} has a negative threshold")]
    NegativeThreshold(String),
    #[error("Tier {0} threshold is not above the previous one")]
    Unordered(String),
}

/// Breakpoints ordered by ascending `min_points`.
#[derive(Clone, Debug, PartialEq)]
pub struct TierTable {
    breakpoints: Vec<TierBreakpoint>,
}

impl TierTable {
    pub fn new(breakpoints: Vec<TierBreakpoint>) -> Result<Self, TierTableError> {
        if breakpoints.is_empty() {
            return Err(TierTableError::Empty);
        }

        let mut previous: Option<i64> = None;
        for breakpoint in &breakpoints {
            if breakpoint.tier == 0 {
                return Err(TierTableError::ZeroTier(breakpoint.name.clone()));
            }
            if breakpoint.min_points < 0 {
                return Err(TierTableError::NegativeThreshold(breakpoint.name.clone()));
            }
            if matches!(previous, Some(p) if breakpoint.min_points <= p) {
                return Err(TierTableError::Unordered(breakpoint.name.clone()));
            }
            previous = Some(breakpoint.min_points);
        }

        Ok(Self { breakpoints })
    }

    pub fn resolve(&self, beacon_points: i64, is_trial: bool) -> Tier {
        if beacon_points == 0 && !is_trial {
            return Tier::default();
        }

        let reached = self
            .breakpoints
            .iter()
            .rev()
            .find(|b| b.min_points <= beacon_points);

        let breakpoint = match reached {
            Some(b) => Some(b),
            // trial members get the entry tier even before earning points
            None if is_trial => self.breakpoints.first(),
            None => None,
        };

        breakpoint
            .map(|b| Tier {
                tier: b.tier,
                name: b.name.clone(),
            })
            .unwrap_or_default()
    }
}

impl Default for TierTable {
    fn default() -> Self {
        let breakpoints = [
            (1, "New Bee", 0),
            (2, "Worker Bee", 100),
            (3, "Guardian Bee", 500),
            (4, "Queen Bee", 2000),
        ]
        .into_iter()
        .map(|(tier, name, min_points)| TierBreakpoint {
            tier,
            name: name.to_string(),
            min_points,
        })
        .collect();

        Self { breakpoints }
    }
}
