pub mod client;
pub mod gemini;
pub mod generate;

use crate::client::ApiError;
use chrono::{Datelike, NaiveDate};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of ESPN and Gemini wire formats
// ---------------------------------------------------------------------------

/// A scoreboard payload as ESPN returned it, or the reason it couldn't be had.
/// The JSON is never inspected; it is forwarded verbatim to the summarizer.
pub type ScoreboardResult = Result<serde_json::Value, ApiError>;

/// The leagues covered by the digest, in the order they are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum League {
    Mlb,
    Nfl,
    Nba,
}

impl League {
    pub const ALL: [League; 3] = [League::Mlb, League::Nfl, League::Nba];

    /// Short key used in logs and in the prompt payload.
    pub fn key(&self) -> &'static str {
        match self {
            League::Mlb => "mlb",
            League::Nfl => "nfl",
            League::Nba => "nba",
        }
    }

    /// Path segment under ESPN's `site/v2/sports` root.
    pub fn scoreboard_path(&self) -> &'static str {
        match self {
            League::Mlb => "baseball/mlb",
            League::Nfl => "football/nfl",
            League::Nba => "basketball/nba",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for League {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// `YYYYMMDD`, the shape ESPN expects in its `dates` query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(format!("{:04}{:02}{:02}", date.year(), date.month(), date.day()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every league's scoreboard for one day.
///
/// Serializes as `{"mlb": ..., "nfl": ..., "nba": ...}`; failed fetches
/// become `null` so the payload shape never depends on upstream health.
#[derive(Debug)]
pub struct DayScores {
    pub date: DateKey,
    pub leagues: BTreeMap<League, ScoreboardResult>,
}

impl DayScores {
    pub fn new(date: DateKey) -> Self {
        Self { date, leagues: BTreeMap::new() }
    }

    pub fn insert(&mut self, league: League, result: ScoreboardResult) {
        self.leagues.insert(league, result);
    }

    pub fn get(&self, league: League) -> Option<&ScoreboardResult> {
        self.leagues.get(&league)
    }

    /// True once every league has an entry, successful or not.
    pub fn is_complete(&self) -> bool {
        League::ALL.iter().all(|league| self.leagues.contains_key(league))
    }
}

impl Serialize for DayScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.leagues.len()))?;
        for (league, result) in &self.leagues {
            map.serialize_entry(league, &result.as_ref().ok())?;
        }
        map.end()
    }
}
