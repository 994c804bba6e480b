// League owners and last season's standings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StandingsError {
    #[error("record `{0}` is not in W-L or W-L-T form")]
    MalformedRecord(String),
}

/// A win-loss(-tie) record such as `9-5` or `7-6-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Share of games won, ties counted as half. 0.0 before any game.
    pub fn win_pct(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        (f64::from(self.wins) + f64::from(self.ties) / 2.0) / f64::from(games)
    }
}

impl FromStr for Record {
    type Err = StandingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || StandingsError::MalformedRecord(s.to_string());
        let parts: Vec<u32> = s
            .trim()
            .split('-')
            .map(|p| p.trim().parse::<u32>().map_err(|_| malformed()))
            .collect::<Result<_, _>>()?;

        match parts.as_slice() {
            [wins, losses] => Ok(Record {
                wins: *wins,
                losses: *losses,
                ties: 0,
            }),
            [wins, losses, ties] => Ok(Record {
                wins: *wins,
                losses: *losses,
                ties: *ties,
            }),
            _ => Err(malformed()),
        }
    }
}

impl TryFrom<String> for Record {
    type Error = StandingsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Record> for String {
    fn from(record: Record) -> Self {
        record.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ties > 0 {
            write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            write!(f, "{}-{}", self.wins, self.losses)
        }
    }
}

/// One league member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Short owner name; this is the name used in draft orders and schedules.
    pub owner: String,
    pub team_name: String,
    pub record: Record,
}

/// Owners in the order they appear in the league file.
#[derive(Debug, Clone, PartialEq)]
pub struct Standings {
    owners: Vec<Owner>,
}

impl Standings {
    pub fn new(owners: Vec<Owner>) -> Self {
        Standings { owners }
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn get(&self, owner: &str) -> Option<&Owner> {
        self.owners.iter().find(|o| o.owner == owner)
    }

    /// Owners sorted worst record first; ties keep league-file order.
    /// Index in the result is the lottery seed.
    pub fn lottery_order(&self) -> Vec<&Owner> {
        let mut order: Vec<&Owner> = self.owners.iter().collect();
        order.sort_by(|a, b| a.record.win_pct().total_cmp(&b.record.win_pct()));
        order
    }

    /// Owner names in lottery seed order.
    pub fn lottery_names(&self) -> Vec<String> {
        self.lottery_order()
            .into_iter()
            .map(|o| o.owner.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner(name: &str, record: &str) -> Owner {
        Owner {
            owner: name.into(),
            team_name: format!("{name} FC"),
            record: record.parse().unwrap(),
        }
    }

    #[test]
    fn parses_records() {
        let r: Record = "9-5".parse().unwrap();
        assert_eq!((r.wins, r.losses, r.ties), (9, 5, 0));
        let r: Record = " 7-6-1 ".parse().unwrap();
        assert_eq!((r.wins, r.losses, r.ties), (7, 6, 1));
        assert_eq!(r.to_string(), "7-6-1");
    }

    #[test]
    fn rejects_malformed_records() {
        for bad in ["", "9", "9-", "a-b", "1-2-3-4", "-1-5"] {
            assert!(bad.parse::<Record>().is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn win_pct_counts_ties_as_half() {
        let r: Record = "6-6-2".parse().unwrap();
        assert!((r.win_pct() - 0.5).abs() < f64::EPSILON);
        let empty: Record = "0-0".parse().unwrap();
        assert_eq!(empty.win_pct(), 0.0);
    }

    #[test]
    fn lottery_order_is_worst_first_and_stable() {
        let standings = Standings::new(vec![
            owner("Owen", "9-5"),
            owner("Batches", "7-7"),
            owner("Dom", "4-10"),
            owner("Sam", "7-7"),
            owner("Gus", "5-9"),
        ]);
        assert_eq!(
            standings.lottery_names(),
            vec!["Dom", "Gus", "Batches", "Sam", "Owen"]
        );
    }

    #[test]
    fn record_deserializes_from_string() {
        let o: Owner = toml::from_str(
            "owner = \"Addi\"\nteam_name = \"Anazyn Skywalkers\"\nrecord = \"9-5\"\n",
        )
        .unwrap();
        assert_eq!(o.record.wins, 9);
        assert!(toml::from_str::<Owner>("owner = \"x\"\nteam_name = \"y\"\nrecord = \"bad\"\n").is_err());
    }
}
