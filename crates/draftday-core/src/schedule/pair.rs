// Unordered team pairs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An unordered pair stored with the smaller element first, so equal pairs
/// compare and hash equal regardless of the order they were built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pair<T>(T, T);

impl<T: Ord> Pair<T> {
    pub fn new(a: T, b: T) -> Self {
        if a <= b {
            Pair(a, b)
        } else {
            Pair(b, a)
        }
    }
}

impl<T> Pair<T> {
    pub fn first(&self) -> &T {
        &self.0
    }

    pub fn second(&self) -> &T {
        &self.1
    }

    pub fn contains(&self, team: &T) -> bool
    where
        T: PartialEq,
    {
        self.0 == *team || self.1 == *team
    }

    /// The other member of the pair, if `team` is in it.
    pub fn opponent_of(&self, team: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        if self.0 == *team {
            Some(&self.1)
        } else if self.1 == *team {
            Some(&self.0)
        } else {
            None
        }
    }

    pub fn map<U: Ord>(&self, mut f: impl FnMut(&T) -> U) -> Pair<U> {
        Pair::new(f(&self.0), f(&self.1))
    }
}

impl<T: fmt::Display> fmt::Display for Pair<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.0, self.1)
    }
}
