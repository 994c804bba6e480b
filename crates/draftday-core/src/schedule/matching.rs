// Backtracking perfect-matching search over an allowed-pairs graph.
//
// The search is iterative. Each frame remembers the team it is pairing and
// which candidate it tries next; every choice is pushed onto `chosen` and
// popped again before a sibling candidate is tried, so a failed branch never
// leaves partners removed from `unmatched`.

use std::collections::{BTreeMap, BTreeSet};

use rand::seq::SliceRandom;
use rand::Rng;

use super::pair::Pair;

/// Find a perfect matching of `teams` using only `allowed` pairs, trying
/// `preferred` pairs first. Returns `None` when no such matching exists.
pub fn find_matching<T: Ord + Clone>(
    teams: &[T],
    allowed: &BTreeSet<Pair<T>>,
    preferred: Option<&BTreeSet<Pair<T>>>,
) -> Option<Vec<Pair<T>>> {
    MatchingSearch::new(teams, allowed, preferred).run()
}

/// Like [`find_matching`], but candidates within the same preference tier
/// are tried in an order shuffled by `rng`.
pub fn find_matching_shuffled<T: Ord + Clone, R: Rng + ?Sized>(
    teams: &[T],
    allowed: &BTreeSet<Pair<T>>,
    preferred: Option<&BTreeSet<Pair<T>>>,
    rng: &mut R,
) -> Option<Vec<Pair<T>>> {
    let mut search = MatchingSearch::new(teams, allowed, preferred);
    search.shuffle_candidates(rng);
    search.run()
}

struct Frame<T> {
    team: T,
    candidates: Vec<T>,
    next: usize,
}

struct MatchingSearch<'a, T> {
    teams: &'a [T],
    preferred: Option<&'a BTreeSet<Pair<T>>>,
    adjacency: BTreeMap<T, Vec<T>>,
}

impl<'a, T: Ord + Clone> MatchingSearch<'a, T> {
    fn new(
        teams: &'a [T],
        allowed: &BTreeSet<Pair<T>>,
        preferred: Option<&'a BTreeSet<Pair<T>>>,
    ) -> Self {
        let roster: BTreeSet<&T> = teams.iter().collect();
        let mut adjacency: BTreeMap<T, Vec<T>> = BTreeMap::new();
        for pair in allowed {
            let (a, b) = (pair.first(), pair.second());
            if a == b || !roster.contains(a) || !roster.contains(b) {
                continue;
            }
            adjacency.entry(a.clone()).or_default().push(b.clone());
            adjacency.entry(b.clone()).or_default().push(a.clone());
        }
        MatchingSearch {
            teams,
            preferred,
            adjacency,
        }
    }

    fn shuffle_candidates<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for partners in self.adjacency.values_mut() {
            partners.shuffle(rng);
        }
    }

    fn is_preferred(&self, a: &T, b: &T) -> bool {
        self.preferred
            .is_some_and(|p| p.contains(&Pair::new(a.clone(), b.clone())))
    }

    fn open_partners<'s>(
        &'s self,
        team: &T,
        unmatched: &'s BTreeSet<T>,
    ) -> impl Iterator<Item = &'s T> {
        self.adjacency
            .get(team)
            .into_iter()
            .flatten()
            .filter(move |partner| unmatched.contains(*partner))
    }

    /// Open a frame for the unmatched team with the fewest open partners.
    fn open_frame(&self, unmatched: &BTreeSet<T>) -> Option<Frame<T>> {
        let team = unmatched
            .iter()
            .min_by_key(|t| self.open_partners(t, unmatched).count())?
            .clone();

        let mut candidates: Vec<T> = self.open_partners(&team, unmatched).cloned().collect();
        // Stable sort keeps adjacency order inside each tier.
        candidates.sort_by_key(|partner| !self.is_preferred(&team, partner));

        Some(Frame {
            team,
            candidates,
            next: 0,
        })
    }

    fn run(self) -> Option<Vec<Pair<T>>> {
        let mut unmatched: BTreeSet<T> = self.teams.iter().cloned().collect();
        if unmatched.len() != self.teams.len() {
            // Duplicate entries can never be matched exactly once.
            return None;
        }

        let mut chosen: Vec<Pair<T>> = Vec::with_capacity(self.teams.len() / 2);
        let mut frames: Vec<Frame<T>> = Vec::new();

        loop {
            let Some(frame) = self.open_frame(&unmatched) else {
                return Some(chosen);
            };
            frames.push(frame);

            // Advance the deepest frame; unwind exhausted ones, undoing the
            // parent's choice each time.
            loop {
                let frame = frames.last_mut()?;
                if let Some(partner) = frame.candidates.get(frame.next).cloned() {
                    frame.next += 1;
                    unmatched.remove(&frame.team);
                    unmatched.remove(&partner);
                    chosen.push(Pair::new(frame.team.clone(), partner));
                    break;
                }

                frames.pop();
                let undone = chosen.pop()?;
                unmatched.insert(undone.first().clone());
                unmatched.insert(undone.second().clone());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
