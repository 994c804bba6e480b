// Weighted ball-machine lottery.
//
// Every B-ball combination of the N seeds is mapped to exactly one outcome:
// either a seed or the "no winner" sentinel. The outcome multiset holds
// `chances[s]` copies of each seed padded with sentinels to fill the
// combination space, shuffled once at construction. A draw picks a random
// combination and reads its outcome.

use rand::seq::{index, SliceRandom};
use rand::Rng;
use tracing::debug;

use super::combinatorics::{checked_combinations_count, combination_rank};
use super::LotteryError;

/// Upper bound on the combination space we are willing to materialize.
pub const MAX_COMBINATIONS: u128 = 10_000_000;

#[derive(Debug, Clone)]
pub struct LotteryEngine {
    picks: usize,
    balls: usize,
    chances: Vec<u32>,
    /// Outcome for each combination, indexed by lexicographic rank.
    outcomes: Vec<usize>,
}

impl LotteryEngine {
    /// Build the combination -> outcome table.
    ///
    /// Fails when the chances cannot fit in the combination space, when more
    /// picks are requested than there are seeds, or when more balls are drawn
    /// than there are seeds.
    pub fn new<R: Rng + ?Sized>(
        picks: usize,
        balls: usize,
        chances: Vec<u32>,
        rng: &mut R,
    ) -> Result<Self, LotteryError> {
        let num_seeds = chances.len();
        if num_seeds == 0 {
            return Err(LotteryError::NoSeeds);
        }
        if picks > num_seeds {
            return Err(LotteryError::TooManyPicks { picks, seeds: num_seeds });
        }
        if balls > num_seeds {
            return Err(LotteryError::TooManyBalls { balls, seeds: num_seeds });
        }

        let capacity = checked_combinations_count(num_seeds as i64, balls as i64)
            .filter(|&c| c <= MAX_COMBINATIONS)
            .ok_or(LotteryError::CombinationSpaceTooLarge {
                seeds: num_seeds,
                balls,
                limit: MAX_COMBINATIONS,
            })?;
        let capacity = capacity as usize;

        let total: u64 = chances.iter().map(|&c| u64::from(c)).sum();
        if total > capacity as u64 {
            return Err(LotteryError::ChancesExceedCapacity { total, capacity });
        }

        let sentinel = num_seeds;
        let mut pool: Vec<usize> = Vec::with_capacity(capacity);
        for (seed, &count) in chances.iter().enumerate() {
            pool.extend(std::iter::repeat(seed).take(count as usize));
        }
        pool.resize(capacity, sentinel);
        pool.shuffle(rng);

        // Entry `i` of the shuffled pool belongs to the `i`-th combination in
        // lexicographic order, so a lookup is a rank computation.
        debug!(
            seeds = num_seeds,
            balls,
            capacity,
            weighted = total,
            "built lottery outcome table"
        );

        Ok(LotteryEngine {
            picks,
            balls,
            chances,
            outcomes: pool,
        })
    }

    pub fn num_seeds(&self) -> usize {
        self.chances.len()
    }

    pub fn picks(&self) -> usize {
        self.picks
    }

    pub fn balls(&self) -> usize {
        self.balls
    }

    pub fn chances(&self) -> &[u32] {
        &self.chances
    }

    /// The value used for combinations that resolve to no team.
    pub fn sentinel(&self) -> usize {
        self.num_seeds()
    }

    /// Outcome mapped to a sorted combination of seeds.
    pub fn outcome_of(&self, combo: &[usize]) -> usize {
        self.outcomes[combination_rank(self.num_seeds(), combo)]
    }

    /// Draw one random combination of `balls` distinct seeds, sorted.
    pub fn draw_combination<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let mut combo = index::sample(rng, self.num_seeds(), self.balls).into_vec();
        combo.sort_unstable();
        combo
    }

    /// Run one full lottery and return the pick order (length = `picks`).
    ///
    /// Draws are rejection-sampled: a combination whose outcome is the
    /// sentinel or an already placed seed is discarded and redrawn. Once no
    /// unplaced seed holds any balls, the remaining seeds keep their seed
    /// order in the trailing slots.
    pub fn play_lottery<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<usize> {
        let num_seeds = self.num_seeds();
        let mut order: Vec<usize> = (0..num_seeds).collect();
        let mut resolved = vec![false; num_seeds + 1];
        resolved[self.sentinel()] = true;

        let drawable = self.chances.iter().filter(|&&c| c > 0).count();
        let lottery_draws = self.picks.min(drawable);

        let mut filled = 0;
        while filled < lottery_draws {
            let combo = self.draw_combination(rng);
            let outcome = self.outcome_of(&combo);
            if resolved[outcome] {
                continue;
            }
            resolved[outcome] = true;

            // Already placed seeds occupy 0..filled, so the winner sits at or
            // after the next open slot.
            if let Some(old_index) = order.iter().position(|&s| s == outcome) {
                let seed = order.remove(old_index);
                order.insert(filled, seed);
            }
            filled += 1;
        }

        order.truncate(self.picks);
        order
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
