// Draft lottery: combinatorics, weighted ball machine, and named sessions.

pub mod chances;
pub mod combinatorics;
pub mod engine;
pub mod session;

use thiserror::Error;

/// Lottery configuration errors. All of them surface at construction time
/// (or, for `NoIterations`, when a sampling run is requested) and are never
/// recovered internally.
#[derive(Debug, Error)]
pub enum LotteryError {
    #[error("lottery needs at least one seed")]
    NoSeeds,

    #[error("chances sum to {total} but only {capacity} ball combinations exist")]
    ChancesExceedCapacity { total: u64, capacity: usize },

    #[error("got {chances} chance entries for {seeds} seeds")]
    ChancesLengthMismatch { chances: usize, seeds: usize },

    #[error("got {names} team names for {seeds} seeds")]
    TeamCountMismatch { names: usize, seeds: usize },

    #[error("cannot hand out {picks} picks to {seeds} seeds")]
    TooManyPicks { picks: usize, seeds: usize },

    #[error("cannot draw {balls} balls from {seeds} seeds")]
    TooManyBalls { balls: usize, seeds: usize },

    #[error("C({seeds}, {balls}) exceeds the supported {limit} combinations")]
    CombinationSpaceTooLarge {
        seeds: usize,
        balls: usize,
        limit: u128,
    },

    #[error("seed {seed} has more chances than the seed before it")]
    NonMonotonicChances { seed: usize },

    #[error("invalid chances policy: {message}")]
    InvalidPolicy { message: String },

    #[error("sampling needs at least one iteration")]
    NoIterations,
}
