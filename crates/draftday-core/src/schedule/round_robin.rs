// Single round robin via the circle method.

use super::pair::Pair;
use super::ScheduleError;

/// Generate `n - 1` weeks in which every pair of `teams` meets exactly once.
///
/// The first team stays fixed while the rest rotate one place per week.
/// Deterministic for a given team order.
pub fn round_robin_weeks<T: Ord + Clone>(teams: &[T]) -> Result<Vec<Vec<Pair<T>>>, ScheduleError> {
    let n = teams.len();
    if n % 2 != 0 {
        return Err(ScheduleError::invalid(format!(
            "round robin needs an even number of teams, got {n}"
        )));
    }
    let Some((fixed, rest)) = teams.split_first() else {
        return Ok(Vec::new());
    };

    let half = n / 2;
    let mut rotation: Vec<T> = rest.to_vec();
    let mut weeks = Vec::with_capacity(n - 1);

    for _ in 0..n - 1 {
        let left = std::iter::once(fixed).chain(rotation[..half - 1].iter());
        let right = rotation[half - 1..].iter().rev();
        let week = left
            .zip(right)
            .map(|(a, b)| Pair::new(a.clone(), b.clone()))
            .collect();
        weeks.push(week);
        rotation.rotate_right(1);
    }

    Ok(weeks)
}
