//! Pure pick-order arithmetic: mapping an overall pick number onto a
//! (round, slot, team) triple for straight and snake drafts.
//!
//! Nothing here is ever stored. Slots are recomputed on demand from the
//! draft's team order, so undo needs no order bookkeeping.

/// Total number of pick slots in a draft.
pub fn total_slots(team_count: usize, rounds: u32) -> u32 {
    team_count as u32 * rounds
}

/// 1-based round a given overall pick belongs to.
pub fn round_of(overall: u32, team_count: usize) -> u32 {
    debug_assert!(overall >= 1 && team_count > 0);
    (overall - 1) / team_count as u32 + 1
}

/// 1-based slot within the round for a given overall pick.
pub fn slot_in_round(overall: u32, team_count: usize) -> usize {
    debug_assert!(overall >= 1 && team_count > 0);
    ((overall - 1) as usize % team_count) + 1
}

/// Index into the draft's team order for the team on the clock at `overall`.
///
/// Odd rounds (and every round of a non-snake draft) walk the order
/// forward; even rounds of a snake draft walk it in reverse.
pub fn team_index(overall: u32, team_count: usize, snake: bool) -> usize {
    let slot = slot_in_round(overall, team_count);
    if snake && round_of(overall, team_count) % 2 == 0 {
        team_count - slot
    } else {
        slot - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_team_two_round_snake_order() {
        // Teams A,B,C,D indexed 0..4: snake yields A,B,C,D,D,C,B,A.
        let expected = [0, 1, 2, 3, 3, 2, 1, 0];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(team_index(i as u32 + 1, 4, true), *want);
        }
    }

    #[test]
    fn straight_order_repeats_every_round() {
        let expected = [0, 1, 2, 3, 0, 1, 2, 3];
        for (i, want) in expected.iter().enumerate() {
            assert_eq!(team_index(i as u32 + 1, 4, false), *want);
        }
    }

    #[test]
    fn rounds_and_slots_are_bijective_with_overall() {
        for &(teams, rounds, snake) in &[(4usize, 2u32, true), (3, 5, false), (12, 16, true)] {
            let mut seen = std::collections::HashSet::new();
            for overall in 1..=total_slots(teams, rounds) {
                let round = round_of(overall, teams);
                let slot = slot_in_round(overall, teams);
                assert!((1..=rounds).contains(&round));
                assert!((1..=teams).contains(&slot));
                assert!(seen.insert((round, slot)), "duplicate (round, slot)");
                // Every overall maps to a valid team index.
                assert!(team_index(overall, teams, snake) < teams);
            }
            assert_eq!(seen.len(), total_slots(teams, rounds) as usize);
        }
    }

    #[test]
    fn snake_round_is_exact_reverse_of_previous() {
        let teams = 6;
        for round in 1..8u32 {
            let base = (round - 1) * teams as u32;
            let current: Vec<_> = (1..=teams as u32)
                .map(|s| team_index(base + s, teams, true))
                .collect();
            let next: Vec<_> = (1..=teams as u32)
                .map(|s| team_index(base + teams as u32 + s, teams, true))
                .collect();
            let mut reversed = current.clone();
            reversed.reverse();
            assert_eq!(next, reversed, "round {} -> {}", round, round + 1);
        }
    }

    #[test]
    fn single_team_draft_always_on_clock() {
        for overall in 1..=10 {
            assert_eq!(team_index(overall, 1, true), 0);
            assert_eq!(round_of(overall, 1), overall);
            assert_eq!(slot_in_round(overall, 1), 1);
        }
    }
}
