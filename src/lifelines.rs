//! Lifeline bookkeeping.

use rand::Rng;
use rand::seq::index;

pub const STARTING_SKIPS: u8 = 3;

/// Remaining assists for the current game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifelines {
    pub fifty_fifty: bool,
    pub skips: u8,
    pub hint: bool,
}

impl Default for Lifelines {
    fn default() -> Self {
        Self {
            fifty_fifty: true,
            skips: STARTING_SKIPS,
            hint: true,
        }
    }
}

impl Lifelines {
    pub fn can_skip(&self) -> bool {
        self.skips > 0
    }
}

/// Chooses two of the three wrong options to hide, in ascending order.
pub fn pick_hidden_options<R: Rng + ?Sized>(correct: usize, rng: &mut R) -> [usize; 2] {
    let wrong: Vec<usize> = (0..4).filter(|&option| option != correct).collect();
    let chosen = index::sample(rng, wrong.len(), 2);

    let mut hidden = [wrong[chosen.index(0)], wrong[chosen.index(1)]];
    hidden.sort_unstable();
    hidden
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn starts_with_everything_available() {
        let lifelines = Lifelines::default();
        assert!(lifelines.fifty_fifty);
        assert!(lifelines.hint);
        assert_eq!(lifelines.skips, 3);
        assert!(lifelines.can_skip());
    }

    #[test]
    fn never_hides_the_correct_option() {
        for correct in 0..4 {
            for seed in 0..64 {
                let mut rng = StdRng::seed_from_u64(seed);
                let hidden = pick_hidden_options(correct, &mut rng);

                assert!(!hidden.contains(&correct));
                assert_ne!(hidden[0], hidden[1]);
                assert!(hidden.iter().all(|&option| option < 4));
            }
        }
    }

    #[test]
    fn every_wrong_pair_shows_up() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(pick_hidden_options(2, &mut rng));
        }
        assert_eq!(seen.len(), 3);
    }
}
