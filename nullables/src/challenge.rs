//! Nullable challenge source: scripted arithmetic challenges.

use gatebot_types::{ArithmeticChallenge, ChallengeSource};
use std::sync::Mutex;

/// A deterministic challenge source for testing.
///
/// Returns pre-configured challenges in order, cycling when exhausted.
pub struct FixedChallengeSource {
    challenges: Mutex<Vec<ArithmeticChallenge>>,
    index: Mutex<usize>,
}

impl FixedChallengeSource {
    /// Create with a sequence of challenges to hand out.
    pub fn new(challenges: Vec<ArithmeticChallenge>) -> Self {
        Self {
            challenges: Mutex::new(challenges),
            index: Mutex::new(0),
        }
    }

    /// Create with a single challenge returned for every call.
    pub fn constant(challenge: ArithmeticChallenge) -> Self {
        Self::new(vec![challenge])
    }
}

impl ChallengeSource for FixedChallengeSource {
    fn next_challenge(&self) -> ArithmeticChallenge {
        let challenges = self.challenges.lock().unwrap();
        let mut idx = self.index.lock().unwrap();
        let current = *idx % challenges.len();
        *idx += 1;
        challenges[current]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatebot_types::Operator;

    #[test]
    fn test_cycles_through_the_script() {
        let source = FixedChallengeSource::new(vec![
            ArithmeticChallenge::new(1, Operator::Add, 2),
            ArithmeticChallenge::new(5, Operator::Sub, 3),
        ]);

        assert_eq!(source.next_challenge().answer(), 3);
        assert_eq!(source.next_challenge().answer(), 2);
        assert_eq!(source.next_challenge().answer(), 3);
    }

    #[test]
    fn test_constant_repeats_forever() {
        let source =
            FixedChallengeSource::constant(ArithmeticChallenge::new(4, Operator::Add, 4));
        for _ in 0..5 {
            assert_eq!(source.next_challenge().answer(), 8);
        }
    }
}
