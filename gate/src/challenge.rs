//! Random arithmetic challenge generation.

use gatebot_types::{ArithmeticChallenge, ChallengeSource, GateParams, Operator};
use rand::Rng;

/// Draws challenges with operands in the configured range and a random
/// operator, guaranteeing a non-negative answer.
pub struct RandomChallengeSource {
    operand_min: i64,
    operand_max: i64,
}

impl RandomChallengeSource {
    pub fn new(params: &GateParams) -> Self {
        Self {
            operand_min: params.challenge_operand_min,
            operand_max: params.challenge_operand_max,
        }
    }
}

impl ChallengeSource for RandomChallengeSource {
    fn next_challenge(&self) -> ArithmeticChallenge {
        let mut rng = rand::thread_rng();
        let a = rng.gen_range(self.operand_min..=self.operand_max);
        let b = rng.gen_range(self.operand_min..=self.operand_max);
        let operator = if rng.gen_bool(0.5) {
            Operator::Add
        } else {
            Operator::Sub
        };
        // Subtraction keeps the larger operand first so the answer is never
        // negative.
        let (a, b) = match operator {
            Operator::Sub if a < b => (b, a),
            _ => (a, b),
        };
        ArithmeticChallenge::new(a, operator, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_source_stays_in_range_with_non_negative_answers() {
        let source = RandomChallengeSource::new(&GateParams::gate_defaults());
        for _ in 0..500 {
            let c = source.next_challenge();
            assert!((1..=9).contains(&c.operand_a), "operand_a out of range: {c}");
            assert!((1..=9).contains(&c.operand_b), "operand_b out of range: {c}");
            assert!(c.answer() >= 0, "negative answer for {c}");
        }
    }

    #[test]
    fn subtraction_operands_are_ordered() {
        let source = RandomChallengeSource::new(&GateParams::gate_defaults());
        for _ in 0..500 {
            let c = source.next_challenge();
            if c.operator == Operator::Sub {
                assert!(c.operand_a >= c.operand_b, "unordered subtraction: {c}");
            }
        }
    }

    proptest! {
        #[test]
        fn any_operand_range_yields_non_negative_answers(
            min in 1i64..=50,
            span in 0i64..=50,
        ) {
            let params = GateParams {
                challenge_operand_min: min,
                challenge_operand_max: min + span,
                ..GateParams::gate_defaults()
            };
            let source = RandomChallengeSource::new(&params);
            for _ in 0..20 {
                let c = source.next_challenge();
                prop_assert!(c.answer() >= 0);
                prop_assert!((min..=min + span).contains(&c.operand_a));
                prop_assert!((min..=min + span).contains(&c.operand_b));
            }
        }
    }
}
