//! Arithmetic human-verification challenge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator of an arithmetic challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
        }
    }
}

/// A one-time arithmetic question posed before a user may use the bot.
///
/// Generators guarantee a non-negative expected answer by swapping operands
/// when subtraction would go below zero; the struct itself just evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticChallenge {
    pub operand_a: i64,
    pub operator: Operator,
    pub operand_b: i64,
}

impl ArithmeticChallenge {
    pub fn new(operand_a: i64, operator: Operator, operand_b: i64) -> Self {
        Self {
            operand_a,
            operator,
            operand_b,
        }
    }

    /// The expected answer.
    pub fn answer(&self) -> i64 {
        match self.operator {
            Operator::Add => self.operand_a + self.operand_b,
            Operator::Sub => self.operand_a - self.operand_b,
        }
    }

    /// The question text shown to the user, e.g. `3 + 4 = ?`.
    pub fn prompt(&self) -> String {
        format!(
            "{} {} {} = ?",
            self.operand_a,
            self.operator.symbol(),
            self.operand_b
        )
    }
}

impl fmt::Display for ArithmeticChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.operand_a,
            self.operator.symbol(),
            self.operand_b
        )
    }
}

/// Source of fresh challenges.
///
/// The production source draws random operands; test doubles return fixed
/// sequences. Interior mutability keeps the trait object shareable.
pub trait ChallengeSource {
    fn next_challenge(&self) -> ArithmeticChallenge;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_answer() {
        let c = ArithmeticChallenge::new(3, Operator::Add, 4);
        assert_eq!(c.answer(), 7);
        assert_eq!(c.prompt(), "3 + 4 = ?");
    }

    #[test]
    fn subtraction_answer() {
        let c = ArithmeticChallenge::new(9, Operator::Sub, 2);
        assert_eq!(c.answer(), 7);
        assert_eq!(c.prompt(), "9 - 2 = ?");
    }
}
