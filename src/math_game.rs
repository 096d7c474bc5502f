use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::MathGameConfig;
use crate::effects::{Confetti, Effect};

/// One "count the apples" question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppleRound {
    pub left: u32,
    pub right: u32,
    /// Shuffled answer choices; exactly one equals the sum.
    pub options: Vec<u32>,
}

impl AppleRound {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &MathGameConfig) -> Self {
        let left = rng.gen_range(1..=config.max_operand);
        let right = rng.gen_range(1..=config.max_operand);
        let answer = left + right;

        let mut options = vec![answer];
        while options.len() < config.option_count {
            let candidate = rng.gen_range(1..=config.max_option);
            if !options.contains(&candidate) {
                options.push(candidate);
            }
        }
        options.shuffle(rng);

        Self {
            left,
            right,
            options,
        }
    }

    pub fn answer(&self) -> u32 {
        self.left + self.right
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickResult {
    Correct { effects: Vec<Effect> },
    Incorrect,
    /// Feedback or the result is still on screen.
    Locked,
}

#[derive(Debug, Clone)]
pub struct AppleGame {
    config: MathGameConfig,
    round: AppleRound,
    score: u32,
    feedback: Option<Feedback>,
    showing_result: bool,
}

impl AppleGame {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, config: MathGameConfig) -> Self {
        let round = AppleRound::generate(rng, &config);
        Self {
            config,
            round,
            score: 0,
            feedback: None,
            showing_result: false,
        }
    }

    pub fn config(&self) -> &MathGameConfig {
        &self.config
    }

    pub fn round(&self) -> &AppleRound {
        &self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn showing_result(&self) -> bool {
        self.showing_result
    }

    pub fn pick(&mut self, option: u32) -> PickResult {
        if self.feedback.is_some() || self.showing_result {
            return PickResult::Locked;
        }

        if option == self.round.answer() {
            self.feedback = Some(Feedback::Correct);
            self.score += 1;
            PickResult::Correct {
                effects: vec![Effect::Celebrate(Confetti::correct_sum())],
            }
        } else {
            self.feedback = Some(Feedback::Incorrect);
            PickResult::Incorrect
        }
    }

    /// Called `reveal_delay_ms` after a correct pick.
    pub fn reveal_result(&mut self) {
        if self.feedback == Some(Feedback::Correct) {
            self.showing_result = true;
        }
    }

    /// Called `feedback_clear_ms` after a wrong pick.
    pub fn clear_feedback(&mut self) {
        if self.feedback == Some(Feedback::Incorrect) {
            self.feedback = None;
        }
    }

    /// Draws a fresh question and unlocks input.
    pub fn next_round<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.round = AppleRound::generate(rng, &self.config);
        self.feedback = None;
        self.showing_result = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rounds_have_unique_options_containing_answer() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = MathGameConfig::default();

        for _ in 0..200 {
            let round = AppleRound::generate(&mut rng, &config);
            assert!((1..=5).contains(&round.left) && (1..=5).contains(&round.right));
            assert_eq!(round.options.len(), 3);
            assert_eq!(
                round
                    .options
                    .iter()
                    .filter(|option| **option == round.answer())
                    .count(),
                1
            );

            let mut sorted = round.options.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 3);
        }
    }

    #[test]
    fn correct_pick_scores_and_locks_round() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = AppleGame::new(&mut rng, MathGameConfig::default());
        let answer = game.round().answer();

        assert!(matches!(game.pick(answer), PickResult::Correct { .. }));
        assert_eq!(game.score(), 1);
        assert_eq!(game.pick(answer), PickResult::Locked);

        game.reveal_result();
        assert!(game.showing_result());

        game.next_round(&mut rng);
        assert_eq!(game.feedback(), None);
        assert!(!game.showing_result());
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn wrong_pick_locks_until_feedback_clears() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut game = AppleGame::new(&mut rng, MathGameConfig::default());
        let wrong = game
            .round()
            .options
            .iter()
            .copied()
            .find(|option| *option != game.round().answer())
            .expect("round should contain a distractor");

        assert_eq!(game.pick(wrong), PickResult::Incorrect);
        assert_eq!(game.pick(wrong), PickResult::Locked);

        game.clear_feedback();
        assert_eq!(game.feedback(), None);
        assert_eq!(game.score(), 0);
    }
}
