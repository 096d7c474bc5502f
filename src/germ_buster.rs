//! "Germ Buster Math": germs carrying numbers pop up on the play field and
//! the player taps the one holding the answer before the clock runs out.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::config::GermBusterConfig;
use crate::effects::{Confetti, Effect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub lhs: u32,
    pub rhs: u32,
    pub operation: Operation,
}

impl Problem {
    /// Draws two operands; subtraction always puts the larger one first.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, max_operand: u32) -> Self {
        let a = rng.gen_range(1..=max_operand);
        let b = rng.gen_range(1..=max_operand);

        if rng.gen_bool(0.5) {
            Self {
                lhs: a,
                rhs: b,
                operation: Operation::Add,
            }
        } else {
            Self {
                lhs: a.max(b),
                rhs: a.min(b),
                operation: Operation::Subtract,
            }
        }
    }

    pub fn answer(&self) -> u32 {
        match self.operation {
            Operation::Add => self.lhs + self.rhs,
            Operation::Subtract => self.lhs - self.rhs,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.operation {
            Operation::Add => '+',
            Operation::Subtract => '-',
        };
        write!(f, "{} {} {}", self.lhs, sign, self.rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GermVisual {
    Microbe,
    Invader,
    Goblin,
}

impl GermVisual {
    pub const ALL: [GermVisual; 3] = [GermVisual::Microbe, GermVisual::Invader, GermVisual::Goblin];

    pub fn emoji(self) -> &'static str {
        match self {
            GermVisual::Microbe => "🦠",
            GermVisual::Invader => "👾",
            GermVisual::Goblin => "👺",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            GermVisual::Microbe => "#84cc16",
            GermVisual::Invader => "#d946ef",
            GermVisual::Goblin => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Germ {
    pub id: u64,
    pub visual: GermVisual,
    /// Horizontal position, percent of the play field width.
    pub x: f32,
    /// Vertical position, percent of the play field height.
    pub y: f32,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOver {
    pub score: u32,
    pub new_high_score: bool,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    Counting { time_left: u32 },
    Over(GameOver),
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Splat {
    Correct { effects: Vec<Effect> },
    Wrong,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct GermBuster {
    config: GermBusterConfig,
    phase: Phase,
    score: u32,
    high_score: u32,
    time_left: u32,
    germs: Vec<Germ>,
    problem: Option<Problem>,
    next_id: u64,
}

impl GermBuster {
    pub fn new(config: GermBusterConfig, high_score: u32) -> Self {
        Self {
            time_left: config.round_seconds,
            config,
            phase: Phase::Ready,
            score: 0,
            high_score,
            germs: Vec::new(),
            problem: None,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &GermBusterConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn germs(&self) -> &[Germ] {
        &self.germs
    }

    pub fn problem(&self) -> Option<Problem> {
        self.problem
    }

    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.phase = Phase::Playing;
        self.score = 0;
        self.time_left = self.config.round_seconds;
        self.germs.clear();
        self.problem = Some(Problem::generate(rng, self.config.max_operand));
        info!(seconds = self.time_left, "germ buster started");
    }

    /// Advances the clock by one second.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Playing {
            return Tick::Idle;
        }

        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left == 0 {
            Tick::Over(self.end_game())
        } else {
            Tick::Counting {
                time_left: self.time_left,
            }
        }
    }

    fn end_game(&mut self) -> GameOver {
        self.phase = Phase::GameOver;
        self.germs.clear();

        let new_high_score = self.score > self.high_score;
        let mut effects = Vec::new();
        if new_high_score {
            self.high_score = self.score;
            effects.push(Effect::Celebrate(Confetti::high_score()));
        }

        info!(score = self.score, new_high_score, "germ buster finished");
        GameOver {
            score: self.score,
            new_high_score,
            effects,
        }
    }

    /// Adds a germ if there is room on the field.
    ///
    /// When no germ holds the answer the new one always does; otherwise it
    /// does with `correct_spawn_chance`.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Germ> {
        if self.phase != Phase::Playing || self.germs.len() >= self.config.max_targets {
            return None;
        }
        let answer = self.problem?.answer();

        let has_correct = self.germs.iter().any(|germ| germ.value == answer);
        let is_correct = !has_correct || rng.gen_bool(self.config.correct_spawn_chance);

        let value = if is_correct {
            answer
        } else {
            wrong_answer(rng, answer)
        };

        let visual = *GermVisual::ALL.choose(rng)?;
        let germ = Germ {
            id: self.next_id,
            visual,
            x: rng.gen_range(10.0..90.0),
            y: rng.gen_range(20.0..80.0),
            value,
        };
        self.next_id += 1;

        debug!(id = germ.id, value, "germ spawned");
        self.germs.push(germ);
        self.germs.last()
    }

    pub fn splat<R: Rng + ?Sized>(&mut self, rng: &mut R, germ_id: u64) -> Splat {
        if self.phase != Phase::Playing {
            return Splat::Ignored;
        }
        let Some(problem) = self.problem else {
            return Splat::Ignored;
        };
        let Some(index) = self.germs.iter().position(|germ| germ.id == germ_id) else {
            return Splat::Ignored;
        };

        if self.germs[index].value == problem.answer() {
            self.score += self.config.correct_points;
            self.germs.clear();
            self.problem = Some(Problem::generate(rng, self.config.max_operand));
            Splat::Correct {
                effects: vec![Effect::Celebrate(Confetti::germ_busted())],
            }
        } else {
            self.score = self.score.saturating_sub(self.config.wrong_penalty);
            self.germs.remove(index);
            Splat::Wrong
        }
    }
}

/// A value within two of `answer`, never the answer itself and never negative.
fn wrong_answer<R: Rng + ?Sized>(rng: &mut R, answer: u32) -> u32 {
    loop {
        let candidate = i64::from(answer) + rng.gen_range(-2..=2);
        if candidate >= 0 && candidate != i64::from(answer) {
            return candidate as u32;
        }
    }
}
