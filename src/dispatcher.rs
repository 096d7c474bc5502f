//! The "health dispatcher" puzzle: the player queues moves for a medical
//! robot, then watches it play them back on a small grid. The robot has to
//! reach the patient without touching a red zone.
//!
//! [`Dispatcher`] owns one play session. Playback is driven from outside:
//! [`Dispatcher::start`] hands out a [`RunTicket`] and the caller feeds it to
//! [`Dispatcher::step`] once per animation beat. Resetting invalidates the
//! ticket, so steps scheduled by an abandoned run are ignored.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::DispatcherConfig;
use crate::effects::{Confetti, Effect};
use crate::grid::{Coord, Direction, Level, builtin_levels};

pub const SUCCESS_MESSAGE: &str = "Program Success! Patient Reached!";
pub const FAILURE_MESSAGE: &str = "Oops! Try Again.";
pub const CAPTURE_FILE_STEM: &str = "sensory-logic-certificate";
pub const KEYBOARD_HINT: &str = "⌨️ Use Arrow Keys to move, Enter to run, Backspace to undo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunStatus::Succeeded | RunStatus::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The robot stepped onto a red zone.
    Collision(Coord),
    /// Every command ran but the robot stopped short of the patient.
    MissedGoal(Coord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(Failure),
}

impl Outcome {
    pub fn status(self) -> RunStatus {
        match self {
            Outcome::Succeeded => RunStatus::Succeeded,
            Outcome::Failed(_) => RunStatus::Failed,
        }
    }
}

/// Result of playing a whole command list without pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Positions after each executed command.
    pub path: Vec<Coord>,
    pub executed: usize,
    pub final_position: Coord,
    pub outcome: Outcome,
}

/// Applies one command, failing on a red zone.
fn advance(level: &Level, from: Coord, command: Direction) -> Result<Coord, Failure> {
    let next = level.step(from, command);
    if level.is_obstacle(next) {
        Err(Failure::Collision(next))
    } else {
        Ok(next)
    }
}

fn judge(level: &Level, position: Coord) -> Outcome {
    if position == level.end() {
        Outcome::Succeeded
    } else {
        Outcome::Failed(Failure::MissedGoal(position))
    }
}

/// Plays `commands` against `level` from its start cell.
///
/// Playback stops at the first red zone; later commands are not applied.
pub fn simulate(level: &Level, commands: &[Direction]) -> RunReport {
    let mut position = level.start();
    let mut path = Vec::with_capacity(commands.len());

    for command in commands {
        match advance(level, position, *command) {
            Ok(next) => {
                position = next;
                path.push(next);
            }
            Err(failure) => {
                if let Failure::Collision(at) = failure {
                    position = at;
                    path.push(at);
                }
                return RunReport {
                    executed: path.len(),
                    path,
                    final_position: position,
                    outcome: Outcome::Failed(failure),
                };
            }
        }
    }

    RunReport {
        executed: path.len(),
        path,
        final_position: position,
        outcome: judge(level, position),
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatcherError {
    #[error("the dispatcher needs at least one level")]
    NoLevels,
}

/// Identifies one playback run. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Moved { position: Coord, remaining: usize },
    Finished { outcome: Outcome, effects: Vec<Effect> },
    /// The ticket belongs to a run that was reset or already finished.
    Stale,
}

/// Player intents, from on-screen buttons or the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherInput {
    Command(Direction),
    Undo,
    Clear,
    Run,
    Reset,
    NextLevel,
}

impl DispatcherInput {
    /// Maps a DOM `KeyboardEvent.key` value to an input.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(DispatcherInput::Command(Direction::Up)),
            "ArrowDown" => Some(DispatcherInput::Command(Direction::Down)),
            "ArrowLeft" => Some(DispatcherInput::Command(Direction::Left)),
            "ArrowRight" => Some(DispatcherInput::Command(Direction::Right)),
            "Enter" => Some(DispatcherInput::Run),
            "Backspace" => Some(DispatcherInput::Undo),
            "Delete" => Some(DispatcherInput::Clear),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherEvent {
    Queued(Direction),
    Removed(Direction),
    Cleared,
    Started(RunTicket),
    Reset,
    LevelChanged(usize),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    levels: Vec<Level>,
    level_index: usize,
    commands: Vec<Direction>,
    position: Coord,
    status: RunStatus,
    failure: Option<Failure>,
    cursor: usize,
    generation: u64,
    capture_delay: Duration,
}

impl Dispatcher {
    pub fn new(levels: Vec<Level>, config: &DispatcherConfig) -> Result<Self, DispatcherError> {
        let first = levels.first().ok_or(DispatcherError::NoLevels)?;
        let position = first.start();

        Ok(Self {
            levels,
            level_index: 0,
            commands: Vec::new(),
            position,
            status: RunStatus::NotStarted,
            failure: None,
            cursor: 0,
            generation: 0,
            capture_delay: config.capture_delay(),
        })
    }

    /// Uses the configured levels, falling back to the built-in ones.
    pub fn from_config(config: &DispatcherConfig) -> Result<Self, DispatcherError> {
        let levels = config.levels.clone().unwrap_or_else(builtin_levels);
        Self::new(levels, config)
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn commands(&self) -> &[Direction] {
        &self.commands
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn failure(&self) -> Option<Failure> {
        self.failure
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Whether new commands may be queued.
    pub fn accepts_commands(&self) -> bool {
        self.status == RunStatus::NotStarted
    }

    pub fn push(&mut self, command: Direction) -> bool {
        if !self.accepts_commands() {
            return false;
        }
        self.commands.push(command);
        true
    }

    pub fn undo(&mut self) -> Option<Direction> {
        if !self.accepts_commands() {
            return None;
        }
        self.commands.pop()
    }

    pub fn clear(&mut self) -> bool {
        if !self.accepts_commands() {
            return false;
        }
        self.commands.clear();
        true
    }

    /// Begins playback of the queued commands.
    ///
    /// Returns `None` when a run is in flight, a result is on screen, or the
    /// queue is empty.
    pub fn start(&mut self) -> Option<RunTicket> {
        if self.status != RunStatus::NotStarted || self.commands.is_empty() {
            return None;
        }

        self.generation += 1;
        self.status = RunStatus::Running;
        self.cursor = 0;
        self.position = self.level().start();

        info!(
            level = self.level().id(),
            commands = self.commands.len(),
            "dispatcher run started"
        );
        Some(RunTicket(self.generation))
    }

    /// Applies the next queued command of the run identified by `ticket`.
    pub fn step(&mut self, ticket: RunTicket) -> StepEvent {
        if ticket.0 != self.generation || !self.is_running() {
            return StepEvent::Stale;
        }

        let command = self.commands[self.cursor];
        self.cursor += 1;

        match advance(self.level(), self.position, command) {
            Err(failure) => {
                if let Failure::Collision(at) = failure {
                    self.position = at;
                }
                self.finish(Outcome::Failed(failure))
            }
            Ok(next) => {
                self.position = next;
                debug!(%command, position = %next, "robot moved");

                let remaining = self.commands.len() - self.cursor;
                if remaining == 0 {
                    let outcome = judge(self.level(), next);
                    self.finish(outcome)
                } else {
                    StepEvent::Moved {
                        position: next,
                        remaining,
                    }
                }
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) -> StepEvent {
        self.status = outcome.status();
        self.failure = match outcome {
            Outcome::Succeeded => None,
            Outcome::Failed(failure) => Some(failure),
        };

        info!(
            level = self.level().id(),
            executed = self.cursor,
            ?outcome,
            "dispatcher run finished"
        );

        let effects = match outcome {
            Outcome::Succeeded => vec![
                Effect::Celebrate(Confetti::level_cleared()),
                Effect::speak(SUCCESS_MESSAGE),
                Effect::Capture {
                    file_stem: CAPTURE_FILE_STEM.to_string(),
                    after: self.capture_delay,
                },
            ],
            Outcome::Failed(_) => vec![Effect::speak(FAILURE_MESSAGE)],
        };

        StepEvent::Finished { outcome, effects }
    }

    /// Starts a run and steps it to the end without pacing.
    pub fn run_to_completion(&mut self) -> Option<(Outcome, Vec<Effect>)> {
        let ticket = self.start()?;
        loop {
            match self.step(ticket) {
                StepEvent::Moved { .. } => continue,
                StepEvent::Finished { outcome, effects } => return Some((outcome, effects)),
                StepEvent::Stale => return None,
            }
        }
    }

    /// Clears the queue and puts the robot back on the start cell.
    ///
    /// Allowed from every state; an in-flight run is abandoned.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.commands.clear();
        self.position = self.level().start();
        self.status = RunStatus::NotStarted;
        self.failure = None;
        self.cursor = 0;
    }

    /// Moves on to the next level after a win, wrapping past the last one.
    pub fn next_level(&mut self) -> bool {
        if self.status != RunStatus::Succeeded {
            return false;
        }
        self.level_index = (self.level_index + 1) % self.levels.len();
        self.reset();
        info!(level = self.level().id(), "dispatcher level loaded");
        true
    }

    pub fn handle(&mut self, input: DispatcherInput) -> DispatcherEvent {
        match input {
            DispatcherInput::Command(direction) => {
                if self.push(direction) {
                    DispatcherEvent::Queued(direction)
                } else {
                    DispatcherEvent::Ignored
                }
            }
            DispatcherInput::Undo => self
                .undo()
                .map_or(DispatcherEvent::Ignored, DispatcherEvent::Removed),
            DispatcherInput::Clear => {
                if self.clear() {
                    DispatcherEvent::Cleared
                } else {
                    DispatcherEvent::Ignored
                }
            }
            DispatcherInput::Run => self
                .start()
                .map_or(DispatcherEvent::Ignored, DispatcherEvent::Started),
            DispatcherInput::Reset => {
                self.reset();
                DispatcherEvent::Reset
            }
            DispatcherInput::NextLevel => {
                if self.next_level() {
                    DispatcherEvent::LevelChanged(self.level_index)
                } else {
                    DispatcherEvent::Ignored
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::{Down, Left, Right, Up};

    fn dispatcher() -> Dispatcher {
        Dispatcher::from_config(&DispatcherConfig::default()).expect("built-in levels exist")
    }

    fn queue(dispatcher: &mut Dispatcher, commands: &[Direction]) {
        for command in commands {
            assert!(dispatcher.push(*command));
        }
    }

    #[test]
    fn simulate_reaches_goal_around_obstacles() {
        let level = &builtin_levels()[0];
        let report = simulate(level, &[Right, Right, Down, Down]);

        assert_eq!(
            report.path,
            vec![
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(2, 1),
                Coord::new(2, 2)
            ]
        );
        assert_eq!(report.outcome, Outcome::Succeeded);
    }

    #[test]
    fn simulate_stops_at_first_obstacle() {
        let level = &builtin_levels()[0];
        let report = simulate(level, &[Down, Down, Right]);

        assert_eq!(report.executed, 2);
        assert_eq!(report.final_position, Coord::new(0, 2));
        assert_eq!(
            report.outcome,
            Outcome::Failed(Failure::Collision(Coord::new(0, 2)))
        );
    }

    #[test]
    fn simulate_empty_queue_misses_goal() {
        let level = &builtin_levels()[0];
        let report = simulate(level, &[]);

        assert!(report.path.is_empty());
        assert_eq!(
            report.outcome,
            Outcome::Failed(Failure::MissedGoal(Coord::new(0, 0)))
        );
    }

    #[test]
    fn stepping_reports_each_move_then_success() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Right, Right, Down, Down]);
        let ticket = dispatcher.start().expect("run should start");

        assert_eq!(dispatcher.status(), RunStatus::Running);
        assert_eq!(
            dispatcher.step(ticket),
            StepEvent::Moved {
                position: Coord::new(1, 0),
                remaining: 3
            }
        );
        dispatcher.step(ticket);
        dispatcher.step(ticket);

        match dispatcher.step(ticket) {
            StepEvent::Finished { outcome, effects } => {
                assert_eq!(outcome, Outcome::Succeeded);
                assert!(effects.contains(&Effect::speak(SUCCESS_MESSAGE)));
                assert!(effects.iter().any(|effect| matches!(
                    effect,
                    Effect::Capture { after, .. } if *after == Duration::from_millis(1500)
                )));
            }
            other => panic!("expected a finished run, got {other:?}"),
        }
        assert_eq!(dispatcher.status(), RunStatus::Succeeded);
        assert_eq!(dispatcher.position(), Coord::new(2, 2));
    }

    #[test]
    fn collision_freezes_position_and_discards_rest() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Down, Down, Right]);

        let (outcome, effects) = dispatcher.run_to_completion().expect("run should start");

        assert_eq!(outcome, Outcome::Failed(Failure::Collision(Coord::new(0, 2))));
        assert_eq!(effects, vec![Effect::speak(FAILURE_MESSAGE)]);
        assert_eq!(dispatcher.position(), Coord::new(0, 2));
        assert_eq!(dispatcher.status(), RunStatus::Failed);
    }

    #[test]
    fn clamped_move_stays_pending_until_queue_ends() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Left, Right]);
        let ticket = dispatcher.start().expect("run should start");

        assert_eq!(
            dispatcher.step(ticket),
            StepEvent::Moved {
                position: Coord::new(0, 0),
                remaining: 1
            }
        );
        assert_eq!(dispatcher.status(), RunStatus::Running);

        assert!(matches!(
            dispatcher.step(ticket),
            StepEvent::Finished {
                outcome: Outcome::Failed(Failure::MissedGoal(_)),
                ..
            }
        ));
    }

    #[test]
    fn editing_is_locked_while_running() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Right, Down]);
        dispatcher.start().expect("run should start");

        assert!(!dispatcher.push(Up));
        assert_eq!(dispatcher.undo(), None);
        assert!(!dispatcher.clear());
        assert_eq!(dispatcher.commands(), &[Right, Down]);
        assert_eq!(dispatcher.start(), None);
    }

    #[test]
    fn terminal_state_rejects_new_commands_until_reset() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Up]);
        dispatcher.run_to_completion();

        assert_eq!(dispatcher.status(), RunStatus::Failed);
        assert!(!dispatcher.push(Right));
        assert_eq!(dispatcher.start(), None);

        dispatcher.reset();
        assert!(dispatcher.push(Right));
    }

    #[test]
    fn undo_removes_last_and_tolerates_empty_queue() {
        let mut dispatcher = dispatcher();
        assert_eq!(dispatcher.undo(), None);

        queue(&mut dispatcher, &[Up, Left, Down]);
        assert_eq!(dispatcher.undo(), Some(Down));
        assert_eq!(dispatcher.commands(), &[Up, Left]);
    }

    #[test]
    fn queue_is_frozen_after_a_result() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Up, Left]);
        dispatcher.run_to_completion();
        assert_eq!(dispatcher.status(), RunStatus::Failed);
        assert_eq!(dispatcher.handle(DispatcherInput::Undo), DispatcherEvent::Ignored);
        assert_eq!(dispatcher.handle(DispatcherInput::Clear), DispatcherEvent::Ignored);
        assert_eq!(dispatcher.commands(), &[Up, Left]);

        dispatcher.reset();
        queue(&mut dispatcher, &[Right, Right, Down, Down]);
        dispatcher.run_to_completion();
        assert_eq!(dispatcher.status(), RunStatus::Succeeded);
        assert_eq!(dispatcher.handle(DispatcherInput::Undo), DispatcherEvent::Ignored);
        assert_eq!(dispatcher.handle(DispatcherInput::Clear), DispatcherEvent::Ignored);
        assert_eq!(dispatcher.commands().len(), 4);
    }

    #[test]
    fn empty_queue_cannot_start() {
        let mut dispatcher = dispatcher();
        assert_eq!(dispatcher.start(), None);
        assert_eq!(dispatcher.status(), RunStatus::NotStarted);
    }

    #[test]
    fn reset_mid_run_invalidates_ticket() {
        let mut dispatcher = dispatcher();
        queue(&mut dispatcher, &[Right, Right, Down, Down]);
        let ticket = dispatcher.start().expect("run should start");
        dispatcher.step(ticket);

        dispatcher.reset();

        assert_eq!(dispatcher.step(ticket), StepEvent::Stale);
        assert_eq!(dispatcher.position(), Coord::new(0, 0));
        assert_eq!(dispatcher.status(), RunStatus::NotStarted);
        assert!(dispatcher.commands().is_empty());
    }

    #[test]
    fn reset_restores_start_from_every_state() {
        let mut dispatcher = dispatcher();

        dispatcher.reset();
        assert_eq!(dispatcher.status(), RunStatus::NotStarted);

        queue(&mut dispatcher, &[Down, Down]);
        dispatcher.run_to_completion();
        assert_eq!(dispatcher.status(), RunStatus::Failed);
        dispatcher.reset();
        assert_eq!(dispatcher.position(), dispatcher.level().start());
        assert_eq!(dispatcher.failure(), None);
    }

    #[test]
    fn next_level_requires_success_and_wraps() {
        let mut dispatcher = dispatcher();
        assert!(!dispatcher.next_level());

        let solutions: [&[Direction]; 3] = [
            &[Right, Right, Down, Down],
            &[Right, Right, Right, Down, Down, Down],
            &[Right, Right, Right, Right, Down, Down, Down, Down],
        ];

        for (index, solution) in solutions.iter().enumerate() {
            assert_eq!(dispatcher.level_index(), index);
            queue(&mut dispatcher, solution);
            let (outcome, _) = dispatcher.run_to_completion().expect("run should start");
            assert_eq!(outcome, Outcome::Succeeded, "level {index}");
            assert!(dispatcher.next_level());
        }

        assert_eq!(dispatcher.level_index(), 0);
        assert!(dispatcher.commands().is_empty());
    }

    #[test]
    fn handle_maps_inputs_to_events() {
        let mut dispatcher = dispatcher();

        assert_eq!(
            dispatcher.handle(DispatcherInput::Command(Right)),
            DispatcherEvent::Queued(Right)
        );
        assert_eq!(
            dispatcher.handle(DispatcherInput::Undo),
            DispatcherEvent::Removed(Right)
        );
        assert_eq!(dispatcher.handle(DispatcherInput::Run), DispatcherEvent::Ignored);
        assert_eq!(
            dispatcher.handle(DispatcherInput::NextLevel),
            DispatcherEvent::Ignored
        );
        assert_eq!(dispatcher.handle(DispatcherInput::Clear), DispatcherEvent::Cleared);
        assert_eq!(dispatcher.handle(DispatcherInput::Reset), DispatcherEvent::Reset);
    }

    #[test]
    fn keyboard_mapping_ignores_unknown_keys() {
        assert_eq!(
            DispatcherInput::from_key("ArrowLeft"),
            Some(DispatcherInput::Command(Left))
        );
        assert_eq!(DispatcherInput::from_key("Enter"), Some(DispatcherInput::Run));
        assert_eq!(DispatcherInput::from_key("Backspace"), Some(DispatcherInput::Undo));
        assert_eq!(DispatcherInput::from_key("Delete"), Some(DispatcherInput::Clear));
        assert_eq!(DispatcherInput::from_key("q"), None);
    }

    #[test]
    fn rejects_empty_level_list() {
        let error = Dispatcher::new(Vec::new(), &DispatcherConfig::default())
            .expect_err("no levels should be rejected");
        assert_eq!(error, DispatcherError::NoLevels);
    }
}
