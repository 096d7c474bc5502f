//! Application-wide state created once at start-up.
//!
//! [`AppContext`] owns the persistent store and the game configuration and
//! hands out freshly configured game engines.

use rand::Rng;
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::dispatcher::{Dispatcher, DispatcherError};
use crate::germ_buster::{GameOver, GermBuster};
use crate::math_game::AppleGame;
use crate::profile::{KIT_KEY, KitChecklist, PROFILE_KEY, ProfileError, SafetyProfile};
use crate::quiz::{QuizError, QuizSession, builtin_questions};
use crate::sorting::SortingPuzzle;
use crate::storage::{KeyValueStore, StorageError, load_json, save_json};

pub const HIGH_SCORE_KEY: &str = "germBusterHighScore";

#[derive(Debug, thiserror::Error)]
pub enum SaveProfileError {
    #[error(transparent)]
    Invalid(#[from] ProfileError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug)]
pub struct AppContext<S: KeyValueStore> {
    store: S,
    config: GameConfig,
}

impl<S: KeyValueStore> AppContext<S> {
    pub fn new(store: S, config: GameConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// The saved profile, or an empty one if nothing was saved yet.
    pub fn load_profile(&self) -> Result<SafetyProfile, StorageError> {
        Ok(load_json(&self.store, PROFILE_KEY)?.unwrap_or_default())
    }

    pub fn save_profile(&mut self, profile: &SafetyProfile) -> Result<(), SaveProfileError> {
        profile.validate()?;
        save_json(&mut self.store, PROFILE_KEY, profile)?;
        info!("safety profile saved");
        Ok(())
    }

    pub fn load_kit(&self) -> Result<KitChecklist, StorageError> {
        Ok(load_json(&self.store, KIT_KEY)?.unwrap_or_default())
    }

    /// Flips one kit item and persists the whole checklist.
    pub fn toggle_kit_item(&mut self, id: &str) -> Result<KitChecklist, StorageError> {
        let mut kit = self.load_kit()?;
        if kit.toggle(id) {
            save_json(&mut self.store, KIT_KEY, &kit)?;
        } else {
            warn!(id, "ignoring unknown kit item");
        }
        Ok(kit)
    }

    pub fn high_score(&self) -> Result<u32, StorageError> {
        Ok(load_json(&self.store, HIGH_SCORE_KEY)?.unwrap_or(0))
    }

    /// Persists the score of a finished germ buster round if it set a record.
    pub fn record_game_over(&mut self, over: &GameOver) -> Result<bool, StorageError> {
        if !over.new_high_score {
            return Ok(false);
        }
        save_json(&mut self.store, HIGH_SCORE_KEY, &over.score)?;
        info!(score = over.score, "new germ buster high score");
        Ok(true)
    }

    pub fn dispatcher(&self) -> Result<Dispatcher, DispatcherError> {
        Dispatcher::from_config(&self.config.dispatcher)
    }

    pub fn sorting_puzzle(&self) -> SortingPuzzle {
        SortingPuzzle::default()
    }

    pub fn apple_game<R: Rng + ?Sized>(&self, rng: &mut R) -> AppleGame {
        AppleGame::new(rng, self.config.math.clone())
    }

    /// A germ buster game seeded with the stored high score.
    pub fn germ_buster(&self) -> Result<GermBuster, StorageError> {
        Ok(GermBuster::new(
            self.config.germ_buster.clone(),
            self.high_score()?,
        ))
    }

    pub fn quiz<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<QuizSession, QuizError> {
        QuizSession::start(rng, &builtin_questions(), self.config.quiz.question_count)
    }
}
