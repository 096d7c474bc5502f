pub mod catalog;
pub mod catalog_manifest;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod effects;
pub mod germ_buster;
pub mod grid;
pub mod lessons;
pub mod math_game;
pub mod profile;
pub mod quiz;
pub mod routes;
pub mod sorting;
pub mod storage;
pub mod voice;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use catalog::{
    CatalogEntry, CatalogError, CatalogLoadError, CatalogStats, LessonCatalog, LessonList,
};
pub use catalog_manifest::{CatalogLeaf, CatalogManifest, CatalogNode};
pub use config::{
    ConfigError, DispatcherConfig, GameConfig, GermBusterConfig, MathGameConfig, QuizConfig,
};
pub use context::{AppContext, HIGH_SCORE_KEY, SaveProfileError};
pub use dispatcher::{
    Dispatcher, DispatcherError, DispatcherEvent, DispatcherInput, Failure, Outcome, RunReport,
    RunStatus, RunTicket, StepEvent, simulate,
};
pub use effects::{Confetti, Effect};
pub use germ_buster::{GameOver, GermBuster, Phase, Problem, Splat, Tick};
pub use grid::{Coord, Direction, Level, LevelError, builtin_levels};
pub use lessons::{Lesson, LessonStep, StepCursor, builtin_lessons};
pub use math_game::{AppleGame, AppleRound, Feedback, PickResult};
pub use profile::{KitChecklist, ProfileError, ProfileField, SafetyProfile};
pub use quiz::{AnswerFeedback, Question, QuizError, QuizSession, builtin_questions};
pub use routes::{DisplayMode, GameKind, LabTab, Route};
pub use sorting::{SortResult, SortingPuzzle};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStore;
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use voice::{VoiceCommand, parse_voice_command};
