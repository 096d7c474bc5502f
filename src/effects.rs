use std::time::Duration;

/// Confetti burst parameters handed to the celebration collaborator.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Confetti {
    pub particle_count: u32,
    pub spread: u32,
    /// Horizontal origin in viewport fractions; `None` keeps the library default.
    pub origin_x: Option<f32>,
    pub origin_y: f32,
    pub colors: Vec<&'static str>,
}

impl Confetti {
    pub fn level_cleared() -> Self {
        Self {
            particle_count: 100,
            spread: 70,
            origin_x: None,
            origin_y: 0.6,
            colors: vec!["#95D5B2", "#FF8BA7"],
        }
    }

    pub fn item_sorted() -> Self {
        Self {
            particle_count: 50,
            spread: 50,
            origin_x: None,
            origin_y: 0.5,
            colors: vec!["#4caf50"],
        }
    }

    pub fn correct_sum() -> Self {
        Self {
            particle_count: 100,
            spread: 70,
            origin_x: None,
            origin_y: 0.6,
            colors: Vec::new(),
        }
    }

    pub fn germ_busted() -> Self {
        Self {
            particle_count: 30,
            spread: 50,
            origin_x: Some(0.5),
            origin_y: 0.5,
            colors: vec!["#4caf50", "#8bc34a"],
        }
    }

    pub fn high_score() -> Self {
        Self {
            particle_count: 150,
            spread: 80,
            origin_x: None,
            origin_y: 0.6,
            colors: Vec::new(),
        }
    }
}

/// Work the game engines ask the outside world to do.
///
/// Engines only return these; the front end decides how to perform them.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Celebrate(Confetti),
    Speak(String),
    /// Save the current view as an image once `after` has elapsed.
    Capture { file_stem: String, after: Duration },
}

impl Effect {
    pub fn speak(text: impl Into<String>) -> Self {
        Effect::Speak(text.into())
    }
}
