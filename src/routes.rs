use std::fmt;

/// Every page the app can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Lessons,
    Lesson(String),
    Quiz,
    FindHelp,
    Profile,
    Kit,
    MathGame,
    Games,
    GermBuster,
    SensoryMath,
    About,
}

impl Route {
    /// Resolves a URL path. Unknown paths give `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/lessons" => Route::Lessons,
            "/quiz" => Route::Quiz,
            "/find-help" => Route::FindHelp,
            "/profile" => Route::Profile,
            "/kit" => Route::Kit,
            "/math-game" => Route::MathGame,
            "/games" => Route::Games,
            "/germ-buster" => Route::GermBuster,
            "/sensory-math" => Route::SensoryMath,
            "/about" => Route::About,
            other => {
                let id = other.strip_prefix("/lesson/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Route::Lesson(id.to_string())
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Lessons => "/lessons".to_string(),
            Route::Lesson(id) => format!("/lesson/{id}"),
            Route::Quiz => "/quiz".to_string(),
            Route::FindHelp => "/find-help".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Kit => "/kit".to_string(),
            Route::MathGame => "/math-game".to_string(),
            Route::Games => "/games".to_string(),
            Route::GermBuster => "/germ-buster".to_string(),
            Route::SensoryMath => "/sensory-math".to_string(),
            Route::About => "/about".to_string(),
        }
    }

    /// Navigation bar, mode toggle and footer are hidden on the login page.
    pub fn shows_chrome(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Colour scheme applied to the whole page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Default,
    Calm,
    Dark,
}

impl DisplayMode {
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Default => DisplayMode::Calm,
            DisplayMode::Calm => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Default,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Default => "Normal Mode",
            DisplayMode::Calm => "Calm Mode",
            DisplayMode::Dark => "Dark Mode",
        }
    }

    /// Value for the body `data-theme` attribute.
    pub fn theme(self) -> &'static str {
        match self {
            DisplayMode::Default => "default",
            DisplayMode::Calm => "calm",
            DisplayMode::Dark => "dark",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mini games listed on the games hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    AppleMath,
    GermBuster,
    LogicLab,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::AppleMath, GameKind::GermBuster, GameKind::LogicLab];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::AppleMath => "Apple Math",
            GameKind::GermBuster => "Germ Buster Math",
            GameKind::LogicLab => "Sensory Logic Lab",
        }
    }

    pub fn route(self) -> Route {
        match self {
            GameKind::AppleMath => Route::MathGame,
            GameKind::GermBuster => Route::GermBuster,
            GameKind::LogicLab => Route::SensoryMath,
        }
    }
}

/// The two puzzles sharing the logic lab page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabTab {
    #[default]
    Dispatcher,
    Sorting,
}

impl LabTab {
    pub const ALL: [LabTab; 2] = [LabTab::Dispatcher, LabTab::Sorting];

    pub fn label(self) -> &'static str {
        match self {
            LabTab::Dispatcher => "🗺️ Health Dispatcher",
            LabTab::Sorting => "🧩 Helpful Hero Sorting",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            LabTab::Dispatcher => "Medical Robot Logic",
            LabTab::Sorting => "Helpful Hero Sorting",
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            LabTab::Dispatcher => "Program the robot to reach the patient. Avoid the red zones!",
            LabTab::Sorting => "Tap an item, then tap the box it belongs to!",
        }
    }

    /// Read aloud by the "Math Concept" button.
    pub fn math_concept(self) -> &'static str {
        match self {
            LabTab::Dispatcher => {
                "Mathematical Concept: Spatial Logic. We use coordinates and step-by-step algorithms to solve a pathfinding problem."
            }
            LabTab::Sorting => {
                "Mathematical Concept: Set Theory. We are classifying items into specific logical groups."
            }
        }
    }
}
