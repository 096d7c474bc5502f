/// A single illustrated instruction within a lesson.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LessonStep {
    /// Text shown under the illustration.
    pub text: String,
    /// Text read aloud; usually the same as `text`.
    pub audio: String,
    /// Image asset path relative to the site root.
    pub image: String,
}

/// A first-aid topic with ordered steps and safety warnings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Lesson {
    /// URL slug, as in `/lesson/<id>`.
    pub id: String,
    pub title: String,
    /// Accent colour for cards and charts.
    pub color: String,
    #[serde(default)]
    pub cover: Option<String>,
    /// Embedded video, when one is allowed.
    #[serde(default)]
    pub video_id: Option<String>,
    pub steps: Vec<LessonStep>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl Lesson {
    /// Title shortened for narrow chart labels.
    pub fn short_title(&self) -> String {
        if self.title.chars().count() > 10 {
            let head: String = self.title.chars().take(9).collect();
            format!("{head}…")
        } else {
            self.title.clone()
        }
    }
}

fn step(text: &str, image: &str) -> LessonStep {
    spoken_step(text, text, image)
}

fn spoken_step(text: &str, audio: &str, image: &str) -> LessonStep {
    LessonStep {
        text: text.to_string(),
        audio: audio.to_string(),
        image: format!("assets/{image}.png"),
    }
}

fn lesson(
    id: &str,
    title: &str,
    color: &str,
    cover: &str,
    video_id: Option<&str>,
    steps: Vec<LessonStep>,
    warnings: &[&str],
) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        color: color.to_string(),
        cover: Some(format!("assets/{cover}.png")),
        video_id: video_id.map(str::to_string),
        steps,
        warnings: warnings.iter().map(|warning| warning.to_string()).collect(),
    }
}

pub fn builtin_lessons() -> Vec<Lesson> {
    vec![
        lesson(
            "bleeding",
            "Bleeding",
            "#ef4444",
            "cover_bleeding",
            Some("gWT_mKZKw8Q"),
            vec![
                step("Wash your hands correctly.", "wash_hands"),
                step(
                    "Put pressure on the wound with a clean cloth.",
                    "apply_pressure",
                ),
                step("Keep pressure until bleeding stops.", "apply_pressure"),
                step("Cover with a bandage.", "bandage_arm"),
            ],
            &["Call 911 if bleeding is heavy."],
        ),
        lesson(
            "burns",
            "Burns",
            "#f97316",
            "cover_burns",
            Some("VS4ezqDKS8Y"),
            vec![
                step("Move away from the heat.", "burns_move_away"),
                step(
                    "Cool the burn under cool running water for 10 minutes.",
                    "burns_cool_water",
                ),
                step("Do NOT use ice or butter.", "burns_no_ice"),
                step(
                    "Cover loosely with plastic wrap or clean cloth.",
                    "burns_cover",
                ),
            ],
            &["Tell an adult immediately."],
        ),
        lesson(
            "nosebleed",
            "Nosebleed",
            "#e879f9",
            "nosebleed_pinch",
            Some("_UGeHti3zlI"),
            vec![
                step("Sit down and lean forward slightly.", "nosebleed_sit_forward"),
                step("Pinch the soft part of your nose.", "nosebleed_pinch"),
                step("Breathe through your mouth.", "nosebleed_breathe_mouth"),
                step("Hold for 10 minutes.", "nosebleed_timer"),
            ],
            &["Do NOT tilt your head back."],
        ),
        lesson(
            "fainting",
            "Fainting",
            "#8b5cf6",
            "fainting_lie_down",
            None,
            vec![
                step("Lie the person down on their back.", "fainting_lie_down"),
                step("Raise their legs slightly.", "fainting_raise_legs"),
                step("Make sure they are breathing.", "fainting_check_breath"),
                step("Stay with them until they wake up.", "fainting_stay_awake"),
            ],
            &["Call emergency if they don't wake up in 1 minute."],
        ),
        lesson(
            "emergency",
            "Call Help",
            "#22c55e",
            "emergency_dial_911",
            None,
            vec![
                step("Find a phone.", "emergency_find_phone"),
                spoken_step(
                    "Dial the emergency number (911 or 112).",
                    "Dial the emergency number.",
                    "emergency_dial_911",
                ),
                step("Say your name and where you are.", "emergency_say_location"),
                step("Do not hang up until told to.", "emergency_dont_hang_up"),
            ],
            &[],
        ),
    ]
}

/// Cursor over the steps of one lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
    len: usize,
}

impl StepCursor {
    pub fn new(lesson: &Lesson) -> Self {
        Self {
            index: 0,
            len: lesson.steps.len(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.len
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn current<'a>(&self, lesson: &'a Lesson) -> Option<&'a LessonStep> {
        lesson.steps.get(self.index)
    }
}
