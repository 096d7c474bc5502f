use rand::Rng;
use rand::seq::SliceRandom;

/// A multiple-choice safety question.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: u32,
    /// Text shown as the question prompt.
    pub prompt: String,
    /// Text read aloud by the speech collaborator.
    pub audio: String,
    pub options: Vec<String>,
    /// Index in `options` that contains the correct answer.
    pub correct_index: usize,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("the question bank is empty")]
    EmptyBank,
    #[error("question count must be at least 1")]
    QuestionCountTooSmall,
    #[error("question {id} has no option at index {index}")]
    InvalidCorrectIndex { id: u32, index: usize },
    #[error("option {index} is out of range for a question with {available} options")]
    OptionOutOfRange { index: usize, available: usize },
    #[error("the quiz is already finished")]
    Finished,
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered yet")]
    NotAnswered,
}

fn question(id: u32, prompt: &str, options: [&str; 3], correct_index: usize) -> Question {
    Question {
        id,
        prompt: prompt.to_string(),
        audio: prompt.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct_index,
    }
}

pub fn builtin_questions() -> Vec<Question> {
    vec![
        question(
            1,
            "What do you do first for a burn?",
            ["Put ice on it", "Run cool water over it", "Put butter on it"],
            1,
        ),
        question(
            2,
            "If someone has a heavy nosebleed...",
            ["Tilt head back", "Lean forward and pinch nose", "Lie down flat"],
            1,
        ),
        question(
            3,
            "What is the emergency number?",
            ["911 or 112", "123", "000"],
            0,
        ),
        question(
            4,
            "If someone faints, you should...",
            [
                "Stand them up immediately",
                "Lie them down and raise legs",
                "Shake them to wake up",
            ],
            1,
        ),
        question(
            5,
            "What is the first step for a bleeding wound?",
            ["Wash your hands", "Apply a tourniquet immediately", "Ignore it"],
            0,
        ),
    ]
}

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_index: usize,
    /// Whether this was the last question of the session.
    pub last: bool,
}

/// One pass through a shuffled slice of the question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: usize,
    answered: Option<AnswerFeedback>,
    finished: bool,
}

impl QuizSession {
    /// Shuffles `bank` and keeps the first `count` questions.
    ///
    /// Deterministic for testing when used with a seeded RNG.
    ///
    /// # Errors
    /// * Returns [`QuizError::QuestionCountTooSmall`] if `count` is zero.
    /// * Returns [`QuizError::EmptyBank`] if `bank` has no questions.
    /// * Returns [`QuizError::InvalidCorrectIndex`] if a question's answer index
    ///   does not point into its options.
    pub fn start<R: Rng + ?Sized>(
        rng: &mut R,
        bank: &[Question],
        count: usize,
    ) -> Result<Self, QuizError> {
        if count == 0 {
            return Err(QuizError::QuestionCountTooSmall);
        }
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        if let Some(broken) = bank
            .iter()
            .find(|question| question.correct_index >= question.options.len())
        {
            return Err(QuizError::InvalidCorrectIndex {
                id: broken.id,
                index: broken.correct_index,
            });
        }

        let mut questions = bank.to_vec();
        questions.shuffle(rng);
        questions.truncate(count);

        Ok(Self {
            questions,
            current: 0,
            score: 0,
            answered: None,
            finished: false,
        })
    }

    pub fn current(&self) -> Option<&Question> {
        if self.finished {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Zero-based position of the current question.
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answered(&self) -> Option<AnswerFeedback> {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn answer(&mut self, option: usize) -> Result<AnswerFeedback, QuizError> {
        if self.answered.is_some() {
            return Err(QuizError::AlreadyAnswered);
        }
        let question = self.current().ok_or(QuizError::Finished)?;
        if option >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                index: option,
                available: question.options.len(),
            });
        }

        let feedback = AnswerFeedback {
            correct: option == question.correct_index,
            correct_index: question.correct_index,
            last: self.current + 1 == self.questions.len(),
        };
        if feedback.correct {
            self.score += 1;
        }
        self.answered = Some(feedback);
        Ok(feedback)
    }

    /// Moves past the answered question. Returns `false` once the quiz is over.
    pub fn advance(&mut self) -> Result<bool, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if self.answered.take().is_none() {
            return Err(QuizError::NotAnswered);
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Ok(true)
        } else {
            self.finished = true;
            Ok(false)
        }
    }

    pub fn summary(&self) -> String {
        format!("You scored {} out of {}", self.score, self.questions.len())
    }
}
