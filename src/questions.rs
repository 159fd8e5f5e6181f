// src/questions.rs
// Fixed survey prompts and the linear sequencer over them.

pub const QUESTIONS: [&str; 5] = [
    "Who are you inspired by?",
    "What are your interests?",
    "What music do you like?",
    "How are you feeling today?",
    "What do you want to work on?",
];

/// Linear walk over the fixed prompt list. Position is identity; there is no
/// branching and no way to go back.
#[derive(Debug, Clone, Default)]
pub struct QuestionDeck {
    index: usize,
}

impl QuestionDeck {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn current(&self) -> &'static str {
        QUESTIONS[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        QUESTIONS.len()
    }

    pub fn is_last(&self) -> bool {
        self.index == QUESTIONS.len() - 1
    }

    /// Moves to the next prompt. No-op on the last prompt; returns whether
    /// the index actually moved.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn progress_label(&self) -> String {
        format!("({}/{})", self.index + 1, self.total())
    }
}
