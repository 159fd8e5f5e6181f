// src/survey.rs
// Survey flow: glues the question sequencer, the capture adapter and the
// shared answer store. Advancing is the only place answers are committed.

use crate::answers::AnswerStore;
use crate::capture::{Capability, CaptureAdapter, CaptureError, CaptureEvent, TranscriptView};
use crate::questions::QuestionDeck;
use serde::Serialize;

/// Where control is handed after the final question; answers travel through
/// the shared store, not through this route.
pub const HANDOFF_ROUTE: &str = "/mosaic";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyView {
    pub question: String,
    pub question_index: usize,
    pub question_total: usize,
    pub is_last: bool,
    pub progress_label: String,
    pub transcript: TranscriptView,
    pub recording: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceOutcome {
    pub finished: bool,
    pub question_index: usize,
    pub handoff_route: Option<String>,
}

#[derive(Debug, Default)]
pub struct SurveyFlow {
    deck: QuestionDeck,
    adapter: CaptureAdapter,
    finished: bool,
}

impl SurveyFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_question(&self) -> &'static str {
        self.deck.current()
    }

    pub fn recording(&self) -> bool {
        self.adapter.is_listening()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Gate for starting a session: with no capability the flow shows the
    /// fixed message and never enters a listening state.
    pub fn begin(&mut self, capability: Capability) -> Result<(), CaptureError> {
        if capability == Capability::Unavailable {
            self.adapter.mark_unavailable();
            return Err(CaptureError::Unavailable);
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: CaptureEvent) {
        self.adapter.apply(event);
    }

    pub fn mark_stopped(&mut self) {
        self.adapter.mark_stopped();
    }

    pub fn mark_unavailable(&mut self) {
        self.adapter.mark_unavailable();
    }

    pub fn mark_start_failed(&mut self) {
        self.adapter.mark_start_failed();
    }

    /// Commits the current question's accumulated final transcript to the
    /// store and moves on. On the last question this finishes the survey
    /// instead; the answer is still appended, exactly once.
    pub fn advance(&mut self, store: &mut AnswerStore) -> AdvanceOutcome {
        if self.finished {
            return AdvanceOutcome {
                finished: true,
                question_index: self.deck.index(),
                handoff_route: Some(HANDOFF_ROUTE.to_string()),
            };
        }

        store.append(self.deck.current(), self.adapter.committed());
        self.adapter.clear_for_next_question();

        if self.deck.is_last() {
            self.finished = true;
            self.adapter.mark_stopped();
            tracing::info!("survey finished, handing off to {}", HANDOFF_ROUTE);
            return AdvanceOutcome {
                finished: true,
                question_index: self.deck.index(),
                handoff_route: Some(HANDOFF_ROUTE.to_string()),
            };
        }

        self.deck.advance();
        tracing::info!("advanced to question {}", self.deck.index() + 1);
        AdvanceOutcome {
            finished: false,
            question_index: self.deck.index(),
            handoff_route: None,
        }
    }

    pub fn state_view(&self) -> SurveyView {
        SurveyView {
            question: self.deck.current().to_string(),
            question_index: self.deck.index(),
            question_total: self.deck.total(),
            is_last: self.deck.is_last(),
            progress_label: self.deck.progress_label(),
            transcript: self.adapter.transcript(),
            recording: self.adapter.is_listening(),
            error: self.adapter.error().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::UNAVAILABLE_MESSAGE;
    use crate::questions::QUESTIONS;

    fn speak(flow: &mut SurveyFlow, text: &str) {
        flow.handle_event(CaptureEvent::Started);
        flow.handle_event(CaptureEvent::ResultInterim(text[..1].to_string()));
        flow.handle_event(CaptureEvent::ResultFinal(text.to_string()));
        flow.mark_stopped();
    }

    #[test]
    fn advancing_appends_one_entry_per_question_in_order() {
        let mut flow = SurveyFlow::new();
        let mut store = AnswerStore::new();
        let answers = ["my mentor", "systems programming", "jazz", "pretty good", "rust"];

        for answer in answers {
            speak(&mut flow, answer);
            flow.advance(&mut store);
        }

        let expected: Vec<String> = QUESTIONS
            .iter()
            .zip(answers)
            .map(|(q, a)| format!("{}: {}", q, a))
            .collect();
        assert_eq!(store.lines(), expected);
        assert_eq!(store.len(), QUESTIONS.len(), "exactly one entry per question");
    }

    #[test]
    fn worked_example_jazz_at_index_two() {
        let mut flow = SurveyFlow::new();
        let mut store = AnswerStore::new();

        flow.advance(&mut store);
        flow.advance(&mut store);
        assert_eq!(flow.current_question(), "What music do you like?");

        speak(&mut flow, "jazz");
        let outcome = flow.advance(&mut store);

        assert_eq!(store.lines()[2], "What music do you like?: jazz");
        assert_eq!(outcome.question_index, 3);
        assert!(!outcome.finished);
        let view = flow.state_view();
        assert_eq!(view.transcript.committed, "", "transcript is cleared after advancing");
        assert_eq!(view.transcript.interim, "");
    }

    #[test]
    fn finishing_appends_last_answer_and_hands_off() {
        let mut flow = SurveyFlow::new();
        let mut store = AnswerStore::new();

        for _ in 0..QUESTIONS.len() - 1 {
            flow.advance(&mut store);
        }
        speak(&mut flow, "shipping this app");
        let outcome = flow.advance(&mut store);

        assert!(outcome.finished);
        assert_eq!(outcome.handoff_route.as_deref(), Some(HANDOFF_ROUTE));
        assert_eq!(
            store.lines().last().map(String::as_str),
            Some("What do you want to work on?: shipping this app")
        );
        assert!(!flow.recording(), "finishing stops capture");
    }

    #[test]
    fn finishing_twice_does_not_duplicate_entries() {
        let mut flow = SurveyFlow::new();
        let mut store = AnswerStore::new();

        for _ in 0..QUESTIONS.len() {
            flow.advance(&mut store);
        }
        let len = store.len();
        let outcome = flow.advance(&mut store);

        assert!(outcome.finished);
        assert_eq!(store.len(), len, "repeat finish must not append again");
    }

    #[test]
    fn unavailable_capability_never_listens() {
        let mut flow = SurveyFlow::new();
        let result = flow.begin(Capability::Unavailable);

        assert!(result.is_err());
        assert!(!flow.recording());
        let view = flow.state_view();
        assert_eq!(view.error.as_deref(), Some(UNAVAILABLE_MESSAGE));
    }

    #[test]
    fn bridge_capability_gates_session_start() {
        use crate::capture::bridge::stub::StubBridge;
        use crate::capture::RecognitionBridge;
        use std::sync::atomic::Ordering;
        use std::sync::Arc;

        let bridge: Arc<dyn RecognitionBridge> = Arc::new(StubBridge::new(Capability::Unavailable));
        let mut flow = SurveyFlow::new();
        assert!(flow.begin(bridge.capability()).is_err());
        assert!(!flow.recording());

        let stub = Arc::new(StubBridge::new(Capability::Available));
        let bridge: Arc<dyn RecognitionBridge> = stub.clone();
        let mut flow = SurveyFlow::new();
        assert!(flow.begin(bridge.capability()).is_ok());
        bridge.start_session().unwrap();
        flow.handle_event(CaptureEvent::Started);
        assert!(flow.recording());
        bridge.stop_session().unwrap();
        flow.mark_stopped();
        assert!(!flow.recording());
        assert_eq!(stub.started.load(Ordering::Relaxed), 1);
        assert_eq!(stub.stopped.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn interim_only_speech_stores_empty_answer() {
        let mut flow = SurveyFlow::new();
        let mut store = AnswerStore::new();

        flow.handle_event(CaptureEvent::Started);
        flow.handle_event(CaptureEvent::ResultInterim("half a thou".to_string()));
        flow.mark_stopped();
        flow.advance(&mut store);

        assert_eq!(
            store.lines()[0],
            format!("{}: ", QUESTIONS[0]),
            "interim text never contributes to the stored answer"
        );
    }
}
