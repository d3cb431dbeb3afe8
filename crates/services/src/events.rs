use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use quiz_core::model::SectionName;

/// Notifications from `QuizManager` to its presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    SectionAdded {
        name: SectionName,
    },
    SectionRemoved {
        name: SectionName,
    },
    SectionEdited {
        name: SectionName,
    },
    /// Position within the active run; global across sections in a marathon.
    QuestionChanged {
        index: usize,
    },
    TestStarted {
        section: SectionName,
    },
    TestEnded {
        section: SectionName,
        correct: usize,
        total: usize,
    },
    MarathonStarted {
        sections: Vec<SectionName>,
    },
    MarathonEnded {
        correct: usize,
        total: usize,
    },
    AnswerChecked {
        correct: bool,
    },
    Error {
        message: String,
    },
}

/// Receiving end handed out by `EventBus::subscribe`.
pub type EventReceiver = UnboundedReceiver<QuizEvent>;

/// Take every event queued on `rx` without waiting.
pub fn drain(rx: &mut EventReceiver) -> Vec<QuizEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

/// Fan-out of `QuizEvent`s to channel subscribers.
///
/// Subscribers whose receiver was dropped are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<UnboundedSender<QuizEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn emit(&mut self, event: &QuizEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
