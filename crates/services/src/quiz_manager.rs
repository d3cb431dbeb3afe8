use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{QuestionStatus, QuizReport, Section, SectionName, SectionSource};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog::SectionCatalog;
use crate::error::{CatalogError, QuizError, SessionError};
use crate::events::{EventBus, EventReceiver, QuizEvent};
use crate::logging::LogContext;
use crate::sessions::{MarathonSession, SessionProgress, TestSession};

/// Outcome of moving forward in a marathon.
#[derive(Debug, Clone, PartialEq)]
pub enum MarathonAdvance {
    /// The cursor moved; `index` is the new global position.
    Moved { index: usize },
    /// The last question was passed; the marathon is over.
    Finished(QuizReport),
}

/// Single entry point for the presentation layer.
///
/// Owns the section catalog and at most one single-section test and one
/// marathon. State changes are published as `QuizEvent`s; failures other
/// than refused navigation at a boundary are also logged and published as
/// `QuizEvent::Error`.
pub struct QuizManager {
    catalog: SectionCatalog,
    test: Option<TestSession>,
    marathon: Option<MarathonSession>,
    events: EventBus,
    clock: Clock,
    rng: StdRng,
    log: LogContext,
}

impl QuizManager {
    /// Load the catalog from `storage`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the section index cannot be read.
    pub fn open(storage: &Storage, clock: Clock, log: LogContext) -> Result<Self, QuizError> {
        let catalog = SectionCatalog::open(storage, log.clone())?;
        tracing::info!(parent: log.span(), sections = catalog.len(), "quiz manager ready");
        Ok(Self {
            catalog,
            test: None,
            marathon: None,
            events: EventBus::new(),
            clock,
            rng: StdRng::from_os_rng(),
            log,
        })
    }

    /// Replace the choice shuffler, e.g. with a seeded one in tests.
    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn subscribe(&mut self) -> EventReceiver {
        self.events.subscribe()
    }

    //
    // ─── SECTIONS ──────────────────────────────────────────────────────────────
    //

    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the name is taken, a file cannot be
    /// read, the answer count is wrong, or the index cannot be written.
    pub fn add_section(&mut self, name: &str, source: SectionSource) -> Result<SectionName, QuizError> {
        let name = self.catalog.add(name, source).map_err(|e| self.surface(e))?;
        self.events.emit(&QuizEvent::SectionAdded { name: name.clone() });
        Ok(name)
    }

    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the section is unknown, used by an
    /// active run, or the index cannot be written.
    pub fn remove_section(&mut self, name: &str) -> Result<SectionName, QuizError> {
        let removed = self
            .ensure_not_in_use(name)
            .and_then(|()| self.catalog.remove(name))
            .map_err(|e| self.surface(e))?;
        self.events.emit(&QuizEvent::SectionRemoved {
            name: removed.clone(),
        });
        Ok(removed)
    }

    /// # Errors
    ///
    /// Same as [`Self::add_section`], plus `CatalogError::NotFound` and
    /// `CatalogError::InUse` for `old_name`.
    pub fn edit_section(
        &mut self,
        old_name: &str,
        new_name: &str,
        source: SectionSource,
    ) -> Result<SectionName, QuizError> {
        let edited = self
            .ensure_not_in_use(old_name)
            .and_then(|()| self.catalog.edit(old_name, new_name, source))
            .map_err(|e| self.surface(e))?;
        self.events.emit(&QuizEvent::SectionEdited {
            name: edited.clone(),
        });
        Ok(edited)
    }

    #[must_use]
    pub fn section_names(&self) -> Vec<SectionName> {
        self.catalog.names()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.catalog.get(name)
    }

    #[must_use]
    pub fn section_source(&self, name: &str) -> Option<&SectionSource> {
        self.catalog.source(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.catalog.iter()
    }

    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the index cannot be written.
    pub fn save_index(&mut self) -> Result<(), QuizError> {
        self.catalog.save_index().map_err(|e| self.surface(e))
    }

    /// # Errors
    ///
    /// Returns `QuizError::Catalog` if the section is unknown or a file cannot be written.
    pub fn export_section(
        &mut self,
        name: &str,
        questions_out: &Path,
        answers_out: &Path,
    ) -> Result<(), QuizError> {
        self.catalog
            .export(name, questions_out, answers_out)
            .map_err(|e| self.surface(e))
    }

    //
    // ─── SINGLE-SECTION TEST ───────────────────────────────────────────────────
    //

    /// Start a test over `name`, replacing any test in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSection` or `SessionError::EmptySection`.
    pub fn start_section_test(&mut self, name: &str) -> Result<(), QuizError> {
        let started_at = self.clock.now();
        let session = self
            .catalog
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSection(name.to_owned()))
            .and_then(|section| TestSession::new(section, started_at))
            .map_err(|e| self.surface(e))?;

        let section = session.section_name().clone();
        tracing::info!(
            parent: self.log.span(),
            section = %section,
            questions = session.total(),
            "test started"
        );
        self.test = Some(session);
        self.events.emit(&QuizEvent::TestStarted { section });
        self.events.emit(&QuizEvent::QuestionChanged { index: 0 });
        Ok(())
    }

    /// Score `answer` against the current test question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TestInactive` if no test is running.
    pub fn check_answer(&mut self, answer: &str) -> Result<bool, QuizError> {
        let correct = match self.test.as_mut() {
            Some(test) => test.check(answer),
            None => return Err(self.surface(SessionError::TestInactive)),
        };
        self.answer_checked(correct);
        Ok(correct)
    }

    /// # Errors
    ///
    /// Returns `SessionError::AtLastQuestion` on the last question, or
    /// `SessionError::TestInactive`.
    pub fn next_question(&mut self) -> Result<usize, QuizError> {
        self.move_test(TestSession::next)
    }

    /// # Errors
    ///
    /// Returns `SessionError::AtFirstQuestion` on the first question, or
    /// `SessionError::TestInactive`.
    pub fn previous_question(&mut self) -> Result<usize, QuizError> {
        self.move_test(TestSession::previous)
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` or `SessionError::TestInactive`.
    pub fn go_to_question(&mut self, index: usize) -> Result<usize, QuizError> {
        self.move_test(|test| test.go_to(index))
    }

    /// Finish the test and return its report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::TestInactive` if no test is running.
    pub fn end_test(&mut self) -> Result<QuizReport, QuizError> {
        let completed_at = self.clock.now();
        let (section, report) = match self.test.as_ref() {
            Some(test) => test
                .finish(completed_at)
                .map(|report| (test.section_name().clone(), report)),
            None => Err(SessionError::TestInactive),
        }
        .map_err(|e| self.surface(e))?;

        self.test = None;
        tracing::info!(
            parent: self.log.span(),
            section = %section,
            correct = report.correct(),
            total = report.total(),
            "test ended"
        );
        self.events.emit(&QuizEvent::TestEnded {
            section,
            correct: report.correct(),
            total: report.total(),
        });
        Ok(report)
    }

    /// Back to the first question with a clean score. No-op when inactive.
    pub fn reset_test(&mut self) {
        if let Some(test) = self.test.as_mut() {
            test.reset();
            tracing::debug!(parent: self.log.span(), "test reset");
            self.events.emit(&QuizEvent::QuestionChanged { index: 0 });
        }
    }

    #[must_use]
    pub fn is_test_active(&self) -> bool {
        self.test.is_some()
    }

    #[must_use]
    pub fn test(&self) -> Option<&TestSession> {
        self.test.as_ref()
    }

    #[must_use]
    pub fn current_section(&self) -> Option<&SectionName> {
        self.test.as_ref().map(TestSession::section_name)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&str> {
        self.test.as_ref().and_then(TestSession::question)
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&str> {
        self.test.as_ref().and_then(TestSession::correct_answer)
    }

    /// Fresh shuffled choices for the current test question.
    pub fn current_choices(&mut self) -> Vec<String> {
        match self.test.as_ref() {
            Some(test) => test.choices(&mut self.rng),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.test.as_ref().map_or(0, |t| t.score().correct())
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.test.as_ref().map(TestSession::current_index)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.test.as_ref().map_or(0, TestSession::total)
    }

    #[must_use]
    pub fn statuses(&self) -> &[QuestionStatus] {
        self.test
            .as_ref()
            .map(|t| t.score().statuses())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn test_progress(&self) -> Option<SessionProgress> {
        self.test.as_ref().map(TestSession::progress)
    }

    //
    // ─── MARATHON ──────────────────────────────────────────────────────────────
    //

    /// Start a marathon over `names` in the given order, replacing any marathon in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptySelection`, `SessionError::UnknownSection`
    /// or `SessionError::EmptySection`.
    pub fn start_marathon<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), QuizError> {
        let started_at = self.clock.now();
        let session = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.catalog
                    .get(name)
                    .cloned()
                    .ok_or_else(|| SessionError::UnknownSection(name.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()
            .and_then(|sections| MarathonSession::new(sections, started_at))
            .map_err(|e| self.surface(e))?;

        let sections = session.section_names();
        tracing::info!(
            parent: self.log.span(),
            sections = sections.len(),
            questions = session.total(),
            "marathon started"
        );
        self.marathon = Some(session);
        self.events.emit(&QuizEvent::MarathonStarted { sections });
        self.events.emit(&QuizEvent::QuestionChanged { index: 0 });
        Ok(())
    }

    /// Score `answer` against the current marathon question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MarathonInactive`, or
    /// `SessionError::MissingCorrectAnswer` if the question has no marked option.
    pub fn check_marathon_answer(&mut self, answer: &str) -> Result<bool, QuizError> {
        let correct = match self.marathon.as_mut() {
            Some(run) => run.check(answer),
            None => Err(SessionError::MarathonInactive),
        }
        .map_err(|e| self.surface(e))?;
        self.answer_checked(correct);
        Ok(correct)
    }

    /// Move forward; past the last question the marathon ends.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MarathonInactive` if no marathon is running.
    pub fn next_marathon_question(&mut self) -> Result<MarathonAdvance, QuizError> {
        let moved = match self.marathon.as_mut() {
            Some(run) => run.next(),
            None => return Err(self.surface(SessionError::MarathonInactive)),
        };
        match moved {
            Some(index) => {
                self.events.emit(&QuizEvent::QuestionChanged { index });
                Ok(MarathonAdvance::Moved { index })
            }
            None => self.end_marathon().map(MarathonAdvance::Finished),
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::AtFirstQuestion` or `SessionError::MarathonInactive`.
    pub fn previous_marathon_question(&mut self) -> Result<usize, QuizError> {
        self.move_marathon(MarathonSession::previous)
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` or `SessionError::MarathonInactive`.
    pub fn go_to_marathon_question(&mut self, index: usize) -> Result<usize, QuizError> {
        self.move_marathon(|run| run.go_to(index))
    }

    /// Finish the marathon early (or after the last question) and return its report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MarathonInactive` if no marathon is running.
    pub fn end_marathon(&mut self) -> Result<QuizReport, QuizError> {
        let completed_at = self.clock.now();
        let report = match self.marathon.as_ref() {
            Some(run) => run.finish(completed_at),
            None => Err(SessionError::MarathonInactive),
        }
        .map_err(|e| self.surface(e))?;

        self.marathon = None;
        tracing::info!(
            parent: self.log.span(),
            correct = report.correct(),
            total = report.total(),
            "marathon ended"
        );
        self.events.emit(&QuizEvent::MarathonEnded {
            correct: report.correct(),
            total: report.total(),
        });
        Ok(report)
    }

    /// Back to the first question of the first section. No-op when inactive.
    pub fn reset_marathon(&mut self) {
        if let Some(run) = self.marathon.as_mut() {
            run.reset();
            tracing::debug!(parent: self.log.span(), "marathon reset");
            self.events.emit(&QuizEvent::QuestionChanged { index: 0 });
        }
    }

    #[must_use]
    pub fn is_marathon_active(&self) -> bool {
        self.marathon.is_some()
    }

    #[must_use]
    pub fn marathon(&self) -> Option<&MarathonSession> {
        self.marathon.as_ref()
    }

    #[must_use]
    pub fn current_marathon_question(&self) -> Option<&str> {
        self.marathon.as_ref().and_then(MarathonSession::question)
    }

    /// Correct option of the current marathon question, if one is marked.
    #[must_use]
    pub fn current_marathon_answer(&self) -> Option<String> {
        self.marathon
            .as_ref()
            .and_then(|run| run.correct_answer().ok())
    }

    /// Fresh shuffled options for the current marathon question.
    pub fn current_marathon_choices(&mut self) -> Vec<String> {
        match self.marathon.as_ref() {
            Some(run) => run.choices(&mut self.rng),
            None => Vec::new(),
        }
    }

    #[must_use]
    pub fn marathon_correct_answers(&self) -> usize {
        self.marathon.as_ref().map_or(0, |r| r.score().correct())
    }

    /// Global position across all selected sections.
    #[must_use]
    pub fn marathon_index(&self) -> Option<usize> {
        self.marathon.as_ref().map(MarathonSession::global_index)
    }

    #[must_use]
    pub fn marathon_total_questions(&self) -> usize {
        self.marathon.as_ref().map_or(0, MarathonSession::total)
    }

    #[must_use]
    pub fn marathon_statuses(&self) -> &[QuestionStatus] {
        self.marathon
            .as_ref()
            .map(|r| r.score().statuses())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn marathon_section_name(&self) -> Option<&SectionName> {
        self.marathon.as_ref().map(|r| r.current_section().name())
    }

    #[must_use]
    pub fn marathon_section_question_count(&self) -> usize {
        self.marathon
            .as_ref()
            .map_or(0, |r| r.current_section().question_count())
    }

    #[must_use]
    pub fn marathon_progress(&self) -> Option<SessionProgress> {
        self.marathon.as_ref().map(MarathonSession::progress)
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn ensure_not_in_use(&self, name: &str) -> Result<(), CatalogError> {
        let in_test = self
            .test
            .as_ref()
            .is_some_and(|t| t.section_name().as_str() == name);
        let in_marathon = self.marathon.as_ref().is_some_and(|r| r.uses_section(name));
        if !(in_test || in_marathon) {
            return Ok(());
        }
        match self.catalog.get(name) {
            Some(section) => Err(CatalogError::InUse(section.name().clone())),
            None => Err(CatalogError::NotFound(name.to_owned())),
        }
    }

    fn move_test(
        &mut self,
        step: impl FnOnce(&mut TestSession) -> Result<usize, SessionError>,
    ) -> Result<usize, QuizError> {
        let index = match self.test.as_mut() {
            Some(test) => step(test),
            None => Err(SessionError::TestInactive),
        }
        .map_err(|e| self.surface(e))?;
        self.events.emit(&QuizEvent::QuestionChanged { index });
        Ok(index)
    }

    fn move_marathon(
        &mut self,
        step: impl FnOnce(&mut MarathonSession) -> Result<usize, SessionError>,
    ) -> Result<usize, QuizError> {
        let index = match self.marathon.as_mut() {
            Some(run) => step(run),
            None => Err(SessionError::MarathonInactive),
        }
        .map_err(|e| self.surface(e))?;
        self.events.emit(&QuizEvent::QuestionChanged { index });
        Ok(index)
    }

    fn answer_checked(&mut self, correct: bool) {
        tracing::debug!(parent: self.log.span(), correct, "answer checked");
        self.events.emit(&QuizEvent::AnswerChecked { correct });
    }

    /// Log a failure and publish it, unless it is refused boundary navigation.
    fn surface(&mut self, err: impl Into<QuizError>) -> QuizError {
        let err = err.into();
        if err.is_boundary() {
            tracing::debug!(parent: self.log.span(), error = %err, "navigation refused");
        } else {
            tracing::warn!(parent: self.log.span(), error = %err, "operation failed");
            self.events.emit(&QuizEvent::Error {
                message: err.to_string(),
            });
        }
        err
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::drain;
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn manager() -> (QuizManager, EventReceiver) {
        let repo = InMemoryRepository::new();
        repo.put_file("q.txt", "Q1\nQ2\n").unwrap();
        repo.put_file(
            "a.txt",
            "1. a {ans}\n1. b\n1. c\n1. d\n2. e\n2. f {ans}\n2. g\n2. h\n",
        )
        .unwrap();
        let mut manager = QuizManager::open(
            &Storage::from_memory(repo),
            fixed_clock(),
            LogContext::disabled(),
        )
        .unwrap()
        .with_rng(StdRng::seed_from_u64(11));
        manager
            .add_section("Geo", SectionSource::new("q.txt", "a.txt"))
            .unwrap();
        let events = manager.subscribe();
        (manager, events)
    }

    #[test]
    fn boundary_navigation_is_not_published() {
        let (mut manager, mut events) = manager();
        manager.start_section_test("Geo").unwrap();
        drain(&mut events);

        assert!(manager.previous_question().unwrap_err().is_boundary());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn start_failure_is_published() {
        let (mut manager, mut events) = manager();

        let err = manager.start_section_test("Nope").unwrap_err();
        assert!(matches!(err, QuizError::Session(SessionError::UnknownSection(_))));
        assert!(matches!(events.try_recv().unwrap(), QuizEvent::Error { .. }));
    }

    #[test]
    fn active_sections_cannot_be_removed_or_edited() {
        let (mut manager, _events) = manager();
        manager.start_section_test("Geo").unwrap();
        assert_eq!(manager.test().unwrap().section_name().as_str(), "Geo");

        let err = manager.remove_section("Geo").unwrap_err();
        assert!(matches!(err, QuizError::Catalog(CatalogError::InUse(_))));
        let err = manager
            .edit_section("Geo", "Other", SectionSource::new("q.txt", "a.txt"))
            .unwrap_err();
        assert!(matches!(err, QuizError::Catalog(CatalogError::InUse(_))));

        manager.end_test().unwrap();
        manager.remove_section("Geo").unwrap();
        assert!(manager.section_names().is_empty());
    }

    #[test]
    fn marathon_sections_cannot_be_removed_or_edited() {
        let (mut manager, _events) = manager();
        manager
            .add_section("Hist", SectionSource::new("q.txt", "a.txt"))
            .unwrap();
        manager.start_marathon(&["Geo"]).unwrap();
        assert!(!manager.is_test_active());

        let err = manager.remove_section("Geo").unwrap_err();
        assert!(matches!(err, QuizError::Catalog(CatalogError::InUse(_))));
        let err = manager
            .edit_section("Geo", "Geo", SectionSource::new("q.txt", "a.txt"))
            .unwrap_err();
        assert!(matches!(err, QuizError::Catalog(CatalogError::InUse(_))));

        // Sections outside the run stay editable.
        manager.remove_section("Hist").unwrap();

        manager.end_marathon().unwrap();
        manager.remove_section("Geo").unwrap();
        assert!(manager.section_names().is_empty());
    }

    #[test]
    fn reset_while_inactive_is_a_no_op() {
        let (mut manager, mut events) = manager();
        manager.reset_test();
        manager.reset_marathon();
        assert!(events.try_recv().is_err());
        assert!(!manager.is_test_active());
    }

    #[test]
    fn choices_are_empty_without_a_run() {
        let (mut manager, _events) = manager();
        assert!(manager.current_choices().is_empty());
        assert!(manager.current_marathon_choices().is_empty());
        assert!(manager.statuses().is_empty());
    }
}
