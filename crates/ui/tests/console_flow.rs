use std::time::Duration;

use quiz_core::model::SectionSource;
use quiz_core::time::fixed_clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{LogContext, QuizManager};
use storage::repository::{InMemoryRepository, Storage};
use ui::{ConsoleSession, RunMode};

/// Every option carries the same text, so any menu number is the right one.
fn manager() -> QuizManager {
    let repo = InMemoryRepository::new();
    repo.put_file("same_q.txt", "First?\nSecond?\n").unwrap();
    repo.put_file(
        "same_a.txt",
        "1. X {ans}\n1. X\n1. X\n1. X\n2. X {ans}\n2. X\n2. X\n2. X\n",
    )
    .unwrap();
    repo.put_file("flat_q.txt", "One?\nTwo?\n").unwrap();
    repo.put_file("flat_a.txt", "A\nA\nA\nA\nA\nA\nA\nA\n").unwrap();

    let mut manager = QuizManager::open(
        &Storage::from_memory(repo),
        fixed_clock(),
        LogContext::disabled(),
    )
    .unwrap()
    .with_rng(StdRng::seed_from_u64(5));
    manager
        .add_section("Same", SectionSource::new("same_q.txt", "same_a.txt"))
        .unwrap();
    manager
        .add_section("Flat", SectionSource::new("flat_q.txt", "flat_a.txt"))
        .unwrap();
    manager
}

async fn run(manager: &mut QuizManager, mode: RunMode, script: &str) -> (Option<u32>, String) {
    let mut out = Vec::new();
    let report = ConsoleSession::new(manager, mode, script.as_bytes(), &mut out)
        .with_advance_delay(Duration::ZERO)
        .run()
        .await
        .unwrap();
    let correct = report.map(|r| u32::try_from(r.correct()).unwrap());
    (correct, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn marathon_auto_advances_to_the_report() {
    let mut manager = manager();
    manager.start_marathon(&["Same"]).unwrap();

    let (correct, out) = run(&mut manager, RunMode::Marathon, "1\n1\n").await;

    assert_eq!(correct, Some(2));
    assert!(out.contains("Question 1 of 2 [Same]"));
    assert!(out.contains("Question 2 of 2 [Same]"));
    assert!(out.contains("Correct answers: 2"));
    assert!(out.contains("2 correct of 2 (100.0%)"));
    assert!(!manager.is_marathon_active());
}

#[tokio::test]
async fn test_run_reports_boundaries_and_ends_on_command() {
    let mut manager = manager();
    manager.start_section_test("Flat").unwrap();

    let script = "1\n1\nn\nn\ng 9\n7\nbogus\n1\ne\n";
    let (correct, out) = run(&mut manager, RunMode::Test, script).await;

    assert_eq!(correct, Some(2));
    assert!(out.contains("Question 2 of 2 [Flat]"));
    assert!(out.contains("already at the last question"));
    assert!(out.contains("question index 8 is out of range (total 2)"));
    assert!(out.contains("no choice 7"));
    assert!(out.contains("unknown command: bogus"));
    assert!(out.contains("Test finished: Flat"));
    assert!(!manager.is_test_active());
}

#[tokio::test]
async fn end_of_input_finishes_the_run() {
    let mut manager = manager();
    manager.start_section_test("Flat").unwrap();

    let (correct, out) = run(&mut manager, RunMode::Test, "").await;

    assert_eq!(correct, Some(0));
    assert!(out.contains("0 correct of 2 (0.0%)"));
}

#[tokio::test]
async fn reset_redraws_the_first_question() {
    let mut manager = manager();
    manager.start_marathon(&["Same", "Flat"]).unwrap();

    let (correct, out) = run(&mut manager, RunMode::Marathon, "g 3\nr\ne\n").await;

    assert_eq!(correct, Some(0));
    assert!(out.contains("Question 3 of 4 [Flat]"));
    assert_eq!(out.matches("Question 1 of 4 [Same]").count(), 2);
}

#[tokio::test]
async fn inactive_run_returns_immediately() {
    let mut manager = manager();

    let (correct, out) = run(&mut manager, RunMode::Test, "1\n").await;

    assert_eq!(correct, None);
    assert!(out.is_empty());
}
