use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index;

use quiz_core::model::{AnswerOption, CHOICES_PER_QUESTION, Section};

/// Choices for question `question` of a single-section test.
///
/// The correct answer is `answers[question]`; the distractors are drawn
/// uniformly without replacement from the rest of the section's answer pool.
/// Returns an empty set for an out-of-range question.
pub fn single_section_choices<R: Rng + ?Sized>(
    section: &Section,
    question: usize,
    rng: &mut R,
) -> Vec<String> {
    let pool = section.answers();
    let Some(correct) = pool.get(question) else {
        return Vec::new();
    };

    let others = pool.len() - 1;
    let wanted = (CHOICES_PER_QUESTION - 1).min(others);

    let mut choices = Vec::with_capacity(wanted + 1);
    choices.push(correct.clone());
    // Sample from the pool with `question` removed, then shift past the gap.
    choices.extend(
        index::sample(rng, others, wanted)
            .into_iter()
            .map(|i| if i >= question { i + 1 } else { i })
            .map(|i| pool[i].clone()),
    );
    choices.shuffle(rng);
    choices
}

/// Cleaned options for question `question` of a marathon section, shuffled.
pub fn marathon_choices<R: Rng + ?Sized>(
    section: &Section,
    question: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut choices: Vec<String> = section
        .marathon_options(question)
        .into_iter()
        .map(AnswerOption::into_text)
        .collect();
    choices.shuffle(rng);
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{SectionName, SectionSource};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn section(questions: &[&str], answers: &[&str]) -> Section {
        Section::new(
            SectionName::new("S").unwrap(),
            SectionSource::new("q", "a"),
            questions.iter().map(|s| (*s).to_owned()).collect(),
            answers.iter().map(|s| (*s).to_owned()).collect(),
        )
        .unwrap()
    }

    fn flat_section() -> Section {
        section(
            &["Q1", "Q2"],
            &["A1", "A2", "x1", "x2", "x3", "x4", "x5", "x6"],
        )
    }

    #[test]
    fn single_choices_hold_correct_answer_once() {
        let section = flat_section();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let choices = single_section_choices(&section, 1, &mut rng);
            assert_eq!(choices.len(), CHOICES_PER_QUESTION);
            assert_eq!(choices.iter().filter(|c| *c == "A2").count(), 1);

            let mut unique = choices.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), CHOICES_PER_QUESTION);
        }
    }

    #[test]
    fn single_choices_are_reproducible_with_a_seed() {
        let section = flat_section();
        let first = single_section_choices(&section, 0, &mut StdRng::seed_from_u64(42));
        let second = single_section_choices(&section, 0, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn single_choices_out_of_range_are_empty() {
        let section = flat_section();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(single_section_choices(&section, 99, &mut rng).is_empty());
    }

    #[test]
    fn marathon_choices_are_cleaned_and_complete() {
        let section = section(
            &["Q1", "Q2"],
            &[
                "1. optA {ans}",
                "1. optB",
                "1. optC",
                "1. optD",
                "2. optA",
                "2. optB {ans}",
                "2. optC",
                "2. optD",
            ],
        );
        let mut rng = StdRng::seed_from_u64(3);

        let mut choices = marathon_choices(&section, 0, &mut rng);
        choices.sort();
        assert_eq!(choices, ["optA", "optB", "optC", "optD"]);
    }
}
