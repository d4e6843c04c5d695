//! Problem-level domain helpers around `ParsedDescription`: difficulty levels,
//! topic lists and completeness validation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::description::ParsedDescription;

/// Difficulty levels a finished problem may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  Expert,
}

impl Difficulty {
  pub const ALL: [Difficulty; 4] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

  pub fn as_str(self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
      Difficulty::Expert => "Expert",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Exact, case-sensitive match against the four level names.
impl FromStr for Difficulty {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Difficulty::ALL
      .iter()
      .copied()
      .find(|d| d.as_str() == s)
      .ok_or_else(|| format!("Invalid difficulty level: {}", s))
  }
}

/// Topic suggestions offered when editing a description.
pub const COMMON_TOPICS: [&str; 19] = [
  "Arrays",
  "Strings",
  "Linked Lists",
  "Stacks",
  "Queues",
  "Trees",
  "Graphs",
  "Hash Tables",
  "Dynamic Programming",
  "Greedy Algorithms",
  "Backtracking",
  "Bit Manipulation",
  "Math",
  "Two Pointers",
  "Sliding Window",
  "Binary Search",
  "Sorting",
  "Recursion",
  "Divide and Conquer",
];

/// Split a comma-separated topic string, dropping blanks.
pub fn parse_topics(topics: &str) -> Vec<String> {
  topics
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(String::from)
    .collect()
}

pub fn format_topics(topics: &[String]) -> String {
  topics.join(", ")
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
  pub valid: bool,
  pub errors: Vec<String>,
}

/// Check that every required section is filled and the difficulty is known.
/// Explanation, edge cases and notes are optional.
pub fn validate_description(d: &ParsedDescription) -> ValidationReport {
  let mut errors = Vec::new();
  let blank = |s: &str| s.trim().is_empty();

  if blank(&d.problem_title) {
    errors.push("Problem title is required".to_string());
  }
  if blank(&d.difficulty_level) {
    errors.push("Difficulty level is required".to_string());
  } else if let Err(e) = d.difficulty_level.parse::<Difficulty>() {
    errors.push(e);
  }
  if blank(&d.topics) {
    errors.push("At least one topic is required".to_string());
  }
  if blank(&d.problem_description) {
    errors.push("Problem description is required".to_string());
  }
  if blank(&d.input_format) {
    errors.push("Input format is required".to_string());
  }
  if blank(&d.output_format) {
    errors.push("Output format is required".to_string());
  }
  if blank(&d.constraints) {
    errors.push("Constraints are required".to_string());
  }
  if blank(&d.sample_input) {
    errors.push("Sample input is required".to_string());
  }
  if blank(&d.sample_output) {
    errors.push("Sample output is required".to_string());
  }

  ValidationReport { valid: errors.is_empty(), errors }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn complete() -> ParsedDescription {
    ParsedDescription {
      problem_title: "Two Sum".into(),
      difficulty_level: "Easy".into(),
      topics: "Arrays".into(),
      problem_description: "Find two numbers.".into(),
      input_format: "Array and target".into(),
      output_format: "Two indices".into(),
      constraints: "n >= 2".into(),
      sample_input: "[2,7], 9".into(),
      sample_output: "[0,1]".into(),
      ..Default::default()
    }
  }

  #[test]
  fn difficulty_parsing_is_exact() {
    assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert!("hard".parse::<Difficulty>().is_err());
    assert_eq!(Difficulty::Expert.to_string(), "Expert");
  }

  #[test]
  fn topics_split_and_join() {
    assert_eq!(parse_topics(" Arrays, ,Graphs ,"), vec!["Arrays".to_string(), "Graphs".to_string()]);
    assert_eq!(format_topics(&parse_topics("Math,Sorting")), "Math, Sorting");
    assert!(parse_topics("").is_empty());
  }

  #[test]
  fn complete_description_is_valid() {
    let report = validate_description(&complete());
    assert!(report.valid, "{:?}", report.errors);
  }

  #[test]
  fn empty_description_lists_every_required_field() {
    let report = validate_description(&ParsedDescription::default());
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 9);
    assert_eq!(report.errors[0], "Problem title is required");
    assert_eq!(report.errors[8], "Sample output is required");
  }

  #[test]
  fn unknown_difficulty_is_reported() {
    let d = ParsedDescription { difficulty_level: "Trivial".into(), ..complete() };
    let report = validate_description(&d);
    assert_eq!(report.errors, vec!["Invalid difficulty level: Trivial".to_string()]);
  }
}
