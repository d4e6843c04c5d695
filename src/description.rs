//! Structured problem descriptions: parsing LLM text into twelve labelled
//! sections and serializing them back to canonical labelled text.
//!
//! Parsing is best-effort. The model's formatting is not guaranteed, so the
//! parser never fails: unknown layouts degrade to partially filled or empty
//! descriptions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The twelve sections of a coding problem description, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
  ProblemTitle,
  DifficultyLevel,
  Topics,
  ProblemDescription,
  InputFormat,
  OutputFormat,
  Constraints,
  SampleInput,
  SampleOutput,
  Explanation,
  EdgeCases,
  AdditionalNotes,
}

impl Section {
  pub const ALL: [Section; 12] = [
    Section::ProblemTitle,
    Section::DifficultyLevel,
    Section::Topics,
    Section::ProblemDescription,
    Section::InputFormat,
    Section::OutputFormat,
    Section::Constraints,
    Section::SampleInput,
    Section::SampleOutput,
    Section::Explanation,
    Section::EdgeCases,
    Section::AdditionalNotes,
  ];

  /// Heading emitted by the serializer.
  pub fn label(self) -> &'static str {
    match self {
      Section::ProblemTitle => "Problem Title",
      Section::DifficultyLevel => "Difficulty Level",
      Section::Topics => "Topic(s)",
      Section::ProblemDescription => "Problem Description",
      Section::InputFormat => "Input Format",
      Section::OutputFormat => "Output Format",
      Section::Constraints => "Constraints",
      Section::SampleInput => "Sample Input",
      Section::SampleOutput => "Sample Output",
      Section::Explanation => "Explanation",
      Section::EdgeCases => "Edge Cases to Consider",
      Section::AdditionalNotes => "Additional Notes",
    }
  }

  /// Name part of the label pattern. Tolerates the variants models tend to
  /// produce ("Topics" / "Topic(s)", "Edge Cases" / "Edge Cases to Consider").
  fn name_pattern(self) -> &'static str {
    match self {
      Section::ProblemTitle => r"Problem\s*Title",
      Section::DifficultyLevel => r"Difficulty\s*(?:Level)?",
      Section::Topics => r"Topic\(?s?\)?",
      Section::ProblemDescription => r"Problem\s*Description",
      Section::InputFormat => r"Input\s*Format",
      Section::OutputFormat => r"Output\s*Format",
      Section::Constraints => r"Constraints?",
      Section::SampleInput => r"Sample\s*Input",
      Section::SampleOutput => r"Sample\s*Output",
      Section::Explanation => r"Explanation",
      Section::EdgeCases => r"Edge\s*Cases?\s*(?:to\s*Consider)?",
      Section::AdditionalNotes => r"Additional\s*Notes?",
    }
  }

  fn pattern(self) -> &'static Regex {
    &LABEL_PATTERNS[self as usize]
  }
}

// Line start, optional "#" heading marker, optional "**" bold opener, the
// name, optional "**" closer (before or after the colon), trailing whitespace.
// A single "*" is a bullet, never a heading.
static LABEL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
  Section::ALL
    .iter()
    .map(|s| {
      let src = format!(r"(?im)^(?:#+\s*)?(?:\*\*)?{}(?:\*\*)?\s*:?(?:\*\*)?\s*", s.name_pattern());
      Regex::new(&src).expect("invalid section label pattern")
    })
    .collect()
});

/// A coding problem description split into its twelve fields.
/// Every field is always present; missing sections are empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParsedDescription {
  pub problem_title: String,
  pub difficulty_level: String,
  pub topics: String,
  pub problem_description: String,
  pub input_format: String,
  pub output_format: String,
  pub constraints: String,
  pub sample_input: String,
  pub sample_output: String,
  pub explanation: String,
  pub edge_cases: String,
  pub additional_notes: String,
}

impl ParsedDescription {
  pub fn field(&self, section: Section) -> &str {
    match section {
      Section::ProblemTitle => &self.problem_title,
      Section::DifficultyLevel => &self.difficulty_level,
      Section::Topics => &self.topics,
      Section::ProblemDescription => &self.problem_description,
      Section::InputFormat => &self.input_format,
      Section::OutputFormat => &self.output_format,
      Section::Constraints => &self.constraints,
      Section::SampleInput => &self.sample_input,
      Section::SampleOutput => &self.sample_output,
      Section::Explanation => &self.explanation,
      Section::EdgeCases => &self.edge_cases,
      Section::AdditionalNotes => &self.additional_notes,
    }
  }

  pub fn field_mut(&mut self, section: Section) -> &mut String {
    match section {
      Section::ProblemTitle => &mut self.problem_title,
      Section::DifficultyLevel => &mut self.difficulty_level,
      Section::Topics => &mut self.topics,
      Section::ProblemDescription => &mut self.problem_description,
      Section::InputFormat => &mut self.input_format,
      Section::OutputFormat => &mut self.output_format,
      Section::Constraints => &mut self.constraints,
      Section::SampleInput => &mut self.sample_input,
      Section::SampleOutput => &mut self.sample_output,
      Section::Explanation => &mut self.explanation,
      Section::EdgeCases => &mut self.edge_cases,
      Section::AdditionalNotes => &mut self.additional_notes,
    }
  }

  /// Number of non-empty sections.
  pub fn filled(&self) -> usize {
    Section::ALL.iter().filter(|s| !self.field(**s).is_empty()).count()
  }
}

/// Where a section label was found in the source text.
struct SectionMatch {
  section: Section,
  start: usize,
  len: usize,
}

/// Split free-form text into the twelve description fields.
///
/// Each label is located once (first occurrence only). Matches are ordered by
/// position, and a section's content runs from the end of its label to the
/// start of the next found label. Text under a label the patterns do not
/// recognise stays inside the preceding section.
pub fn parse_description(text: &str) -> ParsedDescription {
  let mut parsed = ParsedDescription::default();
  if text.is_empty() {
    return parsed;
  }

  let mut matches: Vec<SectionMatch> = Section::ALL
    .iter()
    .filter_map(|&section| {
      section.pattern().find(text).map(|m| SectionMatch {
        section,
        start: m.start(),
        len: m.len(),
      })
    })
    .collect();
  matches.sort_by_key(|m| m.start);

  for (i, current) in matches.iter().enumerate() {
    let content_start = current.start + current.len;
    let content_end = matches.get(i + 1).map_or(text.len(), |next| next.start);
    let raw = text.get(content_start..content_end).unwrap_or("");
    *parsed.field_mut(current.section) = clean_content(raw).to_string();
  }

  parsed
}

/// Trim, then drop one leading and one trailing run of bold markers.
fn clean_content(raw: &str) -> &str {
  let mut s = raw.trim();
  if s.starts_with('*') {
    s = s.trim_start_matches('*').trim_start();
  }
  if s.ends_with('*') {
    s = s.trim_end_matches('*').trim_end();
  }
  s.trim()
}

/// Rebuild canonical labelled text. Empty fields are omitted entirely.
pub fn serialize_description(description: &ParsedDescription) -> String {
  Section::ALL
    .iter()
    .filter_map(|&section| {
      let value = description.field(section);
      if value.is_empty() {
        None
      } else {
        Some(format!("{}\n{}", section.label(), value))
      }
    })
    .collect::<Vec<_>>()
    .join("\n\n")
}
