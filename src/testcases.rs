//! Weighted test case planning, parsing of generated test cases, and the
//! export payload handed to downstream builders.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::richtext::strip_markup;
use crate::util::strip_code_fences;

/// Tests requested per category are spread over this budget by weight.
const TESTS_PER_PLAN: f64 = 20.0;
const MIN_TESTS_PER_CATEGORY: u32 = 2;
const MAX_TESTS_PER_CATEGORY: u32 = 10;
/// Weights are percentages.
pub const MAX_WEIGHT: u32 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TestcaseError {
  #[error("At least one testcase category must be enabled")]
  NoCategoriesEnabled,
  #[error("Enabled categories must have a positive total weight")]
  ZeroTotalWeight,
  #[error("Weight {weight} for {category:?} is out of range (0-100)")]
  WeightOutOfRange { category: TestcaseCategory, weight: u32 },
  #[error("Total weight is too large")]
  TotalWeightOverflow,
  #[error("Failed to parse generated testcases: {0}")]
  Parse(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestcaseCategory {
  FileExistence,
  MethodExistence,
  Functional,
  EndToEnd,
  Api,
  Database,
  Security,
  Performance,
  Negative,
  Boundary,
}

impl TestcaseCategory {
  pub const ALL: [TestcaseCategory; 10] = [
    TestcaseCategory::FileExistence,
    TestcaseCategory::MethodExistence,
    TestcaseCategory::Functional,
    TestcaseCategory::EndToEnd,
    TestcaseCategory::Api,
    TestcaseCategory::Database,
    TestcaseCategory::Security,
    TestcaseCategory::Performance,
    TestcaseCategory::Negative,
    TestcaseCategory::Boundary,
  ];

  pub fn name(self) -> &'static str {
    match self {
      TestcaseCategory::FileExistence => "File Existence Tests",
      TestcaseCategory::MethodExistence => "Method Existence Tests",
      TestcaseCategory::Functional => "Functional Tests",
      TestcaseCategory::EndToEnd => "End-to-End Tests",
      TestcaseCategory::Api => "API Tests",
      TestcaseCategory::Database => "Database Tests",
      TestcaseCategory::Security => "Security Tests",
      TestcaseCategory::Performance => "Performance Tests",
      TestcaseCategory::Negative => "Negative Tests",
      TestcaseCategory::Boundary => "Boundary Tests",
    }
  }

  /// Test id prefix, e.g. "FT" for FT01.
  pub fn prefix(self) -> &'static str {
    match self {
      TestcaseCategory::FileExistence => "FE",
      TestcaseCategory::MethodExistence => "ME",
      TestcaseCategory::Functional => "FT",
      TestcaseCategory::EndToEnd => "E2E",
      TestcaseCategory::Api => "API",
      TestcaseCategory::Database => "DB",
      TestcaseCategory::Security => "ST",
      TestcaseCategory::Performance => "PT",
      TestcaseCategory::Negative => "NT",
      TestcaseCategory::Boundary => "BT",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      TestcaseCategory::FileExistence => "File Existence Tests - Verify required files and directories exist in the project structure",
      TestcaseCategory::MethodExistence => "Method Existence Tests - Verify required methods/functions are implemented in the codebase",
      TestcaseCategory::Functional => "Functional Tests - Test core functionality, return values, and expected behavior",
      TestcaseCategory::EndToEnd => "End-to-End Tests - Complete user journey tests from start to finish",
      TestcaseCategory::Api => "API Tests - REST/GraphQL endpoint testing, request/response validation",
      TestcaseCategory::Database => "Database Tests - CRUD operations, data integrity, relationships",
      TestcaseCategory::Security => "Security Tests - Authentication, authorization, input validation, XSS/CSRF protection",
      TestcaseCategory::Performance => "Performance Tests - Load testing, stress testing, response time validation",
      TestcaseCategory::Negative => "Negative Tests - Error handling, invalid inputs, edge cases",
      TestcaseCategory::Boundary => "Boundary Tests - Min/max values, limits, threshold testing",
    }
  }

  /// Starting configuration offered to the user.
  pub fn default_config(self) -> TestcaseConfig {
    let (weight, enabled) = match self {
      TestcaseCategory::FileExistence => (10, false),
      TestcaseCategory::MethodExistence => (10, false),
      TestcaseCategory::Functional => (25, true),
      TestcaseCategory::EndToEnd => (15, false),
      TestcaseCategory::Api => (20, true),
      TestcaseCategory::Database => (10, false),
      TestcaseCategory::Security => (15, true),
      TestcaseCategory::Performance => (5, false),
      TestcaseCategory::Negative => (15, true),
      TestcaseCategory::Boundary => (10, false),
    };
    TestcaseConfig { category: self, weight, enabled }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestcaseConfig {
  pub category: TestcaseCategory,
  pub weight: u32,
  pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlanEntry {
  pub category: TestcaseCategory,
  pub weight: u32,
  pub count: u32,
}

/// Enabled categories with the number of tests to request for each.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestcasePlan {
  pub entries: Vec<PlanEntry>,
  pub total_weight: u32,
}

impl TestcasePlan {
  pub fn from_configs(configs: &[TestcaseConfig]) -> Result<Self, TestcaseError> {
    let enabled: Vec<&TestcaseConfig> = configs.iter().filter(|c| c.enabled).collect();
    if enabled.is_empty() {
      return Err(TestcaseError::NoCategoriesEnabled);
    }
    if let Some(c) = configs.iter().find(|c| c.weight > MAX_WEIGHT) {
      return Err(TestcaseError::WeightOutOfRange { category: c.category, weight: c.weight });
    }
    let total_weight = enabled
      .iter()
      .try_fold(0u32, |acc, c| acc.checked_add(c.weight))
      .ok_or(TestcaseError::TotalWeightOverflow)?;
    if total_weight == 0 {
      return Err(TestcaseError::ZeroTotalWeight);
    }

    let entries = enabled
      .iter()
      .map(|c| {
        let share = (c.weight as f64 / total_weight as f64 * TESTS_PER_PLAN).round() as u32;
        PlanEntry {
          category: c.category,
          weight: c.weight,
          count: share.clamp(MIN_TESTS_PER_CATEGORY, MAX_TESTS_PER_CATEGORY),
        }
      })
      .collect();

    Ok(Self { entries, total_weight })
  }

  /// Weights of the enabled categories add up to exactly 100%.
  pub fn is_balanced(&self) -> bool {
    self.total_weight == 100
  }

  /// One instruction line per category for the generation prompt.
  pub fn instructions(&self) -> String {
    self
      .entries
      .iter()
      .map(|e| format!("- {}: Generate {} testcases ({}% weight)", e.category.description(), e.count, e.weight))
      .collect::<Vec<_>>()
      .join("\n")
  }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testcase {
  pub id: String,
  pub category: String,
  pub test_id: String,
  pub description: String,
  pub steps: String,
  pub expected_input: String,
  pub expected_output: String,
}

#[derive(Deserialize)]
struct GeneratedTestcases {
  #[serde(default)]
  testcases: Vec<Testcase>,
}

/// Decode the model's `{"testcases": [...]}` object. A missing list is an
/// empty result; every test case without an id gets a fresh one.
pub fn parse_generated_testcases(raw: &str) -> Result<Vec<Testcase>, TestcaseError> {
  let body = strip_code_fences(raw);
  let generated: GeneratedTestcases =
    serde_json::from_str(&body).map_err(|e| TestcaseError::Parse(e.to_string()))?;
  Ok(
    generated
      .testcases
      .into_iter()
      .map(|mut tc| {
        if tc.id.is_empty() {
          tc.id = Uuid::new_v4().to_string();
        }
        tc
      })
      .collect(),
  )
}

/// Payload consumed by the project builder: the description as plain text
/// plus the test cases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestcaseExport {
  pub prompt: String,
  pub testcases: Vec<Testcase>,
}

impl TestcaseExport {
  pub fn build(description_html: &str, testcases: Vec<Testcase>) -> Self {
    Self { prompt: strip_markup(description_html), testcases }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn cfg(category: TestcaseCategory, weight: u32, enabled: bool) -> TestcaseConfig {
    TestcaseConfig { category, weight, enabled }
  }

  #[test]
  fn default_configs_enable_four_categories() {
    let defaults: Vec<_> = TestcaseCategory::ALL.iter().map(|c| c.default_config()).collect();
    let plan = TestcasePlan::from_configs(&defaults).unwrap();
    // functional 25, api 20, security 15, negative 15
    assert_eq!(plan.total_weight, 75);
    assert!(!plan.is_balanced());
    let counts: Vec<u32> = plan.entries.iter().map(|e| e.count).collect();
    assert_eq!(counts, vec![7, 5, 4, 4]);
  }

  #[test]
  fn counts_are_clamped() {
    let plan = TestcasePlan::from_configs(&[
      cfg(TestcaseCategory::Functional, 95, true),
      cfg(TestcaseCategory::Boundary, 5, true),
      cfg(TestcaseCategory::Api, 50, false),
    ])
    .unwrap();
    assert!(plan.is_balanced());
    assert_eq!(plan.entries.len(), 2);
    assert_eq!(plan.entries[0].count, 10);
    assert_eq!(plan.entries[1].count, 2);
  }

  #[test]
  fn empty_or_weightless_plans_are_rejected() {
    assert_eq!(
      TestcasePlan::from_configs(&[cfg(TestcaseCategory::Api, 50, false)]),
      Err(TestcaseError::NoCategoriesEnabled)
    );
    assert_eq!(
      TestcasePlan::from_configs(&[cfg(TestcaseCategory::Api, 0, true)]),
      Err(TestcaseError::ZeroTotalWeight)
    );
  }

  #[test]
  fn weights_above_one_hundred_are_rejected() {
    assert_eq!(
      TestcasePlan::from_configs(&[
        cfg(TestcaseCategory::Api, 3_000_000_000, true),
        cfg(TestcaseCategory::Security, 3_000_000_000, true),
      ]),
      Err(TestcaseError::WeightOutOfRange { category: TestcaseCategory::Api, weight: 3_000_000_000 })
    );
    assert_eq!(
      TestcasePlan::from_configs(&[
        cfg(TestcaseCategory::Functional, 100, true),
        cfg(TestcaseCategory::Negative, 101, false),
      ]),
      Err(TestcaseError::WeightOutOfRange { category: TestcaseCategory::Negative, weight: 101 })
    );
    let plan = TestcasePlan::from_configs(&[cfg(TestcaseCategory::Functional, MAX_WEIGHT, true)]).unwrap();
    assert_eq!(plan.total_weight, 100);
  }

  #[test]
  fn instructions_list_each_category() {
    let plan = TestcasePlan::from_configs(&[
      cfg(TestcaseCategory::Functional, 60, true),
      cfg(TestcaseCategory::Security, 40, true),
    ])
    .unwrap();
    assert_eq!(
      plan.instructions(),
      "- Functional Tests - Test core functionality, return values, and expected behavior: Generate 10 testcases (60% weight)\n\
       - Security Tests - Authentication, authorization, input validation, XSS/CSRF protection: Generate 8 testcases (40% weight)"
    );
  }

  #[test]
  fn category_ids_are_snake_case() {
    assert_eq!(serde_json::to_value(TestcaseCategory::EndToEnd).unwrap(), "end_to_end");
    let c: TestcaseConfig = serde_json::from_str(r#"{"category":"file_existence","weight":10,"enabled":true}"#).unwrap();
    assert_eq!(c.category, TestcaseCategory::FileExistence);
  }

  #[test]
  fn parses_generated_testcases_and_assigns_ids() {
    let raw = "```json\n{\"testcases\":[{\"category\":\"functional\",\"test_id\":\"FT01\",\"description\":\"adds\",\"steps\":\"1. run\",\"expected_input\":\"1 2\",\"expected_output\":\"3\"},{\"id\":\"keep\",\"test_id\":\"NT01\"}]}\n```";
    let tcs = parse_generated_testcases(raw).unwrap();
    assert_eq!(tcs.len(), 2);
    assert_eq!(tcs[0].test_id, "FT01");
    assert_eq!(tcs[0].expected_output, "3");
    assert!(Uuid::parse_str(&tcs[0].id).is_ok());
    assert_eq!(tcs[1].id, "keep");
    assert_eq!(tcs[1].description, "");
  }

  #[test]
  fn missing_list_is_empty_and_garbage_is_an_error() {
    assert!(parse_generated_testcases("{}").unwrap().is_empty());
    assert!(matches!(parse_generated_testcases("not json"), Err(TestcaseError::Parse(_))));
  }

  #[test]
  fn export_strips_description_markup() {
    let export = TestcaseExport::build("<p>Two &amp; Sum</p>", vec![Testcase::default()]);
    assert_eq!(export.prompt, "Two & Sum");
    assert_eq!(export.testcases.len(), 1);
  }
}
