//! Prompt configuration, optionally overridden from TOML.
//!
//! The file at PROBFORGE_CONFIG_PATH may override any subset of the prompts:
//!
//! ```toml
//! [prompts]
//! solution_system_template = "You write {language} solutions ..."
//! description_template = "Problem Title\n{{title}}\n..."
//! ```

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts sent to the model. Placeholders in `{braces}` are filled by
/// `util::fill_template`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  // Requirements conversation
  pub chat_system: String,
  /// Placeholders: {questions}, {answers}, {ready}
  pub memory_context_template: String,
  // Description generation. Placeholders: {template}, {answers}
  pub description_system_template: String,
  pub description_template: String,
  // Reference solution. Placeholders: {language}, {difficulty}, {problem}
  pub solution_system_template: String,
  pub solution_user_template: String,
  // Test cases. Placeholders: {category_instructions}, {description}
  pub testcases_system_template: String,
  pub testcases_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      chat_system: DEFAULT_CHAT_SYSTEM.trim().into(),
      memory_context_template: "\n\nCurrent gathered information:\n- Questions already asked: {questions}\n- User answers: {answers}\n- Ready to generate: {ready}\n\nDO NOT ask about topics you already have information on. Ask about remaining missing categories.".into(),
      description_system_template: DEFAULT_DESCRIPTION_SYSTEM.trim().into(),
      description_template: DEFAULT_DESCRIPTION_TEMPLATE.trim().into(),
      solution_system_template: "You are an expert programmer generating optimal solutions for coding problems.\n\nGenerate a {language} solution that:\n1. Is clean, efficient, and well-commented\n2. Follows best practices for {language}\n3. Has appropriate time and space complexity for {difficulty} difficulty\n4. Includes error handling where necessary\n5. Uses clear variable names and follows naming conventions\n\nOutput ONLY the raw, executable code. No markdown fences, explanations or extra text.".into(),
      solution_user_template: "Problem Description:\n{problem}\n\nGenerate an optimal {language} solution.".into(),
      testcases_system_template: DEFAULT_TESTCASES_SYSTEM.trim().into(),
      testcases_user_template: "Generate test cases for this project:\n\n{description}".into(),
    }
  }
}

const DEFAULT_CHAT_SYSTEM: &str = r#"
You are an assistant gathering requirements for a coding problem or software project.

Rules:
- Ask ONE question at a time about missing requirements.
- NEVER repeat a question that has already been asked.
- Keep track of what the user has already told you.
- Requirement categories: tech_stack, domain, entity_model, operations_required, input_output_spec.
- Once all categories are covered, say: "I am ready to generate the final description. Shall I proceed?"

Every reply MUST be a single JSON object and nothing else:
- A question with quick-reply options: {"type": "question", "question": "<short question>", "options": ["opt1", "opt2"]}
- A question expecting free-form input: {"type": "question", "question": "<short question>", "options": []}
- Any other message: {"type": "text", "content": "<text>"}
"#;

const DEFAULT_DESCRIPTION_SYSTEM: &str = r#"
You are generating a complete coding problem description from gathered requirements.

Fill the template below. Keep every section heading exactly as written, each on its own line,
followed by the section content. Output ONLY the filled template, no commentary.

TEMPLATE:
{template}

Gathered user answers:
{answers}

Paraphrase and elaborate the user's inputs. Difficulty Level must be one of: Easy, Medium, Hard, Expert.
"#;

const DEFAULT_DESCRIPTION_TEMPLATE: &str = r#"
Problem Title
<short title>

Difficulty Level
<Easy | Medium | Hard | Expert>

Topic(s)
<comma-separated topics>

Problem Description
<full statement>

Input Format
<input layout>

Output Format
<output layout>

Constraints
<limits, one per line>

Sample Input
<raw input>

Sample Output
<raw output>

Explanation
<why the sample output is correct>

Edge Cases to Consider
<edge cases>

Additional Notes
<anything else>
"#;

const DEFAULT_TESTCASES_SYSTEM: &str = r#"
You are a test case generator. Generate detailed, professional test cases based on the project description.

For each test case provide: test_id (category prefix + two digits, e.g. FT01; prefixes FE, ME, FT, E2E, API, DB, ST, PT, NT, BT),
description, steps (numbered, newline separated), expected_input and expected_output.

Respond with a JSON object only:
{"testcases": [{"category": "category_id", "test_id": "FT01", "description": "...", "steps": "1. ...\n2. ...", "expected_input": "...", "expected_output": "..."}]}

Categories and counts to generate:
{category_instructions}
"#;

/// Load `AppConfig` from PROBFORGE_CONFIG_PATH. On any IO/parse error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("PROBFORGE_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "probforge", %path, "Loaded prompt config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "probforge", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "probforge", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::description::parse_description;

  #[test]
  fn partial_toml_keeps_remaining_defaults() {
    let cfg: AppConfig = toml::from_str("[prompts]\nsolution_user_template = \"Solve: {problem}\"\n").unwrap();
    assert_eq!(cfg.prompts.solution_user_template, "Solve: {problem}");
    assert_eq!(cfg.prompts.chat_system, Prompts::default().chat_system);
  }

  #[test]
  fn empty_toml_is_all_defaults() {
    let cfg: AppConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.prompts.description_template, Prompts::default().description_template);
  }

  #[test]
  fn default_template_carries_every_section_label() {
    let parsed = parse_description(&Prompts::default().description_template);
    assert_eq!(parsed.filled(), 12);
    assert_eq!(parsed.problem_title, "<short title>");
  }
}
