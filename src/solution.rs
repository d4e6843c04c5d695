//! Reference solution requests: prompt assembly and cleanup of model output.

use serde::Deserialize;

use crate::config::Prompts;
use crate::util::{fill_template, strip_code_fences};

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionRequest {
  pub problem_description: String,
  pub language: String,
  #[serde(default = "default_difficulty")]
  pub difficulty: String,
}

fn default_difficulty() -> String {
  "Medium".into()
}

impl SolutionRequest {
  /// (system, user) prompts for the model call.
  pub fn prompts(&self, prompts: &Prompts) -> (String, String) {
    let system = fill_template(
      &prompts.solution_system_template,
      &[("language", self.language.as_str()), ("difficulty", self.difficulty.as_str())],
    );
    let user = fill_template(
      &prompts.solution_user_template,
      &[("problem", self.problem_description.as_str()), ("language", self.language.as_str())],
    );
    (system, user)
  }
}

/// Raw code from the model output, or None when nothing usable remains.
pub fn clean_solution(raw: &str) -> Option<String> {
  let code = strip_code_fences(raw);
  if code.is_empty() { None } else { Some(code) }
}
