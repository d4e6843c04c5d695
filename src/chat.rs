//! Requirements conversation model: messages, gathered memory, the assistant
//! reply union, and system prompt assembly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Prompts;
use crate::util::fill_template;

/// User turn appended when asking the model for the final description.
pub const DESCRIPTION_REQUEST: &str =
  "Please generate the final project description based on all the information gathered.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Assistant,
  System,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: ChatRole,
  pub content: String,
}

impl ChatMessage {
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: ChatRole::User, content: content.into() }
  }

  pub fn system(content: impl Into<String>) -> Self {
    Self { role: ChatRole::System, content: content.into() }
  }
}

/// What the conversation has established so far. Owned by the client and sent
/// with every turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMemory {
  pub questions_asked: Vec<String>,
  pub user_answers: BTreeMap<String, String>,
  pub ready_to_generate: bool,
}

impl ChatMemory {
  /// Fold an assistant reply into the memory: remember asked questions and
  /// latch readiness once the model announces it.
  pub fn observe_reply(&mut self, raw: &str, reply: &AssistantReply) {
    if let AssistantReply::Question { question, .. } = reply {
      if !question.is_empty() && !self.questions_asked.iter().any(|q| q == question) {
        self.questions_asked.push(question.clone());
      }
    }
    if signals_ready(raw) {
      self.ready_to_generate = true;
    }
  }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
  #[default]
  Converse,
  GenerateDescription,
}

/// An assistant message as the client renders it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantReply {
  Text { content: String },
  Question { question: String, options: Vec<String> },
}

impl AssistantReply {
  /// Interpret raw assistant content. JSON objects carrying a `type` are
  /// decoded leniently (`prompt`/`choices` aliases included); anything else is
  /// plain text.
  pub fn parse_or_text(raw: &str) -> Self {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
      if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(trimmed) {
        let str_field = |keys: &[&str]| {
          keys
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str).filter(|s| !s.is_empty()))
            .map(String::from)
        };
        let kind = obj.get("type").and_then(Value::as_str).unwrap_or("text");
        if kind == "question" {
          let options = ["options", "choices"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_array))
            .map(|arr| arr.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();
          return AssistantReply::Question {
            question: str_field(&["question", "prompt", "content"]).unwrap_or_default(),
            options,
          };
        }
        return AssistantReply::Text {
          content: str_field(&["content", "text"]).unwrap_or_else(|| raw.to_string()),
        };
      }
    }
    AssistantReply::Text { content: raw.to_string() }
  }
}

/// True when the assistant says it has enough to write the description.
pub fn signals_ready(content: &str) -> bool {
  let lower = content.to_lowercase();
  lower.contains("ready to generate") || lower.contains("shall i proceed")
}

/// Assemble the system prompt for one model call from explicit inputs.
pub fn build_system_prompt(prompts: &Prompts, memory: Option<&ChatMemory>, action: ChatAction) -> String {
  match action {
    ChatAction::Converse => {
      let mut prompt = prompts.chat_system.clone();
      if let Some(m) = memory {
        prompt.push_str(&memory_context(prompts, m));
      }
      prompt
    }
    ChatAction::GenerateDescription => {
      let answers = memory
        .map(|m| &m.user_answers)
        .and_then(|a| serde_json::to_string_pretty(a).ok())
        .unwrap_or_else(|| "{}".into());
      fill_template(
        &prompts.description_system_template,
        &[("template", prompts.description_template.as_str()), ("answers", answers.as_str())],
      )
    }
  }
}

fn memory_context(prompts: &Prompts, memory: &ChatMemory) -> String {
  let questions = if memory.questions_asked.is_empty() {
    "None yet".to_string()
  } else {
    memory.questions_asked.join(", ")
  };
  let answers = serde_json::to_string(&memory.user_answers).unwrap_or_else(|_| "{}".into());
  let ready = memory.ready_to_generate.to_string();
  fill_template(
    &prompts.memory_context_template,
    &[("questions", questions.as_str()), ("answers", answers.as_str()), ("ready", ready.as_str())],
  )
}

/// Message list for a model call: system prompt first, then the conversation.
/// Client-sent system messages are dropped; the server owns the system role.
pub fn assemble_messages(system: String, history: &[ChatMessage]) -> Vec<ChatMessage> {
  std::iter::once(ChatMessage::system(system))
    .chain(history.iter().filter(|m| m.role != ChatRole::System).cloned())
    .collect()
}
