//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Request bodies use the camelCase names the web client sends.

use serde::{Deserialize, Serialize};

use crate::chat::{AssistantReply, ChatMemory, ChatMessage};
use crate::description::ParsedDescription;
use crate::testcases::{PlanEntry, Testcase, TestcaseCategory, TestcaseConfig, TestcasePlan};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Chat {
        messages: Vec<ChatMessage>,
        #[serde(default)]
        memory: Option<ChatMemory>,
    },
    GenerateDescription {
        messages: Vec<ChatMessage>,
        #[serde(default)]
        memory: Option<ChatMemory>,
    },
    ParseDescription {
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Assistant {
        reply: AssistantReply,
        raw: String,
        memory: ChatMemory,
    },
    Description {
        raw: String,
        description: ParsedDescription,
        html: String,
    },
    Parsed {
        description: ParsedDescription,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub llm: bool,
}

#[derive(Deserialize)]
pub struct TextIn {
    pub text: String,
}
#[derive(Serialize)]
pub struct TextOut {
    pub text: String,
}

#[derive(Deserialize)]
pub struct HtmlIn {
    pub html: String,
}
#[derive(Serialize)]
pub struct HtmlOut {
    pub html: String,
}

#[derive(Serialize)]
pub struct OptionsOut {
    pub difficulties: Vec<&'static str>,
    pub topics: &'static [&'static str],
}

#[derive(Serialize)]
pub struct TopicsOut {
    pub topics: Vec<String>,
    /// Canonical comma-separated form.
    pub text: String,
}

#[derive(Deserialize)]
pub struct ChatIn {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub memory: Option<ChatMemory>,
}
#[derive(Serialize)]
pub struct ChatOut {
    pub reply: AssistantReply,
    pub raw: String,
    pub memory: ChatMemory,
}

#[derive(Serialize)]
pub struct DescriptionOut {
    pub raw: String,
    pub description: ParsedDescription,
    /// Canonical labelled text rendered for the rich editor.
    pub html: String,
}

#[derive(Serialize)]
pub struct SolutionOut {
    pub solution: String,
}

#[derive(Serialize)]
pub struct CategoryOut {
    pub id: TestcaseCategory,
    pub name: &'static str,
    pub prefix: &'static str,
    pub description: &'static str,
    pub weight: u32,
    pub enabled: bool,
}

pub fn category_out(category: TestcaseCategory) -> CategoryOut {
    let defaults = category.default_config();
    CategoryOut {
        id: category,
        name: category.name(),
        prefix: category.prefix(),
        description: category.description(),
        weight: defaults.weight,
        enabled: defaults.enabled,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanIn {
    pub testcase_configs: Vec<TestcaseConfig>,
}
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOut {
    pub entries: Vec<PlanEntry>,
    pub total_weight: u32,
    pub balanced: bool,
}

impl From<TestcasePlan> for PlanOut {
    fn from(plan: TestcasePlan) -> Self {
        let balanced = plan.is_balanced();
        Self { entries: plan.entries, total_weight: plan.total_weight, balanced }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestcasesIn {
    pub project_description: String,
    pub testcase_configs: Vec<TestcaseConfig>,
}
#[derive(Serialize)]
pub struct TestcasesOut {
    pub testcases: Vec<Testcase>,
}

#[derive(Deserialize)]
pub struct ExportIn {
    /// Description as stored by the editor (HTML or plain text).
    pub description: String,
    pub testcases: Vec<Testcase>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}
