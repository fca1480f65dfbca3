use crate::response;
use agent::Result;
use agent::llm::Message;

const SYSTEM_PROMPT: &str = include_str!("prompts/researcher.md");

pub struct PromptContext {
    pub chat_history: Vec<Message>,
    pub query: String,
}

pub struct PromptTemplate {
    system: String,
}

impl PromptTemplate {
    pub fn research_assistant() -> Result<Self> {
        Ok(Self {
            system: format!("{}\n{}", SYSTEM_PROMPT, response::format_instructions()?),
        })
    }

    // pure rendering; the agent loop appends tool observations after these
    pub fn render(&self, context: &PromptContext) -> Vec<Message> {
        let mut messages = vec![Message::System(self.system.clone())];
        messages.extend(context.chat_history.iter().cloned());
        messages.push(Message::User(context.query.clone()));
        messages
    }
}
