use agent::Result;
use agent::llm::Message;
use agent::tools::{Tool, ToolCall, ToolDefinition};
use async_trait::async_trait;
use chrono::Local;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const NAME: &str = "save_tool";

pub struct SaveTool {
    path: PathBuf,
}

impl SaveTool {
    pub fn new(path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Self { path: path.into() })
    }
}

#[derive(Deserialize, JsonSchema)]
struct SaveArgs {
    text: String,
}

#[async_trait]
impl Tool for SaveTool {
    fn definition(&self) -> Result<ToolDefinition> {
        ToolDefinition::new::<SaveArgs>(
            NAME,
            "append research notes to the local notes file, the input should be the text to save",
        )
    }

    async fn invoke(&mut self, call: &ToolCall) -> Result<Message> {
        let args: SaveArgs = call.args()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(
            file,
            "{}\n{}\n---\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            args.text
        )?;

        Ok(Message::Tool {
            id: call.id.clone(),
            name: NAME.to_string(),
            result: format!("research notes appended to {}", self.path.display()),
        })
    }
}
