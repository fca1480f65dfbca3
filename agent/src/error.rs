use async_openai::error::OpenAIError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Openai error: {0}")]
    OpenaiError(#[from] OpenAIError),

    #[error("No response from llm: {0}")]
    LLMResponseError(String),

    #[error("Missing arg: {0}")]
    MissingArg(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Run exceeded budget of {0} turns")]
    TurnBudgetExceeded(usize),

    #[error("Run exceeded time budget of {0:?}")]
    RunTimeout(std::time::Duration),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
}
