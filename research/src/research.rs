use crate::prompt::{PromptContext, PromptTemplate};
use crate::response::{ParseError, ResearchResponse, parse_response};
use crate::tools::{SaveTool, SearchTool, WikiTool};
use agent::callbacks::MessageLogger;
use agent::llm;
use agent::tools;
use agent::{Agent, AgentBuilder};
use agent::{Error, Result};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct AssistantOptions {
    pub max_turns: usize,
    pub timeout: Option<Duration>,
    pub transcript: Option<Box<dyn Write + Send>>,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            max_turns: 10,
            timeout: None,
            transcript: None,
        }
    }
}

pub fn default_tools(notes_path: &Path) -> Vec<Box<dyn tools::Tool + Send>> {
    vec![
        SearchTool::new(),
        WikiTool::new(),
        SaveTool::new(notes_path),
    ]
}

pub struct ResearchRun {
    pub raw_output: String,
    pub tools_invoked: Vec<String>,
}

impl ResearchRun {
    // the model's self-reported tools_used is replaced with the loop's record
    pub fn into_response(self) -> std::result::Result<ResearchResponse, ParseError> {
        let mut response = parse_response(&self.raw_output)?;
        response.tools_used = self.tools_invoked;
        Ok(response)
    }
}

pub struct ResearchAssistant {
    agent: Agent,
    template: PromptTemplate,
}

impl ResearchAssistant {
    pub fn new(
        llm: Arc<dyn llm::LLM + Send + Sync>,
        tools: Vec<Box<dyn tools::Tool + Send>>,
        options: AssistantOptions,
    ) -> Result<Self> {
        let mut builder = AgentBuilder::new()
            .llm(llm)
            .tools(tools)
            .max_turns(options.max_turns);

        if let Some(limit) = options.timeout {
            builder = builder.timeout(limit);
        }

        if let Some(writer) = options.transcript {
            builder = builder.callback(MessageLogger::new("research", writer)?);
        }

        Ok(Self {
            agent: builder.build()?,
            template: PromptTemplate::research_assistant()?,
        })
    }

    pub async fn research(&mut self, query: &str) -> Result<ResearchRun> {
        let context = PromptContext {
            chat_history: Vec::new(),
            query: query.to_string(),
        };

        let run = self.agent.run(self.template.render(&context)).await?;

        let raw_output = run
            .final_text()
            .ok_or(Error::LLMResponseError(
                "agent produced no final answer".to_string(),
            ))?
            .to_string();

        Ok(ResearchRun {
            raw_output,
            tools_invoked: run.tools_invoked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AssistantOptions, ResearchAssistant};
    use agent::Result;
    use agent::llm::{CompletionRequest, CompletionResponse, LLM, Message};
    use agent::tools::{Tool, ToolCall, ToolDefinition};
    use async_trait::async_trait;
    use std::sync::Arc;

    const QUERY: &str = "What is the impact of climate change on global agriculture?";
    const OBSERVATION: &str = "canned results about shifting crop yields";

    fn final_json(tools_used: &[&str]) -> String {
        serde_json::json!({
            "topic": "Climate change and global agriculture",
            "summary": "Warming shifts growing seasons and crop yields worldwide.",
            "sources": ["FAO: https://fao.org/climate"],
            "tools_used": tools_used,
        })
        .to_string()
    }

    struct DirectAnswerLLM;

    #[async_trait]
    impl LLM for DirectAnswerLLM {
        async fn completion<'a>(
            &self,
            request: CompletionRequest<'a>,
        ) -> Result<CompletionResponse> {
            assert!(
                matches!(request.messages.last(), Some(Message::User(content)) if content == QUERY)
            );

            // self-reports a tool it never invoked
            Ok(CompletionResponse {
                content: final_json(&["search_web"]),
                tool_calls: vec![],
            })
        }
    }

    struct SearchingLLM;

    #[async_trait]
    impl LLM for SearchingLLM {
        async fn completion<'a>(
            &self,
            request: CompletionRequest<'a>,
        ) -> Result<CompletionResponse> {
            match request.messages.last() {
                Some(Message::User(_)) => Ok(CompletionResponse {
                    content: String::new(),
                    tool_calls: vec![ToolCall {
                        id: "call1".to_string(),
                        name: "search_web".to_string(),
                        args: "{\"query\":\"climate change agriculture impact\"}".to_string(),
                    }],
                }),
                Some(Message::Tool { result, .. }) => {
                    assert_eq!(result, OBSERVATION);
                    Ok(CompletionResponse {
                        content: final_json(&["search_web", "time_machine"]),
                        tool_calls: vec![],
                    })
                }
                _ => panic!("unexpected message sequence"),
            }
        }
    }

    struct FakeSearchTool;

    #[async_trait]
    impl Tool for FakeSearchTool {
        fn definition(&self) -> Result<ToolDefinition> {
            ToolDefinition::new::<()>("search_web", "search the web")
        }

        async fn invoke(&mut self, call: &ToolCall) -> Result<Message> {
            Ok(Message::Tool {
                id: call.id.clone(),
                name: "search_web".to_string(),
                result: OBSERVATION.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_direct_answer_has_no_tools_used() -> Result<()> {
        let mut assistant = ResearchAssistant::new(
            Arc::new(DirectAnswerLLM),
            vec![Box::new(FakeSearchTool)],
            AssistantOptions::default(),
        )?;

        let run = assistant.research(QUERY).await?;
        let response = run.into_response().unwrap();

        assert!(!response.topic.is_empty());
        assert!(!response.summary.is_empty());
        assert!(response.tools_used.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_search_observation_feeds_next_call() -> Result<()> {
        let mut assistant = ResearchAssistant::new(
            Arc::new(SearchingLLM),
            vec![Box::new(FakeSearchTool)],
            AssistantOptions::default(),
        )?;

        let run = assistant.research(QUERY).await?;
        assert_eq!(run.tools_invoked, vec!["search_web".to_string()]);

        let response = run.into_response().unwrap();
        assert_eq!(response.tools_used, vec!["search_web".to_string()]);

        Ok(())
    }

    struct ApologeticLLM;

    #[async_trait]
    impl LLM for ApologeticLLM {
        async fn completion<'a>(&self, _: CompletionRequest<'a>) -> Result<CompletionResponse> {
            Ok(CompletionResponse {
                content: "I'm sorry, I could not complete the research.".to_string(),
                tool_calls: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_unstructured_answer_is_reported_not_fatal() -> Result<()> {
        let mut assistant = ResearchAssistant::new(
            Arc::new(ApologeticLLM),
            vec![Box::new(FakeSearchTool)],
            AssistantOptions::default(),
        )?;

        let run = assistant.research(QUERY).await?;
        let raw = run.raw_output.clone();

        let err = run.into_response().unwrap_err();
        assert_eq!(err.raw, raw);

        Ok(())
    }
}
