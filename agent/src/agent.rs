use crate::callbacks;
use crate::llm;
use crate::tools;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAX_TURNS: usize = 10;

pub trait StopCondition {
    fn done(&self, history: &[llm::Message]) -> bool;
}

pub struct FinalAnswer;

impl StopCondition for FinalAnswer {
    fn done(&self, history: &[llm::Message]) -> bool {
        matches!(history.last(), Some(llm::Message::Assistant(_, tool_calls)) if tool_calls.is_empty())
    }
}

type Tool = Box<dyn tools::Tool + Send>;
type Callback = Box<dyn callbacks::Callback + Send>;

pub struct AgentRun {
    pub history: Vec<llm::Message>,
    pub tools_invoked: Vec<String>,
}

impl AgentRun {
    pub fn final_text(&self) -> Option<&str> {
        self.history.iter().rev().find_map(|msg| match msg {
            llm::Message::Assistant(content, _) => Some(content.as_str()),
            _ => None,
        })
    }
}

pub struct Agent {
    llm: Arc<dyn llm::LLM + Send + Sync>,
    tools: HashMap<String, Tool>,
    callbacks: Vec<Callback>,
    tool_defs: Vec<tools::ToolDefinition>,
    stop_condition: Box<dyn StopCondition + Send>,
    max_turns: usize,
    timeout: Option<Duration>,
}

impl Agent {
    async fn execute_tool_call(
        &mut self,
        tool_call: &tools::ToolCall,
        invoked: &mut Vec<String>,
    ) -> llm::Message {
        let Some(tool) = self.tools.get_mut(&tool_call.name) else {
            return llm::Message::Tool {
                id: tool_call.id.clone(),
                name: tool_call.name.clone(),
                result: format!(
                    "tool {} does not exist, the available tools are: {}",
                    tool_call.name,
                    self.tool_defs
                        .iter()
                        .map(|def| def.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            };
        };

        if !invoked.contains(&tool_call.name) {
            invoked.push(tool_call.name.clone());
        }

        match tool.invoke(tool_call).await {
            Ok(message) => message,
            Err(err) => llm::Message::Tool {
                id: tool_call.id.clone(),
                name: tool_call.name.clone(),
                result: format!("tool {} failed: {}", tool_call.name, err),
            },
        }
    }

    async fn run_inner(&mut self, mut messages: Vec<llm::Message>) -> Result<AgentRun> {
        let mut invoked = Vec::new();
        let mut turns = 0;

        while !self.stop_condition.done(&messages) {
            if turns == self.max_turns {
                return Err(Error::TurnBudgetExceeded(self.max_turns));
            }
            turns += 1;

            let next = self
                .llm
                .completion(llm::CompletionRequest {
                    messages: &messages,
                    tools: &self.tool_defs,
                })
                .await?;

            messages.push(llm::Message::Assistant(
                next.content,
                next.tool_calls.clone(),
            ));

            for tool_call in &next.tool_calls {
                let observation = self.execute_tool_call(tool_call, &mut invoked).await;
                messages.push(observation);
            }

            for callback in &mut self.callbacks {
                messages = callback.call(messages).await?;
            }
        }

        Ok(AgentRun {
            history: messages,
            tools_invoked: invoked,
        })
    }

    pub async fn run(&mut self, messages: Vec<llm::Message>) -> Result<AgentRun> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run_inner(messages))
                .await
                .map_err(|_| Error::RunTimeout(limit))?,
            None => self.run_inner(messages).await,
        }
    }
}

pub struct AgentBuilder {
    llm: Option<Arc<dyn llm::LLM + Send + Sync>>,
    tools: Vec<Tool>,
    callbacks: Vec<Callback>,
    stop_condition: Option<Box<dyn StopCondition + Send>>,
    max_turns: usize,
    timeout: Option<Duration>,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            tools: Vec::new(),
            callbacks: Vec::new(),
            stop_condition: None,
            max_turns: DEFAULT_MAX_TURNS,
            timeout: None,
        }
    }

    pub fn llm(mut self, llm: Arc<dyn llm::LLM + Send + Sync>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn callback(mut self, callback: Callback) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn stop_condition(mut self, cond: Box<dyn StopCondition + Send>) -> Self {
        self.stop_condition = Some(cond);
        self
    }

    pub fn max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let mut tool_defs = Vec::new();
        let mut tools = HashMap::new();

        for tool in self.tools {
            let def = tool.definition()?;
            tools.insert(def.name.clone(), tool);
            tool_defs.push(def);
        }

        Ok(Agent {
            llm: self
                .llm
                .ok_or(Error::MissingArg("llm is required for agent".to_string()))?,
            tools,
            tool_defs,
            callbacks: self.callbacks,
            stop_condition: self.stop_condition.unwrap_or(Box::new(FinalAnswer)),
            max_turns: self.max_turns,
            timeout: self.timeout,
        })
    }
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
