use agent::Result;
use agent::llm::Message;
use agent::tools::{Tool, ToolCall, ToolDefinition};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::HashMap;

use super::http_error;

const NAME: &str = "wiki_tool";
const WIKI_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

pub struct WikiTool {
    client: reqwest::Client,
    endpoint: String,
}

impl WikiTool {
    pub fn new() -> Box<Self> {
        Self::with_endpoint(WIKI_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Box<Self> {
        Box::new(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        })
    }
}

#[derive(Deserialize, JsonSchema)]
struct WikiArgs {
    query: String,
}

#[derive(Deserialize)]
struct WikiResponse {
    query: Option<WikiQuery>,
}

#[derive(Deserialize)]
struct WikiQuery {
    pages: HashMap<String, WikiPage>,
}

#[derive(Deserialize)]
struct WikiPage {
    title: String,
    extract: Option<String>,
}

#[async_trait]
impl Tool for WikiTool {
    fn definition(&self) -> Result<ToolDefinition> {
        ToolDefinition::new::<WikiArgs>(
            NAME,
            "look up a short encyclopedia summary for a topic, the input should be the topic name",
        )
    }

    async fn invoke(&mut self, call: &ToolCall) -> Result<Message> {
        let args: WikiArgs = call.args()?;

        let url = format!(
            "{}?action=query&format=json&generator=search&gsrsearch={}&gsrlimit=1\
             &prop=extracts&exintro=1&explaintext=1",
            self.endpoint,
            urlencoding::encode(&args.query)
        );

        let response: WikiResponse = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, super::USER_AGENT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(http_error)?
            .json()
            .await
            .map_err(http_error)?;

        Ok(Message::Tool {
            id: call.id.clone(),
            name: NAME.to_string(),
            result: summarize(response, &args.query),
        })
    }
}

fn summarize(response: WikiResponse, query: &str) -> String {
    let page = response
        .query
        .and_then(|query| query.pages.into_values().next());

    match page {
        Some(page) => match page.extract {
            Some(extract) if !extract.trim().is_empty() => {
                format!("{}\n{}", page.title, extract)
            }
            _ => format!("no encyclopedia entry found for: {}", query),
        },
        None => format!("no encyclopedia entry found for: {}", query),
    }
}

#[cfg(test)]
mod tests {
    use super::{WikiResponse, summarize};

    #[test]
    fn test_summarize_page() {
        let payload = r#"{
            "query": {
                "pages": {
                    "1234": {
                        "pageid": 1234,
                        "title": "Agriculture",
                        "extract": "Agriculture is the practice of cultivating plants."
                    }
                }
            }
        }"#;

        let response: WikiResponse = serde_json::from_str(payload).unwrap();

        assert_eq!(
            summarize(response, "agriculture"),
            "Agriculture\nAgriculture is the practice of cultivating plants."
        );
    }

    #[test]
    fn test_summarize_no_match() {
        let response: WikiResponse = serde_json::from_str("{}").unwrap();

        assert_eq!(
            summarize(response, "xyzzy"),
            "no encyclopedia entry found for: xyzzy"
        );
    }
}
