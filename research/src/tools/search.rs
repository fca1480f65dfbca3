use agent::Result;
use agent::llm::Message;
use agent::tools::{Tool, ToolCall, ToolDefinition};
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use super::http_error;

const NAME: &str = "search_web";
const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const MAX_RESULTS: usize = 5;

pub struct SearchTool {
    client: reqwest::Client,
}

impl SearchTool {
    pub fn new() -> Box<Self> {
        Box::new(Self {
            client: reqwest::Client::new(),
        })
    }
}

#[derive(Deserialize, JsonSchema)]
struct SearchArgs {
    query: String,
}

#[async_trait]
impl Tool for SearchTool {
    fn definition(&self) -> Result<ToolDefinition> {
        ToolDefinition::new::<SearchArgs>(
            NAME,
            "search the web for information on a topic, the input should be a search query",
        )
    }

    async fn invoke(&mut self, call: &ToolCall) -> Result<Message> {
        let args: SearchArgs = call.args()?;

        let url = format!("{}?q={}", SEARCH_ENDPOINT, urlencoding::encode(&args.query));
        let html = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, super::USER_AGENT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)?;

        let results = extract_results(&html, MAX_RESULTS);
        let result = if results.is_empty() {
            format!("no results found for: {}", args.query)
        } else {
            results.join("\n\n")
        };

        Ok(Message::Tool {
            id: call.id.clone(),
            name: NAME.to_string(),
            result,
        })
    }
}

fn extract_results(html: &str, limit: usize) -> Vec<String> {
    let mut results = Vec::new();

    for chunk in html.split("class=\"result__body\"").skip(1) {
        if results.len() == limit {
            break;
        }

        let Some(title) = anchor_text(chunk, "class=\"result__a\"") else {
            continue;
        };
        let url = anchor_text(chunk, "class=\"result__url\"").unwrap_or_default();
        let snippet = anchor_text(chunk, "class=\"result__snippet\"").unwrap_or_default();

        if title.is_empty() {
            continue;
        }

        results.push(format!("{}: https://{}\n{}", title, url, snippet));
    }

    results
}

fn anchor_text(chunk: &str, marker: &str) -> Option<String> {
    let rest = chunk.split(marker).nth(1)?;
    let rest = &rest[rest.find('>')? + 1..];
    let inner = rest.split("</a>").next()?;
    Some(decode_entities(&strip_tags(inner)).trim().to_string())
}

fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
}
