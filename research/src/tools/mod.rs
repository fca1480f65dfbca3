mod save;
mod search;
mod wiki;

pub use save::SaveTool;
pub use search::SearchTool;
pub use wiki::WikiTool;

pub(crate) const USER_AGENT: &str = "research-agent/0.1";

pub(crate) fn http_error(err: reqwest::Error) -> agent::Error {
    agent::Error::Tool(err.to_string())
}
