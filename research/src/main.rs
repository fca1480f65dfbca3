mod prompt;
mod research;
mod response;
mod tools;

use agent::llm::OpenAI;
use agent::{Error, Result};
use clap::Parser;
use research::{AssistantOptions, ResearchAssistant, default_tools};
use response::ResearchResponse;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "research")]
#[command(about = "CLI research assistant", long_about = None)]
struct Args {
    /// Research topic; prompts interactively when omitted
    #[arg(long, short = 'q')]
    query: Option<String>,

    /// Model used for the agent
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Maximum number of reasoning turns before giving up
    #[arg(long, default_value_t = 10)]
    max_turns: usize,

    /// Wall-clock budget for the whole run, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// File the save_tool appends research notes to
    #[arg(long, default_value = "research_output.txt")]
    notes_file: PathBuf,

    /// Write the full agent transcript to this file
    #[arg(long)]
    transcript: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if std::env::var("OPENAI_API_KEY").is_err() {
        return Err(Error::Config(
            "OPENAI_API_KEY is not set, add it to the environment or a .env file".to_string(),
        ));
    }

    let query = match args.query {
        Some(query) => query,
        None => prompt_for_topic()?,
    };

    let transcript: Option<Box<dyn Write + Send>> = match args.transcript {
        Some(path) => Some(Box::new(std::fs::File::create(path)?)),
        None => None,
    };

    let mut assistant = ResearchAssistant::new(
        OpenAI::new(args.model),
        default_tools(&args.notes_file),
        AssistantOptions {
            max_turns: args.max_turns,
            timeout: args.timeout_secs.map(Duration::from_secs),
            transcript,
        },
    )?;

    let run = assistant.research(&query).await?;

    match run.into_response() {
        Ok(response) => print_response(&response),
        Err(err) => {
            println!("Error parsing response: {}", err);
            println!("Raw response: {}", err.raw);
        }
    }

    Ok(())
}

fn prompt_for_topic() -> Result<String> {
    print!("What topic do you need help learning? ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;

    let topic = line.trim().to_string();
    if topic.is_empty() {
        return Err(Error::Config("no research topic provided".to_string()));
    }

    Ok(topic)
}

fn print_response(response: &ResearchResponse) {
    println!("\nTopic: {}", response.topic);
    println!("\n{}", response.summary);

    if !response.sources.is_empty() {
        println!("\nSources:");
        for source in &response.sources {
            println!("  - {}", source);
        }
    }

    if response.tools_used.is_empty() {
        println!("\nTools used: none");
    } else {
        println!("\nTools used: {}", response.tools_used.join(", "));
    }
}
