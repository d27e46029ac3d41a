use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Question to ask about the document (omit for an interactive session)
    pub query: Option<String>,

    /// Document to load before the first question
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// AI provider to use [possible values: openai, openrouter, deepseek, anthropic]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Generate a quiz question from the document and exit
    #[arg(long)]
    pub quiz: bool,
}
