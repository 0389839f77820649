use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trama",
    about = "Trama — multilingual page content, woven back together",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the pages in a rows file
    Pages(PagesArgs),
    /// Rebuild a page's nested content tree
    Rebuild(RebuildArgs),
    /// Check a page's multilingual integrity
    Check(CheckArgs),
    /// Apply an edit batch from a JSON file
    Apply(ApplyArgs),
    /// Start the content server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct PagesArgs {
    /// Rows file (JSON array of {pageId, jsonKey, content})
    #[arg(long, default_value = "rows.json")]
    pub rows: String,
}

#[derive(Args)]
pub struct RebuildArgs {
    pub page_id: String,
    #[arg(long, default_value = "rows.json")]
    pub rows: String,
    /// Language code, or "all" for every language
    #[arg(short, long)]
    pub language: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    pub page_id: String,
    #[arg(long, default_value = "rows.json")]
    pub rows: String,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub page_id: String,
    /// Edits file: {"edits": {"<jsonKey>": {"newText": {"pt-BR": "..."}}}}
    pub edits: String,
    #[arg(long, default_value = "rows.json")]
    pub rows: String,
    /// Write the merged rows back to the rows file
    #[arg(long)]
    pub write: bool,
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8091")]
    pub bind: String,
    /// Rows file to preload; starts empty when omitted
    #[arg(long)]
    pub rows: Option<String>,
}
