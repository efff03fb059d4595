use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "mailsort-server")]
#[command(
    author,
    version,
    about = "Email triage service: classifies emails as productive or unproductive and suggests a reply"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "mailsort.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Zero-shot classification endpoint
    #[arg(long, env = "HF_API_URL")]
    pub api_url: Option<String>,

    /// Zero-shot API token; the remote classifier is disabled without it
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
