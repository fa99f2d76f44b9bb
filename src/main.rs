// src/main.rs
// BakaBot - tsundere AI companion service

use anyhow::Result;
use bakabot::companion::{Companion, TurnInput};
use bakabot::config::EnvConfig;
use bakabot::mood::{MoodLevel, SentimentAnalyzer, SessionMoodHistory, SessionSeed};
use bakabot::web;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bakabot")]
#[command(about = "Emotional-state engine and chat service for a tsundere AI companion")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP chat service (default)
    Serve {
        /// Address to bind
        #[arg(long, env = "BAKABOT_HOST")]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, env = "BAKABOT_PORT")]
        port: Option<u16>,
    },

    /// Print the sentiment score of a text and the cues that matched
    Score {
        /// Text to score
        text: String,
    },

    /// Print the system prompt one turn would produce, without calling the generator
    Prompt {
        /// User message
        #[arg(short, long, conflicts_with = "action")]
        message: Option<String>,

        /// Action (pat, kiss, eat, watch)
        #[arg(short, long)]
        action: Option<String>,

        /// Mood level before the turn
        #[arg(long, default_value_t = MoodLevel::DEFAULT.value())]
        mood_level: f64,
    },
}

async fn run_server(config: EnvConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        error!("Invalid configuration:\n{}", validation.report());
        anyhow::bail!("invalid configuration");
    }

    let companion = Companion::from_config(&config);
    info!(
        policy = %companion.policy(),
        model = %config.llm.model,
        llm_enabled = companion.has_llm(),
        "Companion ready"
    );

    let state = web::state::AppState::new(companion);
    let app = web::create_router(state);

    let host = host.unwrap_or(config.server.host);
    let port = port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("BakaBot running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn run_score(text: &str) {
    let breakdown = SentimentAnalyzer::new().explain(text);
    println!("score: {:+.1}", breakdown.score);
    for m in &breakdown.matches {
        println!("  {:<16} {:?} ({:+.1})", m.cue, m.category, m.weight);
    }
}

fn run_prompt(
    config: &EnvConfig,
    message: Option<String>,
    action: Option<String>,
    mood_level: f64,
) -> Result<()> {
    let input = TurnInput::from_parts(message, action)?;
    let level = MoodLevel::new(mood_level);
    let companion = Companion::from_config(config);

    let history = SessionMoodHistory::new(SessionSeed {
        mood: level.displayed_stage(),
        level,
    });
    let plan = companion.plan(&history, &input, level);

    let t = &plan.transition;
    eprintln!(
        "score {:+.2} | delta {:+.2} | level {} -> {} | primary {} | emerging {} | displayed {}",
        t.raw_score,
        t.delta,
        t.previous,
        t.level,
        plan.emotion.primary,
        plan.emotion
            .secondary
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into()),
        plan.emotion.displayed,
    );
    println!("{}", plan.system_prompt);
    println!("\n[user] {}", plan.user_content);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        None => {
            run_server(EnvConfig::load(), None, None).await?;
        }
        Some(Commands::Serve { host, port }) => {
            run_server(EnvConfig::load(), host, port).await?;
        }
        Some(Commands::Score { text }) => {
            run_score(&text);
        }
        Some(Commands::Prompt {
            message,
            action,
            mood_level,
        }) => {
            run_prompt(&EnvConfig::load(), message, action, mood_level)?;
        }
    }

    Ok(())
}
