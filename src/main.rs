use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ticketsmith::api::{Handler, Request};
use ticketsmith::categorize;
use ticketsmith::client::HttpCompletionClient;
use ticketsmith::config::Config;
use ticketsmith::prompt::{self, PromptKind, ReplyMode};
use ticketsmith::ticket::TicketData;

#[derive(Parser, Debug)]
#[command(
    name = "ticketsmith",
    about = "AI-assisted reply drafting for support tickets",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a fixed "reply exactly: OK" round trip against the configured endpoint
    TestConnection,
    /// Classify a ticket (JSON on stdin) and print its analysis and action buttons
    Analyze,
    /// Ask the model for next-action suggestions for a ticket (JSON on stdin)
    Suggest,
    /// Draft a reply for a ticket (JSON on stdin)
    Generate {
        /// Prompt kind (e.g. steps, short, question, vpn_diag, free)
        #[arg(short, long, default_value = "steps")]
        kind: String,

        /// Reply mode: agent or user (defaults to the configured mode)
        #[arg(short, long)]
        mode: Option<String>,

        /// Free text for the "free" kind, or an explicit instruction for "dyn"
        #[arg(short, long)]
        text: Option<String>,
    },
    /// Print the config file location
    Config,
}

fn read_ticket() -> Result<TicketData> {
    serde_json::from_reader(std::io::stdin().lock())
        .context("expected TicketData JSON on stdin")
}

fn parse_mode(raw: &str) -> Result<ReplyMode> {
    match raw {
        "agent" => Ok(ReplyMode::Agent),
        "user" => Ok(ReplyMode::User),
        other => anyhow::bail!("unknown reply mode '{}' (expected agent or user)", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Command::Config = args.command {
        println!("{}", Config::config_location());
        return Ok(());
    }

    let config = Config::initialize().map_err(|e| anyhow::anyhow!(e))?;
    let handler = Handler::new(HttpCompletionClient::new());

    let response = match args.command {
        Command::TestConnection => handler.handle(&config, Request::TestConnection).await,
        Command::Analyze => {
            let ticket = read_ticket()?;
            let analysis = categorize::analyze(&ticket);
            let buttons: Vec<serde_json::Value> = prompt::static_actions(analysis.category)
                .iter()
                .map(|a| serde_json::json!({ "kind": a.kind.key(), "label": a.label }))
                .collect();
            let out = serde_json::json!({ "analysis": analysis, "actions": buttons });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }
        Command::Suggest => {
            let ticket = read_ticket()?;
            let analysis = categorize::analyze(&ticket);
            let context = prompt::build_suggestion_context(&ticket, &analysis);
            handler
                .handle(&config, Request::SuggestActions { context })
                .await
        }
        Command::Generate { kind, mode, text } => {
            let kind = PromptKind::parse(&kind)
                .with_context(|| format!("unknown prompt kind '{}'", kind))?;
            let mode = match mode {
                Some(raw) => parse_mode(&raw)?,
                None => config.reply_mode,
            };
            let ticket = read_ticket()?;
            let analysis = categorize::analyze(&ticket);
            let pair = prompt::assemble(
                kind,
                mode,
                &ticket,
                &analysis,
                &config.system_prompt,
                text.as_deref(),
            );
            handler
                .handle(&config, Request::GenerateReply { payload: pair.user })
                .await
        }
        Command::Config => unreachable!("handled above"),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.ok {
        std::process::exit(1);
    }
    Ok(())
}
