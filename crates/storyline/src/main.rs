//! Command-line front-end for the Storyline script client.
//!
//! Every command prints JSON on stdout; logs go to stderr via `RUST_LOG`.

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use serde::Serialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use storyline::Storyline;
use storyline::config::StorylineConfig;
use storyline::protocol::{ScriptCreate, ScriptId, ScriptStatus, ScriptUpdate};

/// Command-line options for the Storyline client.
#[derive(Debug, Parser)]
#[command(name = "storyline", version, about)]
struct Cli {
    /// Optional path to a storyline.json5 config file (skips layered discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the issued tokens
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account, then log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        /// Password; read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Revoke the session remotely and forget local tokens
    Logout,
    /// Rotate tokens using the stored refresh token
    Refresh,
    /// Show configuration and session state
    Status,
    /// List scripts
    List,
    /// Show one script
    Show { id: ScriptId },
    /// Create a script
    Create(CreateArgs),
    /// Update fields of a script
    Update {
        id: ScriptId,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Delete a script and its content
    Delete { id: ScriptId },
    /// Save script content from a file or stdin
    SaveContent {
        id: ScriptId,
        /// Read content from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Suggest variants of a generation prompt
    OptimizePrompt { prompt: String },
    /// Suggest improvements for script content from a file or stdin
    OptimizeContent {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long)]
        script_id: Option<ScriptId>,
    },
}

#[derive(Debug, Args)]
struct CreateArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    target_audience: Option<String>,
    /// Target length in minutes
    #[arg(long)]
    duration: Option<u32>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    content: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    target_audience: Option<String>,
    #[arg(long)]
    duration: Option<u32>,
    #[arg(long)]
    status: Option<String>,
}

impl From<CreateArgs> for ScriptCreate {
    fn from(args: CreateArgs) -> Self {
        ScriptCreate {
            title: args.title,
            description: args.description,
            content: args.content,
            genre: args.genre,
            target_audience: args.target_audience,
            duration: args.duration,
            status: None,
        }
    }
}

impl From<UpdateArgs> for ScriptUpdate {
    fn from(args: UpdateArgs) -> Self {
        ScriptUpdate {
            title: args.title,
            description: args.description,
            content: args.content,
            genre: args.genre,
            target_audience: args.target_audience,
            duration: args.duration,
            status: args.status.map(ScriptStatus::from),
        }
    }
}

/// Entry point for the Storyline CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!("starting storyline (config_set={})", cli.config.is_some());
    let config = load_config(cli.config.as_deref())?;
    let client = Storyline::from_config(config).context("failed to initialize client")?;
    run(&client, cli.command).await
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StorylineConfig> {
    match path {
        Some(path) => StorylineConfig::load_from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("failed to resolve current directory")?;
            let layered =
                StorylineConfig::load_layered(&cwd).context("failed to load layered config")?;
            debug!("layered config loaded (layers={})", layered.layers.len());
            Ok(layered.config)
        }
    }
}

async fn run(client: &Storyline, command: Command) -> anyhow::Result<()> {
    let scripts = client.scripts();
    let auth = client.auth();
    match command {
        Command::Login { email, password } => {
            let password = password_or_stdin(password)?;
            let pair = auth.login(&email, &password).await.context("login failed")?;
            print_json(&serde_json::json!({
                "logged_in": true,
                "token_type": pair.token_type,
                "expires_in": pair.expires_in,
            }))
        }
        Command::Register {
            email,
            username,
            password,
        } => {
            let password = password_or_stdin(password)?;
            let user = auth
                .register(&email, &username, &password)
                .await
                .context("registration failed")?;
            print_json(&user)
        }
        Command::Logout => {
            auth.logout().await.context("logout failed")?;
            print_json(&serde_json::json!({ "logged_out": true }))
        }
        Command::Refresh => {
            let pair = auth.refresh().await.context("refresh failed")?;
            print_json(&serde_json::json!({
                "refreshed": true,
                "expires_in": pair.expires_in,
            }))
        }
        Command::Status => print_json(&client.status()),
        Command::List => print_json(&scripts.list_scripts().await?),
        Command::Show { id } => print_json(&scripts.get_script(id).await?),
        Command::Create(args) => print_json(&scripts.create_script(&args.into()).await?),
        Command::Update { id, fields } => {
            let patch = ScriptUpdate::from(fields);
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            print_json(&scripts.update_script(id, &patch).await?)
        }
        Command::Delete { id } => {
            scripts.delete_script(id).await?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Command::SaveContent { id, file } => {
            let content = read_input(file.as_deref())?;
            scripts.update_script_content(id, &content).await?;
            print_json(&serde_json::json!({ "saved": id, "length": content.chars().count() }))
        }
        Command::OptimizePrompt { prompt } => print_json(&scripts.optimize_prompt(&prompt).await?),
        Command::OptimizeContent { file, script_id } => {
            let content = read_input(file.as_deref())?;
            print_json(&scripts.optimize_content(&content, script_id).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn password_or_stdin(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("password is required");
    }
    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_update_with_global_config() {
        let cli = Cli::try_parse_from([
            "storyline",
            "update",
            "42",
            "--title",
            "Renamed",
            "--status",
            "completed",
            "--config",
            "dev.json5",
        ])
        .expect("parse");
        assert_eq!(cli.config, Some(PathBuf::from("dev.json5")));
        let Command::Update { id, fields } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, 42);
        let patch = ScriptUpdate::from(fields);
        assert_eq!(patch.title.as_deref(), Some("Renamed"));
        assert_eq!(patch.status, Some(ScriptStatus::Completed));
        assert_eq!(patch.genre, None);
    }

    #[test]
    fn create_requires_title() {
        assert!(Cli::try_parse_from(["storyline", "create"]).is_err());
        let cli = Cli::try_parse_from(["storyline", "create", "--title", "T", "--duration", "8"])
            .expect("parse");
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let data = ScriptCreate::from(args);
        assert_eq!(data, ScriptCreate::new("T").duration(8));
    }

    #[test]
    fn optimize_content_flags_are_optional() {
        let cli = Cli::try_parse_from(["storyline", "optimize-content", "--script-id", "7"])
            .expect("parse");
        assert!(matches!(
            cli.command,
            Command::OptimizeContent {
                file: None,
                script_id: Some(7)
            }
        ));
    }
}
