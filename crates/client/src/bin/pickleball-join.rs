//! `pickleball-join`: look up a live session by code and join it from the
//! terminal. Organisers can also create and close sessions.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pickleball_client::api::{HttpClient, API_URL_ENV, DEFAULT_API_URL};
use pickleball_client::flow::{JoinFlow, JoinState};
use pickleball_client::models::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "pickleball-join", about = "Join a Pickleball Planner session by code")]
struct Cli {
    /// API base URL.
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show a session and its roster. Accepts a code or a `/join/{code}` path.
    Show { code: String },
    /// Add a name to a session's roster.
    Join {
        code: String,
        #[arg(long)]
        name: String,
    },
    /// Create a session for a group (organisers).
    Create {
        #[arg(long)]
        group_id: i64,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        login: Login,
    },
    /// Close a session (organisers).
    Close {
        code: String,
        #[command(flatten)]
        login: Login,
    },
}

#[derive(Debug, clap::Args)]
struct Login {
    #[arg(long, env = "PICKLEBALL_EMAIL")]
    email: String,
    #[arg(long, env = "PICKLEBALL_PASSWORD", hide_env_values = true)]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = HttpClient::new(cli.api_url);

    match cli.command {
        Command::Show { code } => {
            let flow = lookup(client, &code).await?;
            print_flow(&flow);
        }
        Command::Join { code, name } => {
            let mut flow = lookup(client, &code).await?;
            if !flow.can_join() {
                print_flow(&flow);
                bail!("{}", flow.message().unwrap_or("This session cannot be joined."));
            }
            flow.join(&name).await;
            if let JoinState::Joined { participant, .. } = flow.state() {
                println!("Joined as {} (#{})", participant.display_name, participant.id);
                print_flow(&flow);
            } else {
                bail!("{}", flow.message().unwrap_or("Could not join."));
            }
        }
        Command::Create {
            group_id,
            name,
            login,
        } => {
            client
                .login(&login.email, &login.password)
                .await
                .context("login failed")?;
            let session = client
                .create_session(group_id, name.as_deref())
                .await
                .context("could not create session")?;
            print_session(&session);
        }
        Command::Close { code, login } => {
            client
                .login(&login.email, &login.password)
                .await
                .context("login failed")?;
            let session = client
                .close_session(&code)
                .await
                .context("could not close session")?;
            print_session(&session);
        }
    }
    Ok(())
}

/// Look up a code (or join path), failing with the flow's message.
async fn lookup(client: HttpClient, input: &str) -> anyhow::Result<JoinFlow<HttpClient>> {
    let flow = if input.contains('/') {
        JoinFlow::from_url_path(client, input).await
    } else {
        let mut flow = JoinFlow::new(client);
        flow.lookup(input).await;
        flow
    };
    match flow.state() {
        JoinState::Idle => bail!("No session code given."),
        JoinState::LookupFailed(_) => bail!("{}", flow.message().unwrap_or("Lookup failed.")),
        _ => Ok(flow),
    }
}

fn print_session(session: &Session) {
    println!(
        "{} [{}] {}{}",
        session.code,
        session.status,
        session.name,
        session
            .group_name
            .as_deref()
            .map(|g| format!(" ({g})"))
            .unwrap_or_default(),
    );
}

fn print_flow(flow: &JoinFlow<HttpClient>) {
    if let Some(session) = flow.session() {
        print_session(session);
    }
    if let Some(message) = flow.message() {
        println!("{message}");
    }
    for (i, p) in flow.roster().iter().enumerate() {
        println!("{:>3}. {}", i + 1, p.display_name);
    }
}
