// Copyright 2026 Fusebox Session Contributors
// SPDX-License-Identifier: MIT

//! Fusebox CLI — entry point.

use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use fusebox_cli::{build_form, parse_field, PageOutput};
use fusebox_session::credentials::{PASSWORD_ENV, USERNAME_ENV};
use fusebox_session::{Client, ClientConfig, Credentials, Endpoint};

#[derive(Parser)]
#[command(
    name = "fusebox",
    about = "Fusebox — probe a fuseaction-routed legacy web application through an authenticated session",
    version,
    after_help = "The password is read from FUSEBOX_PASSWORD. Other settings fall back to FUSEBOX_* variables."
)]
struct Cli {
    /// Dispatch URL every fuseaction is routed through.
    #[arg(long, global = true)]
    navigation_url: Option<String>,

    /// Login form POST target.
    #[arg(long, global = true)]
    auth_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Username (defaults to FUSEBOX_USERNAME).
    #[arg(long, short, global = true)]
    username: Option<String>,

    /// Print the page's named inputs as JSON instead of raw HTML.
    #[arg(long, global = true)]
    inputs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the credentials are accepted.
    Login,

    /// GET a fuseaction page.
    Get {
        /// Fuseaction key (e.g. "student.main").
        fuseaction: String,
    },

    /// POST a form to a fuseaction page.
    Post {
        /// Fuseaction key.
        fuseaction: String,

        /// Payload field as key=value (repeatable).
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Scrape a token from a page, then POST to an AJAX endpoint with it.
    Ajax {
        /// Fuseaction of the page carrying the token.
        #[arg(long)]
        page: String,

        /// Name of the input holding the token.
        #[arg(long)]
        token_name: String,

        /// AJAX endpoint URL, absolute or relative to the navigation URL.
        #[arg(long)]
        url: String,

        /// Remote method name, sent as ?method=<name>.
        #[arg(long)]
        method: String,

        /// Payload field as key=value (repeatable).
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.navigation_url {
        config = config.with_navigation_url(url)?;
    }
    if let Some(url) = &cli.auth_url {
        config = config.with_auth_url(url)?;
    }
    if let Some(ms) = cli.timeout_ms {
        anyhow::ensure!(ms > 0, "--timeout-ms must be positive");
        config = config.with_timeout(Duration::from_millis(ms));
    }
    Ok(config)
}

fn resolve_credentials(cli: &Cli) -> anyhow::Result<Credentials> {
    let username = match &cli.username {
        Some(username) => username.clone(),
        None => std::env::var(USERNAME_ENV)
            .with_context(|| format!("pass --username or set {USERNAME_ENV}"))?,
    };
    let password =
        std::env::var(PASSWORD_ENV).with_context(|| format!("set {PASSWORD_ENV}"))?;
    Ok(Credentials::new(username, password))
}

async fn run(
    client: &mut Client,
    command: Commands,
    output: PageOutput,
) -> fusebox_session::Result<String> {
    match command {
        Commands::Login => {
            client.login().await?;
            Ok("Credentials accepted".to_string())
        }
        Commands::Get { fuseaction } => client.get(&Endpoint::new(fuseaction), &output).await,
        Commands::Post { fuseaction, fields } => {
            let form = build_form(fields);
            client.post(&Endpoint::new(fuseaction), &form, &output).await
        }
        Commands::Ajax {
            page,
            token_name,
            url,
            method,
            fields,
        } => {
            let form = build_form(fields);
            client
                .ajax_post(&Endpoint::new(page), &token_name, &url, &method, &form, &output)
                .await
        }
        Commands::Completions { .. } => Ok(String::new()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "fusebox", &mut std::io::stdout());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    let credentials = resolve_credentials(&cli)?;
    tracing::debug!("Navigation URL: {}", config.navigation_url);
    tracing::debug!("Auth URL: {}", config.auth_url);
    tracing::debug!("Timeout: {:?}", config.timeout);
    tracing::debug!("User: {}", credentials.username());
    let output = if cli.inputs {
        PageOutput::Inputs
    } else {
        PageOutput::Html
    };

    let mut client = Client::new(config, credentials)?;
    let result = run(&mut client, cli.command, output).await;
    client.close().await;

    match result {
        Ok(text) => println!("{text}"),
        Err(e) if e.is_invalid_credentials() => {
            eprintln!("Invalid credentials. Please try again.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
