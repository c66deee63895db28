mod cli;
mod notice;
mod render;

use std::{
    io::{self, Write},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    config::parse_api_url, load_config, news::NewsPager, review::META_DESCRIPTION_LIMIT,
    AlwaysConfirm, ApiClient, ClientConfig, ConfirmGate, Dashboard, SaveOutcome, Session,
    SessionStore,
};
use shared::{domain::PostId, protocol::SettingsUpdate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Command, EditArgs, SettingsCommand},
    notice::Notice,
};

struct StdinConfirm;

impl ConfirmGate for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let notice = Notice::from_error(&err);
            eprintln!("{notice}");
            ExitCode::from(notice.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config().context("failed to load configuration")?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = parse_api_url(api_url)?;
    }
    let sessions = SessionStore::new(config.session_path.clone());

    match cli.command {
        Command::Login { credential } => login(&config, &sessions, &credential).await,
        Command::Logout => {
            if sessions.clear().context("failed to remove session")? {
                println!("Signed out.");
            } else {
                println!("No active session.");
            }
            Ok(())
        }
        command => {
            let session = sessions.load().context("failed to read session")?;
            if session.is_none() {
                warn!("not signed in; requests are sent without a token");
            }
            let client = ApiClient::new(&config, session.map(|s| s.access_token))?;
            let dashboard = Dashboard::new(Arc::new(client));
            dispatch(&dashboard, command).await
        }
    }
}

async fn login(config: &ClientConfig, sessions: &SessionStore, credential: &str) -> Result<()> {
    let client = ApiClient::new(config, None)?;
    let auth = client
        .login_with_google(credential)
        .await
        .context("sign-in failed")?;
    let Some(session) = Session::from_auth(auth) else {
        bail!("sign-in returned an empty access token");
    };
    sessions.save(&session).context("failed to persist session")?;
    println!("Signed in as {} <{}>", session.user.name, session.user.email);
    Ok(())
}

async fn dispatch(dashboard: &Dashboard, command: Command) -> Result<()> {
    match command {
        Command::Login { .. } | Command::Logout => unreachable!("handled before dispatch"),
        Command::Posts { tab } => {
            dashboard.load_posts().await?;
            dashboard.set_tab(tab.into()).await;
            render::posts(dashboard.tab().await, &dashboard.visible_posts().await);
        }
        Command::Generate { topic } => {
            println!("Generating a draft on \"{}\", this can take a few minutes...", topic.trim());
            let post = dashboard.generate(&topic).await?;
            render::post_detail(&post);
        }
        Command::Edit(args) => edit(dashboard, args).await?,
        Command::Approve { id, platform } => {
            dashboard.load_posts().await?;
            let published = dashboard
                .approve(&PostId::new(id), platform.into())
                .await?;
            println!("Published: {}", published.url);
        }
        Command::Reject { id, yes } => {
            dashboard.load_posts().await?;
            let gate: &dyn ConfirmGate = if yes { &AlwaysConfirm } else { &StdinConfirm };
            dashboard.reject(&PostId::new(id), gate).await?;
            println!("Draft deleted.");
        }
        Command::News { topic, limit, page } => {
            let pager = NewsPager::new(dashboard.news(&topic, limit).await?);
            render::news(pager.page(page), page, &pager);
        }
        Command::Analytics => {
            let (analytics, settings) =
                futures::try_join!(dashboard.analytics(), dashboard.settings())?;
            render::analytics(&analytics, &settings);
        }
        Command::Settings(SettingsCommand::Show) => {
            render::settings(&dashboard.settings().await?);
        }
        Command::Settings(SettingsCommand::Devto { api_key }) => {
            dashboard
                .update_settings(&SettingsUpdate {
                    devto_api_key: Some(api_key),
                    ..SettingsUpdate::default()
                })
                .await?;
            println!("Dev.to key saved.");
        }
        Command::Settings(SettingsCommand::Hashnode { token, pub_id }) => {
            dashboard
                .update_settings(&SettingsUpdate {
                    hashnode_token: Some(token),
                    hashnode_pub_id: Some(pub_id),
                    ..SettingsUpdate::default()
                })
                .await?;
            println!("Hashnode credentials saved.");
        }
    }
    Ok(())
}

async fn edit(dashboard: &Dashboard, args: EditArgs) -> Result<()> {
    let EditArgs {
        id,
        title,
        content,
        excerpt,
        meta_description,
        keywords,
        audience,
        image_prompt,
        critique,
    } = args;

    dashboard.load_posts().await?;
    let id = PostId::new(id);
    dashboard.begin_edit(&id).await?;

    let mut meta_len = 0;
    dashboard
        .edit(|review| {
            if let Some(title) = title {
                review.set_title(title)?;
            }
            if let Some(content) = content {
                review.set_content(content)?;
            }
            if let Some(excerpt) = excerpt {
                review.set_excerpt(excerpt)?;
            }
            if let Some(description) = meta_description {
                review.set_meta_description(description)?;
            }
            if let Some(keywords) = keywords {
                review.set_keywords_csv(&keywords)?;
            }
            if let Some(audience) = audience {
                review.set_target_audience(audience)?;
            }
            if let Some(prompt) = image_prompt {
                review.set_image_prompt(prompt)?;
            }
            if let Some(notes) = critique {
                review.set_critique_notes(notes)?;
            }
            meta_len = review.meta_description_len();
            Ok(())
        })
        .await?;
    if meta_len > META_DESCRIPTION_LIMIT {
        warn!(post_id = %id, meta_len, "meta description exceeds {META_DESCRIPTION_LIMIT} characters");
    }

    match dashboard.save_edit().await? {
        SaveOutcome::Applied(post) => {
            info!(post_id = %post.id, "edit saved");
            render::post_detail(&post);
        }
        SaveOutcome::Stale { id, .. } => {
            println!("Post {id} was re-opened before this save finished; reload to see it.");
        }
    }
    Ok(())
}
