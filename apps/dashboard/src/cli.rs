use clap::{Args, Parser, Subcommand, ValueEnum};
use client_core::news::{DEFAULT_NEWS_TOPIC, NEWS_BATCH_LIMIT};
use shared::domain::{Platform, Tab};

#[derive(Parser, Debug)]
#[command(name = "trendflow", about = "Review, edit and publish AI-generated drafts")]
pub struct Cli {
    /// Overrides the configured service URL for this invocation.
    #[arg(long, global = true)]
    pub api_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Exchange a Google ID token for a service session.
    Login {
        #[arg(long)]
        credential: String,
    },
    Logout,
    /// List posts for a tab.
    Posts {
        #[arg(long, value_enum, default_value_t = PostsTab::Dashboard)]
        tab: PostsTab,
    },
    /// Ask the generator for a new draft.
    Generate { topic: String },
    Edit(EditArgs),
    /// Publish a draft.
    Approve {
        id: String,
        #[arg(long, value_enum)]
        platform: PlatformArg,
    },
    /// Delete a draft.
    Reject {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    News {
        #[arg(long, default_value = DEFAULT_NEWS_TOPIC)]
        topic: String,
        #[arg(long, default_value_t = NEWS_BATCH_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    Analytics,
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    #[arg(long)]
    pub excerpt: Option<String>,
    #[arg(long)]
    pub meta_description: Option<String>,
    /// Comma separated, e.g. `AI, Tech, Future`.
    #[arg(long)]
    pub keywords: Option<String>,
    #[arg(long)]
    pub audience: Option<String>,
    #[arg(long)]
    pub image_prompt: Option<String>,
    #[arg(long)]
    pub critique: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    Devto {
        #[arg(long)]
        api_key: String,
    },
    Hashnode {
        #[arg(long)]
        token: String,
        #[arg(long)]
        pub_id: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostsTab {
    Dashboard,
    Published,
}

impl From<PostsTab> for Tab {
    fn from(tab: PostsTab) -> Self {
        match tab {
            PostsTab::Dashboard => Tab::Dashboard,
            PostsTab::Published => Tab::Published,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    Devto,
    Hashnode,
}

impl From<PlatformArg> for Platform {
    fn from(platform: PlatformArg) -> Self {
        match platform {
            PlatformArg::Devto => Platform::Devto,
            PlatformArg::Hashnode => Platform::Hashnode,
        }
    }
}
