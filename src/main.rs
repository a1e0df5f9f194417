//! Stride CLI
//!
//! Terminal host for the Stride client:
//! - Browse the record dashboard, feed and bookmarks
//! - Post, comment, like and bookmark
//! - Manage plans, log workouts, edit the account

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use stride::config::{generate_default_config, LoggingConfig};
use stride::models::{AvatarFile, PlanForm, Range, WorkoutEntry, WorkoutKind};
use stride::{App, Config, Tab, TerminalSurface};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stride")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Social fitness tracker client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WorkoutArg {
    Cardio,
    Strength,
}

impl From<WorkoutArg> for WorkoutKind {
    fn from(arg: WorkoutArg) -> Self {
        match arg {
            WorkoutArg::Cardio => WorkoutKind::Cardio,
            WorkoutArg::Strength => WorkoutKind::Strength,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the record dashboard
    Dashboard {
        /// week or month
        #[arg(short, long, default_value = "week")]
        range: Range,
        /// User to show (default: first user)
        #[arg(short, long)]
        user: Option<u64>,
        /// Show every leaderboard row
        #[arg(long)]
        all: bool,
    },

    /// Show the social feed
    Feed,

    /// Show your bookmarked posts
    Bookmarks,

    /// Publish a post
    Post {
        content: String,
    },

    /// Comment on a post
    Comment {
        post_id: u64,
        text: String,
    },

    /// Toggle your like on a post
    Like {
        post_id: u64,
    },

    /// Toggle your bookmark on a post
    Bookmark {
        post_id: u64,
    },

    /// Show the account page
    Account {
        /// Show the full profile
        #[arg(short, long)]
        detail: bool,
    },

    /// Update nickname, address or avatar
    Edit {
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// JPG or PNG image, at most 5MB
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// List your plans
    Plans,

    /// Create a plan
    PlanAdd {
        activity: String,
        /// Start time (YYYY-MM-DDTHH:MM)
        start: String,
        /// End time (YYYY-MM-DDTHH:MM)
        end: String,
    },

    /// Log a workout for today
    Workout {
        #[arg(value_enum)]
        kind: WorkoutArg,
        activity: String,
        /// Duration in minutes
        duration: f64,
        calories: f64,
        /// Strength difficulty, 1-5
        #[arg(short, long)]
        difficulty: Option<u8>,
    },

    /// End the session
    Logout,

    /// Switch to a tab and show it
    Tab {
        label: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_config(output.as_deref());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.base_url {
        config.client.base_url = url;
    }

    init_logging(&config.logging);
    tracing::info!("Stride v{} -> {}", env!("CARGO_PKG_VERSION"), config.client.base_url);

    let surface = Arc::new(TerminalSurface::new());
    let app = App::from_config(surface, &config).context("failed to build HTTP client")?;

    if let Some((username, password)) = config.credentials.pair() {
        app.api()
            .login(username, password)
            .await
            .with_context(|| format!("login as {} failed", username))?;
        tracing::info!(username, "logged in");
    }

    app.start().await;

    match cli.command {
        Commands::Dashboard { range, user, all } => {
            let selection = app.dashboard.selection().await;
            app.dashboard
                .select(range, user.or(selection.user_id))
                .await;
            if all {
                app.dashboard.toggle_leaderboard().await;
            }
            app.switch_tab("record").await;
            print!("{}", app.dashboard.view().await);
        }

        Commands::Feed => {
            app.switch_tab("social").await;
            print!("{}", app.feed.view().await);
        }

        Commands::Bookmarks => {
            app.switch_tab("bookmarks").await;
            print!("{}", app.bookmarks.view().await);
        }

        Commands::Post { content } => {
            app.feed.create_post(&content).await?;
            print!("{}", app.feed.view().await);
        }

        Commands::Comment { post_id, text } => {
            app.feed.submit_comment(post_id, &text).await?;
            print!("{}", app.feed.view().await);
        }

        Commands::Like { post_id } => {
            app.feed.toggle_like(post_id).await?;
            print!("{}", app.feed.view().await);
        }

        Commands::Bookmark { post_id } => {
            app.feed.toggle_bookmark(post_id).await?;
            print!("{}", app.feed.view().await);
        }

        Commands::Account { detail } => {
            if detail {
                app.account.show_detail().await?;
            } else {
                app.account.show_main().await?;
            }
            print!("{}", app.account.state().await);
        }

        Commands::Edit {
            nickname,
            address,
            avatar,
        } => {
            app.account.show_detail().await?;
            app.account.show_edit().await;

            if let Some(path) = avatar {
                let file = AvatarFile::from_path(&path)
                    .await
                    .with_context(|| format!("failed to read {:?}", path))?;
                app.account.select_avatar(file).await?;
            }

            let form = app.account.state().await.form;
            app.account
                .submit_edit(
                    nickname.as_deref().unwrap_or(form.nickname.as_str()),
                    address.as_deref().unwrap_or(form.address.as_str()),
                )
                .await?;
            print!("{}", app.account.state().await);
        }

        Commands::Plans => {
            app.switch_tab("plan").await;
            print!("{}", app.plans.state().await);
        }

        Commands::PlanAdd {
            activity,
            start,
            end,
        } => {
            app.plans.open_modal().await;
            app.plans
                .submit(PlanForm::new(activity, start, end))
                .await?;
            print!("{}", app.plans.state().await);
        }

        Commands::Workout {
            kind,
            activity,
            duration,
            calories,
            difficulty,
        } => {
            let entry = WorkoutEntry {
                kind: kind.into(),
                activity,
                duration_min: duration,
                calories,
                difficulty,
            };
            app.workout.log(&entry).await?;
        }

        Commands::Logout => {
            app.account.logout().await?;
        }

        Commands::Tab { label } => match app.switch_tab(&label).await {
            Some(Tab::Record) => print!("{}", app.dashboard.view().await),
            Some(Tab::Social) => print!("{}", app.feed.view().await),
            Some(Tab::Bookmarks) => print!("{}", app.bookmarks.view().await),
            Some(Tab::Plan) => print!("{}", app.plans.state().await),
            Some(Tab::Account) => print!("{}", app.account.state().await),
            Some(Tab::Workout) => println!("Use `stride workout` to log a session."),
            None => anyhow::bail!("Unknown tab: {}", label.trim()),
        },

        // handled before startup
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("stride={}", logging.level).into());

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}
