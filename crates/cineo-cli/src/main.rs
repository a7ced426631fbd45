use clap::{ArgAction, Parser, Subcommand};
use cineo_config::{Config, PathManager};
use cineo_core::ProfileUpdate;
use cineo_models::{ContentId, Language, MediaKind, PersonId, WatchStatus};
use color_eyre::eyre::eyre;
use commands::{account, browse, config, profile, track};

mod app;
mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cineo")]
#[command(about = "Cineo - keep track of the films and series you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Language for titles and overviews (az, ru, en); defaults to the config value
    #[arg(long, global = true)]
    lang: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's trending films and series
    Trending,
    /// Search films and series
    #[command(long_about = "Search films and series by title. With --interactive, every line read from stdin is treated as the current search box contents: queries are debounced and results of superseded queries are dropped.")]
    Search {
        /// Search terms
        #[arg(required_unless_present = "interactive")]
        query: Vec<String>,

        /// Read queries line by line from stdin
        #[arg(short, long, action = ArgAction::SetTrue)]
        interactive: bool,
    },
    /// Show details of a film or series, with your progress
    Show {
        id: ContentId,

        /// Skip kind detection (film or series)
        #[arg(long)]
        kind: Option<MediaKind>,

        /// List every episode of every season
        #[arg(long, action = ArgAction::SetTrue)]
        episodes: bool,
    },
    /// List the films and series a cast member appeared in
    Credits {
        /// Person id, as shown in the cast table of `show`
        person: PersonId,
    },
    /// Set the watch status of a title (none, planned, watching, watched)
    Status {
        id: ContentId,
        status: WatchStatus,

        /// Skip kind detection (film or series)
        #[arg(long)]
        kind: Option<MediaKind>,
    },
    /// Mark or unmark one episode as watched
    Episode {
        id: ContentId,
        season: u32,
        episode: u32,
    },
    /// Mark a whole season as watched, or clear it when it is already complete
    Season {
        id: ContentId,
        season: u32,
    },
    /// Show your viewing statistics
    Profile,
    /// List tracked titles
    History {
        /// Only titles with this status
        #[arg(long)]
        status: Option<WatchStatus>,
    },
    /// Change your avatar URL; omit the URL to reset it
    Avatar {
        url: Option<String>,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign in
    Login {
        #[arg(long)]
        username: Option<String>,
    },
    /// Sign out
    Logout,
    /// Change your password
    Password,
    /// Manage accounts (administrators only)
    Users {
        #[command(subcommand)]
        cmd: UserCommands,
    },
    /// Inspect or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List every account
    List,
    /// Edit an account's contact details or password
    Edit {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
        /// Prompt for a new password
        #[arg(long, action = ArgAction::SetTrue)]
        reset_password: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a default config file
    Init,
    /// Store the TMDB API key in the credentials file
    SetApiKey {
        key: Option<String>,
    },
    /// Generate an Argon2 hash for the administrator account
    HashPassword,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = PathManager::discover().map_err(|e| eyre!("Failed to locate cineo directories: {}", e))?;
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    logging::init_logging(cli.verbose, cli.quiet, &config.logging).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let mut app = app::App::load(paths, config, cli.lang)?;

    match cli.command {
        Commands::Trending => browse::run_trending(&app, &output).await,
        Commands::Search { query, interactive } => {
            if interactive {
                browse::run_interactive_search(&app, &output).await
            } else {
                browse::run_search(&app, &query.join(" "), &output).await
            }
        }
        Commands::Show { id, kind, episodes } => browse::run_show(&app, id, kind, episodes, &output).await,
        Commands::Credits { person } => browse::run_credits(&app, person, &output).await,
        Commands::Status { id, status, kind } => track::run_status(&app, id, status, kind, &output).await,
        Commands::Episode { id, season, episode } => track::run_episode(&app, id, season, episode, &output).await,
        Commands::Season { id, season } => track::run_season(&app, id, season, &output).await,
        Commands::Profile => profile::run_profile(&app, &output).await,
        Commands::History { status } => profile::run_history(&app, status, &output).await,
        Commands::Avatar { url } => profile::run_avatar(&app, url, &output).await,
        Commands::Register { username, email, phone } => {
            account::run_register(&mut app, username, email, phone, &output).await
        }
        Commands::Login { username } => account::run_login(&mut app, username, &output).await,
        Commands::Logout => account::run_logout(&mut app, &output).await,
        Commands::Password => account::run_password(&app, &output).await,
        Commands::Users { cmd } => match cmd {
            UserCommands::List => account::run_list_users(&app, &output).await,
            UserCommands::Edit { id, email, phone, avatar, reset_password } => {
                let update = ProfileUpdate { email, phone, avatar, password: None };
                account::run_edit_user(&app, &id, update, reset_password, &output).await
            }
        },
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::show_config(&app, full, &output).await,
            ConfigCommands::Init => config::init_config(&app, &output).await,
            ConfigCommands::SetApiKey { key } => config::set_api_key(&mut app, key, &output).await,
            ConfigCommands::HashPassword => config::hash_admin_password(&output).await,
        },
    }
}
