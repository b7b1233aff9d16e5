use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use teapot_client::{
    client::{contacts_path, TeapotClient},
    config::ClientConfig,
    directory::{DirectoryLister, Listing},
    logging::{init_logging_with_config, LogConfig, LogLevel},
    metrics::init_metrics,
    navigation::TracingNavigator,
    notify::{MailSound, NotificationPermission, NullSink, TracingNotifier, UnreadTitle},
    presence::ContactsWatcher,
    session::{authenticated_user, CookieJar},
    shutdown::{install_signal_handlers, ShutdownCoordinator},
};
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "teapot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Watch contact presence until interrupted
    Contacts,

    /// Print a directory listing
    Ls {
        /// Listing URL, e.g. /alice/myself/files/?json
        url: String,

        /// Build links under this user's files tree
        #[arg(short, long)]
        user: Option<String>,

        /// Print rows as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Print the user a cookie string is authenticated as
    Whoami {
        /// Raw cookie string, e.g. "name=alice; auth_alice=token"
        cookie: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    config.apply_env()?;
    config.validate()?;
    Ok(config)
}

/// User whose contacts to watch: configured explicitly or read from the cookie
fn session_user(config: &ClientConfig) -> Option<String> {
    config.server.user.clone().or_else(|| {
        config
            .server
            .cookie
            .as_deref()
            .and_then(|cookie| authenticated_user(&CookieJar::parse(cookie)))
    })
}

async fn watch_contacts(config: ClientConfig) -> Result<()> {
    let Some(user) = session_user(&config) else {
        bail!("no user configured and no authenticated session cookie");
    };

    let client = Arc::new(TeapotClient::new(&config.server)?);
    let url = client.url(&contacts_path(&user));

    let permission = if config.notifications.enabled {
        NotificationPermission::Granted
    } else {
        NotificationPermission::Denied
    };
    let title = Arc::new(Mutex::new(UnreadTitle::new(
        config.notifications.base_title.clone(),
    )));

    let mut watcher = ContactsWatcher::new(
        client,
        Arc::new(TracingNavigator),
        url,
        config.contacts.period,
    )
    .with_notifier(Arc::new(TracingNotifier::new(permission)))
    .with_title(Arc::clone(&title));
    if config.notifications.sound {
        let sink = Arc::new(NullSink);
        watcher = watcher.with_sound(MailSound::new(sink.as_ref(), sink.clone()));
    }
    let view = watcher.view();

    let coordinator = Arc::new(ShutdownCoordinator::new());
    install_signal_handlers(Arc::clone(&coordinator));
    let mut signals = coordinator.subscribe();

    let exit = watcher.spawn(coordinator.token()).await?;
    match signals.try_recv() {
        Ok(signal) => info!(?exit, ?signal, "Contacts watcher stopped"),
        Err(_) => info!(?exit, "Contacts watcher stopped"),
    }

    println!("{}", view.lock().await.render_html());
    let title = title.lock().await;
    if title.unread() > 0 {
        println!("{}", title.title());
    }
    Ok(())
}

async fn list_directory(config: ClientConfig, url: &str, user: Option<&str>, json: bool) -> Result<()> {
    let client = Arc::new(TeapotClient::new(&config.server)?);
    let lister = DirectoryLister::new(Arc::clone(&client), &config.directory);
    let listing = lister.list(&client.url(url), user).await;

    if json {
        let rows: Vec<serde_json::Value> = match &listing {
            Listing::Entries(rows) => rows
                .iter()
                .map(|row| serde_json::json!({ "name": row.name, "link": row.link }))
                .collect(),
            _ => Vec::new(),
        };
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", listing.to_html());
    }

    if listing == Listing::Failed {
        bail!("listing {} failed", url);
    }
    Ok(())
}

fn whoami(cookie: &str) -> Result<()> {
    match authenticated_user(&CookieJar::parse(cookie)) {
        Some(user) => {
            println!("{}", user);
            Ok(())
        }
        None => bail!("not authenticated"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let mut log_config = LogConfig::try_from(&config.logging)?;
    if let Some(level) = &args.log_level {
        match LogLevel::parse(level) {
            Some(level) => log_config.level = level,
            None => eprintln!("Invalid log level '{}', using '{}'", level, log_config.level),
        }
    }
    if args.json_logs {
        log_config = log_config.json_format(true);
    }
    init_logging_with_config(log_config)?;
    init_metrics();

    info!("Teapot CLI started");

    match args.command {
        Some(Command::Contacts) => watch_contacts(config).await?,
        Some(Command::Ls { url, user, json }) => {
            let user = user.or_else(|| session_user(&config));
            list_directory(config, &url, user.as_deref(), json).await?
        }
        Some(Command::Whoami { cookie }) => whoami(&cookie)?,
        None => {
            warn!("No command specified. Use --help for usage information.");
        }
    }

    info!("Teapot CLI finished");

    Ok(())
}
