mod backend;
mod paths;
mod render;

use std::fs::{self, File};
use std::time::Duration;

use datagrid::prelude::*;
use datagrid::{ChannelNotifier, ConfigError, LogObserver, MemorySource};
use datagrid_http::{HttpDataSource, HttpSourceConfig, HttpSourceError};
use serde::Deserialize;
use serde_json::{Value, json};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::backend::{Backend, USERS_PATH};
use crate::paths::DemoDirs;
use crate::render::{render, render_notification};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid demo config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid grid: {0}")]
    Grid(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] HttpSourceError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Backend task failed: {0}")]
    Backend(#[from] tokio::task::JoinError),
}

/// Demo settings, read from `grid.json` in the config directory.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    grid: GridConfig,
    /// Number of seeded users.
    records: u32,
    timeout_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default().with_actions_width(Some(20)),
            records: 37,
            timeout_ms: 5000,
        }
    }
}

impl DemoConfig {
    fn load() -> Result<Self, DemoError> {
        let Some(path) = DemoDirs::locate()
            .map(|dirs| dirs.config_file())
            .filter(|p| p.exists())
        else {
            return Ok(Self::default());
        };
        log::info!("Loading config from {}", path.display());
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

fn init_logging() -> Result<(), DemoError> {
    let Some(dirs) = DemoDirs::locate() else {
        return Ok(());
    };
    dirs.rotate_logs(chrono::Local::now())?;
    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(dirs.log_file())?,
    )?;
    Ok(())
}

fn seed_users(count: u32) -> Vec<Value> {
    const ROLES: [&str; 3] = ["admin", "editor", "viewer"];
    (1..=count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("user-{:02}", (i * 7) % count.max(1) + 1),
                "email": format!("user{}@example.com", i),
                "role": ROLES[i as usize % ROLES.len()],
                "active": i % 5 != 0,
            })
        })
        .collect()
}

fn columns() -> Vec<ColumnDef<Value>> {
    vec![
        ColumnDef::field("Name", "name"),
        ColumnDef::field("Email", "email").width(24),
        ColumnDef::new("Role", "role").render(|user: &Value| {
            user["role"].as_str().unwrap_or("-").to_uppercase()
        }),
    ]
}

/// Owner-side work requested from row actions.
enum Command {
    Delete(String),
}

/// Queue a delete for `user`. Returns false if the command loop is gone.
fn request_delete(commands: &mpsc::UnboundedSender<Command>, user: &Value) -> bool {
    let id = user["id"].to_string();
    match commands.send(Command::Delete(id)) {
        Ok(()) => true,
        Err(mpsc::error::SendError(Command::Delete(id))) => {
            log::warn!("Delete of user {} dropped, no one is handling commands", id);
            false
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {}", e);
    }

    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
    }
}

async fn run() -> Result<(), DemoError> {
    let config = DemoConfig::load()?;

    let store = MemorySource::new(seed_users(config.records));
    let backend = Backend::bind(store.clone()).await?;
    let base_url = format!("http://{}{}", backend.local_addr()?, USERS_PATH);
    let cancel = CancellationToken::new();
    let server = tokio::spawn(backend.run(cancel.clone()));
    log::info!("Backend listening on {}", base_url);

    let source = HttpDataSource::<Value>::from_config(
        &HttpSourceConfig::new(base_url.clone())
            .with_timeout(Duration::from_millis(config.timeout_ms)),
    )?;

    let (commands, mut command_rx) = mpsc::unbounded_channel();
    let (notifier, mut notifications) = ChannelNotifier::channel();

    let grid = GridController::builder(source, columns())
        .config(config.grid)
        .action(
            RowAction::new("Delete", move |user: &Value| {
                request_delete(&commands, user);
            })
            .danger(),
        )
        .action(RowAction::new("Edit", |_: &Value| {}).disabled(true))
        .selection(
            SelectionConfig::multiple()
                .row_disabled(|user: &Value| user["active"] == json!(false)),
        )
        .expandable(ExpandableConfig::new(|user: &Value| {
            let text = |field: &str| user[field].as_str().unwrap_or_default().to_string();
            format!("{} <{}>, {}", text("name"), text("email"), text("role"))
        }))
        .reorderable(|rows: Vec<Value>| {
            let ids: Vec<String> = rows.iter().map(|r| r["id"].to_string()).collect();
            log::info!("Rows reordered: {}", ids.join(","));
        })
        .notifier(notifier)
        .observer(LogObserver)
        .build()?;
    let handle = grid.handle();

    let show = |title: &str, notifications: &mut datagrid::notify::NotificationReceiver| {
        print!("{}", render(title, &grid.view()));
        for notification in notifications.drain() {
            println!("{}", render_notification(&notification));
        }
        println!();
    };

    grid.mount().await;
    show("mounted", &mut notifications);

    grid.next_page().await;
    show("page 2", &mut notifications);

    grid.toggle_sort("name").await;
    grid.toggle_sort("name").await;
    show("sorted by name, descending", &mut notifications);

    let keys = grid.row_keys();
    if let (Some(first), Some(third)) = (keys.first(), keys.get(2)) {
        grid.toggle_selection(first);
        grid.range_select(third, true);
    }
    show("range selected", &mut notifications);
    println!("selected: {:?}\n", grid.selected_keys());

    grid.reorder(2, 0);
    show("third row dragged to the top", &mut notifications);

    if let Some(first) = grid.row_keys().first() {
        grid.click_action(first, 0);
    }
    if let Ok(Command::Delete(id)) = command_rx.try_recv() {
        let url = format!("{}/{}", base_url, id);
        log::info!("DELETE {}", url);
        reqwest::Client::new()
            .delete(url)
            .send()
            .await?
            .error_for_status()?;
        handle.reload().await;
        show(&format!("deleted user {}", id), &mut notifications);
    }

    if let Some(first) = grid.row_keys().first() {
        grid.toggle_expanded(first);
    }
    show("first row expanded", &mut notifications);

    grid.change_page_size(20).await;
    show("page size 20", &mut notifications);

    cancel.cancel();
    server.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_delete() {
        let (commands, mut rx) = mpsc::unbounded_channel();
        assert!(request_delete(&commands, &json!({"id": 4})));
        assert!(matches!(rx.try_recv(), Ok(Command::Delete(id)) if id == "4"));

        drop(rx);
        assert!(!request_delete(&commands, &json!({"id": 5})));
    }

    #[test]
    fn test_seed_users() {
        let users = seed_users(10);
        assert_eq!(users.len(), 10);
        assert_eq!(users[0]["id"], json!(1));
        assert_eq!(users[4]["active"], json!(false));
    }
}
