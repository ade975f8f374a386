//! didctl - Entry Point
//!
//! Operator console for the OpenDID orchestrator backend: start, stop and
//! health-check the managed services, edit the shared configuration, and
//! provision wallets and DID documents.

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::error;

use didctl::confs::ConfigOps;
use didctl::errors::ConsoleError;
use didctl::http::api::{ApiClient, OrchestratorApi};
use didctl::logs::{init_logging, LogOptions};
use didctl::models::entity::CombinedStatus;
use didctl::orchestrate::top::Orchestrator;
use didctl::orchestrate::OrchestratorOptions;
use didctl::provision::Provisioner;
use didctl::render::{render_dashboard, spawn_status_watcher};
use didctl::storage::layout::StorageLayout;
use didctl::storage::settings::Settings;
use didctl::store::StateStore;
use didctl::utils::version_info;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut commands: Vec<String> = Vec::new();
    let mut flags: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            flags.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            flags.insert(clean_key.to_string(), "true".to_string());
        } else {
            commands.push(arg.clone());
        }
    }

    // Print version and exit
    if flags.contains_key("version") {
        println!("{}", serde_json::to_string_pretty(&version_info()).unwrap());
        return ExitCode::SUCCESS;
    }

    if flags.contains_key("help") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings file; missing file means defaults
    let layout = StorageLayout::default();
    let settings_file = layout.settings_file();
    let settings = if settings_file.exists().await {
        match settings_file.read_json::<Settings>().await {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Unable to read settings file: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Settings::default()
    };

    // Initialize logging; --log-level overrides the settings file
    let log_level = flags
        .get("log-level")
        .and_then(|s| s.parse().ok())
        .unwrap_or(settings.log_level.clone());
    let log_options = LogOptions {
        log_level,
        ..Default::default()
    };
    if let Err(e) = init_logging(log_options) {
        println!("Failed to initialize logging: {e}");
    }

    let backend_url = flags
        .get("backend")
        .cloned()
        .unwrap_or(settings.backend.base_url.clone());

    match run(&commands, &flags, &backend_url, &layout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(ConsoleError::UsageError(message)) => {
            eprintln!("{}", message);
            print_usage();
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(
    commands: &[String],
    flags: &HashMap<String, String>,
    backend_url: &str,
    layout: &StorageLayout,
) -> Result<(), ConsoleError> {
    let api: Arc<dyn OrchestratorApi> = Arc::new(ApiClient::new(backend_url)?);
    let store = Arc::new(StateStore::load(layout.state_file()).await);
    let orchestrator = Orchestrator::new(api.clone(), store.clone(), OrchestratorOptions::default());

    let watcher = spawn_status_watcher(store.subscribe());

    let command = commands.first().map(String::as_str).unwrap_or("dashboard");
    let result = dispatch(command, commands, flags, &api, &store, &orchestrator).await;

    watcher.abort();
    result
}

async fn dispatch(
    command: &str,
    commands: &[String],
    flags: &HashMap<String, String>,
    api: &Arc<dyn OrchestratorApi>,
    store: &Arc<StateStore>,
    orchestrator: &Orchestrator,
) -> Result<(), ConsoleError> {
    match command {
        "dashboard" => {
            let state = store.snapshot().await;
            let demo_enabled = state.all_status == CombinedStatus::Healthy;
            print!("{}", render_dashboard(&state, demo_enabled));
            Ok(())
        }

        "start" if flags.contains_key("all") => {
            let combined = orchestrator.start_all().await?;
            println!("All entities started, overall status: {}", combined.glyph());
            Ok(())
        }
        "start" => {
            let status = orchestrator.start_entity(&require(flags, "id")?).await?;
            println!("{}", status.glyph());
            Ok(())
        }

        "stop" if flags.contains_key("all") => {
            let combined = orchestrator.stop_all().await?;
            println!("All entities stopped, overall status: {}", combined.glyph());
            Ok(())
        }
        "stop" => {
            let status = orchestrator.stop_entity(&require(flags, "id")?).await?;
            println!("{}", status.glyph());
            Ok(())
        }

        "status" if flags.contains_key("all") => {
            let combined = orchestrator.status_all().await?;
            println!("Overall status: {}", combined.glyph());
            let state = store.snapshot().await;
            print!(
                "{}",
                render_dashboard(&state, orchestrator.demo().enabled().await)
            );
            Ok(())
        }
        "status" => {
            let status = orchestrator.check_entity(&require(flags, "id")?).await?;
            println!("{}", status.glyph());
            Ok(())
        }

        "demo" => demo_command(commands, orchestrator).await,

        "generate-all" => {
            let provisioner = Provisioner::new(api.clone(), store.clone());
            provisioner.generate_all(&password(flags)?).await?;
            println!("Generation All created successfully!");
            Ok(())
        }

        "wallet" => {
            let provisioner = Provisioner::new(api.clone(), store.clone());
            provisioner
                .create_wallet_and_keys(&require(flags, "name")?, &password(flags)?)
                .await?;
            println!("Wallet created successfully!");
            Ok(())
        }

        "diddoc" => {
            let provisioner = Provisioner::new(api.clone(), store.clone());
            let did = provisioner
                .create_diddoc(
                    &require(flags, "name")?,
                    &password(flags)?,
                    flags.get("did").cloned(),
                )
                .await?;
            println!("DID Document {} created successfully!", did);
            Ok(())
        }

        "config" => config_command(commands, flags, api).await,

        "logs" => {
            let id = require(flags, "id")?;
            let entity = find_entity(store, &id)
                .await
                .ok_or_else(|| ConsoleError::NotFound(format!("Unknown entity: {}", id)))?;
            let log = api.fetch_log(&entity.log_name()).await?;
            print!("{}", log);
            Ok(())
        }

        other => Err(ConsoleError::UsageError(format!(
            "Unknown command: {}",
            other
        ))),
    }
}

async fn demo_command(commands: &[String], orchestrator: &Orchestrator) -> Result<(), ConsoleError> {
    let demo = orchestrator.demo();
    demo.refresh_gate().await;
    if !demo.enabled().await {
        return Err(ConsoleError::UsageError(
            "The demo is available once all entities are running. Run `didctl status --all` first."
                .to_string(),
        ));
    }

    let action = commands
        .get(1)
        .map(String::as_str)
        .ok_or_else(|| ConsoleError::UsageError("Usage: didctl demo <start|stop|status>".to_string()))?;

    let status = match action {
        "start" => orchestrator.start_entity("demo").await?,
        "stop" => orchestrator.stop_entity("demo").await?,
        "status" => orchestrator.check_entity("demo").await?,
        other => {
            return Err(ConsoleError::UsageError(format!(
                "Unknown demo action: {}",
                other
            )))
        }
    };

    println!("{}", status.glyph());
    Ok(())
}

async fn config_command(
    commands: &[String],
    flags: &HashMap<String, String>,
    api: &Arc<dyn OrchestratorApi>,
) -> Result<(), ConsoleError> {
    let configs = ConfigOps::new(api.clone());

    let action = commands.get(1).map(String::as_str).unwrap_or("show");
    match action {
        "show" => {
            let config = configs.fetch().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        "set" => {
            configs
                .set(
                    &require(flags, "section")?,
                    &require(flags, "key")?,
                    &require(flags, "value")?,
                )
                .await?;
            println!("Config saved successfully!");
            Ok(())
        }
        "apply" => {
            let file = didctl::filesys::file::File::new(require(flags, "file")?);
            let config = file.read_json().await?;
            configs.save(&config).await?;
            println!("Config saved successfully!");
            Ok(())
        }
        other => Err(ConsoleError::UsageError(format!(
            "Unknown config action: {}",
            other
        ))),
    }
}

async fn find_entity(
    store: &Arc<StateStore>,
    id: &str,
) -> Option<didctl::models::entity::Entity> {
    use didctl::models::entity::GroupKind;

    if let Some(entity) = store.entity(GroupKind::Repositories, id).await {
        return Some(entity);
    }
    if let Some(entity) = store.entity(GroupKind::Servers, id).await {
        return Some(entity);
    }
    let demo = store.demo().await;
    (demo.id == id).then_some(demo)
}

fn require(flags: &HashMap<String, String>, key: &str) -> Result<String, ConsoleError> {
    flags
        .get(key)
        .cloned()
        .ok_or_else(|| ConsoleError::UsageError(format!("Missing required flag: --{}=...", key)))
}

fn password(flags: &HashMap<String, String>) -> Result<SecretString, ConsoleError> {
    let password = require(flags, "password")?;
    if password.is_empty() {
        return Err(ConsoleError::UsageError(
            "Please enter your password.".to_string(),
        ));
    }
    Ok(SecretString::from(password))
}

fn print_usage() {
    println!(
        "Usage: didctl [command] [flags]

Commands:
  dashboard                         Render the dashboard (default)
  start   --id=<entity> | --all     Start one entity, or everything in order
  stop    --id=<entity> | --all     Stop one entity, or everything in reverse order
  status  --id=<entity> | --all     Health-check one entity or everything
  demo    <start|stop|status>       Control the demo app (requires all entities up)
  generate-all --password=<pw>      Provision wallet, keys and DID document for every server
  wallet  --name=<id> --password=<pw>
  diddoc  --name=<id> --password=<pw> [--did=<did>]
  config  show | set --section=<s> --key=<k> --value=<v> | apply --file=<path>
  logs    --id=<entity>             Print an entity's backend log

Flags:
  --backend=<url>     Orchestrator backend base URL
  --log-level=<lvl>   trace|debug|info|warn|error
  --version           Print version info"
    );
}
