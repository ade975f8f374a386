//! Dashboard rendering

use colored::Colorize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::entity::Entity;
use crate::storage::state::DashboardState;

fn entity_row(entity: &Entity) -> String {
    let name = match entity.port {
        Some(port) => format!("{} ({})", entity.name, port),
        None => entity.name.clone(),
    };
    format!("  {}  {:<24}{}", entity.status.glyph(), name, entity.id.dimmed())
}

/// Render the full dashboard from a snapshot
pub fn render_dashboard(state: &DashboardState, demo_enabled: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Quick Start".bold()));
    out.push_str(&format!(
        "  {}  {}\n\n",
        state.all_status.glyph(),
        "All Entities".bold()
    ));

    out.push_str(&format!("{}\n", "Repositories".bold()));
    for repo in &state.repositories {
        out.push_str(&entity_row(repo));
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!("{}\n", "Servers".bold()));
    for server in &state.servers {
        out.push_str(&entity_row(server));
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!("{}\n", "Demo".bold()));
    if demo_enabled {
        out.push_str(&entity_row(&state.demo));
        out.push('\n');
    } else {
        out.push_str(&format!(
            "  {}\n",
            "available once all entities are running".dimmed()
        ));
    }

    out
}

/// Log status transitions while a bulk operation runs
pub fn spawn_status_watcher(mut rx: watch::Receiver<DashboardState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            debug!(
                "status: all={} repositories=[{}] servers=[{}]",
                state.all_status.glyph(),
                glyphs(&state.repositories),
                glyphs(&state.servers),
            );
        }
    })
}

fn glyphs(entities: &[Entity]) -> String {
    entities
        .iter()
        .map(|e| e.status.glyph())
        .collect::<Vec<_>>()
        .join(" ")
}
