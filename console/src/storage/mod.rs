//! Local storage: settings and the persisted dashboard snapshot

pub mod layout;
pub mod settings;
pub mod state;
