//! didctl library
//!
//! Operator console for the OpenDID orchestrator backend.

pub mod confs;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod orchestrate;
pub mod provision;
pub mod render;
pub mod storage;
pub mod store;
pub mod utils;
