//! Backend HTTP interface

pub mod api;
pub mod client;
