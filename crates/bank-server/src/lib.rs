pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod policy;
pub mod server;

pub use server::{spool_path_for, Server, ServerState};
