use std::sync::Arc;

pub mod actor;
pub mod cloud_provider;
pub mod config;
pub mod control_loop;
pub mod discovery;
pub mod manager;
pub mod node_groups;
pub mod utho_cloud;

pub type AppConfig = Arc<config::Config>;
