// The core module contains all business logic.
// Each feature gets its own submodule. Nothing in here imports serenity or poise.

pub mod authorization;
pub mod commands;
pub mod config;
pub mod gateway;
pub mod points;
pub mod reactions;
pub mod settings;
pub mod store;
