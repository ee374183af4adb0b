pub mod banner;
pub mod clipboard;
pub mod config;
pub mod consts;
pub mod engine;
pub mod events;
pub mod generator;
pub mod prompts;
pub mod session;
pub mod spinner;
pub mod tui;
