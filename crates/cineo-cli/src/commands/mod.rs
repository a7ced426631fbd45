pub mod account;
pub mod browse;
pub mod config;
pub mod profile;
pub mod prompts;
pub mod track;
