pub mod cli;
pub mod commands;
pub mod config;
pub mod dto;
pub mod prompt;
pub mod report;
