pub mod config;
pub mod crawler;
pub mod error;
pub mod output;
pub mod schedule;
pub mod teams;
pub mod types;
pub mod utils;
pub mod web;
