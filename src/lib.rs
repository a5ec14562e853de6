// src/lib.rs

pub mod api;
pub mod chat;
pub mod chat_message;
pub mod chat_view;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod models;
pub mod scroll;
pub mod status_indicator;
pub mod ui;
