pub mod app;
pub mod config;
pub mod countdown;
pub mod errors;
pub mod feed;
pub mod handlers;
pub mod schedule;
pub mod share;
pub mod status;
pub mod ui;
pub mod updater;
