pub mod action;
pub mod app;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod event;
pub mod format;
pub mod logging;
pub mod remote;
pub mod ui;
