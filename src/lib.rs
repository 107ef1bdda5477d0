pub mod app;
pub mod assets;
pub mod config;
pub mod event;
pub mod game;
pub mod scores;
pub mod ui;
