pub mod app;
pub mod config;
pub mod data;
pub mod fetch;
pub mod fonts;
pub mod reference;
pub mod state;
pub mod ui;
