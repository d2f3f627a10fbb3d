pub mod config;
pub mod events;
pub mod format;
pub mod gui;
pub mod sys;
