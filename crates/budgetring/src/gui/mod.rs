pub mod app;
pub mod chart;
pub mod icon;
pub mod theme;
