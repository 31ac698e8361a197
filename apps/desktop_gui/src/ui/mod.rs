pub mod app;
pub mod panels;
pub mod theme;
