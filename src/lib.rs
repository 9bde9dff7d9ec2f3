pub mod app;
pub mod catalog;
pub mod cleaning;
pub mod cli;
pub mod matcher;
pub mod normalize;
pub mod prefix_fixer;
pub mod rename_engine;
pub mod report;
pub mod series;
pub mod verify;
