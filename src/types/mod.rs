pub mod config;
pub mod item;
pub mod node;
pub mod options;
