pub mod command;
pub mod document;
pub mod lexer;
mod options;

pub use document::parse;
