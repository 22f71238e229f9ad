//! Terminal UI components

pub mod picker;
pub mod theme;

pub use picker::pick_file;
