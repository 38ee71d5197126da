pub mod commands;
pub mod logger;
pub mod render;
pub mod setup;

pub use commands::run;
