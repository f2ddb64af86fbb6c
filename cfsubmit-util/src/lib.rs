#![warn(clippy::all)]

pub mod abs_path;
pub mod console;
mod macros;
pub mod model;

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;
