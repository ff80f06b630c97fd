pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod engine;
pub mod entities;
pub mod error;
pub mod input;
pub mod surface;
