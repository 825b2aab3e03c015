pub mod config;
pub mod logging;

pub mod artifact;
pub mod auth;
pub mod catalog;
pub mod console;
pub mod dom;
pub mod error;
pub mod form;
pub mod monitor;
pub mod portal;
pub mod size;
pub mod version;
pub mod workflow;

pub use error::Error;
