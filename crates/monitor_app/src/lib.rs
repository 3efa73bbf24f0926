//! Command-line front end for the transcription job monitor.
pub mod cli;
pub mod config;
pub mod logging;
pub mod render;
