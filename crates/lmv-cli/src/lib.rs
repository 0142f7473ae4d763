//! Library components of the loyalty migration validator CLI.
//!
//! The binary is a thin shell over [`watcher::Watcher`], which polls a folder
//! and hands each stable arrival to [`pipeline::process_file`].

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod watcher;
