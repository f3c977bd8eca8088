// src/lib.rs

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod specs;

pub mod catalog;
pub mod logger;
pub mod merge;
pub mod progress;
pub mod runner;
pub mod timing;
