// src/lib.rs

pub mod app;
pub mod blockchain;
pub mod cli;
pub mod core;
pub mod deploy;
pub mod i18n;
pub mod provider;
