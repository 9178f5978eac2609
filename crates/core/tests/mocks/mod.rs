#![allow(dead_code)]

#[cfg(unix)]
pub mod fake_extractor;
pub mod language_model;
pub mod mirror_server;
pub mod provider;
