// src/internal/mod.rs

pub mod bench;
pub mod config;
pub mod instrument;
pub mod logger;
pub mod lookup;
pub mod pathvar;
pub mod sync;
