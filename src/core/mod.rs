// src/core/mod.rs
pub mod canvas;
pub mod catalog;
pub mod dictionary;
pub mod engine;
pub mod layout;
pub mod renderer;
pub mod resolver;
pub mod script;
pub mod segmenter;
pub mod types;
