// src/lib.rs

pub mod core;
pub mod error;
pub mod persistence;
pub mod raster;

pub use crate::core::dictionary::{DictFormat, Dictionary};
pub use crate::core::engine::{MeasuredWord, Page, Transcription, Transliterator};
pub use crate::core::layout::{LaidOutLine, LayoutOutcome, PageConfig};
pub use crate::core::script::ScriptVariant;
pub use crate::error::{ConfigError, DictionaryError, TransliterationError};
