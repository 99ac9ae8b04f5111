//! examscore-store: Exam data stores and configuration.
//!
//! Implements the `ExamDataStore` trait over in-memory datasets and JSON
//! exports of the exam database, and loads `examscore.toml`.

pub mod config;
pub mod dataset;
pub mod json;
pub mod memory;

pub use config::{create_store, load_config, open_json_store, ExamscoreConfig, StoreConfig};
pub use dataset::Dataset;
pub use json::JsonStore;
pub use memory::InMemoryStore;
