//! AI adapter module. Implements ReportGenerator for LLM integration.
//!
//! Provides the OpenAI-compatible adapter, its prompts and wire types, and a mock
//! generator for running without an API key.

pub mod csv_utils;
pub mod mock_adapter;
pub mod openai_adapter;
pub mod prompts;
pub mod wire;

pub use csv_utils::contacts_to_csv;
pub use mock_adapter::MockReportGenerator;
pub use openai_adapter::OpenAiAdapter;
