// Core typing engine, exposed for integration tests and embedding. The
// terminal front end (ui, main) lives in the binary.
pub mod config;
pub mod drill;
pub mod editor;
pub mod metrics;
pub mod navigate;
pub mod passage;
pub mod runtime;
pub mod session;
pub mod text_model;
