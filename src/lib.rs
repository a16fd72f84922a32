//! Insolvency Intelligence API Library
//!
//! This library extracts structured financial data from UK corporate
//! insolvency filings by chaining the company registry (profile, filing
//! history, officers, document fetch), a generative-AI extraction provider,
//! and a web-search provider.
//!
//! # Modules
//!
//! - `ai`: Gemini extraction client and field schemas.
//! - `config`: Configuration management.
//! - `document`: Redirect-aware secure document fetcher.
//! - `errors`: Error handling types.
//! - `filings`: Filing-history selection heuristics.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `pipeline`: Company extraction orchestrator.
//! - `registry`: Company registry client.
//! - `search`: Web-search client.

pub mod ai;
pub mod config;
pub mod document;
pub mod errors;
pub mod filings;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod search;
