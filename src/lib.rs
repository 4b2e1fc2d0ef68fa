//! blogforge - multi-tenant blog drafting with GEO/AEO readiness scoring
//!
//! The [`scoring`] module grades a generated post document (output
//! contract v2.0) on how well answer engines and LLMs can extract, trust and
//! cite it. Around it sit the drafting pipeline ([`pipeline`]), the LLM
//! client ([`ai`]), the Airtable-backed entity store ([`store`]) and the
//! blog directory ([`blogs`]).
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! let report = blogforge::scoring::score(&json!({}), &json!({}));
//! assert_eq!(report.geo_aeo_score, 35);
//! ```

pub mod ai;
pub mod blogs;
pub mod cli;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod reporters;
pub mod scoring;
pub mod store;
