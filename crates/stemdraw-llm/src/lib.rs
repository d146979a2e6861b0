//! # Stemdraw LLM
//!
//! Optional LLM stages of the pipeline, backed by the DeepSeek chat
//! API: a planner that proposes diagram plans from problem text, and an
//! auditor that critiques generated diagrams. When no API key is
//! configured the planner stage is absent entirely and the
//! [`SimulatedAuditor`] stands in for the audit.

mod auditor;
mod client;
mod planner;

pub use auditor::{LlmAuditor, SimulatedAuditor};
pub use client::{ChatMessage, DeepSeekClient, LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use planner::LlmPlanner;
