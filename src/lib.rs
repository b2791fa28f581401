//! Meal-benefit consolidation engine.
//!
//! This crate reconciles an employee population spread across several
//! tabular sources into one per-employee benefit calculation. A language
//! model may produce the consolidation; a deterministic pipeline always
//! backs it up.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod sources;
