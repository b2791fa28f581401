//! Core data models for the benefit consolidation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod affiliation;
mod consolidation_result;
mod employee;
mod policy;
mod source_table;

pub use affiliation::AffiliationCode;
pub use consolidation_result::{
    AuditStep, AuditTrace, AuditWarning, ConsolidationResult, ConsolidationTotals,
};
pub use employee::{BenefitAmounts, CanonicalEmployee};
pub use policy::{PolicySource, PolicyTable};
pub use source_table::{RawRecord, RawTable, SourceTable};
