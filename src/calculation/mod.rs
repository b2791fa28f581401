//! Calculation logic for the benefit consolidation engine.
//!
//! This module contains the deterministic pipeline: source normalization,
//! identifier and affiliation resolution, exclusion set building, eligibility
//! classification, benefit calculation with per-step rounding, admission date
//! lookup, policy overrides from lookup sources, and aggregation.

mod admission;
mod aggregate;
mod benefit;
mod eligibility;
mod exclusion;
mod normalize;
mod pipeline;
mod policy_lookup;
mod resolver;

pub use admission::{AdmissionIndex, admission_date_of};
pub use aggregate::{aggregate, totals_for};
pub use benefit::{
    BenefitCalculation, calculate_benefit, employee_share_rate, employer_share_rate, round_money,
};
pub use eligibility::{Classification, EligibilityResult, RejectionReason, classify};
pub use exclusion::{ExclusionSet, ExclusionSource, build_exclusion_set};
pub use normalize::{Normalized, normalize};
pub use pipeline::{DeterministicOutcome, LOCAL_NOTE, SourceBundle, run_deterministic};
pub use resolver::{Resolver, header_matches, normalize_identifier};
