//! Outpatient billing engine.
//!
//! Computes itemized outpatient statements from a fee catalog: base fees
//! derived from the encounter context, context-dependent companion fees
//! derived from the entered items, eligibility and conflict validation,
//! and exact point-to-currency aggregation with the patient/insurer split.
//!
//! The crate is pure domain logic. [`Session`] is the mutable entry point;
//! everything below it is a function over immutable inputs.

pub mod bill;
pub mod catalog;
pub mod derive;
pub mod master;
pub mod rules;
pub mod session;
pub mod types;
pub mod validate;

pub use bill::{BillingResult, CategorySubtotal, POINT_TO_CURRENCY_RATE, SubtotalLine, compute_bill};
pub use catalog::{Catalog, CatalogEntry, CatalogError};
pub use derive::{ContextDerivation, derive_base_entries, derive_context_entries};
pub use session::Session;
pub use types::{
    AgeBand, ArrivalMethod, Category, CapabilityTag, CopayRatio, EncounterContext, EntryLine,
    Provenance, Severity, TimeBand, ValidationMessage, VisitType,
};
pub use validate::validate;
