//! Mutable billing session and its command surface.
//!
//! The session owns the encounter context and the ordered entry list; all
//! business rules live in the engines it composes. Every command is an
//! atomic value replacement on `self`.

use crate::bill::{BillingResult, compute_bill};
use crate::catalog::Catalog;
use crate::derive::{derive_base_entries, derive_context_entries};
use crate::rules;
use crate::types::{
    ArrivalMethod, CopayRatio, EncounterContext, EntryLine, Provenance, TimeBand,
    ValidationMessage, VisitType,
};

/// A single encounter being billed.
#[derive(Debug, Clone)]
pub struct Session {
    context: EncounterContext,
    /// Context restored by `reset`, fixed at construction.
    default_context: EncounterContext,
    entries: Vec<EntryLine>,
    /// Advisories from the last auto-calculate pass; cleared whenever the
    /// context changes.
    advisories: Vec<ValidationMessage>,
    next_line_id: u64,
}

impl Session {
    /// Creates a session and derives the initial base entries.
    #[must_use]
    pub fn new(context: EncounterContext, catalog: &Catalog) -> Self {
        let mut session = Self {
            context,
            default_context: context,
            entries: Vec::new(),
            advisories: Vec::new(),
            next_line_id: 1,
        };
        session.refresh_base(catalog);
        session
    }

    #[must_use]
    pub fn context(&self) -> &EncounterContext {
        &self.context
    }

    #[must_use]
    pub fn entries(&self) -> &[EntryLine] {
        &self.entries
    }

    /// Messages produced by the last auto-calculate pass.
    #[must_use]
    pub fn advisories(&self) -> &[ValidationMessage] {
        &self.advisories
    }

    pub fn set_visit_type(&mut self, visit_type: VisitType, catalog: &Catalog) {
        self.context.visit_type = visit_type;
        self.context_changed(catalog);
    }

    pub fn set_time_band(&mut self, time_band: TimeBand, catalog: &Catalog) {
        self.context.time_band = time_band;
        self.context_changed(catalog);
    }

    pub fn set_arrival_method(&mut self, arrival_method: ArrivalMethod, catalog: &Catalog) {
        self.context.arrival_method = arrival_method;
        self.context_changed(catalog);
    }

    pub fn set_patient_age(&mut self, years: u32, catalog: &Catalog) {
        self.context.patient_age_years = EncounterContext::clamp_age(years);
        self.context_changed(catalog);
    }

    pub fn set_copay_ratio(&mut self, ratio: CopayRatio, catalog: &Catalog) {
        self.context.copay_ratio = ratio;
        self.context_changed(catalog);
    }

    /// Adds a manual line, or bumps the quantity of the existing manual
    /// line for the same code.
    pub fn add_manual_entry(&mut self, code: impl Into<String>, quantity: u32) {
        let code = code.into();
        let quantity = quantity.max(1);
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|e| e.provenance == Provenance::Manual && e.item_code == code)
        {
            existing.quantity += quantity;
            tracing::debug!(code = %code, quantity = existing.quantity, "manual quantity bumped");
            return;
        }
        tracing::debug!(code = %code, quantity, "manual entry added");
        self.push_line(code, quantity, Provenance::Manual);
    }

    /// Sets a line's quantity, floored at 1. Unknown ids are ignored.
    pub fn update_quantity(&mut self, line_id: u64, quantity: u32) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == line_id) {
            entry.quantity = quantity.max(1);
        }
    }

    /// Removes a line regardless of provenance. Unknown ids are ignored.
    pub fn remove_entry(&mut self, line_id: u64) {
        self.entries.retain(|e| e.id != line_id);
    }

    /// Empties the entry list and re-derives the base entries from the
    /// unchanged context.
    pub fn clear_all(&mut self, catalog: &Catalog) {
        self.entries.clear();
        self.advisories.clear();
        self.refresh_base(catalog);
    }

    /// Runs both derivation phases against the manual entries and replaces
    /// every auto line and the advisory list with the fresh output.
    pub fn run_auto_calculate(&mut self, catalog: &Catalog) {
        self.entries.retain(|e| e.provenance == Provenance::Manual);
        self.append_base(catalog);

        let derivation = derive_context_entries(&self.entries, &self.context, catalog);
        for code in derivation.codes {
            if !rules::contains_code(&self.entries, &code) {
                self.push_line(code, 1, Provenance::AutoContext);
            }
        }
        self.advisories = derivation.messages;
        tracing::debug!(entries = self.entries.len(), "auto-calculate complete");
    }

    /// Restores the construction-time context and an empty entry list,
    /// then re-derives base entries.
    pub fn reset(&mut self, catalog: &Catalog) {
        self.context = self.default_context;
        self.entries.clear();
        self.advisories.clear();
        self.refresh_base(catalog);
    }

    /// Computes the statement for the current state. Advisories from the
    /// last auto-calculate pass are appended to the validation messages.
    #[must_use]
    pub fn bill(&self, catalog: &Catalog) -> BillingResult {
        let mut result = compute_bill(&self.entries, &self.context, catalog);
        result.messages.extend(self.advisories.iter().cloned());
        result
    }

    fn context_changed(&mut self, catalog: &Catalog) {
        self.advisories.clear();
        self.refresh_base(catalog);
    }

    /// Replaces the base-derived lines; manual and context-derived lines
    /// are untouched.
    fn refresh_base(&mut self, catalog: &Catalog) {
        self.entries.retain(|e| e.provenance != Provenance::AutoBase);
        self.append_base(catalog);
    }

    fn append_base(&mut self, catalog: &Catalog) {
        for code in derive_base_entries(&self.context, catalog) {
            if !rules::contains_code(&self.entries, &code) {
                self.push_line(code, 1, Provenance::AutoBase);
            }
        }
    }

    fn push_line(&mut self, code: String, quantity: u32, provenance: Provenance) {
        self.entries.push(EntryLine {
            id: self.next_line_id,
            item_code: code,
            quantity,
            provenance,
        });
        self.next_line_id += 1;
    }
}
