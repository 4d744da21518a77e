//! Eligibility and conflict validation.
//!
//! A pure function of (entries, context, catalog); it never mutates the
//! session. Aggregation uses [`check_line`] to decide which lines
//! contribute zero points, and [`validate`] to collect the message list.

use crate::catalog::{Catalog, CatalogEntry};
use crate::rules::{self, EXCLUSION_RULES};
use crate::types::{EncounterContext, EntryLine, ValidationMessage, VisitType};

/// Returns the violation that excludes this line from aggregation, if any.
///
/// The line itself stays in the session either way; exclusion only zeroes
/// its point contribution.
#[must_use]
pub fn check_line(
    item: &CatalogEntry,
    entries: &[EntryLine],
    context: &EncounterContext,
    catalog: &Catalog,
) -> Option<ValidationMessage> {
    if item.requires_initial_visit && context.visit_type == VisitType::FollowUp {
        return Some(
            ValidationMessage::error(format!(
                "{} may only be billed on an initial visit",
                item.name
            ))
            .with_codes([item.code.as_str()]),
        );
    }
    if item.requires_follow_up_visit && context.visit_type == VisitType::Initial {
        return Some(
            ValidationMessage::error(format!(
                "{} may only be billed on a follow-up visit",
                item.name
            ))
            .with_codes([item.code.as_str()]),
        );
    }

    if !item.conflicts_with_categories.is_empty() {
        let conflicting = entries
            .iter()
            .filter(|e| e.item_code != item.code)
            .filter_map(|e| catalog.lookup(&e.item_code))
            .any(|other| item.conflicts_with_categories.contains(&other.category));
        if conflicting {
            return Some(
                ValidationMessage::error(format!(
                    "{} cannot be billed when a procedure, test, injection, surgery, \
                     imaging or rehabilitation entry is on the same bill",
                    item.name
                ))
                .with_codes([item.code.as_str()]),
            );
        }
    }

    None
}

/// Messages for mutually exclusive code pairs. Advisory only: neither
/// line is removed and both keep their points.
#[must_use]
pub fn exclusion_messages(entries: &[EntryLine]) -> Vec<ValidationMessage> {
    EXCLUSION_RULES
        .iter()
        .filter(|rule| rule.matches(|code| rules::contains_code(entries, code)))
        .map(|rule| {
            ValidationMessage::new(rule.severity, rule.text).with_codes(rule.related_codes())
        })
        .collect()
}

/// Full validation pass: per-line violations in entry order, then
/// pairwise exclusions. Lines referencing unknown codes yield a warning
/// rather than disappearing silently.
#[must_use]
pub fn validate(
    entries: &[EntryLine],
    context: &EncounterContext,
    catalog: &Catalog,
) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    for line in entries {
        match catalog.lookup(&line.item_code) {
            Some(item) => {
                if let Some(msg) = check_line(item, entries, context, catalog) {
                    messages.push(msg);
                }
            }
            None => {
                tracing::warn!(code = %line.item_code, "entry references unknown catalog code");
                messages.push(
                    ValidationMessage::warning(format!(
                        "Code {} is not in the catalog; the line was skipped",
                        line.item_code
                    ))
                    .with_codes([line.item_code.as_str()]),
                );
            }
        }
    }
    messages.extend(exclusion_messages(entries));
    messages
}
