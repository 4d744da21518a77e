//! Monetary aggregation.
//!
//! Recomputes the whole statement from scratch on every call; there is no
//! cached incremental state. All arithmetic is on unsigned integers, with
//! round-half-up only at the final copay multiplication.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{Category, CopayRatio, EncounterContext, EntryLine, ValidationMessage};
use crate::validate;

/// Fixed conversion rate from points to currency units (yen).
pub const POINT_TO_CURRENCY_RATE: u64 = 10;

/// One display line within a category subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtotalLine {
    pub code: String,
    pub name: String,
    /// Line total: item points times quantity.
    pub points: u64,
    pub quantity: u32,
}

/// Point subtotal of one billing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySubtotal {
    pub category: Category,
    pub label: String,
    pub points: u64,
    pub lines: Vec<SubtotalLine>,
}

/// The complete computed statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingResult {
    /// In fixed category order; empty categories omitted.
    pub category_subtotals: Vec<CategorySubtotal>,
    pub total_points: u64,
    pub total_currency: u64,
    pub patient_charge: u64,
    pub insurer_claim: u64,
    pub messages: Vec<ValidationMessage>,
}

/// Patient share of the total, rounded half-up to the nearest 10 currency
/// units. Self-pay is exact with no rounding.
#[must_use]
pub const fn patient_share(total_currency: u64, ratio: CopayRatio) -> u64 {
    match ratio {
        CopayRatio::Full => total_currency,
        _ => (total_currency * ratio.as_tenths() + 50) / 100 * 10,
    }
}

/// Computes the itemized statement for the given entries and context.
///
/// Always completes: invalid lines contribute zero points and are
/// reported through the message list instead of failing the computation.
#[must_use]
pub fn compute_bill(
    entries: &[EntryLine],
    context: &EncounterContext,
    catalog: &Catalog,
) -> BillingResult {
    let messages = validate::validate(entries, context, catalog);

    let mut category_subtotals = Vec::new();
    for category in Category::ORDER {
        let mut subtotal = CategorySubtotal {
            category,
            label: category.label().to_string(),
            points: 0,
            lines: Vec::new(),
        };
        for line in entries {
            let Some(item) = catalog.lookup(&line.item_code) else {
                continue;
            };
            if item.category != category {
                continue;
            }
            if validate::check_line(item, entries, context, catalog).is_some() {
                continue;
            }
            let line_points = u64::from(item.point_value) * u64::from(line.quantity);
            subtotal.points += line_points;
            subtotal.lines.push(SubtotalLine {
                code: item.code.clone(),
                name: item.name.clone(),
                points: line_points,
                quantity: line.quantity,
            });
        }
        if !subtotal.lines.is_empty() {
            category_subtotals.push(subtotal);
        }
    }

    let total_points: u64 = category_subtotals.iter().map(|s| s.points).sum();
    let total_currency = total_points * POINT_TO_CURRENCY_RATE;
    let patient_charge = patient_share(total_currency, context.copay_ratio);
    let insurer_claim = total_currency - patient_charge;

    tracing::debug!(total_points, total_currency, patient_charge, "bill computed");

    BillingResult {
        category_subtotals,
        total_points,
        total_currency,
        patient_charge,
        insurer_claim,
        messages,
    }
}
