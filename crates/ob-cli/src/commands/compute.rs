//! Statement computation command.
//!
//! Builds a one-shot session from the command-line context, applies the
//! requested entries and derivation, and prints the itemized statement.

use std::fmt::Write as _;

use anyhow::{Context as _, Result, bail};
use ob_core::{BillingResult, Catalog, EncounterContext, Session};

/// Parses one `--add` argument of the form `CODE` or `CODE:QTY`.
pub fn parse_add(raw: &str) -> Result<(String, u32)> {
    let (code, quantity) = match raw.split_once(':') {
        None => (raw, 1),
        Some((code, qty)) => {
            let quantity: u32 = qty
                .parse()
                .with_context(|| format!("invalid quantity in --add {raw}"))?;
            (code, quantity)
        }
    };
    if code.is_empty() {
        bail!("empty item code in --add {raw}");
    }
    if quantity == 0 {
        bail!("quantity must be at least 1 in --add {raw}");
    }
    Ok((code.to_string(), quantity))
}

/// Runs the compute command and prints the statement to stdout.
pub fn run(
    catalog: &Catalog,
    context: EncounterContext,
    adds: &[String],
    auto: bool,
    json: bool,
) -> Result<()> {
    let mut session = Session::new(context, catalog);
    for raw in adds {
        let (code, quantity) = parse_add(raw)?;
        if catalog.lookup(&code).is_none() {
            tracing::warn!(code = %code, "code not in catalog; line will be flagged");
        }
        session.add_manual_entry(code, quantity);
    }
    if auto {
        session.run_auto_calculate(catalog);
    }

    let result = session.bill(catalog);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", format_statement(session.context(), &result));
    }
    Ok(())
}

/// Formats the human-readable statement output.
pub fn format_statement(context: &EncounterContext, result: &BillingResult) -> String {
    let mut output = String::new();

    writeln!(output, "OUTPATIENT STATEMENT").unwrap();
    writeln!(
        output,
        "{} / {} / {} / age {} / copay {}",
        context.visit_type,
        context.time_band,
        context.arrival_method,
        context.patient_age_years,
        context.copay_ratio
    )
    .unwrap();

    for subtotal in &result.category_subtotals {
        writeln!(output).unwrap();
        writeln!(
            output,
            "{} ({})",
            subtotal.label,
            subtotal.category.code_range()
        )
        .unwrap();
        for line in &subtotal.lines {
            writeln!(
                output,
                "  {:<12} {:<40} x{:<3} {:>6}",
                line.code, line.name, line.quantity, line.points
            )
            .unwrap();
        }
        writeln!(output, "  subtotal {}", subtotal.points).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Total points   {:>8}", result.total_points).unwrap();
    writeln!(output, "Total amount   {:>8} yen", result.total_currency).unwrap();
    writeln!(output, "Patient charge {:>8} yen", result.patient_charge).unwrap();
    writeln!(output, "Insurer claim  {:>8} yen", result.insurer_claim).unwrap();

    if !result.messages.is_empty() {
        writeln!(output).unwrap();
        for message in &result.messages {
            writeln!(output, "[{}] {}", message.severity, message.text).unwrap();
        }
    }

    output
}
