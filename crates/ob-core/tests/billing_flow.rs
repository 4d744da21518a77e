//! End-to-end billing flow tests.
//!
//! Drives the full pipeline through `Session`: context → base derivation →
//! manual entry → auto-calculate → statement, checking the totals and the
//! message surface a clerk would actually see.

use ob_core::{
    Catalog, CopayRatio, EncounterContext, Provenance, Session, Severity, TimeBand, VisitType,
};

fn session_with(visit_type: VisitType) -> (Catalog, Session) {
    let catalog = Catalog::standard();
    let context = EncounterContext {
        visit_type,
        ..EncounterContext::default()
    };
    let session = Session::new(context, &catalog);
    (catalog, session)
}

fn codes(session: &Session) -> Vec<String> {
    session.entries().iter().map(|e| e.item_code.clone()).collect()
}

/// Initial visit, regular hours, 40 years old, 30% copay. The base
/// derivation alone produces the full statement.
#[test]
fn initial_visit_statement() {
    let (catalog, session) = session_with(VisitType::Initial);

    assert_eq!(codes(&session), vec!["A000", "A003"]);

    let bill = session.bill(&catalog);
    assert_eq!(bill.total_points, 292);
    assert_eq!(bill.total_currency, 2920);
    assert_eq!(bill.patient_charge, 880);
    assert_eq!(bill.insurer_claim, 2040);
    assert!(bill.messages.iter().all(|m| m.severity != Severity::Error));
}

/// Follow-up visit for a three-year-old adds the infant surcharge on top
/// of the ordinary follow-up fees.
#[test]
fn infant_follow_up_statement() {
    let catalog = Catalog::standard();
    let context = EncounterContext {
        patient_age_years: 3,
        ..EncounterContext::default()
    };
    let session = Session::new(context, &catalog);

    assert_eq!(codes(&session), vec!["A001", "A003", "A001-INF"]);

    let bill = session.bill(&catalog);
    assert_eq!(bill.total_points, 114);
}

/// A blood panel entered by hand pulls in the sampling fee and exactly one
/// judgment fee; a second auto-calculate pass changes nothing.
#[test]
fn blood_panel_auto_calculate_and_idempotence() {
    let (catalog, mut session) = session_with(VisitType::Initial);
    session.add_manual_entry("D005", 1);
    session.run_auto_calculate(&catalog);

    let after_first = codes(&session);
    assert!(after_first.contains(&"D-SAIK".to_string()));
    assert!(after_first.contains(&"D-PHKE".to_string()));
    assert_eq!(
        after_first.iter().filter(|c| c.as_str() == "D-SAIK").count(),
        1
    );

    let first_bill = session.bill(&catalog);

    session.run_auto_calculate(&catalog);
    assert_eq!(codes(&session), after_first);

    let second_bill = session.bill(&catalog);
    assert_eq!(first_bill.total_points, second_bill.total_points);
    assert_eq!(first_bill.messages, second_bill.messages);
}

/// The statement totals always reconcile: subtotals sum to the total, and
/// the patient/insurer split partitions the currency amount.
#[test]
fn totals_reconcile_across_a_busy_statement() {
    let (catalog, mut session) = session_with(VisitType::Initial);
    for code in ["D005", "D007-5", "E001-2", "J000"] {
        session.add_manual_entry(code, 1);
    }
    session.run_auto_calculate(&catalog);

    let bill = session.bill(&catalog);
    let subtotal_sum: u64 = bill.category_subtotals.iter().map(|s| s.points).sum();
    assert_eq!(subtotal_sum, bill.total_points);
    assert_eq!(bill.total_currency, bill.total_points * 10);
    assert_eq!(bill.patient_charge + bill.insurer_claim, bill.total_currency);
    assert_eq!(bill.patient_charge % 10, 0);
}

/// Changing the time band after entering items replaces only the derived
/// base lines; manual work is never touched.
#[test]
fn context_change_preserves_manual_entries() {
    let (catalog, mut session) = session_with(VisitType::Initial);
    session.add_manual_entry("J000", 2);
    session.run_auto_calculate(&catalog);

    session.set_time_band(TimeBand::Holiday, &catalog);

    let codes = codes(&session);
    assert!(codes.contains(&"A000-KYUJI".to_string()));
    let dressing = session
        .entries()
        .iter()
        .find(|e| e.item_code == "J000")
        .expect("manual entry survives");
    assert_eq!(dressing.quantity, 2);
    assert_eq!(dressing.provenance, Provenance::Manual);
    assert!(session.advisories().is_empty());
}

/// An initial-only fee on a follow-up statement is excluded from the
/// totals and reported as an error.
#[test]
fn ineligible_fee_is_priced_out_and_reported() {
    let (catalog, mut session) = session_with(VisitType::FollowUp);
    session.add_manual_entry("A000", 1);

    let bill = session.bill(&catalog);
    assert!(bill
        .messages
        .iter()
        .any(|m| m.severity == Severity::Error && m.related_codes.contains(&"A000".to_string())));
    // Only A001 + A003 are priced.
    assert_eq!(bill.total_points, 76);
}

/// Mutually exclusive analgesic procedures raise an error on every bill,
/// with both lines still priced.
#[test]
fn exclusive_pair_is_flagged_on_the_bill() {
    let (catalog, mut session) = session_with(VisitType::FollowUp);
    session.add_manual_entry("J119", 1);
    session.add_manual_entry("J119-2", 1);

    let bill = session.bill(&catalog);
    assert!(bill.messages.iter().any(|m| {
        m.severity == Severity::Error
            && m.related_codes.contains(&"J119".to_string())
            && m.related_codes.contains(&"J119-2".to_string())
    }));
}

/// Exempt patients pay nothing; self-pay patients pay the exact total with
/// no rounding.
#[test]
fn copay_extremes() {
    let catalog = Catalog::standard();

    let exempt = Session::new(
        EncounterContext {
            visit_type: VisitType::Initial,
            copay_ratio: CopayRatio::Exempt,
            ..EncounterContext::default()
        },
        &catalog,
    );
    let bill = exempt.bill(&catalog);
    assert_eq!(bill.patient_charge, 0);
    assert_eq!(bill.insurer_claim, bill.total_currency);

    let self_pay = Session::new(
        EncounterContext {
            visit_type: VisitType::Initial,
            copay_ratio: CopayRatio::Full,
            ..EncounterContext::default()
        },
        &catalog,
    );
    let bill = self_pay.bill(&catalog);
    assert_eq!(bill.patient_charge, bill.total_currency);
    assert_eq!(bill.insurer_claim, 0);
}
