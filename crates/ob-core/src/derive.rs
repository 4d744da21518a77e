//! Two-phase automatic entry derivation.
//!
//! Phase 1 ([`derive_base_entries`]) is a pure function of the encounter
//! context; callers replace previously base-derived lines wholesale before
//! inserting the result. Phase 2 ([`derive_context_entries`]) reads the
//! full current entry set and runs only on explicit request; every add is
//! gated on the code not being present yet, so re-running it is a no-op.

use crate::catalog::Catalog;
use crate::rules::{self, ADVISORY_RULES, INFANT_AGE_LIMIT, codes};
use crate::types::{
    ArrivalMethod, CapabilityTag, EncounterContext, EntryLine, ValidationMessage, VisitType,
};

/// Output of the contextual derivation pass.
#[derive(Debug, Clone, Default)]
pub struct ContextDerivation {
    /// Codes to append, in derivation order, each present at most once.
    pub codes: Vec<String>,
    /// Advisory messages for this pass; replaces any previous list.
    pub messages: Vec<ValidationMessage>,
}

/// Derives the mandatory entries for an encounter context.
///
/// Idempotent and total: the same context always yields the same codes.
/// Codes missing from the catalog are skipped with a warning log.
#[must_use]
pub fn derive_base_entries(context: &EncounterContext, catalog: &Catalog) -> Vec<String> {
    let mut derived: Vec<&'static str> = Vec::new();

    derived.push(match context.visit_type {
        VisitType::Initial => codes::INITIAL_CONSULTATION,
        VisitType::FollowUp => codes::FOLLOW_UP_CONSULTATION,
    });

    if let Some(surcharge) = rules::time_surcharge_code(context.visit_type, context.time_band) {
        derived.push(surcharge);
    }

    derived.push(codes::STATEMENT_ISSUANCE);

    if context.patient_age_years < INFANT_AGE_LIMIT {
        derived.push(match context.visit_type {
            VisitType::Initial => codes::INFANT_INITIAL,
            VisitType::FollowUp => codes::INFANT_FOLLOW_UP,
        });
    }

    // Emergency arrival fees only apply to initial visits outside regular
    // hours; NightEarly does not count as an emergency band.
    if context.visit_type == VisitType::Initial && context.time_band.is_emergency() {
        match context.arrival_method {
            ArrivalMethod::WalkIn => derived.push(codes::TRIAGE),
            ArrivalMethod::Ambulance => {
                derived.push(codes::AMBULANCE_MANAGEMENT);
                derived.push(codes::AMBULANCE_NURSING_ADDON);
            }
            ArrivalMethod::Regular => {}
        }
    }

    derived
        .into_iter()
        .filter(|code| {
            let known = catalog.lookup(code).is_some();
            if !known {
                tracing::warn!(code, "base-derived code missing from catalog, skipped");
            }
            known
        })
        .map(ToString::to_string)
        .collect()
}

/// Derives auxiliary entries from the already-present entry set.
#[must_use]
pub fn derive_context_entries(
    entries: &[EntryLine],
    context: &EncounterContext,
    catalog: &Catalog,
) -> ContextDerivation {
    let mut out = ContextDerivation::default();

    let add = |out: &mut ContextDerivation, code: &str| -> bool {
        if rules::contains_code(entries, code) || out.codes.iter().any(|c| c == code) {
            return false;
        }
        if catalog.lookup(code).is_none() {
            tracing::warn!(code, "context-derived code missing from catalog, skipped");
            return false;
        }
        out.codes.push(code.to_string());
        true
    };

    // Outpatient management fee: follow-up visits with nothing but
    // consultation and management entries. The opposite case (fee present
    // alongside a procedure) is reported by the validation engine.
    if context.visit_type == VisitType::FollowUp
        && !rules::contains_procedure_category(entries, catalog)
        && add(&mut out, codes::OUTPATIENT_MANAGEMENT)
    {
        out.messages.push(ValidationMessage::info(
            "No procedure or test recorded: added the outpatient management surcharge \
             (52 points). Remove it if a procedure, test or injection is added later.",
        ));
    }

    // Specimen collection and judgment fees.
    if rules::contains_tag(entries, catalog, CapabilityTag::BloodPanel) {
        add(&mut out, codes::VENOUS_BLOOD_SAMPLING);
    }
    for (tag, judgment) in [
        (CapabilityTag::Biochemistry, codes::JUDGMENT_BIOCHEMISTRY),
        (CapabilityTag::Hematology, codes::JUDGMENT_HEMATOLOGY),
        (CapabilityTag::Immunology, codes::JUDGMENT_IMMUNOLOGY),
        (CapabilityTag::Urinalysis, codes::JUDGMENT_URINALYSIS),
    ] {
        if rules::contains_tag(entries, catalog, tag) {
            add(&mut out, judgment);
        }
    }

    // Imaging surcharges.
    let has_xray = rules::contains_tag(entries, catalog, CapabilityTag::XRay);
    let has_tomography = rules::contains_tag(entries, catalog, CapabilityTag::Ct)
        || rules::contains_tag(entries, catalog, CapabilityTag::Mri);
    if has_xray {
        add(&mut out, codes::IMAGE_MANAGEMENT_PLAIN);
    }
    if has_tomography {
        add(&mut out, codes::TOMOGRAPHY_DIAGNOSIS);
        add(&mut out, codes::IMAGE_MANAGEMENT_CT_MRI);
        if context.time_band.is_emergency() && add(&mut out, codes::EMERGENCY_IMAGING) {
            out.messages.push(ValidationMessage::info(
                "Off-hours CT/MRI: added the emergency in-house imaging surcharge \
                 (110 points). Only facilities with the image management certification \
                 may bill it.",
            ));
        }
    }

    // Emergency in-house lab work.
    let has_specimen = rules::contains_tag(entries, catalog, CapabilityTag::BloodPanel)
        || rules::contains_tag(entries, catalog, CapabilityTag::Urinalysis);
    if has_specimen
        && context.time_band.is_emergency()
        && add(&mut out, codes::EMERGENCY_LAB)
    {
        out.messages.push(ValidationMessage::info(
            "Off-hours specimen testing: added the emergency in-house laboratory \
             surcharge (110 points). Only facilities with the specimen management \
             certification may bill it.",
        ));
    }

    // Static advisory combinations.
    for rule in ADVISORY_RULES {
        if rule.matches(|code| rules::contains_code(entries, code)) {
            out.messages.push(
                ValidationMessage::new(rule.severity, rule.text).with_codes(rule.related_codes()),
            );
        }
    }

    tracing::debug!(
        derived = out.codes.len(),
        messages = out.messages.len(),
        "contextual derivation pass complete"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CopayRatio, Provenance, Severity, TimeBand};

    fn context(visit: VisitType, band: TimeBand, arrival: ArrivalMethod) -> EncounterContext {
        EncounterContext {
            visit_type: visit,
            time_band: band,
            arrival_method: arrival,
            patient_age_years: 40,
            copay_ratio: CopayRatio::ThirtyPercent,
        }
    }

    fn lines(codes: &[&str]) -> Vec<EntryLine> {
        codes
            .iter()
            .enumerate()
            .map(|(i, code)| EntryLine {
                id: i as u64 + 1,
                item_code: (*code).to_string(),
                quantity: 1,
                provenance: Provenance::Manual,
            })
            .collect()
    }

    #[test]
    fn base_initial_regular_yields_consultation_and_statement_fee() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Regular);
        let derived = derive_base_entries(&ctx, &catalog);
        assert_eq!(derived, vec!["A000", "A003"]);
    }

    #[test]
    fn base_infant_follow_up_adds_surcharge_not_replacement() {
        let catalog = Catalog::standard();
        let mut ctx = context(VisitType::FollowUp, TimeBand::Regular, ArrivalMethod::Regular);
        ctx.patient_age_years = 3;
        let derived = derive_base_entries(&ctx, &catalog);
        assert_eq!(derived, vec!["A001", "A003", "A001-INF"]);
    }

    #[test]
    fn base_surcharge_follows_time_band() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::FollowUp, TimeBand::LateNight, ArrivalMethod::Regular);
        let derived = derive_base_entries(&ctx, &catalog);
        assert_eq!(derived, vec!["A001", "A001-SHINYA", "A003"]);
    }

    #[test]
    fn base_walk_in_emergency_adds_triage() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Holiday, ArrivalMethod::WalkIn);
        let derived = derive_base_entries(&ctx, &catalog);
        assert!(derived.contains(&"B001-2-5".to_string()));
    }

    #[test]
    fn base_ambulance_emergency_adds_management_and_nursing_addon() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::LateNight, ArrivalMethod::Ambulance);
        let derived = derive_base_entries(&ctx, &catalog);
        assert!(derived.contains(&"B001-2-6".to_string()));
        assert!(derived.contains(&"B001-2-6-2".to_string()));
    }

    #[test]
    fn base_emergency_fees_need_all_three_conditions() {
        let catalog = Catalog::standard();

        // Off-hours ambulance follow-up: no emergency fee.
        let follow_up = context(VisitType::FollowUp, TimeBand::Holiday, ArrivalMethod::Ambulance);
        assert!(!derive_base_entries(&follow_up, &catalog)
            .iter()
            .any(|c| c.starts_with("B001-2-6")));

        // Regular-hours ambulance initial: no emergency fee.
        let regular = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Ambulance);
        assert!(!derive_base_entries(&regular, &catalog)
            .iter()
            .any(|c| c.starts_with("B001-2-6")));

        // Night-early is a surcharge band but not an emergency band.
        let night_early =
            context(VisitType::Initial, TimeBand::NightEarly, ArrivalMethod::WalkIn);
        assert!(!derive_base_entries(&night_early, &catalog)
            .iter()
            .any(|c| c == "B001-2-5"));
    }

    #[test]
    fn base_is_idempotent() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Holiday, ArrivalMethod::Ambulance);
        assert_eq!(
            derive_base_entries(&ctx, &catalog),
            derive_base_entries(&ctx, &catalog)
        );
    }

    #[test]
    fn follow_up_without_procedures_gets_management_fee() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::FollowUp, TimeBand::Regular, ArrivalMethod::Regular);
        let entries = lines(&["A001", "A003"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        assert!(out.codes.contains(&"A001-ADD".to_string()));
        assert!(out
            .messages
            .iter()
            .any(|m| m.severity == Severity::Info && m.text.contains("outpatient management")));
    }

    #[test]
    fn procedures_suppress_the_management_fee() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::FollowUp, TimeBand::Regular, ArrivalMethod::Regular);
        let entries = lines(&["A001", "A003", "J000"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        assert!(!out.codes.contains(&"A001-ADD".to_string()));
    }

    #[test]
    fn blood_panel_triggers_sampling_and_judgment_fees() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Regular);
        let entries = lines(&["A000", "A003", "D005"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        assert!(out.codes.contains(&"D-SAIK".to_string()));
        assert!(out.codes.contains(&"D-PHKE".to_string()));
        // CBC is hematology, not biochemistry.
        assert!(!out.codes.contains(&"D-PHAN".to_string()));
    }

    #[test]
    fn each_discipline_judgment_fee_added_once() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Regular);
        // Two biochemistry tests, two hematology tests, one urinalysis.
        let entries = lines(&["D007-5", "D007-6", "D005", "D006-5", "D000"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        let count = |code: &str| out.codes.iter().filter(|c| *c == code).count();
        assert_eq!(count("D-SAIK"), 1);
        assert_eq!(count("D-PHAN"), 1);
        assert_eq!(count("D-PHKE"), 1);
        assert_eq!(count("D-PHNI"), 1);
    }

    #[test]
    fn xray_and_tomography_triggers_are_independent() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Regular);

        let xray = lines(&["E001-2"]);
        let out = derive_context_entries(&xray, &ctx, &catalog);
        assert!(out.codes.contains(&"E-DENP".to_string()));
        assert!(!out.codes.contains(&"E200-DAN".to_string()));

        let ct = lines(&["E200"]);
        let out = derive_context_entries(&ct, &ctx, &catalog);
        assert!(out.codes.contains(&"E200-DAN".to_string()));
        assert!(out.codes.contains(&"E-DENCT".to_string()));
        assert!(!out.codes.contains(&"E-KINKY".to_string()));

        // MRI triggers the same pair as CT.
        let mri = lines(&["E202"]);
        let out = derive_context_entries(&mri, &ctx, &catalog);
        assert!(out.codes.contains(&"E200-DAN".to_string()));
        assert!(out.codes.contains(&"E-DENCT".to_string()));
    }

    #[test]
    fn emergency_band_adds_in_house_surcharges_with_notes() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::LateNight, ArrivalMethod::WalkIn);
        let entries = lines(&["E200", "D005"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        assert!(out.codes.contains(&"E-KINKY".to_string()));
        assert!(out.codes.contains(&"D-KINKY".to_string()));
        let infos = out
            .messages
            .iter()
            .filter(|m| m.severity == Severity::Info)
            .count();
        assert_eq!(infos, 2);
    }

    #[test]
    fn context_pass_is_gated_on_presence() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Regular);
        let entries = lines(&["D005", "D-SAIK", "D-PHKE"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        assert!(out.codes.is_empty());
    }

    #[test]
    fn advisory_combo_messages_fire_without_adding_codes() {
        let catalog = Catalog::standard();
        let ctx = context(VisitType::Initial, TimeBand::Regular, ArrivalMethod::Regular);
        let entries = lines(&["D223", "J024"]);
        let out = derive_context_entries(&entries, &ctx, &catalog);
        assert!(out
            .messages
            .iter()
            .any(|m| m.severity == Severity::Tip && m.text.contains("Pulse oximetry")));
    }
}
