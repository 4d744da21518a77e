//! Shared billing-policy tables.
//!
//! Validation and derivation both read these tables, so the conflict rules
//! and the derivation triggers can never drift apart.

use crate::catalog::Catalog;
use crate::types::{CapabilityTag, Category, EntryLine, Severity, TimeBand, VisitType};

/// Codes referenced by the derivation and validation rules.
pub mod codes {
    pub const INITIAL_CONSULTATION: &str = "A000";
    pub const FOLLOW_UP_CONSULTATION: &str = "A001";
    /// Flat administrative fee, billed on every encounter.
    pub const STATEMENT_ISSUANCE: &str = "A003";
    pub const INFANT_INITIAL: &str = "A000-INF";
    pub const INFANT_FOLLOW_UP: &str = "A001-INF";
    /// Follow-up management fee, only without procedures on the same bill.
    pub const OUTPATIENT_MANAGEMENT: &str = "A001-ADD";
    pub const TRIAGE: &str = "B001-2-5";
    pub const AMBULANCE_MANAGEMENT: &str = "B001-2-6";
    pub const AMBULANCE_NURSING_ADDON: &str = "B001-2-6-2";
    pub const REFERRAL_LETTER: &str = "B009";
    pub const VENOUS_BLOOD_SAMPLING: &str = "D-SAIK";
    pub const JUDGMENT_BIOCHEMISTRY: &str = "D-PHAN";
    pub const JUDGMENT_HEMATOLOGY: &str = "D-PHKE";
    pub const JUDGMENT_IMMUNOLOGY: &str = "D-PHBI";
    pub const JUDGMENT_URINALYSIS: &str = "D-PHNI";
    pub const EMERGENCY_LAB: &str = "D-KINKY";
    pub const PULSE_OXIMETRY: &str = "D223";
    pub const IMAGE_MANAGEMENT_PLAIN: &str = "E-DENP";
    pub const IMAGE_MANAGEMENT_CT_MRI: &str = "E-DENCT";
    pub const TOMOGRAPHY_DIAGNOSIS: &str = "E200-DAN";
    pub const EMERGENCY_IMAGING: &str = "E-KINKY";
    pub const WOUND_DRESSING_SMALL: &str = "J000";
    pub const WOUND_DRESSING_MEDIUM: &str = "J000-2";
    pub const BURN_DRESSING: &str = "J001";
    pub const OXYGEN_INHALATION: &str = "J024";
    pub const ANALGESIC_COMPRESS: &str = "J119";
    pub const ANALGESIC_MASSAGE: &str = "J119-2";
}

/// Patients younger than this get the infant surcharge.
pub const INFANT_AGE_LIMIT: u32 = 6;

/// Categories that conflict with the outpatient management fee.
pub const PROCEDURE_CATEGORIES: &[Category] = &[
    Category::Procedure,
    Category::Laboratory,
    Category::Imaging,
    Category::Injection,
    Category::Surgery,
    Category::Other,
];

/// Time-band surcharge code for a visit type, `None` for regular hours.
#[must_use]
pub const fn time_surcharge_code(visit: VisitType, band: TimeBand) -> Option<&'static str> {
    match (visit, band) {
        (_, TimeBand::Regular) => None,
        (VisitType::Initial, TimeBand::NightEarly) => Some("A000-YAKAN"),
        (VisitType::Initial, TimeBand::OffHours) => Some("A000-JIKAN"),
        (VisitType::Initial, TimeBand::OffHoursSpecial) => Some("A000-TOKUR"),
        (VisitType::Initial, TimeBand::Holiday) => Some("A000-KYUJI"),
        (VisitType::Initial, TimeBand::LateNight) => Some("A000-SHINYA"),
        (VisitType::FollowUp, TimeBand::NightEarly) => Some("A001-YAKAN"),
        (VisitType::FollowUp, TimeBand::OffHours) => Some("A001-JIKAN"),
        (VisitType::FollowUp, TimeBand::OffHoursSpecial) => Some("A001-TOKUR"),
        (VisitType::FollowUp, TimeBand::Holiday) => Some("A001-KYUJI"),
        (VisitType::FollowUp, TimeBand::LateNight) => Some("A001-SHINYA"),
    }
}

/// A static rule on code combinations: fires when every code in `all` is
/// present and, if `any` is non-empty, at least one of those is too.
#[derive(Debug, Clone, Copy)]
pub struct ComboRule {
    pub all: &'static [&'static str],
    pub any: &'static [&'static str],
    pub severity: Severity,
    pub text: &'static str,
}

impl ComboRule {
    /// The codes that triggered the rule, for message attribution.
    #[must_use]
    pub fn related_codes(&self) -> Vec<String> {
        self.all
            .iter()
            .chain(self.any.iter())
            .map(ToString::to_string)
            .collect()
    }

    pub fn matches<F: Fn(&str) -> bool>(&self, has_code: F) -> bool {
        self.all.iter().all(|c| has_code(c))
            && (self.any.is_empty() || self.any.iter().any(|c| has_code(c)))
    }
}

/// Code pairs that must never coexist on one bill. Surfaced as errors by
/// the validation engine; points are kept, removal is left to the caller.
pub const EXCLUSION_RULES: &[ComboRule] = &[
    ComboRule {
        all: &[codes::ANALGESIC_COMPRESS, codes::ANALGESIC_MASSAGE],
        any: &[],
        severity: Severity::Error,
        text: "Analgesic treatment: the compress and the massage/physical-therapy modality \
               cannot both be billed on the same day; keep only one.",
    },
    ComboRule {
        all: &[codes::TRIAGE, codes::AMBULANCE_MANAGEMENT],
        any: &[],
        severity: Severity::Error,
        text: "The in-house triage fee and the night/holiday ambulance management fee cannot \
               be billed together; check the arrival method.",
    },
];

/// Advisory combinations emitted by the contextual derivation pass.
pub const ADVISORY_RULES: &[ComboRule] = &[
    ComboRule {
        all: &[],
        any: &[codes::WOUND_DRESSING_SMALL, codes::WOUND_DRESSING_MEDIUM],
        severity: Severity::Tip,
        text: "Wound dressing: antiseptics, gauze and adhesive bandages are bundled into the \
               dressing fee and cannot be billed separately. Consider wound repair (surgery) \
               when debridement is needed.",
    },
    ComboRule {
        all: &[codes::BURN_DRESSING],
        any: &[],
        severity: Severity::Tip,
        text: "Burn dressing: the first treatment carries a +55 point add-on; petrolatum and \
               gauze are bundled into the fee.",
    },
    ComboRule {
        all: &[codes::PULSE_OXIMETRY, codes::OXYGEN_INHALATION],
        any: &[],
        severity: Severity::Tip,
        text: "Pulse oximetry on a patient receiving oxygen inhalation is bundled into the \
               oxygen fee and cannot be billed separately on the same day.",
    },
    ComboRule {
        all: &[codes::REFERRAL_LETTER],
        any: &[],
        severity: Severity::Tip,
        text: "Referral letter: the test/imaging information supplement (+30 points) may also \
               be billable.",
    },
];

/// True when any line references the given code.
#[must_use]
pub fn contains_code(entries: &[EntryLine], code: &str) -> bool {
    entries.iter().any(|e| e.item_code == code)
}

/// True when any line's catalog entry carries the given tag.
#[must_use]
pub fn contains_tag(entries: &[EntryLine], catalog: &Catalog, tag: CapabilityTag) -> bool {
    entries
        .iter()
        .filter_map(|e| catalog.lookup(&e.item_code))
        .any(|item| item.has_tag(tag))
}

/// True when any line belongs to one of the procedure-conflict categories.
#[must_use]
pub fn contains_procedure_category(entries: &[EntryLine], catalog: &Catalog) -> bool {
    entries
        .iter()
        .filter_map(|e| catalog.lookup(&e.item_code))
        .any(|item| PROCEDURE_CATEGORIES.contains(&item.category))
}
