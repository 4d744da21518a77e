//! Built-in catalog payload.
//!
//! Point values follow the Reiwa-6 revision of the outpatient fee schedule.
//! This is configuration data; all conditional logic lives in `rules`,
//! `derive` and `validate`.

use std::collections::BTreeSet;

use crate::catalog::CatalogEntry;
use crate::rules::PROCEDURE_CATEGORIES;
use crate::types::{AgeBand, CapabilityTag, Category};

fn base(code: &str, name: &str, point_value: u32, category: Category) -> CatalogEntry {
    CatalogEntry {
        code: code.to_string(),
        name: name.to_string(),
        point_value,
        category,
        unit: None,
        note: None,
        requires_initial_visit: false,
        requires_follow_up_visit: false,
        age_band: None,
        capability_tags: BTreeSet::new(),
        conflicts_with_categories: BTreeSet::new(),
        hidden_from_picker: false,
    }
}

fn initial(code: &str, name: &str, point_value: u32) -> CatalogEntry {
    CatalogEntry {
        requires_initial_visit: true,
        hidden_from_picker: true,
        ..base(code, name, point_value, Category::Consultation)
    }
}

fn follow_up(code: &str, name: &str, point_value: u32) -> CatalogEntry {
    CatalogEntry {
        requires_follow_up_visit: true,
        hidden_from_picker: true,
        ..base(code, name, point_value, Category::Consultation)
    }
}

fn lab(code: &str, name: &str, point_value: u32, tags: &[CapabilityTag]) -> CatalogEntry {
    CatalogEntry {
        capability_tags: tags.iter().copied().collect(),
        ..base(code, name, point_value, Category::Laboratory)
    }
}

fn imaging(code: &str, name: &str, point_value: u32, tags: &[CapabilityTag]) -> CatalogEntry {
    CatalogEntry {
        capability_tags: tags.iter().copied().collect(),
        ..base(code, name, point_value, Category::Imaging)
    }
}

fn with_unit(entry: CatalogEntry, unit: &str) -> CatalogEntry {
    CatalogEntry {
        unit: Some(unit.to_string()),
        ..entry
    }
}

fn with_note(entry: CatalogEntry, note: &str) -> CatalogEntry {
    CatalogEntry {
        note: Some(note.to_string()),
        ..entry
    }
}

/// All entries of the built-in catalog.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn standard_entries() -> Vec<CatalogEntry> {
    use CapabilityTag::{
        Biochemistry, BloodPanel, Ct, Hematology, Immunology, Mri, Physiology, Urinalysis, XRay,
    };

    vec![
        // ---- Consultation (.11/.12) ----
        with_note(
            initial("A000", "First consultation", 291),
            "Billed for a patient's first visit, or a new visit after the previous \
             condition was cured. Added automatically.",
        ),
        with_note(
            follow_up("A001", "Follow-up consultation", 75),
            "Billed on the second and later visits. Added automatically.",
        ),
        initial("A000-YAKAN", "Night/early-morning surcharge (initial)", 50),
        initial("A000-JIKAN", "Off-hours surcharge (initial)", 85),
        initial("A000-TOKUR", "Off-hours special surcharge (initial)", 230),
        initial("A000-KYUJI", "Holiday surcharge (initial)", 250),
        initial("A000-SHINYA", "Late-night surcharge (initial)", 480),
        follow_up("A001-YAKAN", "Night/early-morning surcharge (follow-up)", 50),
        follow_up("A001-JIKAN", "Off-hours surcharge (follow-up)", 65),
        follow_up("A001-TOKUR", "Off-hours special surcharge (follow-up)", 180),
        follow_up("A001-KYUJI", "Holiday surcharge (follow-up)", 190),
        follow_up("A001-SHINYA", "Late-night surcharge (follow-up)", 420),
        with_note(
            CatalogEntry {
                requires_follow_up_visit: true,
                conflicts_with_categories: PROCEDURE_CATEGORIES.iter().copied().collect(),
                ..base(
                    "A001-ADD",
                    "Outpatient management surcharge",
                    52,
                    Category::Consultation,
                )
            },
            "Billed on follow-up visits where no procedure, test, injection or \
             rehabilitation was performed.",
        ),
        with_note(
            base("A003", "Statement issuance surcharge", 1, Category::Consultation),
            "Billed automatically on every encounter at facilities that issue \
             itemized statements.",
        ),
        CatalogEntry {
            requires_initial_visit: true,
            age_band: Some(AgeBand::Infant),
            ..base("A000-INF", "Infant surcharge (initial)", 75, Category::Consultation)
        },
        CatalogEntry {
            requires_follow_up_visit: true,
            age_band: Some(AgeBand::Infant),
            ..base("A001-INF", "Infant surcharge (follow-up)", 38, Category::Consultation)
        },
        CatalogEntry {
            requires_follow_up_visit: true,
            ..base(
                "A002",
                "Regional comprehensive care surcharge 1",
                25,
                Category::Consultation,
            )
        },
        with_unit(
            CatalogEntry {
                requires_follow_up_visit: true,
                ..base("A910", "After-hours access surcharge 1", 5, Category::Consultation)
            },
            "once per month",
        ),
        // ---- Medical management (.13) ----
        with_unit(
            with_note(
                base(
                    "B000",
                    "Specific disease counseling fee (clinic)",
                    225,
                    Category::Management,
                ),
                "Treatment-plan counseling for designated chronic diseases. Up to \
                 twice per month; not billable in the month of the initial visit.",
            ),
            "twice per month",
        ),
        with_unit(
            base(
                "B000-3",
                "Specific disease counseling fee (hospital under 200 beds)",
                87,
                Category::Management,
            ),
            "twice per month",
        ),
        with_unit(
            base("B001-2", "Specific drug therapy management fee 1", 470, Category::Management),
            "once per month",
        ),
        with_unit(
            base(
                "B001-3",
                "Malignant tumor marker treatment management fee",
                360,
                Category::Management,
            ),
            "once per month",
        ),
        base(
            "B001-9",
            "Outpatient nutrition counseling fee 1 (first visit)",
            260,
            Category::Management,
        ),
        with_unit(
            base("B001-20", "Diabetes complication management fee", 170, Category::Management),
            "once per month",
        ),
        with_unit(
            base("B001-31", "Drug information provision fee", 10, Category::Management),
            "once per month",
        ),
        with_note(
            base("B001-2-5", "In-house triage fee", 300, Category::Management),
            "Initial walk-in patients triaged at night, on holidays or late at \
             night. Not billable alongside the ambulance management fee.",
        ),
        with_note(
            base(
                "B001-2-6",
                "Night/holiday ambulance medical management fee",
                600,
                Category::Management,
            ),
            "Initial patients brought in by ambulance outside regular hours. Not \
             billable alongside the in-house triage fee.",
        ),
        base(
            "B001-2-6-2",
            "Ambulance nursing staffing add-on 2",
            200,
            Category::Management,
        ),
        with_note(
            base(
                "B009",
                "Medical information provision fee (I)",
                250,
                Category::Management,
            ),
            "Referral letter to another facility. Once per month per destination.",
        ),
        // ---- Home care (.14) ----
        base(
            "C001",
            "Home visit consultation fee (single residence)",
            888,
            Category::HomeCare,
        ),
        base(
            "C001-2",
            "Home visit consultation fee (shared residence)",
            213,
            Category::HomeCare,
        ),
        with_unit(
            base(
                "C101",
                "Home self-injection management fee (complex)",
                1230,
                Category::HomeCare,
            ),
            "once per month",
        ),
        with_unit(
            base(
                "C150",
                "Blood glucose self-monitoring add-on (20+ per month)",
                350,
                Category::HomeCare,
            ),
            "once per month",
        ),
        // ---- Medication (.21-.27) ----
        base(
            "F100",
            "Dispensing fee (in-house, up to 6 drugs)",
            42,
            Category::Medication,
        ),
        base(
            "F400",
            "Prescription fee (external, up to 6 drugs)",
            68,
            Category::Medication,
        ),
        base("F400-G", "Generic-name prescribing surcharge 1", 7, Category::Medication),
        with_unit(
            base("F500", "Dispensing technique base fee", 14, Category::Medication),
            "once per month",
        ),
        // ---- Injection (.31-.34) ----
        base("G000", "Subcutaneous/intramuscular injection", 22, Category::Injection),
        base("G001", "Intravenous injection", 34, Category::Injection),
        base("G004", "IV drip infusion (500 mL or more)", 98, Category::Injection),
        base("G004-2", "IV drip infusion (under 500 mL)", 49, Category::Injection),
        base("G005", "Central venous injection", 140, Category::Injection),
        // ---- Procedure (.40) ----
        base("J000", "Wound dressing (under 100 cm2)", 55, Category::Procedure),
        base("J000-2", "Wound dressing (100 to 500 cm2)", 85, Category::Procedure),
        base("J001", "Burn dressing (under 100 cm2)", 147, Category::Procedure),
        base("J018", "Sputum aspiration", 48, Category::Procedure),
        base("J024", "Oxygen inhalation", 65, Category::Procedure),
        base("J038", "Hemodialysis (under 4 hours)", 1924, Category::Procedure),
        base("J063", "Indwelling catheter placement", 40, Category::Procedure),
        base("J095", "Ear treatment", 27, Category::Procedure),
        with_note(
            base("J119", "Analgesic treatment (compress)", 35, Category::Procedure),
            "Not billable on the same day as the massage/physical-therapy modality.",
        ),
        base(
            "J119-2",
            "Analgesic treatment (massage/physical therapy)",
            35,
            Category::Procedure,
        ),
        // ---- Laboratory (.60) ----
        lab("D000", "Urine qualitative panel", 26, &[Urinalysis]),
        lab("D002", "Urine sediment microscopy", 27, &[Urinalysis]),
        lab("D005", "Complete blood count", 21, &[BloodPanel, Hematology]),
        lab(
            "D005-5",
            "Differential blood count (automated)",
            15,
            &[BloodPanel, Hematology],
        ),
        lab("D006-5", "Prothrombin time", 18, &[BloodPanel, Hematology]),
        lab("D007-5", "AST", 17, &[BloodPanel, Biochemistry]),
        lab("D007-6", "ALT", 17, &[BloodPanel, Biochemistry]),
        lab("D007-18", "Creatinine", 11, &[BloodPanel, Biochemistry]),
        lab("D007-20", "Blood glucose", 11, &[BloodPanel, Biochemistry]),
        lab("D007-21", "HbA1c", 49, &[BloodPanel, Biochemistry]),
        lab("D007-CRP", "C-reactive protein (quantitative)", 16, &[BloodPanel, Biochemistry]),
        lab("D008-TSH", "TSH", 104, &[BloodPanel, Immunology]),
        lab("D023-HBs", "Hepatitis B surface antigen", 29, &[BloodPanel, Immunology]),
        lab("D208", "Electrocardiogram (12-lead)", 130, &[Physiology]),
        lab("D215", "Ultrasound (chest/abdomen)", 530, &[Physiology]),
        lab("D223", "Pulse oximetry", 35, &[Physiology]),
        with_unit(
            lab("D-PHAN", "Laboratory judgment fee (biochemistry)", 144, &[]),
            "once per month",
        ),
        with_unit(
            lab("D-PHKE", "Laboratory judgment fee (hematology)", 125, &[]),
            "once per month",
        ),
        with_unit(
            lab("D-PHBI", "Laboratory judgment fee (immunology)", 144, &[]),
            "once per month",
        ),
        with_unit(
            lab("D-PHNI", "Laboratory judgment fee (urinalysis)", 34, &[]),
            "once per month",
        ),
        lab("D-SAIK", "Venous blood sampling fee", 37, &[]),
        with_note(
            lab("D-KINKY", "Emergency in-house laboratory surcharge", 110, &[]),
            "Urgent in-house testing outside regular hours. Requires the specimen \
             management certification.",
        ),
        // ---- Imaging (.70) ----
        imaging("E001-2", "Plain film interpretation (chest)", 85, &[XRay]),
        imaging("E001-4", "Plain film interpretation (other)", 43, &[XRay]),
        imaging("E002-D", "Digital plain radiography", 68, &[XRay]),
        imaging("E200", "CT scan (16+ detector rows)", 900, &[Ct]),
        imaging("E202", "MRI scan (1.5 to 3 tesla)", 1330, &[Mri]),
        imaging("E200-DAN", "Tomography diagnosis fee", 450, &[]),
        imaging("E-DENP", "Digital image management surcharge (plain film)", 57, &[]),
        imaging("E-DENCT", "Digital image management surcharge (CT/MRI)", 120, &[]),
        with_note(
            imaging("E-KINKY", "Emergency in-house imaging surcharge", 110, &[]),
            "Urgent CT/MRI diagnosis outside regular hours. Requires the image \
             management certification.",
        ),
        // ---- Other (.80) ----
        with_unit(
            base(
                "H001",
                "Cerebrovascular rehabilitation fee (I)",
                245,
                Category::Other,
            ),
            "per 20 min unit",
        ),
        with_unit(
            base(
                "H002",
                "Musculoskeletal rehabilitation fee (I)",
                185,
                Category::Other,
            ),
            "per 20 min unit",
        ),
        base(
            "I002",
            "Outpatient psychotherapy (30 minutes or more)",
            400,
            Category::Other,
        ),
    ]
}
