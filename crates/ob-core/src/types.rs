//! Core type definitions for the billing engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient ages above this value are clamped when stored in a context.
pub const MAX_PATIENT_AGE: u32 = 120;

/// Billing category of a catalog entry.
///
/// The variant order is the fixed display order used for statement
/// subtotals; `Category::ORDER` makes that order iterable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Consultation,
    Management,
    HomeCare,
    Medication,
    Injection,
    Procedure,
    Surgery,
    Laboratory,
    Imaging,
    Other,
}

impl Category {
    /// All categories in statement display order.
    pub const ORDER: [Self; 10] = [
        Self::Consultation,
        Self::Management,
        Self::HomeCare,
        Self::Medication,
        Self::Injection,
        Self::Procedure,
        Self::Surgery,
        Self::Laboratory,
        Self::Imaging,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Consultation => "consultation",
            Self::Management => "management",
            Self::HomeCare => "home_care",
            Self::Medication => "medication",
            Self::Injection => "injection",
            Self::Procedure => "procedure",
            Self::Surgery => "surgery",
            Self::Laboratory => "laboratory",
            Self::Imaging => "imaging",
            Self::Other => "other",
        }
    }

    /// Human-readable statement section heading.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Consultation => "Consultation",
            Self::Management => "Medical management",
            Self::HomeCare => "Home care",
            Self::Medication => "Medication",
            Self::Injection => "Injection",
            Self::Procedure => "Procedure",
            Self::Surgery => "Surgery",
            Self::Laboratory => "Laboratory",
            Self::Imaging => "Imaging",
            Self::Other => "Other",
        }
    }

    /// Section code range printed next to the heading on statements.
    #[must_use]
    pub const fn code_range(&self) -> &'static str {
        match self {
            Self::Consultation => ".11/.12",
            Self::Management => ".13",
            Self::HomeCare => ".14",
            Self::Medication => ".21-.27",
            Self::Injection => ".31-.34",
            Self::Procedure => ".40",
            Self::Surgery => ".50",
            Self::Laboratory => ".60",
            Self::Imaging => ".70",
            Self::Other => ".80",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "consultation" => Ok(Self::Consultation),
            "management" => Ok(Self::Management),
            "home_care" => Ok(Self::HomeCare),
            "medication" => Ok(Self::Medication),
            "injection" => Ok(Self::Injection),
            "procedure" => Ok(Self::Procedure),
            "surgery" => Ok(Self::Surgery),
            "laboratory" => Ok(Self::Laboratory),
            "imaging" => Ok(Self::Imaging),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// Capability marker attached to catalog entries.
///
/// A closed set rather than free-form strings so the derivation rules can
/// match on it exhaustively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTag {
    /// Any test performed on a venous blood sample.
    BloodPanel,
    Biochemistry,
    Hematology,
    Immunology,
    Urinalysis,
    /// Physiological tests (ECG, ultrasound, oximetry); no sampling fee.
    Physiology,
    XRay,
    Ct,
    Mri,
}

impl CapabilityTag {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BloodPanel => "blood_panel",
            Self::Biochemistry => "biochemistry",
            Self::Hematology => "hematology",
            Self::Immunology => "immunology",
            Self::Urinalysis => "urinalysis",
            Self::Physiology => "physiology",
            Self::XRay => "x_ray",
            Self::Ct => "ct",
            Self::Mri => "mri",
        }
    }
}

impl fmt::Display for CapabilityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CapabilityTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "blood_panel" => Ok(Self::BloodPanel),
            "biochemistry" => Ok(Self::Biochemistry),
            "hematology" => Ok(Self::Hematology),
            "immunology" => Ok(Self::Immunology),
            "urinalysis" => Ok(Self::Urinalysis),
            "physiology" => Ok(Self::Physiology),
            "x_ray" | "xray" => Ok(Self::XRay),
            "ct" => Ok(Self::Ct),
            "mri" => Ok(Self::Mri),
            _ => Err(format!("invalid capability tag: {s}")),
        }
    }
}

/// Age-band eligibility note on a catalog entry.
///
/// Informational only; the infant derivation rule works from the numeric
/// age in the encounter context, not from this field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    /// Under 6 years.
    Infant,
    Preschool,
    Child,
    Elderly,
}

/// Whether the encounter is a first or a repeat visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisitType {
    Initial,
    #[default]
    FollowUp,
}

impl VisitType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::FollowUp => "follow_up",
        }
    }
}

impl fmt::Display for VisitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VisitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "initial" => Ok(Self::Initial),
            "follow_up" => Ok(Self::FollowUp),
            _ => Err(format!("invalid visit type: {s}")),
        }
    }
}

/// Time-of-day band of the encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    #[default]
    Regular,
    NightEarly,
    OffHours,
    OffHoursSpecial,
    Holiday,
    LateNight,
}

impl TimeBand {
    /// Bands treated as outside regular hours by the emergency rules.
    ///
    /// `NightEarly` is a surcharge band but not an emergency band.
    #[must_use]
    pub const fn is_emergency(&self) -> bool {
        matches!(
            self,
            Self::OffHours | Self::OffHoursSpecial | Self::Holiday | Self::LateNight
        )
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::NightEarly => "night_early",
            Self::OffHours => "off_hours",
            Self::OffHoursSpecial => "off_hours_special",
            Self::Holiday => "holiday",
            Self::LateNight => "late_night",
        }
    }
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "regular" => Ok(Self::Regular),
            "night_early" => Ok(Self::NightEarly),
            "off_hours" => Ok(Self::OffHours),
            "off_hours_special" => Ok(Self::OffHoursSpecial),
            "holiday" => Ok(Self::Holiday),
            "late_night" => Ok(Self::LateNight),
            _ => Err(format!("invalid time band: {s}")),
        }
    }
}

/// How the patient arrived at the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalMethod {
    #[default]
    Regular,
    WalkIn,
    Ambulance,
}

impl ArrivalMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::WalkIn => "walk_in",
            Self::Ambulance => "ambulance",
        }
    }
}

impl fmt::Display for ArrivalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArrivalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "regular" => Ok(Self::Regular),
            "walk_in" => Ok(Self::WalkIn),
            "ambulance" => Ok(Self::Ambulance),
            _ => Err(format!("invalid arrival method: {s}")),
        }
    }
}

/// Fraction of the billed amount charged directly to the patient.
///
/// A closed set aligned with the public insurance tiers; `Full` means
/// self-pay (no insurer claim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CopayRatio {
    Exempt,
    TenPercent,
    TwentyPercent,
    #[default]
    ThirtyPercent,
    Full,
}

impl CopayRatio {
    /// The ratio expressed in tenths, for integer-safe arithmetic.
    #[must_use]
    pub const fn as_tenths(&self) -> u64 {
        match self {
            Self::Exempt => 0,
            Self::TenPercent => 1,
            Self::TwentyPercent => 2,
            Self::ThirtyPercent => 3,
            Self::Full => 10,
        }
    }

    #[must_use]
    pub const fn as_percent(&self) -> u8 {
        match self {
            Self::Exempt => 0,
            Self::TenPercent => 10,
            Self::TwentyPercent => 20,
            Self::ThirtyPercent => 30,
            Self::Full => 100,
        }
    }
}

impl fmt::Display for CopayRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

impl std::str::FromStr for CopayRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches('%') {
            "0" => Ok(Self::Exempt),
            "10" => Ok(Self::TenPercent),
            "20" => Ok(Self::TwentyPercent),
            "30" => Ok(Self::ThirtyPercent),
            "100" => Ok(Self::Full),
            _ => Err(format!("invalid copay ratio: {s} (expected 0/10/20/30/100)")),
        }
    }
}

/// Everything about the encounter that derivation and validation read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterContext {
    pub visit_type: VisitType,
    pub time_band: TimeBand,
    pub arrival_method: ArrivalMethod,
    pub patient_age_years: u32,
    pub copay_ratio: CopayRatio,
}

impl Default for EncounterContext {
    fn default() -> Self {
        Self {
            visit_type: VisitType::FollowUp,
            time_band: TimeBand::Regular,
            arrival_method: ArrivalMethod::Regular,
            patient_age_years: 40,
            copay_ratio: CopayRatio::ThirtyPercent,
        }
    }
}

impl EncounterContext {
    /// Clamps an age to the supported range before storing it.
    #[must_use]
    pub const fn clamp_age(years: u32) -> u32 {
        if years > MAX_PATIENT_AGE {
            MAX_PATIENT_AGE
        } else {
            years
        }
    }
}

/// Where an entry line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Chosen by the user in the picker.
    Manual,
    /// Derived from the encounter context alone.
    AutoBase,
    /// Derived from the current entry set on explicit request.
    AutoContext,
}

impl Provenance {
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::AutoBase | Self::AutoContext)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::AutoBase => "auto_base",
            Self::AutoContext => "auto_context",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One billed line in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryLine {
    /// Unique within the owning session.
    pub id: u64,
    /// References a `CatalogEntry` by code.
    pub item_code: String,
    pub quantity: u32,
    pub provenance: Provenance,
}

/// Severity of a validation or advisory message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Tip,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Tip => "tip",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message surfaced alongside a billing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub severity: Severity,
    pub text: String,
    /// Codes the message refers to, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_codes: Vec<String>,
}

impl ValidationMessage {
    #[must_use]
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            related_codes: Vec::new(),
        }
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Severity::Error, text)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Severity::Warning, text)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Severity::Info, text)
    }

    #[must_use]
    pub fn tip(text: impl Into<String>) -> Self {
        Self::new(Severity::Tip, text)
    }

    /// Attaches the codes the message refers to.
    #[must_use]
    pub fn with_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_codes = codes.into_iter().map(Into::into).collect();
        self
    }
}
