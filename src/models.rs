//! Data models for systems, controllers and panel recommendations

use std::fmt;
use std::ops::{Add, AddAssign, Mul};

/// I/O point class exposed by a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointClass {
    UniversalInput,
    BinaryInput,
    BinaryOutput,
    ConfigurableOutput,
    AnalogOutput,
}

impl PointClass {
    pub const ALL: [PointClass; 5] = [
        PointClass::UniversalInput,
        PointClass::BinaryInput,
        PointClass::BinaryOutput,
        PointClass::ConfigurableOutput,
        PointClass::AnalogOutput,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            PointClass::UniversalInput => "UI",
            PointClass::BinaryInput => "BI",
            PointClass::BinaryOutput => "BO",
            PointClass::ConfigurableOutput => "CO",
            PointClass::AnalogOutput => "AO",
        }
    }
}

impl fmt::Display for PointClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Point counts per class. Used both for demand and for controller capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PointCounts {
    pub ui: u64,
    pub bi: u64,
    pub bo: u64,
    pub co: u64,
    pub ao: u64,
}

impl PointCounts {
    pub const fn new(ui: u64, bi: u64, bo: u64, co: u64, ao: u64) -> Self {
        Self { ui, bi, bo, co, ao }
    }

    pub fn get(&self, class: PointClass) -> u64 {
        match class {
            PointClass::UniversalInput => self.ui,
            PointClass::BinaryInput => self.bi,
            PointClass::BinaryOutput => self.bo,
            PointClass::ConfigurableOutput => self.co,
            PointClass::AnalogOutput => self.ao,
        }
    }

    pub fn get_mut(&mut self, class: PointClass) -> &mut u64 {
        match class {
            PointClass::UniversalInput => &mut self.ui,
            PointClass::BinaryInput => &mut self.bi,
            PointClass::BinaryOutput => &mut self.bo,
            PointClass::ConfigurableOutput => &mut self.co,
            PointClass::AnalogOutput => &mut self.ao,
        }
    }

    pub fn total(&self) -> u64 {
        PointClass::ALL.iter().map(|&c| self.get(c)).sum()
    }

    pub fn is_zero(&self) -> bool {
        self.total() == 0
    }

    /// `self * factor`, or `None` if any class overflows
    pub fn checked_mul(&self, factor: u64) -> Option<Self> {
        let mut out = PointCounts::default();
        for class in PointClass::ALL {
            *out.get_mut(class) = self.get(class).checked_mul(factor)?;
        }
        Some(out)
    }

    /// `self + rhs`, or `None` if any class overflows
    pub fn checked_add(&self, rhs: &PointCounts) -> Option<Self> {
        let mut out = PointCounts::default();
        for class in PointClass::ALL {
            *out.get_mut(class) = self.get(class).checked_add(rhs.get(class))?;
        }
        Some(out)
    }

    /// Iterate `(class, count)` pairs in UI, BI, BO, CO, AO order
    pub fn iter(&self) -> impl Iterator<Item = (PointClass, u64)> + '_ {
        PointClass::ALL.iter().map(|&c| (c, self.get(c)))
    }
}

impl From<[u64; 5]> for PointCounts {
    fn from(p: [u64; 5]) -> Self {
        PointCounts::new(p[0], p[1], p[2], p[3], p[4])
    }
}

impl Add for PointCounts {
    type Output = PointCounts;

    fn add(mut self, rhs: PointCounts) -> PointCounts {
        self += rhs;
        self
    }
}

impl AddAssign for PointCounts {
    fn add_assign(&mut self, rhs: PointCounts) {
        for class in PointClass::ALL {
            *self.get_mut(class) += rhs.get(class);
        }
    }
}

impl Mul<u64> for PointCounts {
    type Output = PointCounts;

    fn mul(mut self, rhs: u64) -> PointCounts {
        for class in PointClass::ALL {
            *self.get_mut(class) *= rhs;
        }
        self
    }
}

impl fmt::Display for PointCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(c, n)| format!("{} {}", c, n)).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Mechanical equipment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemType {
    Ahu,
    Chiller,
    Vav,
}

impl SystemType {
    pub const ALL: [SystemType; 3] = [SystemType::Ahu, SystemType::Chiller, SystemType::Vav];

    pub fn as_str(self) -> &'static str {
        match self {
            SystemType::Ahu => "ahu",
            SystemType::Chiller => "chiller",
            SystemType::Vav => "vav",
        }
    }

    /// Case-insensitive lookup by short name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative tier that selects a system's point profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplexityGrade {
    VerySimple,
    Simple,
    Average,
    Complex,
}

impl ComplexityGrade {
    pub const ALL: [ComplexityGrade; 4] = [
        ComplexityGrade::VerySimple,
        ComplexityGrade::Simple,
        ComplexityGrade::Average,
        ComplexityGrade::Complex,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityGrade::VerySimple => "verySimple",
            ComplexityGrade::Simple => "simple",
            ComplexityGrade::Average => "average",
            ComplexityGrade::Complex => "complex",
        }
    }

    /// Accepts `verySimple`, `very-simple`, `very_simple` in any case
    pub fn from_name(name: &str) -> Option<Self> {
        let folded: String = name
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(&folded))
    }
}

impl fmt::Display for ComplexityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point profile of one system at one complexity grade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemProfile {
    pub system: SystemType,
    pub grade: ComplexityGrade,
    pub hardware_points: u64,
    pub software_points: u64,
    pub object_count: u64,
    pub demand: PointCounts,
}

impl SystemProfile {
    pub fn total_points(&self) -> u64 {
        self.hardware_points.saturating_add(self.software_points)
    }
}

/// One row of caller input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemRequest {
    pub system: SystemType,
    pub grade: ComplexityGrade,
    pub quantity: u32,
}

impl SystemRequest {
    pub fn new(system: SystemType, grade: ComplexityGrade, quantity: u32) -> Self {
        Self {
            system,
            grade,
            quantity,
        }
    }
}

impl fmt::Display for SystemRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {} ({})", self.quantity, self.system, self.grade)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerCategory {
    GeneralPurpose,
    Vav,
    Expansion,
}

impl ControllerCategory {
    pub const ALL: [ControllerCategory; 3] = [
        ControllerCategory::GeneralPurpose,
        ControllerCategory::Vav,
        ControllerCategory::Expansion,
    ];

    /// Stable key used by the catalog database
    pub fn key(self) -> &'static str {
        match self {
            ControllerCategory::GeneralPurpose => "general_purpose",
            ControllerCategory::Vav => "vav",
            ControllerCategory::Expansion => "expansion",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for ControllerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ControllerCategory::GeneralPurpose => "General Purpose",
            ControllerCategory::Vav => "VAV",
            ControllerCategory::Expansion => "Expansion",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSpec {
    pub model: String,
    pub description: Option<String>,
    pub category: ControllerCategory,
    pub capacity: PointCounts,
    /// Empty for expansion modules
    pub supported_systems: Vec<SystemType>,
}

impl ControllerSpec {
    /// Expansion modules only work alongside a base controller
    pub fn requires_base(&self) -> bool {
        self.category == ControllerCategory::Expansion
    }

    pub fn supports(&self, system: SystemType) -> bool {
        self.supported_systems.contains(&system)
    }
}

/// Enclosure size category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelTier {
    pub name: String,
    pub enclosure_size: String,
    pub rating: String,
    pub max_controllers_per_panel: u64,
    /// Largest device count that selects this tier; `None` for the catch-all tier
    pub breakpoint: Option<u64>,
}

/// Supervisory engine tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDeviceTier {
    pub model: String,
    /// Inclusive device-count bound; `None` for the top tier
    pub max_devices: Option<u64>,
}

/// Demand summed over a request set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatedDemand {
    pub points: PointCounts,
    pub hardware_points: u64,
    pub software_points: u64,
    pub object_count: u64,
    /// Sum of request quantities
    pub system_count: u64,
}

impl AggregatedDemand {
    pub fn total_points(&self) -> u64 {
        self.hardware_points.saturating_add(self.software_points)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationEntry {
    pub model: String,
    pub quantity: u64,
    pub category: ControllerCategory,
}

impl fmt::Display for AllocationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {} ({})", self.quantity, self.model, self.category)
    }
}

/// Controllers chosen by the allocator, in VAV, general-purpose, expansion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationResult {
    pub entries: Vec<AllocationEntry>,
    pub warnings: Vec<String>,
}

impl AllocationResult {
    pub fn total_devices(&self) -> u64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn quantity_of(&self, category: ControllerCategory) -> u64 {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.quantity)
            .sum()
    }
}

/// Result of a panel sizing calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub demand: AggregatedDemand,
    pub allocation: AllocationResult,
    pub total_devices: u64,
    pub network_device: NetworkDeviceTier,
    pub panel: PanelTier,
    pub panel_count: u64,
    pub warnings: Vec<String>,
}
