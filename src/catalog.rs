//! Reference tables: system point profiles, controller capacities and
//! panel / supervisory device tiers.
//!
//! A [`Catalog`] is an immutable value. Every calculation borrows one, so an
//! alternate catalog (for example one loaded from the catalog database) can be
//! substituted without touching the allocation logic.

use std::collections::HashSet;

use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{
    ComplexityGrade, ControllerCategory, ControllerSpec, NetworkDeviceTier, PanelTier,
    PointCounts, SystemProfile, SystemType,
};

use ComplexityGrade::{Average, Complex, Simple, VerySimple};
use SystemType::{Ahu, Chiller, Vav};

/// (system, grade, hardware, software, objects, [UI, BI, BO, CO, AO])
type ProfileRow = (SystemType, ComplexityGrade, u64, u64, u64, [u64; 5]);

const BUILTIN_PROFILES: [ProfileRow; 11] = [
    (Ahu, VerySimple, 6, 5, 25, [2, 1, 1, 1, 1]),
    (Ahu, Simple, 12, 10, 49, [4, 2, 2, 2, 2]),
    (Ahu, Average, 21, 15, 80, [8, 3, 4, 3, 3]),
    (Ahu, Complex, 30, 20, 110, [12, 4, 6, 4, 4]),
    (Chiller, VerySimple, 5, 10, 33, [2, 1, 1, 1, 0]),
    (Chiller, Simple, 14, 20, 75, [5, 3, 3, 2, 1]),
    (Chiller, Average, 32, 30, 137, [12, 6, 7, 4, 3]),
    (Chiller, Complex, 48, 40, 194, [18, 9, 10, 6, 5]),
    // VAV boxes have no verySimple grade
    (Vav, Simple, 2, 5, 16, [1, 0, 0, 1, 0]),
    (Vav, Average, 4, 10, 31, [2, 0, 1, 1, 0]),
    (Vav, Complex, 7, 15, 49, [3, 1, 1, 2, 0]),
];

/// (name, enclosure, max controllers per panel, breakpoint)
const BUILTIN_PANEL_TIERS: [(&str, &str, u64, Option<u64>); 6] = [
    ("smallest", "20x16", 1, Some(1)),
    ("small", "24x20", 2, Some(2)),
    // Shares the small breakpoint, so the ladder never lands here
    ("medium", "30x24", 3, Some(2)),
    ("mediumLarge", "36x24", 4, Some(4)),
    ("large", "36x30", 6, Some(6)),
    ("largest", "48x36", 12, None),
];

const BUILTIN_NETWORK_TIERS: [(&str, Option<u64>); 3] = [
    ("SNE10500", Some(60)),
    ("SNE11000", Some(150)),
    ("SNE22000", None),
];

pub const DEFAULT_ENCLOSURE_RATING: &str = "NEMA 1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    profiles: Vec<SystemProfile>,
    controllers: Vec<ControllerSpec>,
    panel_tiers: Vec<PanelTier>,
    network_tiers: Vec<NetworkDeviceTier>,
}

impl Catalog {
    /// Build a catalog from its tables, checking the invariants the
    /// allocator and sizer rely on.
    pub fn new(
        profiles: Vec<SystemProfile>,
        controllers: Vec<ControllerSpec>,
        panel_tiers: Vec<PanelTier>,
        network_tiers: Vec<NetworkDeviceTier>,
    ) -> AdvisorResult<Self> {
        let mut seen = HashSet::new();
        for p in &profiles {
            if !seen.insert((p.system, p.grade)) {
                return Err(invalid(format!(
                    "duplicate profile for {} / {}",
                    p.system, p.grade
                )));
            }
        }

        // Lookups by model ignore case, so duplicates must too
        let mut models = HashSet::new();
        for c in &controllers {
            if !models.insert(c.model.to_ascii_lowercase()) {
                return Err(invalid(format!("duplicate controller model {}", c.model)));
            }
            if c.requires_base() && !c.supported_systems.is_empty() {
                return Err(invalid(format!(
                    "expansion module {} cannot list supported systems",
                    c.model
                )));
            }
            if !c.requires_base() && c.supported_systems.is_empty() {
                return Err(invalid(format!(
                    "controller {} lists no supported systems",
                    c.model
                )));
            }
        }
        for category in ControllerCategory::ALL {
            if !controllers.iter().any(|c| c.category == category) {
                return Err(invalid(format!("no {} controller", category)));
            }
        }

        let Some((_, leading)) = panel_tiers.split_last() else {
            return Err(invalid("no panel tiers".to_string()));
        };
        if let Some(tier) = leading.iter().find(|t| t.breakpoint.is_none()) {
            return Err(invalid(format!(
                "only the last panel tier may be a catch-all, not {}",
                tier.name
            )));
        }
        let mut previous = None;
        for tier in &panel_tiers {
            let Some(bound) = tier.breakpoint else {
                continue;
            };
            if previous.is_some_and(|p| bound < p) {
                return Err(invalid(format!(
                    "panel tier {} breakpoint must not decrease",
                    tier.name
                )));
            }
            if bound > tier.max_controllers_per_panel {
                return Err(invalid(format!(
                    "panel tier {} breakpoint {} exceeds its {} controllers per panel",
                    tier.name, bound, tier.max_controllers_per_panel
                )));
            }
            previous = Some(bound);
        }
        for pair in panel_tiers.windows(2) {
            if pair[1].max_controllers_per_panel <= pair[0].max_controllers_per_panel {
                return Err(invalid(format!(
                    "panel tier {} must hold more controllers than {}",
                    pair[1].name, pair[0].name
                )));
            }
        }
        if panel_tiers.iter().any(|t| t.max_controllers_per_panel == 0) {
            return Err(invalid("panel tier with zero capacity".to_string()));
        }

        match network_tiers.split_last() {
            None => return Err(invalid("no network device tiers".to_string())),
            Some((last, rest)) => {
                if last.max_devices.is_some() {
                    return Err(invalid(format!(
                        "top network tier {} must be unbounded",
                        last.model
                    )));
                }
                let mut previous = None;
                for tier in rest {
                    let Some(bound) = tier.max_devices else {
                        return Err(invalid(format!(
                            "only the top network tier may be unbounded, not {}",
                            tier.model
                        )));
                    };
                    if previous.is_some_and(|p| bound <= p) {
                        return Err(invalid(format!(
                            "network tier {} bound must increase",
                            tier.model
                        )));
                    }
                    previous = Some(bound);
                }
            }
        }

        Ok(Self {
            profiles,
            controllers,
            panel_tiers,
            network_tiers,
        })
    }

    /// The reference catalog shipped with the advisor
    pub fn builtin() -> Self {
        let profiles = BUILTIN_PROFILES
            .iter()
            .map(|&(system, grade, hw, sw, objects, demand)| SystemProfile {
                system,
                grade,
                hardware_points: hw,
                software_points: sw,
                object_count: objects,
                demand: demand.into(),
            })
            .collect();

        let controllers = vec![
            ControllerSpec {
                model: "CGM09090".to_string(),
                description: Some("General purpose field controller".to_string()),
                category: ControllerCategory::GeneralPurpose,
                capacity: PointCounts::new(7, 2, 3, 4, 2),
                supported_systems: vec![Ahu, Chiller],
            },
            ControllerSpec {
                model: "VMA1930".to_string(),
                description: Some("VAV box controller".to_string()),
                category: ControllerCategory::Vav,
                capacity: PointCounts::new(3, 1, 1, 2, 0),
                supported_systems: vec![Vav],
            },
            ControllerSpec {
                model: "XPM09090".to_string(),
                description: Some("I/O expansion module".to_string()),
                category: ControllerCategory::Expansion,
                capacity: PointCounts::new(4, 4, 4, 4, 2),
                supported_systems: Vec::new(),
            },
        ];

        let panel_tiers = BUILTIN_PANEL_TIERS
            .iter()
            .map(|&(name, enclosure, max, breakpoint)| PanelTier {
                name: name.to_string(),
                enclosure_size: enclosure.to_string(),
                rating: DEFAULT_ENCLOSURE_RATING.to_string(),
                max_controllers_per_panel: max,
                breakpoint,
            })
            .collect();

        let network_tiers = BUILTIN_NETWORK_TIERS
            .iter()
            .map(|&(model, max_devices)| NetworkDeviceTier {
                model: model.to_string(),
                max_devices,
            })
            .collect();

        Self {
            profiles,
            controllers,
            panel_tiers,
            network_tiers,
        }
    }

    pub fn profile_for(
        &self,
        system: SystemType,
        grade: ComplexityGrade,
    ) -> AdvisorResult<&SystemProfile> {
        self.profiles
            .iter()
            .find(|p| p.system == system && p.grade == grade)
            .ok_or_else(|| AdvisorError::UnknownSystemConfiguration {
                system: system.to_string(),
                grade: grade.to_string(),
            })
    }

    /// Grades defined for a system type, in catalog order
    pub fn grades_for(&self, system: SystemType) -> Vec<ComplexityGrade> {
        self.profiles
            .iter()
            .filter(|p| p.system == system)
            .map(|p| p.grade)
            .collect()
    }

    pub fn controller_spec(&self, model: &str) -> AdvisorResult<&ControllerSpec> {
        self.controllers
            .iter()
            .find(|c| c.model.eq_ignore_ascii_case(model))
            .ok_or_else(|| AdvisorError::UnknownController(model.to_string()))
    }

    /// The controller the allocator uses for a category: the first one listed.
    pub fn designated(&self, category: ControllerCategory) -> AdvisorResult<&ControllerSpec> {
        self.controllers
            .iter()
            .find(|c| c.category == category)
            .ok_or_else(|| invalid(format!("no {} controller", category)))
    }

    pub fn profiles(&self) -> &[SystemProfile] {
        &self.profiles
    }

    pub fn controllers(&self) -> &[ControllerSpec] {
        &self.controllers
    }

    pub fn panel_tiers(&self) -> &[PanelTier] {
        &self.panel_tiers
    }

    pub fn network_tiers(&self) -> &[NetworkDeviceTier] {
        &self.network_tiers
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn invalid(reason: String) -> AdvisorError {
    AdvisorError::InvalidCatalog(reason)
}
