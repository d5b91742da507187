//! Panel enclosure and supervisory device sizing

use crate::catalog::Catalog;
use crate::models::{NetworkDeviceTier, PanelTier};

/// Pick the panel tier for a device count and how many panels of it are needed.
///
/// Walks the tiers in catalog order and takes the first whose breakpoint
/// covers the count, falling back to the last tier. Tiers sharing a
/// breakpoint with an earlier tier are never chosen.
pub fn size_panels(catalog: &Catalog, total_devices: u64) -> (&PanelTier, u64) {
    let tiers = catalog.panel_tiers();
    let tier = tiers
        .iter()
        .find(|t| t.breakpoint.is_some_and(|b| total_devices <= b))
        // Catalog guarantees at least one tier
        .unwrap_or_else(|| &tiers[tiers.len() - 1]);

    let panel_count = total_devices.div_ceil(tier.max_controllers_per_panel);
    (tier, panel_count)
}

/// Pick the supervisory device for a device count.
pub fn size_network(catalog: &Catalog, total_devices: u64) -> &NetworkDeviceTier {
    let tiers = catalog.network_tiers();
    tiers
        .iter()
        .find(|t| t.max_devices.is_none_or(|max| total_devices <= max))
        .unwrap_or_else(|| &tiers[tiers.len() - 1])
}
