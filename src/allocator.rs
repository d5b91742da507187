//! Controller allocation
//!
//! VAV boxes get one VAV controller each. Everything else shares a pool of
//! general-purpose controllers sized by whichever point class saturates
//! first, topped up with expansion modules for demand in classes the base
//! controller does not expose.
//!
//! The ratio heuristic over-provisions the non-binding classes and never mixes
//! controller models. That slack is accepted: every class is covered by at
//! least the chosen number of devices.

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::demand::{aggregate_matching, validate_quantities};
use crate::error::AdvisorResult;
use crate::models::{
    AggregatedDemand, AllocationEntry, AllocationResult, ControllerCategory, PointClass,
    PointCounts, SystemRequest, SystemType,
};

/// Choose controllers for a request set.
///
/// `demand` is the aggregate over all of `requests`; the general-purpose phase
/// recomputes demand from the non-VAV requests only.
pub fn allocate(
    catalog: &Catalog,
    demand: &AggregatedDemand,
    requests: &[SystemRequest],
) -> AdvisorResult<AllocationResult> {
    validate_quantities(requests)?;
    let mut result = AllocationResult::default();

    let vav_count: u64 = requests
        .iter()
        .filter(|r| r.system == SystemType::Vav)
        .map(|r| u64::from(r.quantity))
        .sum();
    if vav_count > 0 {
        let vav = catalog.designated(ControllerCategory::Vav)?;
        push_entry(&mut result, &vav.model, vav_count, vav.category);
    }

    if !requests.iter().any(|r| r.system != SystemType::Vav) {
        debug!(vav_count, "no general-purpose systems");
        return Ok(result);
    }

    let gp_demand = aggregate_matching(catalog, requests, |r| r.system != SystemType::Vav)?.points;
    debug!(total = %demand.points, general_purpose = %gp_demand, "allocating controllers");

    let base = catalog.designated(ControllerCategory::GeneralPurpose)?;
    let mut unsupported: Vec<SystemType> = requests
        .iter()
        .map(|r| r.system)
        .filter(|&s| s != SystemType::Vav && !base.supports(s))
        .collect();
    unsupported.sort();
    unsupported.dedup();
    for system in unsupported {
        result.warnings.push(format!(
            "{} does not list {} among its supported systems",
            base.model, system
        ));
    }

    let base_count = devices_needed(&gp_demand, &base.capacity);
    push_entry(&mut result, &base.model, base_count, base.category);

    let residual = residual_demand(&gp_demand, &base.capacity, base_count);
    if !residual.is_zero() {
        let expansion = catalog.designated(ControllerCategory::Expansion)?;
        for (class, count) in residual.iter() {
            if count > 0 && expansion.capacity.get(class) == 0 {
                result.warnings.push(format!(
                    "{} {} points cannot be served: neither {} nor {} has {} capacity",
                    count, class, base.model, expansion.model, class
                ));
            }
        }

        let expansion_count = devices_needed(&residual, &expansion.capacity);
        if expansion_count > 0 && base_count == 0 {
            result.warnings.push(format!(
                "{} requires a base controller but none was allocated",
                expansion.model
            ));
        }
        push_entry(&mut result, &expansion.model, expansion_count, expansion.category);
    }

    for w in &result.warnings {
        warn!("{}", w);
    }
    Ok(result)
}

/// Smallest device count covering every class the device exposes.
///
/// Classes with zero capacity are skipped, so all-zero demand yields zero.
pub fn devices_needed(demand: &PointCounts, capacity: &PointCounts) -> u64 {
    PointClass::ALL
        .iter()
        .filter(|&&c| capacity.get(c) > 0)
        .map(|&c| demand.get(c).div_ceil(capacity.get(c)))
        .max()
        .unwrap_or(0)
}

/// Demand left after `count` devices, clamped at zero per class.
pub fn residual_demand(demand: &PointCounts, capacity: &PointCounts, count: u64) -> PointCounts {
    let mut residual = PointCounts::default();
    for class in PointClass::ALL {
        *residual.get_mut(class) = demand
            .get(class)
            .saturating_sub(count.saturating_mul(capacity.get(class)));
    }
    residual
}

fn push_entry(result: &mut AllocationResult, model: &str, quantity: u64, category: ControllerCategory) {
    if quantity == 0 {
        return;
    }
    debug!(model, quantity, %category, "allocated");
    result.entries.push(AllocationEntry {
        model: model.to_string(),
        quantity,
        category,
    });
}
