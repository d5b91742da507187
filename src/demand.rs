//! Point demand aggregation

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{AggregatedDemand, SystemRequest};

/// Sum point demand over every request, scaled by quantity.
///
/// All quantities are checked before anything is summed; an unknown
/// system / grade pair fails with the catalog's error.
pub fn aggregate(catalog: &Catalog, requests: &[SystemRequest]) -> AdvisorResult<AggregatedDemand> {
    aggregate_matching(catalog, requests, |_| true)
}

/// Like [`aggregate`], restricted to the requests accepted by `include`.
pub fn aggregate_matching<F>(
    catalog: &Catalog,
    requests: &[SystemRequest],
    include: F,
) -> AdvisorResult<AggregatedDemand>
where
    F: Fn(&SystemRequest) -> bool,
{
    validate_quantities(requests)?;

    let mut demand = AggregatedDemand::default();
    for request in requests.iter().filter(|r| include(r)) {
        let profile = catalog.profile_for(request.system, request.grade)?;
        let qty = u64::from(request.quantity);
        let overflow = || {
            AdvisorError::InvalidQuantity(format!(
                "{} for {} ({}) overflows the point totals",
                qty, request.system, request.grade
            ))
        };

        demand.points = profile
            .demand
            .checked_mul(qty)
            .and_then(|p| demand.points.checked_add(&p))
            .ok_or_else(overflow)?;
        demand.hardware_points = scaled_sum(demand.hardware_points, profile.hardware_points, qty)
            .ok_or_else(overflow)?;
        demand.software_points = scaled_sum(demand.software_points, profile.software_points, qty)
            .ok_or_else(overflow)?;
        demand.object_count =
            scaled_sum(demand.object_count, profile.object_count, qty).ok_or_else(overflow)?;
        demand.system_count += qty;
    }

    debug!(
        points = %demand.points,
        hardware = demand.hardware_points,
        systems = demand.system_count,
        "aggregated demand"
    );
    Ok(demand)
}

fn scaled_sum(acc: u64, value: u64, qty: u64) -> Option<u64> {
    value.checked_mul(qty)?.checked_add(acc)
}

pub fn validate_quantities(requests: &[SystemRequest]) -> AdvisorResult<()> {
    match requests.iter().find(|r| r.quantity == 0) {
        Some(r) => Err(AdvisorError::InvalidQuantity(format!(
            "0 for {} ({})",
            r.system, r.grade
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComplexityGrade, PointCounts, SystemType};

    fn req(system: SystemType, grade: ComplexityGrade, quantity: u32) -> SystemRequest {
        SystemRequest::new(system, grade, quantity)
    }

    #[test]
    fn empty_input_is_zero() {
        let demand = aggregate(&Catalog::builtin(), &[]).unwrap();
        assert_eq!(demand, AggregatedDemand::default());
        assert_eq!(demand.total_points(), 0);
    }

    #[test]
    fn single_profile_matches_catalog() {
        let demand = aggregate(
            &Catalog::builtin(),
            &[req(SystemType::Ahu, ComplexityGrade::Average, 1)],
        )
        .unwrap();
        assert_eq!(demand.points, PointCounts::new(8, 3, 4, 3, 3));
        assert_eq!(demand.hardware_points, 21);
        assert_eq!(demand.total_points(), 36);
        assert_eq!(demand.object_count, 80);
        assert_eq!(demand.system_count, 1);
    }

    #[test]
    fn sums_across_requests() {
        let demand = aggregate(
            &Catalog::builtin(),
            &[
                req(SystemType::Ahu, ComplexityGrade::Simple, 2),
                req(SystemType::Chiller, ComplexityGrade::Complex, 1),
                req(SystemType::Vav, ComplexityGrade::Average, 5),
            ],
        )
        .unwrap();
        // 2 * (4,2,2,2,2) + (18,9,10,6,5) + 5 * (2,0,1,1,0)
        assert_eq!(demand.points, PointCounts::new(36, 13, 19, 15, 9));
        assert_eq!(demand.hardware_points, 24 + 48 + 20);
        assert_eq!(demand.system_count, 8);
    }

    #[test]
    fn order_does_not_matter() {
        let catalog = Catalog::builtin();
        let mut requests = vec![
            req(SystemType::Ahu, ComplexityGrade::Complex, 3),
            req(SystemType::Vav, ComplexityGrade::Simple, 7),
            req(SystemType::Chiller, ComplexityGrade::VerySimple, 2),
        ];
        let forward = aggregate(&catalog, &requests).unwrap();
        requests.reverse();
        assert_eq!(aggregate(&catalog, &requests).unwrap(), forward);
    }

    #[test]
    fn restricted_to_matching_requests() {
        let demand = aggregate_matching(
            &Catalog::builtin(),
            &[
                req(SystemType::Ahu, ComplexityGrade::Average, 1),
                req(SystemType::Vav, ComplexityGrade::Complex, 4),
            ],
            |r| r.system != SystemType::Vav,
        )
        .unwrap();
        assert_eq!(demand.points, PointCounts::new(8, 3, 4, 3, 3));
    }

    #[test]
    fn unknown_configuration_propagates() {
        let err = aggregate(
            &Catalog::builtin(),
            &[req(SystemType::Vav, ComplexityGrade::VerySimple, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, AdvisorError::UnknownSystemConfiguration { .. }));
    }

    #[test]
    fn oversized_profile_counts_are_rejected() {
        let builtin = Catalog::builtin();
        let profiles = builtin
            .profiles()
            .iter()
            .cloned()
            .map(|mut p| {
                if p.system == SystemType::Ahu && p.grade == ComplexityGrade::Complex {
                    p.demand.ui = i64::MAX as u64;
                    p.hardware_points = i64::MAX as u64;
                }
                p
            })
            .collect();
        let catalog = Catalog::new(
            profiles,
            builtin.controllers().to_vec(),
            builtin.panel_tiers().to_vec(),
            builtin.network_tiers().to_vec(),
        )
        .unwrap();

        assert!(aggregate(&catalog, &[req(SystemType::Ahu, ComplexityGrade::Complex, 1)]).is_ok());
        let err = aggregate(&catalog, &[req(SystemType::Ahu, ComplexityGrade::Complex, 3)])
            .unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidQuantity(ref msg) if msg.contains("overflows")));
        let err = aggregate(
            &catalog,
            &[
                req(SystemType::Ahu, ComplexityGrade::Complex, 1),
                req(SystemType::Ahu, ComplexityGrade::Complex, 1),
                req(SystemType::Ahu, ComplexityGrade::Complex, 1),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidQuantity(_)));
    }

    #[test]
    fn zero_quantity_rejected_before_lookup() {
        // The unknown VAV grade comes first, but the quantity check wins
        let err = aggregate(
            &Catalog::builtin(),
            &[
                req(SystemType::Vav, ComplexityGrade::VerySimple, 1),
                req(SystemType::Ahu, ComplexityGrade::Simple, 0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidQuantity(_)));
    }
}
