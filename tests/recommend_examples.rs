use panel_advisor::*;

fn req(system: SystemType, grade: ComplexityGrade, quantity: u32) -> SystemRequest {
    SystemRequest::new(system, grade, quantity)
}

#[test]
fn empty_request_list() {
    let catalog = Catalog::builtin();
    let rec = recommend(&catalog, &[]).unwrap();

    assert_eq!(rec.demand, AggregatedDemand::default());
    assert!(rec.allocation.entries.is_empty());
    assert_eq!(rec.panel, catalog.panel_tiers()[0]);
    assert_eq!(rec.panel_count, 0);
    assert_eq!(rec.network_device, catalog.network_tiers()[0]);
}

#[test]
fn one_average_ahu() {
    let catalog = Catalog::builtin();
    let rec = recommend(&catalog, &[req(SystemType::Ahu, ComplexityGrade::Average, 1)]).unwrap();

    let profile = catalog
        .profile_for(SystemType::Ahu, ComplexityGrade::Average)
        .unwrap();
    assert_eq!(rec.demand.points, profile.demand);
    assert_eq!(rec.demand.hardware_points, profile.hardware_points);

    assert_eq!(rec.allocation.entries.len(), 1);
    let entry = &rec.allocation.entries[0];
    assert_eq!(entry.category, ControllerCategory::GeneralPurpose);
    assert_eq!(entry.model, "CGM09090");
    assert_eq!(entry.quantity, 2);

    assert_eq!(rec.total_devices, entry.quantity);
    assert_eq!(rec.network_device.model, "SNE10500");
    assert_eq!(rec.panel.name, "small");
}

#[test]
fn ten_simple_vav_boxes() {
    let rec = recommend(
        &Catalog::builtin(),
        &[req(SystemType::Vav, ComplexityGrade::Simple, 10)],
    )
    .unwrap();

    assert_eq!(
        rec.allocation.entries,
        vec![AllocationEntry {
            model: "VMA1930".to_string(),
            quantity: 10,
            category: ControllerCategory::Vav,
        }]
    );
    assert_eq!(rec.total_devices, 10);
    assert_eq!(rec.network_device.model, "SNE10500");
    assert_eq!(rec.panel.name, "largest");
}

#[test]
fn very_simple_vav_is_unknown() {
    let err = recommend(
        &Catalog::builtin(),
        &[req(SystemType::Vav, ComplexityGrade::VerySimple, 1)],
    )
    .unwrap_err();

    assert_eq!(
        err,
        AdvisorError::UnknownSystemConfiguration {
            system: "vav".to_string(),
            grade: "verySimple".to_string(),
        }
    );
}

#[test]
fn two_hundred_devices() {
    let catalog = Catalog::builtin();
    // 155 VAV boxes + 45 base controllers for 10 complex chillers (BI 90/2 binds)
    let rec = recommend(
        &catalog,
        &[
            req(SystemType::Vav, ComplexityGrade::Complex, 155),
            req(SystemType::Chiller, ComplexityGrade::Complex, 10),
        ],
    )
    .unwrap();

    assert_eq!(rec.total_devices, 200);
    assert_eq!(rec.network_device.model, "SNE22000");
    let largest = catalog.panel_tiers().last().unwrap();
    assert_eq!(rec.panel, *largest);
    assert_eq!(rec.panel_count, 200u64.div_ceil(largest.max_controllers_per_panel));
}

#[test]
fn zero_quantity_produces_no_recommendation() {
    let err = recommend(
        &Catalog::builtin(),
        &[
            req(SystemType::Ahu, ComplexityGrade::Simple, 1),
            req(SystemType::Chiller, ComplexityGrade::Simple, 0),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, AdvisorError::InvalidQuantity(_)));
}

#[test]
fn mixed_building_schedule() {
    let rec = recommend(
        &Catalog::builtin(),
        &[
            req(SystemType::Ahu, ComplexityGrade::Complex, 2),
            req(SystemType::Chiller, ComplexityGrade::Average, 1),
            req(SystemType::Vav, ComplexityGrade::Average, 40),
        ],
    )
    .unwrap();

    // Non-VAV demand: 2 * (12,4,6,4,4) + (12,6,7,4,3) = (36,14,19,12,11)
    // UI 36/7 -> 6, BI 14/2 -> 7, BO 19/3 -> 7, CO 12/4 -> 3, AO 11/2 -> 6
    let categories: Vec<_> = rec.allocation.entries.iter().map(|e| e.category).collect();
    assert_eq!(
        categories,
        vec![ControllerCategory::Vav, ControllerCategory::GeneralPurpose]
    );
    assert_eq!(rec.allocation.quantity_of(ControllerCategory::Vav), 40);
    assert_eq!(rec.allocation.quantity_of(ControllerCategory::GeneralPurpose), 7);
    assert_eq!(rec.total_devices, 47);
    assert_eq!(rec.panel_count, 4);
    assert_eq!(rec.demand.system_count, 43);
    assert!(rec.warnings.is_empty());
}
