use panel_advisor::*;
use rusqlite::Connection;

#[test]
fn stored_catalog_gives_same_recommendation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    {
        let conn = Connection::open(&path).unwrap();
        db::init_schema(&conn).unwrap();
        db::save_catalog(&conn, &Catalog::builtin()).unwrap();
    }

    let conn = Connection::open(&path).unwrap();
    let stored = db::load_catalog(&conn).unwrap();

    let requests = [
        SystemRequest::new(SystemType::Ahu, ComplexityGrade::Simple, 3),
        SystemRequest::new(SystemType::Vav, ComplexityGrade::Complex, 24),
    ];
    assert_eq!(
        recommend(&stored, &requests).unwrap(),
        recommend(&Catalog::builtin(), &requests).unwrap()
    );
}

#[test]
fn alternate_catalog_changes_sizing() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    db::save_catalog(&conn, &Catalog::builtin()).unwrap();

    // A denser general-purpose controller halves the count for binary inputs
    conn.execute(
        "UPDATE controllers SET bi = 4, ao = 4 WHERE model = 'CGM09090'",
        [],
    )
    .unwrap();
    let catalog = db::load_catalog(&conn).unwrap();

    let requests = [SystemRequest::new(SystemType::Chiller, ComplexityGrade::Complex, 1)];
    let rec = recommend(&catalog, &requests).unwrap();
    // UI 18/7 -> 3, BI 9/4 -> 3, BO 10/3 -> 4, CO 6/4 -> 2, AO 5/4 -> 2
    assert_eq!(rec.allocation.quantity_of(ControllerCategory::GeneralPurpose), 4);
    assert_eq!(rec.panel.name, "mediumLarge");
}
