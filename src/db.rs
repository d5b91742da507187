//! Catalog database schema and operations

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, Row};

use crate::catalog::Catalog;
use crate::models::{
    ComplexityGrade, ControllerCategory, ControllerSpec, NetworkDeviceTier, PanelTier,
    PointCounts, SystemProfile, SystemType,
};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Point profile per system type and complexity grade
        CREATE TABLE IF NOT EXISTS system_profiles (
            system TEXT NOT NULL,
            grade TEXT NOT NULL,
            position INTEGER NOT NULL,
            hardware_points INTEGER NOT NULL,
            software_points INTEGER NOT NULL,
            object_count INTEGER NOT NULL,
            ui INTEGER NOT NULL,
            bi INTEGER NOT NULL,
            bo INTEGER NOT NULL,
            co INTEGER NOT NULL,
            ao INTEGER NOT NULL,
            PRIMARY KEY (system, grade)
        );

        -- Controller and expansion module capacities
        CREATE TABLE IF NOT EXISTS controllers (
            model TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            ui INTEGER NOT NULL,
            bi INTEGER NOT NULL,
            bo INTEGER NOT NULL,
            co INTEGER NOT NULL,
            ao INTEGER NOT NULL
        );

        -- System types a base controller is rated for
        CREATE TABLE IF NOT EXISTS controller_systems (
            model TEXT NOT NULL,
            system TEXT NOT NULL,
            PRIMARY KEY (model, system)
        );

        -- Enclosure tiers, smallest first; NULL breakpoint = catch-all
        CREATE TABLE IF NOT EXISTS panel_tiers (
            position INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            enclosure_size TEXT NOT NULL,
            rating TEXT NOT NULL,
            max_controllers INTEGER NOT NULL,
            breakpoint INTEGER
        );

        -- Supervisory device tiers; NULL max_devices = top tier
        CREATE TABLE IF NOT EXISTS network_tiers (
            position INTEGER PRIMARY KEY,
            model TEXT NOT NULL,
            max_devices INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_controller_systems_model ON controller_systems(model);
        "#,
    )?;
    Ok(())
}

/// Insert or replace a system profile
pub fn upsert_profile(conn: &Connection, profile: &SystemProfile, position: usize) -> Result<()> {
    let d = &profile.demand;
    conn.execute(
        "INSERT OR REPLACE INTO system_profiles
            (system, grade, position, hardware_points, software_points, object_count, ui, bi, bo, co, ao)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        (
            profile.system.as_str(),
            profile.grade.as_str(),
            position,
            profile.hardware_points,
            profile.software_points,
            profile.object_count,
            d.ui,
            d.bi,
            d.bo,
            d.co,
            d.ao,
        ),
    )?;
    Ok(())
}

/// Insert or replace a controller and its supported systems
pub fn upsert_controller(conn: &Connection, controller: &ControllerSpec, position: usize) -> Result<()> {
    let c = &controller.capacity;
    conn.execute(
        "INSERT OR REPLACE INTO controllers (model, position, category, description, ui, bi, bo, co, ao)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        (
            &controller.model,
            position,
            controller.category.key(),
            &controller.description,
            c.ui,
            c.bi,
            c.bo,
            c.co,
            c.ao,
        ),
    )?;

    conn.execute(
        "DELETE FROM controller_systems WHERE model = ?1",
        [&controller.model],
    )?;
    for system in &controller.supported_systems {
        conn.execute(
            "INSERT INTO controller_systems (model, system) VALUES (?1, ?2)",
            (&controller.model, system.as_str()),
        )?;
    }
    Ok(())
}

/// Insert a panel tier at a position in the ladder
pub fn insert_panel_tier(conn: &Connection, tier: &PanelTier, position: usize) -> Result<()> {
    conn.execute(
        "INSERT INTO panel_tiers (position, name, enclosure_size, rating, max_controllers, breakpoint)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            position,
            &tier.name,
            &tier.enclosure_size,
            &tier.rating,
            tier.max_controllers_per_panel,
            tier.breakpoint,
        ),
    )?;
    Ok(())
}

/// Insert a supervisory device tier
pub fn insert_network_tier(conn: &Connection, tier: &NetworkDeviceTier, position: usize) -> Result<()> {
    conn.execute(
        "INSERT INTO network_tiers (position, model, max_devices) VALUES (?1, ?2, ?3)",
        (position, &tier.model, tier.max_devices),
    )?;
    Ok(())
}

/// Clear all catalog data
pub fn clear_catalog(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM network_tiers;
        DELETE FROM panel_tiers;
        DELETE FROM controller_systems;
        DELETE FROM controllers;
        DELETE FROM system_profiles;
        "#,
    )?;
    Ok(())
}

/// Replace the stored catalog with `catalog`
pub fn save_catalog(conn: &Connection, catalog: &Catalog) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    clear_catalog(&tx)?;

    for (i, profile) in catalog.profiles().iter().enumerate() {
        upsert_profile(&tx, profile, i)?;
    }
    for (i, controller) in catalog.controllers().iter().enumerate() {
        upsert_controller(&tx, controller, i)?;
    }
    for (i, tier) in catalog.panel_tiers().iter().enumerate() {
        insert_panel_tier(&tx, tier, i)?;
    }
    for (i, tier) in catalog.network_tiers().iter().enumerate() {
        insert_network_tier(&tx, tier, i)?;
    }

    tx.commit()?;
    Ok(())
}

pub fn catalog_is_empty(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM system_profiles", [], |row| row.get(0))?;
    Ok(count == 0)
}

/// Load and validate the stored catalog
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let profiles = list_profiles(conn)?;
    let controllers = list_controllers(conn)?;
    let panel_tiers = list_panel_tiers(conn)?;
    let network_tiers = list_network_tiers(conn)?;

    let catalog = Catalog::new(profiles, controllers, panel_tiers, network_tiers)
        .context("Stored catalog is inconsistent")?;
    Ok(catalog)
}

fn point_counts(row: &Row<'_>, first: usize) -> rusqlite::Result<PointCounts> {
    Ok(PointCounts::new(
        row.get(first)?,
        row.get(first + 1)?,
        row.get(first + 2)?,
        row.get(first + 3)?,
        row.get(first + 4)?,
    ))
}

fn parse_system(name: &str) -> Result<SystemType> {
    SystemType::from_name(name).ok_or_else(|| anyhow!("Unknown system type {:?} in catalog", name))
}

/// List all profiles in catalog order
pub fn list_profiles(conn: &Connection) -> Result<Vec<SystemProfile>> {
    let mut stmt = conn.prepare(
        "SELECT system, grade, hardware_points, software_points, object_count, ui, bi, bo, co, ao
         FROM system_profiles
         ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, u64>(2)?,
            row.get::<_, u64>(3)?,
            row.get::<_, u64>(4)?,
            point_counts(row, 5)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (system, grade, hw, sw, objects, demand) = row?;
        results.push(SystemProfile {
            system: parse_system(&system)?,
            grade: ComplexityGrade::from_name(&grade)
                .ok_or_else(|| anyhow!("Unknown complexity grade {:?} in catalog", grade))?,
            hardware_points: hw,
            software_points: sw,
            object_count: objects,
            demand,
        });
    }
    Ok(results)
}

/// List all controllers in catalog order
pub fn list_controllers(conn: &Connection) -> Result<Vec<ControllerSpec>> {
    let mut stmt = conn.prepare(
        "SELECT model, category, description, ui, bi, bo, co, ao
         FROM controllers
         ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            point_counts(row, 3)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (model, category, description, capacity) = row?;
        let category = ControllerCategory::from_key(&category)
            .ok_or_else(|| anyhow!("Unknown controller category {:?} for {}", category, model))?;
        let supported_systems = get_supported_systems(conn, &model)?;
        results.push(ControllerSpec {
            model,
            description,
            category,
            capacity,
            supported_systems,
        });
    }
    Ok(results)
}

/// Get the system types a controller is rated for
pub fn get_supported_systems(conn: &Connection, model: &str) -> Result<Vec<SystemType>> {
    let mut stmt = conn.prepare(
        "SELECT system FROM controller_systems WHERE model = ?1 ORDER BY system",
    )?;

    let rows = stmt.query_map([model], |row| row.get::<_, String>(0))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(parse_system(&row?)?);
    }
    results.sort();
    Ok(results)
}

pub fn list_panel_tiers(conn: &Connection) -> Result<Vec<PanelTier>> {
    let mut stmt = conn.prepare(
        "SELECT name, enclosure_size, rating, max_controllers, breakpoint
         FROM panel_tiers
         ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(PanelTier {
            name: row.get(0)?,
            enclosure_size: row.get(1)?,
            rating: row.get(2)?,
            max_controllers_per_panel: row.get(3)?,
            breakpoint: row.get(4)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn list_network_tiers(conn: &Connection) -> Result<Vec<NetworkDeviceTier>> {
    let mut stmt = conn.prepare(
        "SELECT model, max_devices FROM network_tiers ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(NetworkDeviceTier {
            model: row.get(0)?,
            max_devices: row.get(1)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}
