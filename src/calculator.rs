//! Recommendation assembly and report formatting

use std::fmt;

use tracing::debug;

use crate::allocator::allocate;
use crate::catalog::Catalog;
use crate::demand::aggregate;
use crate::error::AdvisorResult;
use crate::models::{Recommendation, SystemRequest};
use crate::sizing::{size_network, size_panels};

/// Calculate controllers, panels and supervisory device for a request set
///
/// Pure and idempotent: nothing is cached between calls. Fails without a
/// partial result if any request is invalid.
pub fn recommend(catalog: &Catalog, requests: &[SystemRequest]) -> AdvisorResult<Recommendation> {
    let demand = aggregate(catalog, requests)?;
    let allocation = allocate(catalog, &demand, requests)?;

    let total_devices = allocation.total_devices();
    let (panel, panel_count) = size_panels(catalog, total_devices);
    let network_device = size_network(catalog, total_devices);
    debug!(
        total_devices,
        panel = %panel.name,
        panel_count,
        network = %network_device.model,
        "sized"
    );

    Ok(Recommendation {
        demand,
        warnings: allocation.warnings.clone(),
        allocation,
        total_devices,
        network_device: network_device.clone(),
        panel: panel.clone(),
        panel_count,
    })
}

/// Per-class demand table for verbose output
pub fn format_demand_table(rec: &Recommendation) -> String {
    let mut output = String::new();
    output.push_str(&format!("{:<6} {:>8}\n", "Class", "Points"));
    output.push_str(&format!("{}\n", "-".repeat(15)));
    for (class, count) in rec.demand.points.iter() {
        output.push_str(&format!("{:<6} {:>8}\n", class, count));
    }
    output.push_str(&format!("{:<6} {:>8}\n", "Total", rec.demand.points.total()));
    output
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Panel Recommendation ===")?;
        writeln!(f, "Systems: {}", self.demand.system_count)?;
        writeln!(
            f,
            "Points:  {} hardware + {} software = {} ({} objects)",
            self.demand.hardware_points,
            self.demand.software_points,
            self.demand.total_points(),
            self.demand.object_count
        )?;
        writeln!(f, "I/O:     {}", self.demand.points)?;
        writeln!(f)?;

        writeln!(f, "Controllers required:")?;
        if self.allocation.entries.is_empty() {
            writeln!(f, "  none")?;
        }
        for entry in &self.allocation.entries {
            writeln!(f, "  {}", entry)?;
        }
        writeln!(f, "  Total devices: {}", self.total_devices)?;
        writeln!(f)?;

        writeln!(
            f,
            "Panel:       {}x {} {} ({})",
            self.panel_count, self.panel.enclosure_size, self.panel.rating, self.panel.name
        )?;
        writeln!(f, "Supervisory: {}", self.network_device.model)?;

        if !self.warnings.is_empty() {
            writeln!(f)?;
            writeln!(f, "Warnings:")?;
            for w in &self.warnings {
                writeln!(f, "  ! {}", w)?;
            }
        }

        Ok(())
    }
}

/// One schedule's line in a batch summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub name: String,
    pub devices: u64,
    pub network_device: String,
    pub panels: u64,
}

/// Summary over several independent panel schedules
#[derive(Debug)]
pub struct BatchSummary {
    pub jobs: Vec<BatchJob>,
    pub total_devices: u64,
    pub total_panels: u64,
    pub total_points: u64,
    pub warnings: usize,
}

/// Roll up named recommendations into one summary, keeping input order
pub fn summarize_batch(results: &[(String, Recommendation)]) -> BatchSummary {
    let mut summary = BatchSummary {
        jobs: Vec::with_capacity(results.len()),
        total_devices: 0,
        total_panels: 0,
        total_points: 0,
        warnings: 0,
    };

    for (name, rec) in results {
        summary.jobs.push(BatchJob {
            name: name.clone(),
            devices: rec.total_devices,
            network_device: rec.network_device.model.clone(),
            panels: rec.panel_count,
        });
        summary.total_devices += rec.total_devices;
        summary.total_panels += rec.panel_count;
        summary.total_points += rec.demand.total_points();
        summary.warnings += rec.warnings.len();
    }

    summary
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Batch Summary ===")?;
        writeln!(
            f,
            "{:<30} {:>8} {:>10} {:>7}",
            "Schedule", "Devices", "Supervisor", "Panels"
        )?;
        writeln!(f, "{}", "-".repeat(58))?;
        for job in &self.jobs {
            writeln!(
                f,
                "{:<30} {:>8} {:>10} {:>7}",
                job.name, job.devices, job.network_device, job.panels
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total devices: {}", self.total_devices)?;
        writeln!(f, "Total panels:  {}", self.total_panels)?;
        writeln!(f, "Total points:  {}", self.total_points)?;
        if self.warnings > 0 {
            writeln!(f, "Warnings:      {}", self.warnings)?;
        }
        Ok(())
    }
}
