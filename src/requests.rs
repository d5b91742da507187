//! Textual system requests
//!
//! Parses `system:grade[:qty]` tuples (or the same fields separated by
//! whitespace) and request files holding one tuple per line. Batch mode
//! scans a directory tree for `*.systems` files, one panel schedule each.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::calculator::recommend;
use crate::catalog::Catalog;
use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{ComplexityGrade, Recommendation, SystemRequest, SystemType};

pub const REQUEST_FILE_EXTENSION: &str = "systems";

pub struct RequestParser {
    tuple_re: Regex,
}

impl RequestParser {
    pub fn new() -> Result<Self> {
        // ahu:average:2, ahu average 2, vav:simple
        let tuple_re = Regex::new(
            r"^(?P<system>[A-Za-z]+)(?:\s*:\s*|\s+)(?P<grade>[A-Za-z_-]+)(?:(?:\s*:\s*|\s+)(?P<qty>\S+))?$",
        )?;
        Ok(Self { tuple_re })
    }

    /// Parse a single tuple. `line` is only used for error messages.
    pub fn parse_request(&self, text: &str, line: usize) -> AdvisorResult<SystemRequest> {
        let text = text.trim();
        let cap = self
            .tuple_re
            .captures(text)
            .ok_or_else(|| AdvisorError::MalformedRequest {
                line,
                text: text.to_string(),
            })?;

        let system_name = &cap["system"];
        let grade_name = &cap["grade"];
        let unknown = || AdvisorError::UnknownSystemConfiguration {
            system: system_name.to_string(),
            grade: grade_name.to_string(),
        };
        let system = SystemType::from_name(system_name).ok_or_else(unknown)?;
        let grade = ComplexityGrade::from_name(grade_name).ok_or_else(unknown)?;

        let quantity = match cap.name("qty") {
            None => 1,
            Some(raw) => parse_quantity(raw.as_str())?,
        };

        Ok(SystemRequest::new(system, grade, quantity))
    }

    /// Parse request file content, skipping blank lines and `#` comments
    pub fn parse_requests(&self, content: &str) -> AdvisorResult<Vec<SystemRequest>> {
        let mut requests = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }
            requests.push(self.parse_request(text, idx + 1)?);
        }
        Ok(requests)
    }

    pub fn read_request_file(&self, path: &Path) -> Result<Vec<SystemRequest>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let requests = self
            .parse_requests(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(requests)
    }
}

fn parse_quantity(raw: &str) -> AdvisorResult<u32> {
    match raw.parse::<u32>() {
        Ok(q) if q > 0 => Ok(q),
        _ => Err(AdvisorError::InvalidQuantity(raw.to_string())),
    }
}

/// Find all request files below `dir`, sorted by path
pub fn find_request_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == REQUEST_FILE_EXTENSION)
        {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Recommend a panel for every request file below `dir`
///
/// A file that cannot be read, parsed or sized is counted and logged; the
/// rest of the batch still runs.
pub fn recommend_directory(catalog: &Catalog, dir: &Path) -> Result<BatchOutcome> {
    let parser = RequestParser::new()?;
    let mut outcome = BatchOutcome::default();

    info!("Scanning {} for request files...", dir.display());
    let files = find_request_files(dir)?;
    info!("Found {} request files", files.len());

    for path in &files {
        let name = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .display()
            .to_string();

        let result = parser
            .read_request_file(path)
            .and_then(|requests| recommend(catalog, &requests).map_err(Into::into));
        match result {
            Ok(rec) => {
                info!(
                    "  Sized: {} ({} devices, {} panels)",
                    name, rec.total_devices, rec.panel_count
                );
                outcome.stats.recommended += 1;
                outcome.results.push((name, rec));
            }
            Err(e) => {
                warn!("  Error in {}: {:#}", path.display(), e);
                outcome.stats.errors += 1;
                outcome.failures.push((name, format!("{:#}", e)));
            }
        }
    }
    outcome.stats.files = files.len();

    Ok(outcome)
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<(String, Recommendation)>,
    pub failures: Vec<(String, String)>,
    pub stats: BatchStats,
}

#[derive(Debug, Default)]
pub struct BatchStats {
    pub files: usize,
    pub recommended: usize,
    pub errors: usize,
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Processed {} request files. Recommended: {}, Errors: {}",
            self.files, self.recommended, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> RequestParser {
        RequestParser::new().unwrap()
    }

    #[test]
    fn colon_and_space_forms() {
        let p = parser();
        let expected = SystemRequest::new(SystemType::Ahu, ComplexityGrade::Average, 2);
        assert_eq!(p.parse_request("ahu:average:2", 1).unwrap(), expected);
        assert_eq!(p.parse_request("AHU average 2", 1).unwrap(), expected);
        assert_eq!(p.parse_request("  ahu : average : 2 ", 1).unwrap(), expected);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let r = parser().parse_request("vav:simple", 1).unwrap();
        assert_eq!(r.quantity, 1);
        assert_eq!(r.system, SystemType::Vav);
    }

    #[test]
    fn grade_spellings() {
        let r = parser().parse_request("chiller:very-simple:3", 1).unwrap();
        assert_eq!(r.grade, ComplexityGrade::VerySimple);
    }

    #[test]
    fn bad_quantities() {
        let p = parser();
        for raw in ["0", "-2", "1.5", "many"] {
            let err = p.parse_request(&format!("ahu:simple:{}", raw), 1).unwrap_err();
            assert_eq!(err, AdvisorError::InvalidQuantity(raw.to_string()));
        }
    }

    #[test]
    fn unknown_names() {
        let p = parser();
        assert_eq!(
            p.parse_request("boiler:simple:1", 1).unwrap_err(),
            AdvisorError::UnknownSystemConfiguration {
                system: "boiler".into(),
                grade: "simple".into(),
            }
        );
        assert!(matches!(
            p.parse_request("ahu:extreme", 1),
            Err(AdvisorError::UnknownSystemConfiguration { .. })
        ));
    }

    #[test]
    fn malformed_lines_report_line_number() {
        let content = "ahu average 1\n\n# comment\nnonsense\n";
        let err = parser().parse_requests(content).unwrap_err();
        assert_eq!(
            err,
            AdvisorError::MalformedRequest {
                line: 4,
                text: "nonsense".into(),
            }
        );
    }

    #[test]
    fn file_content_with_comments() {
        let content = "# floor 2\nahu:complex:1   # main AHU\nvav average 12\n\n";
        let requests = parser().parse_requests(content).unwrap();
        assert_eq!(
            requests,
            vec![
                SystemRequest::new(SystemType::Ahu, ComplexityGrade::Complex, 1),
                SystemRequest::new(SystemType::Vav, ComplexityGrade::Average, 12),
            ]
        );
    }

    #[test]
    fn batch_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.systems"), "ahu average 1\n").unwrap();
        fs::create_dir(dir.path().join("wing")).unwrap();
        fs::write(dir.path().join("wing/b.systems"), "vav simple 10\n").unwrap();
        fs::write(dir.path().join("bad.systems"), "vav verySimple 1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let outcome = recommend_directory(&Catalog::builtin(), dir.path()).unwrap();
        assert_eq!(outcome.stats.files, 3);
        assert_eq!(outcome.stats.recommended, 2);
        assert_eq!(outcome.stats.errors, 1);
        assert_eq!(outcome.results[0].0, "a.systems");
        assert_eq!(outcome.results[0].1.total_devices, 2);
        assert_eq!(outcome.results[1].1.total_devices, 10);
        assert!(outcome.failures[0].1.contains("Unknown system configuration"));
    }
}
