//! CSV solutions report for a hand-picked set of techniques
use crate::error::{Result, TechfindError};
use crate::search::SearchEngine;
use crate::technique::Technique;
use chrono::{DateTime, Local};
use log::debug;
use std::sync::Arc;

/// Split a comma-separated list of technique names, dropping blanks.
pub fn split_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve every name to its best search hit. The first name without any hit
/// aborts the report.
pub fn resolve_techniques(engine: &SearchEngine, names: &[String]) -> Result<Vec<Arc<Technique>>> {
    names
        .iter()
        .map(|name| {
            let top = engine.search(name).into_iter().next();
            match top {
                Some(hit) => {
                    debug!("'{}' resolved to technique {}", name, hit.technique.id);
                    Ok(hit.technique)
                }
                None => Err(TechfindError::TechniqueNotFound(name.clone())),
            }
        })
        .collect()
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One row per technique: its name followed by its solutions, padded with
/// `-` up to the longest solution list.
pub fn solutions_csv(techniques: &[Arc<Technique>]) -> String {
    let width = techniques.iter().map(|t| t.solutions.len()).max().unwrap_or(0);

    let mut header = vec!["Technique".to_string()];
    header.extend((1..=width).map(|i| format!("Solution {i}")));

    let mut output = header.join(",");
    output.push('\n');

    for technique in techniques {
        let mut row = vec![csv_field(&technique.name)];
        row.extend(technique.solutions.iter().map(|s| csv_field(s)));
        row.extend(std::iter::repeat("-".to_string()).take(width - technique.solutions.len()));
        output.push_str(&row.join(","));
        output.push('\n');
    }

    output
}

pub fn default_report_name(now: DateTime<Local>) -> String {
    format!("solutions_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
