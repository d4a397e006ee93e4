//! Evaluation item catalog
//!
//! Scans a flat directory of pattern-named image files once at startup and
//! produces the ordered, indexable list of evaluation items the navigation
//! handlers serve from. The catalog is immutable after construction.
//!
//! Filenames follow the fixed pattern `<class>__<metric>__<case>.png`, where
//! the class segment encodes spaces as single underscores.

use std::collections::HashMap;
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::{info, warn};

/// Characters that must not appear raw in a URL path segment.
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One comparison task, immutable after construction.
///
/// `position` is the only external handle into the catalog; `derived_id` is
/// a human-readable composite key. Neither survives a re-scan of the source
/// directory, so they are per-process handles, not durable keys.
#[derive(Debug, Clone)]
pub struct EvaluationItem {
    pub position: usize,
    pub class_name: String,
    pub metric_name: String,
    pub case_name: String,
    pub derived_id: String,
    pub asset_location: String,
}

/// Class-name abbreviation table used when deriving evaluation ids.
/// Unknown classes fall back to "UNK".
pub fn default_abbreviations() -> HashMap<String, String> {
    [
        ("Copra Cake", "CC"),
        ("Cracked Corn", "CORN"),
        ("Feed Wheats", "FW"),
        ("Hard Pollard", "HP"),
        ("Jocky Oats", "JO"),
        ("Rice Bran", "RB"),
        ("US Soya", "SOY"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Split a filename stem on the two-part delimiter into exactly three
/// segments, decoding class-name underscores back to spaces.
///
/// Returns None for anything that does not split into exactly three
/// non-empty segments; such filenames are skipped by the builder.
fn parse_stem(stem: &str) -> Option<(String, String, String)> {
    let mut segments = stem.split("__");
    let class_part = segments.next()?;
    let metric_part = segments.next()?;
    let case_part = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    if class_part.is_empty() || metric_part.is_empty() || case_part.is_empty() {
        return None;
    }
    Some((
        class_part.replace('_', " "),
        metric_part.to_string(),
        case_part.to_string(),
    ))
}

/// Scan `directory` for `.png` files and build the ordered item list.
///
/// Enumeration order is made deterministic by sorting on the tuple
/// (class, metric, case) before positions are assigned; filesystem order is
/// not trusted. Malformed filenames are skipped with a warning. A missing
/// directory or an empty match set yields an empty catalog, not an error —
/// the caller decides how to surface the "no items" condition.
pub fn build_catalog(
    directory: &Path,
    abbreviations: &HashMap<String, String>,
    url_prefix: &str,
) -> Vec<EvaluationItem> {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "Image directory not readable at {}: {} (serving an empty catalog)",
                directory.display(),
                e
            );
            return Vec::new();
        }
    };

    let mut parsed: Vec<(String, String, String, String)> = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let has_png_ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !has_png_ext {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non-UTF8 filename in {}", directory.display());
            continue;
        };
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match parse_stem(stem) {
            Some((class_name, metric_name, case_name)) => {
                parsed.push((class_name, metric_name, case_name, filename.to_string()));
            }
            None => {
                warn!("Could not parse filename '{}', skipping", filename);
            }
        }
    }

    // Sort key (class, metric, case) makes position assignment stable
    parsed.sort();

    let url_prefix = url_prefix.trim_end_matches('/');
    let items: Vec<EvaluationItem> = parsed
        .into_iter()
        .enumerate()
        .map(|(position, (class_name, metric_name, case_name, filename))| {
            let abbrev = abbreviations
                .get(&class_name)
                .map(String::as_str)
                .unwrap_or("UNK");
            let derived_id = format!("{}-{}-{}", abbrev, metric_name.to_uppercase(), case_name);
            let safe_filename = utf8_percent_encode(&filename, URL_UNSAFE).to_string();
            let asset_location = format!("{}/{}", url_prefix, safe_filename);
            EvaluationItem {
                position,
                class_name,
                metric_name,
                case_name,
                derived_id,
                asset_location,
            }
        })
        .collect();

    // Data-quality check: distinct filenames can abbreviate to the same id
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for item in &items {
        if let Some(first) = seen.insert(&item.derived_id, item.position) {
            warn!(
                "Duplicate derived id '{}' at positions {} and {}",
                item.derived_id, first, item.position
            );
        }
    }

    info!("Built {} evaluation items from {}", items.len(), directory.display());
    items
}

/// The immutable catalog plus neighbor computation for the navigation
/// cursor. Built once at startup and shared read-only across handlers.
#[derive(Debug, Default)]
pub struct Catalog {
    items: Vec<EvaluationItem>,
}

impl Catalog {
    pub fn new(items: Vec<EvaluationItem>) -> Self {
        Self { items }
    }

    /// Range-checked lookup; negative positions are rejected the same way
    /// as positions past the end.
    pub fn get(&self, position: i64) -> Option<&EvaluationItem> {
        if position < 0 {
            return None;
        }
        self.items.get(position as usize)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn previous(&self, position: usize) -> Option<usize> {
        position.checked_sub(1)
    }

    pub fn next(&self, position: usize) -> Option<usize> {
        if position + 1 < self.items.len() {
            Some(position + 1)
        } else {
            None
        }
    }
}
