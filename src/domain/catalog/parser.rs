//! Line-oriented framework document parser.
//!
//! A single forward scan over the document lines maintains a current
//! [`Section`] tag. Sections are entered by recognizing fixed heading
//! markers and exited implicitly when the next marker is seen; unknown
//! headings leave the current section untouched. The scan is a pure
//! function of the document text: re-parsing the same text always yields
//! the same [`FrameworkDetail`].

use super::detail::{FrameworkComponent, FrameworkDetail, WorkedExample};
use super::index::FrameworkIndexEntry;
use super::CatalogError;

const URL_HEADING: &str = "## URL";
const SCENARIOS_HEADING: &str = "## Scenarios";
const OVERVIEW_HEADING: &str = "## Overview";
const COMPONENTS_HEADING: &str = "## Components";
const PROS_HEADING: &str = "## Pros";
const CONS_HEADING: &str = "## Cons";
const EXAMPLES_HEADING: &str = "## Best Practices";

/// Which accumulator the scan is currently feeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Url,
    Scenarios,
    Overview,
    Components,
    Pros,
    Cons,
    Examples,
}

/// Parses one framework document into a [`FrameworkDetail`].
///
/// Fails only when the document carries no recognizable structure at
/// all (no title line and no known section heading); individually
/// malformed lines are skipped.
pub fn parse_framework_document(
    text: &str,
    entry: &FrameworkIndexEntry,
) -> Result<FrameworkDetail, CatalogError> {
    let mut detail = FrameworkDetail {
        id: entry.id,
        name: entry.name.clone(),
        name_en: String::new(),
        url: String::new(),
        scenarios: Vec::new(),
        overview: String::new(),
        components: Vec::new(),
        pros: Vec::new(),
        cons: Vec::new(),
        examples: Vec::new(),
    };

    let mut section = Section::None;
    let mut in_table = false;
    let mut current_example: Option<WorkedExample> = None;
    let mut saw_marker = false;

    for raw_line in text.lines() {
        let line = raw_line.trim();

        // Title line supplies the English name exactly once.
        if line.starts_with("# ") && !line.starts_with("## ") && detail.name_en.is_empty() {
            detail.name_en = line[2..].replace(" Framework", "").trim().to_string();
            saw_marker = true;
            continue;
        }

        if let Some(next) = section_for_heading(line) {
            if next != section {
                finish_example(&mut current_example, &mut detail.examples);
            }
            section = next;
            in_table = false;
            saw_marker = true;
            continue;
        }

        match section {
            Section::None => {}
            Section::Url => {
                if !line.is_empty() && detail.url.is_empty() {
                    detail.url = line.to_string();
                }
            }
            Section::Scenarios => {
                if let Some(item) = line.strip_prefix("- ") {
                    detail.scenarios.push(item.trim().to_string());
                }
            }
            Section::Overview => {
                if !line.is_empty() && !line.starts_with('#') {
                    detail.overview.push_str(line);
                    detail.overview.push(' ');
                }
            }
            Section::Components => {
                if line.starts_with('|') {
                    // Separator rows are skipped wherever they appear.
                    if line.contains("---") {
                        continue;
                    }
                    if !in_table {
                        if line.contains("Component") {
                            in_table = true;
                        }
                        continue;
                    }
                    let cells: Vec<&str> = line
                        .split('|')
                        .map(str::trim)
                        .filter(|cell| !cell.is_empty())
                        .collect();
                    if cells.len() >= 3 {
                        detail.components.push(FrameworkComponent {
                            name_native: cells[0].to_string(),
                            name_en: cells[1].to_string(),
                            description: cells[2].to_string(),
                        });
                    }
                    // Rows with fewer than three non-empty cells are
                    // silently skipped.
                }
            }
            Section::Pros => {
                if let Some(item) = line.strip_prefix("- ") {
                    detail.pros.push(item.trim().to_string());
                }
            }
            Section::Cons => {
                if let Some(item) = line.strip_prefix("- ") {
                    detail.cons.push(item.trim().to_string());
                }
            }
            Section::Examples => {
                if let Some(title) = line.strip_prefix("### ") {
                    finish_example(&mut current_example, &mut detail.examples);
                    current_example = Some(WorkedExample {
                        title: title.trim().to_string(),
                        body: String::new(),
                    });
                } else if let Some(example) = current_example.as_mut() {
                    if !line.is_empty() && !line.starts_with('#') {
                        example.body.push_str(line);
                        example.body.push('\n');
                    }
                }
            }
        }
    }

    finish_example(&mut current_example, &mut detail.examples);
    detail.overview = detail.overview.trim().to_string();

    if !saw_marker {
        return Err(CatalogError::Parse {
            path: entry.document_path.clone(),
        });
    }

    Ok(detail)
}

fn section_for_heading(line: &str) -> Option<Section> {
    if line.starts_with(URL_HEADING) {
        Some(Section::Url)
    } else if line.starts_with(SCENARIOS_HEADING) {
        Some(Section::Scenarios)
    } else if line.starts_with(OVERVIEW_HEADING) {
        Some(Section::Overview)
    } else if line.starts_with(COMPONENTS_HEADING) {
        Some(Section::Components)
    } else if line.starts_with(PROS_HEADING) {
        Some(Section::Pros)
    } else if line.starts_with(CONS_HEADING) {
        Some(Section::Cons)
    } else if line.starts_with(EXAMPLES_HEADING) {
        Some(Section::Examples)
    } else {
        None
    }
}

fn finish_example(current: &mut Option<WorkedExample>, examples: &mut Vec<WorkedExample>) {
    if let Some(example) = current.take() {
        examples.push(example);
    }
}
