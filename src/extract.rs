use crate::types::ViolationRecord;
use log::{debug, info};
use scraper::{ElementRef, Html, Selector};

const CONTAINER_ID: &str = "bodyPrint123";

/// Field categories recognised on the results page, matched by substring
/// because the site wraps label text in extra markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OccurredAt,
    Location,
    ViolationType,
    Status,
}

impl Field {
    fn classify(label: &str) -> Option<Field> {
        if label.contains("Thời gian vi phạm") {
            Some(Field::OccurredAt)
        } else if label.contains("Địa điểm vi phạm") {
            Some(Field::Location)
        } else if label.contains("Hành vi vi phạm") {
            Some(Field::ViolationType)
        } else if label.contains("Trạng thái") {
            Some(Field::Status)
        } else {
            None
        }
    }
}

/// Record under construction.
#[derive(Debug, Default)]
struct Pending {
    occurred_at: Option<String>,
    location: Option<String>,
    violation_type: Option<String>,
    status: Option<String>,
}

impl Pending {
    /// A timestamp arriving when one is already set starts the next record.
    fn is_boundary(&self, field: Field) -> bool {
        field == Field::OccurredAt && self.occurred_at.is_some()
    }

    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::OccurredAt => &mut self.occurred_at,
            Field::Location => &mut self.location,
            Field::ViolationType => &mut self.violation_type,
            Field::Status => &mut self.status,
        };
        *slot = Some(value);
    }

    fn finish(self) -> Option<ViolationRecord> {
        let occurred_at = self.occurred_at?;
        Some(ViolationRecord {
            occurred_at,
            location: self.location,
            violation_type: self.violation_type,
            status: self.status,
        })
    }
}

struct Selectors {
    container: Selector,
    group: Selector,
    label: Selector,
    value: Selector,
}

impl Selectors {
    fn new() -> Selectors {
        Selectors {
            container: parse_selector(&format!("#{}", CONTAINER_ID)),
            group: parse_selector(".form-group"),
            label: parse_selector("label span"),
            value: parse_selector(".col-md-9"),
        }
    }
}

// Only ever called with the literal selectors above.
fn parse_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {:?}: {}", css, e))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Label/value pairs of the results container, in document order.
fn field_groups(document: &Html, selectors: &Selectors) -> Option<Vec<(String, String)>> {
    let container = document.select(&selectors.container).next()?;
    let groups = container
        .select(&selectors.group)
        .filter_map(|group| {
            let label = group.select(&selectors.label).next()?;
            let value = group.select(&selectors.value).next()?;
            Some((text_of(label), text_of(value)))
        })
        .collect();
    Some(groups)
}

/// Rebuilds violation records from the flat label/value list of a results page.
///
/// A missing results container yields no records rather than an error.
pub fn extract(html: &str) -> Vec<ViolationRecord> {
    let document = Html::parse_document(html);
    let groups = match field_groups(&document, &Selectors::new()) {
        Some(groups) => groups,
        None => {
            info!("No violations container found");
            return vec![];
        }
    };

    let mut records = vec![];
    let mut current = Pending::default();
    for (label, value) in groups {
        let field = match Field::classify(&label) {
            Some(field) => field,
            None => {
                debug!("Ignoring field {:?}", label);
                continue;
            }
        };
        if current.is_boundary(field) {
            records.extend(std::mem::take(&mut current).finish());
        }
        current.set(field, value);
    }
    records.extend(current.finish());

    info!("Extracted {} violation(s)", records.len());
    records
}
