use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::SelectorError;

#[cfg(test)]
mod tests;

static SEGMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?:\.(?P<name>[A-Za-z_][\w-]*)|\.(?P<dot_wild>\*)|\.?\[\s*(?:(?P<index>-?\d+)|(?P<wild>\*)|'(?P<single>[^']*)'|"(?P<double>[^"]*)")\s*\])"#,
    )
    .expect("selector segment pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Wildcard,
    Index(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    segments: Vec<Segment>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SelectorError::Empty);
        }

        let (body, body_offset) = match trimmed.strip_prefix('$') {
            Some(rest) => (rest.to_string(), 1),
            None if trimmed.starts_with('.') || trimmed.starts_with('[') => {
                (trimmed.to_string(), 0)
            }
            // Bare leading name, e.g. "analysis.overview".
            None => (format!(".{trimmed}"), 0),
        };

        let mut segments = Vec::<Segment>::new();
        let mut offset = 0usize;
        while offset < body.len() {
            let rest = &body[offset..];
            let Some(captures) = SEGMENT_PATTERN.captures(rest) else {
                return Err(SelectorError::Unsupported {
                    selector: input.to_string(),
                    offset: offset + body_offset,
                    rest: rest.to_string(),
                });
            };

            let segment = if let Some(name) = captures.name("name") {
                Segment::Field(name.as_str().to_string())
            } else if captures.name("dot_wild").is_some() || captures.name("wild").is_some() {
                Segment::Wildcard
            } else if let Some(index) = captures.name("index") {
                let parsed = index.as_str().parse::<i64>().map_err(|_| {
                    SelectorError::IndexOutOfRange {
                        selector: input.to_string(),
                        index: index.as_str().to_string(),
                    }
                })?;
                Segment::Index(parsed)
            } else if let Some(quoted) = captures.name("single").or_else(|| captures.name("double"))
            {
                Segment::Field(quoted.as_str().to_string())
            } else {
                return Err(SelectorError::Unsupported {
                    selector: input.to_string(),
                    offset: offset + body_offset,
                    rest: rest.to_string(),
                });
            };

            segments.push(segment);
            offset += captures.get(0).map(|whole| whole.end()).unwrap_or(rest.len());
        }

        Ok(Self {
            source: input.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn find<'a>(&self, document: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![document];
        for segment in &self.segments {
            let mut next = Vec::<&'a Value>::new();
            for node in current {
                step(segment, node, &mut next);
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn step<'a>(segment: &Segment, node: &'a Value, out: &mut Vec<&'a Value>) {
    match (segment, node) {
        (Segment::Field(name), Value::Object(map)) => {
            if let Some(child) = map.get(name) {
                out.push(child);
            }
        }
        (Segment::Wildcard, Value::Array(items)) => out.extend(items.iter()),
        (Segment::Wildcard, Value::Object(map)) => out.extend(map.values()),
        (Segment::Index(index), Value::Array(items)) => {
            if let Some(position) = resolve_index(*index, items.len()) {
                out.push(&items[position]);
            }
        }
        _ => {}
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let position = if index < 0 { len + index } else { index };
    if (0..len).contains(&position) {
        usize::try_from(position).ok()
    } else {
        None
    }
}
