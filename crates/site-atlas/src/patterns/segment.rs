//! Infer the value shape of a set of sibling path segments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(19|20)\d{2}$").unwrap());

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)+$").unwrap());

/// Share of slug-shaped values above which a mixed set still counts as slugs.
const SLUG_MAJORITY: f64 = 0.7;

/// Value shape of one path position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentShape {
    /// A fixed literal shared by every URL in a group.
    Static,
    Numeric,
    Uuid,
    /// Four-digit years between 1900 and 2099.
    Date,
    Slug,
    Mixed,
}

impl SegmentShape {
    /// Placeholder used in display patterns; `None` for literal segments.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            SegmentShape::Static => None,
            SegmentShape::Numeric => Some("{id}"),
            SegmentShape::Uuid => Some("{uuid}"),
            SegmentShape::Date => Some("{year}"),
            SegmentShape::Slug => Some("{slug}"),
            SegmentShape::Mixed => Some("{name}"),
        }
    }

    /// Short human description for explanations.
    pub fn describe(self) -> &'static str {
        match self {
            SegmentShape::Static => "a fixed segment",
            SegmentShape::Numeric => "a numeric ID",
            SegmentShape::Uuid => "a UUID",
            SegmentShape::Date => "a four-digit year",
            SegmentShape::Slug => "a text slug",
            SegmentShape::Mixed => "a fixed page name",
        }
    }
}

pub fn is_numeric(value: &str) -> bool {
    NUMERIC_RE.is_match(value)
}

pub fn is_year(value: &str) -> bool {
    YEAR_RE.is_match(value)
}

pub fn is_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

pub fn is_slug(value: &str) -> bool {
    SLUG_RE.is_match(value)
}

/// Whether a single value looks like a generated identifier rather than a name.
pub fn is_dynamic_value(value: &str) -> bool {
    is_numeric(value) || is_uuid(value) || is_slug(value)
}

/// Classify a set of sibling segment values.
///
/// Priority: numeric (or date when every value is a year), then UUID, then
/// slug (all values, or a >70% majority), else mixed. An empty set is mixed.
pub fn classify_segment<S: AsRef<str>>(values: &[S]) -> SegmentShape {
    if values.is_empty() {
        return SegmentShape::Mixed;
    }

    let all = |pred: fn(&str) -> bool| values.iter().all(|v| pred(v.as_ref()));

    if all(is_numeric) {
        if all(is_year) {
            return SegmentShape::Date;
        }
        return SegmentShape::Numeric;
    }
    if all(is_uuid) {
        return SegmentShape::Uuid;
    }
    if all(is_slug) {
        return SegmentShape::Slug;
    }

    let slug_count = values.iter().filter(|v| is_slug(v.as_ref())).count();
    if slug_count as f64 / values.len() as f64 > SLUG_MAJORITY {
        return SegmentShape::Slug;
    }

    SegmentShape::Mixed
}
