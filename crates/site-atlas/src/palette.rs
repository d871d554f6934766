//! Fixed color palette for pattern legends.

/// Colors handed out to pattern groups in discovery order.
pub const PATTERN_COLORS: [&str; 12] = [
    "#4A90D9", "#50B83C", "#F49342", "#9C6ADE", "#47C1BF", "#DE3618", "#EEC200", "#8C6B58",
    "#5C6AC4", "#E06B8A", "#00848E", "#B98900",
];

/// Color for nodes that belong to no pattern group.
pub const UNGROUPED_COLOR: &str = "#E0E0E0";

/// Color for the `index`-th discovered group, wrapping around the palette.
pub fn pattern_color(index: usize) -> &'static str {
    PATTERN_COLORS[index % PATTERN_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_color_wraps() {
        assert_eq!(pattern_color(0), "#4A90D9");
        assert_eq!(pattern_color(12), pattern_color(0));
        assert_ne!(pattern_color(0), pattern_color(1));
    }
}
