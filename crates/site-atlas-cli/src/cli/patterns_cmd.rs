//! `site-atlas patterns <file>`: detect URL patterns and page types.

use crate::cli::output::{self, OutputMode, Styled};
use crate::input::read_url_list;
use anyhow::Result;
use serde::Serialize;
use site_atlas::patterns::{summarize_tree, SitemapNode};
use site_atlas::{build_tree, detect_patterns, parse_list, PageType, UrlPatternGroup};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct PatternReport {
    pub generated_at: String,
    pub url_count: usize,
    pub patterns: Vec<UrlPatternGroup>,
    pub nodes: Vec<SitemapNode>,
}

impl PatternReport {
    /// Page-type tallies over leaf nodes, in a stable order.
    pub fn page_type_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes.iter().filter(|n| n.is_leaf) {
            *counts.entry(page_type_name(node.page_type).to_string()).or_insert(0) += 1;
        }
        counts
    }
}

pub fn build_report<S: AsRef<str>>(lines: &[S]) -> PatternReport {
    let urls = parse_list(lines);
    let tree = build_tree(&urls);
    let patterns = detect_patterns(&tree);
    let nodes = summarize_tree(&tree, &patterns);
    PatternReport {
        generated_at: output::timestamp(),
        url_count: urls.len(),
        patterns,
        nodes,
    }
}

pub fn run(path: &Path, mode: OutputMode) -> Result<()> {
    let lines = read_url_list(path)?;
    let report = build_report(&lines);

    if mode.json {
        return output::print_json(&report);
    }

    let s = mode.styled();
    if !mode.quiet {
        eprintln!(
            "  {} {} in {}",
            s.ok_sym(),
            output::plural(report.patterns.len(), "pattern"),
            output::plural(report.url_count, "URL")
        );
        eprintln!();
    }
    print!("{}", render_report(&report, &s));
    Ok(())
}

pub fn render_report(report: &PatternReport, s: &Styled) -> String {
    let mut out = String::new();
    for group in &report.patterns {
        let host = group.hostname.as_deref().unwrap_or("");
        let _ = writeln!(
            out,
            "{} {}{}  {}  {}",
            s.dim(&group.id),
            s.dim(host),
            s.bold(&group.display_pattern),
            s.cyan(page_type_name(group.page_type)),
            output::plural(group.matched_urls.len(), "URL"),
        );
        let _ = writeln!(out, "    {}", group.explanation.summary);
        let _ = writeln!(out, "    {}", s.dim(&group.explanation.page_type_reason));
    }

    let counts = report.page_type_counts();
    if !counts.is_empty() {
        let tally: Vec<String> = counts
            .iter()
            .map(|(name, count)| format!("{count} {name}"))
            .collect();
        if !report.patterns.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "Pages: {}", tally.join(", "));
    }
    out
}

fn page_type_name(page_type: PageType) -> &'static str {
    match page_type {
        PageType::Listing => "listing",
        PageType::Detail => "detail",
        PageType::Static => "static",
        PageType::Pagination => "pagination",
        PageType::Unknown => "unknown",
    }
}
