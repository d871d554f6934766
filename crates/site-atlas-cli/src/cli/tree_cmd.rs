//! `site-atlas tree <file>`: print the path hierarchy of a URL list.

use crate::cli::output::{self, OutputMode, Styled};
use crate::input::read_url_list;
use anyhow::Result;
use serde::Serialize;
use site_atlas::tree::PathTreeNode;
use site_atlas::{build_tree, parse_list};
use std::fmt::Write as _;
use std::path::Path;

#[derive(Serialize)]
struct TreeReport<'a> {
    generated_at: String,
    input_lines: usize,
    url_count: usize,
    tree: &'a PathTreeNode,
}

pub fn run(path: &Path, mode: OutputMode) -> Result<()> {
    let lines = read_url_list(path)?;
    let urls = parse_list(&lines);
    let tree = build_tree(&urls);

    if mode.json {
        return output::print_json(&TreeReport {
            generated_at: output::timestamp(),
            input_lines: lines.len(),
            url_count: urls.len(),
            tree: &tree,
        });
    }

    let s = mode.styled();
    if !mode.quiet {
        eprintln!(
            "  {} {} from {} lines",
            s.ok_sym(),
            output::plural(urls.len(), "unique URL"),
            lines.len()
        );
        eprintln!();
    }
    print!("{}", render_tree(&tree, &s));
    Ok(())
}

/// Box-drawing rendering of `root`, one node per line.
pub fn render_tree(root: &PathTreeNode, s: &Styled) -> String {
    let mut out = String::new();
    // (node, prefix for this line, prefix for its children, connector)
    let mut stack: Vec<(&PathTreeNode, String, &str)> = vec![(root, String::new(), "")];

    while let Some((node, prefix, connector)) = stack.pop() {
        let _ = writeln!(out, "{prefix}{connector}{}", node_label(node, s));

        let child_prefix = match connector {
            "" => prefix.clone(),
            "└── " => format!("{prefix}    "),
            _ => format!("{prefix}│   "),
        };
        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate().rev() {
            let connector = if i == last { "└── " } else { "├── " };
            stack.push((child, child_prefix.clone(), connector));
        }
    }
    out
}

fn node_label(node: &PathTreeNode, s: &Styled) -> String {
    if node.is_leaf() {
        return node.segment.clone();
    }
    let count = output::plural(node.url_count(), "URL");
    format!("{} {}", s.bold(&node.segment), s.dim(&format!("({count})")))
}
