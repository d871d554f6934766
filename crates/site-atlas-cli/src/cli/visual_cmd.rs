//! `site-atlas visual <manifest.json>`: cluster captured pages by look and
//! template.

use crate::cli::output::{self, OutputMode, Styled};
use crate::cli::progress;
use crate::input::load_manifest;
use anyhow::{Context, Result};
use serde::Serialize;
use site_atlas::visual::{
    group_by_dom_similarity, ClassifyStage, DomGroup, Evidence, PageSnapshot, SnapshotStatus,
    VisualPatternClassifier, VisualPatternGroup,
};
use site_atlas::AnalysisConfig;
use std::fmt::Write as _;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct VisualReport {
    pub generated_at: String,
    pub snapshot_count: usize,
    pub classified_count: usize,
    pub groups: Vec<VisualPatternGroup>,
    /// DOM-similarity clusters over every successful page that has a DOM.
    pub dom_templates: Vec<DomGroup>,
}

/// Run the classifier on a blocking worker so the spinner keeps ticking.
pub async fn classify<F>(
    snapshots: Vec<PageSnapshot>,
    config: AnalysisConfig,
    on_stage: F,
) -> Result<VisualReport>
where
    F: FnMut(ClassifyStage) + Send + 'static,
{
    tokio::task::spawn_blocking(move || build_report(&snapshots, config, on_stage))
        .await
        .context("visual classification task failed")
}

fn build_report<F>(
    snapshots: &[PageSnapshot],
    config: AnalysisConfig,
    on_stage: F,
) -> VisualReport
where
    F: FnMut(ClassifyStage),
{
    let dom_items = snapshots.iter().filter_map(|snap| match (&snap.status, &snap.dom_tree) {
        (SnapshotStatus::Success, Some(dom)) => Some((snap.url.as_str(), dom)),
        _ => None,
    });
    let dom_templates: Vec<DomGroup> =
        group_by_dom_similarity(dom_items, config.dom_group_threshold)
            .into_iter()
            .filter(|group| group.urls.len() >= 2)
            .collect();

    let classifier = VisualPatternClassifier::new(config);
    let groups = classifier.classify(snapshots, on_stage);

    VisualReport {
        generated_at: output::timestamp(),
        snapshot_count: snapshots.len(),
        classified_count: snapshots.iter().filter(|s| s.is_classifiable()).count(),
        groups,
        dom_templates,
    }
}

pub async fn run(manifest: &Path, config: AnalysisConfig, mode: OutputMode) -> Result<()> {
    let snapshots = load_manifest(manifest)?;

    let spinner = progress::create_spinner("loading screenshots", mode.interactive());
    let bar = spinner.clone();
    let report = classify(snapshots, config, move |stage| {
        progress::show_stage(&bar, stage)
    })
    .await?;
    spinner.finish_and_clear();

    if mode.json {
        return output::print_json(&report);
    }

    let s = mode.styled();
    if !mode.quiet {
        let sym = if report.classified_count == 0 {
            s.warn_sym()
        } else {
            s.ok_sym()
        };
        eprintln!(
            "  {sym} {} from {} of {}",
            output::plural(report.groups.len(), "visual pattern"),
            output::plural(report.classified_count, "usable snapshot"),
            report.snapshot_count
        );
        eprintln!();
    }
    print!("{}", render_report(&report, &s));
    Ok(())
}

pub fn render_report(report: &VisualReport, s: &Styled) -> String {
    let mut out = String::new();
    for group in &report.groups {
        let _ = writeln!(
            out,
            "{} {}  {}",
            s.bold(&group.label),
            s.dim(&format!("[{}]", evidence_name(group))),
            output::plural(group.member_urls.len(), "page"),
        );
        for url in &group.member_urls {
            let marker = if *url == group.representative_url { "*" } else { "-" };
            let _ = writeln!(out, "  {marker} {url}");
        }
    }

    if !report.dom_templates.is_empty() {
        if !report.groups.is_empty() {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", s.bold("DOM templates"));
        for template in &report.dom_templates {
            let _ = writeln!(
                out,
                "  {}  {}  {}",
                template.representative_url,
                output::plural(template.urls.len(), "page"),
                s.dim(&format!("min similarity {:.2}", template.similarity)),
            );
        }
    }
    out
}

fn evidence_name(group: &VisualPatternGroup) -> &'static str {
    match group.evidence {
        Evidence::Visual => "visual",
        Evidence::Structural => "structural",
        Evidence::Both => "visual + structural",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use site_atlas::visual::SimplifiedDomNode;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    fn write_png(dir: &Path, name: &str, dark_left: bool) {
        let img = RgbImage::from_fn(64, 64, |x, _| {
            if (x < 32) == dark_left {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.join(name), buf).unwrap();
    }

    fn manifest_fixture(dir: &Path) -> std::path::PathBuf {
        std::fs::create_dir_all(dir.join("shots")).unwrap();
        write_png(&dir.join("shots"), "1.png", true);
        write_png(&dir.join("shots"), "2.png", true);
        write_png(&dir.join("shots"), "3.png", false);
        let manifest = r#"[
            {"url": "https://a.com/p/1", "image": "shots/1.png",
             "dom": {"tag": "html", "children": [{"tag": "main"}]}},
            {"url": "https://a.com/p/2", "image": "shots/2.png",
             "dom": {"tag": "html", "children": [{"tag": "main"}]}},
            {"url": "https://a.com/home", "image": "shots/3.png",
             "dom": {"tag": "html", "children": [{"tag": "nav"}]}},
            {"url": "https://a.com/gone", "status": "error", "image": "shots/missing.png"}
        ]"#;
        let path = dir.join("manifest.json");
        std::fs::write(&path, manifest).unwrap();
        path
    }

    #[test]
    fn test_classify_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest_fixture(dir.path());
        let snapshots = load_manifest(&path).unwrap();

        let stages = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&stages);
        let report = tokio_test::block_on(classify(
            snapshots,
            AnalysisConfig::default(),
            move |stage| seen.lock().unwrap().push(stage),
        ))
        .unwrap();

        assert_eq!(report.snapshot_count, 4);
        assert_eq!(report.classified_count, 3);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(
            report.groups[0].member_urls,
            vec!["https://a.com/p/1", "https://a.com/p/2"]
        );
        assert_eq!(report.dom_templates.len(), 1);
        assert_eq!(report.dom_templates[0].representative_url, "https://a.com/p/1");
        assert_eq!(
            stages.lock().unwrap().last(),
            Some(&ClassifyStage::Complete)
        );

        let text = render_report(&report, &Styled::plain());
        assert!(text.starts_with("Visual pattern 1 [visual + structural]  2 pages\n"));
        assert!(text.contains("  * https://a.com/p/1\n"));
        assert!(text.contains("  - https://a.com/p/2\n"));
        assert!(text.contains("DOM templates"));
    }

    #[test]
    fn test_render_empty_report() {
        let report = build_report(&[], AnalysisConfig::default(), |_| {});
        assert!(report.groups.is_empty());
        assert_eq!(render_report(&report, &Styled::plain()), "");
    }

    #[test]
    fn test_dom_templates_skip_failed_pages() {
        let dom = SimplifiedDomNode::new("html");
        let snapshots = vec![
            PageSnapshot::new("https://a.com/1", SnapshotStatus::Success).with_dom(dom.clone()),
            PageSnapshot::new("https://a.com/2", SnapshotStatus::Blocked).with_dom(dom.clone()),
            PageSnapshot::new("https://a.com/3", SnapshotStatus::Success).with_dom(dom),
        ];
        let report = build_report(&snapshots, AnalysisConfig::default(), |_| {});
        assert_eq!(report.dom_templates.len(), 1);
        assert_eq!(
            report.dom_templates[0].urls,
            vec!["https://a.com/1", "https://a.com/3"]
        );
    }
}
