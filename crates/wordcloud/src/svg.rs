//! SVG rendering of a finished layout.
//!
//! Each placed word becomes one `<text>` element centered in its padded box.
//! Rotated words turn 90° counter-clockwise about that center. The layout is
//! computed with fixed-advance metrics, so text is drawn in a monospace face.

use std::fmt::Write as _;

use anyhow::Context;
use camino::Utf8Path;
use wordcloud_core::{CloudLayout, GlyphPlacement, Orientation};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#17becf",
];

/// Render `layout` as a standalone SVG document.
pub fn render(layout: &CloudLayout) -> String {
    let mut out = String::new();
    let (w, h) = (layout.width, layout.height);
    let _ = write!(out, r#"<svg xmlns="{SVG_NS}" width="{w}" height="{h}""#);
    let _ = writeln!(out, r#" viewBox="0 0 {w} {h}">"#);
    let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let placed = layout.outcomes.iter().filter_map(|o| o.placement());
    for (i, placement) in placed.enumerate() {
        write_word(&mut out, placement, PALETTE[i % PALETTE.len()]);
    }
    out.push_str("</svg>\n");
    out
}

/// Render `layout` and write it to `path`.
pub fn write(layout: &CloudLayout, path: &Utf8Path) -> anyhow::Result<()> {
    std::fs::write(path.as_std_path(), render(layout))
        .with_context(|| format!("failed to write {path}"))?;
    tracing::info!(path = %path, "wrote svg");
    Ok(())
}

fn write_word(out: &mut String, placement: &GlyphPlacement, fill: &str) {
    let cx = f64::from(placement.x) + f64::from(placement.width) / 2.0;
    let cy = f64::from(placement.y) + f64::from(placement.height) / 2.0;
    let transform = match placement.orientation {
        Orientation::Horizontal => String::new(),
        Orientation::Rotated => format!(r#" transform="rotate(-90 {cx} {cy})""#),
    };
    let size = placement.font_size;
    let word = escape(&placement.word);
    let _ = write!(out, r#"  <text x="{cx}" y="{cy}" font-family="monospace""#);
    let _ = write!(out, r#" font-size="{size:.2}" fill="{fill}" text-anchor="middle""#);
    let _ = writeln!(out, r#" dominant-baseline="central"{transform}>{word}</text>"#);
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
