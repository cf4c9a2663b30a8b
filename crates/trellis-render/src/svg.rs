//! SVG serialization of a [`Scene`].

use crate::draw::{DrawOp, Stroke};
use crate::scene::Scene;
use std::fmt::Write as _;

pub(crate) fn render_scene(scene: &Scene) -> String {
    let mut out = String::new();
    let (w, h) = (fmt(scene.width), fmt(scene.height));
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for (layer, ops) in scene.layers() {
        if ops.is_empty() {
            continue;
        }
        let _ = write!(&mut out, r#"<g class="{}-layer">"#, layer.as_str());
        for op in ops {
            write_op(&mut out, op);
        }
        out.push_str("</g>");
    }
    out.push_str("</svg>\n");
    out
}

fn write_op(out: &mut String, op: &DrawOp) {
    match op {
        DrawOp::Circle {
            center,
            radius,
            fill,
            stroke,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}""#,
                fmt(center.x),
                fmt(center.y),
                fmt(*radius)
            );
            write_paint(out, fill.as_deref(), stroke.as_ref());
            out.push_str("/>");
        }
        DrawOp::Rect { rect, fill, stroke } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt(rect.min_x()),
                fmt(rect.min_y()),
                fmt(rect.width()),
                fmt(rect.height())
            );
            write_paint(out, fill.as_deref(), stroke.as_ref());
            out.push_str("/>");
        }
        DrawOp::Line { from, to, stroke } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                fmt(from.x),
                fmt(from.y),
                fmt(to.x),
                fmt(to.y)
            );
            write_stroke(out, stroke);
            out.push_str("/>");
        }
        DrawOp::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            stroke,
        } => {
            let _ = write!(
                out,
                r#"<path d="M{},{} C{},{} {},{} {},{}" fill="none""#,
                fmt(from.x),
                fmt(from.y),
                fmt(ctrl1.x),
                fmt(ctrl1.y),
                fmt(ctrl2.x),
                fmt(ctrl2.y),
                fmt(to.x),
                fmt(to.y)
            );
            write_stroke(out, stroke);
            out.push_str("/>");
        }
        DrawOp::Label {
            at,
            text,
            color,
            size,
        } => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-family="Arial, sans-serif" text-anchor="middle" dominant-baseline="central">"#,
                fmt(at.x),
                fmt(at.y),
                escape_xml(color),
                fmt(*size)
            );
            out.push_str(&escape_xml(text));
            out.push_str("</text>");
        }
    }
}

fn write_paint(out: &mut String, fill: Option<&str>, stroke: Option<&Stroke>) {
    let _ = write!(out, r#" fill="{}""#, escape_xml(fill.unwrap_or("none")));
    if let Some(stroke) = stroke {
        write_stroke(out, stroke);
    }
}

fn write_stroke(out: &mut String, stroke: &Stroke) {
    let _ = write!(
        out,
        r#" stroke="{}" stroke-width="{}""#,
        escape_xml(&stroke.color),
        fmt(stroke.width)
    );
    if let Some([dash, gap]) = stroke.dash {
        let _ = write!(out, r#" stroke-dasharray="{},{}""#, fmt(dash), fmt(gap));
    }
}

/// Three decimals at most, trailing zeros trimmed, `-0` folded to `0`.
fn fmt(v: f64) -> String {
    if !v.is_finite() || v.abs() < 0.0005 {
        return "0".to_string();
    }
    let mut s = format!("{v:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt(120.0), "120");
        assert_eq!(fmt(30.1), "30.1");
        assert_eq!(fmt(-0.0001), "0");
        assert_eq!(fmt(1.23456), "1.235");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_xml(r#"a<b & "c""#), "a&lt;b &amp; &quot;c&quot;");
    }
}
