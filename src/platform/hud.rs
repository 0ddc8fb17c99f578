//! Text runs to HUD markup
//!
//! The GPU pipeline draws no glyphs; the wasm host places each text run as an
//! absolutely positioned span over the canvas.

use std::fmt::Write;

use crate::renderer::color::Rgba;
use crate::renderer::draw::{TextAlign, TextRun};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn css_color(color: Rgba) -> String {
    let [r, g, b, a] = color.0;
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({},{},{},{:.3})", channel(r), channel(g), channel(b), a.clamp(0.0, 1.0))
}

/// One span per run; `scale` maps canvas pixels to CSS pixels.
/// Run positions are text baselines, as on a 2D canvas.
pub fn markup(texts: &[TextRun], scale: f32) -> String {
    let mut html = String::new();
    for run in texts {
        let size = run.size * scale;
        let left = run.pos.x * scale;
        let top = run.pos.y * scale - size;
        let shift = match run.align {
            TextAlign::Left => "",
            TextAlign::Center => "transform:translateX(-50%);",
        };
        let _ = write!(
            html,
            "<span style=\"position:absolute;left:{left:.1}px;top:{top:.1}px;font:bold {size:.1}px sans-serif;color:{};white-space:nowrap;{shift}\">{}</span>",
            css_color(run.color),
            escape(&run.text),
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn run(text: &str, align: TextAlign) -> TextRun {
        TextRun {
            pos: Vec2::new(100.0, 50.0),
            text: text.to_string(),
            size: 20.0,
            color: Rgba::WHITE,
            align,
        }
    }

    #[test]
    fn test_text_is_escaped() {
        let html = markup(&[run("<b>&", TextAlign::Left)], 1.0);
        assert!(html.contains("&lt;b&gt;&amp;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_positions_scale_and_centre() {
        let html = markup(&[run("Score", TextAlign::Center)], 0.5);
        assert!(html.contains("left:50.0px"));
        assert!(html.contains("top:15.0px"));
        assert!(html.contains("translateX(-50%)"));
        assert!(html.contains("rgba(255,255,255,1.000)"));
    }

    #[test]
    fn test_empty_runs_give_empty_markup() {
        assert!(markup(&[], 1.0).is_empty());
    }
}
