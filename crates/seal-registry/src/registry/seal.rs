use std::fmt::Write as _;

use super::upload::SealImage;

const SEAL_RED: &str = "#c0392b";
const FONT_FAMILY: &str = "'Noto Serif JP', serif";
const PLACEHOLDER: &str = "印";

/// Render the seal impression preview as a standalone SVG document.
///
/// An uploaded image is clipped to the inner ring. Otherwise the seal name is lettered in:
/// one character centred, two stacked, three or more split into two vertical columns read
/// right to left.
pub fn render_seal_svg(seal_name: &str, image: Option<&SealImage>, size: u32) -> String {
    let display = if seal_name.trim().is_empty() {
        PLACEHOLDER
    } else {
        seal_name.trim()
    };
    let chars: Vec<char> = display.chars().filter(|ch| !ch.is_whitespace()).collect();

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 100 100" aria-label="{}の印影">"#,
        escape(seal_name)
    );
    let _ = write!(
        svg,
        r#"<circle cx="50" cy="50" r="47" fill="none" stroke="{SEAL_RED}" stroke-width="2.5"/>"#
    );
    let _ = write!(
        svg,
        r#"<circle cx="50" cy="50" r="42" fill="none" stroke="{SEAL_RED}" stroke-width="1.5"/>"#
    );

    match image {
        Some(image) => {
            let _ = write!(
                svg,
                r#"<defs><clipPath id="seal-clip"><circle cx="50" cy="50" r="41"/></clipPath></defs><image href="{}" x="9" y="9" width="82" height="82" preserveAspectRatio="xMidYMid slice" clip-path="url(#seal-clip)"/>"#,
                image.to_data_url()
            );
        }
        None => {
            for glyph in layout(&chars) {
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}" font-family="{FONT_FAMILY}" fill="{SEAL_RED}" font-weight="bold">{}</text>"#,
                    glyph.x,
                    glyph.y,
                    glyph.font_size,
                    escape(&glyph.ch.to_string())
                );
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Glyph {
    ch: char,
    x: f32,
    y: f32,
    font_size: u32,
}

fn layout(chars: &[char]) -> Vec<Glyph> {
    match chars.len() {
        0 => Vec::new(),
        1 => vec![Glyph {
            ch: chars[0],
            x: 50.0,
            y: 52.0,
            font_size: 32,
        }],
        2 => chars
            .iter()
            .zip([38.0, 64.0])
            .map(|(&ch, y)| Glyph {
                ch,
                x: 50.0,
                y,
                font_size: 24,
            })
            .collect(),
        len => {
            let per_column = len.div_ceil(2);
            let font_size = if len >= 5 { 16 } else { 20 };
            let step = 56.0 / per_column as f32;
            let top = 50.0 - step * (per_column as f32 - 1.0) / 2.0;
            chars
                .iter()
                .enumerate()
                .map(|(index, &ch)| {
                    let column = index / per_column;
                    let row = index % per_column;
                    Glyph {
                        ch,
                        x: if column == 0 { 62.0 } else { 38.0 },
                        y: top + step * row as f32,
                        font_size,
                    }
                })
                .collect()
        }
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}
