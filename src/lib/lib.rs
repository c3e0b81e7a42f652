use std::io::{Result, Write};

use nalgebra::geometry::Point2;

pub mod geometry;
pub mod knob;
pub mod parse;
pub mod patterns;

#[derive(Debug, thiserror::Error)]
pub enum JigsawError {
    #[error("degenerate edge from {start:?} to {end:?}")]
    DegenerateEdge { start: (f64, f64), end: (f64, f64) },

    #[error("knob circles cannot meet: hypotenuse {hypotenuse} is shorter than half base {base}")]
    Domain { hypotenuse: f64, base: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{orientation:?} edge at row {row}, column {column}: {source}")]
    EdgeFailed {
        orientation: patterns::Orientation,
        row: u32,
        column: u32,
        #[source]
        source: Box<JigsawError>,
    },

    #[error("failed to parse document: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Emit the document header. `width` and `height` are the canvas size, truncated to whole units.
pub fn svg_header(file: &mut dyn Write, width: f64, height: f64) -> Result<()> {
    write!(
        file,
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.0//EN" "http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd" [
<!ENTITY ns_svg "http://www.w3.org/2000/svg">
]>
<svg xmlns="&ns_svg;" width="{}" height="{}" overflow="visible">
    <g id="Layer_1">
"#,
        whole(width),
        whole(height)
    )
}

/// `v` truncated to a whole number, printed without going through an integer type
fn whole(v: f64) -> String {
    let s = format!("{:.0}", v.trunc());
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

pub fn svg_footer(file: &mut dyn Write) -> Result<()> {
    writeln!(file, "    </g>")?;
    writeln!(file, "</svg>")?;
    Ok(())
}

/// The rounded rectangle around the outside of the whole puzzle
pub fn rounded_rect(
    file: &mut dyn Write,
    width: f64,
    height: f64,
    corner_radius: f64,
    color: &str,
) -> Result<()> {
    writeln!(
        file,
        r#"        <rect x="0" y="0" rx="{r}" ry="{r}" width="{w}" height="{h}" fill="none" stroke="{color}"/>"#,
        r = svg_num(corner_radius),
        w = svg_num(width),
        h = svg_num(height),
        color = color,
    )
}

/// An open polyline through `points`, stroked but not filled
pub fn polyline(file: &mut dyn Write, points: &[Point2<f64>], color: &str) -> Result<()> {
    write!(
        file,
        r#"        <polyline fill="none" stroke="{color}" stroke-width="1" points=""#
    )?;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            write!(file, " ")?;
        }
        write!(file, "{},{}", svg_num(p.x), svg_num(p.y))?;
    }
    writeln!(file, r#""/>"#)
}

/// Format a coordinate for the document.
/// To keep the output compact, numbers that round nicely are printed in their minimal form,
/// anything else with six significant digits and no trailing zeros.
pub fn svg_num(v: f64) -> String {
    let s = if (v - v.round()).abs() < f64::EPSILON {
        format!("{:.0}", v.round())
    } else {
        let magnitude = v.abs().log10().floor() as i32;
        let decimals = (5 - magnitude).max(0) as usize;
        format!("{:.*}", decimals, v)
    };
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_num() {
        assert_eq!(svg_num(0.0), "0");
        assert_eq!(svg_num(-0.0), "0");
        assert_eq!(svg_num(96.0), "96");
        assert_eq!(svg_num(768.0), "768");
        assert_eq!(svg_num(38.4), "38.4");
        assert_eq!(svg_num(25.6), "25.6");
        assert_eq!(svg_num(-1.5), "-1.5");
        assert_eq!(svg_num(123.456789), "123.457");
        assert_eq!(svg_num(0.000123456789), "0.000123457");
        assert_eq!(svg_num(-0.0000001), "-0.0000001");
    }

    #[test]
    fn test_svg_num_past_integer_range() {
        assert_eq!(svg_num(1e19), "10000000000000000000");
        assert_eq!(svg_num(-2.5e19), "-25000000000000000000");
        assert_eq!(svg_num(1e300).len(), 301);
    }

    #[test]
    fn test_header_past_integer_range() {
        let mut out = Vec::new();
        svg_header(&mut out, 1e19, 95.9).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("width=\"10000000000000000000\" height=\"95\""));
    }

    #[test]
    fn test_polyline() {
        let mut out = Vec::new();
        polyline(
            &mut out,
            &[Point2::new(0.0, 0.0), Point2::new(96.0, 12.5)],
            "#000000",
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "        <polyline fill=\"none\" stroke=\"#000000\" stroke-width=\"1\" points=\"0,0 96,12.5\"/>\n"
        );
    }

    #[test]
    fn test_header_and_footer() {
        let mut out = Vec::new();
        svg_header(&mut out, 768.0, 960.0).unwrap();
        rounded_rect(&mut out, 768.0, 960.0, 25.6, "red").unwrap();
        svg_footer(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n"));
        assert!(s.contains("width=\"768\" height=\"960\" overflow=\"visible\""));
        assert!(s.contains(
            "<rect x=\"0\" y=\"0\" rx=\"25.6\" ry=\"25.6\" width=\"768\" height=\"960\" fill=\"none\" stroke=\"red\"/>"
        ));
        assert!(s.ends_with("    </g>\n</svg>\n"));
    }
}
