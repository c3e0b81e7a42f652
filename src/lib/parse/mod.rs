//! Read back the polylines and border of a generated document
use nalgebra::geometry::Point2;
use roxmltree::{Document, Node, ParsingOptions};

use crate::JigsawError;

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
}

fn parse_document(data: &str) -> Result<Document<'_>, JigsawError> {
    // Our own header carries a DTD, so allow it
    Document::parse_with_options(
        data,
        ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| JigsawError::Parse(e.to_string()))
}

fn number(node: &Node, name: &str) -> Result<f64, JigsawError> {
    let value = node
        .attribute(name)
        .ok_or_else(|| JigsawError::Parse(format!("<{}> has no {}", node.tag_name().name(), name)))?;
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| JigsawError::Parse(format!("bad number {:?} for {}", value, name)))
}

/// Parse a `points` attribute, "x1,y1 x2,y2 ..."
pub fn parse_points(points: &str) -> Result<Vec<Point2<f64>>, JigsawError> {
    points
        .split_whitespace()
        .map(|pair| {
            let mut parts = pair.split(',');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(x), Some(y), None) => {
                    let x = x.parse::<f64>();
                    let y = y.parse::<f64>();
                    match (x, y) {
                        (Ok(x), Ok(y)) => Ok(Point2::new(x, y)),
                        _ => Err(JigsawError::Parse(format!("bad point {:?}", pair))),
                    }
                }
                _ => Err(JigsawError::Parse(format!("bad point {:?}", pair))),
            }
        })
        .collect()
}

/// Every polyline in the document, in document order
pub fn read_polylines(data: &str) -> Result<Vec<Vec<Point2<f64>>>, JigsawError> {
    let doc = parse_document(data)?;
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "polyline")
        .map(|n| {
            let points = n
                .attribute("points")
                .ok_or_else(|| JigsawError::Parse("<polyline> has no points".to_string()))?;
            parse_points(points)
        })
        .collect()
}

/// The rounded border rectangle, if the document has one
pub fn read_border(data: &str) -> Result<Option<Border>, JigsawError> {
    let doc = parse_document(data)?;
    let rect = doc
        .descendants()
        .find(|n| n.is_element() && n.tag_name().name() == "rect");
    match rect {
        Some(rect) => Ok(Some(Border {
            width: number(&rect, "width")?,
            height: number(&rect, "height")?,
            corner_radius: number(&rect, "rx")?,
        })),
        None => Ok(None),
    }
}
