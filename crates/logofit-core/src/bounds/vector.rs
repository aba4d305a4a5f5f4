use super::ShapeBounds;
use crate::geom::{Affine, Extent, affine_from_svg, include, point};
use crate::path::{ellipse_extent, path_extent};
use crate::{Error, Result};
use roxmltree::Node;
use serde::Serialize;
use std::str::FromStr;

/// Containers whose children are never rendered directly.
const NON_RENDERED: &[&str] = &[
    "defs",
    "clipPath",
    "mask",
    "symbol",
    "pattern",
    "marker",
    "linearGradient",
    "radialGradient",
    "metadata",
    "title",
    "desc",
];

/// Where the reported bounds came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundsSource {
    /// Union of the visible primitives.
    Content,
    /// No measurable content; the root `viewBox` was used.
    ViewBox,
    /// No measurable content or `viewBox`; the root `width`/`height` were used.
    Dimensions,
    /// Nothing usable at all; [`ShapeBounds::DEFAULT`].
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgExtraction {
    pub bounds: ShapeBounds,
    pub source: BoundsSource,
    /// Number of primitives that contributed to `bounds`.
    pub primitives: usize,
}

pub fn extract_svg_bounds(svg: &str) -> Result<ShapeBounds> {
    Ok(extract_svg_bounds_detailed(svg)?.bounds)
}

/// Union bounding box of every visible, non-degenerate primitive in `svg`.
///
/// Element and ancestor `transform`s are applied. Hidden subtrees (`display: none`,
/// `opacity: 0`) and non-rendered containers such as `<defs>` are skipped. When nothing
/// measurable remains the root viewport is used, then [`ShapeBounds::DEFAULT`].
pub fn extract_svg_bounds_detailed(svg: &str) -> Result<SvgExtraction> {
    let doc = roxmltree::Document::parse(svg)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(Error::MalformedSvg {
            message: format!("root element is <{}>, expected <svg>", root.tag_name().name()),
        });
    }

    let mut walk = Walk::default();
    if !is_hidden(root) {
        walk.visit_children(root, &Affine::identity());
    }

    if let Some(extent) = walk.extent {
        if extent.is_finite() {
            return Ok(SvgExtraction {
                bounds: ShapeBounds::from_extent(extent)?,
                source: BoundsSource::Content,
                primitives: walk.primitives,
            });
        }
        tracing::warn!("non-finite SVG content bounds; falling back to viewport");
    }

    if let Some(bounds) = root_view_box(root) {
        tracing::warn!(
            width = bounds.width(),
            height = bounds.height(),
            "no measurable SVG content; using viewBox"
        );
        return Ok(SvgExtraction {
            bounds,
            source: BoundsSource::ViewBox,
            primitives: 0,
        });
    }

    if let Some(bounds) = root_dimensions(root) {
        tracing::warn!(
            width = bounds.width(),
            height = bounds.height(),
            "no measurable SVG content or viewBox; using width/height"
        );
        return Ok(SvgExtraction {
            bounds,
            source: BoundsSource::Dimensions,
            primitives: 0,
        });
    }

    tracing::warn!("no measurable SVG content or viewport; using default 100x100 box");
    Ok(SvgExtraction {
        bounds: ShapeBounds::DEFAULT,
        source: BoundsSource::Default,
        primitives: 0,
    })
}

#[derive(Default)]
struct Walk {
    extent: Option<Extent>,
    primitives: usize,
}

impl Walk {
    fn visit_children(&mut self, node: Node<'_, '_>, parent_ctm: &Affine) {
        for child in node.children().filter(|n| n.is_element()) {
            let name = child.tag_name().name();
            if NON_RENDERED.contains(&name) || is_hidden(child) {
                continue;
            }

            let ctm = element_transform(child).then(parent_ctm);
            if let Some(extent) = measure_primitive(child, &ctm) {
                if extent.width() > 0.0 && extent.height() > 0.0 {
                    self.extent = Some(match self.extent {
                        Some(acc) => acc.union(extent),
                        None => extent,
                    });
                    self.primitives += 1;
                }
            }
            self.visit_children(child, &ctm);
        }
    }
}

/// Value of a presentation property, preferring inline `style` over the attribute.
fn presentation<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    if let Some(style) = node.attribute("style") {
        let from_style = style
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .filter(|(key, _)| key.trim() == name)
            .map(|(_, value)| value.trim())
            .last();
        if from_style.is_some() {
            return from_style;
        }
    }
    node.attribute(name).map(str::trim)
}

fn is_hidden(node: Node<'_, '_>) -> bool {
    if presentation(node, "display") == Some("none") {
        return true;
    }
    match presentation(node, "opacity") {
        Some(raw) => parse_opacity(raw).is_some_and(|o| o <= 0.0),
        None => false,
    }
}

fn parse_opacity(raw: &str) -> Option<f64> {
    match raw.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok().map(|v| v / 100.0),
        None => raw.parse::<f64>().ok(),
    }
}

fn element_transform(node: Node<'_, '_>) -> Affine {
    let Some(raw) = node.attribute("transform") else {
        return Affine::identity();
    };
    match svgtypes::Transform::from_str(raw) {
        Ok(t) => affine_from_svg(&t),
        Err(err) => {
            tracing::warn!(
                element = node.tag_name().name(),
                transform = raw,
                error = %err,
                "ignoring malformed transform"
            );
            Affine::identity()
        }
    }
}

/// Parses an absolute length in user units. Percentages and font-relative units are not
/// resolvable without a layout context and yield `None`.
fn parse_length(raw: &str) -> Option<f64> {
    use svgtypes::LengthUnit;

    let length = svgtypes::Length::from_str(raw.trim()).ok()?;
    let factor = match length.unit {
        LengthUnit::None | LengthUnit::Px => 1.0,
        LengthUnit::In => 96.0,
        LengthUnit::Cm => 96.0 / 2.54,
        LengthUnit::Mm => 96.0 / 25.4,
        LengthUnit::Pt => 4.0 / 3.0,
        LengthUnit::Pc => 16.0,
        _ => return None,
    };
    let v = length.number * factor;
    v.is_finite().then_some(v)
}

fn length_attr(node: Node<'_, '_>, name: &str) -> Option<f64> {
    node.attribute(name).and_then(parse_length)
}

fn length_or_zero(node: Node<'_, '_>, name: &str) -> f64 {
    length_attr(node, name).unwrap_or(0.0)
}

fn measure_primitive(node: Node<'_, '_>, ctm: &Affine) -> Option<Extent> {
    match node.tag_name().name() {
        "path" => {
            let d = node.attribute("d")?;
            let measured = path_extent(d, ctm);
            if let Some(error) = measured.error {
                tracing::warn!(error = %error, "malformed path data; measuring the parsed prefix");
            }
            measured.extent
        }
        "rect" => {
            let x = length_or_zero(node, "x");
            let y = length_or_zero(node, "y");
            let w = length_attr(node, "width")?;
            let h = length_attr(node, "height")?;
            if w <= 0.0 || h <= 0.0 {
                return None;
            }
            let mut extent = None;
            for corner in [
                point(x, y),
                point(x + w, y),
                point(x + w, y + h),
                point(x, y + h),
            ] {
                include(&mut extent, ctm.transform_point(corner));
            }
            extent
        }
        "circle" => {
            let r = length_attr(node, "r")?;
            if r <= 0.0 {
                return None;
            }
            ellipse_extent(length_or_zero(node, "cx"), length_or_zero(node, "cy"), r, r, ctm)
        }
        "ellipse" => {
            let rx = length_attr(node, "rx")?;
            let ry = length_attr(node, "ry")?;
            if rx <= 0.0 || ry <= 0.0 {
                return None;
            }
            ellipse_extent(length_or_zero(node, "cx"), length_or_zero(node, "cy"), rx, ry, ctm)
        }
        "line" => {
            let mut extent = None;
            include(
                &mut extent,
                ctm.transform_point(point(length_or_zero(node, "x1"), length_or_zero(node, "y1"))),
            );
            include(
                &mut extent,
                ctm.transform_point(point(length_or_zero(node, "x2"), length_or_zero(node, "y2"))),
            );
            extent
        }
        "polyline" | "polygon" => {
            let points = node.attribute("points")?;
            let mut extent = None;
            for (x, y) in svgtypes::PointsParser::from(points) {
                include(&mut extent, ctm.transform_point(point(x, y)));
            }
            extent
        }
        _ => None,
    }
}

fn root_view_box(root: Node<'_, '_>) -> Option<ShapeBounds> {
    let raw = root.attribute("viewBox")?;
    let vb = svgtypes::ViewBox::from_str(raw).ok()?;
    if vb.w > 0.0 && vb.h > 0.0 {
        ShapeBounds::from_origin_size(vb.x, vb.y, vb.w, vb.h).ok()
    } else {
        None
    }
}

fn root_dimensions(root: Node<'_, '_>) -> Option<ShapeBounds> {
    let w = length_attr(root, "width")?;
    let h = length_attr(root, "height")?;
    if w > 0.0 && h > 0.0 {
        ShapeBounds::from_origin_size(0.0, 0.0, w, h).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(svg: &str) -> SvgExtraction {
        extract_svg_bounds_detailed(svg).unwrap()
    }

    fn extrema(b: &ShapeBounds) -> (f64, f64, f64, f64) {
        (b.min_x(), b.min_y(), b.max_x(), b.max_y())
    }

    #[test]
    fn unions_all_primitive_kinds() {
        let r = bounds(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 500 500">
  <rect x="10" y="20" width="30" height="40"/>
  <circle cx="100" cy="100" r="10"/>
  <ellipse cx="200" cy="50" rx="5" ry="15"/>
  <polygon points="0,200 50,250 0,250"/>
  <path d="M300 300 L320 310"/>
</svg>"#,
        );
        assert_eq!(r.source, BoundsSource::Content);
        assert_eq!(r.primitives, 5);
        let (min_x, min_y, max_x, max_y) = extrema(&r.bounds);
        assert_eq!((min_x, min_y), (0.0, 20.0));
        assert!((max_x - 320.0).abs() < 1e-9);
        assert!((max_y - 310.0).abs() < 1e-9);
    }

    #[test]
    fn hidden_and_degenerate_elements_do_not_count() {
        let r = bounds(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <rect x="0" y="0" width="10" height="10"/>
  <rect x="500" y="500" width="10" height="10" display="none"/>
  <rect x="600" y="600" width="10" height="10" style="opacity: 0"/>
  <g style="display:none"><circle cx="900" cy="900" r="5"/></g>
  <defs><rect x="-500" y="-500" width="10" height="10"/></defs>
  <line x1="0" y1="50" x2="400" y2="50"/>
  <rect x="0" y="0" width="0" height="100"/>
</svg>"#,
        );
        assert_eq!(r.primitives, 1);
        assert_eq!(extrema(&r.bounds), (0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn ancestor_transforms_are_composed() {
        let r = bounds(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <g transform="translate(100 50)">
    <rect transform="scale(2)" x="0" y="0" width="10" height="5"/>
  </g>
</svg>"#,
        );
        assert_eq!(extrema(&r.bounds), (100.0, 50.0, 120.0, 60.0));
    }

    #[test]
    fn falls_back_to_view_box_then_dimensions_then_default() {
        let r = bounds(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="5 6 70 80"/>"#);
        assert_eq!(r.source, BoundsSource::ViewBox);
        assert_eq!(extrema(&r.bounds), (5.0, 6.0, 75.0, 86.0));

        let r = bounds(r#"<svg xmlns="http://www.w3.org/2000/svg" width="64px" height="32"/>"#);
        assert_eq!(r.source, BoundsSource::Dimensions);
        assert_eq!(extrema(&r.bounds), (0.0, 0.0, 64.0, 32.0));

        let r = bounds(r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#);
        assert_eq!(r.source, BoundsSource::Default);
        assert_eq!(r.bounds, ShapeBounds::DEFAULT);
    }

    #[test]
    fn rejects_non_svg_and_broken_xml() {
        assert!(matches!(
            extract_svg_bounds("<html/>"),
            Err(Error::MalformedSvg { .. })
        ));
        assert!(matches!(
            extract_svg_bounds("<svg><rect></svg>"),
            Err(Error::MalformedSvg { .. })
        ));
    }

    #[test]
    fn malformed_transform_is_ignored_not_fatal() {
        let r = bounds(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect transform="rotate(" width="4" height="4"/></svg>"#,
        );
        assert_eq!(extrema(&r.bounds), (0.0, 0.0, 4.0, 4.0));
    }

    #[test]
    fn inline_style_wins_over_attribute() {
        let r = bounds(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
  <rect width="4" height="4"/>
  <rect x="100" width="4" height="4" display="none" style="display: inline"/>
</svg>"#,
        );
        assert_eq!(r.primitives, 2);
        assert_eq!(r.bounds.max_x(), 104.0);
    }
}
