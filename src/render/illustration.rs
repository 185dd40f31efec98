//! Top-view illustration of packed circles, as SVG.
//!
//! Circles sit on a grid of pitch `2r` inside a dashed bounding rectangle
//! of `cols·2r` by `rows·2r`, drawn with a half-unit margin.

use crate::models::PackingFigure;

/// Pixels per cm.
const SCALE: f64 = 40.0;
/// Margin around the rectangle, in cm.
const MARGIN: f64 = 0.5;
/// Height reserved for the title, in px.
const TITLE_HEIGHT: f64 = 36.0;

const TITLE: &str = "Top View of Tightly Packed Objects";

/// Render the figure as a standalone SVG document.
pub fn render_packing_svg(figure: &PackingFigure) -> String {
    let r = figure.radius;
    let d = figure.diameter();
    let rect_w = f64::from(figure.cols) * d;
    let rect_h = f64::from(figure.rows) * d;

    let px = |cm: f64| cm * SCALE;
    let width = px(rect_w + 2.0 * MARGIN);
    let height = px(rect_h + 2.0 * MARGIN) + TITLE_HEIGHT;
    let origin_x = px(MARGIN);
    let origin_y = px(MARGIN) + TITLE_HEIGHT;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.1}\" height=\"{height:.1}\" viewBox=\"0 0 {width:.1} {height:.1}\">\n"
    );
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"16\" font-weight=\"bold\">{TITLE}</text>\n",
        width / 2.0
    ));

    for i in 0..figure.rows {
        for j in 0..figure.cols {
            let cx = origin_x + px(f64::from(j) * d + r);
            let cy = origin_y + px(f64::from(i) * d + r);
            svg.push_str(&format!(
                "  <circle cx=\"{cx:.1}\" cy=\"{cy:.1}\" r=\"{:.1}\" fill=\"lightblue\" fill-opacity=\"0.8\" stroke=\"navy\" stroke-width=\"2\"/>\n",
                px(r)
            ));
        }
    }

    svg.push_str(&format!(
        "  <rect x=\"{origin_x:.1}\" y=\"{origin_y:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"red\" stroke-width=\"3\" stroke-dasharray=\"8 4\" stroke-opacity=\"0.7\"/>\n",
        px(rect_w),
        px(rect_h)
    ));
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_circle_per_cell() {
        let figure = PackingFigure {
            rows: 2,
            cols: 4,
            radius: 1.5,
        };
        let svg = render_packing_svg(&figure);

        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle ").count(), 8);
        assert!(svg.contains(TITLE));
        // 4 × 3 cm by 2 × 3 cm rectangle
        assert!(svg.contains("width=\"480.0\" height=\"240.0\""));
        // first circle centred one radius in from the corner
        assert!(svg.contains("cx=\"80.0\" cy=\"116.0\" r=\"60.0\""));
    }
}
