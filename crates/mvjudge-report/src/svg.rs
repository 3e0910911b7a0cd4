use mvjudge_core::radar::{Point, RadarGeometry, GRID_LEVELS};
use mvjudge_core::types::{ReviewScores, DIMENSIONS};

const GRID_STROKE: &str = "#475569";
const LABEL_FILL: &str = "#94a3b8";
const DATA_STROKE: &str = "#3b82f6";
const DATA_FILL: &str = "rgba(59, 130, 246, 0.3)";

/// Render `scores` as a standalone SVG radar chart.
pub fn render_radar(scores: &ReviewScores, geometry: &RadarGeometry) -> String {
    let count = DIMENSIONS.len();
    let mut out = String::new();

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\" overflow=\"visible\">\n",
        size = fmt_num(geometry.size)
    ));

    // Background grid
    for ring in geometry.grid_rings(count, &GRID_LEVELS) {
        out.push_str(&format!(
            "  <polygon points=\"{}\" fill=\"none\" stroke=\"{GRID_STROKE}\" stroke-width=\"1\" stroke-dasharray=\"4\"/>\n",
            points_attr(&ring)
        ));
    }

    // Axes and labels
    let anchors = geometry.label_anchors(count);
    for ((axis, anchor), dim) in geometry.axes(count).iter().zip(&anchors).zip(&DIMENSIONS) {
        out.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{GRID_STROKE}\" stroke-width=\"1\"/>\n",
            fmt_num(axis.start.x),
            fmt_num(axis.start.y),
            fmt_num(axis.end.x),
            fmt_num(axis.end.y),
        ));
        out.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" fill=\"{LABEL_FILL}\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
            fmt_num(anchor.x),
            fmt_num(anchor.y),
            escape_xml(dim.label),
        ));
    }

    // Data polygon and vertices
    let polygon = geometry.score_polygon(scores, &DIMENSIONS);
    out.push_str(&format!(
        "  <polygon points=\"{}\" fill=\"{DATA_FILL}\" stroke=\"{DATA_STROKE}\" stroke-width=\"3\" stroke-linejoin=\"round\"/>\n",
        points_attr(&polygon)
    ));
    for p in &polygon {
        out.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"{DATA_STROKE}\"/>\n",
            fmt_num(p.x),
            fmt_num(p.y)
        ));
    }

    out.push_str("</svg>\n");
    out
}

/// `x,y x,y ...` as used by the SVG `points` attribute.
pub fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

// Two decimals, trailing zeros trimmed; -0 printed as 0.
fn fmt_num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
