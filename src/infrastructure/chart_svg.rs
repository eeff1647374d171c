// Bar chart rendering to inline SVG with Plotters
use crate::domain::dashboard::{BarChart, Palette};
use crate::domain::kpi::format_grouped;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (640, 420);
const BAR_GAP_PX: u32 = 14;

/// Anchor colours sampled from the matplotlib colormaps of the same name
const VIRIDIS: [(u8, u8, u8); 6] = [
    (68, 1, 84),
    (65, 68, 135),
    (42, 120, 142),
    (34, 168, 132),
    (122, 209, 81),
    (253, 231, 37),
];

const MAGMA: [(u8, u8, u8); 6] = [
    (0, 0, 4),
    (59, 15, 112),
    (140, 41, 129),
    (222, 73, 104),
    (254, 159, 109),
    (252, 253, 191),
];

/// Colour for bar `index` of `count`, evenly spaced through the palette and
/// avoiding its darkest and lightest ends.
pub fn bar_color(palette: Palette, index: usize, count: usize) -> RGBColor {
    let anchors = match palette {
        Palette::Viridis => &VIRIDIS,
        Palette::Magma => &MAGMA,
    };

    let t = (index as f64 + 1.0) / (count as f64 + 1.0);
    let scaled = t * (anchors.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(anchors.len() - 2);
    let frac = scaled - lower as f64;

    let (r0, g0, b0) = anchors[lower];
    let (r1, g1, b1) = anchors[lower + 1];
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Draw one bar per category. Charts without bars are not drawn.
pub fn render_bar_chart(chart: &BarChart) -> anyhow::Result<String> {
    let count = chart.bars.len();
    if count == 0 {
        anyhow::bail!("chart {} has no bars", chart.id);
    }
    if let Some(bar) = chart.bars.iter().find(|b| !b.value.is_finite()) {
        anyhow::bail!("bar {} has no finite value", bar.label);
    }

    let max_value = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
    let min_value = chart.bars.iter().map(|b| b.value).fold(0.0_f64, f64::min);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };
    let y_min = if min_value < 0.0 { min_value * 1.1 } else { 0.0 };

    // A single-slot segmented range degenerates, so always keep at least two slots
    let last_slot = count.max(2) as u32 - 1;
    let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut plot = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d((0u32..last_slot).into_segmented(), y_min..y_max)?;

        let x_label_formatter = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|l| l.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        };
        let y_label_formatter = |value: &f64| format_grouped(*value, 0);

        let mut mesh = plot.configure_mesh();
        mesh.disable_x_mesh()
            .x_labels(count + 1)
            .x_label_formatter(&x_label_formatter)
            .y_label_formatter(&y_label_formatter)
            .y_desc(chart.y_label.as_str());
        if let Some(x_label) = &chart.x_label {
            mesh.x_desc(x_label.as_str());
        }
        mesh.draw()?;

        plot.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let color = bar_color(chart.palette, i, count);
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(i as u32), 0.0),
                    (SegmentValue::Exact(i as u32 + 1), bar.value),
                ],
                color.filled(),
            );
            rect.set_margin(0, 0, BAR_GAP_PX, BAR_GAP_PX);
            rect
        }))?;

        root.present()?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::Bar;

    fn chart(bars: &[(&str, f64)]) -> BarChart {
        BarChart {
            id: "revenue-by-region".to_string(),
            title: "Revenue by Region".to_string(),
            x_label: Some("Region".to_string()),
            y_label: "Total Revenue".to_string(),
            palette: Palette::Viridis,
            bars: bars
                .iter()
                .map(|(label, value)| Bar {
                    label: label.to_string(),
                    value: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn test_renders_svg_with_labels() {
        let svg = render_bar_chart(&chart(&[("North", 35.0), ("South", 100.0)])).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("North"));
        assert!(svg.contains("South"));
        assert!(svg.contains("Revenue by Region"));
    }

    #[test]
    fn test_single_bar() {
        let svg = render_bar_chart(&chart(&[("Churn", 4.0)])).unwrap();
        assert!(svg.contains("Churn"));
    }

    #[test]
    fn test_empty_chart_is_an_error() {
        assert!(render_bar_chart(&chart(&[])).is_err());
    }

    #[test]
    fn test_non_finite_bar_is_an_error() {
        let err = render_bar_chart(&chart(&[("North", f64::INFINITY), ("South", 5.0)])).unwrap_err();
        assert!(err.to_string().contains("North"));
        assert!(render_bar_chart(&chart(&[("North", f64::NAN)])).is_err());
    }

    #[test]
    fn test_bar_colors_follow_palette() {
        let first = bar_color(Palette::Viridis, 0, 3);
        let last = bar_color(Palette::Viridis, 2, 3);
        assert_ne!(first, last);
        assert_ne!(bar_color(Palette::Magma, 0, 2), bar_color(Palette::Viridis, 0, 2));
        // Single bars land mid-palette
        assert_eq!(bar_color(Palette::Viridis, 0, 1), RGBColor(38, 144, 137));
    }
}
