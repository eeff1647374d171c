// HTML rendering of the dashboard render tree
use crate::domain::dashboard::{BarChart, Block, Dashboard, Section, TablePreview};
use crate::domain::kpi::MetricTile;
use crate::infrastructure::chart_svg::render_bar_chart;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 1.5rem 3rem; color: #262730; }
h1 { margin-bottom: 0.5rem; }
hr { border: none; border-top: 1px solid #e6e6e6; margin: 1.5rem 0; }
.tiles { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.tile .label { font-size: 0.9rem; color: #6b6b7b; }
.tile .value { font-size: 2.2rem; }
.tabs > input { display: none; }
.tabs > label { display: inline-block; padding: 0.6rem 1rem; cursor: pointer; border-bottom: 2px solid transparent; }
.tabs > input:checked + label { border-bottom-color: #ff4b4b; color: #ff4b4b; }
.panel { display: none; padding-top: 1rem; }
.info { background: #e8f0fe; color: #0b4fa8; padding: 0.8rem 1rem; border-radius: 0.4rem; }
.warning { background: #fff4e5; color: #8a4b00; padding: 0.8rem 1rem; border-radius: 0.4rem; }
table { border-collapse: collapse; font-size: 0.85rem; }
th, td { border: 1px solid #e6e6e6; padding: 0.3rem 0.6rem; text-align: left; }
th { background: #f6f6f9; }
.rows { font-size: 0.8rem; color: #6b6b7b; }
img, svg { max-width: 100%; height: auto; }
.caption { font-size: 0.85rem; color: #6b6b7b; }
"#;

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Self-contained page: one stylesheet, CSS-only tabs, charts inlined as SVG.
pub fn render_page(dashboard: &Dashboard) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n<style>{}",
        escape(&dashboard.title),
        STYLE
    ));

    // Show the panel whose radio button is checked
    for tab in &dashboard.tabs {
        html.push_str(&format!(
            "#tab-{id}:checked ~ #panel-{id} {{ display: block; }}\n",
            id = tab.id
        ));
    }
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str(&format!("<h1>📦 {}</h1>\n<hr>\n", escape(&dashboard.title)));

    for notice in &dashboard.notices {
        html.push_str(&render_block(notice));
    }

    html.push_str("<div class=\"tiles\">\n");
    for tile in &dashboard.tiles {
        html.push_str(&render_tile(tile));
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"tabs\">\n");
    for (i, tab) in dashboard.tabs.iter().enumerate() {
        html.push_str(&format!(
            "<input type=\"radio\" name=\"tabs\" id=\"tab-{id}\"{checked}><label for=\"tab-{id}\">{icon} {title}</label>\n",
            id = tab.id,
            checked = if i == 0 { " checked" } else { "" },
            icon = tab.icon,
            title = escape(&tab.title),
        ));
    }
    for tab in &dashboard.tabs {
        html.push_str(&format!("<div class=\"panel\" id=\"panel-{}\">\n", tab.id));
        for section in &tab.sections {
            html.push_str(&render_section(section));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<hr>\n<p class=\"caption\">{}</p>\n<p class=\"caption\">Rendered {}</p>\n</body>\n</html>\n",
        escape(&dashboard.caption),
        dashboard.rendered_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html
}

fn render_tile(tile: &MetricTile) -> String {
    format!(
        "<div class=\"tile\" data-metric=\"{}\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
        escape(&tile.metric),
        escape(&tile.title),
        escape(&tile.display)
    )
}

fn render_section(section: &Section) -> String {
    let mut html = format!("<section>\n<h3>{}</h3>\n", escape(&section.heading));
    for block in &section.blocks {
        html.push_str(&render_block(block));
    }
    html.push_str("</section>\n");
    html
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Image { file, url } => format!(
            "<img src=\"{}\" alt=\"{}\">\n",
            escape(url),
            escape(file)
        ),
        Block::Table(preview) => render_table(preview),
        Block::BarChart(chart) => render_chart(chart),
        Block::Info { message } => format!("<div class=\"info\">{}</div>\n", escape(message)),
        Block::Warning { message } => {
            format!("<div class=\"warning\">{}</div>\n", escape(message))
        }
    }
}

fn render_table(preview: &TablePreview) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for column in &preview.table.columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in &preview.table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html.push_str(&format!(
        "<p class=\"rows\">Showing {} of {} rows from {}</p>\n",
        preview.table.len(),
        preview.total_rows,
        escape(&preview.file)
    ));
    html
}

fn render_chart(chart: &BarChart) -> String {
    match render_bar_chart(chart) {
        Ok(svg) => format!("<figure id=\"{}\">\n{}\n</figure>\n", escape(&chart.id), svg),
        Err(e) => {
            tracing::warn!(chart = %chart.id, error = %e, "Chart rendering failed");
            render_block(&Block::warning(format!("{} could not be drawn: {}", chart.title, e)))
        }
    }
}
