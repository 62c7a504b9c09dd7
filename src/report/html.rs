//! Self-contained HTML rendering for the dashboard.
//!
//! One document, no build step: embedded CSS, the report as a JSON blob,
//! and D3.js from a CDN drawing the charts. Tables and text are rendered
//! server-side; only the charts are built in the browser.

use crate::report::types::{CategorySection, DashboardReport, Overview, SpendingSection};

/// Renders the full dashboard page.
pub fn render_page(report: &DashboardReport) -> String {
    let sections: String = report.sections.iter().map(render_section).collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sales Dashboard - {title}</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>{css}</style>
</head>
<body>
    {sidebar}
    <main class="content">
        {header}
        {warnings}
        {overview}
        {sections}
        {spending}
        <div class="footer">Generated at {generated} from <span class="mono">{source}</span></div>
    </main>
    <script>
    const report = {json};
    {js}
    </script>
</body>
</html>"##,
        title = html_escape(&report.source),
        css = inline_css(),
        sidebar = render_sidebar(report),
        header = render_header(report),
        warnings = render_warnings(&report.warnings),
        overview = render_overview(&report.overview),
        sections = sections,
        spending = report
            .spending
            .as_ref()
            .map(render_spending)
            .unwrap_or_default(),
        generated = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        source = html_escape(&report.source),
        json = embed_json(report),
        js = inline_javascript(),
    )
}

/// Renders the page shown when the pipeline itself failed (missing file,
/// unreachable URL, unparseable CSV). Same shell, one error banner.
pub fn render_error_page(source: &str, error: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sales Dashboard - error</title>
    <style>{css}</style>
</head>
<body>
    <main class="content content-narrow">
        <div class="header">
            <div>
                <h1>Sales Dashboard</h1>
                <div class="subtitle">Could not load <span class="mono">{source}</span></div>
            </div>
        </div>
        <div class="banner banner-error">{error}</div>
    </main>
</body>
</html>"##,
        css = inline_css(),
        source = html_escape(source),
        error = html_escape(error),
    )
}

fn render_sidebar(report: &DashboardReport) -> String {
    let mut links = String::from(r##"<a href="#overview">Sales Data</a>"##);
    for section in &report.sections {
        links.push_str(&format!(
            r##"<a href="#{id}">{title}</a>"##,
            id = section.id,
            title = html_escape(&section.title),
        ));
    }
    if report.spending.is_some() {
        links.push_str(r##"<a href="#spending">Average Customer Spending</a>"##);
    }

    format!(
        r#"<nav class="sidebar">
        <div class="sidebar-title">Navigation</div>
        {links}
    </nav>"#
    )
}

fn render_header(report: &DashboardReport) -> String {
    format!(
        r#"<div class="header">
            <div>
                <h1>Sales Dashboard</h1>
                <div class="subtitle">Sales &amp; statistics overview of <span class="mono">{source}</span></div>
            </div>
        </div>"#,
        source = html_escape(&report.source),
    )
}

fn render_warnings(warnings: &[String]) -> String {
    warnings
        .iter()
        .map(|w| format!(r#"<div class="banner banner-warn">{}</div>"#, html_escape(w)))
        .collect()
}

fn render_overview(overview: &Overview) -> String {
    let column_rows: String = overview
        .columns
        .iter()
        .map(|col| {
            let roles = if col.roles.is_empty() {
                "&mdash;".to_string()
            } else {
                html_escape(&col.roles.join(", "))
            };
            format!(
                "<tr><td class=\"mono\">{name}</td><td>{kind:?}</td><td>{non_empty}</td><td>{roles}</td></tr>",
                name = html_escape(&col.name),
                kind = col.kind,
                non_empty = col.non_empty,
            )
        })
        .collect();

    let preview_head: String = overview
        .preview_columns
        .iter()
        .map(|c| format!("<th>{}</th>", html_escape(c)))
        .collect();
    let preview_rows: String = overview
        .preview_rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(cell)))
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    format!(
        r#"<section id="overview" class="card">
            <h2>Sales Data</h2>
            <div class="stats">
                <div class="stat"><div class="stat-value">{rows}</div><div class="stat-label">Rows</div></div>
                <div class="stat"><div class="stat-value">{cols}</div><div class="stat-label">Columns</div></div>
                <div class="stat"><div class="stat-value">{conflict}</div><div class="stat-label">Conflict rows dropped</div></div>
                <div class="stat"><div class="stat-value">{empty}</div><div class="stat-label">Empty rows dropped</div></div>
            </div>
            <h3>Detected columns</h3>
            <div class="table-wrap">
            <table>
                <thead><tr><th>Column</th><th>Kind</th><th>Non-empty</th><th>Used as</th></tr></thead>
                <tbody>{column_rows}</tbody>
            </table>
            </div>
            <h3>Preview</h3>
            <div class="table-wrap table-scroll">
            <table>
                <thead><tr>{preview_head}</tr></thead>
                <tbody>{preview_rows}</tbody>
            </table>
            </div>
        </section>"#,
        rows = overview.row_count,
        cols = overview.column_count,
        conflict = overview.conflict_rows_dropped,
        empty = overview.empty_rows_dropped,
    )
}

fn render_section(section: &CategorySection) -> String {
    let count_rows: String = section
        .counts
        .entries
        .iter()
        .map(|e| {
            format!(
                "<tr><td>{value}</td><td>{count}</td></tr>",
                value = html_escape(&e.value),
                count = e.count,
            )
        })
        .collect();

    let pie_chart = if section.pie.is_some() {
        format!(
            r#"<div class="chart-card"><div class="chart-title">Pie Chart</div><div id="{id}-pie" class="chart"></div></div>"#,
            id = section.id,
        )
    } else {
        String::new()
    };

    format!(
        r#"<section id="{id}" class="card">
            <h2>{title}</h2>
            <div class="meta">column <span class="mono">{column}</span> &middot; {total} values &middot; {distinct} distinct</div>
            <div class="table-wrap table-scroll">
            <table>
                <thead><tr><th>Value</th><th>Count</th></tr></thead>
                <tbody>{count_rows}</tbody>
            </table>
            </div>
            <div class="charts">
                <div class="chart-card"><div class="chart-title">Bar Chart</div><div id="{id}-bar" class="chart"></div></div>
                <div class="chart-card"><div class="chart-title">Line Chart</div><div id="{id}-line" class="chart"></div></div>
                <div class="chart-card"><div class="chart-title">Scatter Plot</div><div id="{id}-scatter" class="chart"></div></div>
                {pie_chart}
            </div>
        </section>"#,
        id = section.id,
        title = html_escape(&section.title),
        column = html_escape(&section.column),
        total = section.counts.total,
        distinct = section.counts.entries.len(),
    )
}

fn render_spending(spending: &SpendingSection) -> String {
    let city_rows: String = spending
        .by_city
        .iter()
        .map(|g| {
            format!(
                "<tr><td>{group}</td><td>{mean:.2}</td><td>{count}</td></tr>",
                group = html_escape(&g.group),
                mean = g.mean,
                count = g.count,
            )
        })
        .collect();

    let narrative = match (spending.by_city.first(), spending.by_city.last()) {
        (Some(highest), Some(lowest)) if spending.gap().unwrap_or(0.0) > 0.0 => format!(
            r#"<h3>Does spending differ between locations?</h3>
            <p><strong>Yes</strong>, average spending differs across locations:</p>
            <ul>
                <li>Highest: <strong>{high_city}</strong> ({high:.2})</li>
                <li>Lowest: <strong>{low_city}</strong> ({low:.2})</li>
                <li>Gap: <strong>{gap:.2}</strong></li>
            </ul>"#,
            high_city = html_escape(&highest.group),
            high = highest.mean,
            low_city = html_escape(&lowest.group),
            low = lowest.mean,
            gap = highest.mean - lowest.mean,
        ),
        (Some(_), Some(_)) => r#"<h3>Does spending differ between locations?</h3>
            <p><strong>No</strong>, average spending is the same in every location.</p>"#
            .to_string(),
        _ => String::new(),
    };

    let per_city = if spending.by_city.is_empty() {
        String::new()
    } else {
        format!(
            r#"<h3>Average spending per city</h3>
            <div class="table-wrap table-scroll">
            <table>
                <thead><tr><th>City</th><th>Average spending</th><th>Orders</th></tr></thead>
                <tbody>{city_rows}</tbody>
            </table>
            </div>
            <div class="charts">
                <div class="chart-card chart-card-wide"><div class="chart-title">Average Spending per City</div><div id="spending-bar" class="chart"></div></div>
            </div>
            {narrative}"#
        )
    };

    format!(
        r#"<section id="spending" class="card">
            <h2>Average Customer Spending</h2>
            <div class="meta">column <span class="mono">{column}</span></div>
            <div class="stats">
                <div class="stat"><div class="stat-value">{mean:.2}</div><div class="stat-label">Mean</div></div>
                <div class="stat"><div class="stat-value">{median:.2}</div><div class="stat-label">Median</div></div>
                <div class="stat"><div class="stat-value">{min:.2}</div><div class="stat-label">Min</div></div>
                <div class="stat"><div class="stat-value">{max:.2}</div><div class="stat-label">Max</div></div>
                <div class="stat"><div class="stat-value">{count}</div><div class="stat-label">Orders</div></div>
            </div>
            {per_city}
        </section>"#,
        column = html_escape(&spending.price_column),
        mean = spending.overall.mean,
        median = spending.overall.median,
        min = spending.overall.min,
        max = spending.overall.max,
        count = spending.overall.count,
    )
}

/// Escapes text for interpolation into HTML.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serializes the report for the inline `<script>` block. `</` is escaped
/// so cell data can never terminate the script element early.
fn embed_json(report: &DashboardReport) -> String {
    serde_json::to_string(report)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

fn inline_css() -> &'static str {
    r##"
:root {
    --bg: #0d1117;
    --card: #161b22;
    --border: #30363d;
    --text: #e6edf3;
    --dim: #7d8590;
    --accent: #58a6ff;
    --warn: #d29922;
    --error: #f85149;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    background: var(--bg);
    color: var(--text);
    line-height: 1.5;
}
.sidebar {
    position: fixed;
    top: 0; left: 0; bottom: 0;
    width: 230px;
    padding: 1.5rem 1rem;
    border-right: 1px solid var(--border);
    background: var(--card);
    overflow-y: auto;
}
.sidebar-title {
    font-size: 0.75rem;
    text-transform: uppercase;
    letter-spacing: 0.05em;
    color: var(--dim);
    margin-bottom: 0.75rem;
}
.sidebar a {
    display: block;
    color: var(--text);
    text-decoration: none;
    padding: 0.4rem 0.6rem;
    border-radius: 6px;
    font-size: 0.9rem;
}
.sidebar a:hover { background: rgba(88,166,255,0.1); color: var(--accent); }
.content { margin-left: 230px; max-width: 1200px; padding: 2rem; }
.content-narrow { margin: 0 auto; max-width: 720px; }
.header {
    display: flex;
    align-items: center;
    margin-bottom: 1.5rem;
    padding-bottom: 1rem;
    border-bottom: 1px solid var(--border);
}
h1 { font-size: 1.8rem; font-weight: 700; }
.subtitle { color: var(--dim); font-size: 0.9rem; }
h2 { font-size: 1.25rem; margin-bottom: 0.25rem; }
h3 { font-size: 1rem; margin: 1.25rem 0 0.5rem; color: var(--dim); }
.meta { color: var(--dim); font-size: 0.85rem; margin-bottom: 1rem; }
.mono { font-family: 'SF Mono', 'Fira Code', monospace; font-size: 0.85em; }
.banner {
    border-radius: 8px;
    padding: 0.75rem 1rem;
    margin-bottom: 0.75rem;
    font-size: 0.9rem;
}
.banner-warn { background: rgba(210,153,34,0.12); border: 1px solid var(--warn); color: var(--warn); }
.banner-error { background: rgba(248,81,73,0.12); border: 1px solid var(--error); color: var(--error); }
.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 1.5rem;
    margin-bottom: 1.5rem;
}
.stats {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(130px, 1fr));
    gap: 1rem;
    margin: 1rem 0;
}
.stat {
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 1rem;
    text-align: center;
}
.stat-value { font-size: 1.6rem; font-weight: 700; color: var(--accent); }
.stat-label { color: var(--dim); font-size: 0.75rem; text-transform: uppercase; letter-spacing: 0.05em; margin-top: 0.25rem; }
.table-wrap { border: 1px solid var(--border); border-radius: 8px; overflow: hidden; }
.table-scroll { max-height: 340px; overflow-y: auto; }
table { width: 100%; border-collapse: collapse; font-size: 0.875rem; }
th, td { padding: 0.5rem 0.75rem; text-align: left; white-space: nowrap; }
th {
    background: rgba(255,255,255,0.03);
    position: sticky;
    top: 0;
    font-size: 0.75rem;
    text-transform: uppercase;
    letter-spacing: 0.05em;
    color: var(--dim);
}
td { border-top: 1px solid var(--border); }
.charts {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
    gap: 1rem;
    margin-top: 1rem;
}
.chart-card {
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 1rem;
}
.chart-card-wide { grid-column: 1 / -1; }
.chart-title { color: var(--dim); font-size: 0.8rem; margin-bottom: 0.5rem; }
.chart svg { width: 100%; height: auto; }
.axis text { fill: var(--dim); font-size: 10px; }
.axis path, .axis line { stroke: var(--border); }
ul { margin: 0.5rem 0 0.5rem 1.5rem; }
.footer {
    color: var(--dim);
    font-size: 0.8rem;
    text-align: center;
    padding: 1rem 0 2rem;
}
"##
}

fn inline_javascript() -> &'static str {
    r##"
    const PALETTE = ['#58a6ff', '#3fb950', '#d29922', '#f85149', '#a371f7', '#f778ba', '#7d8590'];
    const W = 460, H = 280;
    const MARGIN = { top: 10, right: 15, bottom: 70, left: 45 };

    function svgIn(sel) {
        return d3.select(sel).append('svg')
            .attr('viewBox', '0 0 ' + W + ' ' + H);
    }

    function xBand(data) {
        return d3.scaleBand()
            .domain(data.map(d => d.value))
            .range([MARGIN.left, W - MARGIN.right])
            .padding(0.2);
    }

    function yLinear(data) {
        return d3.scaleLinear()
            .domain([0, d3.max(data, d => d.count) || 1]).nice()
            .range([H - MARGIN.bottom, MARGIN.top]);
    }

    function axes(svg, x, y) {
        svg.append('g')
            .attr('class', 'axis')
            .attr('transform', 'translate(0,' + (H - MARGIN.bottom) + ')')
            .call(d3.axisBottom(x))
            .selectAll('text')
            .attr('transform', 'rotate(-45)')
            .style('text-anchor', 'end');
        svg.append('g')
            .attr('class', 'axis')
            .attr('transform', 'translate(' + MARGIN.left + ',0)')
            .call(d3.axisLeft(y).ticks(5));
    }

    function drawBar(sel, data) {
        const svg = svgIn(sel);
        const x = xBand(data), y = yLinear(data);
        svg.selectAll('rect').data(data).enter().append('rect')
            .attr('x', d => x(d.value))
            .attr('y', d => y(d.count))
            .attr('width', x.bandwidth())
            .attr('height', d => y(0) - y(d.count))
            .attr('fill', PALETTE[0])
            .append('title').text(d => d.value + ': ' + fmt(d.count));
        axes(svg, x, y);
    }

    function drawLine(sel, data) {
        const svg = svgIn(sel);
        const x = xBand(data), y = yLinear(data);
        const cx = d => x(d.value) + x.bandwidth() / 2;
        svg.append('path').datum(data)
            .attr('fill', 'none')
            .attr('stroke', PALETTE[1])
            .attr('stroke-width', 2)
            .attr('d', d3.line().x(cx).y(d => y(d.count)));
        svg.selectAll('circle').data(data).enter().append('circle')
            .attr('cx', cx)
            .attr('cy', d => y(d.count))
            .attr('r', 3)
            .attr('fill', PALETTE[1])
            .append('title').text(d => d.value + ': ' + fmt(d.count));
        axes(svg, x, y);
    }

    function drawScatter(sel, data) {
        const svg = svgIn(sel);
        const x = xBand(data), y = yLinear(data);
        svg.selectAll('circle').data(data).enter().append('circle')
            .attr('cx', d => x(d.value) + x.bandwidth() / 2)
            .attr('cy', d => y(d.count))
            .attr('r', 6)
            .attr('fill', (d, i) => PALETTE[i % PALETTE.length])
            .append('title').text(d => d.value + ': ' + fmt(d.count));
        axes(svg, x, y);
    }

    function drawPie(sel, data) {
        const r = Math.min(W, H) / 2 - 10;
        const svg = svgIn(sel).append('g')
            .attr('transform', 'translate(' + W / 2 + ',' + H / 2 + ')');
        const total = d3.sum(data, d => d.count);
        const pie = d3.pie().value(d => d.count).sort(null);
        const arc = d3.arc().innerRadius(0).outerRadius(r);
        const label = d3.arc().innerRadius(r * 0.55).outerRadius(r * 0.55);

        const slices = svg.selectAll('g.slice').data(pie(data)).enter().append('g')
            .attr('class', 'slice');
        slices.append('path')
            .attr('d', arc)
            .attr('fill', (d, i) => PALETTE[i % PALETTE.length])
            .attr('stroke', '#0d1117')
            .attr('stroke-width', 2)
            .append('title').text(d => d.data.value + ': ' + fmt(d.data.count));
        slices.append('text')
            .attr('transform', d => 'translate(' + label.centroid(d) + ')')
            .attr('text-anchor', 'middle')
            .style('font-size', '11px')
            .style('fill', '#0d1117')
            .text(d => (100 * d.data.count / total).toFixed(1) + '%');
    }

    function fmt(n) {
        return Number.isInteger(n) ? n : n.toFixed(2);
    }

    for (const section of report.sections) {
        drawBar('#' + section.id + '-bar', section.counts.entries);
        drawLine('#' + section.id + '-line', section.counts.entries);
        drawScatter('#' + section.id + '-scatter', section.scatter);
        if (section.pie) {
            drawPie('#' + section.id + '-pie', section.pie);
        }
    }

    if (report.spending && report.spending.by_city.length > 0) {
        drawBar('#spending-bar', report.spending.by_city.map(g => ({ value: g.group, count: g.mean })));
    }
"##
}
