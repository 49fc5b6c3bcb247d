//! Single HTML page holding every view.

use super::GraphView;
use crate::error::Result;

const VIS_NETWORK_JS: &str = "https://unpkg.com/vis-network/standalone/umd/vis-network.min.js";

const NETWORK_OPTIONS: &str = r#"{"physics": {"solver": "forceAtlas2Based"}, "edges": {"arrows": "to"}}"#;

/// Render all views into one page, one `<h2>` section per view.
pub fn render_page(views: &[GraphView]) -> Result<String> {
    let mut sections = String::new();
    for (idx, view) in views.iter().enumerate() {
        let data = script_safe_json(&serde_json::to_string(&view.network)?);
        sections.push_str(&format!(
            r#"    <div class="graph-container">
    <h2>{title}</h2>
    <div id="graph-{idx}" class="graph"></div>
    <script type="text/javascript">
      (function () {{
        var data = {data};
        var container = document.getElementById("graph-{idx}");
        new vis.Network(container, {{
          nodes: new vis.DataSet(data.nodes),
          edges: new vis.DataSet(data.edges)
        }}, {options});
      }})();
    </script>
    </div>
"#,
            title = escape_html(&view.title),
            idx = idx,
            data = data,
            options = NETWORK_OPTIONS,
        ));
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <title>Knowledge Graph Visualizations</title>
    <script type="text/javascript" src="{script}"></script>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        h2 {{ border-bottom: 2px solid #444; padding-bottom: 5px; }}
        .graph-container {{ margin-bottom: 50px; }}
        .graph {{ width: 100%; height: 500px; border: 1px solid lightgray; }}
    </style>
</head>
<body>
    <h1>Knowledge Graph Visualizations</h1>
{sections}</body>
</html>
"#,
        script = VIS_NETWORK_JS,
        sections = sections,
    ))
}

/// `<` only ever occurs inside JSON strings, where `\u003c` is equivalent and
/// cannot close the surrounding script element.
fn script_safe_json(json: &str) -> String {
    json.replace('<', "\\u003c")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{Network, VisNode};

    fn view(title: &str, label: &str) -> GraphView {
        GraphView {
            title: title.to_string(),
            network: Network {
                nodes: vec![VisNode {
                    id: "http://x#a".to_string(),
                    label: label.to_string(),
                    title: "http://x#a".to_string(),
                    color: "#97C2FC".to_string(),
                }],
                edges: vec![],
            },
        }
    }

    #[test]
    fn test_page_has_section_per_view() {
        let views = vec![view("One", "a"), view("Two", "b")];
        let page = render_page(&views).unwrap();
        assert_eq!(page.matches("<h2>").count(), 2);
        assert!(page.contains(r#"id="graph-1""#));
        assert!(page.contains("forceAtlas2Based"));
        assert!(page.contains(VIS_NETWORK_JS));
    }

    #[test]
    fn test_script_cannot_be_closed_by_data() {
        let page = render_page(&[view("T", "</script><b>")]).unwrap();
        assert!(!page.contains("</script><b>"));
        assert!(page.contains("\\u003c/script>\\u003cb>"));
    }

    #[test]
    fn test_title_escaped() {
        let page = render_page(&[view("A & <B>", "a")]).unwrap();
        assert!(page.contains("<h2>A &amp; &lt;B&gt;</h2>"));
    }
}
