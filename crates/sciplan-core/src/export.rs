//! Document export: markdown/HTML content to a word-processor-compatible file.
//!
//! Generated content arrives as markdown with HTML islands (tables, the graph
//! area). For display we convert markdown and keep the islands; for export we
//! additionally swap the embedded coordinate-plane SVG for a plain grid table,
//! since target viewers do not render embedded vector graphics reliably.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

use crate::error::CoreResult;

/// Content type of the exported document.
pub const WORD_CONTENT_TYPE: &str = "application/msword";

/// A finished export: a self-contained HTML document that common word
/// processors open directly.
#[derive(Debug, Clone)]
pub struct WordDocument {
    /// File name including the `.doc` extension.
    pub file_name: String,
    pub content_type: &'static str,
    pub html: String,
}

impl WordDocument {
    pub fn bytes(&self) -> &[u8] {
        self.html.as_bytes()
    }

    /// Write the document into `dir` and return the resulting path.
    pub fn write_to(&self, dir: &Path) -> CoreResult<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.bytes())?;
        Ok(path)
    }
}

static GRAPH_CONTAINER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div class="graph-container">.*?</div>\s*</div>"#)
        .expect("graph container pattern compiles")
});
static HEADING2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^## (.*)$").expect("h2 pattern"));
static HEADING3: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("h3 pattern"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\* (.*)$").expect("li pattern"));
static LIST_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(<li>.*?</li>\s*)+").expect("li run pattern"));
static TABLE_EDGES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n+(<table[^>]*>)|(</table>)\n+").expect("table edge pattern"));
static ROW_GAPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(</tr>)\n+(<tr>)|(</td>)\n+(<td>)|(</th>)\n+(<th>)").expect("row gap pattern")
});
static DIV_EDGES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n+(<div[^>]*>)|(</div>)\n+").expect("div edge pattern"));
static PLAIN_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n([^<\s])").expect("plain break pattern"));
static BREAK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(<br>\s*){3,}").expect("break run pattern"));

const GRID_COLUMNS: usize = 10;
const GRID_ROWS: usize = 8;

/// Grid-table stand-in for the embedded coordinate-plane graphic.
fn grid_table_fallback() -> String {
    let mut rows = String::new();
    for _ in 0..GRID_ROWS {
        rows.push_str("<tr style=\"height: 30px;\">");
        for _ in 0..GRID_COLUMNS {
            rows.push_str("<td style=\"border: 1px solid #ddd; width: 40px;\"></td>");
        }
        rows.push_str("</tr>");
    }
    format!(
        concat!(
            "<div style=\"margin: 20px auto; text-align: center;\">",
            "<h4>(그래프 1) 실험 결과 그래프</h4>",
            "<table style=\"border-collapse: collapse; margin: 10px auto; width: 400px; height: 300px;\">{}</table>",
            "<p style=\"font-size: 12px; color: #666; margin-top: 10px;\">",
            "위 격자에 실험 결과를 점으로 찍고 선으로 연결하여 그래프를 그려보세요.</p>",
            "</div>"
        ),
        rows
    )
}

fn render_markdown(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(content, options);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Markdown-with-HTML-islands handling shared by display and export: process
/// the markdown constructs that coexist with HTML tags, then tidy the
/// whitespace around block elements.
fn convert_mixed_content(content: &str) -> String {
    let mut out = HEADING2.replace_all(content, "<h2>$1</h2>").into_owned();
    out = HEADING3.replace_all(&out, "<h3>$1</h3>").into_owned();
    out = BOLD.replace_all(&out, "<strong>$1</strong>").into_owned();
    out = LIST_ITEM.replace_all(&out, "<li>$1</li>").into_owned();
    out = LIST_RUN
        .replace_all(&out, |caps: &regex::Captures<'_>| {
            format!("<ul>{}</ul>", &caps[0])
        })
        .into_owned();
    out = TABLE_EDGES.replace_all(&out, "$1$2").into_owned();
    out = ROW_GAPS.replace_all(&out, "$1$2$3$4$5$6").into_owned();
    out = DIV_EDGES.replace_all(&out, "$1$2").into_owned();
    out = PLAIN_BREAK.replace_all(&out, "<br>$1").into_owned();
    out = BREAK_RUNS.replace_all(&out, "<br><br>").into_owned();
    out
}

/// Convert generated content to display HTML. Content with HTML islands keeps
/// them; pure markdown goes through the markdown engine.
pub fn markdown_to_html(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    if content.contains('<') && content.contains('>') {
        convert_mixed_content(content)
    } else {
        render_markdown(content)
    }
}

/// Convert generated content to the HTML body of a word-processor document.
/// The graph container is replaced by the grid-table fallback first.
fn markdown_to_word_html(content: &str) -> String {
    let content = GRAPH_CONTAINER
        .replace_all(content, grid_table_fallback())
        .into_owned();
    if content.contains('<') && content.contains('>') {
        convert_mixed_content(&content)
    } else {
        render_markdown(&content)
    }
}

/// Wrap content into a self-contained document that word processors open
/// natively: `.doc` extension, `application/msword` content type, Word
/// generator metadata.
pub fn export_word_document(content: &str, base_name: &str) -> WordDocument {
    let body = markdown_to_word_html(content);
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="ProgId" content="Word.Document">
    <meta name="Generator" content="Microsoft Word 15">
    <title>{base_name}</title>
    <style type="text/css">
        body {{ font-family: '맑은 고딕', Arial, sans-serif; font-size: 12pt; line-height: 1.6; margin: 2cm; }}
        h1 {{ font-size: 18pt; font-weight: bold; margin-top: 20pt; margin-bottom: 10pt; }}
        h2 {{ font-size: 16pt; font-weight: bold; margin-top: 15pt; margin-bottom: 8pt; }}
        h3 {{ font-size: 14pt; font-weight: bold; margin-top: 12pt; margin-bottom: 6pt; }}
        p {{ margin-top: 6pt; margin-bottom: 6pt; }}
        ul {{ margin-left: 20pt; }}
        li {{ margin-bottom: 3pt; }}
        strong {{ font-weight: bold; }}
        em {{ font-style: italic; }}
        table {{ border-collapse: collapse; width: 100%; margin: 15px 0; }}
        th, td {{ border: 1px solid #333; padding: 8px; text-align: center; }}
        th {{ background-color: #f0f0f0; font-weight: bold; }}
    </style>
</head>
<body>
{body}
</body>
</html>"#
    );
    WordDocument {
        file_name: format!("{base_name}.doc"),
        content_type: WORD_CONTENT_TYPE,
        html,
    }
}

/// `실험설계안_2026. 8. 5.` — the date rendered the way Korean locales print it.
pub fn experiment_file_base(date: NaiveDate) -> String {
    format!("실험설계안_{}", korean_date(date))
}

/// `학생용템플릿_2026. 8. 5.`
pub fn template_file_base(date: NaiveDate) -> String {
    format!("학생용템플릿_{}", korean_date(date))
}

fn korean_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}. {}. {}.", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH_BLOCK: &str = concat!(
        "<div class=\"graph-container\">\n",
        "<div class=\"graph-title\">(그래프 1) 실험 결과 그래프</div>\n",
        "<div class=\"graph-area\">\n",
        "<img src=\"data:image/svg+xml;base64,AAAA\" alt=\"좌표평면 그래프\">\n",
        "</div>\n",
        "</div>"
    );

    #[test]
    fn export_replaces_graph_with_grid_table() {
        let content = format!("## 데이터 그래프\n{GRAPH_BLOCK}\n## 결론");
        let doc = export_word_document(&content, "테스트");

        assert!(!doc.html.contains("data:image/svg+xml"));
        assert!(doc.html.contains("위 격자에 실험 결과를 점으로 찍고"));
        // 8 rows of 10 bordered cells
        assert_eq!(doc.html.matches("<tr style=\"height: 30px;\">").count(), 8);
    }

    #[test]
    fn export_carries_word_metadata_and_doc_extension() {
        let doc = export_word_document("## 실험 제목\n자유 낙하", "실험설계안_2026. 8. 5.");
        assert_eq!(doc.file_name, "실험설계안_2026. 8. 5..doc");
        assert_eq!(doc.content_type, "application/msword");
        assert!(doc.html.contains("ProgId"));
        assert!(doc.html.contains("맑은 고딕"));
    }

    #[test]
    fn pure_markdown_goes_through_the_markdown_engine() {
        let html = markdown_to_html("## 실험 목표\n\n낙하 시간을 측정한다.");
        assert!(html.contains("<h2>실험 목표</h2>"));
        assert!(html.contains("낙하 시간을 측정한다."));
    }

    #[test]
    fn mixed_content_keeps_html_islands() {
        let content = "## 관찰 및 측정 결과\n<table border=\"1\">\n<tr><th>회차</th></tr>\n<tr><td></td></tr>\n</table>";
        let html = markdown_to_html(content);
        assert!(html.contains("<h2>관찰 및 측정 결과</h2>"));
        assert!(html.contains("<tr><th>회차</th></tr><tr><td></td></tr>"));
    }

    #[test]
    fn korean_file_names() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        assert_eq!(experiment_file_base(date), "실험설계안_2026. 8. 5.");
        assert_eq!(template_file_base(date), "학생용템플릿_2026. 8. 5.");
    }

    #[test]
    fn write_to_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let doc = export_word_document("내용", "문서");
        let path = doc.write_to(dir.path()).unwrap();
        assert!(path.ends_with("문서.doc"));
        assert!(std::fs::read_to_string(path).unwrap().contains("내용"));
    }
}
