//! Bridge between plain text (legacy storage, LLM output) and the HTML held by
//! the rich editor. Both directions are one-way conversions; there is no
//! round-trip guarantee beyond plain single-line input.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("invalid bold regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").expect("invalid code regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("invalid tag regex"));

/// Render plain text with light markdown-style emphasis as HTML paragraphs.
///
/// Blank lines become `<br/>`. Other lines are escaped, then get `**bold**`,
/// `*italic*`, `` `code` `` and a leading `- ` bullet converted, and are
/// wrapped in `<p>`.
pub fn text_to_html(text: &str) -> String {
  if text.is_empty() {
    return String::new();
  }
  text.split('\n').map(line_to_html).collect()
}

fn line_to_html(line: &str) -> String {
  if line.trim().is_empty() {
    return "<br/>".to_string();
  }

  let escaped = escape_html(line);
  // Bold first: a "**" run must never be read as two italic markers.
  let html = BOLD.replace_all(&escaped, "<strong>$1</strong>");
  let html = italicize(&html);
  let html = INLINE_CODE.replace_all(&html, "<code>$1</code>");
  let html = match html.strip_prefix("- ") {
    Some(rest) if !rest.is_empty() => format!("• {}", rest),
    _ => html.to_string(),
  };
  format!("<p>{}</p>", html)
}

/// Wrap text between pairs of lone asterisks in `<em>`. Runs of two or more
/// asterisks are left as literal text and never act as delimiters.
fn italicize(line: &str) -> String {
  let bytes = line.as_bytes();
  let is_star = |i: usize| bytes.get(i) == Some(&b'*');
  let lone: Vec<usize> = (0..bytes.len())
    .filter(|&i| is_star(i) && !(i > 0 && is_star(i - 1)) && !is_star(i + 1))
    .collect();

  let mut out = String::with_capacity(line.len() + 16);
  let mut cursor = 0;
  for pair in lone.chunks_exact(2) {
    let (open, close) = (pair[0], pair[1]);
    out.push_str(&line[cursor..open]);
    out.push_str("<em>");
    out.push_str(&line[open + 1..close]);
    out.push_str("</em>");
    cursor = close + 1;
  }
  out.push_str(&line[cursor..]);
  out
}

fn escape_html(s: &str) -> String {
  s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Text content of an HTML fragment with all markup discarded.
///
/// The fragment is parsed into a tree (html5ever via scraper), which never
/// fails: malformed markup is recovered the way a browser would. Empty input
/// yields an empty string.
pub fn html_to_text(html: &str) -> String {
  if html.is_empty() {
    return String::new();
  }
  let fragment = Html::parse_fragment(html);
  fragment.root_element().text().collect()
}

/// Paragraph-level conversion: blank-line separated blocks become `<p>`
/// elements and single newlines become `<br>`.
pub fn plain_text_to_html(text: &str) -> String {
  text
    .split("\n\n")
    .map(|para| format!("<p>{}</p>", escape_html(para).replace('\n', "<br>")))
    .collect()
}

/// Tree-free markup removal: drop tags, decode the common entities, trim.
/// Used where only a rough plain-text rendering is needed (export payloads).
pub fn strip_markup(html: &str) -> String {
  TAG
    .replace_all(html, "")
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&amp;", "&")
    .trim()
    .to_string()
}
