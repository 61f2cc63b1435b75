//! Markdown rendering of canonical markup.

use civic_core::source::Renderer;

/// Renders stored markup to markdown with [`htmd`].
///
/// Stateless, so the output depends on the input markup alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
  fn render(&self, raw: &str) -> civic_core::Result<String> {
    htmd::convert(raw).map_err(|e| civic_core::Error::Render(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_headings_and_links() {
    let md = MarkdownRenderer
      .render("<h1>\n  Park Plan\n</h1>\n<p>\n  See <a href=\"https://example.org/x\">the map</a>\n</p>\n")
      .unwrap();
    assert!(md.contains("Park Plan"), "{md}");
    assert!(md.contains("[the map](https://example.org/x)"), "{md}");
  }

  #[test]
  fn rendering_is_deterministic() {
    let raw = "<ul>\n  <li>\n    one\n  </li>\n  <li>\n    two\n  </li>\n</ul>\n";
    assert_eq!(
      MarkdownRenderer.render(raw).unwrap(),
      MarkdownRenderer.render(raw).unwrap()
    );
  }
}
