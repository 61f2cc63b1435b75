//! Canonical serialization of page content.
//!
//! The output only depends on the document tree, never on source
//! formatting: one node per line, two-space indentation, whitespace runs in
//! text collapsed, attributes sorted by name, comments dropped. Content of
//! `pre` and `textarea` is kept verbatim on a single logical line.
//!
//! Cleanup rules are applied during the walk, so the parsed tree itself is
//! never mutated.

use scraper::{ElementRef, Node};
use url::Url;

use crate::rules::CompiledRules;

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
  "source", "track", "wbr",
];

const PREFORMATTED: &[&str] = &["pre", "textarea"];

const INDENT: &str = "  ";

pub(crate) struct Canonicalizer<'r> {
  rules: &'r CompiledRules,
  /// Relative URLs are resolved against this.
  base:  &'r Url,
}

impl<'r> Canonicalizer<'r> {
  pub fn new(rules: &'r CompiledRules, base: &'r Url) -> Self {
    Self { rules, base }
  }

  /// Serialize the children of `root` (not `root` itself).
  pub fn inner_of(&self, root: ElementRef<'_>) -> String {
    let mut lines = Vec::new();
    self.children(root, 0, &mut lines);
    let mut out = lines.join("\n");
    out.push('\n');
    out
  }

  fn children(&self, el: ElementRef<'_>, depth: usize, lines: &mut Vec<String>) {
    for child in el.children() {
      match child.value() {
        Node::Text(text) => {
          let text = collapse_whitespace(text);
          if !text.is_empty() {
            lines.push(format!("{}{}", INDENT.repeat(depth), escape(&text, false)));
          }
        }
        Node::Element(_) => {
          if let Some(child) = ElementRef::wrap(child) {
            self.element(child, depth, lines);
          }
        }
        _ => {}
      }
    }
  }

  fn element(&self, el: ElementRef<'_>, depth: usize, lines: &mut Vec<String>) {
    if self.is_removed(&el) {
      return;
    }

    let name = el.value().name();
    let indent = INDENT.repeat(depth);
    let open = self.open_tag(&el);

    if VOID_ELEMENTS.contains(&name) {
      lines.push(format!("{indent}{open}"));
      return;
    }

    if PREFORMATTED.contains(&name) {
      let mut inner = String::new();
      self.verbatim(el, &mut inner);
      lines.push(format!("{indent}{open}{inner}</{name}>"));
      return;
    }

    let before = lines.len();
    lines.push(format!("{indent}{open}"));
    self.children(el, depth + 1, lines);

    if lines.len() == before + 1 {
      // Nothing inside: keep the pair on one line.
      lines[before].push_str(&format!("</{name}>"));
    } else {
      lines.push(format!("{indent}</{name}>"));
    }
  }

  /// Serialize children without reformatting; used inside `pre`.
  fn verbatim(&self, el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
      match child.value() {
        Node::Text(text) => out.push_str(&escape(text, false)),
        Node::Element(_) => {
          let Some(child) = ElementRef::wrap(child) else { continue };
          if self.is_removed(&child) {
            continue;
          }
          let name = child.value().name();
          out.push_str(&self.open_tag(&child));
          if !VOID_ELEMENTS.contains(&name) {
            self.verbatim(child, out);
            out.push_str(&format!("</{name}>"));
          }
        }
        _ => {}
      }
    }
  }

  fn is_removed(&self, el: &ElementRef<'_>) -> bool {
    self.rules.remove.iter().any(|sel| sel.matches(el))
  }

  fn open_tag(&self, el: &ElementRef<'_>) -> String {
    let rule_hits = |rules: &[(scraper::Selector, String)], attr: &str| {
      rules
        .iter()
        .any(|(sel, name)| name.as_str() == attr && sel.matches(el))
    };

    // Sorted so output does not depend on attribute map order.
    let mut attrs: Vec<(String, String)> = el
      .value()
      .attrs()
      .filter(|&(name, _)| !rule_hits(&self.rules.strip, name))
      .map(|(name, value)| {
        let value = if rule_hits(&self.rules.absolutize, name) {
          resolve(self.base, value)
        } else {
          value.to_owned()
        };
        (name.to_owned(), value)
      })
      .collect();
    attrs.sort();

    let mut tag = format!("<{}", el.value().name());
    for (name, value) in attrs {
      tag.push_str(&format!(" {name}=\"{}\"", escape(&value, true)));
    }
    tag.push('>');
    tag
  }
}

/// Resolve `value` against `base`; unparseable values are kept as they are.
pub(crate) fn resolve(base: &Url, value: &str) -> String {
  base
    .join(value.trim())
    .map(|u| u.to_string())
    .unwrap_or_else(|_| value.to_owned())
}

/// Collapse runs of ASCII whitespace. Non-breaking spaces are content.
pub(crate) fn collapse_whitespace(s: &str) -> String {
  s.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape(s: &str, attribute: bool) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' if attribute => out.push_str("&quot;"),
      '\u{a0}' => out.push_str("&nbsp;"),
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use scraper::{Html, Selector};

  use super::*;
  use crate::rules::{CompiledRules, Rule};

  fn canonical(html: &str, rules: &[Rule]) -> String {
    let compiled = CompiledRules::compile(rules).unwrap();
    let base = Url::parse("https://example.org/projects/park").unwrap();
    let doc = Html::parse_document(html);
    let root = doc
      .select(&Selector::parse("#root").unwrap())
      .next()
      .unwrap();
    Canonicalizer::new(&compiled, &base).inner_of(root)
  }

  #[test]
  fn pretty_prints_one_node_per_line() {
    let out = canonical(
      r#"<div id="root"><section><h1>Title</h1><p>Body</p></section></div>"#,
      &[],
    );
    assert_eq!(
      out,
      "<section>\n  <h1>\n    Title\n  </h1>\n  <p>\n    Body\n  </p>\n</section>\n"
    );
  }

  #[test]
  fn source_formatting_does_not_matter() {
    let tight = canonical(r#"<div id="root"><p class="a" id="b">Hello   world</p></div>"#, &[]);
    let loose = canonical(
      "<div id=\"root\">\n\n   <p id=\"b\"   class=\"a\">\n Hello\n\tworld </p>  </div>",
      &[],
    );
    assert_eq!(tight, loose);
    assert!(tight.contains(r#"<p class="a" id="b">"#));
  }

  #[test]
  fn removed_elements_vanish_with_their_subtree() {
    let out = canonical(
      r#"<div id="root"><p>Keep</p><script>track()</script><div class="SocialSharing"><a href="x">Share</a></div></div>"#,
      &[Rule::remove("script"), Rule::remove(".SocialSharing")],
    );
    assert!(out.contains("Keep"));
    assert!(!out.contains("track"));
    assert!(!out.contains("Share"));
  }

  #[test]
  fn strip_attribute_only_hits_matching_elements() {
    let out = canonical(
      r#"<div id="root"><input id="q1" name="q"><label for="q1">Q</label><p id="keep">x</p></div>"#,
      &[Rule::strip_attribute("input", "id"), Rule::strip_attribute("label", "for")],
    );
    assert!(out.contains(r#"<input name="q">"#));
    assert!(out.contains("<label>"));
    assert!(out.contains(r#"<p id="keep">"#));
  }

  #[test]
  fn relative_urls_become_absolute() {
    let out = canonical(
      r#"<div id="root"><a href="/about">About</a><img src="pics/a.png"><a href="https://other.org/x">X</a></div>"#,
      &[Rule::absolutize("a", "href"), Rule::absolutize("img", "src")],
    );
    assert!(out.contains(r#"<a href="https://example.org/about">"#));
    assert!(out.contains(r#"<img src="https://example.org/projects/pics/a.png">"#));
    assert!(out.contains(r#"<a href="https://other.org/x">"#));
  }

  #[test]
  fn empty_elements_stay_on_one_line() {
    let out = canonical(r#"<div id="root"><span class="icon"></span><br></div>"#, &[]);
    assert_eq!(out, "<span class=\"icon\"></span>\n<br>\n");
  }

  #[test]
  fn preformatted_text_is_verbatim() {
    let out = canonical("<div id=\"root\"><pre>a  b\n  c <b>d</b></pre></div>", &[]);
    assert_eq!(out, "<pre>a  b\n  c <b>d</b></pre>\n");
  }

  #[test]
  fn text_and_attributes_are_escaped() {
    let out = canonical(
      r#"<div id="root"><p title="say &quot;hi&quot;">1 &lt; 2 &amp; 3</p></div>"#,
      &[],
    );
    assert!(out.contains(r#"<p title="say &quot;hi&quot;">"#));
    assert!(out.contains("1 &lt; 2 &amp; 3"));
  }

  #[test]
  fn comments_are_dropped() {
    let out = canonical("<div id=\"root\"><!-- build 42 --><p>x</p></div>", &[]);
    assert!(!out.contains("build"));
  }

  #[test]
  fn collapse_whitespace_trims_and_joins() {
    assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    assert_eq!(collapse_whitespace(" \n "), "");
    assert_eq!(collapse_whitespace(" a\u{a0}b "), "a\u{a0}b");
  }

  #[test]
  fn non_breaking_space_is_kept() {
    let nbsp = canonical("<div id=\"root\"><p>a&nbsp;b</p></div>", &[]);
    let plain = canonical("<div id=\"root\"><p>a b</p></div>", &[]);
    assert!(nbsp.contains("a&nbsp;b"), "{nbsp}");
    assert_ne!(nbsp, plain);
  }
}
