// src/infrastructure/cleaner.rs
//
// Main-content extraction: pick the most article-like container, drop known
// boilerplate, flatten to plain text. Pages that yield less than 100
// characters after normalization carry no indexable content and come back as
// `None`, as does any internal failure, so cleaning never aborts a run.

use regex::Regex;
use select::document::Document;
use select::node::Node;
use select::predicate::{Attr, Name};
use std::sync::OnceLock;
use tracing::instrument;

/// Minimum plain-text length for a page to count as having content.
const MIN_CONTENT_LENGTH: usize = 100;

/// Containers that never carry article text.
const NOISE_TAGS: [&str; 5] = ["nav", "footer", "script", "style", "aside"];

fn noise_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)nav|footer|ads|sidebar|header").unwrap())
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Extract the main article text of a page, or `None` when the page has no
/// usable content.
#[instrument(skip(html), fields(len = html.len()))]
pub fn clean_html(html: &str) -> Option<String> {
    if html.trim().is_empty() {
        return None;
    }

    let document = Document::from(html);
    let root = main_content_root(&document)?;

    let mut collected = String::new();
    collect_text(root, &mut collected);

    let text = whitespace_pattern()
        .replace_all(collected.trim(), " ")
        .into_owned();

    if text.len() < MIN_CONTENT_LENGTH {
        None
    } else {
        Some(text)
    }
}

/// Most article-like container: article, then main, then [role=main], then
/// body, then the whole document.
fn main_content_root(document: &Document) -> Option<Node> {
    document
        .find(Name("article"))
        .next()
        .or_else(|| document.find(Name("main")).next())
        .or_else(|| document.find(Attr("role", "main")).next())
        .or_else(|| document.find(Name("body")).next())
        .or_else(|| document.find(Name("html")).next())
}

/// Depth-first text collection, skipping noise subtrees.
fn collect_text(node: Node, out: &mut String) {
    if let Some(text) = node.as_text() {
        out.push_str(text);
        out.push(' ');
        return;
    }

    if let Some(name) = node.name() {
        if NOISE_TAGS.contains(&name) {
            return;
        }
        let noisy_attr = node
            .attr("class")
            .is_some_and(|v| noise_pattern().is_match(v))
            || node.attr("id").is_some_and(|v| noise_pattern().is_match(v));
        if noisy_attr {
            return;
        }
    }

    for child in node.children() {
        collect_text(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_body() -> String {
        "Rust is a systems programming language focused on safety and speed. "
            .repeat(3)
    }

    #[test]
    fn given_article_page_when_cleaning_then_main_text_extracted() {
        let html = format!(
            r#"<html><body>
                <nav>Home | About | Contact</nav>
                <article><p>{}</p></article>
                <footer>Copyright 2024</footer>
            </body></html>"#,
            article_body()
        );

        let text = clean_html(&html).unwrap();
        assert!(text.contains("systems programming language"));
        assert!(!text.contains("Home | About"));
        assert!(!text.contains("Copyright"));
    }

    #[test]
    fn given_noise_tags_when_cleaning_then_they_are_dropped() {
        let html = format!(
            r#"<body>
                <script>var x = 1;</script>
                <style>.a {{ color: red }}</style>
                <aside>Related posts</aside>
                <p>{}</p>
            </body>"#,
            article_body()
        );

        let text = clean_html(&html).unwrap();
        assert!(!text.contains("var x"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Related posts"));
    }

    #[test]
    fn given_noise_classes_and_ids_when_cleaning_then_they_are_dropped() {
        let html = format!(
            r#"<body>
                <div class="Sidebar-wrap">Trending now</div>
                <div id="page-header">Site name</div>
                <div class="content">{}</div>
            </body>"#,
            article_body()
        );

        let text = clean_html(&html).unwrap();
        assert!(!text.contains("Trending now"));
        assert!(!text.contains("Site name"));
        assert!(text.contains("systems programming"));
    }

    #[test]
    fn given_short_page_when_cleaning_then_none() {
        assert_eq!(clean_html("<body><p>Too short.</p></body>"), None);
        assert_eq!(clean_html(""), None);
        assert_eq!(clean_html("   "), None);
    }

    #[test]
    fn given_whitespace_runs_when_cleaning_then_collapsed_to_single_spaces() {
        let html = format!(
            "<body><p>{}</p>\n\n<p>Line\ntwo   has\t\tgaps. {}</p></body>",
            article_body(),
            article_body()
        );

        let text = clean_html(&html).unwrap();
        assert!(text.contains("Line two has gaps."));
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
    }

    #[test]
    fn given_malformed_markup_when_cleaning_then_no_panic() {
        let html = format!("<body><div><p>{}<span>unclosed", article_body());
        assert!(clean_html(&html).is_some());
    }
}
