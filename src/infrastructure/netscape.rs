// src/infrastructure/netscape.rs
//
// Parser for the Netscape bookmark file format every major browser exports:
// a loosely nested DL/DT tree where H3 headings mark folders and A elements
// are the bookmarks. Exports are routinely malformed (unclosed DT/DD, stray
// paragraphs), so parsing leans on html5ever's tolerant tree building and
// never fails; the worst case is an empty list.

use crate::domain::bookmark::Bookmark;
use chrono::{DateTime, TimeZone, Utc};
use select::document::Document;
use select::node::Node;
use select::predicate::Name;
use tracing::{debug, instrument};

/// Parse a bookmark export into bookmarks in document order.
///
/// Duplicate urls are preserved; folder paths are the `/`-joined ancestor
/// heading texts. When no DL list exists at all, falls back to a flat scan
/// of every link with an empty folder path.
#[instrument(skip(html), fields(len = html.len()))]
pub fn parse_netscape_export(html: &str) -> Vec<Bookmark> {
    if html.trim().is_empty() {
        return Vec::new();
    }

    let document = Document::from(html);
    let mut bookmarks = Vec::new();

    match document.find(Name("dl")).next() {
        Some(root_list) => {
            let mut path = Vec::new();
            process_list(root_list, &mut path, &mut bookmarks);
        }
        None => {
            // Structure too broken for folder context: take every link as-is.
            debug!("no root list found, falling back to flat link scan");
            for anchor in document.find(Name("a")) {
                if let Some(href) = anchor.attr("href") {
                    bookmarks.push(bookmark_from_anchor(anchor, href, String::new()));
                }
            }
        }
    }

    bookmarks
}

/// Recurse into one DL list with the current folder path on the stack.
fn process_list(list: Node, path: &mut Vec<String>, out: &mut Vec<Bookmark>) {
    // Only DT entries whose nearest DL ancestor is this list belong to it;
    // entries of nested lists are handled by their own recursion step.
    let entries: Vec<Node> = list
        .find(Name("dt"))
        .filter(|dt| nearest_list_ancestor(*dt).map(|a| a.index()) == Some(list.index()))
        .collect();

    for entry in entries {
        if let Some(heading) = direct_child(entry, "h3") {
            path.push(heading.text().trim().to_string());

            // The folder's list is normally the next sibling of the unclosed
            // DT; tolerant tree builders sometimes nest it inside instead.
            let sublist =
                next_sibling_list(entry).or_else(|| entry.find(Name("dl")).next());
            if let Some(sublist) = sublist {
                process_list(sublist, path, out);
            }

            path.pop();
            continue;
        }

        if let Some(anchor) = direct_child(entry, "a") {
            if let Some(href) = anchor.attr("href") {
                out.push(bookmark_from_anchor(anchor, href, path.join("/")));
            }
        }
    }
}

fn direct_child<'a>(node: Node<'a>, tag: &str) -> Option<Node<'a>> {
    node.children().find(|child| child.name() == Some(tag))
}

fn nearest_list_ancestor(node: Node) -> Option<Node> {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if ancestor.name() == Some("dl") {
            return Some(ancestor);
        }
        current = ancestor.parent();
    }
    None
}

fn next_sibling_list(node: Node) -> Option<Node> {
    let mut current = node.next();
    while let Some(sibling) = current {
        if sibling.name() == Some("dl") {
            return Some(sibling);
        }
        current = sibling.next();
    }
    None
}

fn bookmark_from_anchor(anchor: Node, href: &str, folder: String) -> Bookmark {
    let title = anchor.text().trim().to_string();
    let icon = anchor.attr("icon").map(str::to_string);
    let date_added = anchor
        .attr("add_date")
        .and_then(parse_epoch_seconds)
        .unwrap_or_else(Utc::now);

    Bookmark::new(href.to_string(), title, folder, date_added, icon)
}

/// Epoch-seconds attribute value, tolerating fractional timestamps.
fn parse_epoch_seconds(value: &str) -> Option<DateTime<Utc>> {
    let seconds = value.trim().parse::<f64>().ok()?;
    Utc.timestamp_opt(seconds as i64, 0).single()
}
