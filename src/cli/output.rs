// Output formatting utilities

use crate::models::ResolvedItem;
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 { // Sanity check
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Label for the kind of a listed item
pub fn item_kind(item: &ResolvedItem, folder_page_type: &str) -> &'static str {
    match item {
        ResolvedItem::Stack(stack) => stack.stack_type.as_str(),
        ResolvedItem::Page(page) => {
            if page.page_type_handle.as_deref() == Some(folder_page_type) {
                "folder"
            } else {
                "page"
            }
        }
    }
}

/// Truncate to `width` characters, marking the cut with `…`
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

struct ListingRow {
    id: String,
    kind: &'static str,
    name: String,
    status: &'static str,
    section: String,
    path: String,
}

/// Format a stack listing as a table.
///
/// Name and path share whatever width the fixed columns leave over.
pub fn format_listing_table(
    items: &[ResolvedItem],
    folder_page_type: &str,
    width: usize,
    is_tty: bool,
) -> String {
    if items.is_empty() {
        return "No items found.\n".to_string();
    }

    let rows: Vec<ListingRow> = items
        .iter()
        .map(|item| {
            let page = item.page();
            let section = match item {
                ResolvedItem::Stack(stack) => match stack.section_id {
                    Some(id) if id != 0 => id.to_string(),
                    _ => String::new(),
                },
                ResolvedItem::Page(_) => String::new(),
            };
            ListingRow {
                id: item.id().to_string(),
                kind: item_kind(item, folder_page_type),
                name: item.name().to_string(),
                status: if page.is_approved() { "approved" } else { "draft" },
                section,
                path: page.path.clone().unwrap_or_default(),
            }
        })
        .collect();

    let id_w = rows.iter().map(|r| r.id.len()).max().unwrap_or(0).max(2);
    let kind_w = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0).max(4);
    let status_w = 8;
    let section_w = rows.iter().map(|r| r.section.len()).max().unwrap_or(0).max(7);
    let fixed = id_w + kind_w + status_w + section_w + 5;
    let flexible = width.saturating_sub(fixed).max(20);
    let name_w = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4)
        .min(flexible / 2);
    let path_w = flexible.saturating_sub(name_w);

    let mut output = String::new();
    let header = format!(
        "{:<id_w$} {:<kind_w$} {:<name_w$} {:<status_w$} {:<section_w$} {}",
        "ID", "Kind", "Name", "Status", "Section", "Path",
    );
    output.push_str(&bold_if_tty(header.trim_end(), is_tty));
    output.push('\n');

    for row in &rows {
        let line = format!(
            "{:<id_w$} {:<kind_w$} {:<name_w$} {:<status_w$} {:<section_w$} {}",
            row.id,
            row.kind,
            truncate(&row.name, name_w),
            row.status,
            row.section,
            truncate(&row.path, path_w),
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Page, PageVersion, Stack, StackType};

    fn page(id: i64, name: &str, handle: Option<&str>, approved: bool) -> Page {
        Page {
            id,
            parent_id: Some(1),
            path: Some(format!("/!stacks/{}", name)),
            page_type_id: handle.map(|_| 2),
            page_type_handle: handle.map(|h| h.to_string()),
            is_system: true,
            is_active: true,
            display_order: 0,
            created_ts: 0,
            version: Some(PageVersion {
                id: id * 10,
                name: name.to_string(),
                is_approved: approved,
                created_ts: 0,
            }),
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_item_kind() {
        let folder = ResolvedItem::Page(page(2, "Folder", Some("core_stack_category"), true));
        let plain = ResolvedItem::Page(page(3, "Category", None, true));
        let area = ResolvedItem::Stack(Stack {
            page: page(4, "Footer", None, true),
            name: "Footer".to_string(),
            stack_type: StackType::GlobalArea,
            section_id: None,
        });
        assert_eq!(item_kind(&folder, "core_stack_category"), "folder");
        assert_eq!(item_kind(&plain, "core_stack_category"), "page");
        assert_eq!(item_kind(&area, "core_stack_category"), "global area");
    }

    #[test]
    fn test_format_listing_table() {
        let items = vec![
            ResolvedItem::Page(page(2, "News", Some("core_stack_category"), true)),
            ResolvedItem::Stack(Stack {
                page: page(5, "Header", None, false),
                name: "Header".to_string(),
                stack_type: StackType::UserAdded,
                section_id: Some(9),
            }),
        ];
        let table = format_listing_table(&items, "core_stack_category", 120, false);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("folder") && lines[1].contains("News") && lines[1].contains("approved"));
        assert!(lines[2].contains("stack") && lines[2].contains("draft") && lines[2].contains('9'));
        assert!(!table.contains(ANSI_BOLD));
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(format_listing_table(&[], "core_stack_category", 80, true), "No items found.\n");
    }
}
