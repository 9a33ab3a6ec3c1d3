//! Server-rendered HTML pages.
//!
//! Every page is rebuilt from scratch on each request: notice, sorted listing, forms.

use std::fmt::Write as _;

use stockroom_core::ItemKey;
use stockroom_inventory::{Catalog, LedgerEntry};

use crate::app::notice::Notice;

/// Static description of a quantity page (session ledger or remote store).
#[derive(Debug, Clone, Copy)]
pub struct LedgerPage {
    pub base: &'static str,
    pub title: &'static str,
}

pub const LEDGER_PAGE: LedgerPage = LedgerPage {
    base: "/ledger",
    title: "Stockroom with quantities",
};

pub const STORE_PAGE: LedgerPage = LedgerPage {
    base: "/store",
    title: "Shared stockroom",
};

const EMPTY: &str = "<p class=\"empty\">The stockroom is <strong>empty</strong>.</p>";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, notices: &[Notice], body: &str, footer: &str) -> String {
    let notice: String = notices
        .iter()
        .map(|n| {
            format!(
                "<div class=\"notice notice-{}\" role=\"status\">{}</div>",
                n.level.as_str(),
                escape(&n.text)
            )
        })
        .collect();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}
.notice {{ padding: .5rem 1rem; border-radius: 4px; }}
.notice-success {{ background: #e6f4ea; }}
.notice-info {{ background: #e8f0fe; }}
.notice-warning {{ background: #fef7e0; }}
.notice-error {{ background: #fce8e6; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ text-align: left; padding: .25rem .5rem; border-bottom: 1px solid #ddd; }}
</style>
</head>
<body>
<nav><a href="/catalog">Names only</a> | <a href="/ledger">With quantities</a> | <a href="/store">Shared</a></nav>
<h1>{title}</h1>
{notice}
{body}
<hr>
<footer><small>{footer}</small></footer>
</body>
</html>
"#,
        title = escape(title),
        footer = escape(footer),
    )
}

fn options<'a>(keys: impl Iterator<Item = &'a ItemKey>) -> String {
    keys.map(|k| {
        let k = escape(k.as_str());
        format!("<option value=\"{k}\">{k}</option>")
    })
    .collect()
}

pub fn catalog_page(catalog: &Catalog, notices: &[Notice]) -> String {
    let mut body = String::new();

    body.push_str(
        r#"<section>
<h2>Add item</h2>
<form method="post" action="/catalog/add">
<label>Item name <input name="name" autofocus></label>
<button type="submit">Add to stockroom</button>
</form>
</section>
<section>
<h2>Stock</h2>
"#,
    );

    if catalog.is_empty() {
        body.push_str(EMPTY);
    } else {
        body.push_str("<ol>");
        for key in catalog.list_sorted() {
            let _ = write!(body, "<li>{}</li>", escape(key.as_str()));
        }
        body.push_str("</ol>");
    }
    body.push_str("</section>\n<section>\n<h2>Remove item</h2>\n");

    if catalog.is_empty() {
        body.push_str("<p class=\"info\">No items to remove.</p>");
    } else {
        let _ = write!(
            body,
            r#"<form method="post" action="/catalog/remove">
<label>Item <select name="name">{}</select></label>
<button type="submit">Remove from stockroom</button>
</form>"#,
            options(catalog.list_sorted())
        );
    }
    body.push_str("</section>");

    layout(
        "Simple stockroom",
        notices,
        &body,
        "Kept in this browser session only.",
    )
}

pub fn ledger_page(
    page: &LedgerPage,
    entries: &[LedgerEntry],
    notices: &[Notice],
    footer: &str,
) -> String {
    let base = page.base;
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<section>
<h2>Add item / top up</h2>
<form method="post" action="{base}/add">
<label>Item name <input name="name" autofocus></label>
<label>Quantity <input name="quantity" type="number" min="1" step="1" value="1"></label>
<button type="submit">Add / top up</button>
</form>
</section>
<section>
<h2>Stock</h2>
"#
    );

    if entries.is_empty() {
        body.push_str(EMPTY);
    } else {
        body.push_str(
            "<table><thead><tr><th>#</th><th>Item</th><th>Quantity</th></tr></thead><tbody>",
        );
        for (i, entry) in entries.iter().enumerate() {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                i + 1,
                escape(entry.key.as_str()),
                entry.quantity
            );
        }
        let _ = write!(
            body,
            "</tbody></table><p>Distinct items: <strong>{}</strong></p>",
            entries.len()
        );
    }
    body.push_str("</section>\n");

    body.push_str("<section>\n<h2>Receive / issue</h2>\n");
    if entries.is_empty() {
        body.push_str("<p class=\"info\">No items to adjust. Add an item first.</p>");
    } else {
        let _ = write!(
            body,
            r#"<form method="post" action="{base}/adjust">
<label>Item <select name="name">{opts}</select></label>
<label><input type="radio" name="direction" value="receive" checked> Receive</label>
<label><input type="radio" name="direction" value="issue"> Issue</label>
<label>Amount <input name="amount" type="number" min="1" step="1" value="1"></label>
<button type="submit">Apply</button>
</form>"#,
            opts = options(entries.iter().map(|e| &e.key)),
        );
    }
    body.push_str("</section>\n");

    body.push_str("<section>\n<h2>Remove item completely</h2>\n");
    if entries.is_empty() {
        body.push_str("<p class=\"info\">No items to remove.</p>");
    } else {
        let _ = write!(
            body,
            r#"<form method="post" action="{base}/remove">
<label>Item <select name="name">{opts}</select></label>
<label><input type="checkbox" name="confirm" value="yes"> I understand the whole quantity is discarded</label>
<button type="submit">Remove completely</button>
</form>"#,
            opts = options(entries.iter().map(|e| &e.key)),
        );
    }
    body.push_str("</section>");

    layout(page.title, notices, &body, footer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::notice::Level;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<b>"A&B'</b>"#),
            "&lt;b&gt;&quot;A&amp;B&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn empty_ledger_hides_adjust_and_remove_forms() {
        let html = ledger_page(&LEDGER_PAGE, &[], &[], "");
        assert!(html.contains("The stockroom is <strong>empty</strong>"));
        assert!(!html.contains("/ledger/adjust"));
        assert!(!html.contains("/ledger/remove"));
    }

    #[test]
    fn listing_rows_are_numbered_in_given_order() {
        let entries = vec![
            LedgerEntry {
                key: ItemKey::parse("apple").unwrap(),
                quantity: 2,
            },
            LedgerEntry {
                key: ItemKey::parse("pear").unwrap(),
                quantity: 7,
            },
        ];
        let html = ledger_page(&STORE_PAGE, &entries, &[], "");
        assert!(html.contains("<tr><td>1</td><td>APPLE</td><td>2</td></tr>"));
        assert!(html.contains("<tr><td>2</td><td>PEAR</td><td>7</td></tr>"));
        assert!(html.contains("action=\"/store/adjust\""));
        assert!(html.contains("Distinct items: <strong>2</strong>"));
    }

    #[test]
    fn notice_is_rendered_escaped() {
        let notice = Notice::new(Level::Error, "<oops>");
        let html = catalog_page(&Catalog::new(), &[notice]);
        assert!(html.contains("notice-error"));
        assert!(html.contains("&lt;oops&gt;"));
    }

    #[test]
    fn notices_render_in_order() {
        let notices = [
            Notice::new(Level::Success, "saved"),
            Notice::new(Level::Error, "listing failed"),
        ];
        let html = ledger_page(&STORE_PAGE, &[], &notices, "");
        let saved = html.find("notice-success").unwrap();
        let failed = html.find("notice-error").unwrap();
        assert!(saved < failed);
    }
}
