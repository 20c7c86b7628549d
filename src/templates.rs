use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::SiteConfig;
use crate::models::file_entry::FileEntry;
use crate::models::listing::ListingView;
use crate::services::file_service::escape_link;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; padding: 0 1rem; }
header { display: flex; justify-content: space-between; align-items: baseline; }
header a { text-decoration: none; color: inherit; }
nav.breadcrumbs { margin: 0.5rem 0 1rem; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 0.35rem 0.5rem; border-bottom: 1px solid #eee; }
td.size, th.size { text-align: right; white-space: nowrap; }
td.modified { white-space: nowrap; color: #666; }
button.fav { background: none; border: none; cursor: pointer; font-size: 1.1rem; }
";

const SCRIPT: &str = "
document.querySelectorAll('button.fav').forEach(function (button) {
  button.addEventListener('click', async function () {
    var active = button.dataset.favorite === 'true';
    var body = active
      ? { path: button.dataset.path }
      : { path: button.dataset.path, name: button.dataset.name };
    var response = await fetch('/api/favorite', {
      method: active ? 'DELETE' : 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body),
    });
    if (response.ok) {
      location.reload();
    }
  });
});
";

/// Directory hrefs always end in `/`.
fn directory_href(path: &str) -> String {
    if path.ends_with('/') {
        escape_link(path)
    } else {
        escape_link(&format!("{path}/"))
    }
}

fn entry_row(entry: &FileEntry, open_in_new_window: bool) -> Markup {
    let target = (open_in_new_window && !entry.is_directory).then_some("_blank");
    html! {
        tr {
            td {
                button.fav type="button"
                    title=(if entry.is_favorite { "Remove favorite" } else { "Add favorite" })
                    data-path=(entry.path)
                    data-name=(entry.name)
                    data-favorite=(if entry.is_favorite { "true" } else { "false" }) {
                    (if entry.is_favorite { "★" } else { "☆" })
                }
            }
            td.name {
                a href=(entry.link) target=[target] {
                    (entry.name)
                    @if entry.is_directory { "/" }
                }
            }
            td.size { (entry.size) }
            td.modified { (entry.modified_at) }
        }
    }
}

pub fn render_listing(site: &SiteConfig, view: &ListingView) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (site.title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                header {
                    h1 { a href="/" { (site.title) } }
                    a href="/favorites" { "Favorites" }
                }
                @if view.is_favorites_page {
                    h2 { "Favorites" }
                } @else {
                    nav.breadcrumbs {
                        a href="/" { "Home" }
                        @for crumb in &view.breadcrumbs {
                            " / "
                            a href=(directory_href(&crumb.path)) { (crumb.name) }
                        }
                    }
                    form method="get" action="" {
                        input type="search" name="q" placeholder="Search files" value=[view.query.as_deref()];
                        button type="submit" { "Search" }
                    }
                }
                table {
                    thead {
                        tr {
                            th {}
                            th { "Name" }
                            th.size { "Size" }
                            th { "Modified" }
                        }
                    }
                    tbody {
                        @if let Some(parent) = &view.parent {
                            tr {
                                td {}
                                td.name { a href=(directory_href(parent)) { ".." } }
                                td.size {}
                                td.modified {}
                            }
                        }
                        @for entry in &view.files {
                            (entry_row(entry, site.open_in_new_window))
                        }
                    }
                }
                @if view.files.is_empty() {
                    p.empty {
                        @if view.query.is_some() { "No matches." } @else { "Nothing here." }
                    }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}
