use core::fmt::Write as _;

use jarmark_database::models::SubmissionRecord;

use crate::auth::PasswordErrors;
use crate::components::main::{escape, escape_attribute};
use crate::components::submission::summary;
use crate::listing::{Listing, ListingQuery, PageItem, SortDirection, ENTRIES_PER_PAGE};

#[must_use]
pub fn login_form(csrf_input: &str, username: &str, error: Option<&str>) -> String {
    let error = error.map_or_else(String::new, |error| {
        format!(r#"<div class="error-message">{}</div>"#, escape(error))
    });
    format!(
        r#"<h1 class="center">Panel administratora</h1>
<form class="container-small" method="post" action="/admin/login" enctype="application/x-www-form-urlencoded">
    {csrf_input}
    {error}
    <label for="username">Nazwa użytkownika:</label>
    <input id="username" name="username" type="text" autocomplete="username" value="{}" required>
    <label for="password">Hasło:</label>
    <input id="password" name="password" type="password" autocomplete="current-password" required>
    <button type="submit">Zaloguj</button>
</form>"#,
        escape_attribute(username)
    )
}

fn pagination(listing: &Listing, query: &ListingQuery) -> String {
    let link = |page: usize| {
        format!(
            "/admin?{}",
            query.to_query(listing.sort, page, listing.per_page)
        )
    };
    let mut html = String::from(r#"<nav class="pagination"><ul>"#);
    if listing.page > 1 {
        let _ = write!(
            html,
            r#"<li><a href="{}">Poprzednia</a></li>"#,
            escape_attribute(&link(listing.page - 1))
        );
    }
    for item in listing.page_items() {
        match item {
            PageItem::Page(page) if page == listing.page => {
                let _ = write!(html, r#"<li><span aria-current="page">{page}</span></li>"#);
            }
            PageItem::Page(page) => {
                let _ = write!(
                    html,
                    r#"<li><a href="{}">{page}</a></li>"#,
                    escape_attribute(&link(page))
                );
            }
            PageItem::Ellipsis => html.push_str("<li><span>…</span></li>"),
        }
    }
    if listing.page < listing.total_pages {
        let _ = write!(
            html,
            r#"<li><a href="{}">Następna</a></li>"#,
            escape_attribute(&link(listing.page + 1))
        );
    }
    html.push_str("</ul></nav>");
    html
}

fn search_form(listing: &Listing, query: &ListingQuery) -> String {
    let mut per_page = String::new();
    for entries in ENTRIES_PER_PAGE {
        let selected = if entries == listing.per_page { " selected" } else { "" };
        let _ = write!(per_page, r#"<option value="{entries}"{selected}>{entries}</option>"#);
    }
    format!(
        r#"<form class="search" method="get" action="/admin">
    <input type="search" name="q" placeholder="Szukaj zgłoszeń..." value="{}">
    <input type="hidden" name="sort" value="{}">
    <label for="perPage">Pokaż:</label>
    <select id="perPage" name="perPage">{per_page}</select>
    <button type="submit">Szukaj</button>
</form>"#,
        escape_attribute(&query.q),
        listing.sort.as_str(),
    )
}

fn export_links(query: &ListingQuery) -> String {
    let search = if query.q.is_empty() {
        String::new()
    } else {
        serde_urlencoded::to_string([("q", query.q.as_str())])
            .map(|encoded| format!("?{encoded}"))
            .unwrap_or_default()
    };
    format!(
        r#"<div class="export">
    <a class="button" href="/admin/export/csv{search}" download>Eksportuj CSV</a>
    <a class="button" href="/admin/export/excel{search}" download>Eksportuj Excel</a>
</div>"#,
        search = escape_attribute(&search)
    )
}

fn table(listing: &Listing, query: &ListingQuery) -> String {
    let sort_link = format!(
        "/admin?{}",
        query.to_query(listing.sort.toggled(), 1, listing.per_page)
    );
    let arrow = match listing.sort {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    };
    let mut html = format!(
        r#"<table>
<caption>Lista zgłoszeń: {}</caption>
<thead><tr>
    <th>#</th>
    <th><a href="{}">Data zgłoszenia {arrow}</a></th>
    <th>Firma</th>
    <th>Osoba kontaktowa</th>
    <th>Email / Telefon</th>
    <th>Kategoria</th>
    <th>Lokalizacja</th>
    <th>Asortyment</th>
    <th>Szczegóły</th>
</tr></thead>
<tbody>"#,
        listing.matching,
        escape_attribute(&sort_link),
    );
    for row in &listing.rows {
        let s = &row.record.submission;
        let _ = write!(
            html,
            r#"<tr>
    <td>{}</td>
    <td>{}</td>
    <td><strong>{}</strong><br><small>{}</small></td>
    <td>{} {}</td>
    <td>{}<br>{}</td>
    <td>{}</td>
    <td>{}, {}, {}</td>
    <td>{}</td>
    <td><a href="/admin/submissions/{}">Pokaż</a></td>
</tr>"#,
            row.number,
            escape(&row.record.submission_date_time),
            escape(&s.company_name),
            escape(&s.nip),
            escape(&s.first_name),
            escape(&s.last_name),
            escape(&s.email),
            escape(&s.phone),
            escape(s.category.label()),
            escape(&s.location1),
            escape(&s.location2),
            escape(&s.location3),
            escape(&s.products),
            row.record.id,
        );
    }
    html.push_str("</tbody></table>");
    html
}

/// Search bar, exports, the table or its empty state, pagination and total.
#[must_use]
pub fn dashboard(listing: &Listing, query: &ListingQuery) -> String {
    let mut html = String::from(r#"<h1 class="center">Zgłoszenia wystawców</h1><div class="admin">"#);
    html.push_str(&search_form(listing, query));
    html.push_str(&export_links(query));
    if let Some(message) = listing.empty_message() {
        let _ = write!(html, r#"<p class="empty">{message}</p>"#);
    } else {
        html.push_str(&table(listing, query));
        html.push_str(&pagination(listing, query));
    }
    let _ = write!(
        html,
        r#"<p class="total">Łącznie zgłoszeń: {}</p></div>"#,
        listing.matching
    );
    html
}

#[must_use]
pub fn detail(record: &SubmissionRecord, csrf_input: &str) -> String {
    format!(
        r#"<h1 class="center">{}</h1>
<div class="container-small">
{}
<form method="post" action="/admin/submissions/{}/delete" enctype="application/x-www-form-urlencoded">
    {csrf_input}
    <button class="danger" type="submit">Usuń zgłoszenie</button>
</form>
<p><a href="/admin">Powrót do listy</a></p>
</div>"#,
        escape(&record.submission.company_name),
        summary(record),
        record.id,
    )
}

#[must_use]
pub fn password_form(csrf_input: &str, errors: &PasswordErrors) -> String {
    let message = |error: Option<&str>| {
        error.map_or_else(String::new, |error| {
            format!(r#"<div class="error-message">{}</div>"#, escape(error))
        })
    };
    format!(
        r#"<h1 class="center">Zmiana hasła</h1>
<form class="container-small" method="post" action="/admin/password" enctype="application/x-www-form-urlencoded">
    {csrf_input}
    <label for="currentPassword">Aktualne hasło:</label>
    <input id="currentPassword" name="currentPassword" type="password" autocomplete="current-password">
    {}
    <label for="newPassword">Nowe hasło:</label>
    <input id="newPassword" name="newPassword" type="password" autocomplete="new-password">
    {}
    <label for="confirmPassword">Potwierdź nowe hasło:</label>
    <input id="confirmPassword" name="confirmPassword" type="password" autocomplete="new-password">
    {}
    <button type="submit">Zmień hasło</button>
</form>"#,
        message(errors.current_password),
        message(errors.new_password),
        message(errors.confirm_password),
    )
}
