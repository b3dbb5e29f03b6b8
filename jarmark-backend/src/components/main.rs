use std::borrow::Cow;

use crate::routes::assets::ASSETS_VERSION;
use crate::session::{Flash, Session};

#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

#[must_use]
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

#[must_use]
pub fn csrf_input(session: &Session) -> String {
    format!(
        r#"<input type="hidden" name="csrf_token" value="{}">"#,
        escape_attribute(session.csrf_token())
    )
}

#[must_use]
pub fn flash_banner(flash: Option<&Flash>) -> String {
    flash.map_or_else(String::new, |flash| {
        format!(
            r#"<div class="{}" role="status">{}</div>"#,
            flash.kind.css_class(),
            escape(&flash.message)
        )
    })
}

/// The page frame shared by every HTML response.
#[must_use]
pub fn main(
    page_title: &str,
    session: &Session,
    is_admin: bool,
    flash: Option<&Flash>,
    inner: &str,
) -> String {
    let account = if is_admin {
        format!(
            r#"<li><a href="/admin/password">Zmień hasło</a></li>
                <li>
                    <form method="post" action="/admin/logout" enctype="application/x-www-form-urlencoded">
                        {}
                        <button class="submit-link" type="submit">Wyloguj</button>
                    </form>
                </li>"#,
            csrf_input(session)
        )
    } else {
        String::new()
    };
    format!(
        r#"<!doctype html>
<html lang="pl">

<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} | Jarmark Bałtycki</title>
    <link rel="stylesheet" href="/index.css?v={version}">
</head>

<body>
    <nav>
        <span>Jarmark Bałtycki</span>
        <ul>
            <li><a href="/">Formularz zgłoszeniowy</a></li>
            <li><a href="/admin">Panel administratora</a></li>
            {account}
        </ul>
    </nav>
    <main>
        {flash}
        {inner}
    </main>
    <script src="/form.js?v={version}" defer></script>
</body>

</html>
"#,
        title = escape(page_title),
        flash = flash_banner(flash),
        version = *ASSETS_VERSION,
    )
}
