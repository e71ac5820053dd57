//! Standalone HTML download.

use gloo::file::{Blob, ObjectUrl};
use gloo::timers::callback::Timeout;
use gloo::utils::{body, document};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleSheet, HtmlAnchorElement};

/// Concatenate every readable rule from the page's stylesheets.
///
/// Cross-origin sheets throw on `cssRules`; they are skipped.
pub(crate) fn collect_css() -> String {
    let sheets = document().style_sheets();
    let mut css = String::new();
    for index in 0..sheets.length() {
        let Some(sheet) = sheets
            .item(index)
            .and_then(|sheet| sheet.dyn_into::<CssStyleSheet>().ok())
        else {
            continue;
        };
        let Ok(rules) = sheet.css_rules() else {
            continue;
        };
        for rule in (0..rules.length()).filter_map(|position| rules.item(position)) {
            css.push_str(&rule.css_text());
            css.push('\n');
        }
    }
    css
}

/// Delay before the blob URL is revoked; the browser must have started the
/// download by then.
const REVOKE_AFTER_MS: u32 = 10_000;

/// Offer `html` as a download named `file_name`.
///
/// The anchor is attached for the click because Firefox ignores clicks on
/// detached anchors.
pub(crate) fn download_html(file_name: &str, html: &str) -> Result<(), JsValue> {
    let blob = Blob::new_with_options(html, Some("text/html;charset=utf-8"));
    let url = ObjectUrl::from(blob);
    let anchor: HtmlAnchorElement = document().create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.set_attribute("hidden", "")?;

    let body = body();
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;

    Timeout::new(REVOKE_AFTER_MS, move || drop(url)).forget();
    Ok(())
}
