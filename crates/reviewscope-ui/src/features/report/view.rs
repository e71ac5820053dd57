use super::sections::page_body;
use crate::app::{Route, is_dark, use_bundle};
use crate::components::empty_state::EmptyState;
use crate::components::modal::QuoteModal;
use crate::core::logic::{QuoteDialog, resolve_page, utc_from_millis};
use crate::core::store::AppStore;
use crate::services::export::{collect_css, download_html};
use gloo::console;
use reviewscope_report::{ExportOptions, export_file_name, export_html};
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub(crate) struct ReportViewProps {
    pub page: String,
}

#[function_component(ReportView)]
pub(crate) fn report_view(props: &ReportViewProps) -> Html {
    let bundle = use_bundle();
    let result = use_selector(|store: &AppStore| store.session.result.current().cloned());
    let theme = use_selector(|store: &AppStore| store.preferences.theme);
    let dialog = use_state(|| None::<QuoteDialog>);

    let Some(result) = (*result).clone() else {
        return html! {
            <EmptyState title={bundle.t("empty.report")} hint={Some(AttrValue::from(bundle.t("empty.report_hint")))}>
                <Link<Route> to={Route::Upload} classes={classes!("btn")}>{bundle.t("nav.upload")}</Link<Route>>
                <Link<Route> to={Route::History} classes={classes!("btn", "ghost")}>{bundle.t("nav.history")}</Link<Route>>
            </EmptyState>
        };
    };
    let report = result.report;
    let page = resolve_page(&props.page, &report);

    let on_quotes = {
        let dialog = dialog.clone();
        Callback::from(move |next: QuoteDialog| dialog.set(Some(next)))
    };
    let on_close = {
        let dialog = dialog.clone();
        Callback::from(move |()| dialog.set(None))
    };
    let body = if page.is_empty(&report) {
        html! {
            <EmptyState title={bundle.t("empty.section")} hint={Some(AttrValue::from(bundle.t("empty.section_hint")))} />
        }
    } else {
        page_body(page, &report, &bundle, &on_quotes)
    };

    let on_export = {
        let language = bundle.language;
        let theme = *theme;
        Callback::from(move |_| {
            let mut options = ExportOptions::new(language, utc_from_millis(js_sys::Date::now()));
            options.dark = is_dark(theme);
            options.extra_css = collect_css();
            let html = export_html(&report, &options);
            let file_name = export_file_name(&report, options.generated_at.date_naive());
            if let Err(err) = download_html(&file_name, &html) {
                console::error!("report export failed", err);
            }
        })
    };

    html! {
        <section class="report-page" id={format!("page-{}", page.slug())}>
            <header class="report-header">
                <h2>{bundle.t(page.title_key())}</h2>
                <button class="btn" onclick={on_export}>{bundle.t("report.export")}</button>
            </header>
            {body}
            <QuoteModal dialog={(*dialog).clone()} {on_close} />
        </section>
    }
}
