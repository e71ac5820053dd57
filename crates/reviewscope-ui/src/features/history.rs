//! Report history with favorites, filtering, opening and deletion.

use crate::app::{Route, use_api, use_bundle};
use crate::components::banner::ErrorBanner;
use crate::components::empty_state::EmptyState;
use crate::core::logic::{landing_page, status_key};
use crate::core::store::AppStore;
use gloo::dialogs::confirm;
use reviewscope_api_models::ReportSummary;
use reviewscope_pipeline::{
    Banner, FavoriteSet, ReportFilter, SessionAction, delete_report, fetch_report, list_reports,
};
use web_sys::HtmlInputElement;
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::use_navigator;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(HistoryView)]
pub(crate) fn history_view() -> Html {
    let bundle = use_bundle();
    let api = use_api();
    let navigator = use_navigator();
    let dispatch = Dispatch::<AppStore>::new();
    let history = use_selector(|store: &AppStore| store.history.clone());
    let visible = use_selector(AppStore::visible_reports);
    let favorites = use_selector(|store: &AppStore| store.preferences.favorites.clone());
    let refresh = use_state(|| 0_u32);

    {
        let dispatch = dispatch.clone();
        let client = api.client.clone();
        use_effect_with_deps(
            move |_| {
                dispatch.reduce_mut(|store| store.history.loading = true);
                spawn_local(async move {
                    // Unfiltered so favorites of every listed report survive pruning.
                    let listed =
                        list_reports(&*client, &ReportFilter::default(), &FavoriteSet::default())
                            .await;
                    dispatch.reduce_mut(|store| match listed {
                        Ok(reports) => store.history_loaded(reports),
                        Err(err) => store.history_failed(Banner::from_error(&err)),
                    });
                });
                || ()
            },
            *refresh,
        );
    }

    let on_refresh = {
        let refresh = refresh.clone();
        Callback::from(move |_| refresh.set(*refresh + 1))
    };
    let on_favorites_only = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let checked = input.checked();
            dispatch.reduce_mut(|store| store.history.filter.favorites_only = checked);
        })
    };
    let on_category = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let value = input.value();
            dispatch.reduce_mut(|store| {
                store.history.filter.category = Some(value).filter(|text| !text.trim().is_empty());
            });
        })
    };
    let on_toggle = {
        let dispatch = dispatch.clone();
        Callback::from(move |id: String| {
            dispatch.reduce_mut(|store| {
                store.toggle_favorite(&id);
            });
        })
    };
    let on_open = {
        let dispatch = dispatch.clone();
        let client = api.client.clone();
        Callback::from(move |id: String| {
            let dispatch = dispatch.clone();
            let client = client.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match fetch_report(&*client, &id).await {
                    Ok(result) => {
                        let page = landing_page(&result.report);
                        dispatch.reduce_mut(|store| store.apply(SessionAction::ResultLoaded(result)));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::report(page));
                        }
                    }
                    Err(err) => dispatch.reduce_mut(|store| {
                        store.history_failed(Banner::from_error(&err));
                    }),
                }
            });
        })
    };
    let on_delete = {
        let dispatch = dispatch.clone();
        let client = api.client;
        let prompt = bundle.t("history.confirm_delete");
        Callback::from(move |id: String| {
            if !confirm(&prompt) {
                return;
            }
            let dispatch = dispatch.clone();
            let client = client.clone();
            spawn_local(async move {
                let mut favorites = dispatch.get().preferences.favorites.clone();
                match delete_report(&*client, &id, &mut favorites).await {
                    Ok(()) => dispatch.reduce_mut(|store| store.report_deleted(&id)),
                    Err(err) => dispatch.reduce_mut(|store| {
                        store.history_failed(Banner::from_error(&err));
                    }),
                }
            });
        })
    };
    let on_dismiss = Callback::from(move |()| {
        dispatch.reduce_mut(|store| store.history.error = None);
    });

    let list = if visible.is_empty() && !history.loading {
        html! { <EmptyState title={bundle.t("empty.history")} /> }
    } else {
        html! {
            <ul class="history-list">
                { for visible.iter().map(|report| history_row(
                    report,
                    favorites.contains(&report.id),
                    &bundle,
                    &on_open,
                    &on_toggle,
                    &on_delete,
                )) }
            </ul>
        }
    };

    html! {
        <section class="history-view">
            <header class="history-header">
                <h2>{bundle.t("history.title")}</h2>
                <button class="ghost" disabled={history.loading} onclick={on_refresh}>
                    {bundle.t("history.refresh")}
                </button>
            </header>
            <ErrorBanner banner={history.error.clone()} on_dismiss={Some(on_dismiss)} />
            <div class="history-filters">
                <label class="checkbox">
                    <input type="checkbox" checked={history.filter.favorites_only} onchange={on_favorites_only} />
                    <span>{bundle.t("history.favorites_only")}</span>
                </label>
                <input
                    type="search"
                    class="input"
                    placeholder={bundle.t("history.filter")}
                    value={history.filter.category.clone().unwrap_or_default()}
                    oninput={on_category}
                />
            </div>
            {list}
        </section>
    }
}

fn history_row(
    report: &ReportSummary,
    starred: bool,
    bundle: &reviewscope_report::TranslationBundle,
    on_open: &Callback<String>,
    on_toggle: &Callback<String>,
    on_delete: &Callback<String>,
) -> Html {
    let emit = |callback: &Callback<String>| {
        let callback = callback.clone();
        let id = report.id.clone();
        Callback::from(move |_: MouseEvent| callback.emit(id.clone()))
    };
    let star_label = if starred {
        bundle.t("history.unfavorite")
    } else {
        bundle.t("history.favorite")
    };
    html! {
        <li class={classes!("history-row", starred.then_some("starred"))}>
            <button class="ghost star" title={star_label.clone()} aria-label={star_label}
                onclick={emit(on_toggle)}>
                {if starred { "★" } else { "☆" }}
            </button>
            <div class="history-meta">
                <strong>{report.category.clone()}</strong>
                <small class="muted">{report.timestamp.clone()}</small>
                <span class={classes!("badge", format!("status-{}", report.status.as_str()))}>
                    {bundle.t(&status_key(report.status))}
                </span>
                {if report.has_competitor_data {
                    html! { <span class="badge">{bundle.t("history.competitor")}</span> }
                } else {
                    html! {}
                }}
            </div>
            <div class="history-actions">
                <button class="btn" onclick={emit(on_open)}>{bundle.t("history.open")}</button>
                <button class="ghost danger" onclick={emit(on_delete)}>{bundle.t("history.delete")}</button>
            </div>
        </li>
    }
}
