use crate::components::shell::AppShell;
use crate::core::store::AppStore;
use crate::core::theme::{DocumentTheme, PREFERS_DARK_QUERY, follows_system};
use crate::features::history::HistoryView;
use crate::features::progress::ProgressView;
use crate::features::report::ReportView;
use crate::features::upload::UploadView;
use crate::services::storage::LocalStorageStore;
use gloo::console;
use gloo::events::EventListener;
use gloo::utils::{document, window};
use reviewscope_pipeline::{PreferenceStore, ThemeMode};
use reviewscope_report::{TranslationBundle, available_pages};
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

pub(crate) use api::ApiCtx;
pub(crate) use routes::Route;

mod api;
mod routes;

/// Mount the application on `<body>`.
pub fn run_app() {
    console_error_panic_hook::set_once();
    yew::Renderer::<ReviewScopeApp>::new().render();
}

#[function_component(ReviewScopeApp)]
fn review_scope_app() -> Html {
    html! {
        <BrowserRouter>
            <AppRoot />
        </BrowserRouter>
    }
}

#[function_component(AppRoot)]
fn app_root() -> Html {
    let dispatch = Dispatch::<AppStore>::new();
    let api_ctx = use_memo(|_| ApiCtx::from_env(), ());
    let preferences = use_selector(|store: &AppStore| store.preferences.clone());
    let pages = use_selector(|store: &AppStore| {
        store.session.result.report().map(available_pages).unwrap_or_default()
    });
    let has_job = use_selector(|store: &AppStore| store.session.job.is_some());
    let hydrated = use_state(|| false);
    let language = preferences.language;
    let theme = preferences.theme;
    let bundle = use_memo(|language| TranslationBundle::new(*language), language);

    {
        let dispatch = dispatch.clone();
        let hydrated = hydrated.clone();
        use_effect_with_deps(
            move |_| {
                let stored = LocalStorageStore.load();
                dispatch.reduce_mut(|store| store.hydrate(stored));
                hydrated.set(true);
                || ()
            },
            (),
        );
    }
    // Nothing is written back until the stored values have been read.
    use_effect_with_deps(
        |(preferences, hydrated)| {
            if *hydrated {
                if let Err(err) = LocalStorageStore.save(preferences) {
                    console::error!("failed to save preferences", err.to_string());
                }
            }
            || ()
        },
        ((*preferences).clone(), *hydrated),
    );
    use_effect_with_deps(
        |theme| {
            apply_theme(*theme);
            let listener = if follows_system(*theme) {
                system_theme_listener(*theme)
            } else {
                None
            };
            move || drop(listener)
        },
        theme,
    );
    use_effect_with_deps(
        |language| {
            if let Some(root) = document().document_element() {
                let _ = root.set_attribute("lang", language.code());
            }
            || ()
        },
        language,
    );

    let on_toggle_language = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            dispatch.reduce_mut(|store| {
                let next = store.preferences.language.toggled();
                store.set_language(next);
            });
        })
    };
    let on_theme = Callback::from(move |theme: ThemeMode| {
        dispatch.reduce_mut(|store| store.set_theme(theme));
    });

    let active = use_route::<Route>().unwrap_or(Route::Upload);
    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                <AppShell
                    {active}
                    pages={(*pages).clone()}
                    has_job={*has_job}
                    {language}
                    {theme}
                    {on_toggle_language}
                    {on_theme}
                >
                    <Switch<Route> render={switch} />
                </AppShell>
            </ContextProvider<TranslationBundle>>
        </ContextProvider<ApiCtx>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Upload => html! { <UploadView /> },
        Route::Progress => html! { <ProgressView /> },
        Route::Report { page } => html! { <ReportView {page} /> },
        Route::History => html! { <HistoryView /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Upload} /> },
    }
}

/// Translation bundle for the current language.
#[hook]
pub(crate) fn use_bundle() -> TranslationBundle {
    use_context::<TranslationBundle>().unwrap_or_default()
}

/// Shared API client.
#[hook]
pub(crate) fn use_api() -> ApiCtx {
    use_context::<ApiCtx>().unwrap_or_else(ApiCtx::from_env)
}

fn prefers_dark() -> bool {
    window()
        .match_media(PREFERS_DARK_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}

/// Set `data-theme` and the `dark` class on `<html>`.
pub(crate) fn apply_theme(theme: ThemeMode) {
    let resolved = DocumentTheme::resolve(theme, prefers_dark());
    if let Some(root) = document().document_element() {
        let _ = root.set_attribute("data-theme", resolved.data_theme);
        let _ = root.class_list().toggle_with_force("dark", resolved.dark);
    }
}

/// Whether the page currently renders dark.
pub(crate) fn is_dark(theme: ThemeMode) -> bool {
    DocumentTheme::resolve(theme, prefers_dark()).dark
}

fn system_theme_listener(theme: ThemeMode) -> Option<EventListener> {
    let query = window().match_media(PREFERS_DARK_QUERY).ok().flatten()?;
    Some(EventListener::new(&query, "change", move |_| apply_theme(theme)))
}
