use crate::app::{Route, use_bundle};
use reviewscope_api_models::Language;
use reviewscope_pipeline::ThemeMode;
use reviewscope_report::Page;
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub children: Children,
    pub active: Route,
    /// Report pages offered for the loaded result; empty when none is loaded.
    pub pages: Vec<Page>,
    pub has_job: bool,
    pub language: Language,
    pub theme: ThemeMode,
    pub on_toggle_language: Callback<()>,
    pub on_theme: Callback<ThemeMode>,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let bundle = use_bundle();
    let nav_open = use_state(|| false);
    let toggle_nav = {
        let nav_open = nav_open.clone();
        Callback::from(move |_| nav_open.set(!*nav_open))
    };
    let on_toggle_language = {
        let on_toggle_language = props.on_toggle_language.clone();
        Callback::from(move |_| on_toggle_language.emit(()))
    };

    html! {
        <div class="app-shell">
            <aside class={classes!("sidebar", if *nav_open { "open" } else { "closed" })}>
                <div class="brand">
                    <button class="ghost mobile-only" onclick={toggle_nav.clone()} aria-label="Close navigation">{"✕"}</button>
                    <strong>{bundle.t("meta.title")}</strong>
                    <span class="muted">{bundle.t("meta.tagline")}</span>
                </div>
                <nav>
                    {nav_item(Route::Upload, &bundle.t("nav.upload"), &props.active)}
                    {if props.has_job {
                        nav_item(Route::Progress, &bundle.t("nav.progress"), &props.active)
                    } else {
                        html! {}
                    }}
                    {nav_item(Route::History, &bundle.t("nav.history"), &props.active)}
                    {if props.pages.is_empty() {
                        html! {}
                    } else {
                        html! {
                            <div class="nav-group">
                                { for props.pages.iter().map(|page| {
                                    nav_item(Route::report(*page), &bundle.t(page.nav_key()), &props.active)
                                }) }
                            </div>
                        }
                    }}
                </nav>
                <div class="sidebar-footer">
                    <div class="locale-toggle">
                        <small>{bundle.t("language.label")}</small>
                        <button class="ghost" onclick={on_toggle_language}>
                            {props.language.toggled().label()}
                        </button>
                    </div>
                    <div class="theme-toggle">
                        <small>{bundle.t("theme.label")}</small>
                        <div class="segmented">
                            { for ThemeMode::all().into_iter().map(|mode| {
                                let on_theme = props.on_theme.clone();
                                html! {
                                    <button class={classes!((props.theme == mode).then_some("active"))}
                                        onclick={Callback::from(move |_| on_theme.emit(mode))}>
                                        {bundle.t(mode.label_key())}
                                    </button>
                                }
                            }) }
                        </div>
                    </div>
                </div>
            </aside>
            <div class="main">
                <header class="topbar">
                    <button class="ghost mobile-only" aria-label="Open navigation" onclick={toggle_nav}>{"☰"}</button>
                </header>
                <main>
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

fn nav_item(route: Route, label: &str, active: &Route) -> Html {
    let classes = classes!("nav-item", (*active == route).then_some("active"));
    html! {
        <Link<Route> to={route} classes={classes}>{label.to_string()}</Link<Route>>
    }
}
