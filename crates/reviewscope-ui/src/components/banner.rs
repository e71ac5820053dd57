//! Dismissible error banner.

use crate::app::use_bundle;
use reviewscope_pipeline::{Banner, UserFacing};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ErrorBannerProps {
    pub banner: Option<Banner>,
    #[prop_or_default]
    pub on_dismiss: Option<Callback<()>>,
}

#[function_component(ErrorBanner)]
pub(crate) fn error_banner(props: &ErrorBannerProps) -> Html {
    let bundle = use_bundle();
    let Some(banner) = props.banner.as_ref() else {
        return html! {};
    };
    html! {
        <div class="alert alert-error" role="alert">
            <span>{banner.localized(&bundle)}</span>
            {props.on_dismiss.clone().map(|on_dismiss| html! {
                <button class="ghost" aria-label={bundle.t("report.close")}
                    onclick={Callback::from(move |_| on_dismiss.emit(()))}>{"✕"}</button>
            }).unwrap_or_default()}
        </div>
    }
}
