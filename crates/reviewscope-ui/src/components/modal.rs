use crate::app::use_bundle;
use crate::core::logic::QuoteDialog;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct QuoteModalProps {
    pub dialog: Option<QuoteDialog>,
    pub on_close: Callback<()>,
}

/// Representative quotes over a backdrop; closed by the backdrop or the button.
#[function_component(QuoteModal)]
pub(crate) fn quote_modal(props: &QuoteModalProps) -> Html {
    let bundle = use_bundle();
    let Some(dialog) = props.dialog.as_ref() else {
        return html! {};
    };
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };
    html! {
        <div class="modal modal-open" role="dialog" aria-modal="true">
            <div class="modal-box">
                <h3>{dialog.title.clone()}</h3>
                <div class="quotes">
                    { for dialog.quotes.iter().map(|quote| html! {
                        <blockquote>{quote.clone()}</blockquote>
                    }) }
                </div>
                <div class="modal-action">
                    <button class="btn" onclick={on_close.clone()}>{bundle.t("report.close")}</button>
                </div>
            </div>
            <button class="modal-backdrop" onclick={on_close}></button>
        </div>
    }
}
