//! One upload slot: picker, simulated progress bar and the uploaded file.

use crate::app::use_bundle;
use crate::core::logic::{bar_style, format_size};
use reviewscope_api_models::UploadedFile;
use reviewscope_pipeline::accept_attribute;
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct FileSlotProps {
    pub label: AttrValue,
    pub file: Option<UploadedFile>,
    pub progress: Option<u8>,
    #[prop_or_default]
    pub disabled: bool,
    pub on_pick: Callback<File>,
    pub on_remove: Callback<()>,
}

#[function_component(FileSlot)]
pub(crate) fn file_slot(props: &FileSlotProps) -> Html {
    let bundle = use_bundle();
    let accept = use_memo(|_| accept_attribute(), ());

    let onchange = {
        let on_pick = props.on_pick.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            if let Some(file) = input.files().and_then(|files| files.item(0)) {
                on_pick.emit(file);
            }
            // Allows picking the same file again after a failure.
            input.set_value("");
        })
    };
    let on_remove = {
        let on_remove = props.on_remove.clone();
        Callback::from(move |_| on_remove.emit(()))
    };

    let body = match (&props.file, props.progress) {
        (_, Some(percent)) => html! {
            <div class="upload-progress">
                <small>{format!("{} {percent}%", bundle.t("upload.uploading"))}</small>
                <div class="bar"><div class="bar-fill" style={bar_style(f64::from(percent))}></div></div>
            </div>
        },
        (Some(file), None) => html! {
            <div class="uploaded-file">
                <span class="badge badge-success">{bundle.t("upload.uploaded")}</span>
                <strong>{file.display_name().to_string()}</strong>
                <small class="muted">{format_size(file.size_bytes)}</small>
                <button class="ghost" disabled={props.disabled} onclick={on_remove}>
                    {bundle.t("upload.remove")}
                </button>
            </div>
        },
        (None, None) => html! {
            <input type="file" class="file-input" accept={(*accept).clone()}
                disabled={props.disabled} {onchange} />
        },
    };

    html! {
        <fieldset class="file-slot">
            <legend>{props.label.clone()}</legend>
            {body}
            <small class="muted">{bundle.t("upload.hint")}</small>
        </fieldset>
    }
}
