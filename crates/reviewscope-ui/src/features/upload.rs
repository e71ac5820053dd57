//! Upload form: two file slots, the category input and submission.

use crate::app::{Route, use_api, use_bundle};
use crate::components::banner::ErrorBanner;
use crate::components::file_slot::FileSlot;
use crate::core::store::AppStore;
use crate::services::api::PickedFile;
use crate::services::timer::GlooTimer;
use reviewscope_api_models::FileRole;
use reviewscope_pipeline::{
    Banner, MAX_CATEGORY_CHARS, SessionAction, TaskHandle, Uploader, cancellable, submit_analysis,
};
use std::collections::BTreeMap;
use web_sys::{File, HtmlInputElement};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::use_navigator;
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(UploadView)]
pub(crate) fn upload_view() -> Html {
    let bundle = use_bundle();
    let api = use_api();
    let navigator = use_navigator();
    let dispatch = Dispatch::<AppStore>::new();
    let session = use_selector(|store: &AppStore| store.session.clone());
    let uploads = use_selector(|store: &AppStore| store.uploads);
    let tasks = use_mut_ref(BTreeMap::<FileRole, TaskHandle>::new);

    // Leaving the view aborts uploads in flight, including pending retry delays.
    {
        let dispatch = dispatch.clone();
        let tasks = tasks.clone();
        use_effect_with_deps(
            move |_| {
                move || {
                    for (role, handle) in std::mem::take(&mut *tasks.borrow_mut()) {
                        handle.abort();
                        dispatch.reduce_mut(|store| store.apply(SessionAction::UploadCancelled(role)));
                    }
                }
            },
            (),
        );
    }

    let on_pick = |role: FileRole| {
        let dispatch = dispatch.clone();
        let client = api.client.clone();
        let tasks = tasks.clone();
        Callback::from(move |file: File| {
            dispatch.reduce_mut(|store| store.apply(SessionAction::UploadStarted(role)));
            let client = client.clone();
            let progress = dispatch.clone();
            let (handle, upload) = cancellable(async move {
                let picked = PickedFile(file);
                Uploader::new(&*client, &GlooTimer)
                    .upload(&picked, role, |percent| {
                        progress.reduce_mut(|store| store.uploads.set(role, percent));
                    })
                    .await
            });
            if let Some(previous) = tasks.borrow_mut().insert(role, handle) {
                previous.abort();
            }
            let dispatch = dispatch.clone();
            spawn_local(async move {
                match upload.await {
                    Some(Ok(uploaded)) => {
                        dispatch.reduce_mut(|store| store.apply(SessionAction::FileUploaded(uploaded)));
                    }
                    Some(Err(err)) => dispatch.reduce_mut(|store| {
                        store.apply(SessionAction::UploadFailed(role, Banner::from_error(&err)));
                    }),
                    None => {}
                }
            });
        })
    };
    let on_remove = |role: FileRole| {
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            dispatch.reduce_mut(|store| store.apply(SessionAction::FileRemoved(role)));
        })
    };

    let on_category = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let value = input.value();
            dispatch.reduce_mut(|store| store.apply(SessionAction::CategoryChanged(value)));
        })
    };

    let on_submit = {
        let dispatch = dispatch.clone();
        let client = api.client.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let snapshot = dispatch.get();
            if !snapshot.session.can_submit() {
                return;
            }
            dispatch.reduce_mut(|store| store.apply(SessionAction::SubmitStarted));
            let dispatch = dispatch.clone();
            let client = client.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                let session = &snapshot.session;
                let submitted = submit_analysis(
                    &*client,
                    session.own_file.as_ref(),
                    session.competitor_file.as_ref(),
                    &session.category,
                    session.language,
                )
                .await;
                match submitted {
                    Ok(job_id) => {
                        dispatch.reduce_mut(|store| store.apply(SessionAction::Submitted(job_id)));
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Progress);
                        }
                    }
                    Err(err) => dispatch.reduce_mut(|store| {
                        store.apply(SessionAction::Failed(Banner::from_error(&err)));
                    }),
                }
            });
        })
    };

    let on_reset = {
        let dispatch = dispatch.clone();
        let tasks = tasks.clone();
        Callback::from(move |_| {
            for (_, handle) in std::mem::take(&mut *tasks.borrow_mut()) {
                handle.abort();
            }
            dispatch.reduce_mut(|store| store.apply(SessionAction::Reset));
        })
    };
    let on_dismiss = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| {
            dispatch.reduce_mut(|store| store.session.error = None);
        })
    };

    let busy = session.phase.is_busy();
    let submit_label = if busy {
        bundle.t("upload.submitting")
    } else {
        bundle.t("upload.submit")
    };
    html! {
        <section class="upload-view">
            <h2>{bundle.t("upload.title")}</h2>
            <ErrorBanner banner={session.error.clone()} on_dismiss={Some(on_dismiss)} />
            <form onsubmit={on_submit}>
                <div class="file-slots">
                    <FileSlot
                        label={bundle.t("upload.own_label")}
                        file={session.own_file.clone()}
                        progress={uploads.get(FileRole::Own)}
                        disabled={busy}
                        on_pick={on_pick(FileRole::Own)}
                        on_remove={on_remove(FileRole::Own)}
                    />
                    <FileSlot
                        label={bundle.t("upload.competitor_label")}
                        file={session.competitor_file.clone()}
                        progress={uploads.get(FileRole::Competitor)}
                        disabled={busy}
                        on_pick={on_pick(FileRole::Competitor)}
                        on_remove={on_remove(FileRole::Competitor)}
                    />
                </div>
                <label class="field">
                    <span>{bundle.t("upload.category_label")}</span>
                    <input
                        type="text"
                        class="input"
                        maxlength={MAX_CATEGORY_CHARS.to_string()}
                        placeholder={bundle.t("upload.category_placeholder")}
                        value={session.category.clone()}
                        disabled={busy}
                        oninput={on_category}
                    />
                    <small class="muted">{bundle.t("upload.category_hint")}</small>
                </label>
                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled={!session.can_submit()}>
                        {submit_label}
                    </button>
                    <button type="button" class="ghost" disabled={busy} onclick={on_reset}>
                        {bundle.t("upload.reset")}
                    </button>
                </div>
            </form>
        </section>
    }
}
