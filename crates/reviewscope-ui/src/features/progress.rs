//! Job progress: polls the backend and opens the report when it completes.

use crate::app::{Route, use_api, use_bundle};
use crate::components::banner::ErrorBanner;
use crate::components::empty_state::EmptyState;
use crate::core::logic::{bar_style, landing_page, status_key, step_class, step_key};
use crate::core::store::AppStore;
use crate::services::timer::GlooTimer;
use reviewscope_pipeline::{
    Banner, Phase, PollConfig, ResultRef, SessionAction, StoredResult, TaskHandle, cancellable,
    poll_job,
};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::{Dispatch, use_selector};

#[function_component(ProgressView)]
pub(crate) fn progress_view() -> Html {
    let bundle = use_bundle();
    let api = use_api();
    let navigator = use_navigator();
    let dispatch = Dispatch::<AppStore>::new();
    let job = use_selector(|store: &AppStore| store.session.job.clone());
    let phase = use_selector(|store: &AppStore| store.session.phase);
    let error = use_selector(|store: &AppStore| store.session.error.clone());
    let poller = use_mut_ref(|| None::<TaskHandle>);

    let job_id = (*job).as_ref().map(|job| job.id.clone());
    {
        let dispatch = dispatch.clone();
        let poller = poller.clone();
        use_effect_with_deps(
            move |job_id: &Option<String>| {
                let polling = dispatch.get().session.phase == Phase::Polling;
                if let (Some(job_id), true) = (job_id.clone(), polling) {
                    let client = api.client.clone();
                    let observer = dispatch.clone();
                    let (handle, poll) = cancellable(async move {
                        poll_job(&*client, &GlooTimer, &job_id, PollConfig::default(), |job| {
                            let job = job.clone();
                            observer.reduce_mut(|store| store.apply(SessionAction::JobUpdated(job)));
                        })
                        .await
                    });
                    *poller.borrow_mut() = Some(handle);
                    spawn_local(async move {
                        match poll.await {
                            Some(Ok(done)) => {
                                let result = StoredResult {
                                    source: ResultRef::Job(done.job.id.clone()),
                                    raw: done.raw,
                                    report: done.report,
                                };
                                let page = landing_page(&result.report);
                                dispatch.reduce_mut(|store| {
                                    store.apply(SessionAction::JobUpdated(done.job));
                                    store.apply(SessionAction::ResultLoaded(result));
                                });
                                if let Some(navigator) = navigator {
                                    navigator.push(&Route::report(page));
                                }
                            }
                            Some(Err(err)) => dispatch.reduce_mut(|store| {
                                store.apply(SessionAction::Failed(Banner::from_error(&err)));
                            }),
                            None => {}
                        }
                    });
                }
                move || {
                    if let Some(handle) = poller.borrow_mut().take() {
                        handle.abort();
                    }
                }
            },
            job_id,
        );
    }

    let on_cancel = Callback::from(move |_| {
        if let Some(handle) = poller.borrow_mut().take() {
            handle.abort();
        }
        dispatch.reduce_mut(|store| store.apply(SessionAction::Reset));
    });

    let Some(job) = (*job).clone() else {
        return html! {
            <EmptyState title={bundle.t("empty.report")} hint={Some(AttrValue::from(bundle.t("empty.report_hint")))}>
                <Link<Route> to={Route::Upload} classes={classes!("btn")}>{bundle.t("nav.upload")}</Link<Route>>
            </EmptyState>
        };
    };
    let current = job
        .current_step
        .clone()
        .unwrap_or_else(|| bundle.t("progress.waiting"));

    html! {
        <section class="progress-view">
            <h2>{bundle.t("progress.title")}</h2>
            <ErrorBanner banner={(*error).clone()} />
            <div class="progress-summary">
                <span class={classes!("badge", format!("status-{}", job.status.as_str()))}>
                    {bundle.t(&status_key(job.status))}
                </span>
                <small class="muted">{job.id.clone()}</small>
            </div>
            <div class="overall">
                <small>{format!("{} {:.0}%", bundle.t("progress.overall"), job.progress)}</small>
                <div class="bar"><div class="bar-fill" style={bar_style(job.progress)}></div></div>
                <p class="muted">{current}</p>
            </div>
            <ol class="steps">
                { for job.steps.iter().map(|step| html! {
                    <li class={classes!("step", step_class(step.status))}>
                        <span>{bundle.step_label(step).to_string()}</span>
                        <small class="badge">{bundle.t(&step_key(step.status))}</small>
                    </li>
                }) }
            </ol>
            {if *phase == Phase::Polling {
                html! { <button class="ghost" onclick={on_cancel}>{bundle.t("progress.cancel")}</button> }
            } else {
                html! {
                    <Link<Route> to={Route::Upload} classes={classes!("btn")}>{bundle.t("nav.upload")}</Link<Route>>
                }
            }}
        </section>
    }
}
