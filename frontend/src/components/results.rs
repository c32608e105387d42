use super::super::{Model, Msg};
use diagnosis::{PreconditionError, RequestState};
use yew::prelude::*;

pub fn render_inline_error(model: &Model) -> Html {
    match model.session.inline_error() {
        Some(message) => html! {
            <div class="error-message" role="alert">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ message }</p>
            </div>
        },
        None => html! {},
    }
}

fn submit_hint(readiness: &Result<(), PreconditionError>) -> Option<&'static str> {
    match readiness {
        Err(PreconditionError::NoPlantSelected) => Some("Choose a plant first."),
        Err(PreconditionError::NoImage) => Some("Add a photo of the affected leaf."),
        _ => None,
    }
}

pub fn render_submit(model: &Model, ctx: &Context<Model>) -> Html {
    let state = model.session.request_state();
    let readiness = model.session.readiness();
    let onclick = ctx.link().callback(|_| Msg::StartDiagnosis);

    let label = match &state {
        RequestState::Uploading => "Processing image...",
        RequestState::AwaitingPrediction => "Diagnosing...",
        _ => "Start diagnosis",
    };

    html! {
        <section class="submit-section">
            <button
                class={classes!("submit-button", state.is_busy().then_some("loading"))}
                disabled={readiness.is_err()}
                {onclick}
            >
                if state.is_busy() {
                    <span class="spinner"></span>
                }
                { label }
            </button>
            if let Some(hint) = submit_hint(&readiness) {
                <p class="submit-hint">{ hint }</p>
            }
        </section>
    }
}

pub fn render_result_dialog(model: &Model, ctx: &Context<Model>) -> Html {
    let workflow = model.session.workflow();
    let Some(result) = workflow.dialog().open_result() else {
        return html! {};
    };

    let link = ctx.link();
    let close = link.callback(|_| Msg::CloseDialog);
    let view_full = link.callback(|_| Msg::ViewFullResult);

    let plant = model
        .session
        .config()
        .plant(result.plant_type)
        .map_or_else(|| result.plant_type.to_string(), |plant| plant.name.clone());
    let confidence = result.confidence * 100.0;

    html! {
        <div class="dialog-backdrop">
            <div class="result-dialog" role="dialog" aria-modal="true">
                <div class="result-header">
                    <h2>{"Diagnosis result"}</h2>
                    <button class="dialog-close" onclick={close.clone()}>{"×"}</button>
                </div>
                <div class="result-body">
                    <p class="result-disease">{ &result.disease_id }</p>
                    <p class="result-plant">{ plant }</p>
                    <div class="confidence-meter">
                        <div class="meter-label">{"Confidence:"}</div>
                        <div class="meter">
                            <div class="meter-fill" style={format!("width: {:.1}%", confidence)}></div>
                        </div>
                        <div class="meter-value">{ format!("{:.1}%", confidence) }</div>
                    </div>
                </div>
                <div class="result-actions">
                    <button class="secondary-button" onclick={close}>{"Close"}</button>
                    if model.session.can_view_full_result() {
                        <button class="primary-button" onclick={view_full}>{"View full result"}</button>
                    }
                </div>
            </div>
        </div>
    }
}
