use super::super::{Model, Msg};
use super::utils::{debounce, format_size};
use diagnosis::RequestState;
use gloo_file::File as GlooFile;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

fn open_file_picker() {
    let input = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id("file-input"))
        .and_then(|element| element.dyn_into::<web_sys::HtmlElement>().ok());

    match input {
        Some(input) => input.click(),
        None => log::warn!("File input element not found"),
    }
}

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let workflow = model.session.workflow();

    html! {
        <section class="upload-section">
            <h2>{"2. Add a leaf photo"}</h2>
            {
                match workflow.image() {
                    Some(image) => render_preview(&image.preview, image.file_name(), image.size_bytes(), ctx),
                    None => render_file_input_area(model, ctx, workflow.request_state()),
                }
            }
        </section>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>, state: &RequestState) -> Html {
    let link = ctx.link();
    let uploading = *state == RequestState::Uploading;
    let max = format_size(model.session.config().max_upload_bytes);

    let handle_change = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().and_then(|files| files.item(0));
        input.set_value("");

        match file {
            Some(file) => Msg::FileChosen(GlooFile::from(file)),
            None => Msg::SetNotice(None),
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });
    let handle_drag_leave = link.callback(|_: DragEvent| Msg::SetDragging(false));
    let handle_drop = link.callback(Msg::HandleDrop);

    let take_photo = link.callback(|_| Msg::TakePhoto);

    html! {
        <div
            class={classes!("drop-area", model.is_dragging.then_some("dragging"))}
            ondragover={handle_drag_over}
            ondragleave={handle_drag_leave}
            ondrop={handle_drop}
        >
            <input
                type="file"
                id="file-input"
                accept="image/*"
                style="display: none;"
                onchange={handle_change}
            />
            if uploading {
                <div class="upload-progress">
                    <div class="spinner"></div>
                    <p>
                        {"Processing "}
                        { model.session.workflow().images().display_name().unwrap_or("image") }
                        {"..."}
                    </p>
                </div>
            } else {
                <i class="fa-solid fa-leaf"></i>
                <p>{"Drop a photo here"}</p>
                <p class="upload-hint">{ format!("Images up to {}", max) }</p>
                <div class="upload-actions">
                    <button class="upload-button" onclick={debounce(300, open_file_picker)}>
                        {"Choose photo"}
                    </button>
                    <button class="camera-button" onclick={take_photo}>
                        {"Take photo"}
                    </button>
                </div>
            }
        </div>
    }
}

fn render_preview(preview: &str, file_name: &str, size: u64, ctx: &Context<Model>) -> Html {
    let edit = ctx.link().callback(|_| Msg::EditImage);

    html! {
        <div class="preview-area">
            <img class="preview-image" src={preview.to_string()} alt={file_name.to_string()} />
            <div class="preview-info">
                <span class="preview-name">{ file_name }</span>
                <span class="preview-size">{ format_size(size) }</span>
            </div>
            <button class="edit-button" onclick={edit}>{"Change photo"}</button>
        </div>
    }
}
