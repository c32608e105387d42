use super::super::{Model, Msg, Session};
use crate::api::BrowserFile;
use diagnosis::Completion;
use gloo_file::File as GlooFile;
use wasm_bindgen_futures::spawn_local;
use web_sys::DragEvent;
use yew::prelude::*;

pub fn load_history(session: &Session, ctx: &Context<Model>) {
    let link = ctx.link().clone();
    let pending = session.load_history();

    spawn_local(async move {
        match pending.await {
            Ok(records) => link.send_message(Msg::HistoryLoaded(records)),
            Err(e) => log::warn!("Could not load diagnosis history: {}", e),
        }
    });
}

pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    model.notice = None;

    let pending = match model.session.accept_file(BrowserFile(file)) {
        Ok(pending) => pending,
        Err(e) => {
            model.notice = Some(e.to_string());
            return true;
        }
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        match pending.await {
            Ok(_) => link.send_message(Msg::Refresh),
            Err(e) => link.send_message(Msg::SetNotice(Some(e.to_string()))),
        }
    });
    true
}

pub fn handle_take_photo(model: &mut Model, ctx: &Context<Model>) -> bool {
    model.notice = None;
    let pending = model.session.simulate_capture();

    let link = ctx.link().clone();
    spawn_local(async move {
        match pending.await {
            Ok(_) => link.send_message(Msg::Refresh),
            Err(e) => link.send_message(Msg::SetNotice(Some(e.to_string()))),
        }
    });
    true
}

pub fn handle_start_diagnosis(model: &mut Model, ctx: &Context<Model>) -> bool {
    let pending = match model.session.submit() {
        Ok(pending) => pending,
        Err(e) => {
            model.notice = Some(e.to_string());
            return true;
        }
    };
    model.notice = None;

    let link = ctx.link().clone();
    spawn_local(async move {
        // Failures are already reflected in the request state.
        if let Ok(Completion::Applied(result)) = pending.await {
            log::debug!("Showing result {}", result.disease_id);
        }
        link.send_message(Msg::Refresh);
    });
    true
}

pub fn handle_view_full_result(model: &mut Model) -> bool {
    let Some(target) = model.session.navigate_to_full_result() else {
        return false;
    };

    let location = web_sys::window().map(|window| window.location());
    match location {
        Some(location) => {
            if let Err(e) = location.set_href(&target.to_url()) {
                log::error!("Navigation failed: {:?}", e);
            }
        }
        None => log::error!("No window to navigate"),
    }
    true
}

pub fn handle_view_history(model: &mut Model, ctx: &Context<Model>, id: &str) -> bool {
    let pending = match model.session.view_detail(id) {
        Ok(pending) => pending,
        Err(e) => {
            model.notice = Some(e.to_string());
            return true;
        }
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        match pending.await {
            Ok(_) => link.send_message(Msg::Refresh),
            Err(e) => link.send_message(Msg::SetNotice(Some(e.to_string()))),
        }
    });
    false
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| file_list.item(0));

    match file {
        Some(file) => handle_file_chosen(model, ctx, GlooFile::from(file)),
        None => true,
    }
}
