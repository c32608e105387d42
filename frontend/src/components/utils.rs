use super::super::{Model, Msg};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

// Collapses bursts of clicks into a single call
pub fn debounce<F>(duration: u32, callback: F) -> Callback<MouseEvent>
where
    F: Fn() + Clone + 'static,
{
    let timeout = Rc::new(RefCell::new(None::<Timeout>));

    Callback::from(move |_| {
        let mut pending = timeout.borrow_mut();
        if let Some(old) = pending.take() {
            old.cancel();
        }

        let inner = callback.clone();
        *pending = Some(Timeout::new(duration, move || inner()));
    })
}

pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes >= KIB * KIB {
        format!("{:.1} MB", bytes / (KIB * KIB))
    } else {
        format!("{:.0} KB", (bytes / KIB).ceil())
    }
}

pub fn render_notice(model: &Model, ctx: &Context<Model>) -> Html {
    let Some(notice) = &model.notice else {
        return html! {};
    };

    let dismiss = ctx.link().callback(|_| Msg::SetNotice(None));
    html! {
        <div class="notice" role="status">
            <i class="fa-solid fa-circle-info"></i>
            <p>{ notice }</p>
            <button class="notice-dismiss" onclick={dismiss}>{"×"}</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "1 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
