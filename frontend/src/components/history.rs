use super::super::{Model, Msg};
use yew::prelude::*;

pub fn render_history(model: &Model, ctx: &Context<Model>) -> Html {
    if model.history.is_empty() {
        return html! {};
    }

    html! {
        <section class="history-section">
            <h2>{"Recent diagnoses"}</h2>
            <ul class="history-list">
                { for model.history.iter().map(|record| {
                    let id = record.id.to_string();
                    let onclick = ctx.link().callback(move |_| Msg::ViewHistory(id.clone()));
                    let title = record.disease_name.as_deref().unwrap_or(&record.disease_id);

                    html! {
                        <li class="history-item">
                            <button class="history-entry" {onclick}>
                                <span class="history-title">{ title }</span>
                                <span class="history-plant">{ record.plant_type.to_string() }</span>
                                <span class="history-confidence">
                                    { format!("{:.0}%", record.confidence * 100.0) }
                                </span>
                                <time class="history-date">
                                    { record.diagnosed_at.format("%d %b %Y").to_string() }
                                </time>
                            </button>
                        </li>
                    }
                }) }
            </ul>
        </section>
    }
}
