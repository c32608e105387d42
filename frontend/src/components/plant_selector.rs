use super::super::{Model, Msg};
use diagnosis::PlantOption;
use yew::prelude::*;

/// The catalog's color entries are utility class lists.
fn plant_classes(plant: &PlantOption, is_selected: bool) -> Classes {
    let palette = if is_selected { &plant.selected_color } else { &plant.color };
    let mut classes = classes!("plant-option", is_selected.then_some("selected"));
    classes.extend(
        palette
            .split_whitespace()
            .map(str::to_string)
            .collect::<Vec<_>>(),
    );
    classes
}

pub fn render_plant_selector(model: &Model, ctx: &Context<Model>) -> Html {
    let workflow = model.session.workflow();
    let selected = workflow.selection();
    let busy = workflow.request_state().is_busy();

    html! {
        <section class="plant-selector">
            <h2>{"1. Choose a plant"}</h2>
            <div class="plant-options">
                { for model.session.config().plants.iter().map(|plant| {
                    let is_selected = selected == Some(plant.id);
                    let id = plant.id;
                    let onclick = ctx.link().callback(move |_| Msg::SelectPlant(id));

                    html! {
                        <button
                            class={plant_classes(plant, is_selected)}
                            disabled={busy}
                            {onclick}
                        >
                            <span class="plant-icon">{ &plant.icon }</span>
                            <span class="plant-name">{ &plant.name }</span>
                        </button>
                    }
                }) }
            </div>
        </section>
    }
}
