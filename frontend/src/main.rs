mod api;
mod components;

use api::{HttpHistoryStore, HttpPredictionService, BrowserTimer};
use components::handlers;
use diagnosis::{DiagnosisConfig, DiagnosisSession};
use gloo_file::File as GlooFile;
use shared::{HistoryRecord, PlantType};
use web_sys::DragEvent;
use yew::prelude::*;

pub type Session = DiagnosisSession<HttpPredictionService, HttpHistoryStore, BrowserTimer>;

const CONFIG: &str = include_str!("../../config/diagnosis.yaml");

pub enum Msg {
    // Selection and image
    SelectPlant(PlantType),
    FileChosen(GlooFile),
    TakePhoto,
    EditImage,

    // Diagnosis
    StartDiagnosis,
    CloseDialog,
    ViewFullResult,

    // History
    HistoryLoaded(Vec<HistoryRecord>),
    ViewHistory(String),

    // UI states
    SetNotice(Option<String>),
    SetDragging(bool),
    HandleDrop(DragEvent),
    Refresh,
}

pub struct Model {
    pub session: Session,
    pub history: Vec<HistoryRecord>,
    pub notice: Option<String>,
    pub is_dragging: bool,
}

fn load_config() -> DiagnosisConfig {
    match DiagnosisConfig::from_yaml_str(CONFIG) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid bundled config, using defaults: {}", e);
            DiagnosisConfig::default()
        }
    }
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = load_config();
        let session = DiagnosisSession::new(
            config.clone(),
            HttpPredictionService::new(&config.api),
            HttpHistoryStore::new(&config.api),
            BrowserTimer,
        );
        handlers::load_history(&session, ctx);

        Self {
            session,
            history: Vec::new(),
            notice: None,
            is_dragging: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SelectPlant(plant) => {
                self.session.select(plant);
                true
            }
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::TakePhoto => handlers::handle_take_photo(self, ctx),
            Msg::EditImage => {
                self.session.reset();
                self.notice = None;
                true
            }

            Msg::StartDiagnosis => handlers::handle_start_diagnosis(self, ctx),
            Msg::CloseDialog => {
                self.session.close_dialog();
                true
            }
            Msg::ViewFullResult => handlers::handle_view_full_result(self),

            Msg::HistoryLoaded(records) => {
                self.history = records;
                true
            }
            Msg::ViewHistory(id) => handlers::handle_view_history(self, ctx, &id),

            Msg::SetNotice(notice) => {
                self.notice = notice;
                true
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),
            Msg::Refresh => true,
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                <header class="app-header">
                    <h1>{"Plant Diagnosis"}</h1>
                    <p>{"Pick a plant, add a leaf photo and get a diagnosis."}</p>
                </header>

                <main class="main-content">
                    { components::plant_selector::render_plant_selector(self, ctx) }
                    { components::upload_section::render_upload_section(self, ctx) }
                    { components::utils::render_notice(self, ctx) }
                    { components::results::render_inline_error(self) }
                    { components::results::render_submit(self, ctx) }
                    { components::history::render_history(self, ctx) }
                </main>

                { components::results::render_result_dialog(self, ctx) }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Starting diagnosis page");
    yew::Renderer::<Model>::new().render();
}
