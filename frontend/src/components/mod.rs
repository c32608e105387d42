pub mod handlers;
pub mod history;
pub mod plant_selector;
pub mod results;
pub mod upload_section;
pub mod utils;
