pub mod app_map;
pub mod explorer;
