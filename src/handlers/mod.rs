pub mod agenda_handlers;
pub mod api;
pub mod dashboard;
pub mod export_handlers;
pub mod minutes_handlers;
pub mod monitoring_handlers;
pub mod workflow_handlers;
