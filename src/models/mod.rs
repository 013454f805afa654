pub mod agenda;
pub mod minutes;
pub mod monitoring;
