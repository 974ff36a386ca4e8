pub mod rates;
pub mod setup;
pub mod stocks;
pub mod track;
pub mod ui;
