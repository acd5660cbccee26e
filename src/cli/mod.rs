//! Terminal front end

pub mod estimate;
pub mod history;
pub mod price;
pub mod setup;
pub mod ui;
