pub mod tana_date;
pub mod validation;
