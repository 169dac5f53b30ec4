pub mod daily_variable;
pub mod date_range;
pub mod location;
pub mod records;
pub mod trend_window;
