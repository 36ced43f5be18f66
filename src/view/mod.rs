mod controller;
mod io;
mod menu;

pub use controller::Controller;
pub use io::{ConsoleIo, DATE_FORMAT, UserIo, format_date, parse_amount, parse_date};
pub use menu::MenuSelection;
