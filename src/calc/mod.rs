pub mod month_grid;
pub mod selection;

pub use month_grid::{add_months, CalendarModel, MonthGrid};
pub use selection::{Classification, RangeSelector, SelectionState};
