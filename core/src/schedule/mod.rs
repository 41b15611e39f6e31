pub mod csv;
pub mod dropoff;

pub use self::csv::{parse_schedule_csv, ParsedSchedule};
pub use dropoff::{DropoffSchedule, MonthRate, PhaseRates};
