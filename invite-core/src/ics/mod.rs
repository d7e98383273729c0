//! Calendar (.ics) documents for each invite.

mod batch;
mod generate;
mod inspect;

pub use batch::{BatchItem, BatchOutcome, BatchReport, generate_dir};
pub use generate::{
    CalendarSettings, build_calendar, calendar_entries, escape_text, event_uid, generate,
};
pub use inspect::{CalendarEventInfo, inspect};
