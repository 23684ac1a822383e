//! Core domain layer. No external I/O dependencies.
//!
//! Date math, lunar phases, numerology, the bulk contact parser, and the records the
//! rest of the application passes around. Dependencies flow inward.

pub mod calendar;
pub mod contact_parser;
pub mod entities;
pub mod errors;
pub mod lunar;
pub mod numerology;
pub mod preferences;
pub mod report;

pub use calendar::{CalendarDate, julian_day_number, reduce_digits};
pub use contact_parser::{ImportError, ParseOutcome, parse_contacts};
pub use entities::{
    ArchetypeTemplate, Contact, ContactId, JournalEntry, NewContact, OriginalContact, ReportSubject,
};
pub use errors::DomainError;
pub use lunar::{LunarPhaseResult, MoonPhase, lunar_phase};
pub use preferences::{LunarCache, ReportFilter, SortConfig, ViewPreferences};
pub use report::{CrmReport, DailyBriefing, JournalAnalysis, ReportSection, SynergyReport};
