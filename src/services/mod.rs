pub mod display;
pub mod fields;
pub mod fills;
pub mod generator;
pub mod poller;
pub mod report;
pub mod settlements;
pub mod summary;
pub mod ticker;
pub mod timestamp;
pub mod units;

pub use fields::{aliases, FieldAliases};
pub use generator::{generate, write_summary, GeneratedSummary, GeneratorOptions};
pub use poller::{fetch_view, FetchOutcome, PollState, Poller};
pub use summary::{compute_stats, DashboardView};
pub use units::CashUnit;
