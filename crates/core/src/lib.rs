//! appia-core: residual-budget allocation for public-works funding.
//!
//! The engine answers one question: given a snapshot of funding sources
//! (IDV grants tied to a budget chapter) and the work orders drawing
//! against them, how much of each source is still unconsumed?
//!
//! Everything here is pure and synchronous. Callers pass a complete
//! snapshot on every call and get fresh numbers back -- no cache, no
//! incremental state, no hidden inputs. Budget overruns are returned as
//! data (an uncovered remainder, a negative chapter balance), never as
//! errors.

pub mod allocation;
pub mod chapter;
pub mod lifecycle;
pub mod types;

pub use allocation::{compute_residuals, plan_coverage, CoveragePlan, ResidualMap, SourceDraw};
pub use chapter::{chapter_residual, chapter_stats, ChapterStats};
pub use lifecycle::{
    cancel, record_award, record_payment, AwardDetails, LifecycleError, PaymentDetails,
    StatusChange,
};
pub use types::{FundingSource, OrderStatus, WorkOrder};
