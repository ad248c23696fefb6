//! Course extraction, CGPA aggregation and projection.
//!
//! Rows scraped from the results page are validated into course records,
//! grouped per term, averaged by credit weight, and persisted as a snapshot
//! through the [`Session`](session::Session) that owns the current results.

pub mod aggregate;
pub mod analyzer;
pub mod extract;
pub mod grade;
pub mod projection;
pub mod session;
pub mod types;
pub mod utility;
