//! Observability subsystem.
//!
//! Structured logging only: every validation report is emitted as a
//! structured record, and that plus the API's generation counter is the
//! whole externally observable trace of reload activity.

pub mod logging;
