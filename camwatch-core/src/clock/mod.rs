//! Wall-clock state shown on the watch face
//!
//! The clock only changes on minute boundaries, so it tracks hours and
//! minutes and nothing finer.

pub mod time;

pub use time::{ClockError, ClockState, FormattedTime, FORMATTED_TIME_LEN};
