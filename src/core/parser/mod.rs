//! Rule-based parsers that turn market question text into structured
//! thresholds and intervals. Both refuse rather than guess on ambiguity.

pub mod interval;
pub mod threshold;

pub use interval::parse_interval;
pub use threshold::parse_threshold;
