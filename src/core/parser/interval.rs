//! Rule-based extraction of interval/bucket questions, e.g.
//! "Will BTC end between $100k and $110k?".

use crate::core::domain::{Bound, Endpoint, IntervalInfo};
use crate::error::{Error, Result};

use super::threshold::parse_threshold_subject_only;

/// Splits `"between $100k and $110k"` / `"$100k-$110k"` / `"$100,000 to
/// $110,000"` into a lower/upper pair. Inclusivity defaults to
/// lower-inclusive, upper-exclusive (a half-open bucket), which is how
/// these questions are conventionally worded ("$100k to $110k" means
/// `[100k, 110k)`), unless the text explicitly says "or more"/"or above"
/// on the upper bound.
pub fn parse_interval(question: &str) -> Result<IntervalInfo> {
    let lower_text = question.to_ascii_lowercase();
    let subject = parse_threshold_subject_only(&lower_text)
        .ok_or_else(|| Error::ParseAmbiguous(format!("no recognized asset in: {question}")))?;

    let amounts = super::threshold::extract_all_amounts(question);
    if amounts.len() != 2 {
        return Err(Error::ParseAmbiguous(format!(
            "expected exactly two amounts for an interval in: {question}"
        )));
    }
    let (lo, hi) = if amounts[0] <= amounts[1] {
        (amounts[0], amounts[1])
    } else {
        (amounts[1], amounts[0])
    };

    let upper_inclusive = lower_text.contains("or more") || lower_text.contains("or above") || lower_text.contains("or higher");

    Ok(IntervalInfo::new(
        subject,
        Bound::new(Endpoint::Value(lo), true),
        Bound::new(Endpoint::Value(hi), upper_inclusive),
        0.85,
    ))
}
