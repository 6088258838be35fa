//! Rule-based extraction of numeric thresholds from market questions.
//!
//! Deliberately not an LLM call: thresholds gate the Monotonicity and
//! Interval strategies, which run on every market pair, so extraction has
//! to be cheap and deterministic. Ambiguous questions are refused rather
//! than guessed (`PARSE_AMBIGUOUS`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::core::domain::{Boundary, Direction, Subject, ThresholdInfo};
use crate::error::{Error, Result};

/// Assets the parser recognizes by name or ticker. Order matters only for
/// longest-match disambiguation (e.g. "Bitcoin Cash" before "Bitcoin").
/// 14 crypto assets plus a generic equities/commodities path, per
/// `SPEC_FULL.md` §4.2's registry requirement.
const ASSETS: &[(&str, &str)] = &[
    ("bitcoin cash", "BCH"),
    ("bitcoin", "BTC"),
    ("btc", "BTC"),
    ("ethereum", "ETH"),
    ("eth", "ETH"),
    ("solana", "SOL"),
    ("sol", "SOL"),
    ("dogecoin", "DOGE"),
    ("doge", "DOGE"),
    ("ripple", "XRP"),
    ("xrp", "XRP"),
    ("cardano", "ADA"),
    ("ada", "ADA"),
    ("polkadot", "DOT"),
    ("dot", "DOT"),
    ("litecoin", "LTC"),
    ("ltc", "LTC"),
    ("chainlink", "LINK"),
    ("link", "LINK"),
    ("avalanche", "AVAX"),
    ("avax", "AVAX"),
    ("polygon", "MATIC"),
    ("matic", "MATIC"),
    ("shiba inu", "SHIB"),
    ("shib", "SHIB"),
    ("uniswap", "UNI"),
    // Generic equities/commodities path: indices and commodity spots,
    // matched the same way as a crypto ticker. "crude oil" precedes "oil"
    // for longest-match disambiguation.
    ("s&p 500", "SPX"),
    ("s&p500", "SPX"),
    ("nasdaq", "NDX"),
    ("dow jones", "DJIA"),
    ("crude oil", "WTI"),
    ("gold", "XAU"),
    ("silver", "XAG"),
];

const ABOVE_KEYWORDS: &[&str] = &["exceed", "above", "over", "higher than", "surpass", "reach", ">="];
const BELOW_KEYWORDS: &[&str] = &["below", "under", "less than", "lower than", "drop below", "dip to", "<="];

fn find_subject(lower: &str) -> Option<Subject> {
    ASSETS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(_, ticker)| Subject::new(*ticker))
}

fn find_direction(lower: &str) -> Option<(Direction, bool)> {
    // (direction, is_touch_question) — "dip to $X" implies crossing below at
    // least once, not necessarily resolving below, so it is flagged as a
    // touch question the caller can choose to refuse.
    for kw in ABOVE_KEYWORDS {
        if lower.contains(kw) {
            return Some((Direction::Above, false));
        }
    }
    for kw in BELOW_KEYWORDS {
        if lower.contains(kw) {
            return Some((Direction::Below, *kw == "dip to"));
        }
    }
    None
}

/// Parses a dollar amount with optional `k`/`m`/`b` suffix, e.g. `$110k`,
/// `$1.2M`, `$500,000`.
fn parse_amount(text: &str) -> Option<Decimal> {
    let bytes = text.as_bytes();
    let dollar_pos = text.find('$')?;
    let rest = &text[dollar_pos + 1..];

    let mut end = 0;
    for (i, c) in rest.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    if end == 0 {
        return None;
    }
    let number_part = &rest[..end];
    let cleaned: String = number_part.chars().filter(|c| *c != ',').collect();
    let mut value: Decimal = cleaned.parse().ok()?;

    let suffix = rest[end..].chars().next().map(|c| c.to_ascii_lowercase());
    match suffix {
        Some('k') => value *= Decimal::from(1_000u32),
        Some('m') => value *= Decimal::from(1_000_000u32),
        Some('b') => value *= Decimal::from(1_000_000_000u32),
        _ => {}
    }
    let _ = bytes;
    Some(value)
}

/// Finds the asset subject only, without requiring a direction keyword —
/// used by the interval parser, which has its own two-amount shape.
#[must_use]
pub fn parse_threshold_subject_only(lower: &str) -> Option<Subject> {
    find_subject(lower)
}

/// Extracts every dollar amount appearing in `text`, in reading order.
#[must_use]
pub fn extract_all_amounts(text: &str) -> Vec<Decimal> {
    let mut amounts = Vec::new();
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find('$') {
        let start = search_from + rel;
        if let Some(value) = parse_amount(&text[start..]) {
            amounts.push(value);
        }
        search_from = start + 1;
    }
    amounts
}

/// Attempts to extract a single threshold from a market question. Returns
/// `Err(ParseAmbiguous)` when the subject, direction, or amount can't be
/// pinned down with confidence, rather than guessing. `end_time` is the
/// market's own resolution deadline, carried onto the parsed
/// `ThresholdInfo` — the Monotonicity/Temporal strategies group and compare
/// thresholds by deadline, not just by subject and level.
pub fn parse_threshold(question: &str, end_time: DateTime<Utc>) -> Result<ThresholdInfo> {
    let lower = question.to_ascii_lowercase();

    let subject = find_subject(&lower)
        .ok_or_else(|| Error::ParseAmbiguous(format!("no recognized asset in: {question}")))?;

    let (direction, is_touch_question) = find_direction(&lower)
        .ok_or_else(|| Error::ParseAmbiguous(format!("no directional keyword in: {question}")))?;

    let value = parse_amount(question)
        .ok_or_else(|| Error::ParseAmbiguous(format!("no dollar amount in: {question}")))?;

    if is_touch_question {
        return Err(Error::ParseAmbiguous(format!(
            "touch question ('dip to $X') does not pin a resolution threshold: {question}"
        )));
    }

    let confidence = if lower.contains(">=") || lower.contains("<=") { 0.95 } else { 0.85 };

    Ok(ThresholdInfo::new(subject, value, direction, Boundary::Exclusive, end_time, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(question: &str) -> Result<ThresholdInfo> {
        parse_threshold(question, Utc::now())
    }

    #[test]
    fn parses_simple_above_threshold_with_k_suffix() {
        let t = parse("Will Bitcoin exceed $110k by 2026-01-01?").unwrap();
        assert_eq!(t.subject().as_str(), "BTC");
        assert_eq!(t.value(), dec!(110000));
        assert_eq!(t.direction(), Direction::Above);
    }

    #[test]
    fn parses_below_threshold() {
        let t = parse("Will ETH drop below $2,500 this week?").unwrap();
        assert_eq!(t.subject().as_str(), "ETH");
        assert_eq!(t.value(), dec!(2500));
        assert_eq!(t.direction(), Direction::Below);
    }

    #[test]
    fn parses_million_suffix() {
        let t = parse("Will Bitcoin reach $1.2M?").unwrap();
        assert_eq!(t.value(), dec!(1200000));
    }

    #[test]
    fn refuses_touch_questions() {
        assert!(parse("Will BTC dip to $90k at any point?").is_err());
    }

    #[test]
    fn refuses_unknown_asset() {
        assert!(parse("Will Zorpcoin exceed $6000?").is_err());
    }

    #[test]
    fn refuses_missing_direction() {
        assert!(parse("Will Bitcoin be $110k?").is_err());
    }

    #[test]
    fn bitcoin_cash_is_disambiguated_from_bitcoin() {
        let t = parse("Will Bitcoin Cash exceed $500?").unwrap();
        assert_eq!(t.subject().as_str(), "BCH");
    }

    #[test]
    fn parses_uniswap_as_a_fourteenth_crypto_asset() {
        let t = parse("Will Uniswap exceed $20?").unwrap();
        assert_eq!(t.subject().as_str(), "UNI");
    }

    #[test]
    fn parses_equity_index_threshold() {
        let t = parse("Will the S&P 500 exceed $6000?").unwrap();
        assert_eq!(t.subject().as_str(), "SPX");
    }

    #[test]
    fn parses_commodity_threshold() {
        let t = parse("Will Gold exceed $2,500 this year?").unwrap();
        assert_eq!(t.subject().as_str(), "XAU");
    }

    #[test]
    fn carries_the_market_end_time_as_its_deadline() {
        let deadline = Utc::now() + chrono::Duration::days(30);
        let t = parse_threshold("Will Bitcoin exceed $110k?", deadline).unwrap();
        assert_eq!(t.deadline(), deadline);
    }

    // A corpus of ambiguous/edge-case questions the parser must refuse
    // rather than silently misparse.
    const AMBIGUOUS_CORPUS: &[&str] = &[
        "Will crypto prices go up this year?",
        "Will BTC flip ETH in market cap?",
        "Will the price be higher?",
        "Will Bitcoin's volatility increase?",
        "Will a new altcoin exceed BTC?",
        "Will BTC and ETH both rise 10%?",
        "Will the market crash?",
        "Will Bitcoin dip to $80k before $120k?",
        "Will Bitcoin dip to $100000 this month?",
        "Will SOL's dominance exceed expectations?",
        "Will the halving affect price?",
        "Will institutional adoption grow?",
        "Will Bitcoin reach a new high?",
        "Will ETH gas fees exceed normal levels?",
        "Will DOGE mooning happen?",
        "Will the Fed rate hike impact crypto?",
        "Will there be a black swan event?",
        "Will BTC dominance exceed 60 percent?",
        "Will a stablecoin depeg?",
        "Will the ETF get approved?",
    ];

    #[test]
    fn ambiguous_corpus_is_entirely_refused() {
        for question in AMBIGUOUS_CORPUS {
            assert!(
                parse(question).is_err(),
                "expected ambiguous refusal for: {question}"
            );
        }
    }
}
