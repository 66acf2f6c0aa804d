// ABOUTME: Declarative time-window predicates over packet timestamps.
// ABOUTME: Each variant maps to one comparison against floored unix seconds.

/// A time-window predicate over packet timestamps.
///
/// `Before`, `During`, and `After` partition any store between them; the two
/// range forms differ only at the boundary seconds, which only the inclusive
/// form matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeQuery {
    Before(i64),
    After(i64),
    During(i64),
    BeforeOrDuring(i64),
    AfterOrDuring(i64),
    /// Exclusive on both ends.
    Between(i64, i64),
    /// Inclusive on both ends.
    BetweenOrDuring(i64, i64),
}

impl TimeQuery {
    pub fn matches(&self, timestamp: i64) -> bool {
        match *self {
            Self::Before(t) => timestamp < t,
            Self::After(t) => timestamp > t,
            Self::During(t) => timestamp == t,
            Self::BeforeOrDuring(t) => timestamp <= t,
            Self::AfterOrDuring(t) => timestamp >= t,
            Self::Between(begin, end) => begin < timestamp && timestamp < end,
            Self::BetweenOrDuring(begin, end) => begin <= timestamp && timestamp <= end,
        }
    }
}
