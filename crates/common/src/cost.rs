//! Cost arithmetic where `None` stands for +infinity (unreachable).

use crate::error::Error;
use crate::types::Cost;

/// Extends a known cost by one edge weight.
///
/// An infinite base stays infinite. Finite sums use checked addition so an
/// extreme cost surfaces as `Error::CostOverflow` instead of wrapping.
pub fn extend(base: Option<Cost>, weight: Cost) -> Result<Option<Cost>, Error> {
    match base {
        None => Ok(None),
        Some(b) => b.checked_add(weight).map(Some).ok_or(Error::CostOverflow),
    }
}

/// Returns true if `candidate` is strictly cheaper than `current`.
///
/// Any finite value improves on infinity; infinity never improves anything.
pub fn improves(candidate: Option<Cost>, current: Option<Cost>) -> bool {
    match (candidate, current) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(c), Some(cur)) => c < cur,
    }
}

/// The cheaper of two costs under the same ordering as [`improves`].
pub fn min_cost(a: Option<Cost>, b: Option<Cost>) -> Option<Cost> {
    if improves(b, a) { b } else { a }
}
