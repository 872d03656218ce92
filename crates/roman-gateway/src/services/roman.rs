//! Single and range conversion.
//!
//! Range expansion fans out one tokio task per member. Each task reports its
//! position alongside its result, and results are written into a fixed slot
//! buffer so completion order never affects the response. A range response is
//! all-or-nothing: the first failure drops the `JoinSet`, which aborts every
//! task still running.

use tokio::task::JoinSet;

use roman_core::error::{Result, RomanError};
use roman_core::model::Conversion;
use roman_core::numeral;
use roman_core::request::RangeBounds;

#[derive(Debug, Clone, Default)]
pub struct RomanService {
    max_range_span: Option<u32>,
}

impl RomanService {
    pub fn new(max_range_span: Option<u32>) -> Self {
        Self { max_range_span }
    }

    pub fn convert_single(&self, n: i64) -> Result<Conversion> {
        Conversion::of(n)
    }

    /// Convert every integer in `[min, max]`, ascending.
    pub async fn expand_range(&self, min: i64, max: i64) -> Result<Vec<Conversion>> {
        let bounds = RangeBounds::new(min, max)?;

        // Members are contiguous, so the endpoints bound all of them. Running
        // the endpoints through the converter rejects an out-of-domain range
        // with the converter's own error before anything is spawned.
        numeral::convert(bounds.min())?;
        numeral::convert(bounds.max())?;
        self.check_span(&bounds)?;

        let len = usize::try_from(bounds.span())
            .map_err(|_| RomanError::Internal("range span overflows usize".into()))?;
        let mut slots: Vec<Option<Conversion>> = vec![None; len];

        let mut tasks = JoinSet::new();
        for (idx, n) in bounds.iter().enumerate() {
            tasks.spawn(async move { (idx, Conversion::of(n)) });
        }

        while let Some(joined) = tasks.join_next().await {
            let (idx, result) = joined
                .map_err(|e| RomanError::Internal(format!("conversion task failed: {e}")))?;
            let slot = slots
                .get_mut(idx)
                .ok_or_else(|| RomanError::Internal(format!("slot {idx} out of bounds")))?;
            *slot = Some(result?);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.ok_or_else(|| RomanError::Internal(format!("slot {idx} left empty")))
            })
            .collect()
    }

    fn check_span(&self, bounds: &RangeBounds) -> Result<()> {
        match self.max_range_span {
            Some(limit) if bounds.span() > u64::from(limit) => Err(RomanError::RangeTooLarge {
                span: bounds.span(),
                limit,
            }),
            _ => Ok(()),
        }
    }
}
