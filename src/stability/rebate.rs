//! Pro-rated rebate for unstable hours.

use crate::domain::{HourBucket, RebateConfig, RebateResult};
use crate::error::PipelineError;

/// Compute the rebate from classified buckets.
///
/// `rebate = unstable_slots / total_slots * monthly_bill`; the payable amount is
/// the remainder. Nothing is rounded here.
pub fn compute_rebate(buckets: &[HourBucket], config: &RebateConfig) -> Result<RebateResult, PipelineError> {
    let total_slots = buckets.len();
    if total_slots == 0 {
        return Err(PipelineError::EmptyDataset);
    }

    let unstable_slots = buckets.iter().filter(|b| b.unstable).count();
    let rebate_amount = (unstable_slots as f64 / total_slots as f64) * config.monthly_bill;

    Ok(RebateResult {
        total_slots,
        unstable_slots,
        monthly_bill: config.monthly_bill,
        rebate_amount,
        payable_amount: config.monthly_bill - rebate_amount,
    })
}
