//!
//! Auction pricing. All arithmetic is in satoshis on integers; intermediates
//! are widened to `u128` so no product can overflow.
//!

use crate::config::Params;

const PRICE_DECAY_DENOMINATOR: u128 = 1_000_000;
const PRICE_DECAY_PER_REGISTRATION: u128 = 3;

/// Starting price of an auction opened with `registration_id`.
///
/// Decays linearly by 3 millionths of `min_starting_bid` per registration and
/// never drops below `floor`.
pub fn auction_price(registration_id: u64, min_starting_bid: u64, floor: u64) -> u64 {
    let base = min_starting_bid as u128 * PRICE_DECAY_DENOMINATOR;
    let decay = (min_starting_bid as u128).saturating_mul(registration_id as u128).saturating_mul(PRICE_DECAY_PER_REGISTRATION);
    let price = (base.saturating_sub(decay) / PRICE_DECAY_DENOMINATOR) as u64;
    price.max(floor)
}

/// Smallest bid accepted over a running auction currently at `amount`, rounded up.
pub fn minimum_next_bid(amount: u64, min_bid_increase_percentage: u64) -> u64 {
    let scaled = amount as u128 * (100 + min_bid_increase_percentage as u128);
    scaled.div_ceil(100).min(u64::MAX as u128) as u64
}

/// Incentive paid to whoever builds the claim transaction of an auction that
/// closed at `price`. `None` when nothing is paid.
pub fn creator_incentive(price: u64, registration_id: u64, params: &Params) -> Option<u64> {
    let upper_bound = params.creator_incentive_upper_bound;
    if price <= params.creator_incentive_fixed_deduction || registration_id >= upper_bound {
        return None;
    }
    let incentive = (price - params.creator_incentive_fixed_deduction) as u128 * (upper_bound - registration_id) as u128
        / upper_bound as u128;
    let incentive = incentive as u64;
    (incentive > params.creator_incentive_threshold).then_some(incentive)
}
