//! Demo registry generation.
//!
//! Stands in for a live quote feed: marks are sampled instead of fetched,
//! haircuts are drawn from each category's reference band, and eligibility
//! is coin-flipped. Seedable so demos and docs stay reproducible; tests of
//! the engine should construct explicit fixtures instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::registry::AssetRegistry;
use crate::types::{AssetType, CollateralAsset};

const UNIVERSE: &[(AssetType, &[&str])] = &[
    (AssetType::Cash, &["USD"]),
    (AssetType::GovernmentBond, &["TLT", "IEF", "SHY"]),
    (AssetType::CorporateBond, &["LQD", "AGG"]),
    (
        AssetType::Equity,
        &["AAPL", "MSFT", "JPM", "GS", "SPY", "QQQ"],
    ),
];

/// Build a sample registry over the reference ticker universe.
///
/// Market values are uniform in [10 000, 500 000], haircuts uniform within
/// the category band (cash stays at zero), eligibility is a fair coin.
/// `count_per_type` fixes how many assets each category gets; `None` takes
/// each ticker pool in full. Past the pool, names gain a round suffix
/// (`USD`, `USD-2`, ...), so the registry stays duplicate-free.
pub fn sample_registry(seed: Option<u64>, count_per_type: Option<usize>) -> AssetRegistry {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut assets = Vec::new();
    for (asset_type, tickers) in UNIVERSE {
        let count = count_per_type.unwrap_or(tickers.len());
        for index in 0..count {
            assets.push(CollateralAsset {
                name: ticker_name(tickers, index),
                asset_type: *asset_type,
                market_value: Decimal::from(rng.gen_range(10_000i64..=500_000)),
                haircut: sample_haircut(&mut rng, *asset_type),
                eligibility: rng.gen_bool(0.5),
            });
        }
    }

    AssetRegistry::new(assets)
}

fn ticker_name(pool: &[&str], index: usize) -> String {
    let base = pool[index % pool.len()];
    match index / pool.len() {
        0 => base.to_string(),
        round => format!("{}-{}", base, round + 1),
    }
}

/// Draw a haircut from the category band, in basis points.
fn sample_haircut(rng: &mut StdRng, asset_type: AssetType) -> Decimal {
    let (low, high) = asset_type.haircut_band();
    if low == high {
        return low;
    }
    let low_bps = (low * Decimal::from(10_000)).to_i64().unwrap_or(0);
    let high_bps = (high * Decimal::from(10_000)).to_i64().unwrap_or(low_bps);
    Decimal::new(rng.gen_range(low_bps..=high_bps), 4)
}
