use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use crate::{
    error::{Error, UpstreamResult},
    helpers::{
        format_amount, FIAT_AGGREGATE_DECIMALS, FIAT_DECIMALS,
        NATIVE_DECIMALS, PERCENT_DECIMALS,
    },
    types::{FiatAmount, IntervalStats, MetricsSnapshot, RawMarketStats},
};

/// Every upstream outcome of one refresh fan-out. Derivation consumes all of
/// them; a failed adapter only narrows the fallback chains.
#[derive(Debug)]
pub struct SourceSet {
    pub primary: UpstreamResult<RawMarketStats>,
    pub legacy: UpstreamResult<RawMarketStats>,
    pub aggregator: UpstreamResult<RawMarketStats>,
    /// Chain-read total supply; `0` is the sentinel for "unknown".
    pub chain_supply: u64,
    pub fx_rate: Option<BigDecimal>,
}

type Extractor<T> = fn(&SourceSet) -> Option<T>;

/// Ordered floor-price candidates. A reported zero or absent floor is
/// excluded from the list, never used as 0.
const FLOOR_PRICE_SOURCES: &[Extractor<BigDecimal>] =
    &[primary_floor, legacy_floor, aggregator_floor];

const CURRENCY_SOURCES: &[Extractor<String>] =
    &[primary_currency, legacy_currency];

/// Provider-declared supply, tried only after the chain read came back zero.
const DECLARED_SUPPLY_SOURCES: &[Extractor<u64>] =
    &[primary_supply, legacy_supply, aggregator_supply];

/// Last-resort supply proxy, strictly weaker evidence than a declared supply.
const HOLDER_COUNT_SOURCES: &[Extractor<u64>] =
    &[primary_holders, legacy_holders];

const LISTED_COUNT_SOURCES: &[Extractor<u64>] =
    &[primary_listed, legacy_listed, aggregator_listed];

const ONE_DAY_SOURCES: &[Extractor<IntervalStats>] =
    &[primary_one_day, legacy_one_day];

const SEVEN_DAY_SOURCES: &[Extractor<IntervalStats>] =
    &[primary_seven_day, legacy_seven_day];

/// Walks one ordered extractor list and takes the first yielded value.
pub fn first_present<T>(
    sources: &[Extractor<T>],
    set: &SourceSet,
) -> Option<T> {
    sources.iter().find_map(|extract| extract(set))
}

fn primary(set: &SourceSet) -> Option<&RawMarketStats> {
    set.primary.as_ref().ok()
}

fn legacy(set: &SourceSet) -> Option<&RawMarketStats> {
    set.legacy.as_ref().ok()
}

fn aggregator(set: &SourceSet) -> Option<&RawMarketStats> {
    set.aggregator.as_ref().ok()
}

fn positive(value: Option<&BigDecimal>) -> Option<BigDecimal> {
    value.filter(|v| **v > BigDecimal::zero()).cloned()
}

fn nonzero(value: Option<u64>) -> Option<u64> {
    value.filter(|v| *v != 0)
}

fn primary_floor(set: &SourceSet) -> Option<BigDecimal> {
    positive(primary(set)?.floor_price.as_ref())
}

fn legacy_floor(set: &SourceSet) -> Option<BigDecimal> {
    positive(legacy(set)?.floor_price.as_ref())
}

fn aggregator_floor(set: &SourceSet) -> Option<BigDecimal> {
    positive(aggregator(set)?.floor_price.as_ref())
}

fn primary_currency(set: &SourceSet) -> Option<String> {
    primary(set)?.currency.clone()
}

fn legacy_currency(set: &SourceSet) -> Option<String> {
    legacy(set)?.currency.clone()
}

fn primary_supply(set: &SourceSet) -> Option<u64> {
    nonzero(primary(set)?.total_supply)
}

fn legacy_supply(set: &SourceSet) -> Option<u64> {
    nonzero(legacy(set)?.total_supply)
}

fn aggregator_supply(set: &SourceSet) -> Option<u64> {
    nonzero(aggregator(set)?.total_supply)
}

fn primary_holders(set: &SourceSet) -> Option<u64> {
    nonzero(primary(set)?.holder_count)
}

fn legacy_holders(set: &SourceSet) -> Option<u64> {
    nonzero(legacy(set)?.holder_count)
}

fn primary_listed(set: &SourceSet) -> Option<u64> {
    primary(set)?.listed_count
}

fn legacy_listed(set: &SourceSet) -> Option<u64> {
    legacy(set)?.listed_count
}

fn aggregator_listed(set: &SourceSet) -> Option<u64> {
    aggregator(set)?.listed_count
}

fn primary_one_day(set: &SourceSet) -> Option<IntervalStats> {
    primary(set)?.one_day.clone()
}

fn legacy_one_day(set: &SourceSet) -> Option<IntervalStats> {
    legacy(set)?.one_day.clone()
}

fn primary_seven_day(set: &SourceSet) -> Option<IntervalStats> {
    primary(set)?.seven_day.clone()
}

fn legacy_seven_day(set: &SourceSet) -> Option<IntervalStats> {
    legacy(set)?.seven_day.clone()
}

/// Strict priority chain: chain read, declared supply, holder count. A
/// nonzero chain value always wins regardless of what the providers claim.
pub fn resolve_supply(set: &SourceSet) -> u64 {
    if set.chain_supply != 0 {
        return set.chain_supply;
    }

    first_present(DECLARED_SUPPLY_SOURCES, set)
        .or_else(|| first_present(HOLDER_COUNT_SOURCES, set))
        .unwrap_or(0)
}

/// Exactly 0 when the window-start price is not positive. Policy, not an
/// error condition; NaN and infinity never reach the boundary.
pub fn percentage_change(
    current: &BigDecimal,
    start: &BigDecimal,
) -> BigDecimal {
    if start <= &BigDecimal::zero() {
        return BigDecimal::zero();
    }

    (current - start) * BigDecimal::from(100u32) / start
}

fn listing_ratio(listed: Option<u64>, supply: u64) -> BigDecimal {
    match listed {
        Some(listed) if supply != 0 => {
            BigDecimal::from(listed) * BigDecimal::from(100u32)
                / BigDecimal::from(supply)
        },
        _ => BigDecimal::zero(),
    }
}

fn cap_to_volume(market_cap: &BigDecimal, volume: &BigDecimal) -> BigDecimal {
    if volume <= &BigDecimal::zero() {
        return BigDecimal::zero();
    }

    market_cap / volume
}

/// Merges one fan-out's worth of upstream outcomes into a snapshot. Pure and
/// deterministic; full precision throughout, rounding only at the formatting
/// boundary.
pub fn derive_snapshot(
    set: &SourceSet,
    native_currency: &str,
    now: DateTime<Utc>,
) -> Result<MetricsSnapshot, Error> {
    let floor = first_present(FLOOR_PRICE_SOURCES, set)
        .ok_or(Error::NoResolvableFloorPrice)?;

    let currency = first_present(CURRENCY_SOURCES, set)
        .unwrap_or_else(|| native_currency.to_owned());

    let supply = resolve_supply(set);
    let market_cap = &floor * BigDecimal::from(supply);

    let one_day = first_present(ONE_DAY_SOURCES, set);
    let seven_day = first_present(SEVEN_DAY_SOURCES, set);

    let volume_24h = one_day
        .as_ref()
        .and_then(|window| window.volume.clone())
        .unwrap_or_else(BigDecimal::zero);
    let volume_7d = seven_day
        .as_ref()
        .and_then(|window| window.volume.clone())
        .unwrap_or_else(BigDecimal::zero);

    let change_24h = one_day
        .as_ref()
        .and_then(|window| window.floor_price_start.as_ref())
        .map(|start| percentage_change(&floor, start))
        .unwrap_or_else(BigDecimal::zero);
    let change_7d = seven_day
        .as_ref()
        .and_then(|window| window.floor_price_start.as_ref())
        .map(|start| percentage_change(&floor, start))
        .unwrap_or_else(BigDecimal::zero);

    let listed = first_present(LISTED_COUNT_SOURCES, set);
    let holders = first_present(HOLDER_COUNT_SOURCES, set).unwrap_or(0);
    let listing = listing_ratio(listed, supply);
    let liquidity = cap_to_volume(&market_cap, &volume_24h);

    let fx = set.fx_rate.as_ref();

    Ok(MetricsSnapshot {
        floor_price: format_amount(&floor, NATIVE_DECIMALS),
        currency,
        floor_price_usd: FiatAmount::convert(&floor, fx, FIAT_DECIMALS),
        market_cap: format_amount(&market_cap, NATIVE_DECIMALS),
        market_cap_usd: FiatAmount::convert(
            &market_cap,
            fx,
            FIAT_AGGREGATE_DECIMALS,
        ),
        volume_24h: format_amount(&volume_24h, NATIVE_DECIMALS),
        volume_24h_usd: FiatAmount::convert(
            &volume_24h,
            fx,
            FIAT_AGGREGATE_DECIMALS,
        ),
        volume_7d: format_amount(&volume_7d, NATIVE_DECIMALS),
        volume_7d_usd: FiatAmount::convert(
            &volume_7d,
            fx,
            FIAT_AGGREGATE_DECIMALS,
        ),
        price_change_24h: format_amount(&change_24h, PERCENT_DECIMALS),
        price_change_7d: format_amount(&change_7d, PERCENT_DECIMALS),
        holder_count: holders,
        total_supply: supply,
        listed_count: listed.unwrap_or(0),
        listing_ratio: format_amount(&listing, PERCENT_DECIMALS),
        cap_to_volume_ratio: format_amount(&liquidity, PERCENT_DECIMALS),
        last_updated: now,
    })
}
