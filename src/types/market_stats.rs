use bigdecimal::BigDecimal;
use serde::Deserialize;

/// Marketplace stats normalized across provider protocol versions. Absent
/// fields stay `None`; a provider that omits a field never contributes a zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMarketStats {
    pub floor_price: Option<BigDecimal>,
    pub currency: Option<String>,
    pub holder_count: Option<u64>,
    pub total_supply: Option<u64>,
    pub listed_count: Option<u64>,
    pub total_volume: Option<BigDecimal>,
    pub one_day: Option<IntervalStats>,
    pub seven_day: Option<IntervalStats>,
}

/// One time-bucketed window as reported by a stats provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalStats {
    /// Floor price at the start of the window.
    pub floor_price_start: Option<BigDecimal>,
    pub volume: Option<BigDecimal>,
    pub average_price: Option<BigDecimal>,
}

/// Stats payload, marketplace API protocol v2.2.
#[derive(Debug, Deserialize)]
pub struct MarketStatsV22 {
    pub floor_price: Option<BigDecimal>,
    pub floor_price_currency: Option<String>,
    pub owners: Option<u64>,
    pub total_supply: Option<u64>,
    pub listed: Option<u64>,
    pub total_volume: Option<BigDecimal>,
    pub intervals: Option<IntervalsV22>,
}

#[derive(Debug, Deserialize)]
pub struct IntervalsV22 {
    pub one_day: Option<IntervalV22>,
    pub seven_day: Option<IntervalV22>,
}

#[derive(Debug, Deserialize)]
pub struct IntervalV22 {
    pub floor_price: Option<BigDecimal>,
    pub volume: Option<BigDecimal>,
    pub average_price: Option<BigDecimal>,
}

impl From<MarketStatsV22> for RawMarketStats {
    fn from(payload: MarketStatsV22) -> Self {
        let (one_day, seven_day) = match payload.intervals {
            Some(intervals) => (
                intervals.one_day.map(IntervalStats::from),
                intervals.seven_day.map(IntervalStats::from),
            ),
            None => (None, None),
        };

        RawMarketStats {
            floor_price: payload.floor_price,
            currency: payload.floor_price_currency,
            holder_count: payload.owners,
            total_supply: payload.total_supply,
            listed_count: payload.listed,
            total_volume: payload.total_volume,
            one_day,
            seven_day,
        }
    }
}

impl From<IntervalV22> for IntervalStats {
    fn from(interval: IntervalV22) -> Self {
        IntervalStats {
            floor_price_start: interval.floor_price,
            volume: interval.volume,
            average_price: interval.average_price,
        }
    }
}

/// Stats payload, marketplace API protocol v2. Overlapping subset of the
/// v2.2 fields under legacy names, windows flattened.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStatsV2 {
    pub floor_price: Option<BigDecimal>,
    pub floor_price_symbol: Option<String>,
    pub unique_holders: Option<u64>,
    pub total_volume: Option<BigDecimal>,
    pub listed_count: Option<u64>,
    pub one_day_floor: Option<BigDecimal>,
    pub one_day_volume: Option<BigDecimal>,
    pub seven_day_floor: Option<BigDecimal>,
    pub seven_day_volume: Option<BigDecimal>,
}

impl From<MarketStatsV2> for RawMarketStats {
    fn from(payload: MarketStatsV2) -> Self {
        let one_day = interval_from_flat(
            payload.one_day_floor,
            payload.one_day_volume,
        );
        let seven_day = interval_from_flat(
            payload.seven_day_floor,
            payload.seven_day_volume,
        );

        RawMarketStats {
            floor_price: payload.floor_price,
            currency: payload.floor_price_symbol,
            holder_count: payload.unique_holders,
            total_supply: None,
            listed_count: payload.listed_count,
            total_volume: payload.total_volume,
            one_day,
            seven_day,
        }
    }
}

fn interval_from_flat(
    floor: Option<BigDecimal>,
    volume: Option<BigDecimal>,
) -> Option<IntervalStats> {
    if floor.is_none() && volume.is_none() {
        return None;
    }

    Some(IntervalStats {
        floor_price_start: floor,
        volume,
        average_price: None,
    })
}

/// Alternate marketplace aggregator payload. Counts arrive as decimal
/// strings; ones that fail to parse are dropped, not zeroed.
#[derive(Debug, Deserialize)]
pub struct AggregatorResponse {
    pub collections: Vec<AggregatorCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatorCollection {
    pub floor_ask: Option<AggregatorFloorAsk>,
    pub on_sale_count: Option<String>,
    pub token_count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AggregatorFloorAsk {
    pub price: Option<BigDecimal>,
}

impl From<AggregatorCollection> for RawMarketStats {
    fn from(collection: AggregatorCollection) -> Self {
        RawMarketStats {
            floor_price: collection.floor_ask.and_then(|ask| ask.price),
            listed_count: parse_count(collection.on_sale_count),
            total_supply: parse_count(collection.token_count),
            ..RawMarketStats::default()
        }
    }
}

fn parse_count(value: Option<String>) -> Option<u64> {
    value.and_then(|count| count.parse().ok())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn v22_payload_normalizes_with_intervals() {
        let payload: MarketStatsV22 = serde_json::from_str(
            r#"{
                "floor_price": "1.5",
                "floor_price_currency": "ETH",
                "owners": 800,
                "total_supply": 10000,
                "listed": 420,
                "total_volume": "123.4",
                "intervals": {
                    "one_day": {
                        "floor_price": "1.45",
                        "volume": "12.5",
                        "average_price": "1.6"
                    },
                    "seven_day": {
                        "floor_price": "1.2",
                        "volume": "80.1",
                        "average_price": "1.5"
                    }
                }
            }"#,
        )
        .unwrap();

        let stats = RawMarketStats::from(payload);

        assert_eq!(stats.floor_price, BigDecimal::from_str("1.5").ok());
        assert_eq!(stats.currency.as_deref(), Some("ETH"));
        assert_eq!(stats.holder_count, Some(800));
        assert_eq!(stats.total_supply, Some(10000));
        assert_eq!(stats.listed_count, Some(420));

        let one_day = stats.one_day.unwrap();
        assert_eq!(
            one_day.floor_price_start,
            BigDecimal::from_str("1.45").ok()
        );
        assert_eq!(one_day.volume, BigDecimal::from_str("12.5").ok());
    }

    #[test]
    fn v22_absent_fields_stay_none() {
        let payload: MarketStatsV22 =
            serde_json::from_str(r#"{"floor_price": "1.5"}"#).unwrap();

        let stats = RawMarketStats::from(payload);

        assert_eq!(stats.holder_count, None);
        assert_eq!(stats.total_supply, None);
        assert_eq!(stats.listed_count, None);
        assert_eq!(stats.total_volume, None);
        assert_eq!(stats.one_day, None);
        assert_eq!(stats.seven_day, None);
    }

    // legacy floats arrive as JSON numbers, so compare at the rounded
    // formatting boundary rather than on exact binary expansions
    fn formatted(value: &Option<BigDecimal>) -> Option<String> {
        value
            .as_ref()
            .map(|v| crate::helpers::format_amount(v, 4))
    }

    #[test]
    fn legacy_v2_field_names_map_to_the_same_shape() {
        let payload: MarketStatsV2 = serde_json::from_str(
            r#"{
                "floorPrice": 1.45,
                "floorPriceSymbol": "ETH",
                "uniqueHolders": 795,
                "totalVolume": 120.0,
                "listedCount": 410,
                "oneDayFloor": 1.4,
                "oneDayVolume": 11.0
            }"#,
        )
        .unwrap();

        let stats = RawMarketStats::from(payload);

        assert_eq!(formatted(&stats.floor_price).as_deref(), Some("1.4500"));
        assert_eq!(stats.holder_count, Some(795));
        assert_eq!(stats.total_supply, None);

        let one_day = stats.one_day.unwrap();
        assert_eq!(
            formatted(&one_day.floor_price_start).as_deref(),
            Some("1.4000")
        );
        assert_eq!(stats.seven_day, None);
    }

    #[test]
    fn aggregator_counts_parse_from_strings() {
        let payload: AggregatorResponse = serde_json::from_str(
            r#"{
                "collections": [{
                    "floorAsk": { "price": 1.48 },
                    "onSaleCount": "415",
                    "tokenCount": "10000"
                }]
            }"#,
        )
        .unwrap();

        let collection = payload.collections.into_iter().next().unwrap();
        let stats = RawMarketStats::from(collection);

        assert_eq!(formatted(&stats.floor_price).as_deref(), Some("1.4800"));
        assert_eq!(stats.listed_count, Some(415));
        assert_eq!(stats.total_supply, Some(10000));
    }

    #[test]
    fn aggregator_unparseable_count_is_dropped() {
        let collection = AggregatorCollection {
            floor_ask: None,
            on_sale_count: Some("n/a".to_owned()),
            token_count: None,
        };

        let stats = RawMarketStats::from(collection);

        assert_eq!(stats.listed_count, None);
        assert_eq!(stats.floor_price, None);
    }
}
