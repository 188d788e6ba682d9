pub use self::{
    fx::FxRateResponse,
    market_stats::{
        AggregatorCollection, AggregatorFloorAsk, AggregatorResponse,
        IntervalStats, IntervalV22, IntervalsV22, MarketStatsV2,
        MarketStatsV22, RawMarketStats,
    },
    rpc::{RpcError, RpcRequest, RpcResponse},
    snapshot::{FiatAmount, MetricsSnapshot, FIAT_UNAVAILABLE},
};

mod fx;
mod market_stats;
mod rpc;
mod snapshot;
