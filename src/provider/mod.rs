pub use self::http::HTTP;

mod aggregator;
mod chain;
mod fx;
mod http;
mod marketplace;
