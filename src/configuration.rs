use std::{env, fs, ops::Deref, sync::Arc};

use url::Url;

use crate::{cache::SnapshotCache, error::Error, provider::HTTP};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub http: HTTP,
    pub cache: SnapshotCache,
}

impl State {
    pub fn new(config: Config, http: HTTP) -> State {
        let cache = SnapshotCache::new(config.cache_ttl);
        State {
            config,
            http,
            cache,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub marketplace_api_key: String,
    pub collection_address: String,
    pub chain: String,
    pub native_currency: String,
    pub fx_asset_id: String,
    pub marketplace_host: String,
    pub aggregator_host: String,
    pub rpc_host: String,
    pub fx_host: String,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub cache_ttl: u64,
    pub timeout: u64,
}

impl Config {
    pub fn marketplace_stats_url(&self) -> String {
        format!(
            "{}/api/v2.2/nft/{}/stats?chain={}",
            self.marketplace_host, self.collection_address, self.chain
        )
    }

    pub fn marketplace_stats_legacy_url(&self) -> String {
        format!(
            "{}/api/v2/nft/{}/stats?chain={}",
            self.marketplace_host, self.collection_address, self.chain
        )
    }

    pub fn aggregator_floor_url(&self) -> String {
        format!(
            "{}/collections/v7?contract={}",
            self.aggregator_host, self.collection_address
        )
    }

    pub fn fx_rate_url(&self) -> String {
        format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies=usd",
            self.fx_host, self.fx_asset_id
        )
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let marketplace_api_key = env::var("MARKETPLACE_API_KEY")?;
    let collection_address = env::var("COLLECTION_ADDRESS")?;
    let chain = env::var("CHAIN")?;
    let native_currency = env::var("NATIVE_CURRENCY")?;
    let fx_asset_id = env::var("FX_ASSET_ID")?;

    let marketplace_host = env::var("MARKETPLACE_HOST")?;
    let aggregator_host = env::var("AGGREGATOR_HOST")?;
    let rpc_host = env::var("RPC_HOST")?;
    let fx_host = env::var("FX_HOST")?;

    for host in [&marketplace_host, &aggregator_host, &rpc_host, &fx_host] {
        Url::parse(host)?;
    }

    if !is_hex_address(&collection_address) {
        return Err(Error::ConfigurationError(format!(
            "COLLECTION_ADDRESS is not a contract address: {}",
            collection_address
        )));
    }

    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();
    let cache_ttl: u64 = env::var("CACHE_TTL_IN_SEC")?.parse()?;
    let timeout: u64 = env::var("TIMEOUT")?.parse()?;

    Ok(Config {
        marketplace_api_key,
        collection_address,
        chain,
        native_currency,
        fx_asset_id,
        marketplace_host,
        aggregator_host,
        rpc_host,
        fx_host,
        server_host,
        port,
        allowed_origins,
        cache_ttl,
        timeout,
    })
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    // deployments supply real environment variables; the file is optional
    let Ok(config_string) = fs::read_to_string(path) else {
        return Ok(());
    };

    parse_config_string(config_string);

    Ok(())
}

fn parse_config_string(config: String) {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        if env::var(key).is_err() {
            env::set_var(key, value);
        }
    }
}

fn is_hex_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => {
            digits.len() == 40
                && digits.bytes().all(|b| b.is_ascii_hexdigit())
        },
        None => false,
    }
}
