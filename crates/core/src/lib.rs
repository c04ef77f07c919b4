pub mod domain;
pub mod http;
pub mod ingest;
pub mod notify;
pub mod pipeline;

pub mod config {

    pub const DEFAULT_OWM_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
    pub const DEFAULT_STOCK_BASE_URL: &str = "https://www.alphavantage.co";
    pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org";
    pub const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com";

    // Bern.
    const DEFAULT_FORECAST_LAT: f64 = 46.947975;
    const DEFAULT_FORECAST_LON: f64 = 7.447447;
    // 3-hour slots, so roughly the next 12 hours.
    const DEFAULT_FORECAST_SLOTS: u32 = 4;

    const DEFAULT_STOCK_SYMBOL: &str = "TSLA";
    const DEFAULT_COMPANY_NAME: &str = "Tesla Inc";
    const DEFAULT_MOVE_THRESHOLD_PCT: f64 = 5.0;
    const DEFAULT_NEWS_MAX_ARTICLES: usize = 3;
    const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub sentry_dsn: Option<String>,
        pub http_timeout_secs: u64,
        pub https_proxy: Option<String>,

        pub owm_api_key: Option<String>,
        pub owm_base_url: String,
        pub forecast_lat: f64,
        pub forecast_lon: f64,
        pub forecast_slots: u32,

        pub stock_api_key: Option<String>,
        pub stock_base_url: String,
        pub stock_symbol: String,
        pub company_name: String,
        pub move_threshold_pct: f64,
        /// Raw `STOCK_CHANGE_BASIS`; only the stock job parses it.
        pub change_basis: Option<String>,

        pub news_api_key: Option<String>,
        pub news_base_url: String,
        pub news_max_articles: usize,

        pub twilio_account_sid: Option<String>,
        pub twilio_auth_token: Option<String>,
        pub twilio_from_number: Option<String>,
        pub twilio_to_number: Option<String>,
        pub twilio_base_url: String,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        /// Builds settings from an arbitrary key lookup. Empty values count as unset.
        pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
        where
            F: Fn(&str) -> Option<String>,
        {
            let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
            let get_any = |keys: &[&str]| keys.iter().find_map(|&k| get(k));

            // A zero timeout would fail every request.
            let http_timeout_secs =
                match parse_or(get("HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS) {
                    0 => DEFAULT_HTTP_TIMEOUT_SECS,
                    secs => secs,
                };

            Ok(Self {
                sentry_dsn: get("SENTRY_DSN"),
                http_timeout_secs,
                https_proxy: get_any(&["HTTPS_PROXY", "https_proxy"]),

                owm_api_key: get("OWM_API_KEY"),
                owm_base_url: get("OWM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OWM_BASE_URL.to_string()),
                forecast_lat: parse_or(get("FORECAST_LAT"), DEFAULT_FORECAST_LAT),
                forecast_lon: parse_or(get("FORECAST_LON"), DEFAULT_FORECAST_LON),
                forecast_slots: parse_or(get("FORECAST_SLOTS"), DEFAULT_FORECAST_SLOTS),

                stock_api_key: get("STOCK_API_KEY"),
                stock_base_url: get("STOCK_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_STOCK_BASE_URL.to_string()),
                stock_symbol: get("STOCK_SYMBOL")
                    .unwrap_or_else(|| DEFAULT_STOCK_SYMBOL.to_string()),
                company_name: get("COMPANY_NAME")
                    .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
                move_threshold_pct: parse_or(
                    get("STOCK_MOVE_THRESHOLD_PCT"),
                    DEFAULT_MOVE_THRESHOLD_PCT,
                ),
                change_basis: get("STOCK_CHANGE_BASIS"),

                news_api_key: get("NEWS_API_KEY"),
                news_base_url: get("NEWS_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_NEWS_BASE_URL.to_string()),
                news_max_articles: parse_or(get("NEWS_MAX_ARTICLES"), DEFAULT_NEWS_MAX_ARTICLES),

                twilio_account_sid: get_any(&["TWILIO_ACCOUNT_SID", "TWILIO_SID"]),
                twilio_auth_token: get("TWILIO_AUTH_TOKEN"),
                twilio_from_number: get_any(&["TWILIO_FROM_NUMBER", "TWILIO_VIRTUAL_NUMBER"]),
                twilio_to_number: get_any(&["TWILIO_TO_NUMBER", "TWILIO_VERIFIED_NUMBER"]),
                twilio_base_url: get("TWILIO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_TWILIO_BASE_URL.to_string()),
            })
        }

        // Credentials are not checked up front. An unset one goes out blank and
        // the provider rejects that call.

        pub fn owm_api_key_or_blank(&self) -> &str {
            credential(self.owm_api_key.as_deref(), "OWM_API_KEY")
        }

        pub fn stock_api_key_or_blank(&self) -> &str {
            credential(self.stock_api_key.as_deref(), "STOCK_API_KEY")
        }

        pub fn news_api_key_or_blank(&self) -> &str {
            credential(self.news_api_key.as_deref(), "NEWS_API_KEY")
        }

        pub fn twilio_account_sid_or_blank(&self) -> &str {
            credential(self.twilio_account_sid.as_deref(), "TWILIO_ACCOUNT_SID")
        }

        pub fn twilio_auth_token_or_blank(&self) -> &str {
            credential(self.twilio_auth_token.as_deref(), "TWILIO_AUTH_TOKEN")
        }

        pub fn twilio_from_number_or_blank(&self) -> &str {
            credential(self.twilio_from_number.as_deref(), "TWILIO_FROM_NUMBER")
        }

        pub fn twilio_to_number_or_blank(&self) -> &str {
            credential(self.twilio_to_number.as_deref(), "TWILIO_TO_NUMBER")
        }

        pub fn http_timeout(&self) -> std::time::Duration {
            std::time::Duration::from_secs(self.http_timeout_secs)
        }
    }

    fn credential<'a>(value: Option<&'a str>, name: &'static str) -> &'a str {
        value.unwrap_or_else(|| {
            tracing::warn!(variable = name, "not set; the provider will reject the call");
            ""
        })
    }

    fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
        value
            .and_then(|s| s.trim().parse::<T>().ok())
            .unwrap_or(default)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::collections::HashMap;

        fn settings_from(pairs: &[(&str, &str)]) -> Settings {
            let map: HashMap<String, String> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            Settings::from_lookup(|k| map.get(k).cloned()).unwrap()
        }

        #[test]
        fn defaults_point_at_bern_and_tsla() {
            let s = settings_from(&[]);
            assert_eq!(s.forecast_slots, 4);
            assert_eq!(s.forecast_lat, 46.947975);
            assert_eq!(s.forecast_lon, 7.447447);
            assert_eq!(s.stock_symbol, "TSLA");
            assert_eq!(s.company_name, "Tesla Inc");
            assert_eq!(s.move_threshold_pct, 5.0);
            assert_eq!(s.news_max_articles, 3);
            assert_eq!(s.change_basis, None);
            assert_eq!(s.http_timeout_secs, 30);
            assert_eq!(s.owm_base_url, DEFAULT_OWM_BASE_URL);
            assert!(s.https_proxy.is_none());
        }

        #[test]
        fn twilio_aliases_are_accepted() {
            let s = settings_from(&[
                ("TWILIO_SID", "AC123"),
                ("TWILIO_VIRTUAL_NUMBER", "+15550001111"),
                ("TWILIO_VERIFIED_NUMBER", "+15550002222"),
            ]);
            assert_eq!(s.twilio_account_sid_or_blank(), "AC123");
            assert_eq!(s.twilio_from_number_or_blank(), "+15550001111");
            assert_eq!(s.twilio_to_number_or_blank(), "+15550002222");
        }

        #[test]
        fn primary_twilio_names_win_over_aliases() {
            let s = settings_from(&[("TWILIO_ACCOUNT_SID", "ACmain"), ("TWILIO_SID", "ACalias")]);
            assert_eq!(s.twilio_account_sid.as_deref(), Some("ACmain"));
        }

        #[test]
        fn missing_credentials_come_back_blank() {
            let s = settings_from(&[("OWM_API_KEY", "   "), ("STOCK_API_KEY", "av-key")]);
            assert_eq!(s.owm_api_key_or_blank(), "");
            assert_eq!(s.twilio_auth_token_or_blank(), "");
            assert_eq!(s.stock_api_key_or_blank(), "av-key");
        }

        #[test]
        fn unparseable_numbers_fall_back_to_defaults() {
            let s = settings_from(&[("FORECAST_SLOTS", "many"), ("HTTP_TIMEOUT_SECS", "5")]);
            assert_eq!(s.forecast_slots, 4);
            assert_eq!(s.http_timeout_secs, 5);
        }

        #[test]
        fn proxy_is_read_from_either_case() {
            let s = settings_from(&[("https_proxy", "http://proxy.local:3128")]);
            assert_eq!(s.https_proxy.as_deref(), Some("http://proxy.local:3128"));
        }

        #[test]
        fn zero_timeout_falls_back_to_default() {
            let s = settings_from(&[("HTTP_TIMEOUT_SECS", "0")]);
            assert_eq!(s.http_timeout_secs, 30);
            assert!(!s.http_timeout().is_zero());
        }

        #[test]
        fn unknown_change_basis_does_not_fail_settings() {
            let s = settings_from(&[("STOCK_CHANGE_BASIS", "median")]);
            assert_eq!(s.change_basis.as_deref(), Some("median"));
        }
    }
}
