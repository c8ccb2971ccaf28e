//! Steam 游戏时长
//!
//! 通过 `IPlayerService/GetOwnedGames` 查询指定用户拥有的某个游戏的累计时长。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{parse_json, success_body};
use super::{PlaytimeFormat, Provider, ProviderError, ProviderResult, RemoteSource, TemplateData};
use crate::cache::DEFAULT_TTL;
use crate::formatting::timers::{minutes_to_hours, TimeInfo};
use crate::formatting::Variables;
use crate::i18n::Locale;

pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com";

const PROVIDER: &str = "steam";

/// Steam 接口配置
#[derive(Debug, Clone)]
pub struct SteamConfig {
    pub api_key: String,
    pub base_url: String,
}

impl SteamConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: STEAM_API_BASE_URL.to_string(),
        }
    }
}

/// 时长查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaytimeRequest {
    pub steam_id: String,
    pub app_id: u64,
}

impl PlaytimeRequest {
    /// 校验 SteamID64 与应用 ID 都是数字
    pub fn new(steam_id: &str, app_id: &str) -> ProviderResult<Self> {
        let steam_id = steam_id.trim();
        if steam_id.is_empty() || !steam_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ProviderError::InvalidInput(format!("无效的 Steam ID: {}", steam_id)));
        }

        let app_id = app_id
            .trim()
            .parse::<u64>()
            .map_err(|_| ProviderError::InvalidInput(format!("无效的应用 ID: {}", app_id)))?;

        Ok(Self {
            steam_id: steam_id.to_string(),
            app_id,
        })
    }
}

/// 缓存的时长数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaytimeData {
    pub playtime_in_minutes: u64,
    pub game_name: String,
}

impl TemplateData for PlaytimeData {
    fn variables(&self, _locale: Locale) -> Variables {
        let info = TimeInfo::from_minutes(self.playtime_in_minutes as f64);
        let mut vars = info.to_variables();
        vars.insert("gameName", self.game_name.as_str())
            .insert("count", info.total_hours);
        vars
    }
}

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    response: OwnedGames,
}

#[derive(Debug, Deserialize)]
struct OwnedGames {
    #[serde(default)]
    games: Vec<OwnedGame>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u64,
    playtime_forever: u64,
    name: String,
}

/// Steam 时长数据源
#[derive(Debug, Clone)]
pub struct SteamProvider {
    client: Client,
    config: SteamConfig,
    ttl: Duration,
}

impl SteamProvider {
    pub fn new(client: Client, config: SteamConfig) -> Self {
        Self {
            client,
            config,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[async_trait]
impl RemoteSource for SteamProvider {
    type Request = PlaytimeRequest;
    type Data = PlaytimeData;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn cache_key(&self, request: &PlaytimeRequest) -> String {
        format!("social:steam:playtime:{}:{}", request.steam_id, request.app_id)
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn fetch(&self, request: &PlaytimeRequest) -> ProviderResult<String> {
        let url = format!(
            "{}/IPlayerService/GetOwnedGames/v1/",
            self.config.base_url.trim_end_matches('/')
        );
        let app_id = request.app_id.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("steamid", request.steam_id.as_str()),
                ("include_appinfo", "true"),
                ("appids_filter[0]", app_id.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::transport(PROVIDER, e))?;

        success_body(PROVIDER, response).await
    }

    fn parse(&self, request: &PlaytimeRequest, body: &str) -> ProviderResult<PlaytimeData> {
        let parsed: OwnedGamesResponse = parse_json(PROVIDER, body)?;

        let game = parsed
            .response
            .games
            .into_iter()
            .find(|game| game.appid == request.app_id)
            .ok_or_else(|| {
                tracing::info!("Steam 用户 {} 的库中没有应用 {}", request.steam_id, request.app_id);
                ProviderError::not_found(
                    PROVIDER,
                    format!("应用 {} 不在用户 {} 的库中", request.app_id, request.steam_id),
                )
            })?;

        tracing::debug!(
            "Steam 时长: {} ({}) = {}",
            game.name,
            game.appid,
            minutes_to_hours(game.playtime_forever)
        );

        Ok(PlaytimeData {
            playtime_in_minutes: game.playtime_forever,
            game_name: game.name,
        })
    }
}

impl Provider for SteamProvider {
    type Format = PlaytimeFormat;
    const TEXT_KEY_PREFIX: &'static str = "social.steam.hours";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SteamProvider {
        SteamProvider::new(Client::new(), SteamConfig::new("key"))
    }

    fn request() -> PlaytimeRequest {
        PlaytimeRequest::new("76561198209279900", "381210").unwrap()
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(
            provider().cache_key(&request()),
            "social:steam:playtime:76561198209279900:381210"
        );
    }

    #[test]
    fn test_request_validation() {
        assert!(PlaytimeRequest::new("abc", "1").is_err());
        assert!(PlaytimeRequest::new("", "1").is_err());
        assert!(PlaytimeRequest::new("123", "dbd").is_err());
    }

    #[test]
    fn test_parse_picks_matching_game() {
        let body = r#"{"response":{"game_count":2,"games":[
            {"appid":1,"name":"Other","playtime_forever":10},
            {"appid":381210,"name":"Dead by Daylight","playtime_forever":125}
        ]}}"#;

        let data = provider().parse(&request(), body).unwrap();
        assert_eq!(
            data,
            PlaytimeData {
                playtime_in_minutes: 125,
                game_name: "Dead by Daylight".to_string()
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let p = provider();
        assert!(matches!(
            p.parse(&request(), r#"{"response":{"game_count":0}}"#),
            Err(ProviderError::NotFound { .. })
        ));
        assert!(matches!(
            p.parse(&request(), r#"{"response":{"games":[{"appid":"x"}]}}"#),
            Err(ProviderError::Parse { .. })
        ));
        assert!(matches!(p.parse(&request(), "{}"), Err(ProviderError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_game_without_name() {
        let body = r#"{"response":{"games":[{"appid":381210,"playtime_forever":10}]}}"#;
        assert!(matches!(
            provider().parse(&request(), body),
            Err(ProviderError::Parse { .. })
        ));
    }

    #[test]
    fn test_variables_include_plural_count() {
        let data = PlaytimeData {
            playtime_in_minutes: 65,
            game_name: "Hades".to_string(),
        };
        let vars = data.variables(Locale::EnUs);
        assert_eq!(vars.count(), Some(1));
        assert_eq!(vars.get("gameName").map(|v| v.to_string()), Some("Hades".to_string()));
    }
}
