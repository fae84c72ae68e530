use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["https://accounts.google.com", "accounts.google.com"];

#[derive(Clone)]
struct RsaKeyData {
    n: String,
    e: String,
}

/// Claims of a Google ID token that we rely on.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    pub sub: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub exp: usize,
}

/// Google's signing keys, fetched on demand and cached by `kid` for an hour.
#[derive(Clone)]
pub struct GoogleKeyCache {
    cache: Arc<Cache<String, RsaKeyData>>,
    jwks_url: String,
    client: reqwest::Client,
    client_id: String,
}

impl GoogleKeyCache {
    pub fn new(client_id: &str) -> Self {
        Self::with_url(client_id, GOOGLE_JWKS_URL)
    }

    fn with_url(client_id: &str, jwks_url: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(std::time::Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
            client_id: client_id.to_string(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn get_key_data(&self, kid: &str) -> Result<RsaKeyData, String> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let keys = jwks["keys"].as_array().ok_or("No keys in JWKS")?;

        let key = keys
            .iter()
            .find(|k| k["kid"].as_str() == Some(kid))
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;

        let key_data = RsaKeyData {
            n: key["n"].as_str().ok_or("Missing 'n' in JWK")?.to_string(),
            e: key["e"].as_str().ok_or("Missing 'e' in JWK")?.to_string(),
        };

        self.cache.insert(kid.to_string(), key_data.clone()).await;
        Ok(key_data)
    }

    /// Verify an ID token's signature, audience, issuer and expiry.
    pub async fn validate_id_token(&self, token: &str) -> Result<GoogleClaims, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        if header.alg != Algorithm::RS256 {
            return Err(format!("Unexpected algorithm {:?}", header.alg));
        }
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key_data = self.get_key_data(&kid).await?;
        let decoding_key = DecodingKey::from_rsa_components(&key_data.n, &key_data.e)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        decode::<GoogleClaims>(token, &decoding_key, &validation)
            .map(|td| td.claims)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}
