//! Quick-Auth Verification Module
//!
//! Bearer tokens issued by the host's auth service are JWTs. A token is
//! accepted when its signature verifies against one of the issuer's keys
//! (chosen by `kid`), it is unexpired, its `iss` is the configured issuer and
//! its `aud` is this app's domain.

use crate::config::AuthConfig;
use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Token subject is not a fid")]
    InvalidSubject,

    #[error("Failed to fetch signing keys: {0}")]
    Jwks(#[from] reqwest::Error),
}

/// Turns a bearer token into the fid it was issued for
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<u64, AuthError>;
}

/// One verification key of the issuer
#[derive(Clone)]
pub struct SigningKey {
    pub kid: Option<String>,
    pub algorithm: Algorithm,
    pub key: DecodingKey,
}

impl SigningKey {
    /// Verification key for one JWKS entry
    ///
    /// The algorithm comes from the key's `alg` when published, otherwise
    /// from its type and curve. `None` for keys that cannot verify a
    /// signature algorithm we know.
    pub fn from_jwk(jwk: &Jwk) -> Result<Option<Self>, AuthError> {
        let algorithm = match &jwk.common.key_algorithm {
            Some(alg) => signature_algorithm(alg),
            None => match &jwk.algorithm {
                AlgorithmParameters::OctetKeyPair(_) => Some(Algorithm::EdDSA),
                AlgorithmParameters::EllipticCurve(params) => match params.curve {
                    EllipticCurve::P256 => Some(Algorithm::ES256),
                    EllipticCurve::P384 => Some(Algorithm::ES384),
                    _ => None,
                },
                AlgorithmParameters::RSA(_) => Some(Algorithm::RS256),
                AlgorithmParameters::OctetKey(_) => None,
            },
        };

        let Some(algorithm) = algorithm else {
            debug!("Skipping signing key {:?}", jwk.common.key_id);
            return Ok(None);
        };
        Ok(Some(Self {
            kid: jwk.common.key_id.clone(),
            algorithm,
            key: DecodingKey::from_jwk(jwk)?,
        }))
    }
}

fn signature_algorithm(alg: &KeyAlgorithm) -> Option<Algorithm> {
    match alg {
        KeyAlgorithm::HS256 => Some(Algorithm::HS256),
        KeyAlgorithm::HS384 => Some(Algorithm::HS384),
        KeyAlgorithm::HS512 => Some(Algorithm::HS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        _ => None,
    }
}

/// `sub` is a fid, sent either as a number or as a numeric string
#[derive(Deserialize)]
#[serde(untagged)]
enum Subject {
    Number(u64),
    Text(String),
}

#[derive(Deserialize)]
struct Claims {
    sub: Subject,
}

/// Where the issuer's keys are published
struct JwksSource {
    http: reqwest::Client,
    url: String,
}

/// JWT verifier for quick-auth tokens
///
/// Keys published by the issuer are fetched on first use and fetched again
/// whenever a token names a `kid` the cached set does not contain.
pub struct QuickAuthVerifier {
    keys: RwLock<Vec<SigningKey>>,
    source: Option<JwksSource>,
    issuer: String,
    audience: String,
}

impl QuickAuthVerifier {
    /// Creates a verifier over a fixed key set
    ///
    /// # Arguments
    /// * `keys` - Issuer keys; when a token carries no `kid` the key set
    ///   must contain exactly one key
    /// * `issuer` - Expected `iss` claim
    /// * `audience` - Expected `aud` claim (the app's domain)
    pub fn new(keys: Vec<SigningKey>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys: RwLock::new(keys),
            source: None,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Creates a verifier that loads the issuer's JWKS from
    /// `config.jwks_url` when it is first needed
    pub fn with_jwks(config: &AuthConfig, audience: impl Into<String>) -> Self {
        Self {
            keys: RwLock::new(Vec::new()),
            source: Some(JwksSource {
                http: reqwest::Client::new(),
                url: config.jwks_url.clone(),
            }),
            issuer: config.issuer.clone(),
            audience: audience.into(),
        }
    }

    /// Replace the cached keys with the issuer's current JWKS
    ///
    /// A verifier built over a fixed key set keeps its keys.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let Some(source) = &self.source else {
            return Ok(());
        };

        info!("Fetching quick-auth signing keys from {}", source.url);
        let set: JwkSet = source
            .http
            .get(&source.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = Vec::new();
        for jwk in &set.keys {
            keys.extend(SigningKey::from_jwk(jwk)?);
        }
        info!("Loaded {} signing keys", keys.len());

        *self.keys.write().await = keys;
        Ok(())
    }

    async fn key_for(&self, kid: Option<&str>) -> Result<SigningKey, AuthError> {
        if let Ok(key) = select_key(&self.keys.read().await, kid) {
            return Ok(key);
        }
        if self.source.is_none() {
            return select_key(&self.keys.read().await, kid);
        }

        debug!("Signing key {:?} not cached", kid);
        self.refresh().await?;
        select_key(&self.keys.read().await, kid)
    }
}

fn select_key(keys: &[SigningKey], kid: Option<&str>) -> Result<SigningKey, AuthError> {
    match kid {
        Some(kid) => keys
            .iter()
            .find(|key| key.kid.as_deref() == Some(kid))
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string())),
        None if keys.len() == 1 => Ok(keys[0].clone()),
        None => Err(AuthError::UnknownKey("token has no kid".to_string())),
    }
}

#[async_trait]
impl TokenVerifier for QuickAuthVerifier {
    async fn verify(&self, token: &str) -> Result<u64, AuthError> {
        let header = decode_header(token)?;
        let key = self.key_for(header.kid.as_deref()).await?;

        let mut validation = Validation::new(key.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let claims = decode::<Claims>(token, &key.key, &validation)?.claims;
        let fid = match claims.sub {
            Subject::Number(fid) => fid,
            Subject::Text(text) => text.parse().map_err(|_| AuthError::InvalidSubject)?,
        };
        debug!("Verified token for fid {}", fid);
        Ok(fid)
    }
}
