//! Dialect selection by connection URL.
//!
//! Providers declare the subprotocols they serve (the `oracle` in
//! `jdbc:oracle:thin:@host:1521/svc`). The registry scores every provider
//! against a URL and creates the dialect of the best one; the generic
//! provider always answers with a low score so there is a fallback.

use std::fmt;

use tracing::{info, warn};

use crate::config::DialectConfig;
use crate::dialect::{generic, DatabaseDialect, GenericDialect};
use crate::error::{DialectError, Result};

/// Score of a provider that cannot serve a URL.
pub const NO_MATCH: u32 = 0;
/// Score of the generic fallback.
pub const GENERIC_MATCH: u32 = 10;
/// Score of a provider that can serve a URL but is not specific to it.
pub const AVERAGE_MATCH: u32 = 50;
/// Score of a provider whose subprotocol matches exactly.
pub const PREFERRED_MATCH: u32 = 100;

/// The parts of a connection URL used for dialect selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JdbcUrlInfo {
    /// Subprotocol, lower-cased.
    pub subprotocol: String,
    /// Everything after the subprotocol.
    pub subname: String,
    /// The URL with credentials masked.
    pub sanitized: String,
}

impl JdbcUrlInfo {
    /// Parses `[jdbc:]<subprotocol>:<subname>`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidUrl`] when no subprotocol is present.
    pub fn parse(url: &str) -> Result<Self> {
        let sanitized = generic::sanitize_url(url);
        let rest = url
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("jdbc:"))
            .map_or(url, |_| &url[5..]);
        let (subprotocol, subname) = rest
            .split_once(':')
            .filter(|(subprotocol, _)| !subprotocol.is_empty())
            .ok_or_else(|| DialectError::InvalidUrl(sanitized.clone()))?;
        Ok(Self {
            subprotocol: subprotocol.to_ascii_lowercase(),
            subname: subname.to_string(),
            sanitized,
        })
    }
}

/// Creates dialect instances for the subprotocols it serves.
pub trait DialectProvider: Send + Sync {
    /// Provider (and dialect) name.
    fn name(&self) -> &'static str;

    /// Subprotocols served, lower-case.
    fn subprotocols(&self) -> &'static [&'static str];

    /// Creates a dialect instance.
    fn create(&self, config: DialectConfig) -> DatabaseDialect;

    /// Scores how well this provider serves `url`.
    fn score(&self, url: &JdbcUrlInfo) -> u32 {
        if self.subprotocols().contains(&url.subprotocol.as_str()) {
            PREFERRED_MATCH
        } else {
            NO_MATCH
        }
    }
}

/// Provider of the generic dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericProvider;

impl DialectProvider for GenericProvider {
    fn name(&self) -> &'static str {
        GenericDialect::PROFILE.name
    }

    fn subprotocols(&self) -> &'static [&'static str] {
        &[]
    }

    fn create(&self, config: DialectConfig) -> DatabaseDialect {
        GenericDialect::create(config)
    }

    fn score(&self, _url: &JdbcUrlInfo) -> u32 {
        GENERIC_MATCH
    }
}

/// Registered dialect providers.
pub struct DialectRegistry {
    providers: Vec<Box<dyn DialectProvider>>,
}

impl DialectRegistry {
    /// Creates a registry holding only the generic provider.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: vec![Box::new(GenericProvider)],
        }
    }

    /// Adds a provider.
    pub fn register(&mut self, provider: impl DialectProvider + 'static) -> &mut Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Returns the registered provider names in registration order.
    pub fn provider_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.iter().map(|p| p.name())
    }

    /// Creates the dialect best suited to `url`.
    ///
    /// Ties go to the provider registered first.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::InvalidUrl`] for URLs without a subprotocol.
    pub fn find_best_for(&self, url: &str, config: DialectConfig) -> Result<DatabaseDialect> {
        let info = JdbcUrlInfo::parse(url)?;
        let mut best: Option<(&dyn DialectProvider, u32)> = None;
        for provider in &self.providers {
            let score = provider.score(&info);
            if score > best.map_or(NO_MATCH, |(_, s)| s) {
                best = Some((provider.as_ref(), score));
            }
        }
        let (provider, score) =
            best.ok_or_else(|| DialectError::UnknownDialect(info.subprotocol.clone()))?;

        if score <= GENERIC_MATCH {
            warn!(
                subprotocol = %info.subprotocol,
                dialect = provider.name(),
                "No dialect registered for subprotocol, falling back"
            );
        }
        info!(url = %info.sanitized, dialect = provider.name(), score, "Selected dialect");
        Ok(provider.create(config))
    }

    /// Creates a dialect by provider name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownDialect`] when no provider has `name`.
    pub fn create(&self, name: &str, config: DialectConfig) -> Result<DatabaseDialect> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .map(|p| p.create(config))
            .ok_or_else(|| DialectError::UnknownDialect(name.to_string()))
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("providers", &self.provider_names().collect::<Vec<_>>())
            .finish()
    }
}
