//! Vipps Login types.
//!
//! Issuer URLs, scopes and the identity claims returned by Vipps Login, plus
//! construction of the authorization URL users are sent to. Exchanging the
//! authorization code and verifying ID tokens is left to an OpenID Connect
//! library.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::{ConfigurationError, VippsError, VippsResult};
use crate::types::Environment;

/// Issuer URL of the test environment.
pub const ISSUER_URL_TESTING: &str = "https://apitest.vipps.no/access-management-1.0/access/";
/// Issuer URL of the production environment.
pub const ISSUER_URL_PRODUCTION: &str = "https://api.vipps.no/access-management-1.0/access/";

const AUTHORIZATION_PATH: &str = "oauth2/auth";

/// Always requested.
pub const SCOPE_OPENID: &str = "openid";
/// Home address, and work or other addresses when registered.
pub const SCOPE_ADDRESS: &str = "address";
/// BankID verified birth date.
pub const SCOPE_BIRTH_DATE: &str = "birthDate";
/// Verified email address; see `email_verified` in the claims.
pub const SCOPE_EMAIL: &str = "email";
/// Given, middle and family name, verified with the National Population
/// Register.
pub const SCOPE_NAME: &str = "name";
/// The phone number used with Vipps.
pub const SCOPE_PHONE_NUMBER: &str = "phoneNumber";
/// Norwegian national identity number, verified with BankID.
pub const SCOPE_NNIN: &str = "nnin";
pub const SCOPE_ACCOUNT_NUMBERS: &str = "accountNumbers";
/// Selects version 2 of the Login API. Always requested.
pub const SCOPE_API_V2: &str = "api_version_2";

/// Issuer URL for an environment.
pub fn issuer_url(environment: Environment) -> &'static str {
    match environment {
        Environment::Testing => ISSUER_URL_TESTING,
        Environment::Production => ISSUER_URL_PRODUCTION,
    }
}

/// Login client settings.
#[derive(Debug, Clone)]
pub struct LoginConfig {
    pub client_id: String,
    pub redirect_url: String,
    /// Scopes requested in addition to `openid` and `api_version_2`.
    pub scopes: Vec<String>,
    pub issuer_url: String,
}

impl LoginConfig {
    /// Configuration against the test issuer.
    pub fn new(client_id: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_url: redirect_url.into(),
            scopes: Vec::new(),
            issuer_url: ISSUER_URL_TESTING.to_string(),
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.issuer_url = issuer_url(environment).to_string();
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// All requested scopes, `openid` and `api_version_2` first, without
    /// duplicates.
    pub fn requested_scopes(&self) -> Vec<&str> {
        let mut scopes = vec![SCOPE_OPENID, SCOPE_API_V2];
        for scope in &self.scopes {
            if !scopes.contains(&scope.as_str()) {
                scopes.push(scope);
            }
        }
        scopes
    }

    /// URL of the consent page asking for the configured scopes.
    pub fn authorization_url(&self, state: &str) -> VippsResult<String> {
        let issuer = url::Url::parse(&self.issuer_url).map_err(|e| {
            VippsError::Configuration(ConfigurationError::InvalidUrl {
                url: self.issuer_url.clone(),
                message: e.to_string(),
            })
        })?;
        // The issuer ends with '/', so the join keeps its path.
        let mut url = issuer.join(AUTHORIZATION_PATH).map_err(|e| {
            VippsError::Configuration(ConfigurationError::InvalidUrl {
                url: self.issuer_url.clone(),
                message: e.to_string(),
            })
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.requested_scopes().join(" "))
            .append_pair("state", state);

        Ok(url.into())
    }
}

/// A calendar date without time information.
///
/// Parsed from `YYYY-MM-DD`; displayed as `D-M-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date(pub NaiveDate);

impl Date {
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.day(), self.month(), self.year())
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Date)
            .map_err(serde::de::Error::custom)
    }
}

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Address {
    pub country: String,
    #[serde(rename = "street_address")]
    pub street: String,
    /// `home`, `work` or `other`.
    #[serde(rename = "address_type")]
    pub kind: String,
    pub formatted: String,
    #[serde(rename = "postal_code")]
    pub zip: String,
    pub region: String,
}

/// Claims in Vipps ID tokens and userinfo responses. Claims for scopes that
/// were not granted are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Claims {
    /// Stable user identifier.
    #[serde(rename = "sub")]
    pub user_id: String,
    pub address: Address,
    #[serde(rename = "other_address")]
    pub other_addresses: Vec<Address>,
    /// National identity number.
    pub nin: String,
    pub phone_number: String,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    #[serde(rename = "birthdate")]
    pub birth_date: Option<Date>,
    pub email: String,
    pub email_verified: bool,
}
