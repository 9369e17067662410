use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// Which generation of the Cloudflare API to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiShape {
    /// `/client/v4` REST resources, zone scoped.
    #[default]
    Modern,
    /// `api_json.html` with an `a=` action parameter, domain scoped.
    Legacy,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_config"))]
pub struct Config {
    pub cf_key: Option<String>,
    pub cf_email: Option<String>,
    pub cf_token: Option<String>,

    #[validate(length(min = 1, message = "cf_domain cannot be empty"))]
    pub cf_domain: String,

    /// Empty or absent means the apex record.
    pub cf_subdomain: Option<String>,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub cf_service_mode: Option<bool>,

    #[validate(range(min = 1, message = "cf_ttl must be greater than 0"))]
    pub cf_ttl: Option<u32>,

    #[serde(default)]
    pub quiet: bool,

    #[serde(default)]
    pub aws_use_ec2metadata: bool,

    #[serde(default)]
    pub use_dig: bool,

    #[validate(url(message = "ip_lookup_url must be a valid URL"))]
    pub ip_lookup_url: Option<String>,

    #[validate(length(min = 1, message = "ip_command cannot be empty"))]
    pub ip_command: Option<Vec<String>>,

    #[serde(default)]
    pub api: ApiShape,

    #[validate(url(message = "cf_api_url must be a valid URL"))]
    pub cf_api_url: Option<String>,
}

/// How the updater authenticates against the provider.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    Key { key: String, email: String },
}

// Keep secrets out of debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"<REDACTED>").finish(),
            Self::Key { email, .. } => f
                .debug_struct("Key")
                .field("key", &"<REDACTED>")
                .field("email", email)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpMethod {
    HttpLookup { url: String },
    MetadataService { argv: Vec<String> },
    ExternalCommand { argv: Vec<String> },
}

pub const DEFAULT_IP_LOOKUP_URL: &str = "https://ipv4.icanhazip.com/";

const EC2_METADATA_ARGV: [&str; 2] = ["ec2metadata", "--public-ip"];

const DIG_ARGV: [&str; 4] = [
    "dig",
    "+short",
    "myip.opendns.com",
    "@resolver1.opendns.com",
];

impl Config {
    pub fn subdomain(&self) -> &str {
        self.cf_subdomain.as_deref().unwrap_or_default()
    }

    /// A token wins over key + email when both are present.
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(token) = non_empty(&self.cf_token) {
            return Some(Credentials::Token(token.to_string()));
        }
        match (non_empty(&self.cf_key), non_empty(&self.cf_email)) {
            (Some(key), Some(email)) => Some(Credentials::Key {
                key: key.to_string(),
                email: email.to_string(),
            }),
            _ => None,
        }
    }

    pub fn ip_method(&self) -> IpMethod {
        if self.aws_use_ec2metadata {
            IpMethod::MetadataService {
                argv: EC2_METADATA_ARGV.iter().map(|s| s.to_string()).collect(),
            }
        } else if self.use_dig {
            let argv = self
                .ip_command
                .clone()
                .unwrap_or_else(|| DIG_ARGV.iter().map(|s| s.to_string()).collect());
            IpMethod::ExternalCommand { argv }
        } else {
            IpMethod::HttpLookup {
                url: self
                    .ip_lookup_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_IP_LOOKUP_URL.to_string()),
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn validate_config(config: &Config) -> Result<(), ValidationError> {
    if config.aws_use_ec2metadata && config.use_dig {
        return Err(ValidationError::new("ip_method").with_message(Cow::Borrowed(
            "aws_use_ec2metadata and use_dig are mutually exclusive",
        )));
    }
    if config.ip_command.is_some() && !config.use_dig {
        return Err(ValidationError::new("ip_method").with_message(Cow::Borrowed(
            "ip_command is only used together with use_dig",
        )));
    }
    if config.ip_lookup_url.is_some() && (config.aws_use_ec2metadata || config.use_dig) {
        return Err(ValidationError::new("ip_method").with_message(Cow::Borrowed(
            "ip_lookup_url cannot be combined with aws_use_ec2metadata or use_dig",
        )));
    }

    match (config.credentials(), config.api) {
        (None, _) => Err(ValidationError::new("credentials").with_message(Cow::Borrowed(
            "either cf_token or both cf_key and cf_email are required",
        ))),
        (Some(Credentials::Token(_)), ApiShape::Legacy) => Err(ValidationError::new(
            "credentials",
        )
        .with_message(Cow::Borrowed("the legacy API requires cf_key and cf_email"))),
        _ => Ok(()),
    }
}

/// Accepts `true`/`false`, `0`/`1` and `"0"`/`"1"`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u8),
        Str(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Int(0)) => Ok(Some(false)),
        Some(Flag::Int(1)) => Ok(Some(true)),
        Some(Flag::Str(s)) if s == "0" => Ok(Some(false)),
        Some(Flag::Str(s)) if s == "1" => Ok(Some(true)),
        Some(_) => Err(serde::de::Error::custom(
            "cf_service_mode must be a boolean, 0 or 1",
        )),
    }
}
