//! Process configuration read from the environment

use anyhow::{bail, Context, Result};
use std::{env, path::Path, time::Duration};

use crate::notifier::postmark::POSTMARK_API_BASE;

/// Runtime settings. Built once at startup.
#[derive(Clone)]
pub struct Config {
    pub db_path: String,
    pub postmark_key: String,
    pub platform_email: String,
    pub postmark_api_url: String,
    pub private_key_pem: String,
    pub public_key_pem: String,
    pub port: u16,
    pub op_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let db_path = get("DB_PATH").or_else(|| get("DB_URI")).unwrap_or_else(|| {
            let name = get("DB_NAME").unwrap_or_else(|| "waitlist".to_string());
            format!("{}.db", name)
        });

        let private_key_pem = get("RSA_PRIVATE_KEY")
            .map(|v| unescape_pem(&v))
            .context("RSA_PRIVATE_KEY is not set")?;
        let public_key_pem = get("RSA_PUBLIC_KEY")
            .map(|v| unescape_pem(&v))
            .context("RSA_PUBLIC_KEY is not set")?;

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .trim_start_matches(':')
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", v))?,
            None => 8080,
        };

        let op_timeout_secs = match get("OP_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid OP_TIMEOUT_SECS: {}", v))?,
            None => 10,
        };
        if op_timeout_secs == 0 {
            bail!("OP_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            db_path,
            postmark_key: get("POSTMARK_KEY").unwrap_or_default(),
            platform_email: get("PLATFORM_EMAIL").unwrap_or_default(),
            postmark_api_url: get("POSTMARK_API_URL")
                .unwrap_or_else(|| POSTMARK_API_BASE.to_string()),
            private_key_pem,
            public_key_pem,
            port,
            op_timeout: Duration::from_secs(op_timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &self.db_path)
            .field("platform_email", &self.platform_email)
            .field("postmark_api_url", &self.postmark_api_url)
            .field("postmark_key_set", &!self.postmark_key.is_empty())
            .field("port", &self.port)
            .field("op_timeout", &self.op_timeout)
            .finish()
    }
}

/// PEM text pasted into a single-line env var usually carries literal `\n`
fn unescape_pem(raw: &str) -> String {
    raw.replace("\\n", "\n").trim().to_string()
}

/// Load `.env` from the working directory, then from the crate root
pub fn load_env() {
    let _ = dotenv::dotenv();

    let manifest_env = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if manifest_env.exists() {
        let _ = dotenv::from_path(&manifest_env);
    }
}
