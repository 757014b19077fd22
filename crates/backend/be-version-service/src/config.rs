use std::{collections::HashSet, net::SocketAddr, time::Duration};

use crate::error::VersionServiceError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DOWNLOAD_DOMAIN: &str = "https://songscribe.himadri.eu/download";
pub const DEFAULT_PLATFORMS: &[&str] = &["mac", "windows"];
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// One row of the platform table shared by the fetcher and the index handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSpec {
    pub id: String,
    /// Descriptor path under the download domain
    pub descriptor_file: String,
}

impl PlatformSpec {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let descriptor_file = format!("version-{id}.json");
        Self {
            id,
            descriptor_file,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VersionServiceConfig {
    pub port: u16,
    pub download_domain: String,
    pub platforms: Vec<PlatformSpec>,
    pub fetch_timeout: Duration,
}

impl Default for VersionServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            download_domain: DEFAULT_DOWNLOAD_DOMAIN.to_string(),
            platforms: DEFAULT_PLATFORMS
                .iter()
                .map(|id| PlatformSpec::new(*id))
                .collect(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl VersionServiceConfig {
    pub fn from_env() -> Result<Self, VersionServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, VersionServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                VersionServiceError::Config(format!("PORT '{raw}' is not a valid port: {e}"))
            })?,
            None => DEFAULT_PORT,
        };

        let download_domain = get("DOWNLOAD_DOMAIN")
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_DOMAIN.to_string());
        if download_domain.is_empty() {
            return Err(VersionServiceError::Config(
                "DOWNLOAD_DOMAIN must not be '/'".into(),
            ));
        }

        let platforms = match get("VERSION_PLATFORMS") {
            Some(raw) => parse_platforms(&raw)?,
            None => DEFAULT_PLATFORMS
                .iter()
                .map(|id| PlatformSpec::new(*id))
                .collect(),
        };

        let fetch_timeout = match get("VERSION_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    VersionServiceError::Config(format!(
                        "VERSION_FETCH_TIMEOUT_SECS '{raw}' is not a number of seconds: {e}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            download_domain,
            platforms,
            fetch_timeout,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parse_platforms(raw: &str) -> Result<Vec<PlatformSpec>, VersionServiceError> {
    let mut seen = HashSet::new();
    let mut platforms = Vec::new();

    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !seen.insert(id) {
            return Err(VersionServiceError::Config(format!(
                "VERSION_PLATFORMS lists '{id}' more than once"
            )));
        }
        platforms.push(PlatformSpec::new(id));
    }

    if platforms.is_empty() {
        return Err(VersionServiceError::Config(
            "VERSION_PLATFORMS must name at least one platform".into(),
        ));
    }

    Ok(platforms)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = VersionServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.download_domain, DEFAULT_DOWNLOAD_DOMAIN);
        assert_eq!(
            config.platforms,
            vec![PlatformSpec::new("mac"), PlatformSpec::new("windows")]
        );
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let config = VersionServiceConfig::from_lookup(lookup(&[("PORT", "")])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn reads_port() {
        let config = VersionServiceConfig::from_lookup(lookup(&[("PORT", "3000")])).unwrap();
        assert_eq!(config.bind_addr().port(), 3000);
    }

    #[test]
    fn rejects_invalid_port() {
        let err = VersionServiceConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, VersionServiceError::Config(_)));
    }

    #[test]
    fn strips_trailing_slash_from_domain() {
        let config = VersionServiceConfig::from_lookup(lookup(&[(
            "DOWNLOAD_DOMAIN",
            "https://x/download/",
        )]))
        .unwrap();
        assert_eq!(config.download_domain, "https://x/download");
    }

    #[test]
    fn parses_platform_list() {
        let config = VersionServiceConfig::from_lookup(lookup(&[(
            "VERSION_PLATFORMS",
            " mac , linux,, windows ",
        )]))
        .unwrap();
        let ids: Vec<&str> = config.platforms.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mac", "linux", "windows"]);
        assert_eq!(config.platforms[1].descriptor_file, "version-linux.json");
    }

    #[test]
    fn rejects_duplicate_platforms() {
        let err = VersionServiceConfig::from_lookup(lookup(&[("VERSION_PLATFORMS", "mac,mac")]))
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn rejects_platform_list_without_ids() {
        let err = VersionServiceConfig::from_lookup(lookup(&[("VERSION_PLATFORMS", " , ,")]))
            .unwrap_err();
        assert!(matches!(err, VersionServiceError::Config(_)));
    }

    #[test]
    fn reads_fetch_timeout() {
        let config = VersionServiceConfig::from_lookup(lookup(&[(
            "VERSION_FETCH_TIMEOUT_SECS",
            "5",
        )]))
        .unwrap();
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
    }
}
