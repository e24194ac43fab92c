use std::sync::{Arc, RwLock};

use reqwest::Url;

use crate::error::ConfigError;

/// Where the storage service lives. Read again on every request so that a
/// re-pointed origin is picked up by the next transfer.
pub trait Location: Send + Sync {
    fn protocol(&self) -> String;
    fn host(&self) -> String;
}

/// Parse an origin such as `http://files.example:8080`. Any path, query or
/// fragment is ignored.
pub fn parse_origin(origin: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(origin).map_err(|e| ConfigError::InvalidOrigin {
        origin: origin.to_owned(),
        reason: e.to_string(),
    })?;

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidOrigin {
            origin: origin.to_owned(),
            reason: "origin has no host".to_owned(),
        });
    }

    Ok(url)
}

fn host_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_owned(),
    }
}

#[derive(Clone, Debug)]
pub struct StaticLocation {
    origin: Url,
}

impl StaticLocation {
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        Ok(StaticLocation {
            origin: parse_origin(origin)?,
        })
    }
}

impl Location for StaticLocation {
    fn protocol(&self) -> String {
        self.origin.scheme().to_owned()
    }

    fn host(&self) -> String {
        host_of(&self.origin)
    }
}

/// An origin that can be changed while transfers are running.
#[derive(Clone, Debug)]
pub struct SharedLocation {
    origin: Arc<RwLock<Url>>,
}

impl SharedLocation {
    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        Ok(SharedLocation {
            origin: Arc::new(RwLock::new(parse_origin(origin)?)),
        })
    }

    pub fn navigate(&self, origin: &str) -> Result<(), ConfigError> {
        let url = parse_origin(origin)?;
        let mut current = self.origin.write().unwrap_or_else(|e| e.into_inner());
        tracing::debug!(from = %current, to = %url, "origin changed");
        *current = url;
        Ok(())
    }

    fn current(&self) -> Url {
        self.origin
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Location for SharedLocation {
    fn protocol(&self) -> String {
        self.current().scheme().to_owned()
    }

    fn host(&self) -> String {
        host_of(&self.current())
    }
}

/// `<scheme>://<host>/` for the current location.
pub fn resolve(location: &dyn Location) -> String {
    format!("{}://{}/", location.protocol(), location.host())
}

pub fn request_url(location: &dyn Location, path: &str) -> String {
    format!("{}{}", resolve(location), path)
}

#[cfg(test)]
mod test {
    use super::{request_url, resolve, SharedLocation, StaticLocation};

    #[test]
    fn should_resolve_scheme_and_host() {
        let location = StaticLocation::new("http://files.example").unwrap();
        assert_eq!(resolve(&location), "http://files.example/");
    }

    #[test]
    fn should_keep_non_default_port_and_drop_path() {
        let location = StaticLocation::new("https://files.example:8443/some/page?x=1").unwrap();
        assert_eq!(resolve(&location), "https://files.example:8443/");
        assert_eq!(
            request_url(&location, "abc123/notes.txt"),
            "https://files.example:8443/abc123/notes.txt"
        );
    }

    #[test]
    fn should_not_cache_base_across_navigation() {
        let location = SharedLocation::new("http://first.example").unwrap();
        let before = resolve(&location);

        location.navigate("http://second.example:8080").unwrap();
        let after = resolve(&location);

        assert_eq!(before, "http://first.example/");
        assert_eq!(after, "http://second.example:8080/");
    }

    #[test]
    fn should_reject_origin_without_host() {
        assert!(StaticLocation::new("not a url").is_err());
        assert!(SharedLocation::new("mailto:someone@example.com").is_err());
    }

    #[test]
    fn failed_navigation_keeps_previous_origin() {
        let location = SharedLocation::new("http://first.example").unwrap();
        assert!(location.navigate("::").is_err());
        assert_eq!(resolve(&location), "http://first.example/");
    }
}
