use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// Which key-value backend holds the roster blob.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    File,
    #[default]
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "redis" => Ok(Self::Redis),
            other => Err(anyhow!("unknown store backend `{other}` (expected memory|file|redis)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub redis_url: String,
    #[serde(default = "default_file_path")]
    pub file_path: String,
    #[serde(default = "default_roster_key")]
    pub roster_key: String,
    /// Hold a process-wide lock across each bulk insert and clear.
    #[serde(default)]
    pub serialize_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            redis_url: String::new(),
            file_path: default_file_path(),
            roster_key: default_roster_key(),
            serialize_writes: false,
        }
    }
}

fn default_file_path() -> String { "data/store.json".into() }
fn default_roster_key() -> String { "customers".into() }
fn default_redis_url() -> String { "redis://127.0.0.1:6379".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a configuration purely from environment variables.
    /// Used when no config file is present.
    pub fn from_env() -> Result<Self> {
        let env = |k: &str| std::env::var(k).ok().filter(|v| !v.trim().is_empty());
        let mut cfg = AppConfig::default();
        if let Some(host) = env("SERVER_HOST") { cfg.server.host = host; }
        if let Some(port) = env("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = env("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok());
        if let Some(backend) = env("STORE_BACKEND") { cfg.store.backend = backend.parse()?; }
        if let Some(path) = env("STORE_FILE_PATH") { cfg.store.file_path = path; }
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.store.normalize_from_env();
        self.store.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }
}

impl StoreConfig {
    pub fn normalize_from_env(&mut self) {
        if self.redis_url.trim().is_empty() {
            self.redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| default_redis_url());
        }
        if self.roster_key.trim().is_empty() {
            self.roster_key = default_roster_key();
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend {
            StoreBackend::Redis => {
                let lower = self.redis_url.to_lowercase();
                if !(lower.starts_with("redis://") || lower.starts_with("rediss://")) {
                    return Err(anyhow!("store.redis_url must start with redis:// or rediss://"));
                }
            }
            StoreBackend::File => {
                if self.file_path.trim().is_empty() {
                    return Err(anyhow!("store.file_path is empty; required by the file backend"));
                }
            }
            StoreBackend::Memory => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 2

            [store]
            backend = "file"
            file_path = "target/roster.json"
            roster_key = "roster"
            serialize_writes = true
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(2));
        assert_eq!(cfg.store.backend, StoreBackend::File);
        assert_eq!(cfg.store.roster_key, "roster");
        assert!(cfg.store.serialize_writes);
        Ok(())
    }

    #[test]
    fn missing_store_section_uses_defaults() -> Result<()> {
        let cfg = parse("[server]\nhost = \"\"\nport = 8081\n")?;
        assert_eq!(cfg.store.backend, StoreBackend::Redis);
        assert_eq!(cfg.store.roster_key, "customers");
        assert!(!cfg.store.serialize_writes);
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());

        let mut store = StoreConfig { redis_url: "http://localhost".into(), ..StoreConfig::default() };
        assert!(store.validate().is_err());
        store.backend = StoreBackend::File;
        store.file_path = " ".into();
        assert!(store.validate().is_err());
    }

    #[test]
    fn normalizes_blank_fields() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.server.host = "  ".into();
        cfg.server.worker_threads = Some(0);
        cfg.store.redis_url = "redis://cache:6379".into();
        cfg.store.roster_key = String::new();
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.store.roster_key, "customers");
        assert_eq!(cfg.store.redis_url, "redis://cache:6379");
        Ok(())
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("Memory".parse::<StoreBackend>().ok(), Some(StoreBackend::Memory));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }
}
