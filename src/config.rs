use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;

/// Well-known configuration file read by the loader binary
pub const DEFAULT_CONFIG_PATH: &str = "dwh.cfg";

/// Environment variables that override values from the configuration file
pub const ENV_OVERRIDES: [&str; 6] = [
    "DWH_HOST",
    "DWH_DB_NAME",
    "DWH_DB_USER",
    "DWH_DB_PASSWORD",
    "DWH_DB_PORT",
    "DWH_IAM_ROLE_ARN",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(alias = "CLUSTER", default)]
    pub cluster: ClusterConfig,
    #[serde(alias = "IAM_ROLE", default)]
    pub iam_role: IamRoleConfig,
    #[serde(alias = "S3", default)]
    pub s3: S3Config,
    pub logging: LoggingConfig,
}

// Every field may be absent from the file; `Config::validate` rejects
// whatever is still empty once environment overrides are applied.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    #[serde(alias = "HOST")]
    pub host: String,
    #[serde(alias = "DB_NAME")]
    pub db_name: String,
    #[serde(alias = "DB_USER")]
    pub db_user: String,
    #[serde(alias = "DB_PASSWORD")]
    pub db_password: String,
    #[serde(alias = "DB_PORT")]
    pub db_port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IamRoleConfig {
    #[serde(alias = "ARN")]
    pub arn: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct S3Config {
    #[serde(alias = "LOG_DATA")]
    pub log_data: String,
    #[serde(alias = "LOG_JSONPATH")]
    pub log_jsonpath: String,
    #[serde(alias = "SONG_DATA")]
    pub song_data: String,
    #[serde(alias = "REGION")]
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            db_name: String::new(),
            db_user: String::new(),
            db_password: String::new(),
            db_port: 5439,
        }
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            log_data: String::new(),
            log_jsonpath: String::new(),
            song_data: String::new(),
            region: "us-west-2".to_string(),
        }
    }
}

// Keep the password out of logs
impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("host", &self.host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("db_port", &self.db_port)
            .finish()
    }
}

impl Config {
    /// Load the INI configuration at `path`, then apply `DWH_*` environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let path = path.as_ref();

        // Try to load from .env file
        let _ = dotenv::dotenv();

        let mut builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Ini,
            ));

        if let Ok(log_level) = env::var("RUST_LOG") {
            builder = builder.set_override("logging.level", log_level)?;
        }

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.normalize();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Placeholder values for the statement catalog, escaped for use inside SQL string literals
    pub fn catalog_params(&self) -> HashMap<String, String> {
        [
            ("log_data", &self.s3.log_data),
            ("log_jsonpath", &self.s3.log_jsonpath),
            ("song_data", &self.s3.song_data),
            ("region", &self.s3.region),
            ("iam_role_arn", &self.iam_role.arn),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.replace('\'', "''")))
        .collect()
    }

    fn normalize(&mut self) {
        for value in [
            &mut self.cluster.host,
            &mut self.cluster.db_name,
            &mut self.cluster.db_user,
            &mut self.cluster.db_password,
            &mut self.iam_role.arn,
            &mut self.s3.log_data,
            &mut self.s3.log_jsonpath,
            &mut self.s3.song_data,
            &mut self.s3.region,
        ] {
            *value = unquote(value).to_string();
        }
    }

    // INI section casing varies between files, so overrides go onto the
    // deserialized struct rather than through builder keys.
    fn apply_env_overrides(&mut self) -> Result<(), config::ConfigError> {
        if let Ok(host) = env::var("DWH_HOST") {
            self.cluster.host = host;
        }

        if let Ok(db_name) = env::var("DWH_DB_NAME") {
            self.cluster.db_name = db_name;
        }

        if let Ok(db_user) = env::var("DWH_DB_USER") {
            self.cluster.db_user = db_user;
        }

        if let Ok(db_password) = env::var("DWH_DB_PASSWORD") {
            self.cluster.db_password = db_password;
        }

        if let Ok(port) = env::var("DWH_DB_PORT") {
            self.cluster.db_port = port.parse::<u16>().map_err(|e| {
                config::ConfigError::Message(format!("Invalid DWH_DB_PORT '{}': {}", port, e))
            })?;
        }

        if let Ok(arn) = env::var("DWH_IAM_ROLE_ARN") {
            self.iam_role.arn = arn;
        }

        Ok(())
    }

    /// The password may legitimately be empty; everything else is required
    fn validate(&self) -> Result<(), config::ConfigError> {
        let required = [
            ("CLUSTER.host", &self.cluster.host),
            ("CLUSTER.db_name", &self.cluster.db_name),
            ("CLUSTER.db_user", &self.cluster.db_user),
            ("IAM_ROLE.arn", &self.iam_role.arn),
            ("S3.log_data", &self.s3.log_data),
            ("S3.log_jsonpath", &self.s3.log_jsonpath),
            ("S3.song_data", &self.s3.song_data),
            ("S3.region", &self.s3.region),
        ];

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((key, _)) => Err(config::ConfigError::NotFound(key.to_string())),
            None => Ok(()),
        }
    }
}

fn unquote(value: &str) -> &str {
    let trimmed = value.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}
