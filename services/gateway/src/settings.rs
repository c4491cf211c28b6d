use config::{Config, ConfigError, Environment, File};
use relay_llm::{CompletionConfig, TemplateConfig};
use relay_mail::MailConfig;
use serde::Deserialize;

/// 默认配置文件（不带扩展名，存在 relay.toml 时才加载）
pub const DEFAULT_CONFIG_PATH: &str = "config/relay";
const ENV_PREFIX: &str = "RELAY";
/// 托管平台 (Railway 等) 注入端口用的变量
const PORT_VAR: &str = "PORT";

/// --- 服务总配置 ---
/// 来源优先级：环境变量 RELAY_* > config/relay.toml > 代码默认值
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service_name: String,
    pub server: ServerSettings,
    pub completion: CompletionConfig,
    pub mail: MailConfig,
    pub templates: TemplateConfig,
    pub cors: CorsSettings,
    pub logging: LoggingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_name: "AI Runner 2033 Prompt Optimizer".to_string(),
            server: ServerSettings::default(),
            completion: CompletionConfig::default(),
            mail: MailConfig::default(),
            templates: TemplateConfig::default(),
            cors: CorsSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// 请求体大小上限
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// 跨域白名单，只有列出的 Origin 会被回写到响应头
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        let origins = [
            "http://localhost:3000",
            "http://localhost:5173",
            "http://localhost:8000",
            "http://localhost:8080",
            "http://127.0.0.1:3000",
            "http://127.0.0.1:5173",
            "http://127.0.0.1:8000",
            "http://127.0.0.1:8080",
            "https://brainybear.ai",
            "https://www.brainybear.ai",
            "https://airunner2033.com",
            "https://www.airunner2033.com",
        ];
        Self {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// 日志输出：控制台 + 按天滚动的文件
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志目录
    pub dir: String,
    /// 文件名前缀，实际文件为 `<file_name>.YYYY-MM-DD`
    pub file_name: String,
    /// 未设置 RUST_LOG 时使用的过滤规则
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            file_name: "relay.log".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// 从指定配置文件 + 环境变量加载
    ///
    /// 环境变量示例：RELAY_SERVER__PORT=9000, RELAY_CORS__ALLOWED_ORIGINS=https://a.com,https://b.com
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_with(path, ENV_PREFIX, PORT_VAR)
    }

    fn load_with(path: &str, env_prefix: &str, port_var: &str) -> Result<Self, ConfigError> {
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        // PORT 优先级最高
        if let Some(port) = std::env::var(port_var).ok().and_then(|p| p.parse().ok()) {
            settings.server.port = port;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = Settings::load_from("config/definitely-not-here").unwrap();
        assert_eq!(settings.completion.model, "llama-3.1-8b-instant");
        assert_eq!(settings.completion.api_key_env, "GROQ_API_KEY");
        assert_eq!(settings.mail.api_key_env, "BREVO_API_KEY");
        assert!(settings.templates.dir.is_none());
        assert_eq!(settings.logging.dir, "logs");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn env_vars_override_file_and_defaults() {
        // 独立的前缀和端口变量，不会影响同一进程里的其它测试
        let prefix = "RELAYSETTINGSTEST";
        let port_var = "SETTINGS_TEST_PLATFORM_PORT";
        let vars = [
            ("RELAYSETTINGSTEST_CORS__ALLOWED_ORIGINS", "https://a.com,https://b.com"),
            ("RELAYSETTINGSTEST_SERVER__BODY_LIMIT_BYTES", "2048"),
            ("RELAYSETTINGSTEST_SERVER__PORT", "9000"),
            ("RELAYSETTINGSTEST_COMPLETION__MODEL", "llama-3.3-70b-versatile"),
            ("RELAYSETTINGSTEST_LOGGING__DIR", "/var/log/relay"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let from_prefix = Settings::load_with("config/definitely-not-here", prefix, port_var);

        std::env::set_var(port_var, "9123");
        let with_port = Settings::load_with("config/definitely-not-here", prefix, port_var);

        std::env::remove_var(port_var);
        for (key, _) in vars {
            std::env::remove_var(key);
        }

        let settings = from_prefix.unwrap();
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["https://a.com".to_string(), "https://b.com".to_string()]
        );
        assert_eq!(settings.server.body_limit_bytes, 2048);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(settings.logging.dir, "/var/log/relay");
        // 未设置的字段保持默认
        assert_eq!(settings.server.host, "0.0.0.0");

        // 平台注入的端口覆盖 RELAY_SERVER__PORT
        assert_eq!(with_port.unwrap().server.port, 9123);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = std::env::temp_dir().join(format!("relay-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("relay.toml");
        std::fs::write(
            &file,
            r#"
service_name = "Staging Relay"

[completion]
model = "llama-3.3-70b-versatile"
max_tokens = 512

[templates]
dir = "/srv/templates"
"#,
        )
        .unwrap();

        let base = dir.join("relay");
        let settings = Settings::load_from(base.to_str().unwrap()).unwrap();
        assert_eq!(settings.service_name, "Staging Relay");
        assert_eq!(settings.completion.model, "llama-3.3-70b-versatile");
        assert_eq!(settings.completion.max_tokens, Some(512));
        // 未覆盖的字段保持默认
        assert_eq!(settings.completion.temperature, 0.7);
        assert_eq!(settings.templates.dir.as_deref(), Some("/srv/templates"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
