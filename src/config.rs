use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "SHUAKE_CONFIG";
/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// 登录页面选择器
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoginSelectors {
    pub username: String,
    pub password: String,
    pub submit: String,
    /// 仅在登录成功后出现的元素
    pub logged_in: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            username: "input[name='username']".to_string(),
            password: "input[type='password']".to_string(),
            submit: "button[type='submit']".to_string(),
            logged_in: ".user-info".to_string(),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 账号 ---
    pub username: String,
    pub password: String,
    /// 登录最多尝试次数
    pub login_retry_count: u32,
    pub login_retry_delay_secs: u64,
    /// 点击登录后等待页面跳转的时间
    pub login_settle_secs: u64,

    // --- 学习策略 ---
    /// 两门课程之间的等待间隔
    pub course_interval_secs: u64,
    /// 目标学时
    pub target_hours: f64,
    /// 达到目标后退出前的停顿
    pub completion_delay_secs: u64,
    pub video_poll_secs: u64,
    pub video_wait_secs: u64,
    /// 单门课程最长观看时间
    pub max_course_minutes: u64,

    // --- 浏览器 ---
    /// 设置后连接已打开的浏览器，否则启动新浏览器
    pub browser_debug_port: Option<u16>,
    pub chrome_executable: Option<String>,
    pub headless: bool,

    // --- 门户与接口 ---
    pub portal_url: String,
    pub login_url: String,
    pub api_base_url: String,
    pub study_hours_path: String,
    pub subjects_path: String,
    /// 含 `{subject_id}` 占位符
    pub courses_path: String,
    /// 含 `{course_id}` 与 `{subject_id}` 占位符
    pub course_url_template: String,
    pub selectors: LoginSelectors,
    pub video_selector: String,

    // --- 日志 ---
    pub verbose_logging: bool,
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            login_retry_count: 3,
            login_retry_delay_secs: 5,
            login_settle_secs: 3,
            course_interval_secs: 10,
            target_hours: 90.0,
            completion_delay_secs: 3,
            video_poll_secs: 15,
            video_wait_secs: 30,
            max_course_minutes: 120,
            browser_debug_port: None,
            chrome_executable: None,
            headless: false,
            portal_url: "https://www.dtdjzx.gov.cn".to_string(),
            login_url: "https://www.dtdjzx.gov.cn/member/login".to_string(),
            api_base_url: "https://www.dtdjzx.gov.cn".to_string(),
            study_hours_path: "/api/study/hours".to_string(),
            subjects_path: "/api/study/subjects".to_string(),
            courses_path: "/api/study/subjects/{subject_id}/courses".to_string(),
            course_url_template:
                "https://www.dtdjzx.gov.cn/course/play?courseId={course_id}&subjectId={subject_id}"
                    .to_string(),
            selectors: LoginSelectors::default(),
            video_selector: "video".to_string(),
            verbose_logging: false,
            output_log_file: "shuake.log".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（若存在）→ 环境变量，最后校验
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取，未写出的字段取默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用默认值叠加环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("SHUAKE_USERNAME") {
            self.username = v;
        }
        if let Some(v) = lookup("SHUAKE_PASSWORD") {
            self.password = v;
        }
        if let Some(v) = parse_var::<u32>(&lookup, "LOGIN_RETRY_COUNT", "u32")? {
            self.login_retry_count = v;
        }
        if let Some(v) = parse_var::<u64>(&lookup, "COURSE_INTERVAL_SECS", "u64")? {
            self.course_interval_secs = v;
        }
        if let Some(v) = parse_var::<f64>(&lookup, "TARGET_HOURS", "f64")? {
            self.target_hours = v;
        }
        if let Some(v) = parse_var::<u16>(&lookup, "BROWSER_DEBUG_PORT", "u16")? {
            self.browser_debug_port = Some(v);
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Some(v) = parse_var::<bool>(&lookup, "HEADLESS", "bool")? {
            self.headless = v;
        }
        if let Some(v) = lookup("PORTAL_URL") {
            self.portal_url = v;
        }
        if let Some(v) = lookup("LOGIN_URL") {
            self.login_url = v;
        }
        if let Some(v) = lookup("API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = parse_var::<bool>(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = lookup("OUTPUT_LOG_FILE") {
            self.output_log_file = v;
        }
        Ok(self)
    }

    /// 校验必填项与取值范围
    ///
    /// 连接已打开的浏览器时（设置了 `browser_debug_port`），用户可能已经登录，
    /// 账号密码可以留空；启动新浏览器时必须提供。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.requires_credentials() {
            if self.username.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "username".to_string(),
                });
            }
            if self.password.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "password".to_string(),
                });
            }
        }
        if !self.target_hours.is_finite() || self.target_hours <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "target_hours".to_string(),
                reason: format!("必须为正数，当前为 {}", self.target_hours),
            });
        }
        Ok(())
    }

    /// 是否必须提供账号密码
    pub fn requires_credentials(&self) -> bool {
        self.browser_debug_port.is_none()
    }

    pub fn course_interval(&self) -> Duration {
        Duration::from_secs(self.course_interval_secs)
    }

    pub fn completion_delay(&self) -> Duration {
        Duration::from_secs(self.completion_delay_secs)
    }

    pub fn login_retry_delay(&self) -> Duration {
        Duration::from_secs(self.login_retry_delay_secs)
    }

    pub fn login_settle(&self) -> Duration {
        Duration::from_secs(self.login_settle_secs)
    }

    pub fn video_poll_interval(&self) -> Duration {
        Duration::from_secs(self.video_poll_secs)
    }

    pub fn video_wait(&self) -> Duration {
        Duration::from_secs(self.video_wait_secs)
    }

    pub fn max_course_duration(&self) -> Duration {
        Duration::from_secs(self.max_course_minutes * 60)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
