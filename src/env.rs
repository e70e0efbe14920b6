//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量读取，作为配置文件与命令行参数之间的一层覆盖

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 未设置时返回 `None`，设置但无效时返回错误
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "LOCAL_IMAGES_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }

    /// 复用已下载的资源
    pub struct UseExisting;
    impl EnvVar<bool> for UseExisting {
        const NAME: &'static str = "LOCAL_IMAGES_USE_EXISTING";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str =
            "Re-use assets already present in the asset directory instead of downloading again";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 网络相关环境变量
pub mod network {
    use super::*;

    /// 单个资源下载的超时时间（秒）
    pub struct Timeout;
    impl EnvVar<u64> for Timeout {
        const NAME: &'static str = "LOCAL_IMAGES_TIMEOUT";
        const DEFAULT: Option<u64> = Some(crate::core::DEFAULT_TIMEOUT_SECS);
        const DESCRIPTION: &'static str = "Per-resource download timeout in seconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_bounded_u64(value, Self::NAME, 1, 3600)
        }
    }

    /// 下载时使用的 User-Agent
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "LOCAL_IMAGES_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "User-Agent header sent with image downloads";

        fn parse(value: &str) -> EnvResult<String> {
            let user_agent = value.trim();
            if user_agent.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "User-Agent cannot be empty".to_string(),
                });
            }
            Ok(user_agent.to_string())
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_bounded_u64(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<u64> {
    let num: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// `--help` 末尾的环境变量说明
pub fn help_text() -> String {
    let variables = [
        (core::LogLevel::NAME, core::LogLevel::DESCRIPTION),
        (core::NoColor::NAME, core::NoColor::DESCRIPTION),
        (core::UseExisting::NAME, core::UseExisting::DESCRIPTION),
        (network::Timeout::NAME, network::Timeout::DESCRIPTION),
        (network::UserAgent::NAME, network::UserAgent::DESCRIPTION),
    ];

    let mut text = String::from("Environment variables:");
    for (name, description) in variables {
        text.push_str(&format!("\n  {name:<28}{description}"));
    }
    text
}

/// 环境变量配置汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub log_level: String,
    pub no_color: bool,
    pub use_existing: Option<bool>,
    pub timeout: Option<u64>,
    pub user_agent: Option<String>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,
            no_color: core::NoColor::get()?,
            use_existing: core::UseExisting::get_optional()?,
            timeout: network::Timeout::get_optional()?,
            user_agent: network::UserAgent::get_optional()?,
        })
    }
}
