use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoLookupError {
    Parse(String),
    DatabaseOpen(String),
    Lookup(String),
    Config(String),
    FileOperation(String),
    Metrics(String),
}

impl GeoLookupError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoLookupError::Parse(_) => "E001",
            GeoLookupError::DatabaseOpen(_) => "E002",
            GeoLookupError::Lookup(_) => "E003",
            GeoLookupError::Config(_) => "E004",
            GeoLookupError::FileOperation(_) => "E005",
            GeoLookupError::Metrics(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoLookupError::Parse(_) => "IP Parse Error",
            GeoLookupError::DatabaseOpen(_) => "Database Open Error",
            GeoLookupError::Lookup(_) => "Lookup Error",
            GeoLookupError::Config(_) => "Configuration Error",
            GeoLookupError::FileOperation(_) => "File Operation Error",
            GeoLookupError::Metrics(_) => "Metrics Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoLookupError::Parse(msg) => msg,
            GeoLookupError::DatabaseOpen(msg) => msg,
            GeoLookupError::Lookup(msg) => msg,
            GeoLookupError::Config(msg) => msg,
            GeoLookupError::FileOperation(msg) => msg,
            GeoLookupError::Metrics(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GeoLookupError {}

// 便捷的构造函数
impl GeoLookupError {
    pub fn parse<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Parse(msg.into())
    }

    pub fn database_open<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::DatabaseOpen(msg.into())
    }

    pub fn lookup<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Lookup(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::FileOperation(msg.into())
    }

    pub fn metrics<T: Into<String>>(msg: T) -> Self {
        GeoLookupError::Metrics(msg.into())
    }
}

impl From<config::ConfigError> for GeoLookupError {
    fn from(err: config::ConfigError) -> Self {
        GeoLookupError::Config(err.to_string())
    }
}

impl From<prometheus::Error> for GeoLookupError {
    fn from(err: prometheus::Error) -> Self {
        GeoLookupError::Metrics(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoLookupError>;
