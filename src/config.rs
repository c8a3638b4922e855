use std::time::Duration;

/// 行リンクを解決する既定のオリジン
pub const DEFAULT_ORIGIN: &str = "https://rejestracja.usos.uw.edu.pl/";

#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// 巡回を開始するカタログ一覧ページ
    pub url: String,
    /// true なら満席のグループのみ、false なら空きのあるグループのみ表示
    pub expired: bool,
    /// 取得するURLを出力に表示する
    pub verbose: bool,
    pub origin: String,
    pub timeout: Duration,
    /// 同時に取得するページ数の上限
    pub max_concurrency: usize,
    pub user_agent: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            expired: false,
            verbose: false,
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: Duration::from_secs(30),
            max_concurrency: 8,
            user_agent: format!("usos-filter/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FilterConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_expired(mut self, expired: bool) -> Self {
        self.expired = expired;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 0 は 1 として扱う
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
