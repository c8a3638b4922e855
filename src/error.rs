use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("HTTPクライアント初期化エラー: {0}")]
    ClientInit(String),

    #[error("取得エラー: {0}")]
    Fetch(String),

    #[error("パターンエラー: {0}")]
    Pattern(String),

    #[error("要素が見つかりません: {0}")]
    ElementNotFound(String),

    #[error("フィールド変換エラー ({field}): {reason}")]
    Field { field: &'static str, reason: String },

    #[error("条件評価エラー: {0}")]
    Predicate(String),

    #[error("不正なURL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("出力エラー: {0}")]
    Output(#[from] std::io::Error),

    #[error("シリアライズエラー: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FilterError {
    pub(crate) fn field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Field {
            field,
            reason: reason.into(),
        }
    }
}
