//! カタログ関連の型定義

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// 文字列フィールドの取得失敗時の値
pub const UNKNOWN: &str = "unknown";

/// ページの種類（発見された経路で決まる。URLの形では区別しない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// 一覧ページ（下位の一覧・グループへのリンクを含む）
    Listing,
    /// グループ詳細ページ（ラベル/値の表を含む）
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CatalogueAddress {
    pub url: String,
    pub kind: PageKind,
}

impl CatalogueAddress {
    pub fn listing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: PageKind::Listing,
        }
    }

    pub fn group(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: PageKind::Group,
        }
    }
}

/// 詳細ページの表から読み取った生データ（ラベル → 値）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub url: String,
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fields: BTreeMap::new(),
        }
    }

    /// 同じラベルが複数回現れた場合は後の値で上書き
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(label.into(), value.into());
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    pub fn take(&mut self, label: &str) -> Option<String> {
        self.fields.remove(label)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

/// 登録者数/定員
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seats {
    pub registered: f64,
    pub limit: f64,
}

impl Seats {
    pub const UNKNOWN: Seats = Seats {
        registered: -1.0,
        limit: -1.0,
    };

    pub fn new(registered: f64, limit: f64) -> Self {
        Self { registered, limit }
    }

    /// 登録者数が定員に達しているか（不明値 (-1, -1) も満席扱い）
    pub fn is_full(&self) -> bool {
        self.registered == self.limit
    }
}

/// 時間割の1コマ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// 正規化済みのグループデータ。全フィールドが値か既定値を持つ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// 科目コード
    pub id: String,
    pub name: String,
    pub language: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub term: String,
    /// 時間数
    pub span: f64,
    pub ects: f64,
    pub cost: f64,
    pub seats: Seats,
    pub venue: String,
    pub time: Vec<TimeSlot>,
    pub lecturer: Vec<String>,
    pub url: String,
    /// 変換対象外のラベル（そのまま保持）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}
