//! RawRecord → GroupRecord の正規化
//!
//! 各フィールドは独立して変換する。失敗したフィールドは既定値になり、
//! 警告ログを出して次のフィールドへ進む。元のラベルは成否にかかわらず取り除く。

use chrono::NaiveTime;
use tracing::warn;

use crate::error::FilterError;

use super::types::{GroupRecord, RawRecord, Seats, TimeSlot, UNKNOWN};

/// 詳細表のラベル（ポーランド語）
pub mod labels {
    pub const ID: &str = "Kod przedmiotu";
    pub const LANGUAGE: &str = "Język wykładowy";
    pub const SPAN: &str = "Liczba godzin";
    pub const NAME: &str = "Nazwa przedmiotu";
    pub const ECTS: &str = "Punkty ECTS";
    pub const TYPE: &str = "Typ zajęć";
    pub const TERM: &str = "Cykl dydaktyczny";
    pub const SEATS: &str = "Liczba miejsc (zarejestrowani/limit)";
    pub const VENUE: &str = "Miejsce";
    pub const COST: &str = "Koszt";
    pub const TIME: &str = "Termin";
    pub const LECTURER: &str = "Prowadzący";
    /// 登録ラウンドの表示。出力しない
    pub const CURRENT_ROUND: &str = "Aktualna tura";
}

pub fn normalize(mut raw: RawRecord) -> GroupRecord {
    raw.take(labels::CURRENT_ROUND);

    let id = convert(&mut raw, labels::ID, "id", |v| Ok(v.to_string()), UNKNOWN.to_string());
    let language = convert(&mut raw, labels::LANGUAGE, "language", lower, UNKNOWN.to_string());
    let span = convert(&mut raw, labels::SPAN, "span", |v| float("span", v), -1.0);
    let name = convert(&mut raw, labels::NAME, "name", lower, UNKNOWN.to_string());
    let ects = convert(&mut raw, labels::ECTS, "ects", |v| float("ects", v), -1.0);
    let kind = convert(&mut raw, labels::TYPE, "type", lower, UNKNOWN.to_string());
    let term = convert(&mut raw, labels::TERM, "term", lower, UNKNOWN.to_string());
    let seats = convert(&mut raw, labels::SEATS, "seats", parse_seats, Seats::UNKNOWN);
    let venue = convert(&mut raw, labels::VENUE, "venue", |v| Ok(parse_venue(v)), UNKNOWN.into());
    let cost = convert(&mut raw, labels::COST, "cost", parse_cost, 0.0);
    let time = convert(&mut raw, labels::TIME, "time", parse_time, Vec::new());
    let lecturer = convert(
        &mut raw,
        labels::LECTURER,
        "lecturer",
        |v| Ok(parse_lecturer(v)),
        Vec::new(),
    );

    let url = std::mem::take(&mut raw.url);
    GroupRecord {
        id,
        name,
        language,
        kind,
        term,
        span,
        ects,
        cost,
        seats,
        venue,
        time,
        lecturer,
        url,
        extra: raw.into_fields(),
    }
}

/// ラベルを取り出して変換。ラベル欠落・変換失敗は `fallback`
fn convert<T>(
    raw: &mut RawRecord,
    label: &'static str,
    field: &'static str,
    parse: impl FnOnce(&str) -> Result<T, FilterError>,
    fallback: T,
) -> T {
    let result = match raw.take(label) {
        Some(value) => parse(&value),
        None => Err(FilterError::field(field, format!("ラベル「{}」がありません", label))),
    };

    result.unwrap_or_else(|e| {
        warn!(url = %raw.url, field, error = %e, "Field normalization failed, using default");
        fallback
    })
}

fn lower(value: &str) -> Result<String, FilterError> {
    Ok(value.to_lowercase())
}

fn float(field: &'static str, value: &str) -> Result<f64, FilterError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| FilterError::field(field, format!("{:?}: {}", value, e)))
}

/// "登録者数/定員"
pub fn parse_seats(value: &str) -> Result<Seats, FilterError> {
    let mut parts = value.split('/');
    let registered = parts.next().unwrap_or_default();
    let limit = parts
        .next()
        .ok_or_else(|| FilterError::field("seats", format!("{:?}: '/' がありません", value)))?;

    Ok(Seats::new(float("seats", registered)?, float("seats", limit)?))
}

/// 末尾の語（収容人数）を除いた場所名
pub fn parse_venue(value: &str) -> String {
    let words: Vec<&str> = value.split(' ').collect();
    words[..words.len() - 1]
        .iter()
        .map(|w| w.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 先頭の数値のみ（通貨単位は捨てる）
pub fn parse_cost(value: &str) -> Result<f64, FilterError> {
    float("cost", value.split(' ').next().unwrap_or_default())
}

/// "曜日 HH:MM-HH:MM, ..." を全件変換。1件でも失敗したら全体を失敗とする
pub fn parse_time(value: &str) -> Result<Vec<TimeSlot>, FilterError> {
    value.split(", ").map(parse_slot).collect()
}

fn parse_slot(entry: &str) -> Result<TimeSlot, FilterError> {
    let tokens: Vec<&str> = entry.split_whitespace().collect();
    let (Some(day), Some(range)) = (tokens.first(), tokens.last()) else {
        return Err(FilterError::field("time", format!("{:?}: 空の時間割", entry)));
    };
    if tokens.len() < 2 {
        return Err(FilterError::field("time", format!("{:?}: 時刻がありません", entry)));
    }

    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| FilterError::field("time", format!("{:?}: '-' がありません", entry)))?;

    Ok(TimeSlot {
        day: day.to_lowercase(),
        start: parse_clock(start)?,
        end: parse_clock(end)?,
    })
}

/// "9" → 09:00, "14:30" → 14:30, "14:30:15" → 14:30:15
fn parse_clock(value: &str) -> Result<NaiveTime, FilterError> {
    let (hour, rest) = value.split_once(':').unwrap_or((value, "00"));
    if hour.is_empty() || hour.len() > 2 || !hour.chars().all(|c| c.is_ascii_digit()) {
        return Err(FilterError::field("time", format!("{:?}: 不正な時刻", value)));
    }

    // 秒は省略可
    let format = if rest.contains(':') { "%H:%M:%S" } else { "%H:%M" };
    NaiveTime::parse_from_str(&format!("{:0>2}:{}", hour, rest), format)
        .map_err(|e| FilterError::field("time", format!("{:?}: {}", value, e)))
}

pub fn parse_lecturer(value: &str) -> Vec<String> {
    value
        .split(", ")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}
