//! グループ詳細ページの表 → RawRecord

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::FilterError;

use super::links::parse_selector;
use super::types::RawRecord;

const DETAIL_TABLE_SELECTOR: &str = r#"table[class="wrnav stretch"]"#;

/// 行の子ノード位置（空白テキストノードも1つと数える）
const LABEL_INDEX: usize = 1;
const VALUE_INDEX: usize = 3;

pub struct RecordExtractor {
    table: Selector,
}

impl RecordExtractor {
    pub fn new() -> Result<Self, FilterError> {
        Ok(Self {
            table: parse_selector(DETAIL_TABLE_SELECTOR)?,
        })
    }

    /// 詳細表が無いページは `ElementNotFound`。形の合わない行は読み飛ばす
    pub fn extract(&self, url: &str, html: &str) -> Result<RawRecord, FilterError> {
        let document = Html::parse_document(html);
        let table = document.select(&self.table).next().ok_or_else(|| {
            FilterError::ElementNotFound(format!("{} ({})", DETAIL_TABLE_SELECTOR, url))
        })?;

        let mut record = RawRecord::new(url);
        for row in table_rows(table) {
            let cells: Vec<String> = row
                .children()
                .map(|node| {
                    node.descendants()
                        .filter_map(|n| n.value().as_text().map(|t| &**t))
                        .collect::<String>()
                })
                .collect();

            let (Some(label), Some(value)) = (cells.get(LABEL_INDEX), cells.get(VALUE_INDEX))
            else {
                continue;
            };

            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            record.insert(label, value.trim());
        }

        debug!("Extracted {} labels from {}", record.len(), url);
        Ok(record)
    }
}

/// 表直下の行（パーサが補う tbody 等の中も含む）
fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|e| e.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/catalogue.php?rg=X&course_id=1&gr_no=2";

    #[test]
    fn test_extract_label_value_rows() {
        let html = r#"
            <html><body>
            <table class="wrnav stretch">
              <tr>
                <td>Kod przedmiotu</td>
                <td> 4018-KON-KAP </td>
              </tr>
              <tr>
                <td>Liczba miejsc (zarejestrowani/limit)</td>
                <td>12/30</td>
              </tr>
              <tr><td>malformed</td></tr>
            </table>
            </body></html>
        "#;

        let record = RecordExtractor::new().unwrap().extract(URL, html).unwrap();

        assert_eq!(record.url, URL);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Kod przedmiotu"), Some("4018-KON-KAP"));
        assert_eq!(
            record.get("Liczba miejsc (zarejestrowani/limit)"),
            Some("12/30")
        );
    }

    #[test]
    fn test_nested_markup_in_value_cell() {
        let html = r##"<table class="wrnav stretch">
            <tr>
              <td>Prowadzący</td>
              <td><a href="#">Jan Kowalski</a>, <a href="#">Anna Nowak</a></td>
            </tr>
        </table>"##;

        let record = RecordExtractor::new().unwrap().extract(URL, html).unwrap();
        assert_eq!(record.get("Prowadzący"), Some("Jan Kowalski, Anna Nowak"));
    }

    #[test]
    fn test_missing_table_is_extraction_failure() {
        let html = r#"<table class="wrnav"><tr><td>a</td><td>b</td></tr></table>"#;
        let result = RecordExtractor::new().unwrap().extract(URL, html);

        assert!(matches!(result, Err(FilterError::ElementNotFound(_))));
    }
}
