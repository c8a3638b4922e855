//! 一覧ページのリンク抽出
//!
//! - `.odd_row` / `.even_row` の行リンク → 下位の一覧ページ
//! - `<script>` 内の `(科目ID, "", グループ番号)` → グループ詳細ページ

use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::FilterError;

use super::types::CatalogueAddress;

const ROW_SELECTORS: [&str; 2] = [".odd_row", ".even_row"];
const GROUP_CODE_PATTERN: &str = r#"(\d+),\s*"",\s*(\d+)"#;

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, FilterError> {
    Selector::parse(selector)
        .map_err(|e| FilterError::Pattern(format!("セレクタ {}: {:?}", selector, e)))
}

pub struct LinkDiscoverer {
    origin: Url,
    rows: Vec<Selector>,
    anchor: Selector,
    script: Selector,
    group_code: Regex,
}

impl LinkDiscoverer {
    pub fn new(origin: &str) -> Result<Self, FilterError> {
        let rows = ROW_SELECTORS
            .iter()
            .map(|s| parse_selector(s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            origin: Url::parse(origin)?,
            rows,
            anchor: parse_selector("a[href]")?,
            script: parse_selector("script")?,
            group_code: Regex::new(GROUP_CODE_PATTERN)
                .map_err(|e| FilterError::Pattern(e.to_string()))?,
        })
    }

    /// 一覧ページから次に訪れるアドレスを抽出。該当なしは正常終了
    pub fn discover(&self, page_url: &str, html: &str) -> Vec<CatalogueAddress> {
        let document = Html::parse_document(html);
        let mut found = self.row_links(&document);
        found.extend(self.group_links(page_url, &document));

        debug!("Discovered {} addresses on {}", found.len(), page_url);
        found
    }

    /// 1行につき最初のリンクのみ採用（同じ行に同じ遷移先のリンクが並ぶため）
    fn row_links(&self, document: &Html) -> Vec<CatalogueAddress> {
        let mut links = Vec::new();

        for row_selector in &self.rows {
            for row in document.select(row_selector) {
                let Some(href) = row
                    .select(&self.anchor)
                    .find_map(|a| a.value().attr("href"))
                else {
                    continue;
                };

                match self.origin.join(href) {
                    Ok(url) => links.push(CatalogueAddress::listing(url.to_string())),
                    Err(e) => warn!(href = href, error = %e, "Skipping unresolvable row link"),
                }
            }
        }

        links
    }

    fn group_links(&self, page_url: &str, document: &Html) -> Vec<CatalogueAddress> {
        let mut links = Vec::new();

        for script in document.select(&self.script) {
            let text: String = script.text().collect();
            for caps in self.group_code.captures_iter(&text) {
                links.push(CatalogueAddress::group(format!(
                    "{}&course_id={}&gr_no={}",
                    page_url, &caps[1], &caps[2]
                )));
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::types::PageKind;

    const ORIGIN: &str = "https://rejestracja.usos.uw.edu.pl/";
    const PAGE: &str = "https://rejestracja.usos.uw.edu.pl/catalogue.php?rg=0000-2021-OG-UN";

    fn discoverer() -> LinkDiscoverer {
        LinkDiscoverer::new(ORIGIN).unwrap()
    }

    #[test]
    fn test_row_links_resolved_against_origin() {
        let html = r#"
            <table>
              <tr class="odd_row"><td><a href="catalogue.php?rg=A">A</a></td><td><a href="catalogue.php?rg=A">A</a></td></tr>
              <tr class="even_row"><td><a href="catalogue.php?rg=B">B</a></td></tr>
              <tr class="odd_row"><td>no link</td></tr>
            </table>
        "#;

        let found = discoverer().discover(PAGE, html);

        assert_eq!(
            found,
            vec![
                CatalogueAddress::listing("https://rejestracja.usos.uw.edu.pl/catalogue.php?rg=A"),
                CatalogueAddress::listing("https://rejestracja.usos.uw.edu.pl/catalogue.php?rg=B"),
            ]
        );
    }

    #[test]
    fn test_script_pairs_become_group_addresses() {
        let html = r#"
            <html><body>
            <script>
              showGroup(12345, "", 1);
              showGroup(678,"",  22);
              other(1, 2);
            </script>
            </body></html>
        "#;

        let found = discoverer().discover(PAGE, html);

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|a| a.kind == PageKind::Group));
        assert_eq!(found[0].url, format!("{}&course_id=12345&gr_no=1", PAGE));
        assert_eq!(found[1].url, format!("{}&course_id=678&gr_no=22", PAGE));
    }

    #[test]
    fn test_page_without_links_is_empty() {
        let found = discoverer().discover(PAGE, "<html><body><p>nothing</p></body></html>");
        assert!(found.is_empty());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        assert!(matches!(
            LinkDiscoverer::new("not an origin"),
            Err(FilterError::InvalidUrl(_))
        ));
    }
}
