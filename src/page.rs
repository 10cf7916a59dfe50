use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static P_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static BLOCK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.ba-table").unwrap());
static H2_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static TR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

/// One rendered almanac year page. Pages are visually but not structurally
/// consistent, so this layer only exposes the raw shape (paragraphs, table
/// blocks, rows, cells) and leaves all business rules to the extractors and
/// normalizers.
pub struct YearPage {
    doc: Html,
}

impl YearPage {
    pub fn parse(html: &str) -> Self {
        Self { doc: Html::parse_document(html) }
    }

    /// Rendered text of every `<p>`, in document order, whitespace-collapsed.
    /// Empty paragraphs are included; the event extractor filters them.
    pub fn paragraphs(&self) -> Vec<String> {
        self.doc.select(&P_SEL).map(element_text).collect()
    }

    pub fn stat_blocks(&self) -> Vec<StatBlock<'_>> {
        self.doc
            .select(&BLOCK_SEL)
            .map(|root| StatBlock { root })
            .collect()
    }
}

/// A `div.ba-table` block: an optional `h2` title above a `<table>`.
pub struct StatBlock<'a> {
    root: ElementRef<'a>,
}

impl<'a> StatBlock<'a> {
    pub fn title(&self) -> Option<String> {
        self.root.select(&H2_SEL).next().map(element_text)
    }

    /// All `<tr>` of the block's first `<table>`; empty when the block has
    /// no table element at all.
    pub fn rows(&self) -> Vec<TableRow<'a>> {
        match self.root.select(&TABLE_SEL).next() {
            Some(table) => table.select(&TR_SEL).map(|el| TableRow { el }).collect(),
            None => Vec::new(),
        }
    }
}

pub struct TableRow<'a> {
    el: ElementRef<'a>,
}

impl TableRow<'_> {
    /// Cell texts in column order. With `prefer_header`, `<th>` cells are
    /// used and `<td>` is the fallback (header rows on these pages use
    /// either); without it only `<td>` cells count, as in data rows.
    pub fn cells(&self, prefer_header: bool) -> Vec<String> {
        if prefer_header {
            let ths: Vec<String> = self.el.select(&TH_SEL).map(element_text).collect();
            if !ths.is_empty() {
                return ths;
            }
        }
        self.el.select(&TD_SEL).map(element_text).collect()
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <p>  Ruth hits his 42nd
               home run.  </p>
          <p>   </p>
          <div class="ba-table">
            <h2> 2021 Player Review - Batting </h2>
            <table>
              <tr><td colspan="3">Banner</td></tr>
              <tr><th>#</th><th>Name</th><th>Team</th></tr>
              <tr><td> 42 </td><td>Ruth, Babe</td><td>Boston</td></tr>
            </table>
          </div>
          <div class="ba-table">
            <table>
              <tr><td>Banner</td></tr>
              <tr><td>#</td><td>Name</td></tr>
              <tr><td>7</td><td>Mantle, Mickey</td></tr>
            </table>
          </div>
          <div class="ba-table"><h2>Empty block</h2></div>
        </body></html>
    "#;

    #[test]
    fn paragraphs_collapse_whitespace() {
        let page = YearPage::parse(PAGE);
        let paras = page.paragraphs();
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0], "Ruth hits his 42nd home run.");
        assert_eq!(paras[1], "");
    }

    #[test]
    fn block_titles_and_rows() {
        let page = YearPage::parse(PAGE);
        let blocks = page.stat_blocks();
        assert_eq!(blocks.len(), 3);

        assert_eq!(blocks[0].title().as_deref(), Some("2021 Player Review - Batting"));
        assert_eq!(blocks[0].rows().len(), 3);

        assert_eq!(blocks[1].title(), None);
        assert!(blocks[2].rows().is_empty());
    }

    #[test]
    fn header_cells_prefer_th_with_td_fallback() {
        let page = YearPage::parse(PAGE);
        let blocks = page.stat_blocks();

        let th_header = blocks[0].rows()[1].cells(true);
        assert_eq!(th_header, vec!["#", "Name", "Team"]);

        // Second block has a td-only header row.
        let td_header = blocks[1].rows()[1].cells(true);
        assert_eq!(td_header, vec!["#", "Name"]);

        let data = blocks[0].rows()[2].cells(false);
        assert_eq!(data, vec!["42", "Ruth, Babe", "Boston"]);
    }
}
