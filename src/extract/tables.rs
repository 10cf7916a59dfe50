use tracing::warn;

use super::RawTable;
use crate::page::YearPage;

/// One RawTable per `div.ba-table` block. Deliberately permissive: ragged
/// rows pass through and a missing title yields an empty string (the
/// normalizer rejects it for lacking the relevance substring). Malformed
/// blocks are skipped without aborting the document.
pub fn extract(year: i32, page: &YearPage) -> Vec<RawTable> {
    let mut tables = Vec::new();

    for block in page.stat_blocks() {
        let title = block.title().unwrap_or_default();

        // Row 0 is a banner row, row 1 the header; anything shorter has no
        // data and covers blocks with no table element at all.
        let rows = block.rows();
        if rows.len() < 3 {
            warn!(
                "Skipping table '{}' in {}: {} row(s), need at least 3",
                title,
                year,
                rows.len()
            );
            continue;
        }

        let headers = rows[1].cells(true);
        if headers.is_empty() {
            warn!("Skipping table '{}' in {}: no header cells found", title, year);
            continue;
        }

        let data = rows[2..].iter().map(|row| row.cells(false)).collect();
        tables.push(RawTable { year, title, headers, rows: data });
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(inner: &str) -> String {
        format!("<div class=\"ba-table\">{}</div>", inner)
    }

    #[test]
    fn fewer_than_three_rows_yields_nothing() {
        let html = block(
            "<h2>2020 Player Review - Batting</h2>
             <table><tr><td>Banner</td></tr><tr><th>#</th></tr></table>",
        );
        assert!(extract(2020, &YearPage::parse(&html)).is_empty());
    }

    #[test]
    fn empty_header_row_yields_nothing() {
        let html = block(
            "<h2>2020 Player Review - Batting</h2>
             <table>
               <tr><td>Banner</td></tr>
               <tr></tr>
               <tr><td>48</td><td>Guerrero</td></tr>
             </table>",
        );
        assert!(extract(2020, &YearPage::parse(&html)).is_empty());
    }

    #[test]
    fn missing_title_emits_empty_string() {
        let html = block(
            "<table>
               <tr><td>Banner</td></tr>
               <tr><th>#</th><th>Name</th></tr>
               <tr><td>7</td><td>Mantle</td></tr>
             </table>",
        );
        let tables = extract(1956, &YearPage::parse(&html));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].title, "");
        assert_eq!(tables[0].headers, vec!["#", "Name"]);
    }

    #[test]
    fn ragged_rows_pass_through_untouched() {
        let html = block(
            "<h2>2020 Player Review - Batting</h2>
             <table>
               <tr><td>Banner</td></tr>
               <tr><th>#</th><th>Name</th><th>Team</th></tr>
               <tr><td>48</td><td>Guerrero</td></tr>
               <tr><td>45</td><td>Ohtani</td><td>Los Angeles</td><td>extra</td></tr>
             </table>",
        );
        let tables = extract(2020, &YearPage::parse(&html));
        assert_eq!(tables[0].rows[0].len(), 2);
        assert_eq!(tables[0].rows[1].len(), 4);
    }

    #[test]
    fn malformed_block_does_not_abort_siblings() {
        let html = format!(
            "{}{}",
            block("<h2>No table here</h2>"),
            block(
                "<h2>2020 Player Review - Pitching</h2>
                 <table>
                   <tr><td>Banner</td></tr>
                   <tr><th>#</th><th>Name</th><th>Team</th></tr>
                   <tr><td>3.14</td><td>Cole, Gerrit</td><td>New York</td></tr>
                 </table>"
            ),
        );
        let tables = extract(2020, &YearPage::parse(&html));
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].title, "2020 Player Review - Pitching");
    }
}
