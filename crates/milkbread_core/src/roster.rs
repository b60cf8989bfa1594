//! Fixed-width roster table for the 一覽 command.
//!
//! Row collection, sorting, and chunk rendering are pure so the whole
//! pipeline is testable without a gateway connection.

use crate::store::Store;
use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;
use unicode_width::UnicodeWidthStr;

/// Rows per chunk before a new message is started
const MAX_CHUNK_ROWS: usize = 20;

/// Byte budget for one chunk's table body. Leaves headroom for the header
/// line and code fences under the 2000-byte message limit.
const CHUNK_BODY_BUDGET: usize = 1800;

lazy_static! {
    static ref RELEASE_DATE: Regex =
        Regex::new(r"^\d{4}\.\d{2}$").expect("invalid release date regex");
}

/// One (character, style) pair in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub released: String,
    pub title: String,
    pub character: String,
    pub style: String,
}

/// Collect every authored (character, style) pair in scope. `None` means
/// all schools. Order follows the school index, then each school's member
/// list, then each character's style order.
pub fn collect_rows(store: &Store, school: Option<&str>) -> Vec<RosterRow> {
    let schools: Vec<&str> = match school {
        Some(school) => vec![school],
        None => store.school_names().collect(),
    };

    let mut rows = Vec::new();
    for school in schools {
        let Some(members) = store.character_names_by_school(school) else {
            continue;
        };
        for name in members {
            let Some(character) = store.character(name) else {
                continue;
            };
            for (style, record) in &character.styles {
                rows.push(RosterRow {
                    released: record.released.clone(),
                    title: record.title.clone(),
                    character: name.clone(),
                    style: style.clone(),
                });
            }
        }
    }
    rows
}

/// Sort rows by release date, keeping input order among ties. `YYYY.MM`
/// tokens are zero-padded and fixed-width, so lexicographic order is
/// chronological; placeholder strings stay behind every real date and are
/// not ordered against each other.
pub fn sort_rows(rows: &mut [RosterRow]) {
    rows.sort_by(|a, b| compare_release_dates(&a.released, &b.released));
}

fn compare_release_dates(a: &str, b: &str) -> Ordering {
    match (RELEASE_DATE.is_match(a), RELEASE_DATE.is_match(b)) {
        (true, true) => a.cmp(b),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Render sorted rows into ready-to-send message chunks: a header line per
/// chunk plus a fenced monospace table, numbered `(i/total)` when the
/// listing does not fit one message.
pub fn render(scope: &str, rows: &[RosterRow]) -> Vec<String> {
    let date_width = column_width(rows.iter().map(|r| r.released.as_str()));
    let title_width = column_width(rows.iter().map(|r| r.title.as_str()));

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "{}  {}  {} {}",
                pad(&row.released, date_width),
                pad(&row.title, title_width),
                row.character,
                row.style
            )
        })
        .collect();

    let bodies = chunk_lines(&lines);
    let total = bodies.len();

    bodies
        .iter()
        .enumerate()
        .map(|(i, body)| {
            let header = if total == 1 {
                format!("📋 {scope} 角色一覽")
            } else {
                format!("📋 {scope} 角色一覽 ({}/{})", i + 1, total)
            };
            format!("{header}\n```\n{body}\n```")
        })
        .collect()
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.map(UnicodeWidthStr::width).max().unwrap_or(0)
}

/// Pad with spaces to `width` terminal columns; CJK glyphs count as two.
fn pad(value: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(value);
    format!("{}{}", value, " ".repeat(width.saturating_sub(used)))
}

fn chunk_lines(lines: &[String]) -> Vec<String> {
    let pieces: Vec<String> = lines.iter().flat_map(|line| split_oversized(line)).collect();

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_bytes = 0;

    for piece in &pieces {
        let added = piece.len() + 1;
        if !current.is_empty()
            && (current.len() >= MAX_CHUNK_ROWS || current_bytes + added > CHUNK_BODY_BUDGET)
        {
            chunks.push(current.join("\n"));
            current.clear();
            current_bytes = 0;
        }
        current.push(piece);
        current_bytes += added;
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

/// If a single line is too long, split it at character boundaries so no
/// chunk body can outgrow the budget.
fn split_oversized(line: &str) -> Vec<String> {
    if line.len() <= CHUNK_BODY_BUDGET {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in line.chars() {
        if piece.len() + ch.len_utf8() > CHUNK_BODY_BUDGET {
            pieces.push(std::mem::take(&mut piece));
        }
        piece.push(ch);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::sample_store;
    use pretty_assertions::assert_eq;

    fn row(released: &str, title: &str, character: &str, style: &str) -> RosterRow {
        RosterRow {
            released: released.to_string(),
            title: title.to_string(),
            character: character.to_string(),
            style: style.to_string(),
        }
    }

    #[test]
    fn test_date_comparator_orders_real_dates_first() {
        assert_eq!(compare_release_dates("2020.01", "2021.07"), Ordering::Less);
        assert_eq!(
            compare_release_dates("2021.07", "2020.01"),
            Ordering::Greater
        );
        assert_eq!(compare_release_dates("2021.07", "未知"), Ordering::Less);
        assert_eq!(compare_release_dates("FREE", "2020.01"), Ordering::Greater);
        assert_eq!(compare_release_dates("未知", "FREE"), Ordering::Equal);
        // Shape must match exactly, not loosely
        assert_eq!(compare_release_dates("2020.1", "未知"), Ordering::Equal);
        assert_eq!(compare_release_dates("2020.011", "未知"), Ordering::Equal);
    }

    #[test]
    fn test_sort_is_stable_for_placeholders() {
        let mut rows = vec![
            row("未知", "a", "甲", "x"),
            row("2021.07", "b", "乙", "x"),
            row("FREE", "c", "丙", "x"),
            row("2020.01", "d", "丁", "x"),
            row("未知", "e", "戊", "x"),
        ];
        sort_rows(&mut rows);

        let order: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        // Real dates ascend and lead; placeholders keep their input order
        assert_eq!(order, vec!["d", "b", "a", "c", "e"]);
    }

    #[test]
    fn test_collect_rows_follows_data_order() {
        let store = sample_store();
        let rows = collect_rows(&store, None);

        let pairs: Vec<(String, String)> = rows
            .iter()
            .map(|r| (r.character.clone(), r.style.clone()))
            .collect();
        // 山口忠 has no character record and 夜久衛輔 has no styles, so
        // neither contributes a row.
        assert_eq!(
            pairs,
            vec![
                ("日向翔陽".to_string(), "普通".to_string()),
                ("日向翔陽".to_string(), "排球少年".to_string()),
                ("影山飛雄".to_string(), "天才二傳".to_string()),
                ("月島螢".to_string(), "月之塔".to_string()),
                ("孤爪研磨".to_string(), "普通".to_string()),
            ]
        );
    }

    #[test]
    fn test_collect_rows_single_school() {
        let store = sample_store();
        let rows = collect_rows(&store, Some("音駒"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].character, "孤爪研磨");

        assert!(collect_rows(&store, Some("不存在高中")).is_empty());
    }

    #[test]
    fn test_render_pads_to_display_width() {
        let chunks = render(
            "全部",
            &[
                row("2020.01", "短", "日向翔陽", "普通"),
                row("未知", "長很多的稱號", "影山飛雄", "天才二傳"),
            ],
        );
        assert_eq!(chunks.len(), 1);

        let body: Vec<&str> = chunks[0]
            .lines()
            .skip_while(|l| *l != "```")
            .skip(1)
            .take_while(|l| *l != "```")
            .collect();

        // CJK glyphs count as two terminal columns, so 未知 (width 4) gets
        // padded out to 2020.01's width and the columns line up.
        let column = |line: &str, cell: &str| {
            let start = line.find(cell).unwrap();
            UnicodeWidthStr::width(&line[..start])
        };
        assert_eq!(column(body[0], "短"), column(body[1], "長很多的稱號"));
        assert_eq!(column(body[0], "日向翔陽"), column(body[1], "影山飛雄"));
    }

    #[test]
    fn test_single_chunk_header_is_unnumbered() {
        let chunks = render("烏野", &[row("2020.01", "t", "日向翔陽", "普通")]);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].starts_with("📋 烏野 角色一覽\n```"));
    }

    #[test]
    fn test_chunking_round_trips_all_rows() {
        let rows: Vec<RosterRow> = (0..55)
            .map(|i| row(&format!("20{:02}.01", i % 30), "稱號", "角色", &format!("造型{i}")))
            .collect();

        let chunks = render("全部", &rows);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].contains("(1/3)"));
        assert!(chunks[2].contains("(3/3)"));

        // Stripping headers and fences reproduces every row once, in order
        let mut recovered = Vec::new();
        for chunk in &chunks {
            let body = chunk
                .lines()
                .skip_while(|l| *l != "```")
                .skip(1)
                .take_while(|l| *l != "```");
            recovered.extend(body.map(str::to_string));
        }
        assert_eq!(recovered.len(), rows.len());
        for (line, row) in recovered.iter().zip(&rows) {
            assert!(line.ends_with(&format!("角色 {}", row.style)));
        }
    }

    #[test]
    fn test_chunking_respects_byte_budget() {
        // Long rows overflow the byte budget before the row cap
        let wide = "很".repeat(120);
        let rows: Vec<RosterRow> = (0..12)
            .map(|_| row("2020.01", &wide, "角色", "造型"))
            .collect();

        let chunks = render("全部", &rows);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() < 2000);
        }
    }

    #[test]
    fn test_oversized_row_is_hard_split() {
        // One title alone outweighs a whole chunk body
        let rows = vec![row("2021.07", &"很".repeat(700), "角色", "造型")];

        let chunks = render("全部", &rows);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() < 2000, "chunk is {} bytes", chunk.len());
        }

        // The split drops nothing: stripping fences and newlines restores
        // the full row
        let mut body = String::new();
        for chunk in &chunks {
            body.extend(
                chunk
                    .lines()
                    .skip_while(|l| *l != "```")
                    .skip(1)
                    .take_while(|l| *l != "```"),
            );
        }
        assert!(body.contains(&"很".repeat(700)));
        assert!(body.ends_with("角色 造型"));
    }

    #[test]
    fn test_every_message_under_discord_limit() {
        let store = sample_store();
        let mut rows = collect_rows(&store, None);
        sort_rows(&mut rows);
        for chunk in render("全部", &rows) {
            assert!(chunk.len() < 2000);
        }
    }
}
