// ==========================================
// CSV 工作簿夹具 - 每个工作表一个 <表名>.csv
// ==========================================

use chrono::NaiveDate;
use std::path::Path;

pub fn write_sheet(dir: &Path, name: &str, rows: &[Vec<String>]) {
    let mut writer = csv::Writer::from_path(dir.join(format!("{}.csv", name))).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
}

/// `MM/DD(Ddd)` 表头
pub fn short_header(date: NaiveDate) -> String {
    date.format("%m/%d(%a)").to_string()
}

/// 讲次 × 日期 网格；`token(date, period)` 给出单元格内容
pub fn period_grid<F>(dates: &[NaiveDate], header: fn(NaiveDate) -> String, token: F) -> Vec<Vec<String>>
where
    F: Fn(NaiveDate, u8) -> String,
{
    let mut rows = Vec::new();
    let mut head = vec!["講".to_string()];
    head.extend(dates.iter().map(|d| header(*d)));
    rows.push(head);

    for period in 1..=6u8 {
        let mut row = vec![period.to_string()];
        row.extend(dates.iter().map(|d| token(*d, period)));
        rows.push(row);
    }
    rows
}

pub fn demand_sheet(rows: &[(&str, [&str; 5])]) -> Vec<Vec<String>> {
    let mut sheet = vec![["生徒名", "国語", "数学", "英語", "理科", "社会"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()];
    for (name, hours) in rows {
        let mut row = vec![name.to_string()];
        row.extend(hours.iter().map(|h| h.to_string()));
        sheet.push(row);
    }
    sheet
}
