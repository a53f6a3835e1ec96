use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use crate::record::{ChannelRecord, COLUMNS};

// xlsx cells hold at most this many characters
const XLSX_CELL_LIMIT: usize = 32_767;

/// Paths of the files written for one export.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Exported {
    pub csv: PathBuf,
    pub xlsx: PathBuf,
    pub rows: usize,
}

/// Write `<stem>.csv` and `<stem>.xlsx` into `out_dir`. Nothing is written for
/// an empty batch.
pub fn export(out_dir: &Path, stem: &str, rows: &[ChannelRecord]) -> Result<Option<Exported>> {
    if rows.is_empty() { return Ok(None); }

    std::fs::create_dir_all(out_dir).with_context(|| format!("create output dir {}", out_dir.display()))?;
    let csv = out_dir.join(format!("{}.csv", stem));
    let xlsx = out_dir.join(format!("{}.xlsx", stem));

    write_csv(&csv, rows)?;
    write_xlsx(&xlsx, rows)?;
    Ok(Some(Exported { csv, xlsx, rows: rows.len() }))
}

/// Semicolon-delimited UTF-8 with a header row.
pub fn write_csv(path: &Path, rows: &[ChannelRecord]) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;
    w.write_record(COLUMNS)?;
    for r in rows { w.write_record(r.row())?; }
    w.flush()?;
    Ok(())
}

/// Single sheet, bold header row.
pub fn write_xlsx(path: &Path, rows: &[ChannelRecord]) -> Result<()> {
    let mut book = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = book.add_worksheet();
    sheet.set_name("Channels")?;

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }
    for (i, r) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in r.row().iter().enumerate() {
            if value.is_empty() { continue; }
            sheet.write_string(row, col as u16, cell_text(value))?;
        }
    }

    book.save(path).with_context(|| format!("save {}", path.display()))?;
    Ok(())
}

fn cell_text(value: &str) -> &str {
    match value.char_indices().nth(XLSX_CELL_LIMIT) {
        Some((cut, _)) => &value[..cut],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ChannelRecord> {
        let mut a = ChannelRecord::bare("https://www.youtube.com/@garage54");
        a.name = "Гараж 54".into();
        a.subscribers = "1.2 млн".into();
        a.description = "Тест; драйв\nи обзоры".into();
        a.telegram = "https://t.me/garage54".into();
        vec![a, ChannelRecord::bare("https://www.youtube.com/channel/UC1")]
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export(dir.path(), "out", &[]).unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = export(&dir.path().join("nested"), "channels", &sample()).unwrap().unwrap();
        assert_eq!(out.rows, 2);
        assert!(out.csv.ends_with("channels.csv"));
        assert!(out.xlsx.exists());
        assert!(std::fs::metadata(&out.xlsx).unwrap().len() > 0);
    }

    #[test]
    fn csv_is_semicolon_delimited_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.csv");
        write_csv(&path, &sample()).unwrap();

        let mut r = csv::ReaderBuilder::new().delimiter(b';').from_path(&path).unwrap();
        let header: Vec<String> = r.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(header, COLUMNS);

        let records: Vec<csv::StringRecord> = r.records().map(|x| x.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "Гараж 54");
        assert_eq!(&records[0][4], "Тест; драйв\nи обзоры");
        assert_eq!(&records[0][6], "https://t.me/garage54");
        assert_eq!(&records[1][0], "https://www.youtube.com/channel/UC1");
        assert_eq!(&records[1][1], "");

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("Channel URL;Name;Subscribers;Views Last 30 Days;"));
    }

    #[test]
    fn long_cells_are_cut_on_char_boundary() {
        let long = "я".repeat(XLSX_CELL_LIMIT + 5);
        assert_eq!(cell_text(&long).chars().count(), XLSX_CELL_LIMIT);
        assert_eq!(cell_text("short"), "short");
    }
}
