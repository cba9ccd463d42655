use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::iter;
use std::path::Path;
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// An in-memory table: one header row and string cells, read from CSV or
/// from the first sheet of a workbook.
/// Rows shorter than the header are padded with empty cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows.into_iter().map(|row| pad(row, width)).collect();
        Self { headers, rows }
    }

    /// Picks the format from the file extension; anything that is not a
    /// workbook is read as CSV.
    pub fn read(path: &Path) -> Result<Self> {
        if has_extension(path, &WORKBOOK_EXTENSIONS) {
            return Self::read_spreadsheet(path);
        }

        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::from_reader(file, path)
    }

    fn read_spreadsheet(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path).map_err(|e| match e {
            calamine::Error::Io(e) => Error::io(path, e),
            other => Error::spreadsheet(path, other),
        })?;

        let range = workbook.worksheet_range_at(0)
            .ok_or_else(|| Error::spreadsheet(path, "workbook has no sheets"))?
            .map_err(|e| Error::spreadsheet(path, e))?;

        let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<String>>());
        let headers = rows.next().unwrap_or_default();

        Ok(Self::new(headers, rows.collect()))
    }

    /// `source` is only used to name the input in errors.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()
            .map_err(|e| Error::csv(source, e))?
            .iter()
            .enumerate()
            .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}').to_string() } else { h.to_string() })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::csv(source, e))?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str, source: &Path) -> Result<usize> {
        self.headers.iter()
            .position(|h| h == column)
            .ok_or_else(|| Error::MissingColumn {
                column: column.to_string(),
                path: source.to_path_buf(),
            })
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row[index].as_str())
    }

    /// Keeps the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Writes a workbook for `.xlsx` targets and CSV otherwise. The BOM only
    /// applies to CSV.
    pub fn write(&self, path: &Path, with_bom: bool) -> Result<()> {
        if has_extension(path, &["xlsx"]) {
            return self.write_spreadsheet(path);
        }

        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        self.to_writer(BufWriter::new(file), with_bom, path)
    }

    // Integer cells below the header are stored as numbers, the rest as text.
    fn write_spreadsheet(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        for (row, cells) in iter::once(&self.headers).chain(&self.rows).enumerate() {
            let row = u32::try_from(row).map_err(|_| Error::spreadsheet(path, "too many rows"))?;
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                let col = u16::try_from(col).map_err(|_| Error::spreadsheet(path, "too many columns"))?;

                let written = match cell.parse::<i64>() {
                    Ok(number) if row > 0 && number.to_string() == *cell => {
                        sheet.write_number(row, col, number as f64)
                    }
                    _ => sheet.write_string(row, col, cell),
                };
                written.map_err(|e| Error::spreadsheet(path, e))?;
            }
        }

        workbook.save(path).map_err(|e| Error::spreadsheet(path, e))
    }

    pub fn to_writer<W: Write>(&self, mut writer: W, with_bom: bool, target: &Path) -> Result<()> {
        if with_bom {
            writer.write_all(UTF8_BOM).map_err(|e| Error::io(target, e))?;
        }

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers).map_err(|e| Error::csv(target, e))?;
        for row in &self.rows {
            csv_writer.write_record(row).map_err(|e| Error::csv(target, e))?;
        }
        csv_writer.flush().map_err(|e| Error::io(target, e))
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn pad(mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() < width {
        row.resize(width, String::new());
    }
    row
}
