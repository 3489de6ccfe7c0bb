use crate::record::ScanRecord;
use std::error::Error;
use std::path::Path;

/// File name offered for the spreadsheet download.
pub const EXPORT_FILE_NAME: &str = "ScanResults.xlsx";

/// Worksheet name inside the exported workbook.
pub const SHEET_NAME: &str = "Scan Results";

/// Header row, in column order.
pub const HEADERS: [&str; 2] = ["Kehadiran", "Nama"];

/// Convert records to CSV format
///
/// Writes the header row followed by one row per record, timestamp first.
/// Values containing commas, quotes or newlines are quoted, with inner
/// quotes doubled.
///
/// # Arguments
/// * `records` - Records to export, in the order they should appear
///
/// # Returns
/// * `String` - CSV content
///
/// # Examples
/// ```
/// use attendance::downloader::to_csv;
/// use attendance::record::ScanRecord;
///
/// let rows = [ScanRecord::new("ABC123", "17/08/2024, 08.00.01")];
/// assert_eq!(to_csv(&rows), "Kehadiran,Nama\n\"17/08/2024, 08.00.01\",ABC123\n");
/// ```
pub fn to_csv(records: &[ScanRecord]) -> String {
    let mut csv_content = HEADERS.join(",");
    csv_content.push('\n');

    for record in records {
        push_csv_field(&mut csv_content, record.captured_at());
        csv_content.push(',');
        push_csv_field(&mut csv_content, record.subject());
        csv_content.push('\n');
    }

    csv_content
}

fn push_csv_field(out: &mut String, value: &str) {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace('"', "\"\"");
        out.push_str(&format!("\"{}\"", escaped));
    } else {
        out.push_str(value);
    }
}

/// Convert records to XLSX format
///
/// Builds a single-sheet workbook named [`SHEET_NAME`] with a bold
/// [`HEADERS`] row and one row per record, using the rust_xlsxwriter library.
///
/// # Arguments
/// * `records` - Records to export, in the order they should appear
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
///
/// # Examples
/// ```
/// use attendance::downloader::to_xlsx;
/// use attendance::record::ScanRecord;
///
/// let rows = [ScanRecord::new("ABC123", "17/08/2024, 08.00.01")];
/// let bytes = to_xlsx(&rows).unwrap();
/// assert_eq!(&bytes[..2], b"PK");
/// ```
pub fn to_xlsx(records: &[ScanRecord]) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut workbook = build_workbook(records)?;
    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

/// Write the XLSX export to `path`.
pub fn save_xlsx(records: &[ScanRecord], path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let mut workbook = build_workbook(records)?;
    workbook.save(path.as_ref())?;
    Ok(())
}

fn build_workbook(records: &[ScanRecord]) -> Result<rust_xlsxwriter::Workbook, Box<dyn Error>> {
    use rust_xlsxwriter::{Format, Workbook, Worksheet};

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    for (c, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, c as u16, *header, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, record.captured_at())?;
        worksheet.write_string(row, 1, record.subject())?;
    }

    worksheet.set_column_width(0, 22.0)?;
    worksheet.set_column_width(1, 30.0)?;

    workbook.push_worksheet(worksheet);
    Ok(workbook)
}
