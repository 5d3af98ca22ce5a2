//! Folder naming

use crate::config::FolderFormat;
use chrono::{Local, NaiveDateTime};

/// Name of the dated subfolder for `date` under `format`
pub fn name_for(date: &NaiveDateTime, format: FolderFormat) -> String {
    date.format(format.pattern()).to_string()
}

/// Folder name today's date would get, shown next to format selectors
pub fn preview(format: FolderFormat) -> String {
    name_for(&Local::now().naive_local(), format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(13, 45, 0)
            .unwrap()
    }

    #[test]
    fn test_builtin_formats() {
        let d = date(2024, 8, 3);
        assert_eq!(name_for(&d, FolderFormat::YearMonth), "2024-08");
        assert_eq!(name_for(&d, FolderFormat::MonthNameYear), "August-2024");
        assert_eq!(name_for(&d, FolderFormat::YearMonthDay), "2024-08-03");
    }

    #[test]
    fn test_naming_is_deterministic() {
        let d = date(1999, 12, 31);
        for format in FolderFormat::ALL {
            let first = name_for(&d, format);
            assert!(!first.is_empty());
            assert_eq!(first, name_for(&d, format));
        }
    }

    #[test]
    fn test_edge_dates() {
        assert_eq!(name_for(&date(2024, 2, 29), FolderFormat::YearMonthDay), "2024-02-29");
        assert_eq!(name_for(&date(1, 1, 1), FolderFormat::YearMonth), "0001-01");
        assert_eq!(name_for(&date(2023, 1, 9), FolderFormat::MonthNameYear), "January-2023");
    }

    #[test]
    fn test_preview_matches_format_shape() {
        assert_eq!(preview(FolderFormat::YearMonth).len(), "YYYY-MM".len());
        assert_eq!(preview(FolderFormat::YearMonthDay).len(), "YYYY-MM-DD".len());
    }
}
