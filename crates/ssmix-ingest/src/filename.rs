//! SS-MIX2 standardized storage file names.

use std::path::Path;

use ssmix_model::Category;

/// The seven `_`-separated parts of a standardized storage file name:
/// `<patient>_<date>_<category>_<order>_<timestamp>_<department>_<flag>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageFileName<'a> {
    pub patient_id: &'a str,
    /// Care date (`YYYYMMDD`), `-` when the message is not tied to a date.
    pub date: &'a str,
    pub category: &'a str,
    pub order_number: &'a str,
    pub timestamp: &'a str,
    pub department: &'a str,
    /// `1` for current data, `0` for cancelled.
    pub condition_flag: &'a str,
}

impl<'a> StorageFileName<'a> {
    pub fn parse(name: &'a str) -> Option<Self> {
        let parts: Vec<&str> = name.split('_').collect();
        match parts[..] {
            [
                patient_id,
                date,
                category,
                order_number,
                timestamp,
                department,
                condition_flag,
            ] if !patient_id.is_empty() && !category.is_empty() => Some(Self {
                patient_id,
                date,
                category,
                order_number,
                timestamp,
                department,
                condition_flag,
            }),
            _ => None,
        }
    }
}

/// Infer the data category of a message file.
///
/// The category token of the file name wins; otherwise the parent directory,
/// which in standardized storage is named after the category.
pub fn infer_category(path: &Path) -> Option<Category> {
    let from_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(StorageFileName::parse)
        .and_then(|name| name.category.parse().ok());

    from_name.or_else(|| {
        path.parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .and_then(|name| name.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "0000000001_20210805_OMP-11_2021080500001_20210805120000000_01_1";

    #[test]
    fn test_parse_storage_name() {
        let name = StorageFileName::parse(NAME).unwrap();
        assert_eq!(name.patient_id, "0000000001");
        assert_eq!(name.date, "20210805");
        assert_eq!(name.category, "OMP-11");
        assert_eq!(name.department, "01");
        assert_eq!(name.condition_flag, "1");
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert!(StorageFileName::parse("message.hl7").is_none());
        assert!(StorageFileName::parse("a_b_c").is_none());
        assert!(StorageFileName::parse("_20210805_OMP-11_1_2_3_4").is_none());
    }

    #[test]
    fn test_infer_category_from_name() {
        let path = Path::new("/storage/000/000/0000000001/20210805/OMP-11").join(NAME);
        assert_eq!(infer_category(&path), Some(Category::Omp11));

        let undated = Path::new("0000000001_-_ADT-00_-_20210805120000000_-_1");
        assert_eq!(infer_category(undated), Some(Category::Adt00));
    }

    #[test]
    fn test_infer_category_from_directory() {
        let path = Path::new("/export/OMG-13/report.hl7");
        assert_eq!(infer_category(path), Some(Category::Omg13));
    }

    #[test]
    fn test_infer_category_unknown() {
        assert_eq!(infer_category(Path::new("/tmp/report.hl7")), None);
        let name = "0000000001_20210805_XYZ-01_1_20210805120000000_01_1";
        assert_eq!(infer_category(Path::new(name)), None);
    }
}
