use std::fs;
use std::io::{self, Read};

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Read JWK JSON from a file or stdin
///
/// If `file` is `None`, reads from stdin. Blank input is rejected.
pub(crate) fn read_input(file: Option<&str>) -> Result<String> {
    let text = match file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Err(Error::InvalidInput("no JWK JSON supplied".to_string()));
    }
    Ok(text)
}

/// File name used by `--save`: `jwk_<YYYY-MM-DD>.pem`.
pub(crate) fn default_file_name(date: NaiveDate) -> String {
    format!("jwk_{}.pem", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;

    #[rstest(year, month, day, expected,
        case(2024, 3, 9, "jwk_2024-03-09.pem"),
        case(1999, 12, 31, "jwk_1999-12-31.pem")
    )]
    fn test_default_file_name(year: i32, month: u32, day: u32, expected: &str) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        assert_eq!(expected, default_file_name(date));
    }

    #[rstest(content, case(""), case("  \n\t\n"))]
    fn test_read_input_rejects_blank(content: &str) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let err = read_input(file.path().to_str()).unwrap_err();
        assert_eq!("Invalid input: no JWK JSON supplied", err.to_string());
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input(Some("/nonexistent/key.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
