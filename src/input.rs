//! Input reading: newline-delimited identifiers.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::config::ConfigError;
use crate::model::{Identifier, LookupKind};

/// Read identifiers from a file, or from stdin when `path` is `-`.
pub fn read_identifiers(path: &Path, kind: LookupKind) -> Result<Vec<Identifier>, ConfigError> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map(|_| buf)
    } else {
        fs::read_to_string(path)
    }
    .map_err(|source| ConfigError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_identifiers(&contents, kind))
}

/// Split input into identifiers, one per non-blank line.
///
/// Lines are trimmed, which also strips the `\r` of CRLF input.
pub fn parse_identifiers(contents: &str, kind: LookupKind) -> Vec<Identifier> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Identifier::new(kind, line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn values(identifiers: &[Identifier]) -> Vec<&str> {
        identifiers.iter().map(Identifier::value).collect()
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let ids = parse_identifiers("a@x.com\nbad@y.com\n\n\n", LookupKind::Email);
        assert_eq!(values(&ids), ["a@x.com", "bad@y.com"]);
    }

    #[test]
    fn crlf_and_whitespace_are_trimmed() {
        let ids = parse_identifiers("  a@x.com \r\n\t\r\nb@x.com\r\n", LookupKind::Email);
        assert_eq!(values(&ids), ["a@x.com", "b@x.com"]);
    }

    #[test]
    fn order_and_duplicates_are_kept() {
        let ids = parse_identifiers("jack\njill\njack", LookupKind::Twitter);
        assert_eq!(values(&ids), ["jack", "jill", "jack"]);
        assert!(ids.iter().all(|id| id.kind() == LookupKind::Twitter));
    }

    #[test]
    fn empty_input_has_no_identifiers() {
        assert!(parse_identifiers("", LookupKind::Email).is_empty());
        assert!(parse_identifiers("\n \n", LookupKind::Email).is_empty());
    }

    #[test]
    fn reads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emails.txt");
        fs::write(&path, "a@x.com\nb@x.com\n").unwrap();

        let ids = read_identifiers(&path, LookupKind::Email).unwrap();
        assert_eq!(values(&ids), ["a@x.com", "b@x.com"]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = TempDir::new().unwrap();
        let err = read_identifiers(&dir.path().join("nope.txt"), LookupKind::Email).unwrap_err();
        assert!(matches!(err, ConfigError::Input { .. }));
    }
}
