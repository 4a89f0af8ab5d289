//! JSON output for extracted sections.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::Section;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Compact JSON without extra whitespace
    #[default]
    Compact,
    /// Pretty-printed JSON with indentation
    Pretty,
}

/// Serialize sections to a JSON array string.
///
/// Non-ASCII characters are written verbatim, not `\u` escaped.
pub fn to_json(sections: &[Section], format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(sections)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(sections)?,
    };
    Ok(json)
}

/// Serialize sections and write the whole array to `path` in one call.
///
/// Missing parent directories are created.
pub fn write_json<P: AsRef<Path>>(sections: &[Section], path: P, format: JsonFormat) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(sections, format)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;

    log::info!("wrote {} sections to {}", sections.len(), path.display());
    Ok(())
}

/// Read a JSON array of sections back from `path`.
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Vec<Section>> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Section> {
        vec![
            Section::new("Intro_Background", "Body text here."),
            Section::new("第一章", "日本語の本文"),
        ]
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with('['));
        assert!(json.contains(r#""text":"Body text here.""#));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_keeps_non_ascii() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(json.contains("日本語の本文"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(to_json(&[], JsonFormat::Compact).unwrap(), "[]");
    }
}
