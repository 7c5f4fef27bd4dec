//! JSON Lines encoding of the student table.
//!
//! One record per line, every column present, in [`Student`] field order.
//! Missing values are written as `null`, never as `0` or `""`.

use std::path::Path;

use roster_core::student::Student;

use crate::{Error, Result};

/// Serialise the full table as a JSON Lines snapshot.
pub(crate) fn encode_table(rows: &[Student]) -> Result<Vec<u8>> {
  let mut out = Vec::with_capacity(rows.len() * 256);
  for row in rows {
    serde_json::to_writer(&mut out, row)?;
    out.push(b'\n');
  }
  Ok(out)
}

/// Parse a JSON Lines snapshot. Blank lines are skipped; line numbers in
/// errors are 1-based.
pub(crate) fn decode_table(path: &Path, text: &str) -> Result<Vec<Student>> {
  text
    .lines()
    .enumerate()
    .filter(|(_, line)| !line.trim().is_empty())
    .map(|(idx, line)| {
      serde_json::from_str(line).map_err(|source| Error::Corrupt {
        path: path.to_path_buf(),
        line: idx + 1,
        source,
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use roster_core::student::NewStudent;

  use super::*;

  #[test]
  fn missing_values_are_null() {
    let row = Student::new(7, NewStudent {
      code: "SV007".into(),
      family_name: "Lê".into(),
      given_name: "Chi".into(),
      math_score: Some(0.0),
      ..Default::default()
    });
    let bytes = encode_table(&[row]).unwrap();
    let line = std::str::from_utf8(&bytes).unwrap();

    assert!(line.ends_with('\n'));
    assert!(line.contains(r#""email":null"#), "{line}");
    assert!(line.contains(r#""math_score":0.0"#), "{line}");
    assert!(line.contains(r#""average_score":0.0"#), "{line}");
    assert!(line.contains(r#""english_score":null"#), "{line}");
  }

  #[test]
  fn columns_keep_their_order() {
    let row = Student::new(1, NewStudent {
      code: "A".into(),
      family_name: "B".into(),
      given_name: "C".into(),
      ..Default::default()
    });
    let bytes = encode_table(&[row]).unwrap();
    let line = std::str::from_utf8(&bytes).unwrap();

    let positions: Vec<usize> = [
      "\"id\"", "\"code\"", "\"family_name\"", "\"given_name\"", "\"email\"",
      "\"birth_date\"", "\"hometown\"", "\"math_score\"",
      "\"literature_score\"", "\"english_score\"", "\"average_score\"",
    ]
    .iter()
    .map(|key| line.find(key).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{line}");
  }

  #[test]
  fn blank_lines_are_skipped() {
    let text = "\n{\"id\":1,\"code\":\"A\",\"family_name\":\"B\",\"given_name\":\"C\",\
      \"email\":null,\"birth_date\":null,\"hometown\":null,\"math_score\":null,\
      \"literature_score\":null,\"english_score\":null,\"average_score\":null}\n\n";
    let rows = decode_table(Path::new("t.jsonl"), text).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 1);
    assert_eq!(rows[0].email, None);
  }

  #[test]
  fn corrupt_line_reports_its_number() {
    let text = "\n\nnot json\n";
    let err = decode_table(Path::new("t.jsonl"), text).unwrap_err();
    assert!(matches!(err, Error::Corrupt { line: 3, .. }), "{err}");
  }
}
