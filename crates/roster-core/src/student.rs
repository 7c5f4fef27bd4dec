//! Student records, the single entity of the Roster store.
//!
//! A record carries caller-supplied identity and scores plus one derived
//! field, `average_score`, which only the store ever writes.

use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned identity. Monotonic, never reused.
pub type StudentId = u64;

// ─── Record ──────────────────────────────────────────────────────────────────

/// One stored student row.
///
/// Field order is the persisted column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
  pub id:               StudentId,
  pub code:             String,
  pub family_name:      String,
  pub given_name:       String,
  pub email:            Option<String>,
  /// ISO `YYYY-MM-DD`, stored as opaque text.
  pub birth_date:       Option<String>,
  pub hometown:         Option<String>,
  pub math_score:       Option<f64>,
  pub literature_score: Option<f64>,
  pub english_score:    Option<f64>,
  /// Derived from the three scores; see [`average_of`].
  pub average_score:    Option<f64>,
}

impl Student {
  /// Build a record from a create payload, deriving `average_score`.
  pub fn new(id: StudentId, input: NewStudent) -> Self {
    let mut student = Self {
      id,
      code: input.code,
      family_name: input.family_name,
      given_name: input.given_name,
      email: input.email,
      birth_date: input.birth_date,
      hometown: input.hometown,
      math_score: input.math_score,
      literature_score: input.literature_score,
      english_score: input.english_score,
      average_score: None,
    };
    student.recompute_average();
    student
  }

  /// Overwrite only the fields present in `patch`, then re-derive
  /// `average_score` from the resulting scores.
  pub fn apply(&mut self, patch: StudentPatch) {
    if let Some(code) = patch.code {
      self.code = code;
    }
    if let Some(family_name) = patch.family_name {
      self.family_name = family_name;
    }
    if let Some(given_name) = patch.given_name {
      self.given_name = given_name;
    }
    if let Some(email) = patch.email {
      self.email = email;
    }
    if let Some(birth_date) = patch.birth_date {
      self.birth_date = birth_date;
    }
    if let Some(hometown) = patch.hometown {
      self.hometown = hometown;
    }
    if let Some(score) = patch.math_score {
      self.math_score = score;
    }
    if let Some(score) = patch.literature_score {
      self.literature_score = score;
    }
    if let Some(score) = patch.english_score {
      self.english_score = score;
    }
    self.recompute_average();
  }

  pub fn recompute_average(&mut self) {
    self.average_score =
      average_of(self.math_score, self.literature_score, self.english_score);
  }

  /// Whether `needle` (already lowercased) occurs in any searchable text
  /// field. Absent fields never match.
  pub fn matches(&self, needle: &str) -> bool {
    [
      Some(self.code.as_str()),
      Some(self.family_name.as_str()),
      Some(self.given_name.as_str()),
      self.email.as_deref(),
      self.hometown.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
  }
}

/// Mean of the present scores rounded to two decimals, or `None` when no
/// score is present. Exact ties round to even (8.625 -> 8.62).
pub fn average_of(
  math: Option<f64>,
  literature: Option<f64>,
  english: Option<f64>,
) -> Option<f64> {
  let present: Vec<f64> = [math, literature, english].into_iter().flatten().collect();
  if present.is_empty() {
    return None;
  }
  let mean = present.iter().sum::<f64>() / present.len() as f64;
  Some((mean * 100.0).round_ties_even() / 100.0)
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::StudentStore::create`].
/// `id` and `average_score` are always set by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
  pub code:             String,
  pub family_name:      String,
  pub given_name:       String,
  #[serde(default)]
  pub email:            Option<String>,
  #[serde(default)]
  pub birth_date:       Option<String>,
  #[serde(default)]
  pub hometown:         Option<String>,
  #[serde(default)]
  pub math_score:       Option<f64>,
  #[serde(default)]
  pub literature_score: Option<f64>,
  #[serde(default)]
  pub english_score:    Option<f64>,
}

/// Input to [`crate::store::StudentStore::update`].
///
/// Outer `None` leaves a field untouched. For nullable fields the inner
/// option distinguishes "set" from "clear": a JSON `null` deserializes to
/// `Some(None)`, a missing key to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub family_name:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub given_name:       Option<String>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub email:            Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub birth_date:       Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub hometown:         Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub math_score:       Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub literature_score: Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
  pub english_score:    Option<Option<f64>>,
}

/// A present key always yields `Some`, even when its value is `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// Result of [`crate::store::StudentStore::statistics`].
///
/// Each mean covers only the records where that field is present; a field
/// present nowhere yields `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
  pub total_students:       usize,
  pub avg_math_score:       Option<f64>,
  pub avg_literature_score: Option<f64>,
  pub avg_english_score:    Option<f64>,
  pub avg_average_score:    Option<f64>,
}

impl Statistics {
  pub fn from_students(students: &[Student]) -> Self {
    Self {
      total_students:       students.len(),
      avg_math_score:       mean(students.iter().map(|s| s.math_score)),
      avg_literature_score: mean(students.iter().map(|s| s.literature_score)),
      avg_english_score:    mean(students.iter().map(|s| s.english_score)),
      avg_average_score:    mean(students.iter().map(|s| s.average_score)),
    }
  }
}

fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
  let (sum, count) = values
    .flatten()
    .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
  (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> NewStudent {
    NewStudent {
      code: "SV001".into(),
      family_name: "Nguyễn Văn".into(),
      given_name: "An".into(),
      email: Some("an.nv@example.com".into()),
      birth_date: Some("2000-01-15".into()),
      hometown: Some("Hà Nội".into()),
      math_score: Some(8.5),
      literature_score: Some(7.0),
      english_score: Some(9.0),
    }
  }

  #[test]
  fn average_rounds_to_two_decimals() {
    assert_eq!(average_of(Some(8.5), Some(7.0), Some(9.0)), Some(8.17));
  }

  #[test]
  fn average_ties_round_to_even() {
    assert_eq!(average_of(Some(8.25), Some(9.0), None), Some(8.62));
    assert_eq!(average_of(Some(0.25), Some(0.0), None), Some(0.12));
    assert_eq!(average_of(Some(8.75), Some(9.0), None), Some(8.88));
  }

  #[test]
  fn average_uses_only_present_scores() {
    assert_eq!(average_of(Some(10.0), Some(7.0), None), Some(8.5));
    assert_eq!(average_of(None, None, Some(6.25)), Some(6.25));
    assert_eq!(average_of(None, Some(0.0), None), Some(0.0));
  }

  #[test]
  fn average_absent_iff_all_scores_absent() {
    assert_eq!(average_of(None, None, None), None);
  }

  #[test]
  fn new_derives_average() {
    let s = Student::new(1, sample());
    assert_eq!(s.id, 1);
    assert_eq!(s.average_score, Some(8.17));
  }

  #[test]
  fn patch_leaves_untouched_fields() {
    let mut s = Student::new(1, sample());
    s.apply(StudentPatch {
      hometown: Some(Some("Huế".into())),
      ..Default::default()
    });
    assert_eq!(s.hometown.as_deref(), Some("Huế"));
    assert_eq!(s.math_score, Some(8.5));
    assert_eq!(s.email.as_deref(), Some("an.nv@example.com"));
    assert_eq!(s.average_score, Some(8.17));
  }

  #[test]
  fn patching_a_score_recomputes_average() {
    let mut s = Student::new(1, NewStudent {
      english_score: None,
      ..sample()
    });
    assert_eq!(s.average_score, Some(7.75));

    s.apply(StudentPatch {
      math_score: Some(Some(10.0)),
      ..Default::default()
    });
    assert_eq!(s.average_score, Some(8.5));
  }

  #[test]
  fn clearing_every_score_clears_average() {
    let mut s = Student::new(1, sample());
    s.apply(StudentPatch {
      math_score: Some(None),
      literature_score: Some(None),
      english_score: Some(None),
      ..Default::default()
    });
    assert_eq!(s.average_score, None);
  }

  #[test]
  fn patch_distinguishes_null_from_missing() {
    let patch: StudentPatch =
      serde_json::from_str(r#"{"email": null, "math_score": 9.5}"#).unwrap();
    assert_eq!(patch.email, Some(None));
    assert_eq!(patch.math_score, Some(Some(9.5)));
    assert_eq!(patch.hometown, None);
    assert_eq!(patch.code, None);
  }

  #[test]
  fn search_is_case_insensitive_across_fields() {
    let s = Student::new(1, sample());
    assert!(s.matches(&"nội".to_lowercase()));
    assert!(s.matches(&"HÀ".to_lowercase()));
    assert!(s.matches("sv00"));
    assert!(s.matches("example.com"));
    assert!(!s.matches("đà nẵng"));
  }

  #[test]
  fn absent_fields_never_match() {
    let s = Student::new(1, NewStudent {
      email: None,
      hometown: None,
      ..sample()
    });
    assert!(!s.matches("example"));
  }

  #[test]
  fn statistics_over_empty_slice() {
    let stats = Statistics::from_students(&[]);
    assert_eq!(stats.total_students, 0);
    assert_eq!(stats.avg_math_score, None);
    assert_eq!(stats.avg_average_score, None);
  }

  #[test]
  fn statistics_skip_absent_values() {
    let a = Student::new(1, sample());
    let b = Student::new(2, NewStudent {
      code: "SV002".into(),
      math_score: Some(6.5),
      literature_score: None,
      english_score: None,
      ..sample()
    });
    let stats = Statistics::from_students(&[a, b]);
    assert_eq!(stats.total_students, 2);
    assert_eq!(stats.avg_math_score, Some(7.5));
    assert_eq!(stats.avg_literature_score, Some(7.0));
    assert_eq!(stats.avg_english_score, Some(9.0));
  }
}
