//! The in-memory student table and its invariants.
//!
//! Everything here is synchronous; [`crate::FileStore`] wraps a [`Table`] in
//! a lock and flushes it after each mutation.

use std::collections::HashSet;

use roster_core::{
  store::DEFAULT_LIMIT,
  student::{NewStudent, Statistics, Student, StudentId, StudentPatch},
};

#[derive(Debug, Default)]
pub(crate) struct Table {
  rows:       Vec<Student>,
  /// Highest id ever handed out by this table, deleted or not.
  high_water: StudentId,
}

impl Table {
  /// Build a table from persisted rows, rejecting repeated ids.
  ///
  /// Returns the first repeated id as the error.
  pub(crate) fn from_rows(rows: Vec<Student>) -> Result<Self, StudentId> {
    let mut seen = HashSet::with_capacity(rows.len());
    for row in &rows {
      if !seen.insert(row.id) {
        return Err(row.id);
      }
    }
    let high_water = rows.iter().map(|r| r.id).max().unwrap_or(0);
    Ok(Self { rows, high_water })
  }

  pub(crate) fn rows(&self) -> &[Student] { &self.rows }

  pub(crate) fn len(&self) -> usize { self.rows.len() }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub(crate) fn page(&self, skip: usize, limit: usize) -> Vec<Student> {
    self.rows.iter().skip(skip).take(limit).cloned().collect()
  }

  pub(crate) fn get(&self, id: StudentId) -> Option<&Student> {
    self.rows.iter().find(|r| r.id == id)
  }

  pub(crate) fn get_by_code(&self, code: &str) -> Option<&Student> {
    self.rows.iter().find(|r| r.code == code)
  }

  pub(crate) fn search(&self, keyword: Option<&str>) -> Vec<Student> {
    match keyword {
      None | Some("") => self.page(0, DEFAULT_LIMIT),
      Some(keyword) => {
        let needle = keyword.to_lowercase();
        self.rows.iter().filter(|r| r.matches(&needle)).cloned().collect()
      }
    }
  }

  pub(crate) fn statistics(&self) -> Statistics { Statistics::from_students(&self.rows) }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Append a new record under the next id.
  ///
  /// Fails with `DuplicateCode` without touching the table.
  pub(crate) fn insert(&mut self, input: NewStudent) -> roster_core::Result<Student> {
    if self.get_by_code(&input.code).is_some() {
      return Err(roster_core::Error::DuplicateCode(input.code));
    }
    self.high_water += 1;
    let student = Student::new(self.high_water, input);
    self.rows.push(student.clone());
    Ok(student)
  }

  /// Merge `patch` into record `id`. `Ok(None)` if the id is unknown.
  pub(crate) fn update(
    &mut self,
    id: StudentId,
    patch: StudentPatch,
  ) -> roster_core::Result<Option<Student>> {
    if self.get(id).is_none() {
      return Ok(None);
    }
    if let Some(code) = &patch.code {
      if self.rows.iter().any(|r| r.id != id && &r.code == code) {
        return Err(roster_core::Error::DuplicateCode(code.clone()));
      }
    }

    let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
      return Ok(None);
    };
    row.apply(patch);
    Ok(Some(row.clone()))
  }

  pub(crate) fn remove(&mut self, id: StudentId) -> bool {
    match self.rows.iter().position(|r| r.id == id) {
      Some(idx) => {
        self.rows.remove(idx);
        true
      }
      None => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn input(code: &str) -> NewStudent {
    NewStudent {
      code: code.into(),
      family_name: "Phạm".into(),
      given_name: "Dũng".into(),
      ..Default::default()
    }
  }

  #[test]
  fn ids_are_never_recycled() {
    let mut t = Table::default();
    let a = t.insert(input("A")).unwrap();
    let b = t.insert(input("B")).unwrap();
    assert_eq!((a.id, b.id), (1, 2));

    assert!(t.remove(a.id));
    assert!(t.remove(b.id));
    assert_eq!(t.len(), 0);

    let c = t.insert(input("C")).unwrap();
    assert_eq!(c.id, 3);
  }

  #[test]
  fn high_water_is_rebuilt_from_rows() {
    let mut t = Table::default();
    t.insert(input("A")).unwrap();
    t.insert(input("B")).unwrap();
    t.insert(input("C")).unwrap();
    t.remove(2);

    let mut reloaded = Table::from_rows(t.rows().to_vec()).unwrap();
    assert_eq!(reloaded.insert(input("D")).unwrap().id, 4);
  }

  #[test]
  fn repeated_ids_are_rejected() {
    let mut t = Table::default();
    let a = t.insert(input("A")).unwrap();
    let mut b = t.insert(input("B")).unwrap();
    b.id = a.id;
    assert_eq!(Table::from_rows(vec![a, b]).unwrap_err(), 1);
  }

  #[test]
  fn duplicate_code_on_insert_leaves_table_unchanged() {
    let mut t = Table::default();
    t.insert(input("A")).unwrap();
    let err = t.insert(input("A")).unwrap_err();
    assert!(matches!(err, roster_core::Error::DuplicateCode(code) if code == "A"));
    assert_eq!(t.len(), 1);
    assert_eq!(t.insert(input("B")).unwrap().id, 2);
  }

  #[test]
  fn update_onto_another_code_is_rejected() {
    let mut t = Table::default();
    t.insert(input("A")).unwrap();
    let b = t.insert(input("B")).unwrap();

    let patch = StudentPatch { code: Some("A".into()), ..Default::default() };
    assert!(t.update(b.id, patch).is_err());
    assert_eq!(t.get(b.id).unwrap().code, "B");
  }

  #[test]
  fn update_keeping_own_code_is_allowed() {
    let mut t = Table::default();
    let a = t.insert(input("A")).unwrap();
    let patch = StudentPatch {
      code: Some("A".into()),
      given_name: Some("Em".into()),
      ..Default::default()
    };
    let updated = t.update(a.id, patch).unwrap().unwrap();
    assert_eq!(updated.given_name, "Em");
  }

  #[test]
  fn update_unknown_id_is_none() {
    let mut t = Table::default();
    t.insert(input("A")).unwrap();
    let patch = StudentPatch { code: Some("A".into()), ..Default::default() };
    assert!(t.update(99, patch).unwrap().is_none());
    assert!(t.update(99, StudentPatch::default()).unwrap().is_none());
  }

  #[test]
  fn empty_keyword_is_the_default_page() {
    let mut t = Table::default();
    for i in 0..(DEFAULT_LIMIT + 5) {
      t.insert(input(&format!("SV{i:03}"))).unwrap();
    }
    assert_eq!(t.search(None), t.page(0, DEFAULT_LIMIT));
    assert_eq!(t.search(Some("")), t.page(0, DEFAULT_LIMIT));
    assert_eq!(t.search(Some("sv")).len(), DEFAULT_LIMIT + 5);
  }

  #[test]
  fn page_past_the_end_is_empty() {
    let mut t = Table::default();
    t.insert(input("A")).unwrap();
    assert!(t.page(5, 10).is_empty());
    assert_eq!(t.page(0, 0).len(), 0);
  }
}
