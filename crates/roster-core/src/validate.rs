//! Input validation applied at the boundary before payloads reach a store.

use chrono::NaiveDate;

use crate::{
  Error, Result,
  student::{NewStudent, StudentPatch},
};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

impl NewStudent {
  pub fn validate(&self) -> Result<()> {
    required("code", &self.code)?;
    required("family_name", &self.family_name)?;
    required("given_name", &self.given_name)?;
    if let Some(email) = &self.email {
      email_address(email)?;
    }
    if let Some(date) = &self.birth_date {
      birth_date(date)?;
    }
    score("math_score", self.math_score)?;
    score("literature_score", self.literature_score)?;
    score("english_score", self.english_score)?;
    Ok(())
  }
}

impl StudentPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(code) = &self.code {
      required("code", code)?;
    }
    if let Some(name) = &self.family_name {
      required("family_name", name)?;
    }
    if let Some(name) = &self.given_name {
      required("given_name", name)?;
    }
    if let Some(Some(email)) = &self.email {
      email_address(email)?;
    }
    if let Some(Some(date)) = &self.birth_date {
      birth_date(date)?;
    }
    score("math_score", self.math_score.flatten())?;
    score("literature_score", self.literature_score.flatten())?;
    score("english_score", self.english_score.flatten())?;
    Ok(())
  }
}

fn required(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::MissingField(field));
  }
  Ok(())
}

fn score(field: &'static str, value: Option<f64>) -> Result<()> {
  match value {
    Some(v) if !(MIN_SCORE..=MAX_SCORE).contains(&v) => {
      Err(Error::ScoreOutOfRange { field, value: v })
    }
    _ => Ok(()),
  }
}

/// Accepts `local@domain.tld` with no whitespace; deliverability is not
/// checked.
fn email_address(value: &str) -> Result<()> {
  let invalid = || Error::InvalidEmail(value.to_owned());
  if value.chars().any(char::is_whitespace) {
    return Err(invalid());
  }
  let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
  if local.is_empty() || domain.contains('@') {
    return Err(invalid());
  }
  match domain.rsplit_once('.') {
    Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
    _ => Err(invalid()),
  }
}

fn birth_date(value: &str) -> Result<()> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .map(|_| ())
    .map_err(|_| Error::InvalidBirthDate(value.to_owned()))
}
