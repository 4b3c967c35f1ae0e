use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A school-year identifier such as `2024`.
///
/// The store keeps academic years as text. The year is parsed once into an
/// integer here and formatted back with `Display` whenever it is bound to a
/// query, so arithmetic such as `previous()` never relies on the database
/// coercing between text and integers.
///
/// Only four-digit years are accepted: the store orders years as text, which is
/// only chronological for a fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicYear(i32);

impl AcademicYear {
    pub const MIN: i32 = 1000;
    pub const MAX: i32 = 9999;

    pub fn new(year: i32) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&year) {
            Ok(Self(year))
        } else {
            Err(CoreError::InvalidInput(
                "academicYear".to_string(),
                format!("{year} is not a four-digit year"),
            ))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// The academic year immediately before this one.
    pub fn previous(self) -> Result<Self, CoreError> {
        Self::new(self.0 - 1)
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AcademicYear {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let year = s.trim().parse::<i32>().map_err(|_| {
            CoreError::InvalidInput("academicYear".to_string(), format!("'{s}' is not a year"))
        })?;
        Self::new(year)
    }
}

impl TryFrom<String> for AcademicYear {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AcademicYear> for String {
    fn from(year: AcademicYear) -> Self {
        year.to_string()
    }
}

/// A sub-period within an academic year, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Semester(i32);

impl Semester {
    pub fn new(semester: i32) -> Result<Self, CoreError> {
        if semester >= 1 {
            Ok(Self(semester))
        } else {
            Err(CoreError::InvalidInput(
                "semester".to_string(),
                format!("{semester} must be a positive number"),
            ))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Semester {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Semester> for i32 {
    fn from(semester: Semester) -> Self {
        semester.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_back_to_store_representation() {
        let year: AcademicYear = "2024".parse().unwrap();
        assert_eq!(year.value(), 2024);
        assert_eq!(year.to_string(), "2024");
        assert_eq!(" 2023 ".parse::<AcademicYear>().unwrap().value(), 2023);
    }

    #[test]
    fn previous_year_is_explicit_integer_arithmetic() {
        let year = AcademicYear::new(2024).unwrap();
        assert_eq!(year.previous().unwrap().to_string(), "2023");
        assert!(AcademicYear::new(AcademicYear::MIN).unwrap().previous().is_err());
    }

    #[test]
    fn rejects_malformed_years() {
        assert!("twenty".parse::<AcademicYear>().is_err());
        assert!("2024-2025".parse::<AcademicYear>().is_err());
        assert!("999".parse::<AcademicYear>().is_err());
        assert!("".parse::<AcademicYear>().is_err());
    }

    #[test]
    fn semesters_are_positive() {
        assert_eq!(Semester::new(2).unwrap().value(), 2);
        assert!(Semester::new(0).is_err());
        assert!(Semester::try_from(-1).is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let year: AcademicYear = serde_json::from_str("\"2022\"").unwrap();
        assert_eq!(year.value(), 2022);
        assert!(serde_json::from_str::<AcademicYear>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Semester>("0").is_err());
    }
}
