use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Ett registrerat supportärende
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    /// Datum i konfigurerad kalender, sätts när ärendet skapas
    pub date: String,
    pub subject: String,
    pub problem: String,
    pub solution: String,
}

impl Problem {
    /// Ämnesraden får inte vara tom efter trimning
    pub fn validate_subject(subject: &str) -> Result<(), AppError> {
        if subject.trim().is_empty() {
            return Err(AppError::validation("Ämnet får inte vara tomt"));
        }
        Ok(())
    }

    /// Förkorta text för listvyn
    pub fn preview(text: &str, max_chars: usize) -> String {
        if text.chars().count() > max_chars {
            let truncated: String = text.chars().take(max_chars).collect();
            format!("{}...", truncated)
        } else {
            text.to_string()
        }
    }

    pub fn problem_preview(&self, max_chars: usize) -> String {
        Self::preview(&self.problem, max_chars)
    }

    pub fn solution_preview(&self, max_chars: usize) -> String {
        Self::preview(&self.solution, max_chars)
    }
}

/// Vilka fält en sökning matchar mot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Subject,
    Problem,
    Solution,
}

impl SearchScope {
    pub fn all() -> &'static [SearchScope] {
        &[Self::All, Self::Subject, Self::Problem, Self::Solution]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::All => "Alla fält",
            Self::Subject => "Ämne",
            Self::Problem => "Problem",
            Self::Solution => "Lösning",
        }
    }

    /// WHERE-villkor för scopet; `?1` binds till `%nyckelord%`
    pub fn where_clause(&self) -> &'static str {
        match self {
            Self::All => "subject LIKE ?1 OR problem LIKE ?1 OR solution LIKE ?1",
            Self::Subject => "subject LIKE ?1",
            Self::Problem => "problem LIKE ?1",
            Self::Solution => "solution LIKE ?1",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "subject" => Some(Self::Subject),
            "problem" => Some(Self::Problem),
            "solution" => Some(Self::Solution),
            _ => None,
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Subject => write!(f, "subject"),
            Self::Problem => write!(f, "problem"),
            Self::Solution => write!(f, "solution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subject() {
        assert!(Problem::validate_subject("Skrivaren fastnar").is_ok());
        assert!(Problem::validate_subject("").unwrap_err().is_validation());
        assert!(Problem::validate_subject("  \t\n").unwrap_err().is_validation());
    }

    #[test]
    fn test_preview() {
        assert_eq!(Problem::preview("kort", 100), "kort");
        assert_eq!(Problem::preview("abcdef", 3), "abc...");
        // Teckenbaserat, inte bytebaserat
        assert_eq!(Problem::preview("چاپگر کار نمی‌کند", 5), "چاپگر...");
    }

    #[test]
    fn test_scope_keys() {
        for scope in SearchScope::all() {
            assert_eq!(SearchScope::from_key(&scope.to_string()), Some(*scope));
        }
        assert_eq!(SearchScope::from_key("Subject"), Some(SearchScope::Subject));
        assert_eq!(SearchScope::from_key("date"), None);
    }
}
