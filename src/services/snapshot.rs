//! Backupformatet: en JSON-lista med `[id, date, subject, problem, solution]`
//!
//! Texten skrivs som rå UTF-8 (icke-ASCII escapas inte) med fyra mellanslags
//! indrag, samma format som äldre versioner av programmet producerade.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::models::Problem;
use crate::utils::error::ImportError;

/// Antal fält per post
pub const FIELD_COUNT: usize = 5;

/// Serialisera ärenden i given ordning
pub fn encode(problems: &[Problem]) -> Result<Vec<u8>, serde_json::Error> {
    let rows: Vec<(i64, &str, &str, &str, &str)> = problems
        .iter()
        .map(|p| (p.id, p.date.as_str(), p.subject.as_str(), p.problem.as_str(), p.solution.as_str()))
        .collect();

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    rows.serialize(&mut serializer)?;

    Ok(buffer)
}

/// Läs och validera en backup; inga sidoeffekter
pub fn decode(bytes: &[u8]) -> Result<Vec<Problem>, ImportError> {
    let rows: Vec<Value> = serde_json::from_slice(bytes)?;

    rows.into_iter()
        .enumerate()
        .map(|(index, value)| decode_row(index, value))
        .collect()
}

fn decode_row(index: usize, value: Value) -> Result<Problem, ImportError> {
    let Value::Array(fields) = value else {
        return Err(ImportError::shape(index, "posten är ingen lista"));
    };

    if fields.len() != FIELD_COUNT {
        return Err(ImportError::shape(
            index,
            format!("förväntade {} fält, fick {}", FIELD_COUNT, fields.len()),
        ));
    }

    let mut fields = fields.into_iter();
    let id = fields
        .next()
        .and_then(|v| v.as_i64())
        .ok_or_else(|| ImportError::shape(index, "id måste vara ett heltal"))?;

    let mut text = |name: &str| -> Result<String, ImportError> {
        match fields.next() {
            Some(Value::String(s)) => Ok(s),
            // Tomma kolumner i äldre backuper
            Some(Value::Null) => Ok(String::new()),
            _ => Err(ImportError::shape(index, format!("{} måste vara text", name))),
        }
    };

    let date = text("date")?;
    let subject = text("subject")?;
    if Problem::validate_subject(&subject).is_err() {
        return Err(ImportError::shape(index, "ämnet får inte vara tomt"));
    }

    Ok(Problem {
        id,
        date,
        subject,
        problem: text("problem")?,
        solution: text("solution")?,
    })
}
