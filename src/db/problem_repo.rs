use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use super::schema::PROBLEM_COLUMNS;
use crate::models::{Problem, SearchScope};
use crate::utils::date::Calendar;
use crate::utils::error::{AppError, AppResult, ImportError};

pub struct ProblemRepository {
    conn: Arc<Mutex<Connection>>,
    calendar: Calendar,
}

impl ProblemRepository {
    pub fn new(conn: Arc<Mutex<Connection>>, calendar: Calendar) -> Self {
        Self { conn, calendar }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        super::lock(&self.conn)
    }

    /// Skapa nytt ärende, datum sätts till dagens datum
    pub fn create(&self, subject: &str, problem: &str, solution: &str) -> AppResult<i64> {
        Problem::validate_subject(subject)?;
        let date = self.calendar.today();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO problems (date, subject, problem, solution) VALUES (?1, ?2, ?3, ?4)",
            params![date, subject, problem, solution],
        )?;

        let id = conn.last_insert_rowid();
        info!("Skapade ärende {} ({})", id, date);

        Ok(id)
    }

    /// Hämta ärende via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Problem>> {
        let conn = self.lock()?;
        let problem = conn
            .query_row(
                &format!("SELECT {} FROM problems WHERE id = ?", PROBLEM_COLUMNS),
                [id],
                Self::row_to_problem,
            )
            .optional()?;

        Ok(problem)
    }

    /// Hämta ärende, `NotFound` om det saknas
    pub fn get(&self, id: i64) -> AppResult<Problem> {
        self.find_by_id(id)?.ok_or(AppError::NotFound(id))
    }

    /// Skriv över alla redigerbara fält i en transaktion
    pub fn update(
        &self,
        id: i64,
        date: &str,
        subject: &str,
        problem: &str,
        solution: &str,
    ) -> AppResult<()> {
        Problem::validate_subject(subject)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let rows = tx.execute(
            "UPDATE problems SET date = ?1, subject = ?2, problem = ?3, solution = ?4
             WHERE id = ?5",
            params![date, subject, problem, solution, id],
        )?;

        if rows == 0 {
            return Err(AppError::NotFound(id));
        }

        tx.commit()?;
        info!("Uppdaterade ärende {}", id);

        Ok(())
    }

    /// Ta bort ärende; okänt ID är inget fel
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.lock()?;
        let rows = conn.execute("DELETE FROM problems WHERE id = ?", [id])?;

        if rows == 0 {
            debug!("Ärende {} fanns inte, inget att ta bort", id);
        } else {
            info!("Tog bort ärende {}", id);
        }

        Ok(())
    }

    /// Senast skapade ärenden först
    pub fn list_recent(&self, limit: u32) -> AppResult<Vec<Problem>> {
        if limit == 0 {
            return Err(AppError::validation("Antal ärenden måste vara minst 1"));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM problems ORDER BY id DESC LIMIT ?",
            PROBLEM_COLUMNS
        ))?;

        let problems = stmt
            .query_map([limit], Self::row_to_problem)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(problems)
    }

    /// Delsträngssökning med SQL LIKE (`%nyckelord%`, jokertecken escapas inte)
    ///
    /// Ett tomt nyckelord matchar alla ärenden.
    pub fn search(&self, keyword: &str, scope: SearchScope) -> AppResult<Vec<Problem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM problems WHERE {} ORDER BY id DESC",
            PROBLEM_COLUMNS,
            scope.where_clause()
        ))?;

        let pattern = format!("%{}%", keyword);
        let problems = stmt
            .query_map([pattern], Self::row_to_problem)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Sökning {:?} i {} gav {} träffar", keyword, scope, problems.len());

        Ok(problems)
    }

    /// Hela tabellen i ID-ordning
    pub fn find_all(&self) -> AppResult<Vec<Problem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM problems ORDER BY id ASC",
            PROBLEM_COLUMNS
        ))?;

        let problems = stmt
            .query_map([], Self::row_to_problem)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(problems)
    }

    /// Räkna antal ärenden
    pub fn count(&self) -> AppResult<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM problems", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Ersätt hela tabellen med givna ärenden, ID:n bevaras
    ///
    /// Allt eller inget: vid fel rullas transaktionen tillbaka.
    pub fn replace_all(&self, problems: &[Problem]) -> Result<usize, ImportError> {
        let mut conn = self.conn.lock().map_err(|_| ImportError::LockPoisoned)?;

        let replace = |conn: &mut Connection| -> rusqlite::Result<usize> {
            let tx = conn.transaction()?;
            let removed = tx.execute("DELETE FROM problems", [])?;
            {
                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO problems ({}) VALUES (?1, ?2, ?3, ?4, ?5)",
                    PROBLEM_COLUMNS
                ))?;
                for p in problems {
                    stmt.execute(params![p.id, p.date, p.subject, p.problem, p.solution])?;
                }
            }
            tx.commit()?;
            Ok(removed)
        };

        let removed = replace(&mut *conn)?;
        info!("Ersatte {} ärenden med {} från backup", removed, problems.len());

        Ok(problems.len())
    }

    // Äldre databaser kan ha NULL i textkolumnerna
    fn row_to_problem(row: &Row) -> rusqlite::Result<Problem> {
        Ok(Problem {
            id: row.get(0)?,
            date: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            subject: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            problem: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            solution: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn subjects(problems: &[Problem]) -> Vec<&str> {
        problems.iter().map(|p| p.subject.as_str()).collect()
    }

    #[test]
    fn test_create_and_get() {
        let db = setup_db();
        let repo = db.problems();

        let id = repo
            .create("Skrivaren fastnar", "Papper i fack 2", "Rensade valsen")
            .unwrap();
        assert!(id > 0);

        let problem = repo.get(id).unwrap();
        assert_eq!(problem.id, id);
        assert_eq!(problem.subject, "Skrivaren fastnar");
        assert_eq!(problem.problem, "Papper i fack 2");
        assert_eq!(problem.solution, "Rensade valsen");
        assert_eq!(problem.date, Calendar::Jalali.today());
    }

    #[test]
    fn test_create_uses_configured_calendar() {
        let db = setup_db().with_calendar(Calendar::Gregorian);
        let repo = db.problems();

        let id = repo.create("Lösenord", "", "").unwrap();
        assert_eq!(repo.get(id).unwrap().date, Calendar::Gregorian.today());
    }

    #[test]
    fn test_create_rejects_empty_subject() {
        let db = setup_db();
        let repo = db.problems();

        assert!(repo.create("", "p", "s").unwrap_err().is_validation());
        assert!(repo.create("   ", "p", "s").unwrap_err().is_validation());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let db = setup_db();
        let repo = db.problems();

        assert!(repo.get(42).unwrap_err().is_not_found());
        assert!(repo.find_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_update() {
        let db = setup_db();
        let repo = db.problems();

        let id = repo.create("Mejl", "Synkar inte", "").unwrap();
        repo.update(id, "1403-01-02", "Mejl i Outlook", "Synkar inte", "Nytt konto")
            .unwrap();

        let problem = repo.get(id).unwrap();
        assert_eq!(problem.date, "1403-01-02");
        assert_eq!(problem.subject, "Mejl i Outlook");
        assert_eq!(problem.solution, "Nytt konto");
    }

    #[test]
    fn test_update_errors_leave_row_untouched() {
        let db = setup_db();
        let repo = db.problems();

        let id = repo.create("Mejl", "Synkar inte", "").unwrap();
        let before = repo.get(id).unwrap();

        let err = repo.update(id, "1403-01-02", "  ", "x", "y").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repo.get(id).unwrap(), before);

        let err = repo.update(id + 100, "1403-01-02", "Annat", "x", "y").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_delete() {
        let db = setup_db();
        let repo = db.problems();

        let id = repo.create("Nätverk", "", "").unwrap();
        repo.delete(id).unwrap();
        assert!(repo.get(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_unknown_is_noop() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("Nätverk", "", "").unwrap();
        repo.delete(9999).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let db = setup_db();
        let repo = db.problems();

        let first = repo.create("Ett", "", "").unwrap();
        let second = repo.create("Två", "", "").unwrap();
        repo.delete(second).unwrap();

        let third = repo.create("Tre", "", "").unwrap();
        assert!(third > second);
        assert!(second > first);
    }

    #[test]
    fn test_list_recent() {
        let db = setup_db();
        let repo = db.problems();

        for subject in ["Ett", "Två", "Tre", "Fyra"] {
            repo.create(subject, "", "").unwrap();
        }

        let recent = repo.list_recent(2).unwrap();
        assert_eq!(subjects(&recent), vec!["Fyra", "Tre"]);

        let all = repo.list_recent(100).unwrap();
        assert_eq!(all.len(), 4);

        assert!(repo.list_recent(0).unwrap_err().is_validation());
    }

    #[test]
    fn test_search_subject_scope() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("Printer jam", "", "").unwrap();
        repo.create("Disk full", "printer spooler fills disk", "").unwrap();
        repo.create("Printer offline", "", "").unwrap();

        let results = repo.search("printer", SearchScope::Subject).unwrap();
        assert_eq!(subjects(&results), vec!["Printer offline", "Printer jam"]);

        let results = repo.search("DISK", SearchScope::Subject).unwrap();
        assert_eq!(subjects(&results), vec!["Disk full"]);
    }

    #[test]
    fn test_search_scopes() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("VPN", "Tunnel går ner", "Uppdatera klient").unwrap();
        repo.create("Skrivare", "Klient hittar ingen skrivare", "Drivrutin").unwrap();
        repo.create("Mejl", "Kvoten full", "Arkivera").unwrap();

        let all = repo.search("klient", SearchScope::All).unwrap();
        assert_eq!(subjects(&all), vec!["Skrivare", "VPN"]);

        let problem = repo.search("klient", SearchScope::Problem).unwrap();
        assert_eq!(subjects(&problem), vec!["Skrivare"]);

        let solution = repo.search("klient", SearchScope::Solution).unwrap();
        assert_eq!(subjects(&solution), vec!["VPN"]);
    }

    #[test]
    fn test_search_empty_keyword_matches_all() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("Ett", "", "").unwrap();
        repo.create("Två", "", "").unwrap();

        let results = repo.search("", SearchScope::All).unwrap();
        assert_eq!(subjects(&results), vec!["Två", "Ett"]);
    }

    #[test]
    fn test_search_wildcards_are_not_escaped() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("100% CPU", "", "").unwrap();
        repo.create("Disk 100 GB", "", "").unwrap();

        // `%` i nyckelordet fungerar som jokertecken
        let results = repo.search("100%", SearchScope::Subject).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_search_non_ascii() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("چاپگر کار نمی‌کند", "کاغذ گیر کرده", "").unwrap();
        repo.create("Mejl", "", "").unwrap();

        let results = repo.search("چاپگر", SearchScope::All).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].problem, "کاغذ گیر کرده");
    }

    #[test]
    fn test_replace_all_preserves_ids() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("Gammal", "", "").unwrap();

        let incoming = vec![
            Problem {
                id: 7,
                date: "1402-05-01".into(),
                subject: "Sju".into(),
                problem: "p".into(),
                solution: "s".into(),
            },
            Problem {
                id: 3,
                date: "1402-04-01".into(),
                subject: "Tre".into(),
                problem: String::new(),
                solution: String::new(),
            },
        ];

        assert_eq!(repo.replace_all(&incoming).unwrap(), 2);

        let all = repo.find_all().unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(repo.get(7).unwrap(), incoming[0]);
    }

    #[test]
    fn test_replace_all_rolls_back_on_duplicate_id() {
        let db = setup_db();
        let repo = db.problems();

        repo.create("Kvar", "", "").unwrap();
        let before = repo.find_all().unwrap();

        let dup = Problem {
            id: 5,
            date: String::new(),
            subject: "Dubblett".into(),
            problem: String::new(),
            solution: String::new(),
        };
        let err = repo.replace_all(&[dup.clone(), dup]).unwrap_err();
        assert!(matches!(err, ImportError::Storage(_)));

        assert_eq!(repo.find_all().unwrap(), before);
    }

    #[test]
    fn test_replace_all_with_poisoned_lock_is_import_error() {
        let db = setup_db();
        let held = db.clone();
        let _ = std::thread::spawn(move || {
            let _guard = held.conn_for_tests();
            panic!("avbruten mitt i en operation");
        })
        .join();

        let err = db.problems().replace_all(&[]).unwrap_err();
        assert!(matches!(err, ImportError::LockPoisoned));
        assert!(matches!(db.problems().count(), Err(AppError::LockPoisoned)));
    }

    #[test]
    fn test_legacy_null_columns_read_as_empty() {
        let db = setup_db();
        db.problems().create("Placeholder", "", "").unwrap();

        let conn = db.conn_for_tests();
        conn.execute(
            "INSERT INTO problems (date, subject, problem, solution) VALUES (NULL, 'Gammal', NULL, NULL)",
            [],
        )
        .unwrap();
        drop(conn);

        let recent = db.problems().list_recent(1).unwrap();
        assert_eq!(recent[0].subject, "Gammal");
        assert_eq!(recent[0].date, "");
        assert_eq!(recent[0].problem, "");
    }
}
