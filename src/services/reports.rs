//! Access and loan reports
//!
//! Report data is computed by the managers; rendering goes through
//! [`ReportTemplate`], which frames a type-specific body with a fixed header
//! and a timestamped footer. A new report only supplies `header` and `body`.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{Loan, LoanStatus, User};

/// Number of entries kept in each ranking
pub const TOP_ENTRIES: usize = 5;

pub trait ReportTemplate {
    fn header(&self) -> String;

    fn body(&self) -> String;

    fn footer(&self, generated_at: DateTime<Local>) -> String {
        format!(
            "Report generated at {}",
            generated_at.format("%d/%m/%Y %H:%M:%S")
        )
    }

    fn render_at(&self, generated_at: DateTime<Local>) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.header(),
            self.body(),
            self.footer(generated_at)
        )
    }

    fn render(&self) -> String {
        self.render_at(Local::now())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessEntry {
    pub login: String,
    pub is_admin: bool,
    pub access_count: u64,
}

/// Users ranked by access count, most active first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessReport {
    pub entries: Vec<AccessEntry>,
    pub total_users: usize,
    pub total_accesses: u64,
    /// Zero when there are no users
    pub mean_accesses: f64,
}

impl AccessReport {
    pub fn from_users(users: &[User]) -> Self {
        let mut entries: Vec<AccessEntry> = users
            .iter()
            .map(|user| AccessEntry {
                login: user.login.clone(),
                is_admin: user.is_admin,
                access_count: user.access_count,
            })
            .collect();
        // stable: equal counts keep registration order
        entries.sort_by(|a, b| b.access_count.cmp(&a.access_count));

        let total_accesses: u64 = entries.iter().map(|e| e.access_count).sum();
        let mean_accesses = if entries.is_empty() {
            0.0
        } else {
            total_accesses as f64 / entries.len() as f64
        };

        Self {
            total_users: entries.len(),
            total_accesses,
            mean_accesses,
            entries,
        }
    }
}

impl ReportTemplate for AccessReport {
    fn header(&self) -> String {
        "=== USER ACCESS REPORT ===".to_string()
    }

    fn body(&self) -> String {
        if self.entries.is_empty() {
            return "No users registered.".to_string();
        }
        let mut lines = vec![
            format!("Total users: {}", self.total_users),
            format!("Total accesses: {}", self.total_accesses),
            format!("Average accesses per user: {:.2}", self.mean_accesses),
            String::new(),
            "Accesses per user:".to_string(),
        ];
        for (rank, entry) in self.entries.iter().enumerate() {
            lines.push(format!(
                "{}. {} - {} access(es) - {}",
                rank + 1,
                entry.login,
                entry.access_count,
                if entry.is_admin { "Admin" } else { "Regular user" }
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub loans: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoanReport {
    pub total: usize,
    pub active: usize,
    pub returned: usize,
    pub top_users: Vec<RankedEntry>,
    /// Ranked by title, so editions sharing a title are counted together
    pub top_books: Vec<RankedEntry>,
}

impl LoanReport {
    /// `titles[i]` is the title of the book lent by `loans[i]`
    pub fn from_loans(loans: &[Loan], titles: &[String]) -> Self {
        let active = loans
            .iter()
            .filter(|loan| loan.status == LoanStatus::Active)
            .count();

        Self {
            total: loans.len(),
            active,
            returned: loans.len() - active,
            top_users: rank(loans.iter().map(|loan| loan.user_login.as_str())),
            top_books: rank(titles.iter().map(String::as_str)),
        }
    }
}

/// Count occurrences and keep the `TOP_ENTRIES` largest; ties stay in
/// first-seen order
fn rank<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<RankedEntry> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranked: Vec<RankedEntry> = counts
        .into_iter()
        .map(|(label, loans)| RankedEntry {
            label: label.to_string(),
            loans,
        })
        .collect();
    ranked.sort_by(|a, b| b.loans.cmp(&a.loans));
    ranked.truncate(TOP_ENTRIES);
    ranked
}

impl ReportTemplate for LoanReport {
    fn header(&self) -> String {
        "=== LOAN REPORT ===".to_string()
    }

    fn body(&self) -> String {
        if self.total == 0 {
            return "No loans recorded.".to_string();
        }
        let mut lines = vec![
            format!("Total loans: {}", self.total),
            format!("Active loans: {}", self.active),
            format!("Returned loans: {}", self.returned),
            String::new(),
            "Top users by number of loans:".to_string(),
        ];
        for (rank, entry) in self.top_users.iter().enumerate() {
            lines.push(format!("{}. {} - {} loan(s)", rank + 1, entry.label, entry.loans));
        }
        lines.push(String::new());
        lines.push("Most borrowed books:".to_string());
        for (rank, entry) in self.top_books.iter().enumerate() {
            lines.push(format!("{}. {} - {} loan(s)", rank + 1, entry.label, entry.loans));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Book;
    use chrono::{TimeZone, Utc};

    fn user(login: &str, accesses: u64) -> User {
        let mut user = User::new(login, "Abc123!5", false);
        user.access_count = accesses;
        user
    }

    fn loan(code: &str, login: &str, book_code: &str) -> Loan {
        let book = Book {
            code: book_code.into(),
            title: String::new(),
            author: String::new(),
            year: 2000,
            quantity: 1,
            available: 1,
        };
        Loan::new(code, &user(login, 0), &book, Utc::now())
    }

    #[test]
    fn test_access_report_sorts_and_averages() {
        let report = AccessReport::from_users(&[user("ann", 1), user("bob", 4), user("cid", 1)]);
        let logins: Vec<_> = report.entries.iter().map(|e| e.login.as_str()).collect();

        assert_eq!(logins, ["bob", "ann", "cid"]);
        assert_eq!(report.total_accesses, 6);
        assert!((report.mean_accesses - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_access_report_empty() {
        let report = AccessReport::from_users(&[]);
        assert_eq!(report.mean_accesses, 0.0);
        assert_eq!(report.body(), "No users registered.");
    }

    #[test]
    fn test_loan_report_counts_and_ranks() {
        let mut loans = vec![
            loan("L1", "ann", "B1"),
            loan("L2", "bob", "B2"),
            loan("L3", "bob", "B1"),
        ];
        loans[0].mark_returned(Utc::now());
        let titles = vec!["Dune".to_string(), "Emma".to_string(), "Dune".to_string()];

        let report = LoanReport::from_loans(&loans, &titles);
        assert_eq!((report.total, report.active, report.returned), (3, 2, 1));
        assert_eq!(report.top_users[0], RankedEntry { label: "bob".into(), loans: 2 });
        assert_eq!(report.top_books[0], RankedEntry { label: "Dune".into(), loans: 2 });
    }

    #[test]
    fn test_ranking_keeps_five_with_first_seen_ties() {
        let labels = ["f", "e", "d", "c", "b", "a", "a"];
        let ranked = rank(labels.into_iter());
        let order: Vec<_> = ranked.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(order, ["a", "f", "e", "d", "c"]);
    }

    #[test]
    fn test_render_frames_body() {
        let report = LoanReport::from_loans(&[], &[]);
        let at = Local.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        assert_eq!(
            report.render_at(at),
            "=== LOAN REPORT ===\n\nNo loans recorded.\n\nReport generated at 06/05/2024 07:08:09"
        );
    }
}
