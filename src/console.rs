//! Text-menu front end
//!
//! Holds no business rules: every screen reads its fields, calls one
//! [`Library`] operation and prints the outcome. Generic over the reader and
//! writer so sessions can be scripted.

use std::io::{self, BufRead, ErrorKind, Write};

use chrono::Utc;
use thiserror::Error;

use crate::{
    error::AppError,
    models::{CreateBook, UpdateBook, User},
    services::{reports::ReportTemplate, Library},
};

#[derive(Error, Debug)]
enum ConsoleError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("{0}")]
    Input(String),
}

type ConsoleResult<T> = Result<T, ConsoleError>;

pub struct Console<'a, R, W> {
    library: &'a mut Library,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(library: &'a mut Library, input: R, output: W) -> Self {
        Self {
            library,
            input,
            output,
        }
    }

    /// Run until the user quits or the input ends
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== LIBRARY MANAGEMENT SYSTEM ===")?;
        match self.main_menu() {
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(()),
            other => other,
        }
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== MAIN MENU ===\n1. Login\n2. Quit")?;
            match self.ask("Choose an option")?.as_str() {
                "1" => {
                    if let Some(user) = self.login()? {
                        if user.is_admin {
                            self.admin_menu()?;
                        } else {
                            self.user_menu(&user)?;
                        }
                    }
                }
                "2" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid option.")?,
            }
        }
    }

    fn login(&mut self) -> io::Result<Option<User>> {
        let login = self.ask("Login")?;
        let password = self.ask("Password")?;
        match self.library.authenticate(&login, &password) {
            Ok(Some(user)) => {
                writeln!(self.output, "Welcome, {}!", user.login)?;
                Ok(Some(user))
            }
            Ok(None) => {
                writeln!(self.output, "Wrong login or password.")?;
                Ok(None)
            }
            Err(e) => {
                self.report_error(&e)?;
                Ok(None)
            }
        }
    }

    fn admin_menu(&mut self) -> io::Result<()> {
        loop {
            writeln!(
                self.output,
                "\n=== ADMIN MENU ===\n\
                 1. List users\n2. Register user\n3. Update user\n4. Delete user\n5. Undo last user update\n\
                 6. List books\n7. Register book\n8. Update book\n9. Delete book\n10. Undo last book update\n\
                 11. Issue loan\n12. Return loan\n13. List loans\n\
                 14. Access report\n15. Loan report\n16. Operation history\n0. Logout"
            )?;
            let outcome = match self.ask("Choose an option")?.as_str() {
                "1" => self.list_users(),
                "2" => self.register_user(),
                "3" => self.update_user(),
                "4" => self.delete_user(),
                "5" => self.undo_user_update(),
                "6" => self.list_books(),
                "7" => self.register_book(),
                "8" => self.update_book(),
                "9" => self.delete_book(),
                "10" => self.undo_book_update(),
                "11" => self.issue_loan(),
                "12" => self.return_loan(),
                "13" => self.list_loans(),
                "14" => self.access_report(),
                "15" => self.loan_report(),
                "16" => self.show_history(),
                "0" => return Ok(()),
                _ => Err(ConsoleError::Input("Invalid option.".to_string())),
            };
            self.settle(outcome)?;
        }
    }

    fn user_menu(&mut self, user: &User) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== USER MENU ===\n1. List books\n2. My loans\n0. Logout")?;
            let outcome = match self.ask("Choose an option")?.as_str() {
                "1" => self.list_books(),
                "2" => self.list_user_loans(&user.login),
                "0" => return Ok(()),
                _ => Err(ConsoleError::Input("Invalid option.".to_string())),
            };
            self.settle(outcome)?;
        }
    }

    fn list_users(&mut self) -> ConsoleResult<()> {
        let users = self.library.find_all_users()?;
        self.print_all(&users, "No users registered.")
    }

    fn register_user(&mut self) -> ConsoleResult<()> {
        let login = self.ask("Login")?;
        let password = self.ask("Password")?;
        let is_admin = self.ask_yes_no("Administrator")?;
        let user = self.library.register_user(&login, &password, is_admin)?;
        writeln!(self.output, "Registered {}", user)?;
        Ok(())
    }

    fn update_user(&mut self) -> ConsoleResult<()> {
        let login = self.ask("Login")?;
        let password = self.ask("New password")?;
        let is_admin = self.ask_yes_no("Administrator")?;
        let user = self.library.update_user(&login, &password, is_admin)?;
        writeln!(self.output, "Updated {}", user)?;
        Ok(())
    }

    fn delete_user(&mut self) -> ConsoleResult<()> {
        let login = self.ask("Login")?;
        self.library.delete_user(&login)?;
        writeln!(self.output, "User '{}' deleted.", login)?;
        Ok(())
    }

    fn undo_user_update(&mut self) -> ConsoleResult<()> {
        let user = self.library.undo_user_update(None)?;
        writeln!(self.output, "Restored {}", user)?;
        Ok(())
    }

    fn list_books(&mut self) -> ConsoleResult<()> {
        let books = self.library.find_all_books()?;
        self.print_all(&books, "No books registered.")
    }

    fn register_book(&mut self) -> ConsoleResult<()> {
        let code = self.ask("Code")?;
        let title = self.ask("Title")?;
        let author = self.ask("Author")?;
        let year = self.ask_number("Year")?;
        let quantity = self.ask_number("Quantity")?;
        let book = self.library.register_book(CreateBook {
            code,
            title,
            author,
            year,
            quantity,
        })?;
        writeln!(self.output, "Registered {}", book)?;
        Ok(())
    }

    fn update_book(&mut self) -> ConsoleResult<()> {
        let code = self.ask("Code")?;
        let title = self.ask("Title")?;
        let author = self.ask("Author")?;
        let year = self.ask_number("Year")?;
        let quantity = self.ask_number("Quantity")?;
        let book = self.library.update_book(
            &code,
            UpdateBook {
                title,
                author,
                year,
                quantity,
            },
        )?;
        writeln!(self.output, "Updated {}", book)?;
        Ok(())
    }

    fn delete_book(&mut self) -> ConsoleResult<()> {
        let code = self.ask("Code")?;
        self.library.delete_book(&code)?;
        writeln!(self.output, "Book '{}' deleted.", code)?;
        Ok(())
    }

    fn undo_book_update(&mut self) -> ConsoleResult<()> {
        let book = self.library.undo_book_update(None)?;
        writeln!(self.output, "Restored {}", book)?;
        Ok(())
    }

    fn issue_loan(&mut self) -> ConsoleResult<()> {
        let code = self.ask("Loan code")?;
        let login = self.ask("User login")?;
        let book_code = self.ask("Book code")?;
        let loan = self.library.issue_loan(&code, &login, &book_code)?;
        writeln!(self.output, "Issued {}", loan)?;
        Ok(())
    }

    fn return_loan(&mut self) -> ConsoleResult<()> {
        let code = self.ask("Loan code")?;
        let loan = self.library.return_loan(&code)?;
        writeln!(self.output, "Returned {}", loan)?;
        Ok(())
    }

    fn list_loans(&mut self) -> ConsoleResult<()> {
        let loans = self.library.find_all_loans()?;
        self.print_all(&loans, "No loans recorded.")
    }

    fn list_user_loans(&mut self, login: &str) -> ConsoleResult<()> {
        let loans = self.library.find_loans_by_user(login)?;
        if loans.is_empty() {
            writeln!(self.output, "You have no loans.")?;
        }
        let now = Utc::now();
        for loan in &loans {
            let marker = if loan.is_overdue(now) { " | OVERDUE" } else { "" };
            writeln!(self.output, "{}{}", loan, marker)?;
        }
        Ok(())
    }

    fn access_report(&mut self) -> ConsoleResult<()> {
        let report = self.library.access_report()?;
        writeln!(self.output, "{}", report.render())?;
        Ok(())
    }

    fn loan_report(&mut self) -> ConsoleResult<()> {
        let report = self.library.loan_report()?;
        writeln!(self.output, "{}", report.render())?;
        Ok(())
    }

    fn show_history(&mut self) -> ConsoleResult<()> {
        if self.library.history().is_empty() {
            writeln!(self.output, "No operations executed yet.")?;
        }
        for record in self.library.history() {
            writeln!(
                self.output,
                "{} {}",
                record.executed_at.format("%d/%m/%Y %H:%M:%S"),
                record.operation
            )?;
        }
        Ok(())
    }

    fn print_all<T: std::fmt::Display>(&mut self, items: &[T], empty: &str) -> ConsoleResult<()> {
        if items.is_empty() {
            writeln!(self.output, "{}", empty)?;
        }
        for item in items {
            writeln!(self.output, "{}", item)?;
        }
        Ok(())
    }

    /// Print domain and input errors; only I/O errors end the session
    fn settle(&mut self, outcome: ConsoleResult<()>) -> io::Result<()> {
        match outcome {
            Ok(()) => Ok(()),
            Err(ConsoleError::Io(e)) => Err(e),
            Err(ConsoleError::App(e)) => self.report_error(&e),
            Err(ConsoleError::Input(message)) => writeln!(self.output, "{}", message),
        }
    }

    fn report_error(&mut self, error: &AppError) -> io::Result<()> {
        writeln!(self.output, "Error [{}]: {}", error.code() as u32, error)
    }

    fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn ask_yes_no(&mut self, label: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} (y/n)", label))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }

    fn ask_number<T: std::str::FromStr>(&mut self, label: &str) -> ConsoleResult<T> {
        let answer = self.ask(label)?;
        answer
            .parse()
            .map_err(|_| ConsoleError::Input(format!("'{}' is not a valid number.", answer)))
    }
}
