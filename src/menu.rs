//! Interactive command surface: login prompt followed by the main menu.
//!
//! The whole surface is a single-threaded prompt loop over a generic
//! `BufRead`/`Write` pair, so tests can drive it with scripted input. Input
//! validation failures (bad dates, bad selections) are recovered locally by
//! re-prompting; referential failures (unknown assignee, duplicate name)
//! abort the operation back to the menu; only storage failures propagate.

use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::credential::CredentialStore;
use crate::error::{Error, Result};
use crate::report;
use crate::session::{AuthGate, Session};
use crate::storage::Storage;
use crate::task::{format_date, parse_date, MarkOutcome, Task, TaskStore};

const MENU_TEXT: &str = "Select one of the following options below:\n\
                         r - register a user\n\
                         a - add a task\n\
                         va - view all tasks\n\
                         vm - view my tasks\n\
                         gr - generate reports\n\
                         ds - display statistics\n\
                         e - exit\n\
                         : ";

/// Run the interactive session over the given streams.
///
/// Returns cleanly when the operator exits or the input stream ends.
pub fn run<R: BufRead, W: Write>(
    users: &mut CredentialStore,
    tasks: &mut TaskStore,
    storage: &Storage,
    admin_name: &str,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut menu = Menu {
        users,
        tasks,
        storage,
        admin_name,
        input,
        out,
    };
    menu.run()
}

struct Menu<'a, R, W> {
    users: &'a mut CredentialStore,
    tasks: &'a mut TaskStore,
    storage: &'a Storage,
    admin_name: &'a str,
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Menu<'_, R, W> {
    fn run(&mut self) -> Result<()> {
        let Some(session) = self.login()? else {
            return Ok(());
        };

        loop {
            self.say("")?;
            let Some(choice) = self.prompt(MENU_TEXT)? else {
                return Ok(());
            };

            match choice.to_lowercase().as_str() {
                "r" => {
                    if self.register()?.is_none() {
                        return Ok(());
                    }
                }
                "a" => {
                    if self.add_task()?.is_none() {
                        return Ok(());
                    }
                }
                "va" => self.view_all()?,
                "vm" => {
                    if self.view_mine(&session)?.is_none() {
                        return Ok(());
                    }
                }
                "gr" => {
                    report::generate(self.storage, self.tasks, self.users, today())?;
                    self.say("Reports generated successfully!")?;
                }
                "ds" => self.display_statistics(&session)?,
                "e" => {
                    self.say("Goodbye!!!")?;
                    return Ok(());
                }
                _ => self.say("You have made a wrong choice, please try again")?,
            }
        }
    }

    /// Login loop: retries indefinitely until the auth gate transitions.
    fn login(&mut self) -> Result<Option<Session>> {
        let mut gate = AuthGate::new();
        loop {
            self.say("LOGIN")?;
            let Some(name) = self.prompt("Username: ")? else {
                return Ok(None);
            };
            let Some(secret) = self.prompt("Password: ")? else {
                return Ok(None);
            };

            match gate.login(self.users, self.admin_name, &name, &secret) {
                Ok(session) => {
                    self.say("Login Successful!")?;
                    return Ok(Some(session));
                }
                Err(Error::UnknownUser(_)) => self.say("User does not exist")?,
                Err(Error::WrongPassword(_)) => self.say("Wrong password")?,
                Err(err) => return Err(err),
            }
        }
    }

    /// Register a new identity: unique name, then password with confirmation.
    fn register(&mut self) -> Result<Option<()>> {
        loop {
            let Some(name) = self.prompt("New username: ")? else {
                return Ok(None);
            };
            if self.users.contains(&name) {
                self.say("This username already exists. Please try a different one.")?;
                continue;
            }

            let Some(secret) = self.prompt("New password: ")? else {
                return Ok(None);
            };
            let Some(confirm) = self.prompt("Confirm password: ")? else {
                return Ok(None);
            };

            if secret != confirm {
                self.say("Passwords do not match")?;
                continue;
            }

            self.users.register(&name, &secret)?;
            self.say("New user added")?;
            return Ok(Some(()));
        }
    }

    fn add_task(&mut self) -> Result<Option<()>> {
        let Some(mut assignee) = self.prompt("Name of person assigned to task: ")? else {
            return Ok(None);
        };
        while !self.users.contains(&assignee) {
            self.say("User does not exist. Please enter a valid username.")?;
            let Some(retry) = self.prompt("Name of person assigned to task: ")? else {
                return Ok(None);
            };
            assignee = retry;
        }

        let Some(title) = self.prompt("Title of task: ")? else {
            return Ok(None);
        };
        let Some(description) = self.prompt("Description of task: ")? else {
            return Ok(None);
        };
        let Some(due_date) = self.prompt_date("Due date of task (YYYY-MM-DD): ")? else {
            return Ok(None);
        };

        self.tasks
            .create(self.users, &assignee, &title, &description, due_date, today())?;
        self.say("Task successfully added.")?;
        Ok(Some(()))
    }

    fn view_all(&mut self) -> Result<()> {
        let blocks: Vec<String> = self.tasks.list_all().iter().map(render_task).collect();
        for block in blocks {
            self.say(&block)?;
        }
        Ok(())
    }

    /// Numbered listing of the session's tasks with the select/complete/edit
    /// sub-flow. Visible tasks are re-numbered 1..N for this listing only.
    fn view_mine(&mut self, session: &Session) -> Result<Option<()>> {
        let mine: Vec<usize> = self
            .tasks
            .list_for(session.name())
            .iter()
            .map(|(index, _)| *index)
            .collect();

        if mine.is_empty() {
            self.say("You have no tasks to display.")?;
            return Ok(Some(()));
        }

        for (number, index) in mine.iter().enumerate() {
            let task = self.tasks.get(*index)?;
            let block = render_numbered_task(number + 1, task);
            self.say(&block)?;
        }

        loop {
            let Some(text) =
                self.prompt("Enter the task number to view/edit, or -1 to return to the main menu: ")?
            else {
                return Ok(None);
            };

            let choice: i64 = match text.parse() {
                Ok(value) => value,
                Err(_) => {
                    self.say("Invalid input. Please enter a valid number.")?;
                    continue;
                }
            };

            if choice == -1 {
                self.say("Returning to the main menu...")?;
                return Ok(Some(()));
            }

            if choice < 1 || choice as usize > mine.len() {
                self.say(&format!(
                    "Invalid input. Please enter a number between 1 and {}, or -1 to return to the main menu.",
                    mine.len()
                ))?;
                continue;
            }

            let index = mine[choice as usize - 1];
            return self.edit_selected(index);
        }
    }

    fn edit_selected(&mut self, index: usize) -> Result<Option<()>> {
        let title = self.tasks.get(index)?.title.clone();
        self.say(&format!("You selected: {title}"))?;
        self.say("1 - Mark task as complete")?;
        self.say("2 - Edit task")?;
        self.say("3 - Return to main menu")?;

        let Some(action) = self.prompt("Enter your choice: ")? else {
            return Ok(None);
        };

        match action.as_str() {
            "1" => match self.tasks.mark_complete(index)? {
                MarkOutcome::Completed => self.say("Task marked as complete.")?,
                MarkOutcome::AlreadyComplete => {
                    self.say("This task is already marked as complete.")?
                }
            },
            "2" => {
                if self.tasks.get(index)?.completed {
                    self.say("You cannot edit a completed task.")?;
                } else {
                    return self.edit_fields(index);
                }
            }
            "3" => self.say("Returning to the main menu...")?,
            _ => self.say("Invalid choice. Returning to the main menu.")?,
        }

        Ok(Some(()))
    }

    /// Restricted field edits on an incomplete task: 1 = reassign, 2 = redate.
    fn edit_fields(&mut self, index: usize) -> Result<Option<()>> {
        self.say("1 - Edit the username assigned to this task")?;
        self.say("2 - Edit the due date")?;
        let Some(edit_choice) = self.prompt("Enter your choice: ")? else {
            return Ok(None);
        };

        match edit_choice.as_str() {
            "1" => {
                let Some(new_user) = self.prompt("Enter the username: ")? else {
                    return Ok(None);
                };
                match self.tasks.reassign(self.users, index, &new_user) {
                    Ok(()) => self.say("Username updated successfully.")?,
                    Err(Error::UnknownUser(_)) => {
                        self.say("This username does not exist. Please register the user first.")?
                    }
                    Err(err) => return Err(err),
                }
            }
            "2" => {
                let Some(text) = self.prompt("Enter the new due date (YYYY-MM-DD): ")? else {
                    return Ok(None);
                };
                match parse_date(&text) {
                    Ok(new_due_date) => {
                        self.tasks.redate(index, new_due_date)?;
                        self.say("Due date updated successfully.")?;
                    }
                    Err(_) => self.say("Invalid date format. Please use YYYY-MM-DD.")?,
                }
            }
            _ => self.say("Invalid choice. Returning to the main menu.")?,
        }

        Ok(Some(()))
    }

    fn display_statistics(&mut self, session: &Session) -> Result<()> {
        match report::display(
            self.storage,
            session,
            self.tasks,
            self.users,
            today(),
            self.out,
        ) {
            Ok(()) => Ok(()),
            Err(Error::AdminOnly) => self.say("Only the admin can view statistics."),
            Err(err) => Err(err),
        }
    }

    /// Print a prompt without a trailing newline and read one line.
    ///
    /// Returns `None` when the input stream ends.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{message}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt for a date, re-prompting until it parses.
    fn prompt_date(&mut self, message: &str) -> Result<Option<NaiveDate>> {
        loop {
            let Some(text) = self.prompt(message)? else {
                return Ok(None);
            };
            match parse_date(&text) {
                Ok(date) => return Ok(Some(date)),
                Err(_) => self.say("Invalid date format. Please use YYYY-MM-DD.")?,
            }
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

fn render_task(task: &Task) -> String {
    format!(
        "Task: \t\t {}\nAssigned to: \t {}\nDate assigned: \t {}\nDue date: \t {}\nTask description: \n {}\n",
        task.title,
        task.assignee,
        format_date(task.assigned_date),
        format_date(task.due_date),
        task.description,
    )
}

fn render_numbered_task(number: usize, task: &Task) -> String {
    format!(
        "Task {number}:\n  Title: {}\n  Assigned to: {}\n  Date assigned: {}\n  Due date: {}\n  Description: {}\n  Completed: {}\n{}",
        task.title,
        task.assignee,
        format_date(task.assigned_date),
        format_date(task.due_date),
        task.description,
        if task.completed { "Yes" } else { "No" },
        "-".repeat(40),
    )
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
