//! Interactive console menu for the student roster.
//!
//! # Responsibility
//! - Read raw operator input, one line per field.
//! - Delegate every operation to `roster_core` and print its outcome.
//!
//! # Invariants
//! - During update, a blank line means "leave unchanged".
//! - Operation failures are printed, never propagated as panics.

use roster_core::db::open_db;
use roster_core::{
    core_version, default_log_level, init_logging, NewStudent, SqliteStudentRepository,
    StudentPatch, StudentRecord, StudentService,
};
use std::io::{self, BufRead, Write};

const DEFAULT_DB_PATH: &str = "roster.db";

fn main() {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    let log_dir = std::env::temp_dir().join("roster-logs");
    if let Some(log_dir) = log_dir.to_str() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let mut conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open database `{db_path}`: {err}");
            std::process::exit(1);
        }
    };
    let repo = match SqliteStudentRepository::try_new(&mut conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("failed to prepare database `{db_path}`: {err}");
            std::process::exit(1);
        }
    };
    let mut service = StudentService::new(repo);
    log::info!("event=cli_start module=cli status=ok db_path={db_path}");

    println!("Student Management v{} ({db_path})", core_version());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        let Some(choice) = prompt(&mut lines, "Enter your choice: ") else {
            break;
        };

        match choice.trim() {
            "1" => run_add(&mut service, &mut lines),
            "2" => run_remove(&mut service, &mut lines),
            "3" => run_update(&mut service, &mut lines),
            "4" => run_search(&service, &mut lines),
            "5" => run_list(&service),
            "6" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice! Please enter 1-6."),
        }
    }
}

fn print_menu() {
    println!();
    println!("--- Student Management ---");
    println!("1. Add Student");
    println!("2. Remove Student");
    println!("3. Update Student");
    println!("4. Search Student");
    println!("5. List All Students");
    println!("6. Exit");
}

/// Prints `label`, then reads one line. Returns `None` on end of input.
fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> Option<String> {
    print!("{label}");
    let _ = io::stdout().flush();
    match lines.next() {
        Some(Ok(line)) => Some(line),
        Some(Err(err)) => {
            eprintln!("failed to read input: {err}");
            None
        }
        None => None,
    }
}

/// Blank input maps to an absent update field.
fn optional(line: String) -> Option<String> {
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

fn run_add(
    service: &mut StudentService<SqliteStudentRepository<'_>>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) {
    let Some(id) = prompt(lines, "Student ID: ") else {
        return;
    };
    let Some(name) = prompt(lines, "Name: ") else {
        return;
    };
    let Some(age) = prompt(lines, "Age: ") else {
        return;
    };
    let Some(course) = prompt(lines, "Course: ") else {
        return;
    };
    let Some(email) = prompt(lines, "Email: ") else {
        return;
    };

    let input = NewStudent {
        id,
        name,
        age,
        course,
        email,
    };
    match service.add_student(input) {
        Ok(_) => println!("Student added."),
        Err(err) => println!("{err}"),
    }
}

fn run_remove(
    service: &mut StudentService<SqliteStudentRepository<'_>>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) {
    let Some(id) = prompt(lines, "Enter ID to remove: ") else {
        return;
    };

    match service.remove_student(&id) {
        Ok(()) => println!("Student removed."),
        Err(err) => println!("{err}"),
    }
}

fn run_update(
    service: &mut StudentService<SqliteStudentRepository<'_>>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) {
    let Some(id) = prompt(lines, "Enter ID to update: ") else {
        return;
    };

    println!("Leave blank to keep the same value.");
    let Some(name) = prompt(lines, "New Name: ") else {
        return;
    };
    let Some(age) = prompt(lines, "New Age: ") else {
        return;
    };
    let Some(course) = prompt(lines, "New Course: ") else {
        return;
    };
    let Some(email) = prompt(lines, "New Email: ") else {
        return;
    };

    let patch = StudentPatch {
        name: optional(name),
        age: optional(age),
        course: optional(course),
        email: optional(email),
    };
    match service.update_student(&id, &patch) {
        Ok(_) => println!("Student updated."),
        Err(err) => println!("{err}"),
    }
}

fn run_search(
    service: &StudentService<SqliteStudentRepository<'_>>,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) {
    let Some(keyword) = prompt(lines, "Enter search keyword: ") else {
        return;
    };

    match service.search_students(&keyword) {
        Ok(records) => {
            println!();
            println!("Search Results:");
            print_records(&records);
        }
        Err(err) => println!("{err}"),
    }
}

fn run_list(service: &StudentService<SqliteStudentRepository<'_>>) {
    match service.list_students() {
        Ok(records) => {
            println!();
            println!("All Students:");
            print_records(&records);
        }
        Err(err) => println!("{err}"),
    }
}

fn print_records(records: &[StudentRecord]) {
    if records.is_empty() {
        println!("(no records)");
        return;
    }
    for record in records {
        println!(
            "{} | {} | {} | {} | {}",
            record.id, record.name, record.age, record.course, record.email
        );
    }
}
