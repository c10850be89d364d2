// src/bin/hash_password.rs
// Prints a bcrypt hash for ADMIN_PASSWORD_HASH or the `senha` column.
// Usage: hash_password <password>

use bcrypt::{hash, DEFAULT_COST};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(password) = env::args().nth(1) else {
        eprintln!("usage: hash_password <password>");
        return ExitCode::FAILURE;
    };
    match hash(&password, DEFAULT_COST) {
        Ok(hashed) => {
            println!("{hashed}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to hash password: {e}");
            ExitCode::FAILURE
        }
    }
}
