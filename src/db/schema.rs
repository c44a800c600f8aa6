//! SQL DDL for initializing the pet care database.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `user`: `username` UNIQUE, plain-text `password`
/// - `pet`: owned by one `user`
/// - `appointment` / `medication`: owned by one `pet`, no direct user link
///
/// Every statement is `IF NOT EXISTS`, so running it on each start is safe.
/// Foreign keys are only enforced while `PRAGMA foreign_keys` is on, which the
/// sqlx SQLite driver sets for every connection.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id INTEGER PRIMARY KEY NOT NULL,
    username VARCHAR(150) NOT NULL UNIQUE,
    password VARCHAR(150) NOT NULL
);

CREATE TABLE IF NOT EXISTS pet (
    id INTEGER PRIMARY KEY NOT NULL,
    name VARCHAR(150) NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES user(id)
);

CREATE INDEX IF NOT EXISTS idx_pet_owner_id ON pet(owner_id);

CREATE TABLE IF NOT EXISTS appointment (
    id INTEGER PRIMARY KEY NOT NULL,
    pet_id INTEGER NOT NULL REFERENCES pet(id),
    date VARCHAR(150) NOT NULL, -- free text, not parsed
    description VARCHAR(300) NULL
);

CREATE INDEX IF NOT EXISTS idx_appointment_pet_id ON appointment(pet_id);

CREATE TABLE IF NOT EXISTS medication (
    id INTEGER PRIMARY KEY NOT NULL,
    pet_id INTEGER NOT NULL REFERENCES pet(id),
    medication_name VARCHAR(150) NOT NULL,
    schedule VARCHAR(150) NOT NULL -- free text
);

CREATE INDEX IF NOT EXISTS idx_medication_pet_id ON medication(pet_id);
"#;
