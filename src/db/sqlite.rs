use crate::db::models::{
    Appointment, Medication, NewAppointment, NewMedication, NewPet, NewUser, Pet, User,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::PetcareError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open (creating if missing) the database at `database_url`.
pub async fn connect(database_url: &str) -> Result<SqlitePool, PetcareError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

/// The only place that turns domain records into SQL.
#[derive(Clone)]
pub struct PetcareStorage {
    pool: SqlitePool,
}

impl PetcareStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn create_schema(&self) -> Result<(), PetcareError> {
        // sqlx::query runs a single statement, so split the script
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a user. A taken username surfaces as `ConstraintViolation`.
    pub async fn insert_user(&self, new: NewUser) -> Result<User, PetcareError> {
        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO user (username, password) VALUES (?, ?) RETURNING id, username, password",
        )
        .bind(new.username)
        .bind(new.password)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn insert_pet(&self, new: NewPet) -> Result<Pet, PetcareError> {
        let mut tx = self.pool.begin().await?;
        let pet = sqlx::query_as::<_, Pet>(
            "INSERT INTO pet (name, owner_id) VALUES (?, ?) RETURNING id, name, owner_id",
        )
        .bind(new.name)
        .bind(new.owner_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(pet)
    }

    /// Insert an appointment. `pet_id` is not pre-checked; an unknown pet fails
    /// at the foreign key.
    pub async fn insert_appointment(
        &self,
        new: NewAppointment,
    ) -> Result<Appointment, PetcareError> {
        let mut tx = self.pool.begin().await?;
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"INSERT INTO appointment (pet_id, date, description) VALUES (?, ?, ?)
               RETURNING id, pet_id, date, description"#,
        )
        .bind(new.pet_id)
        .bind(new.date)
        .bind(new.description)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(appointment)
    }

    pub async fn insert_medication(&self, new: NewMedication) -> Result<Medication, PetcareError> {
        let mut tx = self.pool.begin().await?;
        let medication = sqlx::query_as::<_, Medication>(
            r#"INSERT INTO medication (pet_id, medication_name, schedule) VALUES (?, ?, ?)
               RETURNING id, pet_id, medication_name, schedule"#,
        )
        .bind(new.pet_id)
        .bind(new.medication_name)
        .bind(new.schedule)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(medication)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, PetcareError> {
        let user =
            sqlx::query_as::<_, User>("SELECT id, username, password FROM user WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(user)
    }

    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, PetcareError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM user WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn pets_by_owner(&self, owner_id: i64) -> Result<Vec<Pet>, PetcareError> {
        let pets = sqlx::query_as::<_, Pet>(
            "SELECT id, name, owner_id FROM pet WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pets)
    }

    pub async fn appointments_by_pet(
        &self,
        pet_id: i64,
    ) -> Result<Vec<Appointment>, PetcareError> {
        let rows = sqlx::query_as::<_, Appointment>(
            "SELECT id, pet_id, date, description FROM appointment WHERE pet_id = ? ORDER BY id",
        )
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn medications_by_pet(
        &self,
        pet_id: i64,
    ) -> Result<Vec<Medication>, PetcareError> {
        let rows = sqlx::query_as::<_, Medication>(
            "SELECT id, pet_id, medication_name, schedule FROM medication WHERE pet_id = ? ORDER BY id",
        )
        .bind(pet_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) async fn memory_storage() -> PetcareStorage {
    // one connection: every `:memory:` connection is its own database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(
            SqliteConnectOptions::from_str("sqlite::memory:")
                .expect("valid sqlite url")
                .foreign_keys(true),
        )
        .await
        .expect("open in-memory sqlite");
    let storage = PetcareStorage::new(pool);
    storage.create_schema().await.expect("create schema");
    storage
}
