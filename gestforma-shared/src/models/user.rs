/// User model and database operations
///
/// One row per account. Role-specific data lives in the `formadores` and
/// `formandos` profile tables, each owning at most one row per user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     email TEXT NOT NULL UNIQUE COLLATE NOCASE,
///     password_hash TEXT NOT NULL,
///     role TEXT NOT NULL DEFAULT 'Formando',
///     ativo INTEGER NOT NULL DEFAULT 1,
///     nome TEXT NOT NULL,
///     telefone TEXT,
///     google_id TEXT,
///     facebook_id TEXT,
///     reset_token TEXT,
///     reset_token_expira TEXT,
///     totp_secret TEXT,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// Emails are unique case-insensitively (`COLLATE NOCASE`) and are normalized
/// to lowercase on write, so lookups never depend on caller casing.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Account role. Persisted as TEXT with the variant name as the stored value;
/// every read site matches exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum Role {
    /// Full control, including user administration
    SuperAdmin,

    /// Administrative staff with full back-office access
    Admin,

    /// Office staff: catalog, turmas, enrollments — not grades
    Secretaria,

    /// Trainer: sees own turmas, records grades for own modules
    Formador,

    /// Trainee: read access to own enrollments and grades
    Formando,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::Secretaria => "Secretaria",
            Role::Formador => "Formador",
            Role::Formando => "Formando",
        }
    }

    /// SuperAdmin and Admin: the roles that may do anything administrative.
    pub fn is_admin_class(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    /// May create/delete users and profiles for other people.
    pub fn can_manage_users(&self) -> bool {
        self.is_admin_class()
    }

    /// May manage the catalog (areas, cursos, modulos, salas) and turmas.
    pub fn can_manage_catalog(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Secretaria)
    }

    /// May create and change enrollments.
    pub fn can_manage_enrollments(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin | Role::Secretaria)
    }

    /// May record grades without being the assigned trainer. Trainers pass a
    /// separate ownership check in the evaluation service.
    pub fn can_override_grades(&self) -> bool {
        self.is_admin_class()
    }
}

/// User account.
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The OAuth
/// ids, reset-token pair, and TOTP secret are optional columns carried for
/// accounts that use those flows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,

    /// Argon2id PHC string — never plaintext
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: Role,

    /// Inactive accounts cannot log in
    pub ativo: bool,

    pub nome: String,
    pub telefone: Option<String>,
    pub google_id: Option<String>,
    pub facebook_id: Option<String>,

    /// Outstanding password-reset token, if any
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expira: Option<DateTime<Utc>>,

    /// Optional two-factor secret
    #[serde(skip_serializing)]
    pub totp_secret: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub nome: String,
    pub telefone: Option<String>,
}

const USER_COLUMNS: &str = "id, email, password_hash, role, ativo, nome, telefone, \
     google_id, facebook_id, reset_token, reset_token_expira, totp_secret, \
     created_at, updated_at";

impl User {
    /// Creates a new user. The email is stored lowercase.
    ///
    /// Generic over the executor so registration can insert the user and its
    /// profile inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns a store error on duplicate email (unique violation); callers at
    /// the service boundary translate that into a domain `Conflict`.
    pub async fn create<'e, E>(db: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, role, ativo, nome, telefone, created_at, updated_at) \
             VALUES (?, ?, ?, 1, ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(data.email.to_lowercase())
        .bind(data.password_hash)
        .bind(data.role)
        .bind(data.nome)
        .bind(data.telefone)
        .bind(now)
        .bind(now)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email, case-insensitively.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email.to_lowercase())
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Replaces the stored password hash.
    pub async fn set_password_hash(
        pool: &SqlitePool,
        id: i64,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, reset_token = NULL, \
             reset_token_expira = NULL, updated_at = ? WHERE id = ?",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stores a password-reset token and its expiry on the account.
    pub async fn set_reset_token(
        pool: &SqlitePool,
        id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET reset_token = ?, reset_token_expira = ?, updated_at = ? WHERE id = ?",
        )
        .bind(token)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds the account holding an outstanding reset token.
    pub async fn find_by_reset_token(
        pool: &SqlitePool,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_token = ?"
        ))
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// Activates or deactivates the account.
    pub async fn set_ativo(pool: &SqlitePool, id: i64, ativo: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET ativo = ?, updated_at = ? WHERE id = ?")
            .bind(ativo)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_admin_class() {
        assert!(Role::SuperAdmin.is_admin_class());
        assert!(Role::Admin.is_admin_class());
        assert!(!Role::Secretaria.is_admin_class());
        assert!(!Role::Formador.is_admin_class());
        assert!(!Role::Formando.is_admin_class());
    }

    #[test]
    fn test_secretaria_manages_enrollments_not_grades() {
        assert!(Role::Secretaria.can_manage_enrollments());
        assert!(Role::Secretaria.can_manage_catalog());
        assert!(!Role::Secretaria.can_override_grades());
    }

    #[test]
    fn test_role_serde_uses_stored_spelling() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"SuperAdmin\"");
        let back: Role = serde_json::from_str("\"Formando\"").unwrap();
        assert_eq!(back, Role::Formando);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            email: "a@b.pt".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::Admin,
            ativo: true,
            nome: "A".into(),
            telefone: None,
            google_id: None,
            facebook_id: None,
            reset_token: Some("tok".into()),
            reset_token_expira: None,
            totp_secret: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("reset_token").is_none());
        assert!(json.get("totp_secret").is_none());
    }
}
