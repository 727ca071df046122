/// Room (sala) model.
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Room type. Persisted as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum SalaTipo {
    /// Classroom for theory lessons
    Teorica,

    /// Computer lab
    Informatica,

    /// Workshop
    Oficina,

    /// Meeting room
    Reuniao,
}

impl SalaTipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalaTipo::Teorica => "Teorica",
            SalaTipo::Informatica => "Informatica",
            SalaTipo::Oficina => "Oficina",
            SalaTipo::Reuniao => "Reuniao",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sala {
    pub id: i64,
    pub nome: String,
    pub capacidade: i64,
    pub tipo: SalaTipo,
}

#[derive(Debug, Clone)]
pub struct CreateSala {
    pub nome: String,
    pub capacidade: i64,
    pub tipo: SalaTipo,
}

impl Sala {
    pub async fn create(pool: &SqlitePool, data: CreateSala) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Sala>(
            "INSERT INTO salas (nome, capacidade, tipo) VALUES (?, ?, ?) \
             RETURNING id, nome, capacidade, tipo",
        )
        .bind(data.nome)
        .bind(data.capacidade)
        .bind(data.tipo)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sala>("SELECT id, nome, capacidade, tipo FROM salas WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Sala>("SELECT id, nome, capacidade, tipo FROM salas ORDER BY nome ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM salas WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sala_tipo_as_str_matches_serde() {
        for tipo in [
            SalaTipo::Teorica,
            SalaTipo::Informatica,
            SalaTipo::Oficina,
            SalaTipo::Reuniao,
        ] {
            let json = serde_json::to_string(&tipo).unwrap();
            assert_eq!(json, format!("\"{}\"", tipo.as_str()));
        }
    }
}
