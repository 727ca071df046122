//! Demo dataset bootstrap.
//!
//! Inserts a small, fixed dataset on first start so the API is usable out of
//! the box. Every insert is guarded by a natural-key existence check, so
//! running the seed against an already-seeded database is a no-op.

use crate::{
    auth::password::hash_password,
    error::{DomainError, DomainResult},
    models::{
        area::Area,
        curso::{CreateCurso, Curso},
        formador::{CreateFormador, Formador},
        formando::{CreateFormando, Formando},
        inscricao::Inscricao,
        modulo::Modulo,
        turma::{CreateTurma, Turma},
        turma_modulo::{CreateTurmaModulo, TurmaModulo},
        user::{CreateUser, Role, User},
    },
};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

const ADMIN_EMAIL: &str = "admin@gestforma.pt";
const SEED_PASSWORD: &str = "gestforma123";

/// Runs the full seed. Safe to call on every startup.
pub async fn run(pool: &SqlitePool) -> DomainResult<()> {
    let admin = seed_user(pool, ADMIN_EMAIL, Role::Admin, "Administrador").await?;
    info!(user_id = admin.id, "Seed: admin account ready");

    let formador_a = seed_formador(
        pool,
        "joao.martins@gestforma.pt",
        "Joao Martins",
        "Programacao",
    )
    .await?;
    let formador_b = seed_formador(
        pool,
        "ana.costa@gestforma.pt",
        "Ana Costa",
        "Redes e Sistemas",
    )
    .await?;

    let formando = seed_formando(
        pool,
        "rui.pereira@mail.pt",
        "Rui Pereira",
        "F2024001",
        NaiveDate::from_ymd_opt(2001, 3, 14),
    )
    .await?;

    // Catalog is keyed by "any courses exist": a partially edited catalog is
    // left alone rather than re-seeded next to it.
    if Curso::count(pool).await? > 0 {
        info!("Seed: catalog already present, skipping");
        return Ok(());
    }

    let informatica = Area::create(pool, "Informatica").await?;
    Area::create(pool, "Gestao").await?;

    let curso = Curso::create(
        pool,
        CreateCurso {
            area_id: informatica.id,
            nome: "Tecnico de Informatica".to_string(),
            nivel: "Nivel 4".to_string(),
        },
    )
    .await?;

    let m1 = Modulo::create(pool, "Algoritmia", 50).await?;
    let m2 = Modulo::create(pool, "Bases de Dados", 50).await?;
    let m3 = Modulo::create(pool, "Redes Locais", 25).await?;

    let turma = Turma::create(
        pool,
        CreateTurma {
            curso_id: curso.id,
            nome: "TI-2024-A".to_string(),
            data_inicio: seed_date(2024, 9, 16),
            data_fim: seed_date(2025, 6, 27),
            local: "Lisboa".to_string(),
        },
    )
    .await?;

    for (sequencia, (modulo_id, formador_id)) in [
        (m1.id, formador_a.id),
        (m2.id, formador_a.id),
        (m3.id, formador_b.id),
    ]
    .into_iter()
    .enumerate()
    {
        TurmaModulo::create(
            pool,
            CreateTurmaModulo {
                turma_id: turma.id,
                modulo_id,
                formador_id,
                sequencia: sequencia as i64 + 1,
            },
        )
        .await?;
    }

    Inscricao::create(pool, turma.id, formando.id, curso.id).await?;

    info!(
        turma_id = turma.id,
        curso_id = curso.id,
        "Seed: demo dataset inserted"
    );
    Ok(())
}

fn seed_date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Constants above are all valid calendar dates.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

async fn seed_user(pool: &SqlitePool, email: &str, role: Role, nome: &str) -> DomainResult<User> {
    if let Some(existing) = User::find_by_email(pool, email).await? {
        return Ok(existing);
    }

    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| DomainError::Validation(format!("seed password hashing failed: {e}")))?;

    let user = User::create(
        pool,
        CreateUser {
            email: email.to_string(),
            password_hash,
            role,
            nome: nome.to_string(),
            telefone: None,
        },
    )
    .await?;
    Ok(user)
}

async fn seed_formador(
    pool: &SqlitePool,
    email: &str,
    nome: &str,
    area_especializacao: &str,
) -> DomainResult<Formador> {
    let user = seed_user(pool, email, Role::Formador, nome).await?;
    if let Some(existing) = Formador::find_by_user_id(pool, user.id).await? {
        return Ok(existing);
    }
    Ok(Formador::create(
        pool,
        CreateFormador {
            user_id: user.id,
            area_especializacao: area_especializacao.to_string(),
            cor_calendario: None,
        },
    )
    .await?)
}

async fn seed_formando(
    pool: &SqlitePool,
    email: &str,
    nome: &str,
    numero_aluno: &str,
    data_nascimento: Option<NaiveDate>,
) -> DomainResult<Formando> {
    let user = seed_user(pool, email, Role::Formando, nome).await?;
    if let Some(existing) = Formando::find_by_user_id(pool, user.id).await? {
        return Ok(existing);
    }
    Ok(Formando::create(
        pool,
        CreateFormando {
            user_id: user.id,
            numero_aluno: numero_aluno.to_string(),
            data_nascimento,
        },
    )
    .await?)
}
