/// Catalog service: areas, courses, modules, and course-module associations.
use crate::{
    db::integrity::ensure_deletable,
    error::{DomainError, DomainResult},
    models::{
        area::Area,
        curso::{CreateCurso, Curso},
        curso_modulo::{CreateCursoModulo, CursoModulo, CursoModuloEstado},
        formador::Formador,
        modulo::Modulo,
        sala::Sala,
    },
};
use sqlx::SqlitePool;
use tracing::info;

pub async fn create_area(pool: &SqlitePool, nome: &str) -> DomainResult<Area> {
    if nome.trim().is_empty() {
        return Err(DomainError::Validation("nome is required".into()));
    }
    Ok(Area::create(pool, nome).await?)
}

pub async fn list_areas(pool: &SqlitePool) -> DomainResult<Vec<Area>> {
    Ok(Area::list(pool).await?)
}

/// Blocked while courses belong to the area.
pub async fn delete_area(pool: &SqlitePool, area_id: i64) -> DomainResult<bool> {
    if Area::find_by_id(pool, area_id).await?.is_none() {
        return Err(DomainError::not_found("area", area_id));
    }
    ensure_deletable(pool, "areas", area_id).await?;
    Ok(Area::delete(pool, area_id).await?)
}

pub async fn create_curso(pool: &SqlitePool, data: CreateCurso) -> DomainResult<Curso> {
    if Area::find_by_id(pool, data.area_id).await?.is_none() {
        return Err(DomainError::not_found("area", data.area_id));
    }
    if data.nome.trim().is_empty() {
        return Err(DomainError::Validation("nome is required".into()));
    }

    let curso = Curso::create(pool, data).await?;
    info!(curso_id = curso.id, "Curso created");
    Ok(curso)
}

pub async fn get_curso(pool: &SqlitePool, curso_id: i64) -> DomainResult<Curso> {
    Curso::find_by_id(pool, curso_id)
        .await?
        .ok_or_else(|| DomainError::not_found("curso", curso_id))
}

pub async fn list_cursos(pool: &SqlitePool) -> DomainResult<Vec<Curso>> {
    Ok(Curso::list(pool).await?)
}

pub async fn list_cursos_da_area(pool: &SqlitePool, area_id: i64) -> DomainResult<Vec<Curso>> {
    if Area::find_by_id(pool, area_id).await?.is_none() {
        return Err(DomainError::not_found("area", area_id));
    }
    Ok(Curso::list_by_area(pool, area_id).await?)
}

/// Blocked while turmas, enrollments, or module associations reference the
/// course.
pub async fn delete_curso(pool: &SqlitePool, curso_id: i64) -> DomainResult<bool> {
    if Curso::find_by_id(pool, curso_id).await?.is_none() {
        return Err(DomainError::not_found("curso", curso_id));
    }
    ensure_deletable(pool, "cursos", curso_id).await?;
    Ok(Curso::delete(pool, curso_id).await?)
}

pub async fn create_modulo(
    pool: &SqlitePool,
    nome: &str,
    carga_horaria: i64,
) -> DomainResult<Modulo> {
    if nome.trim().is_empty() {
        return Err(DomainError::Validation("nome is required".into()));
    }
    if carga_horaria <= 0 {
        return Err(DomainError::Validation(
            "carga_horaria must be positive".into(),
        ));
    }
    Ok(Modulo::create(pool, nome, carga_horaria).await?)
}

pub async fn list_modulos(pool: &SqlitePool) -> DomainResult<Vec<Modulo>> {
    Ok(Modulo::list(pool).await?)
}

pub async fn delete_modulo(pool: &SqlitePool, modulo_id: i64) -> DomainResult<bool> {
    if Modulo::find_by_id(pool, modulo_id).await?.is_none() {
        return Err(DomainError::not_found("modulo", modulo_id));
    }
    ensure_deletable(pool, "modulos", modulo_id).await?;
    Ok(Modulo::delete(pool, modulo_id).await?)
}

/// Associates a module with a course, optionally with a default trainer and
/// room. New associations start `Pendente`.
pub async fn add_modulo_ao_curso(
    pool: &SqlitePool,
    data: CreateCursoModulo,
) -> DomainResult<CursoModulo> {
    if Curso::find_by_id(pool, data.curso_id).await?.is_none() {
        return Err(DomainError::not_found("curso", data.curso_id));
    }
    if Modulo::find_by_id(pool, data.modulo_id).await?.is_none() {
        return Err(DomainError::not_found("modulo", data.modulo_id));
    }
    if let Some(formador_id) = data.formador_id {
        if Formador::find_by_id(pool, formador_id).await?.is_none() {
            return Err(DomainError::not_found("formador", formador_id));
        }
    }
    if let Some(sala_id) = data.sala_id {
        if Sala::find_by_id(pool, sala_id).await?.is_none() {
            return Err(DomainError::not_found("sala", sala_id));
        }
    }

    let cm = CursoModulo::create(pool, data)
        .await
        .map_err(|e| DomainError::from_sqlx(e, "curso already contains this modulo"))?;

    info!(curso_modulo_id = cm.id, "Modulo associated with curso");
    Ok(cm)
}

pub async fn list_modulos_do_curso(
    pool: &SqlitePool,
    curso_id: i64,
) -> DomainResult<Vec<CursoModulo>> {
    if Curso::find_by_id(pool, curso_id).await?.is_none() {
        return Err(DomainError::not_found("curso", curso_id));
    }
    Ok(CursoModulo::list_by_curso(pool, curso_id).await?)
}

/// Confirms a pending course-module assignment.
pub async fn confirmar_curso_modulo(pool: &SqlitePool, curso_modulo_id: i64) -> DomainResult<bool> {
    if CursoModulo::find_by_id(pool, curso_modulo_id).await?.is_none() {
        return Err(DomainError::not_found("curso_modulo", curso_modulo_id));
    }
    Ok(CursoModulo::set_estado(pool, curso_modulo_id, CursoModuloEstado::Confirmado).await?)
}

/// Blocked while sessions reference the association.
pub async fn remove_curso_modulo(pool: &SqlitePool, curso_modulo_id: i64) -> DomainResult<bool> {
    if CursoModulo::find_by_id(pool, curso_modulo_id).await?.is_none() {
        return Err(DomainError::not_found("curso_modulo", curso_modulo_id));
    }
    ensure_deletable(pool, "curso_modulos", curso_modulo_id).await?;
    Ok(CursoModulo::delete(pool, curso_modulo_id).await?)
}
