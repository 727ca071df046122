//! Domain services
//!
//! Business rules live here. Each service validates input, enforces
//! cross-entity invariants, and delegates persistence to the models.
//! Handlers in the API crate call into these and translate `DomainError`
//! into HTTP responses.

pub mod auth_service;
pub mod avaliacao_service;
pub mod curso_service;
pub mod disponibilidade_service;
pub mod inscricao_service;
pub mod perfil_service;
pub mod sala_service;
pub mod sessao_service;
pub mod turma_service;
