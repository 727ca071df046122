//! Database models.
//!
//! One module per entity: a `sqlx::FromRow` struct plus its CRUD operations
//! against the pool. Business rules (existence checks, state transitions,
//! role gates) live in `crate::services`, not here.

pub mod area;
pub mod avaliacao;
pub mod curso;
pub mod curso_modulo;
pub mod disponibilidade;
pub mod formador;
pub mod formando;
pub mod inscricao;
pub mod modulo;
pub mod sala;
pub mod sessao;
pub mod turma;
pub mod turma_modulo;
pub mod user;
pub mod user_ficheiro;
