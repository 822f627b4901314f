use thiserror::Error;

/// Errores del núcleo de scheduling. La infactibilidad (DUDs) NO es un
/// error: se reporta como resultado parcial.
#[derive(Debug, Error)]
pub enum ErrorNucleo {
    /// Datos de entrada que impiden siquiera comenzar (cero salas, cero
    /// actividades, duraciones < 1).
    #[error("configuración inválida: {0}")]
    ConfiguracionInvalida(String),

    /// Estado interno imposible (p. ej. una actividad referenciada en la
    /// ocupación que no existe en el conjunto). Indica un bug.
    #[error("inconsistencia interna: {0}")]
    InconsistenciaInterna(String),
}
