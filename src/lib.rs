// Biblioteca raíz del crate `horarios`.
// Reexporta los módulos principales y proporciona una función de conveniencia
// `generar_horario` que orquesta el flujo completo.

pub mod error;
pub mod expansion;
pub mod export;
pub mod grafo;
pub mod models;
pub mod sa;
pub mod scheduler;

pub use error::ErrorNucleo;
pub use sa::ConfigSA;

use export::ExportHorario;
use models::{Actividad, DatosUniversidad};
use sa::{FaseAsignacion, Metricas};

/// Resultado del pipeline completo.
pub struct ResultadoPipeline {
    pub actividades: Vec<Actividad>,
    /// Fase final de cada actividad, alineada por índice.
    pub fases: Vec<FaseAsignacion>,
    pub metricas: Metricas,
    pub export: ExportHorario,
    /// Códigos de las actividades que quedaron sin programar.
    pub sin_programar: Vec<String>,
}

/// Ejecuta el flujo completo de generación de horarios:
/// 1. Expandir la oferta en actividades (sesiones semanales)
/// 2. Construir el grafo de conflictos con cliques curriculares
/// 3. Scheduler constructivo (conjunto independiente + salas, por periodo)
/// 4. Refinamiento con recocido simulado
/// 5. Exportación a registros planos
///
/// Un DUD final no es un error: el horario se devuelve parcial pero
/// consistente, con el diagnóstico en `sin_programar`.
pub fn generar_horario(
    datos: &DatosUniversidad,
    config: &ConfigSA,
) -> Result<ResultadoPipeline, ErrorNucleo> {
    println!("[pipeline] expandiendo oferta académica...");
    let mut actividades = expansion::expandir_actividades(&datos.oferta, &datos.cursos);

    println!("[pipeline] construyendo grafo de conflictos...");
    let (grafo, cliques) = grafo::construir_grafo(&actividades, &datos.cursos);

    println!("[pipeline] ejecutando scheduler constructivo...");
    let constructivo = scheduler::programar(
        &mut actividades,
        &grafo,
        &datos.salas,
        &datos.restricciones_salas,
    )?;

    for &idx in &constructivo.dud_final {
        let a = &actividades[idx];
        eprintln!(
            "[pipeline] WARN sin programar: {} ({}) {} - {} estudiantes",
            a.codigo,
            a.tipo.como_str(),
            a.nombre_curso,
            a.estudiantes
        );
    }

    println!("[pipeline] refinando con recocido simulado...");
    let resultado_sa = sa::optimizar(
        actividades,
        &datos.cursos,
        &datos.salas,
        &datos.restricciones_salas,
        &cliques,
        config,
    );

    let actividades = resultado_sa.actividades;
    let fases = resultado_sa.fases;
    let metricas = resultado_sa.metricas;
    let export = export::exportar(&actividades, Some(&metricas));

    let sin_programar: Vec<String> = actividades
        .iter()
        .filter(|a| !a.asignada())
        .map(|a| a.codigo.clone())
        .collect();

    println!(
        "[pipeline] listo: {} actividades, {} sin programar, costo {:.2}",
        actividades.len(),
        sin_programar.len(),
        metricas.costo_total
    );

    Ok(ResultadoPipeline {
        actividades,
        fases,
        metricas,
        export,
        sin_programar,
    })
}
