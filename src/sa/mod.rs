// Recocido simulado: refina la solución constructiva moviendo actividades
// de bloque y de sala sin romper las restricciones duras

pub mod costo;
pub mod estado;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::grafo::MapaCliques;
use crate::models::{Actividad, Curso, RestriccionesSalas, Sala, TOTAL_BLOQUES};
use crate::scheduler::salas_candidatas;

pub use costo::{calcular_metricas, costo_actividad, costo_total, Metricas};
pub use estado::EstadoSA;

/// Configuración del recocido. La semilla fija hace reproducible la corrida.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSA {
    pub temperatura_inicial: f64,
    pub enfriamiento: f64,
    pub temperatura_minima: f64,
    pub iteraciones_por_temperatura: u32,
    pub semilla: u64,
}

impl Default for ConfigSA {
    fn default() -> ConfigSA {
        ConfigSA {
            temperatura_inicial: 1000.0,
            enfriamiento: 0.997,
            temperatura_minima: 0.1,
            iteraciones_por_temperatura: 200,
            semilla: 42,
        }
    }
}

/// Fase terminal de cada actividad al salir del refinamiento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaseAsignacion {
    /// Nunca recibió bloque y sala: DUD final, no se vuelve a intentar.
    DudFinal,
    /// Conserva la asignación de la fase constructiva.
    AsignadaConstructiva,
    /// Al menos un movimiento aceptado la reubicó.
    AsignadaRecocida,
}

/// Resultado del recocido: actividades refinadas más contadores y métricas.
#[derive(Debug)]
pub struct ResultadoSA {
    pub actividades: Vec<Actividad>,
    /// Fase final de cada actividad, alineada por índice.
    pub fases: Vec<FaseAsignacion>,
    pub costo_inicial: f64,
    pub costo_final: f64,
    pub propuestas: u64,
    pub aceptadas: u64,
    pub mejoras: u64,
    pub metricas: Metricas,
}

/// Optimiza la solución con recocido simulado.
///
/// En cada iteración se elige una actividad asignada al azar y, con
/// probabilidad pareja, un movimiento de bloque (bloque uniforme en 0..35)
/// o de sala (sala válida uniforme en el bloque actual). Las propuestas que
/// violan restricciones duras se descartan sin evaluar; el resto se acepta
/// por el criterio de Metropolis sobre el delta de costo blando. El delta se
/// calcula solo con la contribución de la actividad movida; los índices de
/// ocupación se actualizan de forma atómica por aceptación.
pub fn optimizar(
    actividades: Vec<Actividad>,
    cursos: &[Curso],
    salas: &[Sala],
    restricciones: &RestriccionesSalas,
    cliques: &MapaCliques,
    config: &ConfigSA,
) -> ResultadoSA {
    let mut estado = EstadoSA::nuevo(actividades, cursos);
    let movibles = estado.asignadas();

    let costo_inicial = costo_total(&estado);
    let mut costo_actual = costo_inicial;

    println!(
        "[sa] iniciando: T={:.1}, enfriamiento={:.4}, iters/T={}, semilla={}",
        config.temperatura_inicial,
        config.enfriamiento,
        config.iteraciones_por_temperatura,
        config.semilla
    );
    println!("[sa] costo inicial: {:.2}", costo_inicial);

    let mut rng = SmallRng::seed_from_u64(config.semilla);
    let mut temperatura = config.temperatura_inicial;

    let mut propuestas: u64 = 0;
    let mut aceptadas: u64 = 0;
    let mut mejoras: u64 = 0;
    let mut movida = vec![false; estado.actividades.len()];

    while temperatura > config.temperatura_minima {
        if movibles.is_empty() {
            break;
        }

        for _ in 0..config.iteraciones_por_temperatura {
            let idx = movibles[rng.random_range(0..movibles.len())];

            if rng.random_bool(0.5) {
                // Movimiento de bloque
                let nuevo = rng.random_range(0..TOTAL_BLOQUES);
                if nuevo == estado.actividades[idx].bloque {
                    continue;
                }
                if !estado.movimiento_valido(idx, nuevo, cliques) {
                    continue;
                }

                propuestas += 1;
                let bloque_anterior = estado.actividades[idx].bloque;
                let antes = costo_actividad(&estado, idx);
                estado.mover_bloque(idx, nuevo);
                let delta = costo_actividad(&estado, idx) - antes;

                if acepta(delta, temperatura, &mut rng) {
                    costo_actual += delta;
                    aceptadas += 1;
                    movida[idx] = true;
                    if delta < 0.0 {
                        mejoras += 1;
                    }
                } else {
                    estado.mover_bloque(idx, bloque_anterior);
                }
            } else {
                // Movimiento de sala dentro del bloque actual
                let opciones: Vec<String> = {
                    let act = &estado.actividades[idx];
                    salas_candidatas(act, salas, restricciones)
                        .into_iter()
                        .filter(|s| {
                            s.codigo != act.sala
                                && act.estudiantes <= s.capacidad
                                && estado.sala_libre_para(idx, &s.codigo, act.bloque, act.duracion)
                        })
                        .map(|s| s.codigo.clone())
                        .collect()
                };
                if opciones.is_empty() {
                    continue;
                }
                let nueva = &opciones[rng.random_range(0..opciones.len())];

                propuestas += 1;
                let sala_anterior = estado.actividades[idx].sala.clone();
                let antes = costo_actividad(&estado, idx);
                estado.mover_sala(idx, nueva);
                let delta = costo_actividad(&estado, idx) - antes;

                if acepta(delta, temperatura, &mut rng) {
                    costo_actual += delta;
                    aceptadas += 1;
                    movida[idx] = true;
                    if delta < 0.0 {
                        mejoras += 1;
                    }
                } else {
                    estado.mover_sala(idx, &sala_anterior);
                }
            }
        }

        temperatura *= config.enfriamiento;
    }

    let metricas = calcular_metricas(&estado);
    println!(
        "[sa] costo final: {:.2} ({} propuestas, {} aceptadas, {} mejoras)",
        costo_actual, propuestas, aceptadas, mejoras
    );

    let fases: Vec<FaseAsignacion> = estado
        .actividades
        .iter()
        .enumerate()
        .map(|(i, a)| {
            if !a.asignada() {
                FaseAsignacion::DudFinal
            } else if movida[i] {
                FaseAsignacion::AsignadaRecocida
            } else {
                FaseAsignacion::AsignadaConstructiva
            }
        })
        .collect();

    ResultadoSA {
        actividades: estado.actividades,
        fases,
        costo_inicial,
        costo_final: costo_actual,
        propuestas,
        aceptadas,
        mejoras,
        metricas,
    }
}

/// Criterio de Metropolis: las mejoras siempre, lo demás con probabilidad
/// e^(-delta/T).
fn acepta(delta: f64, temperatura: f64, rng: &mut SmallRng) -> bool {
    if delta <= 0.0 {
        return true;
    }
    rng.random::<f64>() < (-delta / temperatura).exp()
}
