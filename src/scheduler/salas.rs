// Empaquetado de salas por periodo: best-fit restringido

use crate::models::{Actividad, RestriccionesSalas, Sala};

/// Asignación de una sala a una actividad dentro de un periodo.
#[derive(Debug, Clone)]
pub struct AsignacionSala {
    pub codigo_sala: String,
    pub capacidad: i32,
    /// Índice denso de la actividad asignada.
    pub actividad: usize,
    pub ocupacion: i32,
}

/// Salas candidatas para una actividad: whitelist explícita de
/// (curso, tipo) si existe, si no DEFAULTS, si no el tipo de sala según el
/// tipo de evento. No considera ocupación; eso lo filtra cada llamador.
pub fn salas_candidatas<'a>(
    actividad: &Actividad,
    salas: &'a [Sala],
    restricciones: &RestriccionesSalas,
) -> Vec<&'a Sala> {
    salas
        .iter()
        .filter(|s| restricciones.sala_valida(&actividad.codigo_curso, actividad.tipo, s))
        .collect()
}

/// Empaqueta las actividades de un conjunto independiente en salas para un
/// periodo: candidatas ordenadas por capacidad ascendente, primera que
/// alcance (best-fit). Una sala por actividad por periodo; sin
/// desplazamientos. Devuelve las asignaciones y los índices que quedaron
/// sin sala en este periodo.
pub fn empacar_periodo(
    actividades: &mut [Actividad],
    conjunto: &[usize],
    salas: &[Sala],
    restricciones: &RestriccionesSalas,
) -> (Vec<AsignacionSala>, Vec<usize>) {
    let mut asignaciones = Vec::new();
    let mut sin_sala = Vec::new();

    // Salas ya ocupadas en este periodo
    let mut usadas: Vec<bool> = vec![false; salas.len()];

    for &idx in conjunto {
        let candidatas: Vec<usize> = {
            let act = &actividades[idx];
            let mut cs: Vec<usize> = (0..salas.len())
                .filter(|&i| {
                    !usadas[i]
                        && restricciones.sala_valida(&act.codigo_curso, act.tipo, &salas[i])
                })
                .collect();
            cs.sort_by_key(|&i| salas[i].capacidad);
            cs
        };

        let mut asignada = false;
        for i in candidatas {
            if actividades[idx].estudiantes <= salas[i].capacidad {
                actividades[idx].sala = salas[i].codigo.clone();
                usadas[i] = true;
                asignaciones.push(AsignacionSala {
                    codigo_sala: salas[i].codigo.clone(),
                    capacidad: salas[i].capacidad,
                    actividad: idx,
                    ocupacion: actividades[idx].estudiantes,
                });
                asignada = true;
                break;
            }
        }

        if !asignada {
            sin_sala.push(idx);
        }
    }

    (asignaciones, sin_sala)
}
