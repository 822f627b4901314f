// Función de costo blando del recocido y métricas de calidad

use serde::{Deserialize, Serialize};

use crate::models::{dia_de, slot_de, TipoEvento};

use super::estado::EstadoSA;

// Pesos de las preferencias blandas
const PENA_ESPEJO: f64 = 50.0; // hermanas en distinto slot del día
const PENA_SALA_DISTINTA: f64 = 30.0; // hermanas en salas distintas
const BONO_GAP_IDEAL: f64 = -20.0; // grupos de 2: separación de 3 días
const PENA_GAP_UNO: f64 = 25.0;
const PENA_GAP_CERO: f64 = 60.0;
const PENA_GAP_LARGO: f64 = 10.0; // grupos de 2: separación de 4+ días
const PENA_COLISION_DIA: f64 = 80.0; // grupos de 3+: mismo día
const PENA_DIA_ADYACENTE: f64 = 15.0; // grupos de 3+: días adyacentes
const PENA_CAT_AY_MISMO_DIA: f64 = 35.0;
const PENA_AY_NO_MIERCOLES: f64 = 10.0;
const BONO_PREREQ_MISMO_BLOQUE: f64 = -15.0;

const DIA_MIERCOLES: i32 = 2;

/// Término de un par de cátedras hermanas (ambas asignadas). El tratamiento
/// de la separación de días depende del tamaño del grupo: con dos sesiones
/// se premia la separación ideal de 3 días; con tres o más solo se castigan
/// las colisiones.
fn termino_par_catedras(
    bloque_a: i32,
    sala_a: &str,
    bloque_b: i32,
    sala_b: &str,
    tam_grupo: usize,
) -> f64 {
    let mut t = 0.0;

    if slot_de(bloque_a) != slot_de(bloque_b) {
        t += PENA_ESPEJO;
    }
    if sala_a != sala_b {
        t += PENA_SALA_DISTINTA;
    }

    let gap = (dia_de(bloque_a) - dia_de(bloque_b)).abs();
    if tam_grupo == 2 {
        t += match gap {
            3 => BONO_GAP_IDEAL,
            2 => 0.0,
            1 => PENA_GAP_UNO,
            0 => PENA_GAP_CERO,
            _ => PENA_GAP_LARGO,
        };
    } else if tam_grupo >= 3 {
        t += match gap {
            0 => PENA_COLISION_DIA,
            1 => PENA_DIA_ADYACENTE,
            _ => 0.0,
        };
    }

    t
}

/// Cátedras hermanas del grupo de una actividad (incluida ella), con el
/// tamaño estructural del grupo.
fn hermanas_catedra(estado: &EstadoSA, idx: usize) -> (Vec<usize>, usize) {
    let a = &estado.actividades[idx];
    let miembros = match estado.hermanos.get(&a.grupo_espejo) {
        Some(m) => m,
        None => return (Vec::new(), 0),
    };
    let cats: Vec<usize> = miembros
        .iter()
        .copied()
        .filter(|&i| estado.actividades[i].tipo == TipoEvento::Catedra)
        .collect();
    let tam = cats.len();
    (cats, tam)
}

/// Términos que dependen solo de la propia actividad.
pub fn costo_individual(estado: &EstadoSA, idx: usize) -> f64 {
    let a = &estado.actividades[idx];
    if !a.asignada() {
        return 0.0;
    }
    if a.tipo == TipoEvento::Ayudantia && dia_de(a.bloque) != DIA_MIERCOLES {
        PENA_AY_NO_MIERCOLES
    } else {
        0.0
    }
}

/// Suma de todos los términos de par que tocan a la actividad. Cada par se
/// cuenta completo, así el delta de un movimiento es exactamente la
/// diferencia de esta contribución.
pub fn costo_pares(estado: &EstadoSA, idx: usize) -> f64 {
    let a = &estado.actividades[idx];
    if !a.asignada() {
        return 0.0;
    }

    let mut costo = 0.0;

    match a.tipo {
        TipoEvento::Catedra if !a.grupo_espejo.is_empty() => {
            let (cats, tam) = hermanas_catedra(estado, idx);
            for &otra in &cats {
                if otra == idx || !estado.actividades[otra].asignada() {
                    continue;
                }
                let b = &estado.actividades[otra];
                costo += termino_par_catedras(a.bloque, &a.sala, b.bloque, &b.sala, tam);
            }
            for ay in estado.ayudantias_asociadas(idx) {
                let b = &estado.actividades[ay];
                if b.asignada() && dia_de(a.bloque) == dia_de(b.bloque) {
                    costo += PENA_CAT_AY_MISMO_DIA;
                }
            }
        }
        TipoEvento::Ayudantia => {
            for cat in estado.catedras_asociadas(idx) {
                let b = &estado.actividades[cat];
                if b.asignada() && dia_de(a.bloque) == dia_de(b.bloque) {
                    costo += PENA_CAT_AY_MISMO_DIA;
                }
            }
        }
        _ => {}
    }

    for &socio in &estado.socios_prereq[idx] {
        let b = &estado.actividades[socio];
        if b.asignada() && b.bloque == a.bloque {
            costo += BONO_PREREQ_MISMO_BLOQUE;
        }
    }

    costo
}

/// Contribución completa de una actividad (términos propios + pares).
pub fn costo_actividad(estado: &EstadoSA, idx: usize) -> f64 {
    costo_individual(estado, idx) + costo_pares(estado, idx)
}

/// Costo global de la solución, computado directamente (cada par una sola
/// vez). Debe coincidir con la suma de contribuciones con los pares
/// simetrizados.
pub fn costo_total(estado: &EstadoSA) -> f64 {
    let mut costo = 0.0;

    for idx in 0..estado.actividades.len() {
        costo += costo_individual(estado, idx);
    }

    // Pares de cátedras hermanas
    for miembros in estado.hermanos.values() {
        let cats: Vec<usize> = miembros
            .iter()
            .copied()
            .filter(|&i| estado.actividades[i].tipo == TipoEvento::Catedra)
            .collect();
        let tam = cats.len();
        for i in 0..cats.len() {
            for j in (i + 1)..cats.len() {
                let a = &estado.actividades[cats[i]];
                let b = &estado.actividades[cats[j]];
                if a.asignada() && b.asignada() {
                    costo += termino_par_catedras(a.bloque, &a.sala, b.bloque, &b.sala, tam);
                }
            }
        }
    }

    // Pares cátedra-ayudantía (contados desde el lado de la cátedra)
    for idx in 0..estado.actividades.len() {
        let a = &estado.actividades[idx];
        if a.tipo != TipoEvento::Catedra || a.grupo_espejo.is_empty() || !a.asignada() {
            continue;
        }
        for ay in estado.ayudantias_asociadas(idx) {
            let b = &estado.actividades[ay];
            if b.asignada() && dia_de(a.bloque) == dia_de(b.bloque) {
                costo += PENA_CAT_AY_MISMO_DIA;
            }
        }
    }

    // Pares de prerequisito
    for &(p, d) in &estado.pares_prereq {
        let a = &estado.actividades[p];
        let b = &estado.actividades[d];
        if a.asignada() && b.asignada() && a.bloque == b.bloque {
            costo += BONO_PREREQ_MISMO_BLOQUE;
        }
    }

    costo
}

// --------------------------------------------------------------------------
// Métricas de calidad
// --------------------------------------------------------------------------

/// Métricas reportadas al final del recocido. Los porcentajes valen 100
/// cuando no hay elementos elegibles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metricas {
    pub costo_total: f64,
    pub penalizacion_espejo: f64,
    /// Porcentaje de pares de cátedras hermanas en el mismo slot del día.
    pub espejo_cumplido_pct: f64,
    pub ayudantias_miercoles_pct: f64,
    pub prerequisitos_mismo_bloque_pct: f64,
    pub consistencia_salas_pct: f64,
    pub separacion_ideal_pct: f64,
}

fn porcentaje(parte: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        parte as f64 / total as f64 * 100.0
    }
}

pub fn calcular_metricas(estado: &EstadoSA) -> Metricas {
    // Penalización de espejo: solo el término de slot distinto
    let mut penalizacion_espejo = 0.0;
    let mut pares_totales = 0usize;
    let mut pares_espejados = 0usize;
    // Consistencia de salas y separación ideal por grupo
    let mut grupos_elegibles = 0usize;
    let mut grupos_misma_sala = 0usize;
    let mut grupos_de_dos = 0usize;
    let mut grupos_gap_ideal = 0usize;

    for miembros in estado.hermanos.values() {
        let cats: Vec<usize> = miembros
            .iter()
            .copied()
            .filter(|&i| estado.actividades[i].tipo == TipoEvento::Catedra)
            .collect();
        if cats.len() < 2 {
            continue;
        }

        grupos_elegibles += 1;

        for i in 0..cats.len() {
            for j in (i + 1)..cats.len() {
                let a = &estado.actividades[cats[i]];
                let b = &estado.actividades[cats[j]];
                if !a.asignada() || !b.asignada() {
                    continue;
                }
                pares_totales += 1;
                if slot_de(a.bloque) == slot_de(b.bloque) {
                    pares_espejados += 1;
                } else {
                    penalizacion_espejo += PENA_ESPEJO;
                }
            }
        }

        let todas_asignadas = cats.iter().all(|&i| estado.actividades[i].asignada());
        if todas_asignadas {
            let sala0 = &estado.actividades[cats[0]].sala;
            if cats.iter().all(|&i| estado.actividades[i].sala == *sala0) {
                grupos_misma_sala += 1;
            }
        }

        if cats.len() == 2 {
            grupos_de_dos += 1;
            let a = &estado.actividades[cats[0]];
            let b = &estado.actividades[cats[1]];
            if a.asignada()
                && b.asignada()
                && (dia_de(a.bloque) - dia_de(b.bloque)).abs() == 3
            {
                grupos_gap_ideal += 1;
            }
        }
    }

    // Ayudantías en miércoles
    let ayudantias: Vec<usize> = (0..estado.actividades.len())
        .filter(|&i| {
            estado.actividades[i].tipo == TipoEvento::Ayudantia && estado.actividades[i].asignada()
        })
        .collect();
    let en_miercoles = ayudantias
        .iter()
        .filter(|&&i| dia_de(estado.actividades[i].bloque) == DIA_MIERCOLES)
        .count();

    // Pares de prerequisito en el mismo bloque
    let colocados = estado
        .pares_prereq
        .iter()
        .filter(|&&(p, d)| {
            let a = &estado.actividades[p];
            let b = &estado.actividades[d];
            a.asignada() && b.asignada() && a.bloque == b.bloque
        })
        .count();

    Metricas {
        costo_total: costo_total(estado),
        penalizacion_espejo,
        espejo_cumplido_pct: porcentaje(pares_espejados, pares_totales),
        ayudantias_miercoles_pct: porcentaje(en_miercoles, ayudantias.len()),
        prerequisitos_mismo_bloque_pct: porcentaje(colocados, estado.pares_prereq.len()),
        consistencia_salas_pct: porcentaje(grupos_misma_sala, grupos_elegibles),
        separacion_ideal_pct: porcentaje(grupos_gap_ideal, grupos_de_dos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Actividad, Curso, Distribucion};
    use std::collections::HashMap;

    fn catedra(id: i32, curso: &str, grupo: &str, bloque: i32, sala: &str) -> Actividad {
        let mut a = Actividad::nueva(
            id,
            format!("{}-CAT-1-S{}", curso, id),
            curso.to_string(),
            curso.to_string(),
            TipoEvento::Catedra,
            1,
            vec![1],
            30,
            vec![],
            grupo.to_string(),
            1,
        );
        a.bloque = bloque;
        a.sala = sala.to_string();
        a
    }

    fn ayudantia(id: i32, curso: &str, bloque: i32, sala: &str) -> Actividad {
        let mut a = Actividad::nueva(
            id,
            format!("{}-AY-1-S{}", curso, id),
            curso.to_string(),
            curso.to_string(),
            TipoEvento::Ayudantia,
            1,
            vec![1],
            30,
            vec![],
            String::new(),
            1,
        );
        a.bloque = bloque;
        a.sala = sala.to_string();
        a
    }

    #[test]
    fn test_par_espejo_perfecto_con_gap_ideal() {
        // Lunes bloque 1 y jueves bloque 22: mismo slot (1), gap 3, misma sala
        let acts = vec![
            catedra(1, "CIT1000", "CIT1000-CAT-1", 1, "101"),
            catedra(2, "CIT1000", "CIT1000-CAT-1", 22, "101"),
        ];
        let estado = EstadoSA::nuevo(acts, &[]);

        assert_eq!(costo_total(&estado), BONO_GAP_IDEAL);
        let m = calcular_metricas(&estado);
        assert_eq!(m.penalizacion_espejo, 0.0);
        assert_eq!(m.espejo_cumplido_pct, 100.0);
        assert_eq!(m.consistencia_salas_pct, 100.0);
        assert_eq!(m.separacion_ideal_pct, 100.0);
    }

    #[test]
    fn test_par_sin_espejo_suma_penalizaciones() {
        // Lunes slot 1 y martes slot 2: slot distinto (+50), sala distinta
        // (+30), gap 1 (+25)
        let acts = vec![
            catedra(1, "CIT1000", "CIT1000-CAT-1", 1, "101"),
            catedra(2, "CIT1000", "CIT1000-CAT-1", 9, "202"),
        ];
        let estado = EstadoSA::nuevo(acts, &[]);

        assert_eq!(costo_total(&estado), 50.0 + 30.0 + 25.0);
        let m = calcular_metricas(&estado);
        assert_eq!(m.penalizacion_espejo, 50.0);
        assert_eq!(m.espejo_cumplido_pct, 0.0);
    }

    #[test]
    fn test_grupo_de_tres_castiga_solo_colisiones() {
        // Tres hermanas mismo slot, días 0, 0 y 1:
        // pares: (0,0) gap 0 -> +80; (0,1) gap 1 -> +15; (0,1) gap 1 -> +15
        let acts = vec![
            catedra(1, "CIT1000", "G", 1, "101"),
            catedra(2, "CIT1000", "G", 1, "101"),
            catedra(3, "CIT1000", "G", 8, "101"),
        ];
        let estado = EstadoSA::nuevo(acts, &[]);

        assert_eq!(costo_total(&estado), 80.0 + 15.0 + 15.0);
    }

    #[test]
    fn test_ayudantia_fuera_de_miercoles() {
        let acts = vec![ayudantia(1, "CIT1000", 0, "101")];
        let estado = EstadoSA::nuevo(acts, &[]);
        assert_eq!(costo_total(&estado), PENA_AY_NO_MIERCOLES);

        let acts = vec![ayudantia(1, "CIT1000", 15, "101")]; // miércoles slot 1
        let estado = EstadoSA::nuevo(acts, &[]);
        assert_eq!(costo_total(&estado), 0.0);
        assert_eq!(calcular_metricas(&estado).ayudantias_miercoles_pct, 100.0);
    }

    #[test]
    fn test_catedra_con_ayudantia_el_mismo_dia() {
        // Cátedra lunes slot 0, ayudantía lunes slot 3 (misma sección):
        // +35 por compartir día, +10 por ayudantía fuera de miércoles
        let acts = vec![
            catedra(1, "CIT1000", "CIT1000-CAT-1", 0, "101"),
            ayudantia(2, "CIT1000", 3, "102"),
        ];
        let estado = EstadoSA::nuevo(acts, &[]);
        assert_eq!(costo_total(&estado), 35.0 + 10.0);
    }

    #[test]
    fn test_bono_prerequisito_mismo_bloque() {
        let acts = vec![
            catedra(1, "CBM1000", "CBM1000-CAT-1", 4, "101"),
            catedra(2, "CBM2000", "CBM2000-CAT-1", 4, "102"),
        ];
        let cursos = vec![Curso {
            codigo: "CBM2000".to_string(),
            nombre: "Cálculo II".to_string(),
            plan: HashMap::new(),
            electivo: false,
            prerequisitos: vec!["CBM1000".to_string()],
            distribucion: Distribucion::default(),
        }];
        let estado = EstadoSA::nuevo(acts, &cursos);

        assert_eq!(costo_total(&estado), BONO_PREREQ_MISMO_BLOQUE);
        assert_eq!(
            calcular_metricas(&estado).prerequisitos_mismo_bloque_pct,
            100.0
        );
    }

    #[test]
    fn test_descomposicion_aditiva() {
        // Global == suma de contribuciones con pares a la mitad
        let mut acts = vec![
            catedra(1, "CIT1000", "CIT1000-CAT-1", 1, "101"),
            catedra(2, "CIT1000", "CIT1000-CAT-1", 9, "202"),
            ayudantia(3, "CIT1000", 3, "103"),
            catedra(4, "CBM1000", "CBM1000-CAT-1", 4, "104"),
        ];
        acts[2].secciones = vec![7]; // sección distinta: sin vínculo con las cátedras
        let cursos = vec![Curso {
            codigo: "CIT1000".to_string(),
            nombre: "Programación".to_string(),
            plan: HashMap::new(),
            electivo: false,
            prerequisitos: vec!["CBM1000".to_string()],
            distribucion: Distribucion::default(),
        }];
        let estado = EstadoSA::nuevo(acts, &cursos);

        let global = costo_total(&estado);
        let descompuesto: f64 = (0..estado.actividades.len())
            .map(|i| costo_individual(&estado, i) + costo_pares(&estado, i) / 2.0)
            .sum();
        assert!((global - descompuesto).abs() < 1e-9);
    }

    #[test]
    fn test_actividades_sin_asignar_no_aportan() {
        let mut acts = vec![
            catedra(1, "CIT1000", "CIT1000-CAT-1", 1, "101"),
            catedra(2, "CIT1000", "CIT1000-CAT-1", -1, ""),
        ];
        acts[1].bloque = -1;
        let estado = EstadoSA::nuevo(acts, &[]);
        assert_eq!(costo_total(&estado), 0.0);
    }

    #[test]
    fn test_metricas_sin_grupos_elegibles() {
        let acts = vec![catedra(1, "CIT1000", "CIT1000-CAT-1", 1, "101")];
        let estado = EstadoSA::nuevo(acts, &[]);
        let m = calcular_metricas(&estado);
        assert_eq!(m.espejo_cumplido_pct, 100.0);
        assert_eq!(m.consistencia_salas_pct, 100.0);
        assert_eq!(m.separacion_ideal_pct, 100.0);
        assert_eq!(m.ayudantias_miercoles_pct, 100.0);
        assert_eq!(m.prerequisitos_mismo_bloque_pct, 100.0);
    }
}
