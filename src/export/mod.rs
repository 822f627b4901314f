// Adaptador de exportación: convierte el resultado en registros planos
// serializables (lista de actividades, grilla por día y resumen)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::expansion::clave_grupo_espejo;
use crate::models::{
    dia_de, slot_de, Actividad, TipoEvento, BLOQUES_POR_DIA, DIAS_POR_SEMANA, NOMBRES_DIAS,
    RANGOS_HORARIOS, TOTAL_BLOQUES,
};
use crate::sa::Metricas;

/// Una actividad en el JSON exportado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActividadExport {
    pub codigo: String,
    pub codigo_curso: String,
    pub nombre_curso: String,
    pub tipo: String,
    pub sala: String,
    pub bloque_inicio: i32,
    pub bloque_fin: i32,
    pub duracion: i32,
    pub dia: String,
    pub horario: String,
    pub estudiantes: i32,
    pub profesores: Vec<String>,
    pub secciones: Vec<i32>,
}

/// Celda de la grilla semanal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloqueSlot {
    pub bloque: i32,
    pub horario: String,
    pub actividades: Vec<ActividadExport>,
}

/// Un día completo de la grilla.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaHorario {
    pub dia: String,
    pub bloques: Vec<BloqueSlot>,
}

/// Diagnóstico de una actividad que quedó sin programar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DudExport {
    pub codigo: String,
    pub tipo: String,
    pub nombre_curso: String,
    pub estudiantes: i32,
}

/// Resumen general del horario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumenHorario {
    pub total_actividades: usize,
    pub total_cursos: usize,
    pub total_salas: usize,
    pub total_sin_programar: usize,
    /// Porcentaje de ayudantías asignadas que cayeron en miércoles.
    pub ayudantias_miercoles_pct: f64,
    /// Porcentaje de pares de cátedras hermanas en el mismo slot del día.
    pub espejo_cumplido_pct: f64,
}

/// Estructura raíz del JSON exportado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportHorario {
    pub generado_en: String,
    pub resumen: ResumenHorario,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metricas: Option<Metricas>,
    pub horario: Vec<DiaHorario>,
    pub actividades: Vec<ActividadExport>,
    pub sin_programar: Vec<DudExport>,
}

fn porcentaje(parte: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        parte as f64 / total as f64 * 100.0
    }
}

/// Rango horario de una actividad: desde el inicio de su primer slot hasta
/// el fin del último (duración-consciente).
fn rango_horario(bloque: i32, duracion: i32) -> String {
    let slot_inicio = slot_de(bloque) as usize;
    let mut slot_fin = slot_de(bloque + duracion - 1) as usize;
    if slot_fin >= RANGOS_HORARIOS.len() {
        slot_fin = RANGOS_HORARIOS.len() - 1;
    }
    let inicio = RANGOS_HORARIOS[slot_inicio].split('-').next().unwrap_or("");
    let fin = RANGOS_HORARIOS[slot_fin].split('-').nth(1).unwrap_or("");
    format!("{}-{}", inicio, fin)
}

fn a_export(a: &Actividad) -> ActividadExport {
    let (dia, horario) = if a.bloque >= 0 && a.bloque < TOTAL_BLOQUES {
        (
            NOMBRES_DIAS[dia_de(a.bloque) as usize].to_string(),
            rango_horario(a.bloque, a.duracion),
        )
    } else {
        (String::new(), String::new())
    };

    ActividadExport {
        codigo: a.codigo.clone(),
        codigo_curso: a.codigo_curso.clone(),
        nombre_curso: a.nombre_curso.clone(),
        tipo: a.tipo.como_str().to_string(),
        sala: a.sala.clone(),
        bloque_inicio: a.bloque,
        bloque_fin: if a.bloque >= 0 {
            a.bloque + a.duracion - 1
        } else {
            -1
        },
        duracion: a.duracion,
        dia,
        horario,
        estudiantes: a.estudiantes,
        profesores: a.profesores.clone(),
        secciones: a.secciones.clone(),
    }
}

/// Construye la estructura exportable completa a partir de las actividades
/// finales. Las no asignadas van a la lista plana (con bloque -1) y al
/// diagnóstico `sin_programar`, nunca a la grilla.
pub fn exportar(actividades: &[Actividad], metricas: Option<&Metricas>) -> ExportHorario {
    let cursos: HashSet<&str> = actividades.iter().map(|a| a.codigo_curso.as_str()).collect();
    let salas: HashSet<&str> = actividades
        .iter()
        .filter(|a| !a.sala.is_empty())
        .map(|a| a.sala.as_str())
        .collect();

    // Grilla por día: la actividad aparece en el slot de su bloque de inicio
    let mut horario: Vec<DiaHorario> = (0..DIAS_POR_SEMANA as usize)
        .map(|d| DiaHorario {
            dia: NOMBRES_DIAS[d].to_string(),
            bloques: (0..BLOQUES_POR_DIA as usize)
                .map(|s| BloqueSlot {
                    bloque: (d * BLOQUES_POR_DIA as usize + s) as i32,
                    horario: RANGOS_HORARIOS[s].to_string(),
                    actividades: Vec::new(),
                })
                .collect(),
        })
        .collect();

    for a in actividades {
        if !a.asignada() || a.bloque >= TOTAL_BLOQUES {
            continue;
        }
        let d = dia_de(a.bloque) as usize;
        let s = slot_de(a.bloque) as usize;
        horario[d].bloques[s].actividades.push(a_export(a));
    }

    // Lista plana ordenada por curso y código
    let mut lista: Vec<ActividadExport> = actividades.iter().map(a_export).collect();
    lista.sort_by(|x, y| {
        x.codigo_curso
            .cmp(&y.codigo_curso)
            .then_with(|| x.codigo.cmp(&y.codigo))
    });

    let sin_programar: Vec<DudExport> = actividades
        .iter()
        .filter(|a| !a.asignada())
        .map(|a| DudExport {
            codigo: a.codigo.clone(),
            tipo: a.tipo.como_str().to_string(),
            nombre_curso: a.nombre_curso.clone(),
            estudiantes: a.estudiantes,
        })
        .collect();

    // Porcentajes del resumen, calculados directo de las actividades
    let ayudantias: Vec<&Actividad> = actividades
        .iter()
        .filter(|a| a.tipo == TipoEvento::Ayudantia && a.asignada())
        .collect();
    let en_miercoles = ayudantias
        .iter()
        .filter(|a| dia_de(a.bloque) == 2) // Miércoles
        .count();

    let mut grupos: HashMap<&str, Vec<&Actividad>> = HashMap::new();
    for a in actividades {
        if a.tipo == TipoEvento::Catedra && !a.grupo_espejo.is_empty() {
            grupos.entry(a.grupo_espejo.as_str()).or_default().push(a);
        }
    }
    let mut pares_totales = 0usize;
    let mut pares_espejados = 0usize;
    for miembros in grupos.values() {
        for i in 0..miembros.len() {
            for j in (i + 1)..miembros.len() {
                let (a, b) = (miembros[i], miembros[j]);
                if !a.asignada() || !b.asignada() {
                    continue;
                }
                pares_totales += 1;
                if slot_de(a.bloque) == slot_de(b.bloque) {
                    pares_espejados += 1;
                }
            }
        }
    }

    ExportHorario {
        generado_en: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        resumen: ResumenHorario {
            total_actividades: actividades.len(),
            total_cursos: cursos.len(),
            total_salas: salas.len(),
            total_sin_programar: sin_programar.len(),
            ayudantias_miercoles_pct: porcentaje(en_miercoles, ayudantias.len()),
            espejo_cumplido_pct: porcentaje(pares_espejados, pares_totales),
        },
        metricas: metricas.cloned(),
        horario,
        actividades: lista,
        sin_programar,
    }
}

/// Serializa el export a JSON con indentación.
pub fn exportar_json(
    actividades: &[Actividad],
    metricas: Option<&Metricas>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&exportar(actividades, metricas))
}

/// Reconstruye actividades desde un export (conservando bloque y sala).
/// El grupo espejo se vuelve a derivar de curso + tipo + secciones, de modo
/// que re-puntuar el horario importado da el mismo costo blando.
pub fn importar_actividades(export: &ExportHorario) -> Vec<Actividad> {
    let mut actividades = Vec::with_capacity(export.actividades.len());
    for (i, e) in export.actividades.iter().enumerate() {
        let tipo = match e.tipo.as_str() {
            "AYUDANTIA" => TipoEvento::Ayudantia,
            "LABORATORIO" => TipoEvento::Laboratorio,
            _ => TipoEvento::Catedra,
        };
        let grupo = if tipo == TipoEvento::Catedra {
            clave_grupo_espejo(&e.codigo_curso, &e.secciones)
        } else {
            String::new()
        };
        let mut a = Actividad::nueva(
            (i + 1) as i32,
            e.codigo.clone(),
            e.codigo_curso.clone(),
            e.nombre_curso.clone(),
            tipo,
            0,
            e.secciones.clone(),
            e.estudiantes,
            e.profesores.clone(),
            grupo,
            e.duracion,
        );
        a.bloque = e.bloque_inicio;
        a.sala = e.sala.clone();
        actividades.push(a);
    }
    actividades
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actividad(id: i32, tipo: TipoEvento, bloque: i32, sala: &str, duracion: i32) -> Actividad {
        let mut a = Actividad::nueva(
            id,
            format!("CIT1000-{}-1-S{}", tipo.como_str(), id),
            "CIT1000".to_string(),
            "Programación".to_string(),
            tipo,
            1,
            vec![1],
            30,
            vec!["Ana Rojas".to_string()],
            if tipo == TipoEvento::Catedra {
                "CIT1000-CAT-1".to_string()
            } else {
                String::new()
            },
            duracion,
        );
        a.bloque = bloque;
        a.sala = sala.to_string();
        a
    }

    #[test]
    fn test_export_de_actividad_asignada() {
        let acts = vec![actividad(1, TipoEvento::Catedra, 8, "101", 1)];
        let export = exportar(&acts, None);

        let e = &export.actividades[0];
        assert_eq!(e.dia, "Martes");
        assert_eq!(e.horario, "10:00-11:20");
        assert_eq!(e.bloque_inicio, 8);
        assert_eq!(e.bloque_fin, 8);
        assert!(export.sin_programar.is_empty());

        // aparece en la celda correcta de la grilla
        assert_eq!(export.horario[1].bloques[1].actividades.len(), 1);

        // sin pares de hermanas ni ayudantías, los porcentajes quedan en 100
        assert_eq!(export.resumen.espejo_cumplido_pct, 100.0);
        assert_eq!(export.resumen.ayudantias_miercoles_pct, 100.0);
    }

    #[test]
    fn test_resumen_porcentajes() {
        let acts = vec![
            actividad(1, TipoEvento::Catedra, 1, "101", 1),
            actividad(2, TipoEvento::Catedra, 22, "101", 1), // jueves, mismo slot
            actividad(3, TipoEvento::Ayudantia, 0, "102", 1), // lunes
        ];
        let export = exportar(&acts, None);

        assert_eq!(export.resumen.espejo_cumplido_pct, 100.0);
        assert_eq!(export.resumen.ayudantias_miercoles_pct, 0.0);

        // par sin espejo: slots distintos
        let acts = vec![
            actividad(1, TipoEvento::Catedra, 1, "101", 1),
            actividad(2, TipoEvento::Catedra, 23, "101", 1), // jueves, otro slot
        ];
        let export = exportar(&acts, None);
        assert_eq!(export.resumen.espejo_cumplido_pct, 0.0);
    }

    #[test]
    fn test_rango_horario_duracion_dos() {
        let acts = vec![actividad(1, TipoEvento::Laboratorio, 7, "LAB D", 2)];
        let export = exportar(&acts, None);

        let e = &export.actividades[0];
        assert_eq!(e.dia, "Martes");
        assert_eq!(e.horario, "08:30-11:20");
        assert_eq!(e.bloque_fin, 8);
    }

    #[test]
    fn test_dud_va_al_diagnostico_y_no_a_la_grilla() {
        let mut a = actividad(1, TipoEvento::Catedra, -1, "", 1);
        a.bloque = -1;
        a.sala.clear();
        let export = exportar(&[a], None);

        assert_eq!(export.sin_programar.len(), 1);
        assert_eq!(export.sin_programar[0].codigo, "CIT1000-CATEDRA-1-S1");
        assert_eq!(export.resumen.total_sin_programar, 1);
        let en_grilla: usize = export
            .horario
            .iter()
            .flat_map(|d| d.bloques.iter())
            .map(|b| b.actividades.len())
            .sum();
        assert_eq!(en_grilla, 0);

        let e = &export.actividades[0];
        assert_eq!(e.bloque_inicio, -1);
        assert_eq!(e.dia, "");
        assert_eq!(e.horario, "");
    }

    #[test]
    fn test_importar_conserva_bloque_sala_y_grupo() {
        let acts = vec![
            actividad(1, TipoEvento::Catedra, 1, "101", 1),
            actividad(2, TipoEvento::Catedra, 22, "101", 1),
        ];
        let export = exportar(&acts, None);
        let importadas = importar_actividades(&export);

        assert_eq!(importadas.len(), 2);
        for imp in &importadas {
            assert_eq!(imp.grupo_espejo, "CIT1000-CAT-1");
        }
        let mut bloques: Vec<i32> = importadas.iter().map(|a| a.bloque).collect();
        bloques.sort_unstable();
        assert_eq!(bloques, vec![1, 22]);
    }

    #[test]
    fn test_json_serializa() {
        let acts = vec![actividad(1, TipoEvento::Catedra, 0, "101", 1)];
        let json = exportar_json(&acts, None).unwrap();
        assert!(json.contains("\"dia\": \"Lunes\""));
        assert!(json.contains("\"horario\": \"08:30-09:50\""));
    }
}
