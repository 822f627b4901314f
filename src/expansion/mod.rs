// Expansión de la oferta académica en sesiones semanales (actividades)

use std::collections::HashMap;

use crate::models::{Actividad, Curso, CursoOferta, TipoEvento};

/// Genera la clave de grupo espejo de una cátedra.
/// Formato: "CURSO-CAT-SECCIONES" con las secciones ordenadas,
/// p. ej. "CBF1000-CAT-1,2".
pub fn clave_grupo_espejo(codigo_curso: &str, secciones: &[i32]) -> String {
    if secciones.is_empty() {
        return String::new();
    }
    let mut ordenadas = secciones.to_vec();
    ordenadas.sort_unstable();
    let lista: Vec<String> = ordenadas.iter().map(|s| s.to_string()).collect();
    format!("{}-CAT-{}", codigo_curso, lista.join(","))
}

/// Expande cada evento lógico de la oferta en sus sesiones semanales según
/// la distribución del curso. Una cátedra con frecuencia 2 produce dos
/// actividades que comparten grupo espejo; ayudantías y laboratorios no
/// llevan grupo. Todas las actividades parten sin asignar (bloque -1,
/// sala vacía).
pub fn expandir_actividades(oferta: &[CursoOferta], cursos: &[Curso]) -> Vec<Actividad> {
    let distribuciones: HashMap<&str, &Curso> =
        cursos.iter().map(|c| (c.codigo.as_str(), c)).collect();

    let mut actividades = Vec::new();
    let mut siguiente_id = 1;

    for curso_oferta in oferta {
        let dist = distribuciones
            .get(curso_oferta.codigo_curso.as_str())
            .map(|c| c.distribucion.clone())
            .unwrap_or_default();

        for evento in &curso_oferta.actividades {
            let sesiones = dist.sesiones(evento.tipo);
            let duracion = dist.duracion(evento.tipo);

            // Solo las cátedras agrupan sesiones espejo
            let grupo = if evento.tipo == TipoEvento::Catedra {
                clave_grupo_espejo(&curso_oferta.codigo_curso, &evento.secciones_vinculadas)
            } else {
                String::new()
            };

            for sesion in 1..=sesiones {
                let codigo_sesion = format!("{}-S{}", evento.codigo_actividad, sesion);
                actividades.push(Actividad::nueva(
                    siguiente_id,
                    codigo_sesion,
                    curso_oferta.codigo_curso.clone(),
                    curso_oferta.nombre_curso.clone(),
                    evento.tipo,
                    evento.numero_evento,
                    evento.secciones_vinculadas.clone(),
                    evento.total_estudiantes,
                    evento.profesores.clone(),
                    grupo.clone(),
                    duracion,
                ));
                siguiente_id += 1;
            }
        }
    }

    println!(
        "[expansion] {} eventos de oferta expandidos en {} actividades",
        oferta.iter().map(|c| c.actividades.len()).sum::<usize>(),
        actividades.len()
    );

    actividades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Distribucion, EventoOferta};

    fn curso_con_distribucion(codigo: &str, dist: Distribucion) -> Curso {
        Curso {
            codigo: codigo.to_string(),
            nombre: format!("Curso {}", codigo),
            plan: HashMap::new(),
            electivo: false,
            prerequisitos: vec![],
            distribucion: dist,
        }
    }

    fn oferta_simple(codigo: &str, tipo: TipoEvento, secciones: Vec<i32>) -> CursoOferta {
        CursoOferta {
            codigo_curso: codigo.to_string(),
            nombre_curso: format!("Curso {}", codigo),
            actividades: vec![EventoOferta {
                codigo_actividad: format!("{}-{}-1", codigo, tipo.como_str()),
                tipo,
                numero_evento: 1,
                secciones_vinculadas: secciones,
                total_estudiantes: 40,
                profesores: vec!["Ana Rojas".to_string()],
            }],
        }
    }

    #[test]
    fn test_clave_grupo_espejo_ordena_secciones() {
        assert_eq!(clave_grupo_espejo("CBF1000", &[2, 1]), "CBF1000-CAT-1,2");
        assert_eq!(clave_grupo_espejo("CBF1000", &[3]), "CBF1000-CAT-3");
        assert_eq!(clave_grupo_espejo("CBF1000", &[]), "");
    }

    #[test]
    fn test_catedra_frecuencia_dos_genera_hermanas() {
        let curso = curso_con_distribucion(
            "CIT1000",
            Distribucion {
                num_cat: 2,
                ..Default::default()
            },
        );
        let oferta = vec![oferta_simple("CIT1000", TipoEvento::Catedra, vec![1, 2])];

        let acts = expandir_actividades(&oferta, &[curso]);
        assert_eq!(acts.len(), 2);
        assert_eq!(acts[0].codigo, "CIT1000-CATEDRA-1-S1");
        assert_eq!(acts[1].codigo, "CIT1000-CATEDRA-1-S2");
        assert_eq!(acts[0].grupo_espejo, "CIT1000-CAT-1,2");
        assert!(acts[0].es_hermana_de(&acts[1]));
        assert_eq!(acts[0].bloque, -1);
        assert_eq!(acts[0].sala, "");
    }

    #[test]
    fn test_ayudantia_sin_grupo_espejo() {
        let curso = curso_con_distribucion("CIT1000", Distribucion::default());
        let oferta = vec![oferta_simple("CIT1000", TipoEvento::Ayudantia, vec![1])];

        let acts = expandir_actividades(&oferta, &[curso]);
        assert_eq!(acts.len(), 1);
        assert_eq!(acts[0].grupo_espejo, "");
    }

    #[test]
    fn test_duracion_de_laboratorio_viene_de_la_distribucion() {
        let curso = curso_con_distribucion(
            "CBF1000",
            Distribucion {
                num_lab: 1,
                duracion_lab: 2,
                ..Default::default()
            },
        );
        let oferta = vec![oferta_simple("CBF1000", TipoEvento::Laboratorio, vec![1])];

        let acts = expandir_actividades(&oferta, &[curso]);
        assert_eq!(acts.len(), 1);
        assert_eq!(acts[0].duracion, 2);
    }

    #[test]
    fn test_curso_sin_distribucion_usa_una_sesion() {
        // La oferta puede traer cursos que no aparecen en el catálogo
        let oferta = vec![oferta_simple("ELE-001", TipoEvento::Catedra, vec![5])];
        let acts = expandir_actividades(&oferta, &[]);
        assert_eq!(acts.len(), 1);
        assert_eq!(acts[0].duracion, 1);
    }

    #[test]
    fn test_ids_secuenciales_entre_cursos() {
        let c1 = curso_con_distribucion(
            "CIT1000",
            Distribucion {
                num_cat: 2,
                ..Default::default()
            },
        );
        let c2 = curso_con_distribucion("CBM1001", Distribucion::default());
        let oferta = vec![
            oferta_simple("CIT1000", TipoEvento::Catedra, vec![1]),
            oferta_simple("CBM1001", TipoEvento::Catedra, vec![1]),
        ];

        let acts = expandir_actividades(&oferta, &[c1, c2]);
        let ids: Vec<i32> = acts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
