// Scheduler constructivo integrado: coloreo por conjunto independiente
// máximo + empaquetado de salas, periodo a periodo

pub mod independiente;
pub mod salas;

use crate::error::ErrorNucleo;
use crate::grafo::GrafoConflictos;
use crate::models::{es_bloque_protegido, Actividad, RestriccionesSalas, Sala, TOTAL_BLOQUES};

pub use independiente::conjunto_independiente;
pub use salas::{empacar_periodo, salas_candidatas, AsignacionSala};

/// Un bloque programado: el conjunto independiente del periodo con sus
/// salas, más el DUD local (actividades del conjunto que no consiguieron
/// sala y vuelven al grafo).
#[derive(Debug, Clone)]
pub struct Periodo {
    pub numero: i32,
    pub bloque: i32,
    pub asignaciones: Vec<AsignacionSala>,
    pub sin_sala: Vec<usize>,
}

/// Resultado del algoritmo integrado.
#[derive(Debug, Clone)]
pub struct ResultadoConstructivo {
    pub periodos: Vec<Periodo>,
    /// Índices de actividades que nunca consiguieron bloque+sala.
    pub dud_final: Vec<usize>,
    pub total_periodos: i32,
}

/// Ejecuta el algoritmo integrado sobre una copia del grafo.
///
/// Por periodo: si el bloque es el protegido se salta; se extrae un
/// conjunto independiente máximo del grafo restante; se empacan salas con
/// best-fit restringido; las actividades que recibieron sala se comprometen
/// al bloque y salen del grafo. Termina al vaciarse el grafo o al agotar
/// los 35 bloques. Los vértices restantes son el DUD final y se devuelven
/// sin asignar (bloque -1, sala vacía).
pub fn programar(
    actividades: &mut [Actividad],
    grafo: &GrafoConflictos,
    salas: &[Sala],
    restricciones: &RestriccionesSalas,
) -> Result<ResultadoConstructivo, ErrorNucleo> {
    if actividades.is_empty() {
        return Err(ErrorNucleo::ConfiguracionInvalida(
            "no hay actividades que programar".to_string(),
        ));
    }
    if salas.is_empty() {
        return Err(ErrorNucleo::ConfiguracionInvalida(
            "no hay salas disponibles".to_string(),
        ));
    }
    if let Some(a) = actividades.iter().find(|a| a.duracion < 1) {
        return Err(ErrorNucleo::ConfiguracionInvalida(format!(
            "actividad {} con duración {} (< 1)",
            a.codigo, a.duracion
        )));
    }

    let mut g = grafo.clone();
    let mut periodos = Vec::new();
    let mut numero_periodo = 0;
    let mut bloque = 0;

    while !g.esta_vacio() && bloque < TOTAL_BLOQUES {
        // El bloque del miércoles 11:30-12:50 queda libre para la comunidad
        if es_bloque_protegido(bloque) {
            bloque += 1;
            continue;
        }

        let conjunto = conjunto_independiente(&g);
        if conjunto.is_empty() {
            break;
        }

        let (asignaciones, sin_sala) =
            empacar_periodo(actividades, &conjunto, salas, restricciones);

        // Comprometer bloque y sacar del grafo solo a las que consiguieron sala
        for asig in &asignaciones {
            actividades[asig.actividad].bloque = bloque;
            g.eliminar_vertice(asig.actividad);
        }

        periodos.push(Periodo {
            numero: numero_periodo,
            bloque,
            asignaciones,
            sin_sala,
        });

        numero_periodo += 1;
        bloque += 1;
    }

    // Lo que quedó en el grafo es el DUD final
    let mut dud_final = g.vertices();
    dud_final.sort_unstable();
    for &idx in &dud_final {
        actividades[idx].bloque = -1;
        actividades[idx].sala.clear();
    }

    println!(
        "[scheduler] {} periodos usados, {} actividades sin programar",
        periodos.len(),
        dud_final.len()
    );

    Ok(ResultadoConstructivo {
        total_periodos: periodos.len() as i32,
        periodos,
        dud_final,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grafo::construir_grafo;
    use crate::models::{TipoEvento, BLOQUE_PROTEGIDO};

    fn actividad(id: i32, curso: &str, secciones: Vec<i32>, profes: Vec<&str>) -> Actividad {
        Actividad::nueva(
            id,
            format!("{}-CAT-1-S{}", curso, id),
            curso.to_string(),
            curso.to_string(),
            TipoEvento::Catedra,
            1,
            secciones,
            30,
            profes.into_iter().map(String::from).collect(),
            String::new(),
            1,
        )
    }

    #[test]
    fn test_configuracion_invalida() {
        let rc = RestriccionesSalas::default();
        let g = GrafoConflictos::nuevo();

        let mut vacias: Vec<Actividad> = vec![];
        assert!(programar(&mut vacias, &g, &[Sala::nueva("101", 40)], &rc).is_err());

        let mut acts = vec![actividad(1, "CIT1000", vec![1], vec!["Ana"])];
        assert!(programar(&mut acts, &g, &[], &rc).is_err());
    }

    #[test]
    fn test_actividad_unica_va_al_bloque_cero() {
        let mut acts = vec![actividad(1, "CIT1000", vec![1], vec!["Ana"])];
        let (g, _) = construir_grafo(&acts, &[]);
        let salas = vec![Sala::nueva("101", 40)];
        let rc = RestriccionesSalas::default();

        let res = programar(&mut acts, &g, &salas, &rc).unwrap();
        assert!(res.dud_final.is_empty());
        assert_eq!(acts[0].bloque, 0);
        assert_eq!(acts[0].sala, "101");
    }

    #[test]
    fn test_conflicto_separa_bloques() {
        // Mismo profesor: nunca el mismo bloque
        let mut acts = vec![
            actividad(1, "CIT1000", vec![1], vec!["Ana"]),
            actividad(2, "CBM2000", vec![1], vec!["Ana"]),
        ];
        let (g, _) = construir_grafo(&acts, &[]);
        let salas = vec![Sala::nueva("101", 40), Sala::nueva("102", 40)];
        let rc = RestriccionesSalas::default();

        let res = programar(&mut acts, &g, &salas, &rc).unwrap();
        assert!(res.dud_final.is_empty());
        assert_ne!(acts[0].bloque, acts[1].bloque);
    }

    #[test]
    fn test_sin_conflicto_comparten_bloque() {
        let mut acts = vec![
            actividad(1, "CIT1000", vec![1], vec!["Ana"]),
            actividad(2, "CBM2000", vec![1], vec!["Beto"]),
        ];
        let (g, _) = construir_grafo(&acts, &[]);
        let salas = vec![Sala::nueva("101", 40), Sala::nueva("102", 40)];
        let rc = RestriccionesSalas::default();

        let res = programar(&mut acts, &g, &salas, &rc).unwrap();
        assert!(res.dud_final.is_empty());
        assert_eq!(acts[0].bloque, acts[1].bloque);
        assert_ne!(acts[0].sala, acts[1].sala);
    }

    #[test]
    fn test_bloque_protegido_se_salta() {
        // 17 actividades con el mismo profesor: una por bloque, en orden.
        // La número 17 (índice 16) debe caer en el bloque 17, no en el 16.
        let mut acts: Vec<Actividad> = (1..=17)
            .map(|i| actividad(i, &format!("C{:02}", i), vec![i], vec!["Ana"]))
            .collect();
        // cursos distintos y secciones distintas: solo conflicto de profesor
        let (g, _) = construir_grafo(&acts, &[]);
        let salas = vec![Sala::nueva("101", 40)];
        let rc = RestriccionesSalas::default();

        let res = programar(&mut acts, &g, &salas, &rc).unwrap();
        assert!(res.dud_final.is_empty());

        let bloques: Vec<i32> = acts.iter().map(|a| a.bloque).collect();
        assert!(!bloques.contains(&BLOQUE_PROTEGIDO));
        // se usaron 17 periodos en los bloques 0..=17 saltando el 16
        let max = *bloques.iter().max().unwrap();
        assert_eq!(max, 17);
    }

    #[test]
    fn test_capacidad_insuficiente_termina_en_dud() {
        let mut acts = vec![actividad(1, "CIT1000", vec![1], vec!["Ana"])];
        acts[0].estudiantes = 80;
        let (g, _) = construir_grafo(&acts, &[]);
        let salas = vec![Sala::nueva("101", 60)];
        let rc = RestriccionesSalas::default();

        let res = programar(&mut acts, &g, &salas, &rc).unwrap();
        assert_eq!(res.dud_final, vec![0]);
        assert_eq!(acts[0].bloque, -1);
        assert_eq!(acts[0].sala, "");
    }

    #[test]
    fn test_dud_local_reintenta_en_periodo_siguiente() {
        // Dos actividades sin conflicto pero una sola sala: la segunda
        // falla en el periodo 0 y entra en el periodo 1
        let mut acts = vec![
            actividad(1, "CIT1000", vec![1], vec!["Ana"]),
            actividad(2, "CBM2000", vec![1], vec!["Beto"]),
        ];
        let (g, _) = construir_grafo(&acts, &[]);
        let salas = vec![Sala::nueva("101", 40)];
        let rc = RestriccionesSalas::default();

        let res = programar(&mut acts, &g, &salas, &rc).unwrap();
        assert!(res.dud_final.is_empty());
        let mut bloques: Vec<i32> = acts.iter().map(|a| a.bloque).collect();
        bloques.sort_unstable();
        assert_eq!(bloques, vec![0, 1]);
    }
}
