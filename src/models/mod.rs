// Estructuras de datos principales del generador de horarios

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// --------------------------------------------------------------------------
// Grilla horaria
// --------------------------------------------------------------------------

pub const BLOQUES_POR_DIA: i32 = 7;
pub const DIAS_POR_SEMANA: i32 = 5;
pub const TOTAL_BLOQUES: i32 = BLOQUES_POR_DIA * DIAS_POR_SEMANA; // 35 bloques

/// Bloque reservado institucionalmente: Miércoles 11:30-12:50.
/// Ninguna actividad puede ocuparlo.
pub const BLOQUE_PROTEGIDO: i32 = 2 * BLOQUES_POR_DIA + 2; // 16

pub const NOMBRES_DIAS: [&str; 5] = ["Lunes", "Martes", "Miércoles", "Jueves", "Viernes"];

/// Rango horario de cada slot del día (fijo, calendario UDP).
pub const RANGOS_HORARIOS: [&str; 7] = [
    "08:30-09:50",
    "10:00-11:20",
    "11:30-12:50",
    "13:00-14:20",
    "14:30-15:50",
    "16:00-17:20",
    "17:25-18:45",
];

/// Día (0-4) de un bloque 0-34.
pub fn dia_de(bloque: i32) -> i32 {
    bloque / BLOQUES_POR_DIA
}

/// Slot del día (0-6) de un bloque 0-34.
pub fn slot_de(bloque: i32) -> i32 {
    bloque % BLOQUES_POR_DIA
}

pub fn es_bloque_protegido(bloque: i32) -> bool {
    bloque == BLOQUE_PROTEGIDO
}

// --------------------------------------------------------------------------
// Tipos de evento y de sala
// --------------------------------------------------------------------------

/// Tipo de actividad académica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TipoEvento {
    #[serde(rename = "CATEDRA")]
    Catedra,
    #[serde(rename = "AYUDANTIA")]
    Ayudantia,
    #[serde(rename = "LABORATORIO")]
    Laboratorio,
}

impl TipoEvento {
    /// Nombre del tipo tal como aparece en la oferta académica y en las
    /// restricciones de salas.
    pub fn como_str(&self) -> &'static str {
        match self {
            TipoEvento::Catedra => "CATEDRA",
            TipoEvento::Ayudantia => "AYUDANTIA",
            TipoEvento::Laboratorio => "LABORATORIO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoSala {
    #[serde(rename = "SALA")]
    Sala,
    #[serde(rename = "LABORATORIO")]
    Laboratorio,
}

impl TipoSala {
    /// El tipo se infiere del código: los laboratorios parten con "LAB".
    pub fn desde_codigo(codigo: &str) -> TipoSala {
        if codigo.starts_with("LAB") {
            TipoSala::Laboratorio
        } else {
            TipoSala::Sala
        }
    }
}

// --------------------------------------------------------------------------
// Entidades de entrada (inmutables durante la resolución)
// --------------------------------------------------------------------------

/// Carga semanal de un curso: cuántas sesiones de cada tipo y de qué duración.
/// Un conteo 0 equivale a 1 sesión; una duración 0 equivale a 1 bloque.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Distribucion {
    #[serde(default)]
    pub num_cat: i32,
    #[serde(default)]
    pub num_ay: i32,
    #[serde(default)]
    pub num_lab: i32,
    #[serde(default)]
    pub duracion_cat: i32,
    #[serde(default)]
    pub duracion_ay: i32,
    #[serde(default)]
    pub duracion_lab: i32,
}

impl Distribucion {
    /// Sesiones semanales para un tipo de evento (mínimo 1).
    pub fn sesiones(&self, tipo: TipoEvento) -> i32 {
        let n = match tipo {
            TipoEvento::Catedra => self.num_cat,
            TipoEvento::Ayudantia => self.num_ay,
            TipoEvento::Laboratorio => self.num_lab,
        };
        if n < 1 {
            1
        } else {
            n
        }
    }

    /// Duración en bloques de cada sesión de un tipo (mínimo 1).
    pub fn duracion(&self, tipo: TipoEvento) -> i32 {
        let d = match tipo {
            TipoEvento::Catedra => self.duracion_cat,
            TipoEvento::Ayudantia => self.duracion_ay,
            TipoEvento::Laboratorio => self.duracion_lab,
        };
        if d < 1 {
            1
        } else {
            d
        }
    }
}

/// Curso del plan de estudios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curso {
    pub codigo: String,
    pub nombre: String,
    /// Carrera -> semestre en que el plan ubica el curso.
    #[serde(default)]
    pub plan: HashMap<String, i32>,
    #[serde(default)]
    pub electivo: bool,
    /// Códigos de los cursos prerequisito.
    #[serde(default)]
    pub prerequisitos: Vec<String>,
    #[serde(default)]
    pub distribucion: Distribucion,
}

/// Sección concreta de un curso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seccion {
    pub id: i32,
    pub codigo_curso: String,
    pub numero: i32,
    pub estudiantes: i32,
}

/// Sala física. La entrada solo trae código y capacidad: el tipo se deriva
/// siempre del código (prefijo "LAB"), incluso si el JSON trae un campo
/// `tipo` extra.
#[derive(Debug, Clone, Serialize)]
pub struct Sala {
    pub codigo: String,
    pub capacidad: i32,
    pub tipo: TipoSala,
}

impl<'de> Deserialize<'de> for Sala {
    fn deserialize<D>(deserializer: D) -> Result<Sala, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct SalaCruda {
            codigo: String,
            capacidad: i32,
        }

        let cruda = SalaCruda::deserialize(deserializer)?;
        Ok(Sala {
            tipo: TipoSala::desde_codigo(&cruda.codigo),
            codigo: cruda.codigo,
            capacidad: cruda.capacidad,
        })
    }
}

impl Sala {
    pub fn nueva(codigo: &str, capacidad: i32) -> Sala {
        Sala {
            codigo: codigo.to_string(),
            capacidad,
            tipo: TipoSala::desde_codigo(codigo),
        }
    }
}

/// Profesor. Los bloques ocupados vienen de la carga de datos; el núcleo
/// del solver no los consulta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profesor {
    pub id: i32,
    pub nombre: String,
    #[serde(default)]
    pub bloques_ocupados: Vec<i32>,
}

// --------------------------------------------------------------------------
// Oferta académica (eventos lógicos antes de expandir)
// --------------------------------------------------------------------------

/// Evento lógico de la oferta: una cátedra/ayudantía/lab que se expande en
/// una o más sesiones semanales según la distribución del curso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventoOferta {
    pub codigo_actividad: String,
    pub tipo: TipoEvento,
    pub numero_evento: i32,
    pub secciones_vinculadas: Vec<i32>,
    pub total_estudiantes: i32,
    #[serde(default)]
    pub profesores: Vec<String>,
}

/// Un curso de la oferta con sus eventos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursoOferta {
    pub codigo_curso: String,
    pub nombre_curso: String,
    pub actividades: Vec<EventoOferta>,
}

/// Datos planos de entrada del núcleo (ya parseados por los loaders externos).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatosUniversidad {
    pub cursos: Vec<Curso>,
    pub oferta: Vec<CursoOferta>,
    #[serde(default)]
    pub secciones: Vec<Seccion>,
    pub salas: Vec<Sala>,
    #[serde(default)]
    pub profesores: Vec<Profesor>,
    #[serde(default)]
    pub restricciones_salas: RestriccionesSalas,
}

// --------------------------------------------------------------------------
// Restricciones de salas
// --------------------------------------------------------------------------

/// Token de whitelist: cualquier sala que no sea laboratorio.
pub const ANY_CLASSROOM: &str = "ANY_CLASSROOM";
/// Token de whitelist: cualquier laboratorio.
pub const ANY_LAB: &str = "ANY_LAB";

/// Clave de la entrada de defaults dentro del mapa de restricciones.
pub const CLAVE_DEFAULTS: &str = "DEFAULTS";

/// Restricciones de salas por curso: curso -> tipo de evento -> whitelist.
/// La entrada `DEFAULTS` define las listas de respaldo por tipo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestriccionesSalas(pub HashMap<String, HashMap<String, Vec<String>>>);

impl RestriccionesSalas {
    /// Whitelist explícita para (curso, tipo). `None` significa sin
    /// restricción específica (se cae a DEFAULTS o al tipo de sala).
    pub fn salas_permitidas(&self, codigo_curso: &str, tipo: TipoEvento) -> Option<&Vec<String>> {
        self.0
            .get(codigo_curso)
            .and_then(|m| m.get(tipo.como_str()))
    }

    /// Lista de respaldo por tipo, si fue definida.
    pub fn defaults(&self, tipo: TipoEvento) -> Option<&Vec<String>> {
        self.0.get(CLAVE_DEFAULTS).and_then(|m| m.get(tipo.como_str()))
    }

    /// Verifica si una whitelist admite la sala, expandiendo los tokens
    /// ANY_CLASSROOM / ANY_LAB.
    pub fn whitelist_admite(whitelist: &[String], sala: &Sala) -> bool {
        for permitida in whitelist {
            match permitida.as_str() {
                ANY_CLASSROOM => {
                    if sala.tipo == TipoSala::Sala {
                        return true;
                    }
                }
                ANY_LAB => {
                    if sala.tipo == TipoSala::Laboratorio {
                        return true;
                    }
                }
                codigo => {
                    if codigo == sala.codigo {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Decide si la sala es válida para (curso, tipo): whitelist explícita,
    /// luego DEFAULTS, luego el tipo de sala según el tipo de evento.
    pub fn sala_valida(&self, codigo_curso: &str, tipo: TipoEvento, sala: &Sala) -> bool {
        if let Some(wl) = self.salas_permitidas(codigo_curso, tipo) {
            return Self::whitelist_admite(wl, sala);
        }
        if let Some(def) = self.defaults(tipo) {
            return Self::whitelist_admite(def, sala);
        }
        match tipo {
            TipoEvento::Laboratorio => sala.tipo == TipoSala::Laboratorio,
            _ => sala.tipo == TipoSala::Sala,
        }
    }
}

// --------------------------------------------------------------------------
// Actividad: la unidad que se agenda
// --------------------------------------------------------------------------

/// Una sesión semanal concreta de un evento académico. Es el vértice del
/// grafo de conflictos y la unidad a la que se asigna bloque y sala.
/// Múltiples secciones pueden asistir a la misma actividad (cátedras y
/// ayudantías compartidas).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actividad {
    pub id: i32,
    /// Código de sesión, p. ej. "CBF1000-CAT-1-S2".
    pub codigo: String,
    pub codigo_curso: String,
    pub nombre_curso: String,
    pub tipo: TipoEvento,
    pub numero_evento: i32,
    pub secciones: Vec<i32>,
    pub estudiantes: i32,
    pub profesores: Vec<String>,
    /// Duración en bloques consecutivos (>= 1, dentro de un mismo día).
    pub duracion: i32,
    /// Agrupa las sesiones espejo de una cátedra. Vacío para AY y LAB.
    pub grupo_espejo: String,
    /// Bloque de inicio asignado; -1 si no asignada.
    pub bloque: i32,
    /// Sala asignada; "" si no asignada.
    pub sala: String,
}

impl Actividad {
    #[allow(clippy::too_many_arguments)]
    pub fn nueva(
        id: i32,
        codigo: String,
        codigo_curso: String,
        nombre_curso: String,
        tipo: TipoEvento,
        numero_evento: i32,
        secciones: Vec<i32>,
        estudiantes: i32,
        profesores: Vec<String>,
        grupo_espejo: String,
        duracion: i32,
    ) -> Actividad {
        Actividad {
            id,
            codigo,
            codigo_curso,
            nombre_curso,
            tipo,
            numero_evento,
            secciones,
            estudiantes,
            profesores,
            duracion: if duracion < 1 { 1 } else { duracion },
            grupo_espejo,
            bloque: -1,
            sala: String::new(),
        }
    }

    /// Una actividad cuenta como asignada cuando tiene bloque y sala.
    pub fn asignada(&self) -> bool {
        self.bloque >= 0 && !self.sala.is_empty()
    }

    pub fn tiene_profesor(&self, nombre: &str) -> bool {
        self.profesores.iter().any(|p| p == nombre)
    }

    /// Verifica si dos actividades comparten al menos un profesor.
    pub fn comparte_profesor(&self, otra: &Actividad) -> bool {
        self.profesores.iter().any(|p| otra.tiene_profesor(p))
    }

    /// Verifica si dos actividades comparten sección. Secciones de cursos
    /// distintos nunca se consideran compartidas aunque coincida el id.
    pub fn comparte_seccion(&self, otra: &Actividad) -> bool {
        if self.codigo_curso != otra.codigo_curso {
            return false;
        }
        self.secciones
            .iter()
            .any(|s| otra.secciones.contains(s))
    }

    pub fn es_hermana_de(&self, otra: &Actividad) -> bool {
        !self.grupo_espejo.is_empty()
            && self.grupo_espejo == otra.grupo_espejo
            && self.id != otra.id
    }

    /// Bloques que ocupa la actividad (duración > 1 ocupa consecutivos).
    pub fn bloques_ocupados(&self) -> Vec<i32> {
        if self.bloque < 0 {
            return Vec::new();
        }
        (self.bloque..self.bloque + self.duracion).collect()
    }

    pub fn ocupa_bloque(&self, bloque: i32) -> bool {
        self.bloque >= 0 && bloque >= self.bloque && bloque < self.bloque + self.duracion
    }

    /// Verifica solapamiento temporal entre dos actividades asignadas.
    pub fn se_solapa_con(&self, otra: &Actividad) -> bool {
        if self.bloque < 0 || otra.bloque < 0 {
            return false;
        }
        self.bloque < otra.bloque + otra.duracion && otra.bloque < self.bloque + self.duracion
    }
}
