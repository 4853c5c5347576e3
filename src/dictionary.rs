//! The keyword dictionary used by the keyword scorer.
//!
//! The dictionary maps generic category names to the keywords that suggest a
//! transaction belongs to that category. It is loaded once when the server
//! starts and never changes afterwards.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;

use crate::Error;

/// An immutable mapping from category name to keyword list.
///
/// Categories are kept sorted by name so that scoring ties always resolve the
/// same way.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct CategoryDictionary {
    categories: BTreeMap<String, Vec<String>>,
}

impl CategoryDictionary {
    /// Create a dictionary from `(category, keywords)` pairs.
    ///
    /// # Errors
    /// Returns [Error::InvalidDictionary] if there are no categories or a
    /// category name is blank.
    pub fn new<I, C, K>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (C, Vec<K>)>,
        C: Into<String>,
        K: Into<String>,
    {
        let categories = entries
            .into_iter()
            .map(|(category, keywords)| {
                (
                    category.into(),
                    keywords.into_iter().map(Into::into).collect(),
                )
            })
            .collect();

        Self { categories }.validated()
    }

    /// Parse a dictionary from a JSON object of the form
    /// `{"Comida": ["jumbo", "restaurant"], ...}`.
    ///
    /// # Errors
    /// Returns [Error::InvalidDictionary] if the JSON is malformed or the
    /// dictionary fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str::<Self>(json)
            .map_err(|error| Error::InvalidDictionary(error.to_string()))?
            .validated()
    }

    /// Load a dictionary from a JSON file, see [CategoryDictionary::from_json_str].
    ///
    /// # Errors
    /// Returns [Error::InvalidDictionary] if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path).map_err(|error| {
            Error::InvalidDictionary(format!("could not read {}: {error}", path.display()))
        })?;

        Self::from_json_str(&json)
    }

    /// Iterate over the categories and their keywords in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(category, keywords)| (category.as_str(), keywords.as_slice()))
    }

    fn validated(self) -> Result<Self, Error> {
        if self.categories.is_empty() {
            return Err(Error::InvalidDictionary(
                "the dictionary must contain at least one category".to_owned(),
            ));
        }

        if self.categories.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::InvalidDictionary(
                "category names cannot be empty".to_owned(),
            ));
        }

        Ok(self)
    }
}

impl Default for CategoryDictionary {
    /// The built-in dictionary of common Spanish personal finance categories.
    fn default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(category, keywords)| {
                (
                    (*category).to_owned(),
                    keywords.iter().map(|keyword| (*keyword).to_owned()).collect(),
                )
            })
            .collect();

        Self { categories }
    }
}

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Comida",
        &[
            "jumbo",
            "lider",
            "unimarc",
            "tottus",
            "santa isabel",
            "supermercado",
            "restaurant",
            "restaurante",
            "almuerzo",
            "cena",
            "desayuno",
            "cafe",
            "cafeteria",
            "panaderia",
            "empanada",
            "pizza",
            "sushi",
            "hamburguesa",
            "rappi",
            "pedidos ya",
            "uber eats",
            "mcdonalds",
            "burger king",
            "starbucks",
            "verduleria",
            "carniceria",
            "comida",
        ],
    ),
    (
        "Transporte",
        &[
            "uber",
            "cabify",
            "didi",
            "taxi",
            "metro",
            "bip",
            "micro",
            "colectivo",
            "bencina",
            "combustible",
            "copec",
            "shell",
            "petrobras",
            "estacionamiento",
            "peaje",
            "autopista",
            "bus",
            "transporte",
        ],
    ),
    (
        "Servicios",
        &[
            "luz",
            "enel",
            "agua",
            "aguas andinas",
            "gas",
            "metrogas",
            "abastible",
            "lipigas",
            "internet",
            "telefono",
            "celular",
            "movistar",
            "entel",
            "claro",
            "vtr",
            "servicio",
        ],
    ),
    (
        "Vivienda",
        &[
            "arriendo",
            "alquiler",
            "dividendo",
            "hipoteca",
            "gastos comunes",
            "condominio",
            "ferreteria",
            "sodimac",
            "easy",
            "muebles",
            "reparacion",
        ],
    ),
    (
        "Salud",
        &[
            "farmacia",
            "cruz verde",
            "salcobrand",
            "ahumada",
            "clinica",
            "hospital",
            "medico",
            "doctor",
            "dentista",
            "isapre",
            "fonasa",
            "examen",
            "consulta medica",
            "remedios",
        ],
    ),
    (
        "Entretenimiento",
        &[
            "cine",
            "cinemark",
            "cineplanet",
            "teatro",
            "concierto",
            "entradas",
            "ticketmaster",
            "puntoticket",
            "bar",
            "pub",
            "discoteca",
            "juegos",
            "steam",
            "playstation",
        ],
    ),
    (
        "Suscripciones",
        &[
            "netflix",
            "spotify",
            "disney",
            "hbo",
            "amazon prime",
            "youtube premium",
            "apple",
            "icloud",
            "google one",
            "suscripcion",
            "membresia",
        ],
    ),
    (
        "Educación",
        &[
            "colegio",
            "universidad",
            "matricula",
            "arancel",
            "curso",
            "libreria",
            "libros",
            "udemy",
            "coursera",
            "educacion",
        ],
    ),
    (
        "Ropa",
        &[
            "ropa",
            "zapatos",
            "zapatillas",
            "falabella",
            "paris",
            "ripley",
            "zara",
            "vestuario",
        ],
    ),
    (
        "Mascotas",
        &[
            "veterinaria",
            "veterinario",
            "mascota",
            "alimento perro",
            "alimento gato",
            "petshop",
        ],
    ),
    (
        "Viajes",
        &[
            "hotel",
            "hostal",
            "airbnb",
            "booking",
            "latam",
            "sky airline",
            "jetsmart",
            "vuelo",
            "pasaje",
            "aeropuerto",
            "viaje",
        ],
    ),
    (
        "Sueldo",
        &[
            "sueldo",
            "salario",
            "remuneracion",
            "liquidacion",
            "honorarios",
            "bono",
        ],
    ),
    (
        "Inversiones",
        &[
            "fintual",
            "fondo mutuo",
            "acciones",
            "deposito a plazo",
            "inversion",
            "dividendos",
            "cripto",
            "bitcoin",
        ],
    ),
    (
        "Transferencias",
        &["transferencia", "traspaso", "giro", "deposito"],
    ),
];
