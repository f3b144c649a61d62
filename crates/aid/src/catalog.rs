//! Technical-aid catalog: the named categories a line item may refer to.

use serde::{Deserialize, Serialize};

use casework_core::{AidTypeId, Entity};

/// A named technical-aid category ("SILLA DE RUEDAS EST.", "GLUCÓMETRO", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidType {
    pub id: AidTypeId,
    pub name: String,
}

impl Entity for AidType {
    type Id = AidTypeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Names the intake form offers.
pub const DEFAULT_AID_TYPES: [&str; 18] = [
    "PAÑALES DE ADULTO",
    "PAÑALES DE NIÑO",
    "CENTRÓ DE CAMAS",
    "COLCHÓN ANTI-ESCARAS",
    "TENSIÓMETRO",
    "NEBULIZADOR",
    "MULETAS AXIL",
    "MULETAS CANA",
    "BASTÓN DE 1 PUNTO",
    "BASTÓN DE 4 PUNTOS",
    "GLUCÓMETRO",
    "ANDADERA",
    "SILLA DE RUEDAS EST.",
    "SILLA DE RUEDAS CUA.",
    "SILLA DE RUEDAS PED.",
    "CANASTILLA DE NIÑO",
    "CANASTILLA DE NIÑA",
    "PAÑALES",
];

/// Replace the accented capitals used by the catalog with their plain forms.
pub fn strip_accents(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'Á' => 'A',
            'É' => 'E',
            'Í' => 'I',
            'Ó' => 'O',
            'Ú' | 'Ü' => 'U',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

/// Default catalog to seed: every name plus its unaccented spelling, deduplicated
/// and sorted.
pub fn default_catalog() -> Vec<String> {
    let mut names: Vec<String> = DEFAULT_AID_TYPES
        .iter()
        .flat_map(|name| [name.to_string(), strip_accents(name)])
        .collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unaccented_spellings_are_included_once() {
        let catalog = default_catalog();

        assert!(catalog.contains(&"BASTÓN DE 1 PUNTO".to_string()));
        assert!(catalog.contains(&"BASTON DE 1 PUNTO".to_string()));
        assert!(catalog.contains(&"PANALES DE NINO".to_string()));
        assert_eq!(catalog.iter().filter(|n| n.as_str() == "NEBULIZADOR").count(), 1);

        // 18 names, 7 of which have no accent.
        assert_eq!(catalog.len(), 29);
    }

    #[test]
    fn catalog_is_sorted() {
        let catalog = default_catalog();
        let mut sorted = catalog.clone();
        sorted.sort();
        assert_eq!(catalog, sorted);
    }
}
