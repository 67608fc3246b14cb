use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed set of categories items are grouped under.
///
/// The labels are the Portuguese texts shown to users; they are also what
/// gets stored in the `category` column and sent over the wire. The set is
/// closed on the client side only — the data layer accepts whatever text
/// the client offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Hortifruti")]
    Hortifruti,
    #[serde(rename = "Padaria")]
    Padaria,
    #[serde(rename = "Carnes")]
    Carnes,
    #[serde(rename = "Peixes")]
    Peixes,
    #[serde(rename = "Frios")]
    Frios,
    #[serde(rename = "Laticínios")]
    Laticinios,
    #[serde(rename = "Mercearia")]
    Mercearia,
    #[serde(rename = "Bebidas")]
    Bebidas,
    #[serde(rename = "Congelados")]
    Congelados,
    #[serde(rename = "Doces")]
    Doces,
    #[serde(rename = "Temperos")]
    Temperos,
    #[serde(rename = "Higiene")]
    Higiene,
    #[serde(rename = "Limpeza")]
    Limpeza,
    #[serde(rename = "Bebê")]
    Bebe,
    #[serde(rename = "Pet")]
    Pet,
    #[serde(rename = "Papelaria")]
    Papelaria,
    #[serde(rename = "Farmácia")]
    Farmacia,
    #[serde(rename = "Casa")]
    Casa,
    #[serde(rename = "Eletro")]
    Eletro,
    #[serde(rename = "Vestuário")]
    Vestuario,
    #[serde(rename = "Outros")]
    Outros,
}

impl Category {
    /// All categories in display order for selection controls.
    pub const ALL: [Category; 21] = [
        Category::Hortifruti,
        Category::Padaria,
        Category::Carnes,
        Category::Peixes,
        Category::Frios,
        Category::Laticinios,
        Category::Mercearia,
        Category::Bebidas,
        Category::Congelados,
        Category::Doces,
        Category::Temperos,
        Category::Higiene,
        Category::Limpeza,
        Category::Bebe,
        Category::Pet,
        Category::Papelaria,
        Category::Farmacia,
        Category::Casa,
        Category::Eletro,
        Category::Vestuario,
        Category::Outros,
    ];

    /// The label shown to users and stored in the database.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Hortifruti => "Hortifruti",
            Category::Padaria => "Padaria",
            Category::Carnes => "Carnes",
            Category::Peixes => "Peixes",
            Category::Frios => "Frios",
            Category::Laticinios => "Laticínios",
            Category::Mercearia => "Mercearia",
            Category::Bebidas => "Bebidas",
            Category::Congelados => "Congelados",
            Category::Doces => "Doces",
            Category::Temperos => "Temperos",
            Category::Higiene => "Higiene",
            Category::Limpeza => "Limpeza",
            Category::Bebe => "Bebê",
            Category::Pet => "Pet",
            Category::Papelaria => "Papelaria",
            Category::Farmacia => "Farmácia",
            Category::Casa => "Casa",
            Category::Eletro => "Eletro",
            Category::Vestuario => "Vestuário",
            Category::Outros => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parses a category label, case-insensitively, accepting both the
    /// accented label and its plain-ASCII spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        for category in Category::ALL {
            if category.label().to_lowercase() == wanted {
                return Ok(category);
            }
        }
        // Accent-free fallback so "laticinios" also resolves
        match wanted.as_str() {
            "laticinios" => Ok(Category::Laticinios),
            "bebe" => Ok(Category::Bebe),
            "farmacia" => Ok(Category::Farmacia),
            "vestuario" => Ok(Category::Vestuario),
            _ => Err(format!(
                "Categoria inválida '{}'. Opções: {}",
                s,
                Category::ALL
                    .iter()
                    .map(|c| c.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_21_categories() {
        assert_eq!(Category::ALL.len(), 21);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(format!("{}", Category::Laticinios), "Laticínios");
        assert_eq!(format!("{}", Category::Hortifruti), "Hortifruti");
        assert_eq!(format!("{}", Category::Outros), "Outros");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            Category::from_str("Laticínios").unwrap(),
            Category::Laticinios
        );
        assert_eq!(Category::from_str("hortifruti").unwrap(), Category::Hortifruti);
        assert_eq!(Category::from_str("LIMPEZA").unwrap(), Category::Limpeza);
    }

    #[test]
    fn test_category_from_str_without_accents() {
        assert_eq!(
            Category::from_str("laticinios").unwrap(),
            Category::Laticinios
        );
        assert_eq!(Category::from_str("farmacia").unwrap(), Category::Farmacia);
        assert_eq!(Category::from_str("bebe").unwrap(), Category::Bebe);
    }

    #[test]
    fn test_category_from_str_invalid() {
        assert!(Category::from_str("Brinquedos").is_err());
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn test_category_json_uses_label() {
        let json = serde_json::to_string(&Category::Laticinios).unwrap();
        assert_eq!(json, "\"Laticínios\"");

        let parsed: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Category::Laticinios);
    }

    #[test]
    fn test_labels_round_trip_from_str() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.label()).unwrap(), category);
        }
    }
}
