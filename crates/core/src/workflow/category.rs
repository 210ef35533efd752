use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcedureCategory {
    Construction,
    Commercial,
    Renewal,
    Generic,
}

const CONSTRUCTION_MARKERS: [&str; 2] = ["construccion", "construction"];
const COMMERCIAL_MARKERS: [&str; 4] = ["comercial", "giro", "negocio", "business_license"];
const RENEWAL_MARKERS: [&str; 2] = ["refrendo", "renewal"];

impl ProcedureCategory {
    pub const ALL: [Self; 4] = [Self::Construction, Self::Commercial, Self::Renewal, Self::Generic];

    /// Classifies the free-text procedure type. Unmatched types are generic.
    pub fn from_procedure_type(procedure_type: &str) -> Self {
        let key = fold_key(procedure_type);
        let contains_any = |markers: &[&str]| markers.iter().any(|marker| key.contains(marker));

        if contains_any(&CONSTRUCTION_MARKERS) {
            Self::Construction
        } else if contains_any(&COMMERCIAL_MARKERS) {
            Self::Commercial
        } else if contains_any(&RENEWAL_MARKERS) {
            Self::Renewal
        } else {
            Self::Generic
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::Commercial => "commercial",
            Self::Renewal => "renewal",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ProcedureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Procedure types are typed by staff, so "Construcción" must match "construccion".
fn fold_key(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .map(|ch| match ch {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::ProcedureCategory;

    #[test]
    fn construction_matches_in_either_language_and_case() {
        for procedure_type in
            ["Licencia de CONSTRUCCION", "construction_permit", "Licencia de Construcción"]
        {
            assert_eq!(
                ProcedureCategory::from_procedure_type(procedure_type),
                ProcedureCategory::Construction,
                "{procedure_type}"
            );
        }
    }

    #[test]
    fn commercial_markers_are_recognized() {
        for procedure_type in
            ["Licencia de giro", "Alta de negocio", "local comercial", "BUSINESS_LICENSE"]
        {
            assert_eq!(
                ProcedureCategory::from_procedure_type(procedure_type),
                ProcedureCategory::Commercial,
                "{procedure_type}"
            );
        }
    }

    #[test]
    fn renewal_and_fallback() {
        assert_eq!(
            ProcedureCategory::from_procedure_type("Refrendo anual"),
            ProcedureCategory::Renewal
        );
        assert_eq!(
            ProcedureCategory::from_procedure_type("license_renewal"),
            ProcedureCategory::Renewal
        );
        assert_eq!(ProcedureCategory::from_procedure_type(""), ProcedureCategory::Generic);
        assert_eq!(
            ProcedureCategory::from_procedure_type("Anuncio espectacular"),
            ProcedureCategory::Generic
        );
    }

    #[test]
    fn construction_takes_precedence_over_later_markers() {
        assert_eq!(
            ProcedureCategory::from_procedure_type("refrendo de construccion"),
            ProcedureCategory::Construction
        );
        assert_eq!(
            ProcedureCategory::from_procedure_type("refrendo de giro"),
            ProcedureCategory::Commercial
        );
    }
}
