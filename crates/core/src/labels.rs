//! Localized step texts and overall-status messages.

use serde::{Deserialize, Serialize};

use crate::workflow::category::ProcedureCategory;
use crate::workflow::states::OverallStatus;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepText<'a> {
    pub label: &'a str,
    pub description: &'a str,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelCatalog {
    locale: Locale,
}

impl LabelCatalog {
    pub fn for_locale(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Label and description for a step; unknown ids render as the id itself.
    pub fn step<'a>(&self, category: ProcedureCategory, id: &'a str) -> StepText<'a> {
        let known = match self.locale {
            Locale::Es => spanish_step(category, id),
            Locale::En => english_step(category, id),
        };
        match known {
            Some((label, description)) => StepText { label, description },
            None => StepText { label: id, description: "" },
        }
    }

    pub fn overall_message(&self, overall: OverallStatus) -> &'static str {
        match (self.locale, overall) {
            (Locale::Es, OverallStatus::Rejected) => "Tu trámite ha sido rechazado.",
            (Locale::Es, OverallStatus::Prevention) => {
                "Tu trámite tiene una prevención: corrige la información solicitada."
            }
            (Locale::Es, OverallStatus::ApprovedPendingIssuance) => {
                "Tu trámite fue aprobado y está pendiente de emisión de licencia."
            }
            (Locale::Es, OverallStatus::Completed) => "Tu trámite ha sido completado.",
            (Locale::En, OverallStatus::Rejected) => "Your procedure has been rejected.",
            (Locale::En, OverallStatus::Prevention) => {
                "Corrections were requested on your procedure."
            }
            (Locale::En, OverallStatus::ApprovedPendingIssuance) => {
                "Your procedure was approved and the license is pending issuance."
            }
            (Locale::En, OverallStatus::Completed) => "Your procedure has been completed.",
        }
    }
}

type Text = (&'static str, &'static str);

fn spanish_step(category: ProcedureCategory, id: &str) -> Option<Text> {
    use ProcedureCategory::*;

    let text = match (category, id) {
        (Construction, "submission") => {
            ("Solicitud enviada", "Recibimos tu solicitud y la documentación del proyecto.")
        }
        (Construction, "technical_review") => {
            ("Revisión técnica", "Los revisores técnicos evalúan el proyecto.")
        }
        (Construction, "department_approval") => {
            ("Visto bueno de dependencias", "Las dependencias municipales validan el proyecto.")
        }
        (Construction, "director_approval") => {
            ("Aprobación del director", "La dirección firma la resolución del trámite.")
        }
        (Construction, "license_generation") => {
            ("Emisión de licencia", "Se genera la licencia de construcción.")
        }
        (Commercial, "inicio") => ("Inicio", "Registramos tu solicitud de licencia de giro."),
        (Commercial, "revision") => {
            ("Revisión", "El personal municipal revisa los requisitos del giro.")
        }
        (Commercial, "aprobacion") => {
            ("Aprobación", "La autoridad resuelve y autoriza la licencia de funcionamiento.")
        }
        (Commercial, "finalizacion") => {
            ("Finalización", "Se emite tu licencia de funcionamiento.")
        }
        (Renewal, "submission") => ("Solicitud de refrendo", "Recibimos tu solicitud de refrendo."),
        (Renewal, "verification") => {
            ("Verificación", "Verificamos que la licencia vigente siga en regla.")
        }
        (Renewal, "approval") => ("Aprobación", "La autoridad autoriza el refrendo."),
        (Renewal, "issuance") => ("Emisión", "Se emite la licencia refrendada."),
        (_, "inicio") => ("Inicio", "Registramos tu solicitud."),
        (_, "revision") => ("Revisión", "El personal municipal revisa tu trámite."),
        (_, "aprobacion") => ("Aprobación", "La autoridad resuelve tu trámite."),
        (_, "finalizacion") => ("Finalización", "Tu trámite concluye y se entrega el resultado."),
        _ => return None,
    };
    Some(text)
}

fn english_step(category: ProcedureCategory, id: &str) -> Option<Text> {
    use ProcedureCategory::*;

    let text = match (category, id) {
        (Construction, "submission") => {
            ("Submitted", "Your application and project documents were received.")
        }
        (Construction, "technical_review") => {
            ("Technical review", "Technical reviewers evaluate the project.")
        }
        (Construction, "department_approval") => {
            ("Department approval", "Municipal departments validate the project.")
        }
        (Construction, "director_approval") => {
            ("Director approval", "The director signs off on the resolution.")
        }
        (Construction, "license_generation") => {
            ("License issuance", "The construction license is generated.")
        }
        (Commercial, "inicio") => ("Start", "Your business license application was registered."),
        (Commercial, "revision") => ("Review", "Municipal staff review the business requirements."),
        (Commercial, "aprobacion") => {
            ("Approval", "The authority resolves and authorizes the operating license.")
        }
        (Commercial, "finalizacion") => ("Completion", "Your operating license is issued."),
        (Renewal, "submission") => ("Renewal request", "Your renewal request was received."),
        (Renewal, "verification") => {
            ("Verification", "We verify the current license is in good standing.")
        }
        (Renewal, "approval") => ("Approval", "The authority approves the renewal."),
        (Renewal, "issuance") => ("Issuance", "The renewed license is issued."),
        (_, "inicio") => ("Start", "Your application was registered."),
        (_, "revision") => ("Review", "Municipal staff review your procedure."),
        (_, "aprobacion") => ("Approval", "The authority resolves your procedure."),
        (_, "finalizacion") => ("Completion", "Your procedure is closed and delivered."),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::{LabelCatalog, Locale};
    use crate::workflow::category::ProcedureCategory;
    use crate::workflow::states::OverallStatus;
    use crate::workflow::templates::TemplateRegistry;

    #[test]
    fn every_standard_step_has_a_label_in_every_locale() {
        let registry = TemplateRegistry::standard();
        for locale in [Locale::Es, Locale::En] {
            let catalog = LabelCatalog::for_locale(locale);
            for category in ProcedureCategory::ALL {
                for id in registry.step_ids(category) {
                    let text = catalog.step(category, id);
                    assert_ne!(text.label, id, "{locale:?} {category} {id}");
                    assert!(!text.description.is_empty(), "{locale:?} {category} {id}");
                }
            }
        }
    }

    #[test]
    fn unknown_steps_fall_back_to_their_id() {
        let text = LabelCatalog::default().step(ProcedureCategory::Generic, "inspeccion");
        assert_eq!(text.label, "inspeccion");
        assert_eq!(text.description, "");
    }

    #[test]
    fn spanish_is_the_default_locale() {
        let catalog = LabelCatalog::default();
        assert_eq!(catalog.locale(), Locale::Es);
        assert_eq!(
            catalog.overall_message(OverallStatus::Completed),
            "Tu trámite ha sido completado."
        );
    }
}
