use visor_core::labels::LabelCatalog;
use visor_core::workflow::{ProcedureCategory, TemplateRegistry};

pub fn run(catalog: LabelCatalog) -> String {
    let registry = TemplateRegistry::standard();
    let mut lines = Vec::new();

    for category in ProcedureCategory::ALL {
        lines.push(format!("{category}:"));
        for (index, id) in registry.step_ids(category).into_iter().enumerate() {
            let text = catalog.step(category, id);
            lines.push(format!("  {}. {id} - {}", index + 1, text.label));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use visor_core::labels::{LabelCatalog, Locale};

    #[test]
    fn lists_every_category_in_order() {
        let output = super::run(LabelCatalog::for_locale(Locale::Es));

        let headers: Vec<&str> = output.lines().filter(|line| !line.starts_with(' ')).collect();
        assert_eq!(headers, vec!["construction:", "commercial:", "renewal:", "generic:"]);
        assert!(output.contains("  1. inicio - Inicio"));
    }
}
