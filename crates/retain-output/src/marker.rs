use retain_model::MarkerPlan;

use crate::writer::KotlinWriter;

/// Marker file: one constant naming the marker, one per package.
pub fn render_marker(plan: &MarkerPlan) -> String {
    let mut w = KotlinWriter::new();
    w.line(format!("package {}", plan.package));
    w.blank();
    w.line(format!("const val {} = 0", plan.marker.file_property));
    for package in &plan.marker.packages {
        w.line(format!("const val {package} = 0"));
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use retain_model::DependencyMarker;

    #[test]
    fn lists_every_package() {
        let plan = MarkerPlan {
            package: "dev.retain.dependencies".to_string(),
            marker: DependencyMarker {
                file_property: "retain_abc1234".to_string(),
                packages: vec!["com_example_lib".to_string(), "com_example_ui".to_string()],
            },
        };
        assert_eq!(
            render_marker(&plan),
            "package dev.retain.dependencies\n\n\
             const val retain_abc1234 = 0\n\
             const val com_example_lib = 0\n\
             const val com_example_ui = 0\n"
        );
    }
}
