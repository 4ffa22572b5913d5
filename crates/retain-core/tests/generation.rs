//! End-to-end planning scenarios over a host-like pass loop.

use proptest::prelude::*;

use retain_core::{Classifier, PassController, PassInput, TypeHierarchy, classify};
use retain_model::diagnostics::codes;
use retain_model::{
    Artifact, ClassDecl, Diagnostic, ProcessorOptions, PropertyDecl, RestoreMode, RetentionPolicy, SaverPlan,
    TypeCategory, TypeRef,
};

const BOTH: [RetentionPolicy; 2] = [
    RetentionPolicy::ConfigurationChange,
    RetentionPolicy::ProcessDeath,
];

fn activity(name: &str, properties: Vec<PropertyDecl>) -> ClassDecl {
    properties.into_iter().fold(
        ClassDecl::new(name).with_supertype("dev.retain.StateSavingActivity"),
        ClassDecl::with_property,
    )
}

/// Drives passes the way a host does until a saver appears.
fn generate(classes: Vec<ClassDecl>) -> (SaverPlan, Vec<Diagnostic>) {
    let mut controller = PassController::new(ProcessorOptions::default());
    let mut hierarchy = TypeHierarchy::with_platform();
    hierarchy.extend(classes.iter().cloned());
    let mut symbols: Vec<_> = classes.iter().flat_map(ClassDecl::retained_symbols).collect();
    let mut diagnostics = Vec::new();

    for _ in 0..4 {
        let outcome = controller.process(PassInput::new(&hierarchy, &symbols));
        diagnostics.extend(outcome.diagnostics);
        if let Some(plan) = outcome.artifacts.into_iter().find_map(|artifact| match artifact {
            Artifact::Saver(plan) => Some(plan),
            _ => None,
        }) {
            return (plan, diagnostics);
        }
        hierarchy.extend(outcome.generated_classes);
        symbols = outcome.deferred;
    }
    panic!("no saver after four passes");
}

#[test]
fn primitive_round_trip_scenario() {
    let (plan, diagnostics) = generate(vec![activity(
        "com.example.MainActivity",
        vec![PropertyDecl::new("count", TypeRef::new("kotlin.Int")).retained(BOTH)],
    )]);
    assert!(diagnostics.is_empty());

    let main = plan.component("com.example.MainActivity").unwrap();
    assert_eq!(main.memory[0].restore, RestoreMode::Assign);
    let field = &main.bundle[0];
    assert_eq!(field.suffix(), "Int");
    assert_eq!(field.accessor.category, TypeCategory::NonNullPrimitive);
    assert_eq!(field.key.value, "com.example.MainActivity#count");
    assert_eq!(field.restore, RestoreMode::Assign);
}

#[test]
fn nullable_known_type_scenario() {
    let (plan, _) = generate(vec![activity(
        "com.example.MainActivity",
        vec![
            PropertyDecl::new("label", TypeRef::parse("kotlin.String?").unwrap())
                .retained([RetentionPolicy::ProcessDeath]),
        ],
    )]);
    let field = &plan.components[0].bundle[0];
    assert_eq!(field.suffix(), "String");
    assert_eq!(field.restore, RestoreMode::Assign);
    assert!(plan.components[0].memory.is_empty());
}

#[test]
fn unsupported_type_scenario() {
    let (plan, diagnostics) = generate(vec![activity(
        "com.example.MainActivity",
        vec![
            PropertyDecl::new("count", TypeRef::new("kotlin.Int")).retained(BOTH),
            PropertyDecl::new(
                "cache",
                TypeRef::parse("kotlin.collections.HashMap<kotlin.String, kotlin.Int>").unwrap(),
            )
            .retained([RetentionPolicy::ProcessDeath]),
        ],
    )]);
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::UNSUPPORTED_BUNDLE_TYPE);
    assert_eq!(errors[0].symbol.as_deref(), Some("com.example.MainActivity#cache"));

    let main = &plan.components[0];
    assert!(main.bundle.iter().all(|field| field.property != "cache"));
    assert!(plan.keys.iter().all(|key| !key.value.ends_with("#cache")));
}

#[test]
fn keys_are_unique_across_packages() {
    let property = || PropertyDecl::new("count", TypeRef::new("kotlin.Int")).retained(BOTH);
    let (plan, _) = generate(vec![
        activity("com.alpha.MainActivity", vec![property()]),
        activity("com.beta.MainActivity", vec![property()]),
    ]);

    let mut names: Vec<_> = plan.keys.iter().map(|key| key.name.as_str()).collect();
    let mut values: Vec<_> = plan.keys.iter().map(|key| key.value.as_str()).collect();
    names.sort_unstable();
    names.dedup();
    values.sort_unstable();
    values.dedup();
    assert_eq!(names.len(), 2);
    assert_eq!(values.len(), 2);

    let rendered = plan
        .keys
        .iter()
        .map(|key| format!("{} = {}", key.name, key.value))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    k_MainActivity_count = com.alpha.MainActivity#count
    k_com_beta_MainActivity_count = com.beta.MainActivity#count
    ");
}

#[test]
fn placement_errors_are_reported_once() {
    let (_, diagnostics) = generate(vec![
        activity(
            "com.example.MainActivity",
            vec![
                PropertyDecl::new("fixed", TypeRef::new("kotlin.Int"))
                    .immutable()
                    .retained(BOTH),
            ],
        ),
        ClassDecl::new("com.example.Helper").with_property(
            PropertyDecl::new("value", TypeRef::new("kotlin.Int")).retained(BOTH),
        ),
    ]);
    let found: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.code.as_str())
        .collect();
    assert_eq!(found, [codes::NOT_MUTABLE, codes::NOT_A_COMPONENT]);
}

fn arbitrary_type() -> impl Strategy<Value = TypeRef> {
    let names = prop::sample::select(vec![
        "kotlin.Int",
        "kotlin.String",
        "kotlin.CharSequence",
        "kotlin.Array",
        "kotlin.collections.ArrayList",
        "android.util.SparseArray",
        "android.os.Bundle",
        "android.content.Intent",
        "java.util.Date",
        "com.example.Unknown",
    ]);
    let leaf = (names.clone(), any::<bool>()).prop_map(|(name, nullable)| {
        let ty = TypeRef::new(name);
        if nullable { ty.make_nullable() } else { ty }
    });
    leaf.prop_recursive(2, 8, 2, move |inner| {
        (names.clone(), prop::collection::vec(inner, 1..3), any::<bool>()).prop_map(
            |(name, args, nullable)| {
                let ty = args
                    .into_iter()
                    .fold(TypeRef::new(name), TypeRef::with_arg);
                if nullable { ty.make_nullable() } else { ty }
            },
        )
    })
}

proptest! {
    #[test]
    fn classification_is_total_and_deterministic(types in prop::collection::vec(arbitrary_type(), 1..12)) {
        let hierarchy = TypeHierarchy::with_platform();
        let mut memo = Classifier::new(&hierarchy);
        for ty in types.iter().chain(types.iter().rev()) {
            let direct = classify(ty, &hierarchy);
            prop_assert_eq!(&direct, &memo.classify(ty));
            prop_assert_eq!(direct.is_supported(), direct.suffix().is_some());
            if direct.category.needs_class_token() {
                prop_assert!(direct.class_token.is_some());
            }
        }
    }
}
