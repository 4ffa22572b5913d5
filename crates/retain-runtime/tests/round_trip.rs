//! Generated savers executed against live instances.

use proptest::prelude::*;

use retain_core::{PassController, PassInput, TypeHierarchy};
use retain_model::{
    Artifact, ClassDecl, IdentificationStrategy, ProcessorOptions, PropertyDecl, RetentionPolicy,
    TypeRef,
};
use retain_runtime::{
    Bundle, ComponentInstance, FieldSlot, GeneratedStateHolder, GeneratedStateSaver, SaverError,
    StateHolder, StateSaver, StateSavingHost, Value, provide_state_saver,
};

const CONFIG: [RetentionPolicy; 1] = [RetentionPolicy::ConfigurationChange];
const DEATH: [RetentionPolicy; 1] = [RetentionPolicy::ProcessDeath];
const BOTH: [RetentionPolicy; 2] = [
    RetentionPolicy::ConfigurationChange,
    RetentionPolicy::ProcessDeath,
];

const MAIN: &str = "com.example.MainActivity";
const DETAIL: &str = "com.example.DetailFragment";

fn ty(text: &str) -> TypeRef {
    TypeRef::parse(text).unwrap()
}

fn activity(name: &str) -> ClassDecl {
    ClassDecl::new(name).with_supertype("dev.retain.StateSavingActivity")
}

fn fragment(name: &str) -> ClassDecl {
    ClassDecl::new(name).with_supertype("dev.retain.StateSavingFragment")
}

/// Runs the passes a host would and wraps the resulting plan.
fn build(classes: Vec<ClassDecl>) -> GeneratedStateSaver {
    let mut controller = PassController::new(ProcessorOptions::default());
    let mut hierarchy = TypeHierarchy::with_platform();
    hierarchy.insert(ClassDecl::new("com.example.User").with_supertype("android.os.Parcelable"));
    hierarchy.extend(classes.iter().cloned());
    let mut symbols: Vec<_> = classes.iter().flat_map(ClassDecl::retained_symbols).collect();
    for _ in 0..4 {
        let outcome = controller.process(PassInput::new(&hierarchy, &symbols));
        hierarchy.extend(outcome.generated_classes);
        let plan = outcome.artifacts.into_iter().find_map(|artifact| match artifact {
            Artifact::Saver(plan) => Some(plan),
            _ => None,
        });
        if let Some(plan) = plan {
            return GeneratedStateSaver::new(plan, hierarchy);
        }
        symbols = outcome.deferred;
    }
    panic!("no saver after four passes");
}

fn detail_saver() -> GeneratedStateSaver {
    build(vec![
        fragment(DETAIL)
            .with_property(PropertyDecl::new("page", ty("kotlin.Int")).retained(BOTH))
            .with_property(PropertyDecl::new("query", ty("kotlin.String?")).retained(DEATH)),
    ])
}

fn detail(tag: Option<&str>, page: i32) -> ComponentInstance {
    let instance = ComponentInstance::new(DETAIL)
        .with_field("page", page)
        .with_null("query");
    match tag {
        Some(tag) => instance.with_tag(tag),
        None => instance,
    }
}

#[test]
fn config_change_round_trip() {
    let saver = build(vec![
        activity(MAIN)
            .with_property(PropertyDecl::new("count", ty("kotlin.Int")).retained(CONFIG))
            .with_property(PropertyDecl::new("label", ty("kotlin.String?")).retained(CONFIG))
            .with_property(PropertyDecl::new("draft", ty("com.example.Draft")).retained(CONFIG))
            .with_property(
                PropertyDecl::new("user", ty("com.example.User"))
                    .lateinit()
                    .retained(CONFIG),
            ),
    ]);
    let before = ComponentInstance::new(MAIN)
        .with_field("count", 5)
        .with_null("label")
        .with_field("draft", Value::object("com.example.Draft", "hello"))
        .with_lateinit("user");
    let mut after = ComponentInstance::new(MAIN)
        .with_field("count", 0)
        .with_field("label", "initial")
        .with_field("draft", Value::object("com.example.Draft", "fresh"))
        .with_lateinit("user");

    let mut host = StateSavingHost::new(Box::new(saver));
    host.tear_down_for_config_change(std::slice::from_ref(&before)).unwrap();
    host.recreate(std::slice::from_mut(&mut after), None).unwrap();

    assert_eq!(after.read("count").unwrap(), Some(&Value::Int(5)));
    assert_eq!(after.field("label"), Some(&FieldSlot::Null));
    assert_eq!(
        after.read("draft").unwrap(),
        Some(&Value::object("com.example.Draft", "hello"))
    );
    assert_eq!(after.field("user"), Some(&FieldSlot::Uninitialized));
    assert!(host.channel().is_empty());
}

#[test]
fn process_death_round_trip_skips_unsupported_types() {
    let saver = build(vec![
        activity(MAIN)
            .with_property(PropertyDecl::new("count", ty("kotlin.Int")).retained(DEATH))
            .with_property(PropertyDecl::new("label", ty("kotlin.String?")).retained(DEATH))
            .with_property(
                PropertyDecl::new("tags", ty("kotlin.collections.ArrayList<kotlin.String>"))
                    .retained(DEATH),
            )
            .with_property(PropertyDecl::new("user", ty("com.example.User")).retained(DEATH))
            .with_property(
                PropertyDecl::new("cache", ty("kotlin.collections.HashMap<kotlin.String, kotlin.Int>"))
                    .retained(DEATH),
            ),
    ]);
    let tags = Value::List(vec!["a".into(), "b".into()]);
    let before = ComponentInstance::new(MAIN)
        .with_field("count", 7)
        .with_field("label", "saved")
        .with_field("tags", tags.clone())
        .with_field("user", Value::object("com.example.User", "ada"))
        .with_field("cache", Value::List(Vec::new()));
    let mut after = ComponentInstance::new(MAIN)
        .with_field("count", 0)
        .with_null("label")
        .with_null("tags")
        .with_field("user", Value::object("com.example.User", "nobody"))
        .with_field("cache", Value::object("java.util.HashMap", "fresh"));

    let mut host = StateSavingHost::new(Box::new(saver));
    let saved = host.save_instance_state(std::slice::from_ref(&before)).unwrap();
    assert_eq!(saved.len(), 4);
    assert!(saved.keys().all(|key| !key.ends_with("#cache")));

    host.recreate(std::slice::from_mut(&mut after), Some(&saved)).unwrap();
    assert_eq!(after.read("count").unwrap(), Some(&Value::Int(7)));
    assert_eq!(after.read("label").unwrap(), Some(&Value::from("saved")));
    assert_eq!(after.read("tags").unwrap(), Some(&tags));
    assert_eq!(
        after.read("user").unwrap(),
        Some(&Value::object("com.example.User", "ada"))
    );
    assert_eq!(
        after.read("cache").unwrap(),
        Some(&Value::object("java.util.HashMap", "fresh"))
    );
}

#[test]
fn missing_primitives_restore_defaults() {
    let saver = build(vec![
        activity(MAIN).with_property(PropertyDecl::new("count", ty("kotlin.Int")).retained(DEATH)),
    ]);
    let mut screen = ComponentInstance::new(MAIN).with_field("count", 9);
    saver.restore_state_bundle(&mut screen, &Bundle::new()).unwrap();
    assert_eq!(screen.read("count").unwrap(), Some(&Value::Int(0)));
}

#[test]
fn repeatable_holders_are_consumed_once() {
    let saver = detail_saver();
    let holder = saver
        .save_state_config_change(&detail(Some("a"), 1), None)
        .unwrap();
    let mut holder = saver
        .save_state_config_change(&detail(Some("b"), 2), Some(holder))
        .unwrap();

    let mut first = detail(Some("a"), 0);
    saver.restore_state_config_change(&mut first, &mut holder).unwrap();
    assert_eq!(first.read("page").unwrap(), Some(&Value::Int(1)));

    let mut again = detail(Some("a"), 0);
    saver.restore_state_config_change(&mut again, &mut holder).unwrap();
    assert_eq!(again.read("page").unwrap(), Some(&Value::Int(0)));

    let mut second = detail(Some("b"), 0);
    saver.restore_state_config_change(&mut second, &mut holder).unwrap();
    assert_eq!(second.read("page").unwrap(), Some(&Value::Int(2)));
}

#[test]
fn channel_delivers_the_holder_once() {
    let mut host = StateSavingHost::new(Box::new(detail_saver()));
    host.tear_down_for_config_change(&[detail(Some("a"), 4)]).unwrap();

    let mut recreated = [detail(Some("a"), 0)];
    host.recreate(&mut recreated, None).unwrap();
    assert_eq!(recreated[0].read("page").unwrap(), Some(&Value::Int(4)));

    let mut later = [detail(Some("a"), 0)];
    host.recreate(&mut later, None).unwrap();
    assert_eq!(later[0].read("page").unwrap(), Some(&Value::Int(0)));
}

#[test]
fn instances_use_nested_bundles() {
    let saver = detail_saver();
    let by_id = detail(None, 3)
        .with_strategy(IdentificationStrategy::Id)
        .with_id(7);
    let mut bundle = Bundle::new();
    saver.save_state_bundle(&by_id, &mut bundle).unwrap();
    let nested = bundle.get_bundle("com.example.DetailFragment@id:7").unwrap();
    assert_eq!(
        nested.get("Int", "com.example.DetailFragment#page"),
        Some(&Value::Int(3))
    );

    let mut other = detail(None, 0)
        .with_strategy(IdentificationStrategy::Id)
        .with_id(8);
    saver.restore_state_bundle(&mut other, &bundle).unwrap();
    assert_eq!(other.read("page").unwrap(), Some(&Value::Int(0)));

    let mut same = detail(None, 0)
        .with_strategy(IdentificationStrategy::Id)
        .with_id(7);
    saver.restore_state_bundle(&mut same, &bundle).unwrap();
    assert_eq!(same.read("page").unwrap(), Some(&Value::Int(3)));
}

#[test]
fn class_strategy_shares_one_slot() {
    let saver = detail_saver();
    let shared = detail(None, 5).with_strategy(IdentificationStrategy::Class);
    let mut holder = saver.save_state_config_change(&shared, None).unwrap();
    let mut restored = detail(None, 0).with_strategy(IdentificationStrategy::Class);
    saver.restore_state_config_change(&mut restored, &mut holder).unwrap();
    assert_eq!(restored.read("page").unwrap(), Some(&Value::Int(5)));
    assert_eq!(holder.as_generated().map(GeneratedStateHolder::stored), Some(0));
}

#[test]
fn tag_strategy_without_tag_is_fatal() {
    let saver = detail_saver();
    let untagged = detail(None, 1);
    assert!(matches!(
        saver.save_state_config_change(&untagged, None),
        Err(SaverError::MissingTag { .. })
    ));
    assert!(matches!(
        saver.save_state_bundle(&untagged, &mut Bundle::new()),
        Err(SaverError::MissingTag { .. })
    ));
}

#[test]
fn subclasses_dispatch_to_their_own_arm() {
    let saver = build(vec![
        activity("com.example.BaseActivity")
            .with_property(PropertyDecl::new("base", ty("kotlin.Int")).retained(DEATH)),
        ClassDecl::new("com.example.ChildActivity")
            .with_supertype("com.example.BaseActivity")
            .with_property(PropertyDecl::new("child", ty("kotlin.Int")).retained(DEATH)),
    ]);
    assert_eq!(saver.plan().components[0].component, "com.example.ChildActivity");

    let child = ComponentInstance::new("com.example.ChildActivity")
        .with_field("base", 1)
        .with_field("child", 2);
    let mut bundle = Bundle::new();
    saver.save_state_bundle(&child, &mut bundle).unwrap();
    assert!(bundle.contains_key("com.example.ChildActivity#child"));
    assert!(!bundle.contains_key("com.example.BaseActivity#base"));
}

#[test]
fn empty_saver_changes_nothing() {
    let saver = provide_state_saver(None, TypeHierarchy::with_platform());
    let screen = ComponentInstance::new(MAIN).with_field("count", 1);
    let holder = saver.save_state_config_change(&screen, None).unwrap();
    assert_eq!(holder, StateHolder::Empty);
    let mut bundle = Bundle::new();
    saver.save_state_bundle(&screen, &mut bundle).unwrap();
    assert!(bundle.is_empty());
}

fn primitives_saver() -> GeneratedStateSaver {
    build(vec![
        activity(MAIN)
            .with_property(PropertyDecl::new("int", ty("kotlin.Int")).retained(BOTH))
            .with_property(PropertyDecl::new("long", ty("kotlin.Long")).retained(BOTH))
            .with_property(PropertyDecl::new("flag", ty("kotlin.Boolean")).retained(BOTH))
            .with_property(PropertyDecl::new("ratio", ty("kotlin.Double")).retained(BOTH))
            .with_property(PropertyDecl::new("letter", ty("kotlin.Char")).retained(BOTH))
            .with_property(PropertyDecl::new("name", ty("kotlin.String")).retained(BOTH))
            .with_property(PropertyDecl::new("note", ty("kotlin.String?")).retained(BOTH))
            .with_property(PropertyDecl::new("bytes", ty("kotlin.ByteArray?")).retained(BOTH)),
    ])
}

fn zeroed() -> ComponentInstance {
    ComponentInstance::new(MAIN)
        .with_field("int", 0)
        .with_field("long", Value::Long(0))
        .with_field("flag", false)
        .with_field("ratio", Value::Double(0.0))
        .with_field("letter", Value::Char('\0'))
        .with_field("name", "")
        .with_null("note")
        .with_null("bytes")
}

prop_compose! {
    fn screen()(
        int in any::<i32>(),
        long in any::<i64>(),
        flag in any::<bool>(),
        ratio in -1.0e9f64..1.0e9,
        letter in any::<char>(),
        name in ".{0,12}",
        note in proptest::option::of(".{0,12}"),
        bytes in proptest::option::of(prop::collection::vec(any::<i8>(), 0..6)),
    ) -> ComponentInstance {
        let mut screen = ComponentInstance::new(MAIN)
            .with_field("int", int)
            .with_field("long", Value::Long(long))
            .with_field("flag", flag)
            .with_field("ratio", Value::Double(ratio))
            .with_field("letter", Value::Char(letter))
            .with_field("name", name)
            .with_null("note")
            .with_null("bytes");
        screen.assign("note", note.map(Value::String)).unwrap();
        let bytes = bytes.map(|bytes| Value::List(bytes.into_iter().map(Value::Byte).collect()));
        screen.assign("bytes", bytes).unwrap();
        screen
    }
}

proptest! {
    #[test]
    fn memory_round_trip_restores_every_field(before in screen()) {
        let saver = primitives_saver();
        let mut holder = saver.save_state_config_change(&before, None).unwrap();
        let mut after = zeroed();
        saver.restore_state_config_change(&mut after, &mut holder).unwrap();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn bundle_round_trip_restores_every_field(before in screen()) {
        let saver = primitives_saver();
        let mut bundle = Bundle::new();
        saver.save_state_bundle(&before, &mut bundle).unwrap();
        let mut after = zeroed();
        saver.restore_state_bundle(&mut after, &bundle).unwrap();
        prop_assert_eq!(after, before);
    }
}
