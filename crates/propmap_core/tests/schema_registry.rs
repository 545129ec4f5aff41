use propmap_core::{EntitySchema, FieldBinding, ScalarKind, SchemaError, SchemaRegistry};

#[derive(Debug, Default)]
struct Settings {
    volume: u8,
    theme: Option<String>,
    cache: String,
}

fn settings_schema() -> EntitySchema<Settings> {
    EntitySchema::builder("settings.properties")
        .field(
            FieldBinding::u8("volume", |s: &Settings| s.volume, |s, v| s.volume = v)
                .key("audio.volume")
                .default_value("50"),
        )
        .field(FieldBinding::opt_text(
            "theme",
            |s: &Settings| s.theme.clone(),
            |s, v| s.theme = Some(v),
        ))
        .field(FieldBinding::excluded("cache"))
        .build()
        .unwrap()
}

#[test]
fn entity_descriptor_carries_the_store_id() {
    let descriptor = settings_schema().descriptor();
    assert_eq!(descriptor.store_id, "settings.properties");

    let json = serde_json::to_value(&descriptor).unwrap();
    assert_eq!(json["store_id"], "settings.properties");
}

#[test]
fn field_descriptors_follow_the_derivation_rule() {
    let descriptors = settings_schema().field_descriptors();
    assert_eq!(descriptors.len(), 3);

    assert_eq!(descriptors[0].field, "volume");
    assert_eq!(descriptors[0].key, "audio.volume");
    assert_eq!(descriptors[0].default, "50");
    assert_eq!(descriptors[0].kind, Some(ScalarKind::U8));
    assert!(descriptors[0].included);

    // No explicit key: the field name is the mapped key, default is empty.
    assert_eq!(descriptors[1].field, "theme");
    assert_eq!(descriptors[1].key, "theme");
    assert_eq!(descriptors[1].default, "");
    assert_eq!(descriptors[1].kind, Some(ScalarKind::Text));
    assert!(descriptors[1].included);

    assert_eq!(descriptors[2].field, "cache");
    assert_eq!(descriptors[2].kind, None);
    assert!(!descriptors[2].included);
}

#[test]
fn field_descriptors_serialize_with_snake_case_kinds() {
    let json = serde_json::to_value(settings_schema().field_descriptors()).unwrap();

    assert_eq!(json[0]["field"], "volume");
    assert_eq!(json[0]["key"], "audio.volume");
    assert_eq!(json[0]["kind"], "u8");
    assert_eq!(json[0]["included"], true);
    assert_eq!(json[2]["kind"], serde_json::Value::Null);
    assert_eq!(json[2]["included"], false);
}

#[test]
fn registry_resolves_and_reports_unregistered_types() {
    #[derive(Debug, Default)]
    struct Elsewhere;

    let mut registry = SchemaRegistry::new();
    registry.register(settings_schema());

    assert!(registry.contains::<Settings>());
    assert!(!registry.contains::<Elsewhere>());
    assert_eq!(
        registry.resolve::<Settings>().unwrap().store_id(),
        "settings.properties"
    );

    let err = registry.resolve::<Elsewhere>().unwrap_err();
    assert!(err.to_string().contains("Elsewhere"));
    assert!(matches!(err, SchemaError::NotAnEntity { .. }));
}
