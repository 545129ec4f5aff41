//! Demo harness for the mapping engine.
//!
//! # Responsibility
//! - Register one demo entity, load it from a properties file, mutate it,
//!   and save it back.
//! - Keep output deterministic for quick local sanity checks.

use propmap_core::{
    EntitySchema, FieldBinding, FileStoreProvider, MapError, Mapper, SchemaRegistry,
};
use std::process::ExitCode;

#[derive(Debug, Default)]
struct DemoBean {
    aaa: i32,
    b: Option<String>,
    c: String,
}

fn demo_schema(store_id: &str) -> Result<EntitySchema<DemoBean>, MapError> {
    let schema = EntitySchema::builder(store_id)
        .field(FieldBinding::i32("aaa", |d: &DemoBean| d.aaa, |d, v| d.aaa = v).key("a"))
        .field(FieldBinding::opt_text(
            "b",
            |d: &DemoBean| d.b.clone(),
            |d, v| d.b = Some(v),
        ))
        .field(FieldBinding::excluded("c"))
        .build()?;
    Ok(schema)
}

fn run(store_id: &str) -> Result<(), MapError> {
    let mut registry = SchemaRegistry::new();
    registry.register(demo_schema(store_id)?);
    let mapper = Mapper::new(&registry, FileStoreProvider::new());

    let mut bean: DemoBean = mapper.load()?;
    println!("loaded {bean:?}");

    bean.aaa += 1;
    bean.b = Some(format!("saved {} times", bean.aaa));
    bean.c = "scratch state, never persisted".to_string();
    mapper.save(&bean)?;
    println!("saved  {bean:?}");

    Ok(())
}

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var("PROPMAP_LOG_DIR") {
        if let Err(err) = propmap_core::init_logging(propmap_core::default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let store_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demo.properties".to_string());
    println!("propmap_core version={}", propmap_core::core_version());
    println!("store={store_id}");

    match run(&store_id) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
