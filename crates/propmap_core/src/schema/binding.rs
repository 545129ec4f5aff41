//! Field bindings: the mapping rule plus accessors for one record field.
//!
//! # Responsibility
//! - Capture `(key, default, kind)` metadata per field at registration time.
//! - Capture typed getter/setter closures so the engine never touches record
//!   internals directly.
//!
//! # Invariants
//! - An excluded binding carries no accessors and is skipped by load and save.
//! - A binding without an explicit key maps under its own field name with an
//!   empty default; explicit-key-with-empty-default resolves through the same
//!   path.

use crate::scalar::{ScalarKind, ScalarValue};
use serde::Serialize;

type Getter<T> = Box<dyn Fn(&T) -> Option<ScalarValue> + Send + Sync>;
type Setter<T> = Box<dyn Fn(&mut T, ScalarValue) -> bool + Send + Sync>;

struct Mapping<T> {
    kind: ScalarKind,
    get: Getter<T>,
    set: Setter<T>,
}

/// Registered mapping rule for one field of a record type.
pub struct FieldBinding<T> {
    name: &'static str,
    key: Option<String>,
    default: String,
    mapping: Option<Mapping<T>>,
}

macro_rules! typed_binding {
    ($required:ident, $optional:ident, $ty:ty, $variant:ident) => {
        #[doc = concat!("Binds a required `", stringify!($ty), "` field.")]
        pub fn $required(name: &'static str, get: fn(&T) -> $ty, set: fn(&mut T, $ty)) -> Self {
            Self::with_accessors(
                name,
                ScalarKind::$variant,
                Box::new(move |record| Some(ScalarValue::$variant(get(record)))),
                Box::new(move |record, value| match value {
                    ScalarValue::$variant(v) => {
                        set(record, v);
                        true
                    }
                    _ => false,
                }),
            )
        }

        #[doc = concat!("Binds an `Option<", stringify!($ty), ">` field.")]
        ///
        /// A `None` value saves as an empty string; an absent or empty store
        /// entry leaves the field `None` on load.
        pub fn $optional(
            name: &'static str,
            get: fn(&T) -> Option<$ty>,
            set: fn(&mut T, $ty),
        ) -> Self {
            Self::with_accessors(
                name,
                ScalarKind::$variant,
                Box::new(move |record| get(record).map(ScalarValue::$variant)),
                Box::new(move |record, value| match value {
                    ScalarValue::$variant(v) => {
                        set(record, v);
                        true
                    }
                    _ => false,
                }),
            )
        }
    };
}

// The boxed accessors are `'static` trait objects, so bindings exist only
// for `'static` record types.
impl<T: 'static> FieldBinding<T> {
    typed_binding!(i8, opt_i8, i8, I8);
    typed_binding!(i16, opt_i16, i16, I16);
    typed_binding!(i32, opt_i32, i32, I32);
    typed_binding!(i64, opt_i64, i64, I64);
    typed_binding!(u8, opt_u8, u8, U8);
    typed_binding!(u16, opt_u16, u16, U16);
    typed_binding!(u32, opt_u32, u32, U32);
    typed_binding!(u64, opt_u64, u64, U64);
    typed_binding!(f32, opt_f32, f32, F32);
    typed_binding!(f64, opt_f64, f64, F64);
    typed_binding!(bool, opt_bool, bool, Bool);
    typed_binding!(char, opt_char, char, Char);
    typed_binding!(text, opt_text, String, Text);

    /// Binds a field with caller-supplied accessors.
    ///
    /// The setter must accept exactly the `ScalarValue` variant matching
    /// `kind` and return `false` for anything else; the engine reports a
    /// rejected assignment as a kind mismatch.
    pub fn with_accessors(
        name: &'static str,
        kind: ScalarKind,
        get: Getter<T>,
        set: Setter<T>,
    ) -> Self {
        Self {
            name,
            key: None,
            default: String::new(),
            mapping: Some(Mapping { kind, get, set }),
        }
    }

    /// Marks a field as excluded from mapping.
    ///
    /// Excluded fields are never read from or written to the store.
    pub fn excluded(name: &'static str) -> Self {
        Self {
            name,
            key: None,
            default: String::new(),
            mapping: None,
        }
    }

    /// Overrides the mapped store key for this binding.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the default used when the store has no entry for the key.
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Mapped store key: the explicit override, or the field name.
    pub fn mapped_key(&self) -> &str {
        self.key.as_deref().unwrap_or(self.name)
    }

    /// Default store value for an absent entry.
    pub fn default(&self) -> &str {
        &self.default
    }

    /// Scalar kind for included bindings, `None` when excluded.
    pub fn kind(&self) -> Option<ScalarKind> {
        self.mapping.as_ref().map(|m| m.kind)
    }

    /// Whether load and save consider this binding at all.
    pub fn is_included(&self) -> bool {
        self.mapping.is_some()
    }

    /// Reads the field's current value; `None` when the field holds no value
    /// or the binding is excluded.
    pub fn read(&self, record: &T) -> Option<ScalarValue> {
        self.mapping.as_ref().and_then(|m| (m.get)(record))
    }

    /// Assigns a coerced value through the setter.
    ///
    /// Returns `false` when the binding is excluded or the setter rejected
    /// the value's variant.
    pub fn assign(&self, record: &mut T, value: ScalarValue) -> bool {
        match &self.mapping {
            Some(m) => (m.set)(record, value),
            None => false,
        }
    }

    /// Serializable derived view of this binding.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            field: self.name.to_string(),
            key: self.mapped_key().to_string(),
            default: self.default.clone(),
            kind: self.kind(),
            included: self.is_included(),
        }
    }
}

/// Derived mapping rule for one field, as exported metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub field: String,
    pub key: String,
    pub default: String,
    pub kind: Option<ScalarKind>,
    pub included: bool,
}

#[cfg(test)]
mod tests {
    use super::FieldBinding;
    use crate::scalar::{ScalarKind, ScalarValue};

    #[derive(Debug, Default)]
    struct Sample {
        count: i32,
        label: Option<String>,
    }

    #[test]
    fn mapped_key_falls_back_to_field_name() {
        let binding = FieldBinding::i32("count", |s: &Sample| s.count, |s, v| s.count = v);
        assert_eq!(binding.mapped_key(), "count");
        assert_eq!(binding.default(), "");

        let keyed = FieldBinding::i32("count", |s: &Sample| s.count, |s, v| s.count = v)
            .key("c")
            .default_value("7");
        assert_eq!(keyed.mapped_key(), "c");
        assert_eq!(keyed.default(), "7");
    }

    #[test]
    fn assign_and_read_go_through_accessors() {
        let binding = FieldBinding::i32("count", |s: &Sample| s.count, |s, v| s.count = v);
        let mut sample = Sample::default();

        assert!(binding.assign(&mut sample, ScalarValue::I32(42)));
        assert_eq!(sample.count, 42);
        assert_eq!(binding.read(&sample), Some(ScalarValue::I32(42)));
    }

    #[test]
    fn assign_rejects_wrong_variant() {
        let binding = FieldBinding::i32("count", |s: &Sample| s.count, |s, v| s.count = v);
        let mut sample = Sample::default();

        assert!(!binding.assign(&mut sample, ScalarValue::Text("42".to_string())));
        assert_eq!(sample.count, 0);
    }

    #[test]
    fn optional_binding_reads_none_as_no_value() {
        let binding = FieldBinding::opt_text(
            "label",
            |s: &Sample| s.label.clone(),
            |s, v| s.label = Some(v),
        );
        let mut sample = Sample::default();

        assert_eq!(binding.read(&sample), None);
        assert!(binding.assign(&mut sample, ScalarValue::Text("hi".to_string())));
        assert_eq!(sample.label.as_deref(), Some("hi"));
    }

    #[test]
    fn excluded_binding_has_no_kind_and_rejects_assignment() {
        let binding = FieldBinding::<Sample>::excluded("scratch");
        let mut sample = Sample::default();

        assert!(!binding.is_included());
        assert_eq!(binding.kind(), None);
        assert_eq!(binding.read(&sample), None);
        assert!(!binding.assign(&mut sample, ScalarValue::Bool(true)));
    }

    #[test]
    fn descriptor_reflects_derivation_rule() {
        let descriptor = FieldBinding::i32("count", |s: &Sample| s.count, |s, v| s.count = v)
            .key("c")
            .descriptor();
        assert_eq!(descriptor.field, "count");
        assert_eq!(descriptor.key, "c");
        assert_eq!(descriptor.kind, Some(ScalarKind::I32));
        assert!(descriptor.included);
    }
}
