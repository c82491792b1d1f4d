//! Integration tests for the serializer pipeline.
//!
//! These exercise the full config -> schema -> serializer flow:
//! 1. Serialization of single instances, lists, and explicit field lists
//! 2. Validation: required/blank, booleans, lengths, casts, exclusions
//! 3. Nested relationships (one-to-one, one-to-many) and computed fields

use std::sync::{Arc, LazyLock};

use serde_json::json;

use serializers_rs::error::SerializerError;
use serializers_rs::fields::FieldValidator;
use serializers_rs::schema::SerializerConfig;
use serializers_rs::serializer::Serializer;
use serializers_rs_model::columns::{ColumnDef, ColumnType};
use serializers_rs_model::model::{AttrValue, Instance, ModelMeta};
use serializers_rs_model::value::Value;

// ============================================================================
// Fixtures
// ============================================================================

static NOTE_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    model_name: "note",
    columns: vec![ColumnDef::new("name", ColumnType::Char)],
});

struct Note {
    name: String,
}

impl Instance for Note {
    fn meta(&self) -> &'static ModelMeta {
        &NOTE_META
    }

    fn attribute(&self, name: &str) -> AttrValue<'_> {
        match name {
            "name" => AttrValue::Value(Value::String(self.name.clone())),
            _ => AttrValue::Missing,
        }
    }
}

static USER_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    model_name: "user",
    columns: vec![
        ColumnDef::new("id", ColumnType::Integer).primary_key(),
        ColumnDef::new("name", ColumnType::Char).max_length(6),
    ],
});

static FLAG_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    model_name: "flag",
    columns: vec![ColumnDef::new("is_active", ColumnType::Boolean)],
});

static PROFILE_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    model_name: "profile",
    columns: vec![
        ColumnDef::new("id", ColumnType::Integer).primary_key(),
        ColumnDef::new("bio", ColumnType::Char).max_length(100),
    ],
});

struct Profile {
    id: i64,
    bio: String,
}

impl Instance for Profile {
    fn meta(&self) -> &'static ModelMeta {
        &PROFILE_META
    }

    fn attribute(&self, name: &str) -> AttrValue<'_> {
        match name {
            "id" => AttrValue::Value(Value::Int(self.id)),
            "bio" => AttrValue::Value(Value::String(self.bio.clone())),
            _ => AttrValue::Missing,
        }
    }
}

static POST_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    model_name: "post",
    columns: vec![
        ColumnDef::new("id", ColumnType::Integer).primary_key(),
        ColumnDef::new("title", ColumnType::Char).max_length(20),
    ],
});

struct Post {
    id: i64,
    title: String,
}

impl Instance for Post {
    fn meta(&self) -> &'static ModelMeta {
        &POST_META
    }

    fn attribute(&self, name: &str) -> AttrValue<'_> {
        match name {
            "id" => AttrValue::Value(Value::Int(self.id)),
            "title" => AttrValue::Value(Value::String(self.title.clone())),
            _ => AttrValue::Missing,
        }
    }
}

static AUTHOR_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    model_name: "author",
    columns: vec![
        ColumnDef::new("id", ColumnType::Integer).primary_key(),
        ColumnDef::new("name", ColumnType::Char).max_length(50),
        ColumnDef::new("is_active", ColumnType::Boolean),
        ColumnDef::new(
            "role",
            ColumnType::Enum {
                choices: vec!["admin".to_string(), "member".to_string()],
            },
        )
        .nullable(),
        ColumnDef::new("followers", ColumnType::Integer).nullable(),
        ColumnDef::new(
            "profile",
            ColumnType::OneToOne {
                to: "profile".to_string(),
            },
        )
        .nullable(),
        ColumnDef::new(
            "posts",
            ColumnType::OneToMany {
                to: "post".to_string(),
            },
        )
        .nullable(),
    ],
});

#[derive(Clone, Copy)]
enum Role {
    Admin,
}

impl Role {
    fn as_attr(self) -> AttrValue<'static> {
        match self {
            Self::Admin => AttrValue::Enum {
                member: "Admin",
                value: Value::String("admin".to_string()),
            },
        }
    }
}

struct Author {
    id: i64,
    name: String,
    is_active: bool,
    role: Option<Role>,
    followers: Option<i64>,
    profile: Option<Profile>,
    posts: Vec<Post>,
}

impl Instance for Author {
    fn meta(&self) -> &'static ModelMeta {
        &AUTHOR_META
    }

    fn attribute(&self, name: &str) -> AttrValue<'_> {
        match name {
            "id" => AttrValue::Value(Value::Int(self.id)),
            "name" => AttrValue::Value(Value::String(self.name.clone())),
            "is_active" => AttrValue::Value(Value::Bool(self.is_active)),
            "role" => self
                .role
                .map_or(AttrValue::Value(Value::Null), Role::as_attr),
            "followers" => AttrValue::Value(Value::from(self.followers)),
            "profile" => self
                .profile
                .as_ref()
                .map_or(AttrValue::Value(Value::Null), |p| {
                    AttrValue::Related(p as &dyn Instance)
                }),
            "posts" => AttrValue::RelatedMany(
                self.posts.iter().map(|p| p as &dyn Instance).collect(),
            ),
            _ => AttrValue::Missing,
        }
    }
}

fn sample_author() -> Author {
    Author {
        id: 1,
        name: "hello world".to_string(),
        is_active: true,
        role: Some(Role::Admin),
        followers: Some(42),
        profile: Some(Profile {
            id: 7,
            bio: "writes things".to_string(),
        }),
        posts: vec![
            Post {
                id: 10,
                title: "First".to_string(),
            },
            Post {
                id: 11,
                title: "Second".to_string(),
            },
        ],
    }
}

fn serializer<'a>(config: SerializerConfig) -> Serializer<'a> {
    Serializer::new(Arc::new(config)).expect("config should resolve")
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_data_single_instance() {
    let note = Note {
        name: "hello world".to_string(),
    };
    let s = serializer(SerializerConfig::new(&NOTE_META)).with_instance(&note);

    assert_eq!(s.data().unwrap(), json!({"name": "hello world"}));
}

#[test]
fn test_data_multiple_instances() {
    let note = Note {
        name: "hello world".to_string(),
    };
    let s = serializer(SerializerConfig::new(&NOTE_META)).with_instances(vec![&note]);

    assert!(s.many());
    assert_eq!(s.data().unwrap(), json!([{"name": "hello world"}]));
}

#[test]
fn test_data_respects_explicit_field_list() {
    let author = sample_author();
    let s = serializer(SerializerConfig::new(&AUTHOR_META).with_fields(["id"]))
        .with_instance(&author);

    assert_eq!(s.data().unwrap(), json!({"id": 1}));
}

#[test]
fn test_data_key_order_follows_schema() {
    let author = sample_author();
    let s = serializer(SerializerConfig::new(&AUTHOR_META).with_fields([
        "id",
        "name",
        "is_active",
    ]))
    .with_instance(&author);

    let out = serde_json::to_string(&s.data().unwrap()).unwrap();
    assert_eq!(out, r#"{"id":1,"name":"hello world","is_active":true}"#);
}

#[test]
fn test_data_unbound_is_an_error() {
    let s = serializer(SerializerConfig::new(&NOTE_META));
    assert!(matches!(s.data(), Err(SerializerError::UnboundInstance)));
}

#[test]
fn test_data_unwraps_enum_to_scalar() {
    let author = sample_author();
    let s = serializer(SerializerConfig::new(&AUTHOR_META).with_fields(["id", "role"]))
        .with_instance(&author);

    assert_eq!(s.data().unwrap(), json!({"id": 1, "role": "admin"}));
}

#[test]
fn test_data_null_relation_serializes_as_null() {
    let mut author = sample_author();
    author.profile = None;
    author.role = None;
    let s = serializer(SerializerConfig::new(&AUTHOR_META).with_fields(["role", "profile"]))
        .with_instance(&author);

    assert_eq!(s.data().unwrap(), json!({"role": null, "profile": null}));
}

#[test]
fn test_data_relation_without_nested_serializer_emits_pk() {
    let author = sample_author();
    let s = serializer(SerializerConfig::new(&AUTHOR_META).with_fields([
        "id",
        "profile",
        "posts",
    ]))
    .with_instance(&author);

    assert_eq!(
        s.data().unwrap(),
        json!({"id": 1, "profile": 7, "posts": [10, 11]})
    );
}

#[test]
fn test_data_computed_field() {
    let author = sample_author();
    let config = SerializerConfig::new(&AUTHOR_META)
        .with_fields(["id", "display_name"])
        .with_computed("display_name", |instance, _| {
            match instance.attribute("name") {
                AttrValue::Value(Value::String(name)) => json!(format!("Author: {name}")),
                _ => serde_json::Value::Null,
            }
        });
    let s = serializer(config).with_instance(&author);

    assert_eq!(
        s.data().unwrap(),
        json!({"id": 1, "display_name": "Author: hello world"})
    );
}

#[test]
fn test_data_computed_field_without_getter_is_null() {
    let author = sample_author();
    let config = SerializerConfig::new(&AUTHOR_META)
        .with_fields(["id", "display_name"])
        .with_field("display_name", FieldValidator::method());
    let s = serializer(config).with_instance(&author);

    assert_eq!(
        s.data().unwrap(),
        json!({"id": 1, "display_name": null})
    );
}

// ============================================================================
// Nested relationships
// ============================================================================

#[test]
fn test_nested_one_to_one() {
    let author = sample_author();
    let profile_config = Arc::new(SerializerConfig::new(&PROFILE_META));
    let config = SerializerConfig::new(&AUTHOR_META)
        .with_fields(["id", "profile"])
        .with_nested("profile", profile_config);
    let s = serializer(config).with_instance(&author);

    assert_eq!(
        s.data().unwrap(),
        json!({"id": 1, "profile": {"id": 7, "bio": "writes things"}})
    );
}

#[test]
fn test_nested_one_to_many_preserves_order() {
    let author = sample_author();
    let post_config = Arc::new(SerializerConfig::new(&POST_META));
    let config = SerializerConfig::new(&AUTHOR_META)
        .with_fields(["id", "posts"])
        .with_nested("posts", post_config);
    let s = serializer(config).with_instance(&author);

    assert_eq!(
        s.data().unwrap(),
        json!({
            "id": 1,
            "posts": [
                {"id": 10, "title": "First"},
                {"id": 11, "title": "Second"},
            ],
        })
    );
}

#[test]
fn test_nested_config_is_reusable_across_parents() {
    let first = sample_author();
    let mut second = sample_author();
    second.id = 2;
    second.profile = Some(Profile {
        id: 8,
        bio: "reads things".to_string(),
    });

    let profile_config = Arc::new(SerializerConfig::new(&PROFILE_META));
    let config = Arc::new(
        SerializerConfig::new(&AUTHOR_META)
            .with_fields(["id", "profile"])
            .with_nested("profile", profile_config),
    );

    let a = Serializer::new(Arc::clone(&config)).unwrap().with_instance(&first);
    let b = Serializer::new(config).unwrap().with_instance(&second);

    assert_eq!(
        a.data().unwrap(),
        json!({"id": 1, "profile": {"id": 7, "bio": "writes things"}})
    );
    assert_eq!(
        b.data().unwrap(),
        json!({"id": 2, "profile": {"id": 8, "bio": "reads things"}})
    );
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_is_valid_required_fields() {
    let mut s = serializer(SerializerConfig::new(&USER_META))
        .with_data(json!({"name": "Fulano"}));

    assert!(s.is_valid());
    assert!(s.errors().is_empty());
}

#[test]
fn test_is_valid_required_fields_are_filled() {
    let mut s = serializer(SerializerConfig::new(&USER_META)).with_data(json!({"name": null}));

    assert!(!s.is_valid());
    assert_eq!(s.errors()["name"], vec!["Can't be blank"]);
}

#[test]
fn test_is_valid_missing_key_counts_as_blank() {
    let mut s = serializer(SerializerConfig::new(&USER_META)).with_data(json!({}));

    assert!(!s.is_valid());
    assert_eq!(s.errors()["name"], vec!["Can't be blank"]);
}

#[test]
fn test_is_valid_skips_default_id_exclusion() {
    // "id" is non-nullable metadata but excluded from validation by default.
    let mut s = serializer(SerializerConfig::new(&USER_META))
        .with_data(json!({"name": "Fulano"}));

    assert!(s.is_valid());
    assert!(!s.validated_data().contains_key("id"));
}

#[test]
fn test_is_valid_custom_exclusions() {
    let config = SerializerConfig::new(&USER_META).with_exclude(["id", "name"]);
    let mut s = serializer(config).with_data(json!({"name": null}));

    assert!(s.is_valid());
    assert!(s.errors().is_empty());
}

#[test]
fn test_is_valid_with_declared_validator_override() {
    let config = SerializerConfig::new(&USER_META).with_field("name", FieldValidator::string());
    let mut s = serializer(config).with_data(json!({"name": "Fulano"}));

    assert!(s.is_valid());
    assert!(s.errors().is_empty());
}

#[test]
fn test_is_valid_boolean_token_table() {
    for raw in [json!(true), json!("true"), json!(1), json!(false), json!("false"), json!(0)] {
        let mut s = serializer(SerializerConfig::new(&FLAG_META))
            .with_data(json!({ "is_active": raw.clone() }));
        assert!(s.is_valid(), "raw: {raw}");
    }
}

#[test]
fn test_is_valid_boolean_rejects_non_tokens() {
    let mut s =
        serializer(SerializerConfig::new(&FLAG_META)).with_data(json!({"is_active": "abc"}));

    assert!(!s.is_valid());
    assert_eq!(s.errors()["is_active"], vec!["Not a valid boolean"]);
}

#[test]
fn test_is_valid_string_length_limit() {
    let mut s = serializer(SerializerConfig::new(&USER_META))
        .with_data(json!({"name": "Fulanos"}));

    assert!(!s.is_valid());
    assert_eq!(s.errors()["name"], vec!["Limit of characters is 6"]);
}

#[test]
fn test_is_valid_integer_uncastable_degrades_to_field_error() {
    let config = SerializerConfig::new(&AUTHOR_META).with_fields(["followers"]);
    let mut s = serializer(config).with_data(json!({"followers": "ten"}));

    assert!(!s.is_valid());
    assert_eq!(s.errors()["followers"], vec!["Not a valid integer"]);
}

#[test]
fn test_validated_data_holds_cast_values() {
    let config = SerializerConfig::new(&AUTHOR_META).with_fields(["name", "is_active", "followers"]);
    let mut s = serializer(config).with_data(json!({
        "name": "Fulano",
        "is_active": "true",
        "followers": "10",
    }));

    assert!(s.is_valid());
    assert_eq!(s.validated_data()["name"], Value::String("Fulano".to_string()));
    assert_eq!(s.validated_data()["is_active"], Value::Bool(true));
    assert_eq!(s.validated_data()["followers"], Value::Int(10));
}

#[test]
fn test_failing_field_never_enters_validated_data() {
    let mut s = serializer(SerializerConfig::new(&USER_META)).with_data(json!({"name": null}));

    assert!(!s.is_valid());
    assert!(!s.validated_data().contains_key("name"));
}

#[test]
fn test_all_fields_evaluated_despite_failures() {
    let config = SerializerConfig::new(&AUTHOR_META).with_fields(["name", "is_active", "followers"]);
    let mut s = serializer(config).with_data(json!({
        "name": null,
        "is_active": "abc",
        "followers": 3,
    }));

    assert!(!s.is_valid());
    assert_eq!(s.errors().len(), 2);
    assert_eq!(s.validated_data()["followers"], Value::Int(3));
}

#[test]
fn test_is_valid_repeated_calls_accumulate() {
    let mut s = serializer(SerializerConfig::new(&USER_META)).with_data(json!({"name": null}));

    assert!(!s.is_valid());
    assert!(!s.is_valid());
    // Re-running replaces per-field entries rather than resetting the
    // maps; the message list does not grow.
    assert_eq!(s.errors()["name"], vec!["Can't be blank"]);
}

#[test]
fn test_clear_resets_errors_and_validated_data() {
    let mut s = serializer(SerializerConfig::new(&USER_META)).with_data(json!({"name": null}));

    assert!(!s.is_valid());
    assert!(!s.errors().is_empty());

    s.clear();
    assert!(s.errors().is_empty());
    assert!(s.validated_data().is_empty());
    assert_eq!(s.schema().len(), 2);
}

#[test]
fn test_partial_flag_is_inert() {
    let mut s = serializer(SerializerConfig::new(&USER_META))
        .with_data(json!({"name": null}))
        .with_partial(true);

    assert!(s.partial());
    assert!(!s.is_valid());
}

// ============================================================================
// Round-trip and construction errors
// ============================================================================

#[test]
fn test_round_trip_data_validates_cleanly() {
    let author = sample_author();
    let config = Arc::new(
        SerializerConfig::new(&AUTHOR_META).with_fields(["id", "name", "is_active"]),
    );

    let out = Serializer::new(Arc::clone(&config))
        .unwrap()
        .with_instance(&author)
        .data()
        .unwrap();

    let mut inbound = Serializer::new(config).unwrap().with_data(out);
    assert!(inbound.is_valid());
    assert!(inbound.errors().is_empty());
}

#[test]
fn test_unbound_config_fails_at_construction() {
    assert!(matches!(
        Serializer::new(Arc::new(SerializerConfig::default())).map(|_| ()),
        Err(SerializerError::MalformedConfig(_))
    ));
}

#[test]
fn test_context_entries_are_held_for_nested_serializers() {
    let note = Note {
        name: "hi".to_string(),
    };
    let s = serializer(SerializerConfig::new(&NOTE_META))
        .with_instance(&note)
        .with_context("locale", json!("en"));

    assert_eq!(s.context()["locale"], json!("en"));
    assert_eq!(s.data().unwrap(), json!({"name": "hi"}));
}

#[test]
fn test_computed_field_reads_context() {
    let author = sample_author();
    let config = SerializerConfig::new(&AUTHOR_META)
        .with_fields(["id", "locale"])
        .with_computed("locale", |_, context| {
            context
                .get("locale")
                .cloned()
                .unwrap_or(serde_json::Value::Null)
        });
    let s = serializer(config)
        .with_instance(&author)
        .with_context("locale", json!("en"));

    assert_eq!(s.data().unwrap(), json!({"id": 1, "locale": "en"}));
}

#[test]
fn test_nested_computed_field_observes_propagated_context() {
    let author = sample_author();
    let profile_config = Arc::new(
        SerializerConfig::new(&PROFILE_META)
            .with_fields(["id", "locale"])
            .with_computed("locale", |_, context| {
                context
                    .get("locale")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null)
            }),
    );
    let config = SerializerConfig::new(&AUTHOR_META)
        .with_fields(["id", "profile"])
        .with_nested("profile", profile_config);
    let s = serializer(config)
        .with_instance(&author)
        .with_context("locale", json!("pt-BR"));

    assert_eq!(
        s.data().unwrap(),
        json!({"id": 1, "profile": {"id": 7, "locale": "pt-BR"}})
    );
}
