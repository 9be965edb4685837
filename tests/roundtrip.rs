use indoc::indoc;
use serde::{Deserialize, Serialize};
use yaml_tagged::{
    Error, TagRegistry, Value, dump_options, dump_str_with_options, dump_value_str,
    dump_value_str_with_options, load_str,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Robot {
    name: String,
    battery: u32,
}
yaml_tagged::tag_info!(Robot, namespace = "com.example");

fn registry() -> TagRegistry {
    let mut registry = TagRegistry::new();
    registry.register::<Robot>().unwrap();
    registry
}

#[test]
fn tagged_object_round_trip_is_exact() {
    let registry = registry();
    let yaml = indoc! {"
        !tagged/com.example.Robot
        name: rusty
        battery: 95
    "};
    let value = load_str(&registry, yaml).unwrap();
    assert_eq!(dump_value_str(&registry, &value).unwrap(), yaml);
}

#[test]
fn nested_objects_round_trip() {
    let registry = registry();
    let yaml = indoc! {"
        fleet:
          - !tagged/com.example.Robot
            name: a
            battery: 1
          - !tagged/com.example.Robot
            name: b
            battery: 2
        site: mars
    "};
    let value = load_str(&registry, yaml).unwrap();

    let fleet = value.as_mapping().unwrap().get("fleet").unwrap();
    let first = fleet.as_sequence().unwrap()[0].as_object().unwrap();
    assert_eq!(first.downcast_ref::<Robot>().unwrap().name, "a");

    let dumped = dump_value_str(&registry, &value).unwrap();
    let reloaded = load_str(&registry, &dumped).unwrap();
    assert_eq!(reloaded, value);
}

#[test]
fn quoted_and_plain_scalars_survive() {
    let registry = registry();
    let yaml = indoc! {r#"
        plain: 1
        quoted: "1"
        word: hello
        nothing:
    "#};
    let value = load_str(&registry, yaml).unwrap();
    let mapping = value.as_mapping().unwrap();
    assert_eq!(mapping.get("plain"), Some(&Value::scalar("1")));
    assert_eq!(mapping.get("quoted"), Some(&Value::string("1")));
    assert_eq!(mapping.get("nothing"), Some(&Value::scalar("")));

    let dumped = dump_value_str(&registry, &value).unwrap();
    assert_eq!(dumped, "plain: 1\nquoted: \"1\"\nword: hello\nnothing:\n");
    assert_eq!(load_str(&registry, &dumped).unwrap(), value);
}

#[test]
fn key_order_is_preserved() {
    let registry = registry();
    let yaml = "zulu: 1\nalpha: 2\nmike: 3\n";
    let value = load_str(&registry, yaml).unwrap();
    assert_eq!(dump_value_str(&registry, &value).unwrap(), yaml);
}

#[test]
fn omit_tags_drops_type_information() {
    let registry = registry();
    let robot = Robot {
        name: "rusty".into(),
        battery: 9,
    };
    let opts = dump_options! { omit_tags: true };
    let yaml = dump_str_with_options(&registry, &robot, &opts).unwrap();
    assert_eq!(yaml, "name: rusty\nbattery: 9\n");

    // Re-loading such output yields plain data, not a Robot.
    let back = load_str(&registry, &yaml).unwrap();
    assert!(back.as_mapping().is_some());
}

#[test]
fn indent_step_applies_to_nested_mappings() {
    let registry = registry();
    let value = load_str(&registry, "outer:\n  inner: 1\n").unwrap();
    let opts = dump_options! { indent_step: 4 };
    let yaml = dump_value_str_with_options(&registry, &value, &opts).unwrap();
    assert_eq!(yaml, "outer:\n    inner: 1\n");
}

#[test]
fn zero_indent_step_is_rejected() {
    let registry = registry();
    let opts = dump_options! { indent_step: 0 };
    let err =
        dump_value_str_with_options(&registry, &Value::scalar("x"), &opts).unwrap_err();
    assert!(matches!(err, Error::InvalidOptions { .. }));
    assert!(format!("{err}").contains("indent_step"));
}

#[test]
fn empty_containers_render_as_braces() {
    let registry = registry();
    let value = load_str(&registry, "seq: []\nmap: {}\n").unwrap();
    let yaml = dump_value_str(&registry, &value).unwrap();
    assert_eq!(yaml, "seq: []\nmap: {}\n");
    assert_eq!(load_str(&registry, &yaml).unwrap(), value);
}

#[test]
fn quote_all_quotes_everything() {
    let registry = registry();
    let value = load_str(&registry, "a: word\n").unwrap();
    let opts = dump_options! { quote_all: true };
    let yaml = dump_value_str_with_options(&registry, &value, &opts).unwrap();
    assert_eq!(yaml, "\"a\": \"word\"\n");
}

#[test]
fn structurally_hazardous_strings_get_quoted() {
    let registry = registry();
    let mut mapping = yaml_tagged::Mapping::new();
    mapping.insert("tricky", Value::scalar("a: b"));
    mapping.insert("dash", Value::scalar("- item"));
    let value = Value::Mapping(mapping);

    let yaml = dump_value_str(&registry, &value).unwrap();
    assert_eq!(yaml, "tricky: \"a: b\"\ndash: \"- item\"\n");

    // Re-reading gives the same text back (as quoted scalars now).
    let back = load_str(&registry, &yaml).unwrap();
    assert_eq!(
        back.as_mapping().unwrap().get("tricky").unwrap().as_str(),
        Some("a: b")
    );
}

#[test]
fn complex_keys_use_explicit_form() {
    let registry = registry();
    let yaml = indoc! {"
        ? - a
          - b
        : both
    "};
    let value = load_str(&registry, yaml).unwrap();
    let dumped = dump_value_str(&registry, &value).unwrap();
    assert_eq!(load_str(&registry, &dumped).unwrap(), value);
    assert!(dumped.starts_with("?\n"), "unexpected: {dumped}");
}
