use indoc::indoc;
use serde::{Deserialize, Serialize};
use yaml_tagged::error::Location;
use yaml_tagged::{Error, TagRegistry, TaggedObject, load_str, to_mapping};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Robot {
    name: String,
}
yaml_tagged::tag_info!(Robot, namespace = "com.example");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Impostor {
    name: String,
}
// Claims the exact same suffix as Robot.
yaml_tagged::tag_info!(Impostor, suffix = "com.example.Robot");

/// Claims a whole suffix family through an overridden tag check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct AnyBot {
    name: String,
}

impl TaggedObject for AnyBot {
    fn tag_suffix() -> Option<std::borrow::Cow<'static, str>> {
        Some("com.example.bots.AnyBot".into())
    }

    fn is_tag_supported(suffix: &str) -> Result<bool, Error> {
        Ok(suffix.starts_with("com.example.bots."))
    }

    fn to_yaml(&self) -> Result<yaml_tagged::Mapping, Error> {
        to_mapping(self)
    }

    fn from_yaml_mapping(
        mapping: yaml_tagged::Mapping,
        _suffix: &str,
    ) -> Result<Self, Error> {
        yaml_tagged::from_value(yaml_tagged::Value::Mapping(mapping))
    }
}

/// A candidate whose tag check itself fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Fussy {
    name: String,
}

impl TaggedObject for Fussy {
    fn tag_suffix() -> Option<std::borrow::Cow<'static, str>> {
        Some("com.example.Fussy".into())
    }

    fn is_tag_supported(_suffix: &str) -> Result<bool, Error> {
        Err(Error::Message {
            msg: "fussy check blew up".into(),
            location: Location::UNKNOWN,
        })
    }

    fn to_yaml(&self) -> Result<yaml_tagged::Mapping, Error> {
        to_mapping(self)
    }

    fn from_yaml_mapping(
        mapping: yaml_tagged::Mapping,
        _suffix: &str,
    ) -> Result<Self, Error> {
        yaml_tagged::from_value(yaml_tagged::Value::Mapping(mapping))
    }
}

#[test]
fn exact_suffix_dispatch() {
    let mut registry = TagRegistry::new();
    registry.register::<Robot>().unwrap();

    let yaml = indoc! {"
        !tagged/com.example.Robot
        name: rusty
    "};
    let robot: Robot = load_str(&registry, yaml)
        .unwrap()
        .into_object()
        .unwrap();
    assert_eq!(robot.name, "rusty");
}

#[test]
fn duplicate_suffix_rejected_at_registration() {
    let mut registry = TagRegistry::new();
    registry.register::<Robot>().unwrap();

    let err = registry.register::<Impostor>().unwrap_err();
    assert!(matches!(err, Error::DuplicateTag { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("com.example.Robot"), "unexpected: {msg}");
    assert!(msg.contains("already registered"), "unexpected: {msg}");
    assert!(msg.contains("Robot") && msg.contains("Impostor"), "unexpected: {msg}");
}

#[test]
fn overridden_tag_check_claims_a_family() {
    let mut registry = TagRegistry::new();
    registry.register::<Robot>().unwrap();
    registry.register::<AnyBot>().unwrap();

    // Not the exact registered suffix; found through is_tag_supported.
    let yaml = indoc! {"
        !tagged/com.example.bots.T1000
        name: terminator
    "};
    let bot: AnyBot = load_str(&registry, yaml)
        .unwrap()
        .into_object()
        .unwrap();
    assert_eq!(bot.name, "terminator");
}

#[test]
fn no_handler_lists_candidates_and_captured_errors() {
    let mut registry = TagRegistry::new();
    registry.register::<Robot>().unwrap();
    registry.register::<Fussy>().unwrap();

    let yaml = indoc! {"
        !tagged/com.example.Missing
        name: nobody
    "};
    let err = load_str(&registry, yaml).unwrap_err();
    let msg = format!("{err}");
    assert!(
        msg.contains("No tag handler found able to decode `!tagged/com.example.Missing`"),
        "unexpected: {msg}"
    );
    assert!(msg.contains("Tried candidates"), "unexpected: {msg}");
    assert!(msg.contains("Robot"), "unexpected: {msg}");
    assert!(msg.contains("Caught errors"), "unexpected: {msg}");
    assert!(msg.contains("fussy check blew up"), "unexpected: {msg}");
}

#[test]
fn one_broken_candidate_does_not_hide_a_later_match() {
    let mut registry = TagRegistry::new();
    registry.register::<Fussy>().unwrap();
    registry.register::<AnyBot>().unwrap();

    let yaml = indoc! {"
        !tagged/com.example.bots.R2D2
        name: r2
    "};
    let bot: AnyBot = load_str(&registry, yaml)
        .unwrap()
        .into_object()
        .unwrap();
    assert_eq!(bot.name, "r2");
}

#[test]
fn empty_registry_dispatch() {
    let registry = TagRegistry::new();
    assert!(registry.is_empty());

    let err = load_str(&registry, "!tagged/com.example.Robot {}").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("The registry is empty"), "unexpected: {msg}");
}

#[test]
fn unclaimed_type_cannot_be_registered() {
    #[derive(Clone, Debug, PartialEq)]
    struct NoTag;
    impl TaggedObject for NoTag {
        fn to_yaml(&self) -> Result<yaml_tagged::Mapping, Error> {
            Ok(yaml_tagged::Mapping::new())
        }
        fn from_yaml_mapping(
            _mapping: yaml_tagged::Mapping,
            _suffix: &str,
        ) -> Result<Self, Error> {
            Ok(NoTag)
        }
    }

    let mut registry = TagRegistry::new();
    let err = registry.register::<NoTag>().unwrap_err();
    assert!(matches!(err, Error::UnclaimedTag { .. }));
    assert!(format!("{err}").contains("has no tag suffix"));
}

#[test]
fn malformed_suffix_rejected() {
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Bang;
    yaml_tagged::tag_info!(Bang, suffix = "!already.prefixed");

    let mut registry = TagRegistry::new();
    let err = registry.register::<Bang>().unwrap_err();
    assert!(matches!(err, Error::Declaration { .. }));
    assert!(format!("{err}").contains("must not start with `!`"));
}

#[test]
fn registration_order_is_observable() {
    let mut registry = TagRegistry::new();
    registry.register::<Robot>().unwrap();
    registry.register::<AnyBot>().unwrap();
    let suffixes: Vec<_> = registry.suffixes().collect();
    assert_eq!(suffixes, ["com.example.Robot", "com.example.bots.AnyBot"]);
}
