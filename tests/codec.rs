use std::borrow::Cow;

use indoc::indoc;
use yaml_tagged::{
    AnyObject, Error, KnownType, Mapping, Object, TagCodec, TagRegistry, Value, dump_str,
    from_value, load_str,
};

#[derive(Clone, Debug, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Clone, Debug, PartialEq)]
struct Size {
    w: i64,
    h: i64,
}

/// One codec fronting both geometry types under the `!geom/` prefix.
struct GeomCodec;

impl TagCodec for GeomCodec {
    fn tag_prefix(&self) -> Cow<'static, str> {
        // Left unnormalized on purpose; the registry adds `!` and `/`.
        "geom".into()
    }

    fn known_types(&self) -> Vec<KnownType> {
        vec![KnownType::of::<Point>(), KnownType::of::<Size>()]
    }

    fn is_tag_supported(&self, suffix: &str) -> bool {
        matches!(suffix, "Point" | "Size")
    }

    fn represent(&self, obj: &dyn AnyObject) -> Result<(String, Mapping), Error> {
        if let Some(p) = obj.as_any().downcast_ref::<Point>() {
            let mut m = Mapping::new();
            m.insert("x", p.x);
            m.insert("y", p.y);
            Ok(("Point".to_owned(), m))
        } else if let Some(s) = obj.as_any().downcast_ref::<Size>() {
            let mut m = Mapping::new();
            m.insert("w", s.w);
            m.insert("h", s.h);
            Ok(("Size".to_owned(), m))
        } else {
            unreachable!("registered for Point and Size only")
        }
    }

    fn from_yaml_mapping(&self, suffix: &str, mut mapping: Mapping) -> Result<Object, Error> {
        let mut take = |key: &str| -> Result<i64, Error> {
            let value = mapping
                .remove(key)
                .unwrap_or(Value::Scalar(yaml_tagged::Scalar::plain("0")));
            from_value(value)
        };
        match suffix {
            "Point" => {
                let (x, y) = (take("x")?, take("y")?);
                Ok(Object::new(Point { x, y }))
            }
            "Size" => {
                let (w, h) = (take("w")?, take("h")?);
                Ok(Object::new(Size { w, h }))
            }
            other => unreachable!("is_tag_supported filtered out `{other}`"),
        }
    }
}

fn registry() -> TagRegistry {
    let mut registry = TagRegistry::new();
    registry.register_codec(GeomCodec).unwrap();
    registry
}

#[test]
fn codec_prefix_is_normalized() {
    let registry = registry();
    let prefixes: Vec<_> = registry.codec_prefixes().collect();
    assert_eq!(prefixes, ["!geom/"]);
}

#[test]
fn codec_decodes_each_known_type() {
    let registry = registry();
    let yaml = indoc! {"
        corner: !geom/Point
          x: 3
          y: 4
        extent: !geom/Size
          w: 10
          h: 20
    "};
    let value = load_str(&registry, yaml).unwrap();
    let mapping = value.as_mapping().unwrap();

    let corner = mapping.get("corner").unwrap().as_object().unwrap();
    assert_eq!(corner.downcast_ref::<Point>(), Some(&Point { x: 3, y: 4 }));

    let extent = mapping.get("extent").unwrap().as_object().unwrap();
    assert_eq!(extent.downcast_ref::<Size>(), Some(&Size { w: 10, h: 20 }));
}

#[test]
fn codec_encodes_by_runtime_type() {
    let registry = registry();
    let yaml = dump_str(&registry, &Point { x: 1, y: 2 }).unwrap();
    // "y" is a YAML 1.1 boolean spelling, so the string key keeps its
    // quotes; emitted plain it would read back as a boolean lookalike.
    assert_eq!(yaml, "!geom/Point\nx: 1\n\"y\": 2\n");

    let yaml = dump_str(&registry, &Size { w: 5, h: 6 }).unwrap();
    assert!(yaml.starts_with("!geom/Size\n"));
}

#[test]
fn codec_round_trip() {
    let registry = registry();
    let yaml = dump_str(&registry, &Point { x: -7, y: 0 }).unwrap();
    let back: Point = load_str(&registry, &yaml).unwrap().into_object().unwrap();
    assert_eq!(back, Point { x: -7, y: 0 });
}

#[test]
fn unknown_suffix_under_registered_prefix() {
    let registry = registry();
    let err = load_str(&registry, "!geom/Line\na: 1\n").unwrap_err();
    let msg = format!("{err}");
    assert!(
        msg.contains("No tag handler found able to decode `!geom/Line`"),
        "unexpected: {msg}"
    );
}

#[test]
fn scalar_shape_not_supported_by_default() {
    let registry = registry();
    let err = load_str(&registry, "!geom/Point 3,4\n").unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("not supported"), "unexpected: {msg}");
    assert!(msg.contains("scalar"), "unexpected: {msg}");
}

#[test]
fn encoding_an_unknown_type_fails() {
    #[derive(Clone, Debug, PartialEq)]
    struct Alien;

    let registry = registry();
    let err = dump_str(&registry, &Alien).unwrap_err();
    assert!(matches!(err, Error::NoRepresenter { .. }));
    assert!(format!("{err}").contains("Alien"));
}

#[test]
fn codec_returning_a_foreign_suffix_is_malformed() {
    struct Broken;
    impl TagCodec for Broken {
        fn tag_prefix(&self) -> Cow<'static, str> {
            "!broken/".into()
        }
        fn known_types(&self) -> Vec<KnownType> {
            vec![KnownType::of::<Point>()]
        }
        fn is_tag_supported(&self, suffix: &str) -> bool {
            suffix == "Good"
        }
        fn represent(&self, _obj: &dyn AnyObject) -> Result<(String, Mapping), Error> {
            Ok(("Evil".to_owned(), Mapping::new()))
        }
        fn from_yaml_mapping(&self, _suffix: &str, _mapping: Mapping) -> Result<Object, Error> {
            Ok(Object::new(Point { x: 0, y: 0 }))
        }
    }

    let mut registry = TagRegistry::new();
    registry.register_codec(Broken).unwrap();
    let err = dump_str(&registry, &Point { x: 1, y: 1 }).unwrap_err();
    assert!(matches!(err, Error::MalformedCodecOutput { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("Evil"), "unexpected: {msg}");
}

#[test]
fn later_codec_registration_wins() {
    struct Flipped;
    impl TagCodec for Flipped {
        fn tag_prefix(&self) -> Cow<'static, str> {
            "geom".into()
        }
        fn known_types(&self) -> Vec<KnownType> {
            vec![KnownType::of::<Point>()]
        }
        fn is_tag_supported(&self, suffix: &str) -> bool {
            suffix == "Point"
        }
        fn represent(&self, obj: &dyn AnyObject) -> Result<(String, Mapping), Error> {
            let p = obj.as_any().downcast_ref::<Point>().unwrap();
            let mut m = Mapping::new();
            m.insert("x", p.y);
            m.insert("y", p.x);
            Ok(("Point".to_owned(), m))
        }
        fn from_yaml_mapping(&self, _suffix: &str, _mapping: Mapping) -> Result<Object, Error> {
            Ok(Object::new(Point { x: 0, y: 0 }))
        }
    }

    let mut registry = registry();
    registry.register_codec(Flipped).unwrap();
    let yaml = dump_str(&registry, &Point { x: 1, y: 2 }).unwrap();
    assert_eq!(yaml, "!geom/Point\nx: 2\n\"y\": 1\n");
}

#[test]
fn codec_prefix_under_the_object_namespace_rejected() {
    struct Nested;
    impl TagCodec for Nested {
        fn tag_prefix(&self) -> Cow<'static, str> {
            "!tagged/geo/".into()
        }
        fn known_types(&self) -> Vec<KnownType> {
            vec![KnownType::of::<Point>()]
        }
        fn is_tag_supported(&self, suffix: &str) -> bool {
            suffix == "Geo"
        }
        fn represent(&self, _obj: &dyn AnyObject) -> Result<(String, Mapping), Error> {
            Ok(("Geo".to_owned(), Mapping::new()))
        }
        fn from_yaml_mapping(&self, _suffix: &str, _mapping: Mapping) -> Result<Object, Error> {
            Ok(Object::new(Point { x: 0, y: 0 }))
        }
    }

    // Tags emitted under such a prefix would be routed to object dispatch
    // on reload, so the registration itself is refused.
    let mut registry = TagRegistry::new();
    let err = registry.register_codec(Nested).unwrap_err();
    assert!(matches!(err, Error::Declaration { .. }));
    assert!(format!("{err}").contains("reserved"));
}

#[test]
fn empty_codec_prefix_rejected() {
    struct NoPrefix;
    impl TagCodec for NoPrefix {
        fn tag_prefix(&self) -> Cow<'static, str> {
            "".into()
        }
        fn known_types(&self) -> Vec<KnownType> {
            Vec::new()
        }
        fn is_tag_supported(&self, _suffix: &str) -> bool {
            false
        }
        fn represent(&self, _obj: &dyn AnyObject) -> Result<(String, Mapping), Error> {
            Err(Error::NoRepresenter {
                type_name: "nothing".into(),
            })
        }
        fn from_yaml_mapping(&self, _suffix: &str, _mapping: Mapping) -> Result<Object, Error> {
            Err(Error::NoRepresenter {
                type_name: "nothing".into(),
            })
        }
    }

    let mut registry = TagRegistry::new();
    let err = registry.register_codec(NoPrefix).unwrap_err();
    assert!(matches!(err, Error::Declaration { .. }));
}
