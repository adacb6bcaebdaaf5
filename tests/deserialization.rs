use serde::Deserialize;

#[test]
fn deserialize_flat_struct() {
    #[derive(PartialEq, Debug, Deserialize)]
    struct Sample {
        pub value: i32,
        pub name: String,
        pub enabled: bool,
    }

    let sample: Sample = hoconfig::from_str(r#"{ value: 123, name: some-service, enabled: on }"#)
        .expect("must deserialize the document");

    assert_eq!(
        sample,
        Sample {
            value: 123,
            name: "some-service".to_string(),
            enabled: true,
        }
    );
}

#[test]
fn deserialize_nested_structures() {
    #[derive(PartialEq, Debug, Deserialize)]
    struct Server {
        pub host: String,
        pub port: u16,
    }

    #[derive(PartialEq, Debug, Deserialize)]
    struct Settings {
        pub server: Server,
        pub tags: Vec<String>,
        pub weights: Vec<f64>,
    }

    let doc = r#"
    server {
      host = localhost
      port = 8080
    }
    tags = [a, b]
    weights = [0.5, 1.5]
    "#;
    let settings: Settings = hoconfig::from_str(doc).expect("must deserialize the document");

    assert_eq!(settings.server, Server { host: "localhost".to_string(), port: 8080 });
    assert_eq!(settings.tags, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(settings.weights, vec![0.5, 1.5]);
}

#[test]
fn deserialize_default_missing_fields() {
    #[derive(PartialEq, Debug, Deserialize)]
    struct Sample {
        #[serde(default = "value_default")]
        pub value: i32,
    }

    fn value_default() -> i32 {
        321
    }

    let sample: Sample = hoconfig::from_str(r#"{}"#).expect("must deserialize the document");

    assert_eq!(sample, Sample { value: value_default() });
}

#[test]
fn deserialize_missing_as_none() {
    #[derive(PartialEq, Debug, Deserialize)]
    struct Sample {
        #[serde(default)]
        pub value: Option<i32>,
    }

    let sample: Sample = hoconfig::from_str(r#"{}"#).expect("must deserialize the document");

    assert_eq!(sample, Sample { value: None });
}

#[test]
fn deserialize_unit_enum_variants() {
    #[derive(PartialEq, Debug, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Mode {
        Fast,
        Safe,
    }

    #[derive(PartialEq, Debug, Deserialize)]
    struct Sample {
        pub mode: Mode,
    }

    let sample: Sample = hoconfig::from_str("mode = safe").expect("must deserialize the document");
    assert_eq!(sample, Sample { mode: Mode::Safe });
}

#[test]
fn deserialize_maps() {
    use std::collections::HashMap;

    #[derive(PartialEq, Debug, Deserialize)]
    struct Sample {
        pub limits: HashMap<String, i64>,
    }

    let sample: Sample = hoconfig::from_str("limits { low = 1, high = 100 }").expect("must deserialize the document");
    assert_eq!(sample.limits.get("low"), Some(&1));
    assert_eq!(sample.limits.get("high"), Some(&100));
}

#[test]
fn deserialize_from_layered_config() {
    #[derive(PartialEq, Debug, Deserialize)]
    struct Sample {
        pub a: i32,
        pub b: i32,
    }

    let primary = hoconfig::parse_string("a = 1").unwrap();
    let fallback = hoconfig::parse_string("a = 10\nb = 20").unwrap();
    let layered = primary.with_fallback(&fallback).unwrap();

    let sample: Sample = hoconfig::from_config(&layered).expect("must deserialize the layered config");
    assert_eq!(sample, Sample { a: 1, b: 20 });
}

#[test]
fn type_mismatches_fail() {
    #[derive(Debug, Deserialize)]
    struct Sample {
        #[allow(dead_code)]
        pub value: i32,
    }

    let result: Result<Sample, _> = hoconfig::from_str("value = not-a-number");
    assert!(result.is_err());
}
