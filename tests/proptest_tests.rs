// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check identifier parsing and validation aggregation over
//! arbitrary inputs.

use colcfg::components::{BatchProcessorFactory, BatcherConfig, NopFactory};
use colcfg::domain::{ComponentID, Conf, ConfigError, Kind};
use colcfg::settings::{Configs, Factories, FactoryMap, Settings};
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::sync::Arc;

// Test that "type" parses to a type with an empty name
proptest! {
    #[test]
    fn test_parse_type_only(t in "[a-z][a-z0-9_]{0,15}") {
        let id = ComponentID::parse(&t).unwrap();
        prop_assert_eq!(id.component_type(), t.as_str());
        prop_assert_eq!(id.name(), "");
        prop_assert_eq!(id.to_string(), t);
    }
}

// Test that "type/name" recovers both parts
proptest! {
    #[test]
    fn test_parse_type_and_name(t in "[a-z][a-z0-9_]{0,15}", n in "[a-zA-Z0-9_.-]{1,20}") {
        let raw = format!("{}/{}", t, n);
        let id = ComponentID::parse(&raw).unwrap();
        prop_assert_eq!(id.component_type(), t.as_str());
        prop_assert_eq!(id.name(), n.as_str());
        prop_assert_eq!(id.to_string(), raw);
    }
}

// Test that only the first separator splits
proptest! {
    #[test]
    fn test_parse_only_first_separator_splits(
        t in "[a-z][a-z0-9_]{0,15}",
        parts in prop::collection::vec("[a-z0-9]{1,8}", 2..5)
    ) {
        let name = parts.join("/");
        let raw = format!("{}/{}", t, name);
        let id = ComponentID::parse(&raw).unwrap();
        prop_assert_eq!(id.component_type(), t.as_str());
        prop_assert_eq!(id.name(), name.as_str());
    }
}

// Test that parsing never panics and a parsed id always has a type
proptest! {
    #[test]
    fn test_parse_arbitrary_strings(s in "\\PC*") {
        match ComponentID::parse(&s) {
            Ok(id) => prop_assert!(!id.component_type().is_empty()),
            Err(e) => {
                let is_invalid_identifier = matches!(e, ConfigError::InvalidIdentifier { .. });
                prop_assert!(is_invalid_identifier);
            }
        }
    }
}

// Test that an unregistered type is always reported with its exact name and kind
proptest! {
    #[test]
    fn test_unknown_type_is_named(
        kind_index in 0usize..5,
        t in "[a-z][a-z0-9_]{0,12}",
        n in prop::option::of("[a-z0-9]{1,6}")
    ) {
        prop_assume!(t != "nop");
        let kind = Kind::ALL[kind_index];
        let key = match &n {
            Some(n) => format!("{}/{}", t, n),
            None => t.clone(),
        };
        let mut section = Mapping::new();
        section.insert(Value::from(key.as_str()), Value::Null);
        let mut doc = Conf::new();
        doc.insert(kind.section(), Value::Mapping(section));

        let factories = Factories::builder()
            .receiver(NopFactory)
            .processor(NopFactory)
            .exporter(NopFactory)
            .connector(NopFactory)
            .extension(NopFactory)
            .build()
            .unwrap();

        match Settings::resolve(&doc, &factories).unwrap_err().root() {
            ConfigError::UnknownComponentType { kind: k, component_type, id, .. } => {
                prop_assert_eq!(*k, kind);
                prop_assert_eq!(component_type, &t);
                prop_assert_eq!(id, &key);
            }
            other => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }
}

// Test that exactly the K invalid components out of N are reported
proptest! {
    #[test]
    fn test_validation_reports_exactly_the_failures(
        flags in prop::collection::vec(any::<bool>(), 1..20)
    ) {
        let mut section = Mapping::new();
        let mut failing = BTreeSet::new();
        for (i, fails) in flags.iter().enumerate() {
            let id = ComponentID::with_name("batch", i.to_string());
            let body = if *fails {
                failing.insert(id.clone());
                serde_yaml::from_str("min_size_items: -1").unwrap()
            } else {
                Value::Null
            };
            section.insert(Value::from(id.to_string()), body);
        }

        let mut map = FactoryMap::new(Kind::Processor);
        map.register(Arc::new(BatchProcessorFactory)).unwrap();
        let configs = Configs::resolve(Kind::Processor, Some(&Value::Mapping(section)), &map).unwrap();
        prop_assert_eq!(configs.len(), flags.len());

        let reported: BTreeSet<ComponentID> = configs.validate().into_iter().map(|(id, _)| id).collect();
        prop_assert_eq!(&reported, &failing);

        for id in configs.ids() {
            let cfg = configs.get_as::<BatcherConfig>(id).unwrap();
            prop_assert_eq!(cfg.min_size_items < 0, failing.contains(id));
        }
    }
}

// Test that any non-negative override of one field keeps the others at default
proptest! {
    #[test]
    fn test_batch_override_keeps_defaults(max in 0i64..1_000_000) {
        let mut map = FactoryMap::new(Kind::Processor);
        map.register(Arc::new(BatchProcessorFactory)).unwrap();
        let raw: Value = serde_yaml::from_str(&format!("batch:\n  max_size_items: {}\n", max)).unwrap();
        let configs = Configs::resolve(Kind::Processor, Some(&raw), &map).unwrap();
        let cfg = configs.get_as::<BatcherConfig>(&ComponentID::new("batch")).unwrap();
        let default = BatcherConfig::default();

        prop_assert_eq!(cfg.max_size_items, max);
        prop_assert_eq!(cfg.min_size_items, default.min_size_items);
        prop_assert_eq!(cfg.flush_timeout, default.flush_timeout);
        prop_assert_eq!(cfg.enabled, default.enabled);
    }
}
