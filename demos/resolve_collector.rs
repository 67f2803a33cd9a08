// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolving a collector configuration.
//!
//! This example demonstrates:
//! - Registering component factories per kind
//! - Resolving a YAML file (or a built-in document) with variable expansion
//! - Reading a typed component configuration back out
//! - Printing a validation report for a broken document
//!
//! To run this example:
//! ```bash
//! export BATCH_TIMEOUT="500ms"
//! cargo run --example resolve_collector -- path/to/config.yaml
//! ```

use colcfg::components::{BatchProcessorFactory, BatcherConfig, NopFactory};
use colcfg::prelude::*;

const SAMPLE: &str = r#"
receivers:
  nop:
processors:
  batch:
    flush_timeout: ${BATCH_TIMEOUT}
  batch/large:
    min_size_items: 20001
    max_size_items: 20000
exporters:
  nop:
service:
  pipelines:
    traces:
      receivers: [nop]
      processors: [batch]
      exporters: [nop]
"#;

fn factories() -> Result<Factories> {
    Factories::builder()
        .receiver(NopFactory)
        .processor(BatchProcessorFactory)
        .exporter(NopFactory)
        .extension(NopFactory)
        .build()
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Collector Configuration Resolution ===\n");

    let mut builder = ConfigResolver::builder();
    match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading {}", path);
            builder = builder.with_yaml_file(path)?;
        }
        None => {
            println!("No file given, using the built-in sample document");
            if std::env::var("BATCH_TIMEOUT").is_err() {
                std::env::set_var("BATCH_TIMEOUT", "1s");
            }
            builder = builder.with_source(Box::new(Conf::from_yaml(SAMPLE)?));
        }
    }

    let resolver = builder
        .with_env_expansion()
        .with_factories(factories()?)
        .build()?;

    match resolver.resolve() {
        Ok(settings) => {
            println!("\n✓ Configuration is valid");
            for kind in Kind::ALL {
                let ids: Vec<String> = settings.configs(kind).ids().map(ToString::to_string).collect();
                println!("  {:<10} {}", kind.section(), ids.join(", "));
            }
            if let Some(batch) = settings
                .processors
                .get_as::<BatcherConfig>(&ComponentID::new("batch"))
            {
                println!("\n  batch flushes every {:?}", batch.flush_timeout);
            }
        }
        Err(ConfigError::Validation(report)) => {
            println!("\n✗ {}", report);
        }
        Err(e) => return Err(e),
    }

    Ok(())
}
