// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared factories and helpers for integration tests.
//!
//! The factories model a small but realistic component set: an OTLP receiver
//! and exporter, a debug exporter, a forwarding connector and a health check
//! extension, plus the built-in batch processor.

use colcfg::components::{BatchProcessorFactory, NopFactory};
use colcfg::domain::{Conf, ValidationError};
use colcfg::ports::{ComponentConfig, Factory};
use colcfg::settings::Factories;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

static TRACING: OnceLock<()> = OnceLock::new();

/// Installs a test subscriber once per test binary.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Parses a YAML document, panicking on malformed test input.
#[allow(dead_code)]
pub fn conf(yaml: &str) -> Conf {
    Conf::from_yaml(yaml).expect("test document must parse")
}

/// Registries holding every test factory.
#[allow(dead_code)]
pub fn factories() -> Factories {
    Factories::builder()
        .receiver(OtlpReceiverFactory)
        .processor(BatchProcessorFactory)
        .exporter(OtlpExporterFactory)
        .exporter(DebugExporterFactory)
        .connector(ForwardConnectorFactory)
        .extension(HealthCheckFactory)
        .extension(NopFactory)
        .build()
        .expect("test factories are unique")
}

/// A document that resolves and validates cleanly with [`factories`].
#[allow(dead_code)]
pub const VALID_CONFIG: &str = r#"
receivers:
  otlp:
    protocols:
      grpc:
        endpoint: 0.0.0.0:4317
processors:
  batch:
exporters:
  otlp:
    endpoint: collector.example.com:4317
  debug:
    verbosity: detailed
extensions:
  health_check:
service:
  extensions: [health_check]
  pipelines:
    traces:
      receivers: [otlp]
      processors: [batch]
      exporters: [otlp, debug]
"#;

/// One protocol endpoint of the OTLP receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    /// Listen address.
    pub endpoint: String,
}

/// Configuration of the `otlp` receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtlpReceiverConfig {
    /// Enabled protocols by name.
    pub protocols: BTreeMap<String, ProtocolConfig>,
}

impl ComponentConfig for OtlpReceiverConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        for (name, protocol) in &self.protocols {
            if protocol.endpoint.is_empty() {
                return Err(ValidationError::field(
                    format!("protocols::{}::endpoint", name),
                    "must be specified",
                ));
            }
        }
        Ok(())
    }
}

/// Factory for the `otlp` receiver.
pub struct OtlpReceiverFactory;

impl Factory for OtlpReceiverFactory {
    type Config = OtlpReceiverConfig;

    fn component_type(&self) -> &str {
        "otlp"
    }

    fn create_default_config(&self) -> OtlpReceiverConfig {
        let mut protocols = BTreeMap::new();
        protocols.insert(
            "grpc".to_string(),
            ProtocolConfig {
                endpoint: "localhost:4317".to_string(),
            },
        );
        protocols.insert(
            "http".to_string(),
            ProtocolConfig {
                endpoint: "localhost:4318".to_string(),
            },
        );
        OtlpReceiverConfig { protocols }
    }
}

/// Retry policy of the `otlp` exporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Whether failed sends are retried.
    pub enabled: bool,
    /// Maximum number of attempts.
    pub max_attempts: u32,
}

/// Configuration of the `otlp` exporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtlpExporterConfig {
    /// Destination address; required.
    pub endpoint: String,
    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Extra request headers.
    pub headers: BTreeMap<String, String>,
    /// Retry policy.
    pub retry: RetryConfig,
}

impl ComponentConfig for OtlpExporterConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.endpoint.is_empty() {
            return Err(ValidationError::field("endpoint", "must be specified"));
        }
        Ok(())
    }
}

/// Factory for the `otlp` exporter.
pub struct OtlpExporterFactory;

impl Factory for OtlpExporterFactory {
    type Config = OtlpExporterConfig;

    fn component_type(&self) -> &str {
        "otlp"
    }

    fn create_default_config(&self) -> OtlpExporterConfig {
        let mut headers = BTreeMap::new();
        headers.insert("user-agent".to_string(), "colcfg-test".to_string());
        OtlpExporterConfig {
            endpoint: String::new(),
            timeout: Duration::from_secs(5),
            headers,
            retry: RetryConfig {
                enabled: true,
                max_attempts: 3,
            },
        }
    }
}

/// Configuration of the `debug` exporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebugExporterConfig {
    /// One of `basic`, `normal`, `detailed`.
    pub verbosity: String,
}

impl ComponentConfig for DebugExporterConfig {}

/// Factory for the `debug` exporter.
pub struct DebugExporterFactory;

impl Factory for DebugExporterFactory {
    type Config = DebugExporterConfig;

    fn component_type(&self) -> &str {
        "debug"
    }

    fn create_default_config(&self) -> DebugExporterConfig {
        DebugExporterConfig {
            verbosity: "basic".to_string(),
        }
    }
}

/// Configuration of the `forward` connector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardConnectorConfig {}

impl ComponentConfig for ForwardConnectorConfig {}

/// Factory for the `forward` connector.
pub struct ForwardConnectorFactory;

impl Factory for ForwardConnectorFactory {
    type Config = ForwardConnectorConfig;

    fn component_type(&self) -> &str {
        "forward"
    }

    fn create_default_config(&self) -> ForwardConnectorConfig {
        ForwardConnectorConfig {}
    }
}

/// Configuration of the `health_check` extension.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheckConfig {
    /// Listen address.
    pub endpoint: String,
    /// Path served.
    pub path: String,
}

impl ComponentConfig for HealthCheckConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.path.starts_with('/') {
            return Err(ValidationError::field("path", "must start with /"));
        }
        Ok(())
    }
}

/// Factory for the `health_check` extension.
pub struct HealthCheckFactory;

impl Factory for HealthCheckFactory {
    type Config = HealthCheckConfig;

    fn component_type(&self) -> &str {
        "health_check"
    }

    fn create_default_config(&self) -> HealthCheckConfig {
        HealthCheckConfig {
            endpoint: "localhost:13133".to_string(),
            path: "/".to_string(),
        }
    }
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
