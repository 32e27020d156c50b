use serde::{Deserialize, Serialize};

/// The SDK configuration reported by a mobile SDK.
///
/// Every field is optional. A partial snapshot describes only the options known at the time it
/// is sent, for instance during lazy initialization of the SDK.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigurationTelemetry {
    /// The maximum size of a batch, in bytes or events depending on the platform.
    pub batch_size: Option<i64>,
    /// How often batches are uploaded, in milliseconds.
    pub batch_upload_frequency: Option<i64>,
    /// The Dart version when running in a Flutter application.
    pub dart_version: Option<String>,
    /// The period between mobile vitals updates, in milliseconds.
    pub mobile_vitals_update_period: Option<i64>,
    /// The percentage of sessions tracked.
    pub session_sample_rate: Option<i64>,
    /// The percentage of telemetry events sent.
    pub telemetry_sample_rate: Option<i64>,
    /// The percentage of traced requests.
    pub trace_sample_rate: Option<i64>,
    /// Whether events are tracked while the application is in background.
    pub track_background_events: Option<bool>,
    /// Whether long tasks reported by cross-platform frameworks are tracked.
    pub track_cross_platform_long_tasks: Option<bool>,
    /// Whether errors are tracked.
    pub track_errors: Option<bool>,
    /// Whether Flutter performance metrics are tracked.
    pub track_flutter_performance: Option<bool>,
    /// Whether frustration signals are tracked.
    pub track_frustrations: Option<bool>,
    /// Whether user interactions are tracked.
    pub track_interactions: Option<bool>,
    /// Whether long tasks are tracked.
    pub track_long_task: Option<bool>,
    /// Whether native long tasks are tracked.
    pub track_native_long_tasks: Option<bool>,
    /// Whether native views are tracked.
    pub track_native_views: Option<bool>,
    /// Whether network requests are tracked as resources.
    pub track_network_requests: Option<bool>,
    /// Whether views are tracked manually.
    pub track_views_manually: Option<bool>,
    /// Whether first party hosts are configured.
    pub use_first_party_hosts: Option<bool>,
    /// Whether data is encrypted on disk.
    pub use_local_encryption: Option<bool>,
    /// Whether a proxy is configured for uploads.
    pub use_proxy: Option<bool>,
    /// Whether tracing is enabled.
    pub use_tracing: Option<bool>,
}

/// Selection of forwarded log sources, either a keyword such as `all` or an explicit list.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForwardOption {
    /// A keyword covering a group of sources.
    Keyword(String),
    /// An explicit list of sources.
    List(Vec<String>),
}

/// The configuration block of a configuration event.
///
/// Covers the options of every SDK flavor. Options a particular SDK does not have stay absent
/// and are omitted from the payload.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// The attribute used to name actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_name_attribute: Option<String>,
    /// The maximum size of a batch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    /// How often batches are uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_upload_frequency: Option<i64>,
    /// The Dart version in Flutter applications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dart_version: Option<String>,
    /// The default session replay privacy level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_privacy_level: Option<String>,
    /// The console APIs forwarded to logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_console_logs: Option<ForwardOption>,
    /// Whether errors are forwarded to logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_errors_to_logs: Option<bool>,
    /// The report types forwarded to logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forward_reports: Option<ForwardOption>,
    /// How the SDK was initialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialization_type: Option<String>,
    /// The period between mobile vitals updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_vitals_update_period: Option<i64>,
    /// The percentage of sessions with premium features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium_sample_rate: Option<i64>,
    /// The React Native version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub react_native_version: Option<String>,
    /// The React version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub react_version: Option<String>,
    /// The percentage of sessions with replay, legacy option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replay_sample_rate: Option<i64>,
    /// The propagators used for distributed tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_tracing_propagators: Option<Vec<String>>,
    /// The percentage of sessions with replay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_replay_sample_rate: Option<i64>,
    /// The percentage of sessions tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_sample_rate: Option<i64>,
    /// Whether repeated initialization is silenced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent_multiple_init: Option<bool>,
    /// The percentage of configuration telemetry sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry_configuration_sample_rate: Option<i64>,
    /// The percentage of telemetry events sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telemetry_sample_rate: Option<i64>,
    /// The percentage of traced requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_sample_rate: Option<i64>,
    /// Whether events are tracked in background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_background_events: Option<bool>,
    /// Whether cross-platform long tasks are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_cross_platform_long_tasks: Option<bool>,
    /// Whether errors are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_errors: Option<bool>,
    /// Whether Flutter performance metrics are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_flutter_performance: Option<bool>,
    /// Whether frustration signals are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_frustrations: Option<bool>,
    /// Whether user interactions are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_interactions: Option<bool>,
    /// Whether long tasks are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_long_task: Option<bool>,
    /// Whether native errors are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_native_errors: Option<bool>,
    /// Whether native long tasks are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_native_long_tasks: Option<bool>,
    /// Whether native views are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_native_views: Option<bool>,
    /// Whether network requests are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_network_requests: Option<bool>,
    /// Whether resources are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_resources: Option<bool>,
    /// Whether sessions are tracked across subdomains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_session_across_subdomains: Option<bool>,
    /// Whether views are tracked manually.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_views_manually: Option<bool>,
    /// Whether allowed tracing origins are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_allowed_tracing_origins: Option<bool>,
    /// Whether allowed tracing URLs are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_allowed_tracing_urls: Option<bool>,
    /// Whether a `beforeSend` callback is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_before_send: Option<bool>,
    /// Whether a cross-site session cookie is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_cross_site_session_cookie: Option<bool>,
    /// Whether excluded activity URLs are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_excluded_activity_urls: Option<bool>,
    /// Whether first party hosts are configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_first_party_hosts: Option<bool>,
    /// Whether data is encrypted on disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_local_encryption: Option<bool>,
    /// Whether a proxy is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_proxy: Option<bool>,
    /// Whether a secure session cookie is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_secure_session_cookie: Option<bool>,
    /// Whether tracing is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_tracing: Option<bool>,
    /// The strategy used to track views automatically.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_tracking_strategy: Option<String>,
}

impl From<ConfigurationTelemetry> for Configuration {
    fn from(configuration: ConfigurationTelemetry) -> Self {
        Self {
            batch_size: configuration.batch_size,
            batch_upload_frequency: configuration.batch_upload_frequency,
            dart_version: configuration.dart_version,
            mobile_vitals_update_period: configuration.mobile_vitals_update_period,
            session_sample_rate: configuration.session_sample_rate,
            telemetry_sample_rate: configuration.telemetry_sample_rate,
            trace_sample_rate: configuration.trace_sample_rate,
            track_background_events: configuration.track_background_events,
            track_cross_platform_long_tasks: configuration.track_cross_platform_long_tasks,
            track_errors: configuration.track_errors,
            track_flutter_performance: configuration.track_flutter_performance,
            track_frustrations: configuration.track_frustrations,
            track_interactions: configuration.track_interactions,
            track_long_task: configuration.track_long_task,
            track_native_long_tasks: configuration.track_native_long_tasks,
            track_native_views: configuration.track_native_views,
            track_network_requests: configuration.track_network_requests,
            track_views_manually: configuration.track_views_manually,
            use_first_party_hosts: configuration.use_first_party_hosts,
            use_local_encryption: configuration.use_local_encryption,
            use_proxy: configuration.use_proxy,
            use_tracing: configuration.use_tracing,
            ..Default::default()
        }
    }
}
