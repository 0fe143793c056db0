use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    demo: Demo,
    narration: Narration,
    routes: Routes,
    api: Option<Api>,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn demo(&self) -> &Demo {
        &self.demo
    }

    pub fn narration(&self) -> &Narration {
        &self.narration
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn api(&self) -> Option<&Api> {
        self.api.as_ref()
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    event_buffer_size: usize,
    camera_buffer_size: usize,
}

impl Core {
    pub fn event_buffer_size(&self) -> usize {
        self.event_buffer_size
    }

    pub fn camera_buffer_size(&self) -> usize {
        self.camera_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Demo {
    route: String,
    presentation_zoom: f64,
    skip_transitions: bool,
    #[serde(with = "humantime_serde")]
    skip_transition_delay: Duration,
    #[serde(with = "humantime_serde")]
    waypoint_dwell: Duration,
}

impl Demo {
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn presentation_zoom(&self) -> f64 {
        self.presentation_zoom
    }

    pub fn skip_transitions(&self) -> bool {
        self.skip_transitions
    }

    pub fn skip_transition_delay(&self) -> Duration {
        self.skip_transition_delay
    }

    pub fn waypoint_dwell(&self) -> Duration {
        self.waypoint_dwell
    }
}

/// The rescale constants were tuned against one narration-generation pipeline
/// and must be revalidated per narration source, hence configuration.
#[derive(Debug, Deserialize)]
pub struct Narration {
    enabled: bool,
    trailing_silence_secs: f64,
    min_duration_factor: f64,
}

impl Narration {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn trailing_silence_secs(&self) -> f64 {
        self.trailing_silence_secs
    }

    pub fn min_duration_factor(&self) -> f64 {
        self.min_duration_factor
    }
}

#[derive(Debug, Deserialize)]
pub struct Routes {
    directory: String,
}

impl Routes {
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

#[derive(Debug, Deserialize)]
pub struct Api {
    url: String,
    retry_ms: u64,
    retry_max_delay_ms: u64,
    request_timeout_ms: u64,
}

impl Api {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn retry_max_delay_ms(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }

    pub fn request_timeout_ms(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    event_buffer_size: 8,
                    camera_buffer_size: 8,
                },
                demo: Demo {
                    route: "coastal_tour".to_string(),
                    presentation_zoom: 13.0,
                    skip_transitions: false,
                    skip_transition_delay: Duration::from_millis(250),
                    waypoint_dwell: Duration::from_secs(6),
                },
                narration: Narration {
                    enabled: true,
                    trailing_silence_secs: 0.8,
                    min_duration_factor: 1.0,
                },
                routes: Routes {
                    directory: "routes".to_string(),
                },
                api: None,
            },
        }
    }

    pub fn api_url(mut self, url: String) -> Self {
        self.config.api = Some(Api {
            url,
            retry_ms: 10,
            retry_max_delay_ms: 40,
            request_timeout_ms: 5_000,
        });
        self
    }

    pub fn skip_transitions(mut self) -> Self {
        self.config.demo.skip_transitions = true;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
